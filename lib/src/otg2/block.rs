//! The inoperative-interval structure used for per-axis synchronization (§4.4): the set
//! of execution times that are reachable by *some* valid Step-1 profile for an axis.
//!
//! Grounded on the teacher's `block.rs`: the Block abstraction (collapse every feasible
//! profile into a minimum time plus forbidden gaps) is identical in Reflexxes RML and
//! this kernel, only the stored profile type and the maximum candidate count (six here
//! instead of the teacher's seven) differ.

use core::cmp::Ordering;
use core::fmt;

use crate::otg2::segment::AxisProfile;

fn total_duration(profile: &AxisProfile) -> f64 {
    profile.brake.duration + profile.t_sum.last().copied().unwrap_or(0.0)
}

fn nearly_equal_duration(a: &AxisProfile, b: &AxisProfile, tolerance: f64) -> bool {
    (total_duration(a) - total_duration(b)).abs() < tolerance
}

#[derive(Debug, Clone, Default)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
    pub profile: AxisProfile,
}

impl Interval {
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left,
            right,
            profile: AxisProfile::default(),
        }
    }

    #[inline]
    fn from_profiles(profile_left: &AxisProfile, profile_right: &AxisProfile) -> Self {
        let left_duration = total_duration(profile_left);
        let right_duration = total_duration(profile_right);

        let (left, right, profile) = if left_duration < right_duration {
            (left_duration, right_duration, profile_right)
        } else {
            (right_duration, left_duration, profile_left)
        };

        Self {
            left,
            right,
            profile: profile.clone(),
        }
    }
}

/// The outcome of collapsing a set of valid per-axis profiles into the fastest one
/// (`p_min`/`t_min`) plus up to two forbidden sub-intervals (`a`, `b`) in which no valid
/// profile exists — every synchronization candidate must land outside those gaps.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub p_min: AxisProfile,
    pub t_min: f64,
    pub a: Option<Interval>,
    pub b: Option<Interval>,
}

/// Drop the profile at `index`, shifting everything after it down by one.
fn discard_profile_at(valid_profiles: &mut [AxisProfile; 6], valid_profile_counter: &mut usize, index: usize) {
    for i in index..(*valid_profile_counter - 1) {
        valid_profiles[i] = valid_profiles[i + 1].clone();
    }
    *valid_profile_counter -= 1;
}

/// Candidates the four-profile case checks for an accidental duplicate: two profiles
/// with (near-)equal duration but opposite direction are really the same motion found
/// twice by Step 1's two limit assignments, and one of the pair should be discarded.
/// Entries are `(left, right, index removed on a match, equality tolerance)`.
const FOUR_PROFILE_DUPLICATE_CHECKS: [(usize, usize, usize, f64); 3] =
    [(0, 1, 1, 32.0 * f64::EPSILON), (2, 3, 3, 256.0 * f64::EPSILON), (0, 3, 3, 256.0 * f64::EPSILON)];

impl Block {
    #[inline]
    pub fn set_min_profile(&mut self, profile: &AxisProfile) {
        self.p_min = profile.clone();
        self.t_min = total_duration(&self.p_min);
        self.a = None;
        self.b = None;
    }

    /// Build the block from every feasible Step-1 profile found for an axis. `true`
    /// means `block` was fully populated; `false` signals a profile-count parity the
    /// decision tree should never produce (reported upstream as a calculator error).
    pub fn calculate(block: &mut Block, valid_profiles: &mut [AxisProfile; 6], valid_profile_counter: &mut usize) -> bool {
        match *valid_profile_counter {
            1 => {
                block.set_min_profile(&valid_profiles[0]);
                return true;
            }
            2 => return Self::calculate_from_pair(block, valid_profiles),
            4 => {
                let Some((.., removed, _)) = FOUR_PROFILE_DUPLICATE_CHECKS.into_iter().find(|&(left, right, _, tolerance)| {
                    nearly_equal_duration(&valid_profiles[left], &valid_profiles[right], tolerance)
                        && valid_profiles[left].direction != valid_profiles[right].direction
                }) else {
                    return false;
                };
                discard_profile_at(valid_profiles, valid_profile_counter, removed);
            }
            n if n % 2 == 0 => return false,
            _ => {}
        }

        let idx_min = valid_profiles
            .iter()
            .take(*valid_profile_counter)
            .enumerate()
            .min_by(|(_, a), (_, b)| total_duration(a).partial_cmp(&total_duration(b)).unwrap_or(Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        block.set_min_profile(&valid_profiles[idx_min]);

        match *valid_profile_counter {
            3 => {
                let [else_1, else_2] = rotate_indices(idx_min, 3, [1, 2]);
                block.a = Some(Interval::from_profiles(&valid_profiles[else_1], &valid_profiles[else_2]));
                true
            }
            5 => {
                let [else_1, else_2, else_3, else_4] = rotate_indices(idx_min, 5, [1, 2, 3, 4]);
                if valid_profiles[else_1].direction == valid_profiles[else_2].direction {
                    block.a = Some(Interval::from_profiles(&valid_profiles[else_1], &valid_profiles[else_2]));
                    block.b = Some(Interval::from_profiles(&valid_profiles[else_3], &valid_profiles[else_4]));
                } else {
                    block.a = Some(Interval::from_profiles(&valid_profiles[else_1], &valid_profiles[else_4]));
                    block.b = Some(Interval::from_profiles(&valid_profiles[else_2], &valid_profiles[else_3]));
                }
                true
            }
            _ => false,
        }
    }

    /// The two-candidate case: either they're effectively the same profile (pick
    /// either), or the slower one carves out a forbidden interval above the faster.
    fn calculate_from_pair(block: &mut Block, valid_profiles: &[AxisProfile; 6]) -> bool {
        if nearly_equal_duration(&valid_profiles[0], &valid_profiles[1], 8.0 * f64::EPSILON) {
            block.set_min_profile(&valid_profiles[0]);
            return true;
        }

        let idx_min = if total_duration(&valid_profiles[0]) < total_duration(&valid_profiles[1]) { 0 } else { 1 };
        let idx_else = (idx_min + 1) % 2;

        block.set_min_profile(&valid_profiles[idx_min]);
        block.a = Some(Interval::from_profiles(&valid_profiles[idx_min], &valid_profiles[idx_else]));
        true
    }

    #[inline]
    pub fn is_blocked(&self, t: f64) -> bool {
        t < self.t_min
            || self.a.as_ref().is_some_and(|a| t > a.left && t < a.right)
            || self.b.as_ref().is_some_and(|b| t > b.left && t < b.right)
    }

    pub fn profile_at(&self, t: f64) -> &AxisProfile {
        if let Some(b) = &self.b {
            if t >= b.right {
                return &b.profile;
            }
        }
        if let Some(a) = &self.a {
            if t >= a.right {
                return &a.profile;
            }
        }
        &self.p_min
    }
}

/// `(idx_min + offset) % modulus` for every offset, in order.
fn rotate_indices<const N: usize>(idx_min: usize, modulus: usize, offsets: [usize; N]) -> [usize; N] {
    offsets.map(|offset| (idx_min + offset) % modulus)
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} ", self.t_min)?;
        if let Some(a) = &self.a {
            write!(f, "{}] [{} ", a.left, a.right)?;
        }
        if let Some(b) = &self.b {
            write!(f, "{}] [{} ", b.left, b.right)?;
        }
        write!(f, "-")
    }
}
