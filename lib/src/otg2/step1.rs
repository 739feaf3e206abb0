//! Step 1 (§4.2/§4.3): given an axis's current and target state, find every
//! minimum-time profile shape that reaches the target without violating the velocity
//! or acceleration limits, and collapse them into a [`Block`] of synchronizable times.
//!
//! An acceleration-limited minimum-time move only ever takes one of two shapes: a
//! two-ramp "bang-bang" move whose velocity peak never reaches a limit, or a
//! ramp-coast-ramp move that rides a velocity limit in between. Both shapes exist in a
//! "forward" and a "mirrored" limit assignment (swap which of `v_max`/`v_min` and
//! `a_max`/`a_min` is being ridden), so Step 1 tries up to four shape/assignment
//! combinations and hands whatever is feasible to [`Block::calculate`].
//!
//! Grounded on the teacher's `position_second_step1.rs` for the shape formulas
//! themselves (the acceleration-only, always-`UDDU` subset of Ruckig's Step 1), restated
//! here as two reusable shape functions over a swappable limit assignment rather than
//! four hand-duplicated call sites. Shape naming follows
//! `original_source/src/TypeIIRML/TypeIIRMLDecisionTree1A.cpp`'s own vocabulary:
//! `time_acc0` there is this module's ramp-coast-ramp, `time_none` is the two-ramp move.

use arrayvec::ArrayVec;

use crate::otg2::block::{Block, Interval};
use crate::otg2::constants::guarded_sqrt;
use crate::otg2::segment::{AxisProfile, ReachedLimits};

/// Which velocity/acceleration limit is ridden "high" vs. "low" for one shape attempt.
/// Swapping the two fields mirrors the move: riding `a_min`/`v_min` instead of
/// `a_max`/`v_max` and vice versa.
#[derive(Clone, Copy)]
struct LimitAssignment {
    v_hi: f64,
    v_lo: f64,
    a_hi: f64,
    a_lo: f64,
}

impl LimitAssignment {
    fn mirrored(self) -> Self {
        Self {
            v_hi: self.v_lo,
            v_lo: self.v_hi,
            a_hi: self.a_lo,
            a_lo: self.a_hi,
        }
    }
}

pub struct PositionStep1 {
    v0: f64,
    vf: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    a_min: f64,
    displacement: f64,
}

impl PositionStep1 {
    pub fn new(p0: f64, v0: f64, pf: f64, vf: f64, v_max: f64, v_min: f64, a_max: f64, a_min: f64) -> Self {
        Self {
            v0,
            vf,
            v_max,
            v_min,
            a_max,
            a_min,
            displacement: pf - p0,
        }
    }

    /// Ramp-coast-ramp: accelerate to `v_hi`, hold it, then decelerate onto `vf`. At
    /// most one candidate — the coast duration is fully determined once the peak
    /// velocity is fixed.
    fn ramp_coast_ramp(&self, limits: LimitAssignment, seed: &AxisProfile) -> Option<AxisProfile> {
        let LimitAssignment { v_hi, v_lo, a_hi, a_lo } = limits;

        let mut profile = seed.clone();
        profile.t[0] = (-self.v0 + v_hi) / a_hi;
        profile.t[1] = (a_lo * self.v0 * self.v0 - a_hi * self.vf * self.vf) / (2.0 * a_hi * a_lo * v_hi)
            + v_hi * (a_hi - a_lo) / (2.0 * a_hi * a_lo)
            + self.displacement / v_hi;
        profile.t[2] = (self.vf - v_hi) / a_lo;
        profile.t[3..].fill(0.0);

        profile.check(ReachedLimits::Acc0, a_hi, a_lo, v_hi, v_lo).then_some(profile)
    }

    /// Two-ramp: accelerate, then decelerate straight onto `vf` with no coasting phase.
    /// The peak velocity is a root of a quadratic in the displacement, which generally
    /// has two solutions — both are tried as separate candidates.
    fn two_ramp(&self, limits: LimitAssignment, seed: &AxisProfile) -> ArrayVec<AxisProfile, 2> {
        let LimitAssignment { v_hi, v_lo, a_hi, a_lo } = limits;
        let mut out = ArrayVec::new();

        let discriminant =
            (a_hi * self.vf * self.vf - a_lo * self.v0 * self.v0 - 2.0 * a_hi * a_lo * self.displacement) / (a_hi - a_lo);
        if discriminant < 0.0 {
            return out;
        }
        let root = guarded_sqrt(discriminant);

        for sign in [-1.0, 1.0] {
            let mut profile = seed.clone();
            profile.t[0] = -(self.v0 + sign * root) / a_hi;
            profile.t[1] = 0.0;
            profile.t[2] = (self.vf + sign * root) / a_lo;
            profile.t[3..].fill(0.0);

            if profile.check(ReachedLimits::None, a_hi, a_lo, v_hi, v_lo) {
                out.push(profile);
            }
        }
        out
    }

    /// Both limits are zero (coasting axis): the only admissible motion is a constant
    /// velocity, which requires `v0 == vf`.
    fn coast_at_constant_velocity(&self, seed: &mut AxisProfile, v_max: f64, v_min: f64) -> bool {
        if (self.vf - self.v0).abs() > f64::EPSILON {
            return false;
        }

        seed.t = [0.0; 7];
        if seed.check(ReachedLimits::None, 0.0, 0.0, v_max, v_min) {
            return true;
        }

        if self.v0.abs() > f64::EPSILON {
            seed.t[3] = self.displacement / self.v0;
            return seed.check(ReachedLimits::None, 0.0, 0.0, v_max, v_min);
        }

        self.displacement.abs() < f64::EPSILON && seed.check(ReachedLimits::None, 0.0, 0.0, v_max, v_min)
    }

    /// Try every shape/assignment combination and stash the feasible ones, in the fixed
    /// priority order `Block::calculate` expects: both two-ramp roots for the forward
    /// assignment, both for the mirrored one, then the single ramp-coast-ramp candidate
    /// for each assignment.
    fn collect_candidates(&self, primary: LimitAssignment, seed: &AxisProfile, candidates: &mut [AxisProfile; 6], count: &mut usize) {
        let secondary = primary.mirrored();
        let mut push = |profile: AxisProfile| {
            if *count < candidates.len() - 1 {
                candidates[*count] = profile;
                *count += 1;
            }
        };

        for assignment in [primary, secondary] {
            for profile in self.two_ramp(assignment, seed) {
                push(profile);
            }
        }
        for assignment in [primary, secondary] {
            if let Some(profile) = self.ramp_coast_ramp(assignment, seed) {
                push(profile);
            }
        }
    }

    /// `vf == 0` admits no inoperative interval, so it's cheaper to stop at the first
    /// feasible shape instead of collecting every candidate: try the displacement's own
    /// direction first, then its mirror, in priority order two-ramp before
    /// ramp-coast-ramp.
    fn first_feasible_toward_rest(&self, primary: LimitAssignment, seed: &AxisProfile, candidates: &mut [AxisProfile; 6], count: &mut usize) {
        for assignment in [primary, primary.mirrored()] {
            if let Some(profile) = self.two_ramp(assignment, seed).into_iter().next() {
                candidates[0] = profile;
                *count = 1;
                return;
            }
            if let Some(profile) = self.ramp_coast_ramp(assignment, seed) {
                candidates[0] = profile;
                *count = 1;
                return;
            }
        }
    }

    /// Run the decision tree against `input` and populate `block` with every feasible
    /// profile, collapsed to a minimum time and inoperative sub-intervals.
    pub fn get_profile(&mut self, input: &AxisProfile, block: &mut Block) -> bool {
        if self.v_max == 0.0 && self.v_min == 0.0 {
            let p = &mut block.p_min;
            p.set_boundary_from(input);

            if self.coast_at_constant_velocity(p, self.v_max, self.v_min) {
                block.t_min = p.brake.duration + p.t_sum.last().copied().unwrap_or(0.0);
                if self.v0.abs() > f64::EPSILON {
                    block.a = Some(Interval::new(block.t_min, f64::INFINITY));
                }
                return true;
            }
            return false;
        }

        let mut seed = AxisProfile::default();
        seed.set_boundary_from(input);
        let mut candidates: [AxisProfile; 6] = Default::default();
        let mut count = 0;

        let forward = LimitAssignment {
            v_hi: self.v_max,
            v_lo: self.v_min,
            a_hi: self.a_max,
            a_lo: self.a_min,
        };

        if self.vf.abs() < f64::EPSILON {
            let primary = if self.displacement >= 0.0 { forward } else { forward.mirrored() };
            self.first_feasible_toward_rest(primary, &seed, &mut candidates, &mut count);
        } else {
            self.collect_candidates(forward, &seed, &mut candidates, &mut count);
        }

        Block::calculate(block, &mut candidates, &mut count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_move_finds_a_block() {
        let mut step1 = PositionStep1::new(0.0, 0.0, 10.0, 0.0, 2.0, -2.0, 1.0, -1.0);
        let input = AxisProfile::default();
        let mut block = Block::default();
        assert!(step1.get_profile(&input, &mut block));
        assert!(block.t_min > 0.0);
    }

    #[test]
    fn zero_distance_zero_velocity_is_instantaneous() {
        let mut step1 = PositionStep1::new(0.0, 0.0, 0.0, 0.0, 2.0, -2.0, 1.0, -1.0);
        let input = AxisProfile::default();
        let mut block = Block::default();
        assert!(step1.get_profile(&input, &mut block));
        assert!(block.t_min.abs() < 1e-6);
    }
}
