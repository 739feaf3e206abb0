//! Velocity-mode kernel (§4.7): a single constant-acceleration ramp from `v0` to `vf`,
//! used both as the public velocity interface and as Safety Layer 2 inside the position
//! generator's fallback chain (§4.8).
//!
//! A velocity-only move under one acceleration limit has exactly one admissible shape:
//! ramp for the whole duration at whatever acceleration closes the velocity gap. Step 1
//! picks the fastest such ramp (pinned to whichever limit has the matching sign); Step 2
//! reparameterizes it to an externally imposed duration instead. Grounded on the
//! teacher's `velocity_second_step1.rs`/`velocity_second_step2.rs`, sharing a single
//! ramp-construction helper between the two rather than duplicating the `t`-array
//! layout in each.

use crate::otg2::block::Block;
use crate::otg2::segment::{AxisProfile, ReachedLimits};

fn single_ramp(seed: &AxisProfile, duration: f64) -> AxisProfile {
    let mut profile = seed.clone();
    profile.t = [0.0, duration, 0.0, 0.0, 0.0, 0.0, 0.0];
    profile
}

pub struct VelocityStep1 {
    a_max: f64,
    a_min: f64,
    velocity_gap: f64,
}

impl VelocityStep1 {
    pub fn new(v0: f64, vf: f64, a_max: f64, a_min: f64) -> Self {
        Self {
            a_max,
            a_min,
            velocity_gap: vf - v0,
        }
    }

    /// The minimum-time ramp: whichever acceleration limit has the same sign as the
    /// velocity gap, ridden for exactly as long as it takes to close that gap.
    pub fn get_profile(&mut self, input: &AxisProfile, block: &mut Block) -> bool {
        let acceleration = if self.velocity_gap > 0.0 { self.a_max } else { self.a_min };

        let mut p = single_ramp(input, self.velocity_gap / acceleration);
        if !p.check_velocity_only(acceleration) {
            return false;
        }
        block.set_min_profile(&p);
        true
    }
}

pub struct VelocityStep2 {
    tf: f64,
    a_max: f64,
    a_min: f64,
    velocity_gap: f64,
}

impl VelocityStep2 {
    pub fn new(tf: f64, v0: f64, vf: f64, a_max: f64, a_min: f64) -> Self {
        Self {
            tf,
            a_max,
            a_min,
            velocity_gap: vf - v0,
        }
    }

    /// Ride whatever constant acceleration spans `velocity_gap` over `tf` exactly,
    /// rejecting it if that acceleration falls outside the axis's own limits.
    pub fn get_profile(&mut self, profile: &mut AxisProfile) -> bool {
        let acceleration = if self.velocity_gap.abs() < f64::EPSILON { 0.0 } else { self.velocity_gap / self.tf };
        if acceleration <= self.a_min - 1e-12 || acceleration >= self.a_max + 1e-12 {
            return false;
        }

        let mut candidate = single_ramp(profile, self.tf);
        if !candidate.check_velocity_only(acceleration) {
            return false;
        }
        candidate.pf = candidate.p.last().copied().unwrap_or(candidate.pf);
        candidate.limits = ReachedLimits::Acc0;
        *profile = candidate;
        true
    }
}
