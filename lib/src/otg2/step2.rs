//! Step 2 (§4.6): reparameterize an axis's profile to hit an externally imposed
//! duration `tf` exactly, trying each feasible segment pattern in turn until one
//! validates against the velocity/acceleration limits.
//!
//! Grounded on the teacher's `position_second_step2.rs` for the closed-form solutions;
//! restated here as a set of named segment-pattern functions tried in a fixed priority
//! order under a swappable limit assignment (see `step1.rs`'s `LimitAssignment`),
//! instead of the teacher's two direction-hardcoded methods each inlining three/two
//! solutions back to back.

use crate::otg2::segment::{AxisProfile, ReachedLimits};

/// Which velocity/acceleration limit is ridden "high" vs. "low" for one direction.
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

pub struct PositionStep2 {
    v0: f64,
    tf: f64,
    vf: f64,
    v_max: f64,
    v_min: f64,
    a_max: f64,
    a_min: f64,
    pd: f64,
    vd: f64,
}

impl PositionStep2 {
    pub fn new(tf: f64, p0: f64, v0: f64, pf: f64, vf: f64, v_max: f64, v_min: f64, a_max: f64, a_min: f64) -> Self {
        Self {
            v0,
            tf,
            vf,
            v_max,
            v_min,
            a_max,
            a_min,
            pd: pf - p0,
            vd: vf - v0,
        }
    }

    fn finish(&self, mut profile: AxisProfile, limits: ReachedLimits, assignment: LimitAssignment) -> Option<AxisProfile> {
        let LimitAssignment { v_hi, v_lo, a_hi, a_lo } = assignment;
        if profile.check(limits, a_hi, a_lo, v_hi, v_lo) {
            profile.pf = profile.p.last().copied().unwrap_or(profile.pf);
            Some(profile)
        } else {
            None
        }
    }

    /// Ramp up, coast, ramp down onto `vf`: `t[0]`, `t[1]`, `t[2]` active.
    fn accel_coast_decel(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        let LimitAssignment { a_hi, a_lo, .. } = assignment;
        let discriminant = (2.0 * a_hi * (self.pd - self.tf * self.vf) - 2.0 * a_lo * (self.pd - self.tf * self.v0)
            + self.vd * self.vd)
            / (a_hi * a_lo)
            + self.tf * self.tf;
        if discriminant < 0.0 {
            return None;
        }
        let coast = discriminant.sqrt();

        let mut profile = seed.clone();
        profile.t[0] = (a_hi * self.vd - a_hi * a_lo * (self.tf - coast)) / (a_hi * (a_hi - a_lo));
        profile.t[1] = coast;
        profile.t[2] = self.tf - (profile.t[0] + coast);
        profile.t[3..].fill(0.0);

        self.finish(profile, ReachedLimits::Acc0, assignment)
    }

    /// Ramp up, coast, then a closing ramp at the same acceleration sign: `t[0]`,
    /// `t[1]`, `t[6]` active.
    fn accel_coast_final_ramp(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        let LimitAssignment { a_hi, .. } = assignment;
        let h1 = -self.vd + a_hi * self.tf;

        let mut profile = seed.clone();
        profile.t[0] = -self.vd * self.vd / (2.0 * a_hi * h1) + (self.pd - self.v0 * self.tf) / h1;
        profile.t[1] = -self.vd / a_hi + self.tf;
        profile.t[2..6].fill(0.0);
        profile.t[6] = self.tf - (profile.t[0] + profile.t[1]);

        self.finish(profile, ReachedLimits::Acc0, assignment)
    }

    /// No opening ramp: coast, then a single closing ramp: `t[1]`, `t[6]` active.
    fn coast_then_final_ramp(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        let LimitAssignment { a_hi, .. } = assignment;

        let mut profile = seed.clone();
        profile.t[0] = 0.0;
        profile.t[1] = -self.vd / a_hi + self.tf;
        profile.t[2..6].fill(0.0);
        profile.t[6] = self.vd / a_hi;

        self.finish(profile, ReachedLimits::Acc0, assignment)
    }

    /// `v0 == vf == 0` and no displacement: the axis simply sits still for `tf`.
    fn zero_motion_hold(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        if self.v0.abs() >= f64::EPSILON || self.vf.abs() >= f64::EPSILON || self.pd.abs() >= f64::EPSILON {
            return None;
        }
        let mut profile = seed.clone();
        profile.t = [0.0, self.tf, 0.0, 0.0, 0.0, 0.0, 0.0];
        self.finish(profile, ReachedLimits::None, assignment)
    }

    /// A single two-segment ramp (`t[0]`, `t[1]`) whose implied acceleration is solved
    /// for directly rather than held at a limit, then checked against it.
    fn two_ramp_no_coast(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        let LimitAssignment { v_hi, v_lo, .. } = assignment;
        let split = 2.0 * (self.vf * self.tf - self.pd);

        let mut profile = seed.clone();
        profile.t[0] = split / self.vd;
        profile.t[1] = self.tf - profile.t[0];
        profile.t[2..].fill(0.0);

        let a_implied = self.vd * self.vd / split;
        if a_implied <= self.a_min - 1e-12 || a_implied >= self.a_max + 1e-12 {
            return None;
        }
        self.finish(profile, ReachedLimits::None, LimitAssignment { v_hi, v_lo, a_hi: a_implied, a_lo: -a_implied })
    }

    fn reparameterize_under(&self, seed: &AxisProfile, assignment: LimitAssignment) -> Option<AxisProfile> {
        self.accel_coast_decel(seed, assignment)
            .or_else(|| self.accel_coast_final_ramp(seed, assignment))
            .or_else(|| self.coast_then_final_ramp(seed, assignment))
            .or_else(|| self.zero_motion_hold(seed, assignment))
            .or_else(|| self.two_ramp_no_coast(seed, assignment))
    }

    /// Populate `profile` with a valid `tf`-duration reparameterization, trying the
    /// direction implied by the sign of the position delta first.
    pub fn get_profile(&mut self, profile: &mut AxisProfile) -> bool {
        let forward = LimitAssignment {
            v_hi: self.v_max,
            v_lo: self.v_min,
            a_hi: self.a_max,
            a_lo: self.a_min,
        };
        let (first, second) = if self.pd > 0.0 { (forward, forward.mirrored()) } else { (forward.mirrored(), forward) };

        let seed = profile.clone();
        if let Some(found) = self.reparameterize_under(&seed, first).or_else(|| self.reparameterize_under(&seed, second)) {
            *profile = found;
            true
        } else {
            false
        }
    }
}
