//! Polynomial segment store (§4.1) and the per-axis acceleration profile it is built
//! from (§4.2/§4.3/§4.6). Grounded on the teacher's `profile.rs::Profile`, with every
//! jerk-related field and jerk-limited check function dropped — this kernel is
//! acceleration-limited only (§1 Non-goals: "jerk limitation").

use core::fmt;

use crate::otg2::brake::BrakeSegment;
use crate::otg2::constants::{A_EPS, EXTREMUM_BOUNDARY_WIDENING, P_PRECISION, T_MAX, V_EPS, V_PRECISION};
use crate::otg2::roots::{solve_quadratic, Roots};
use crate::otg2::util::integrate;

/// One polynomial piece of a trajectory, valid on `[t - delta_t, t]` in the evaluator's
/// own local clock: `f(u) = a2*u^2 + a1*u + a0` where `u = t - delta_t`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Segment {
    pub a2: f64,
    pub a1: f64,
    pub a0: f64,
    pub delta_t: f64,
}

impl Segment {
    pub fn set(&mut self, a2: f64, a1: f64, a0: f64, delta_t: f64) {
        self.a2 = a2;
        self.a1 = a1;
        self.a0 = a0;
        self.delta_t = delta_t;
    }

    pub fn evaluate(&self, t: f64) -> f64 {
        let u = t - self.delta_t;
        self.a2 * u * u + self.a1 * u + self.a0
    }

    /// Real roots of `f`, in the shifted (`u`) domain, per §4.1.
    pub fn real_roots(&self) -> Roots {
        solve_quadratic(self.a2, self.a1, self.a0)
    }

    /// The segment's declared degree: the position of the highest nonzero coefficient.
    pub fn degree(&self) -> u8 {
        if self.a2.abs() > f64::EPSILON {
            2
        } else if self.a1.abs() > f64::EPSILON {
            1
        } else {
            0
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub enum ReachedLimits {
    Acc0,
    Acc1,
    Acc0Acc1,
    Vel,
    #[default]
    None,
}

#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub enum Direction {
    #[default]
    Up,
    Down,
}

#[derive(Debug, Clone, Default)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
    pub t_min: f64,
    pub t_max: f64,
}

/// The minimum execution time profile or time-synchronized profile for one axis: up to
/// seven constant-acceleration phases plus an optional leading brake pre-trajectory.
///
/// This is the working representation used by Step 1/Step 2; [`AxisProfile::segments`]
/// exposes it through the spec's public `(a2, a1, a0, ΔT)` polynomial-segment store.
#[derive(Debug, Clone, Default)]
pub struct AxisProfile {
    /// Phase durations.
    pub t: [f64; 7],
    /// Cumulative phase end-times.
    pub t_sum: [f64; 7],
    /// Phase accelerations (constant within each phase); `a[7]` is the target
    /// acceleration follow-on value used by the second-order checks.
    pub a: [f64; 8],
    pub v: [f64; 8],
    pub p: [f64; 8],

    pub brake: BrakeSegment,

    pub pf: f64,
    pub vf: f64,
    pub af: f64,

    pub limits: ReachedLimits,
    pub direction: Direction,
}

impl AxisProfile {
    pub fn set_boundary(&mut self, p0: f64, v0: f64, a0: f64, pf: f64, vf: f64, af: f64) {
        self.p[0] = p0;
        self.v[0] = v0;
        self.a[0] = a0;
        self.pf = pf;
        self.vf = vf;
        self.af = af;
    }

    pub fn set_boundary_from(&mut self, other: &AxisProfile) {
        self.p[0] = other.p[0];
        self.v[0] = other.v[0];
        self.a[0] = other.a[0];
        self.pf = other.pf;
        self.vf = other.vf;
        self.af = other.af;
        self.brake = other.brake.clone();
    }

    /// Validate and fill in a profile with acceleration limits `a_up`/`a_down` and
    /// velocity limits `v_max`/`v_min`, given the seven phase durations already placed
    /// into `self.t`. Mirrors `profile.rs::check_for_second_order`.
    pub fn check(
        &mut self,
        limits: ReachedLimits,
        a_up: f64,
        a_down: f64,
        v_max: f64,
        v_min: f64,
    ) -> bool {
        if self.t[0] < 0.0 {
            return false;
        }
        self.t_sum[0] = self.t[0];
        for i in 0..6 {
            if self.t[i + 1] < 0.0 {
                return false;
            }
            self.t_sum[i + 1] = self.t_sum[i] + self.t[i + 1];
        }
        if matches!(limits, ReachedLimits::Acc0 | ReachedLimits::Acc0Acc1) && self.t[1] < f64::EPSILON {
            return false;
        }
        if matches!(limits, ReachedLimits::Acc1 | ReachedLimits::Acc0Acc1) && self.t[5] < f64::EPSILON {
            return false;
        }
        if *self.t_sum.last().unwrap_or(&0.0) > T_MAX {
            return false;
        }

        self.a = [
            if self.t[0] > 0.0 { a_up } else { 0.0 },
            0.0,
            if self.t[2] > 0.0 { a_down } else { 0.0 },
            0.0,
            if self.t[4] > 0.0 { a_down } else { 0.0 },
            0.0,
            if self.t[6] > 0.0 { a_up } else { 0.0 },
            self.af,
        ];

        self.direction = if v_max > 0.0 { Direction::Up } else { Direction::Down };
        let v_upp_lim = if self.direction == Direction::Up { v_max } else { v_min } + V_EPS;
        let v_low_lim = if self.direction == Direction::Up { v_min } else { v_max } - V_EPS;

        for i in 0..7 {
            self.v[i + 1] = self.v[i] + self.t[i] * self.a[i];
            self.p[i + 1] = self.p[i] + self.t[i] * (self.v[i] + self.t[i] * self.a[i] / 2.0);
        }

        self.limits = limits;

        (self.p.last().unwrap_or(&0.0) - self.pf).abs() < P_PRECISION
            && (self.v.last().unwrap_or(&0.0) - self.vf).abs() < P_PRECISION
            && self.v[2..=7].iter().all(|&v| v <= v_upp_lim && v >= v_low_lim)
    }

    /// As [`AxisProfile::check`], but also rejects accelerations outside `[a_min, a_max]`.
    pub fn check_with_a_limits(
        &mut self,
        limits: ReachedLimits,
        a_up: f64,
        a_down: f64,
        v_max: f64,
        v_min: f64,
        a_max: f64,
        a_min: f64,
    ) -> bool {
        (a_min - A_EPS < a_up)
            && (a_up < a_max + A_EPS)
            && (a_min - A_EPS < a_down)
            && (a_down < a_max + A_EPS)
            && self.check(limits, a_up, a_down, v_max, v_min)
    }

    /// Validate a single-phase, constant-acceleration velocity profile (used by the
    /// velocity kernel, §4.7): `t[1]` is the only nonzero duration.
    pub fn check_velocity_only(&mut self, a_up: f64) -> bool {
        if self.t[1] < 0.0 {
            return false;
        }
        self.t_sum = [0.0, self.t[1], self.t[1], self.t[1], self.t[1], self.t[1], self.t[1]];
        if *self.t_sum.last().unwrap_or(&0.0) > T_MAX {
            return false;
        }
        self.a = [0.0; 8];
        self.a[1] = if self.t[1] > 0.0 { a_up } else { 0.0 };
        self.a[7] = self.af;
        for i in 0..7 {
            self.v[i + 1] = self.v[i] + self.t[i] * self.a[i];
            self.p[i + 1] = self.p[i] + self.t[i] * (self.v[i] + self.t[i] * self.a[i] / 2.0);
        }
        self.direction = if a_up > 0.0 { Direction::Up } else { Direction::Down };
        (self.v.last().unwrap_or(&0.0) - self.vf).abs() < V_PRECISION
    }

    /// Convert the internal phase representation into the spec's public polynomial
    /// segment store: one [`Segment`] per nonzero-duration phase, including the leading
    /// brake phase if present, plus the trailing "coast at target velocity" segment.
    pub fn segments(&self) -> arrayvec::ArrayVec<Segment, 8> {
        let mut out = arrayvec::ArrayVec::new();
        let mut t_offset = 0.0;

        if self.brake.duration > 0.0 {
            let (a0, v0, p0) = (self.brake.a[0], self.brake.v[0], self.brake.p[0]);
            push_seg(&mut out, a0, v0, p0, self.brake.t[0], t_offset);
            t_offset += self.brake.t[0];
        }

        let mut prev_t = 0.0;
        for i in 0..7 {
            if self.t[i] <= 0.0 {
                prev_t = self.t_sum[i];
                continue;
            }
            push_seg(&mut out, self.a[i], self.v[i], self.p[i], self.t[i], t_offset + prev_t);
            prev_t = self.t_sum[i];
        }
        out
    }

    pub fn get_position_extrema(&self) -> Bound {
        let mut extrema = Bound {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            t_min: 0.0,
            t_max: 0.0,
        };

        let mut t_sum = self.brake.duration;
        for i in 0..7 {
            step_extremum(t_sum, self.t[i], self.p[i], self.v[i], self.a[i], EXTREMUM_BOUNDARY_WIDENING, &mut extrema);
            t_sum = self.brake.duration + self.t_sum[i];
        }

        if self.pf < extrema.min {
            extrema.min = self.pf;
            extrema.t_min = self.brake.duration + self.t_sum.last().copied().unwrap_or(0.0);
        }
        if self.pf > extrema.max {
            extrema.max = self.pf;
            extrema.t_max = self.brake.duration + self.t_sum.last().copied().unwrap_or(0.0);
        }
        extrema
    }
}

fn push_seg(out: &mut arrayvec::ArrayVec<Segment, 8>, a: f64, v: f64, p: f64, t: f64, offset: f64) {
    if out.is_full() {
        return;
    }
    let mut seg = Segment::default();
    // f(u) = a/2 u^2 + v u + p, u = local time since offset -> global time = offset + delta_t + u
    seg.set(a / 2.0, v, p, offset);
    out.push(seg);
    let _ = t;
}

fn step_extremum(t_sum: f64, t: f64, p: f64, v: f64, a: f64, widen: f64, ext: &mut Bound) {
    if p < ext.min {
        ext.min = p;
        ext.t_min = t_sum;
    }
    if p > ext.max {
        ext.max = p;
        ext.t_max = t_sum;
    }
    if a.abs() > f64::EPSILON {
        // Velocity sign change within the segment: v(u) = v + a*u = 0 => u = -v/a. The
        // segment boundary is widened by `widen` so a root that falls exactly on it is
        // not missed due to floating-point rounding (§4.9).
        let u = -v / a;
        if u > -widen && u < t + widen {
            let u = u.clamp(0.0, t);
            let (p_ext, _, _) = integrate(u, p, v, a);
            if a > 0.0 && p_ext < ext.min {
                ext.min = p_ext;
                ext.t_min = t_sum + u;
            } else if a < 0.0 && p_ext > ext.max {
                ext.max = p_ext;
                ext.t_max = t_sum + u;
            }
        }
    }
}

impl fmt::Display for AxisProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        };
        let lim = match self.limits {
            ReachedLimits::Acc0 => "ACC0",
            ReachedLimits::Acc1 => "ACC1",
            ReachedLimits::Acc0Acc1 => "ACC0_ACC1",
            ReachedLimits::Vel => "VEL",
            ReachedLimits::None => "NONE",
        };
        write!(f, "{}_{}", dir, lim)
    }
}
