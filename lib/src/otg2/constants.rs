//! Named numerical tolerances, replacing the teacher's scattered epsilon literals and
//! the source's global "infinity" constants with a single constants module, per the
//! spec's REDESIGN FLAGS.

/// Floor used wherever a ratio could divide by a kinematic limit (e.g. `1 / a_max`).
pub const DENOMINATOR_EPSILON: f64 = 1e-6;

/// Absolute tolerance for velocity-limit and continuity checks.
pub const V_EPS: f64 = 1e-12;
/// Absolute tolerance for acceleration-limit checks.
pub const A_EPS: f64 = 1e-12;

/// Matching precision for the final position of a synthesized profile.
pub const P_PRECISION: f64 = 1e-8;
/// Matching precision for the final velocity of a synthesized profile.
pub const V_PRECISION: f64 = 1e-8;
/// Matching precision for the final acceleration of a synthesized profile.
pub const A_PRECISION: f64 = 1e-10;

/// Upper bound on any single segment's cumulative duration; beyond this a profile is
/// rejected as numerically unreliable rather than merely "very slow".
pub const T_MAX: f64 = 1e12;

/// `t_sync` values above this are rejected with `ExecutionTimeTooBig` (§4.4).
pub const MAX_SYNCHRONIZATION_TIME: f64 = 1e10;

/// Numerical-validity envelope divisor bound for the position kernel (§3).
pub const POSITION_ENVELOPE_BOUND: f64 = 1e8;
/// Numerical-validity envelope divisor bound for the velocity kernel (§3).
pub const VELOCITY_ENVELOPE_BOUND: f64 = 1e10;

/// Relative tolerance used by the phase-synchronization detector (§4.5).
pub const PHASE_SYNC_TOLERANCE: f64 = 1e-2;
/// Minimum magnitude for a phase-sync candidate vector component to be considered
/// nonzero (§4.5 step 1 and step 3).
pub const PHASE_SYNC_MIN_COMPONENT: f64 = 1e-6;

/// Segment-boundary widening applied before the extremum sign-change test (§4.9).
pub const EXTREMUM_BOUNDARY_WIDENING: f64 = 1e-4;

/// Relative/absolute perturbation applied when current state already equals the
/// target state, so the decision trees see a non-degenerate problem (§4.8).
pub const TARGET_EQUALS_CURRENT_PERTURBATION: f64 = 1e-7;

/// Tolerance for "is this tick's input identical to the previous tick's" fast-path
/// comparison (§3, §4.8 Layer 3).
pub const INPUT_UNCHANGED_TOLERANCE: f64 = 1e-10;

/// `RMLSqrt`: a guarded square root. Negative radicands — which only arise from
/// floating-point noise around a true zero, never from a genuinely negative physical
/// quantity — yield a small positive constant instead of NaN, so callers can keep
/// comparing roots monotonically instead of branching on "did this fail".
#[inline]
pub fn guarded_sqrt(x: f64) -> f64 {
    if x < 0.0 {
        1e-50
    } else {
        x.sqrt()
    }
}

/// Floor a denominator away from zero without changing its sign.
#[inline]
pub fn guarded_denominator(x: f64) -> f64 {
    if x.abs() < DENOMINATOR_EPSILON {
        if x < 0.0 {
            -DENOMINATOR_EPSILON
        } else {
            DENOMINATOR_EPSILON
        }
    } else {
        x
    }
}
