//! Root-finding for the quadratic position polynomials used by this kernel.
//!
//! The teacher's `roots.rs` solves cubics and quartics because Ruckig's jerk-limited
//! profiles are degree-3 in position. This kernel has no jerk term (§1 Non-goals), so
//! every position segment is at most degree 2 and only a quadratic solver is needed.

use arrayvec::ArrayVec;

use crate::otg2::constants::guarded_sqrt;

/// Up to two non-negative real roots, in the order they were found (not sorted).
pub type Roots = ArrayVec<f64, 2>;

/// Roots of `a2*t^2 + a1*t + a0 = 0`, restricted to `t >= 0`.
///
/// Per §4.1: a negative discriminant yields zero roots (via the guarded square root,
/// which never itself signals failure — the sign check happens before taking it); when
/// `a2 == 0` and `a1 != 0` there is exactly one root; when both are zero there are none.
#[inline]
pub fn solve_quadratic(a2: f64, a1: f64, a0: f64) -> Roots {
    let mut roots = Roots::new();

    if a2.abs() < f64::EPSILON {
        if a1.abs() > f64::EPSILON {
            push_nonneg(&mut roots, -a0 / a1);
        }
        return roots;
    }

    let discriminant = a1 * a1 - 4.0 * a2 * a0;
    if discriminant < 0.0 {
        return roots;
    }

    let sqrt_d = guarded_sqrt(discriminant);
    let inv2a = 1.0 / (2.0 * a2);
    push_nonneg(&mut roots, (-a1 + sqrt_d) * inv2a);
    push_nonneg(&mut roots, (-a1 - sqrt_d) * inv2a);
    roots
}

#[inline]
fn push_nonneg(roots: &mut Roots, t: f64) {
    if t >= 0.0 && !roots.is_full() {
        roots.push(t);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_distinct_roots() {
        // t^2 - 3t + 2 = (t-1)(t-2)
        let roots = solve_quadratic(1.0, -3.0, 2.0);
        let mut sorted: Vec<f64> = roots.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(sorted.len(), 2);
        assert!((sorted[0] - 1.0).abs() < 1e-9);
        assert!((sorted[1] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn negative_discriminant_is_empty() {
        let roots = solve_quadratic(1.0, 0.0, 1.0);
        assert!(roots.is_empty());
    }

    #[test]
    fn linear_case_single_root() {
        let roots = solve_quadratic(0.0, 2.0, -4.0);
        assert_eq!(roots.len(), 1);
        assert!((roots[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_case_no_roots() {
        let roots = solve_quadratic(0.0, 0.0, 5.0);
        assert!(roots.is_empty());
    }

    #[test]
    fn negative_roots_are_dropped() {
        // (t+1)(t+2) has both roots negative.
        let roots = solve_quadratic(1.0, 3.0, 2.0);
        assert!(roots.is_empty());
    }
}
