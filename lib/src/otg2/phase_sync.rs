//! Phase synchronization (§4.5): decide whether every phase-synced axis's motion is a
//! scalar multiple of a single reference vector, and if so compute the per-axis scale
//! factors a reference profile must be stretched by.
//!
//! Grounded on the teacher's `calculator_target.rs::is_input_collinear` for the
//! per-dof scale bookkeeping, and on
//! `original_source/src/TypeIIRML/TypeIIRMLIsPhaseSynchronizationPossible.cpp` for the
//! normalize-pick-largest-check-collinearity structure and its tolerances.

use crate::otg2::alloc::vec::Vec;
use crate::otg2::constants::{PHASE_SYNC_MIN_COMPONENT, PHASE_SYNC_TOLERANCE};
use crate::otg2::request::{PositionRequest, Synchronization};
use crate::otg2::util::AxisData;

/// Per-axis scale factors relative to the reference axis picked during detection.
#[derive(Debug, Clone)]
pub struct PhaseSync<const DOF: usize> {
    pub reference_dof: usize,
    pub scale: AxisData<f64, DOF>,
}

fn norm(values: impl Iterator<Item = f64>) -> f64 {
    values.map(|v| v * v).sum::<f64>().sqrt()
}

/// Attempt to find a single reference vector (position delta, current velocity, or
/// target velocity — whichever is largest) such that every other phase-synced axis's
/// position delta, current velocity, and target velocity are all a scalar multiple of
/// it, within [`PHASE_SYNC_TOLERANCE`]. Returns `None` if no such vector exists.
pub fn detect<const DOF: usize>(req: &PositionRequest<DOF>) -> Option<PhaseSync<DOF>> {
    let dofs = req.degrees_of_freedom;
    let phased: Vec<usize> = (0..dofs)
        .filter(|&d| {
            req.enabled[d]
                && matches!(req.synchronization_of(d), Synchronization::PhaseIfPossible | Synchronization::PhaseOnly)
        })
        .collect();
    if phased.len() < 2 {
        return None;
    }

    let pd = |d: usize| req.target_position[d] - req.current_position[d];
    let len_pd = norm(phased.iter().map(|&d| pd(d)));
    let len_v0 = norm(phased.iter().map(|&d| req.current_velocity[d]));
    let len_vf = norm(phased.iter().map(|&d| req.target_velocity[d]));

    if len_pd < PHASE_SYNC_MIN_COMPONENT && len_v0 < PHASE_SYNC_MIN_COMPONENT && len_vf < PHASE_SYNC_MIN_COMPONENT {
        return None;
    }

    // Pick the largest-magnitude vector as the reference; its own dominant component
    // locates the reference axis.
    let (reference, reference_len): (Box<dyn Fn(usize) -> f64 + '_>, f64) = if len_pd >= len_v0 && len_pd >= len_vf {
        (Box::new(pd), len_pd)
    } else if len_v0 >= len_vf {
        (Box::new(|d| req.current_velocity[d]), len_v0)
    } else {
        (Box::new(|d| req.target_velocity[d]), len_vf)
    };

    let reference_dof = *phased
        .iter()
        .max_by(|&&a, &&b| reference(a).abs().partial_cmp(&reference(b).abs()).unwrap())?;
    let reference_component = reference(reference_dof);
    if reference_component.abs() < PHASE_SYNC_MIN_COMPONENT || reference_len < PHASE_SYNC_MIN_COMPONENT {
        return None;
    }

    let mut scale = AxisData::<f64, DOF>::new(Some(dofs), 0.0);
    for &d in &phased {
        let s = reference(d) / reference_component;
        if (pd(d) - s * pd(reference_dof)).abs() > PHASE_SYNC_TOLERANCE * pd(reference_dof).abs().max(1.0)
            || (req.current_velocity[d] - s * req.current_velocity[reference_dof]).abs()
                > PHASE_SYNC_TOLERANCE * req.current_velocity[reference_dof].abs().max(1.0)
            || (req.target_velocity[d] - s * req.target_velocity[reference_dof]).abs()
                > PHASE_SYNC_TOLERANCE * req.target_velocity[reference_dof].abs().max(1.0)
        {
            return None;
        }
        scale[d] = s;
    }

    Some(PhaseSync { reference_dof, scale })
}
