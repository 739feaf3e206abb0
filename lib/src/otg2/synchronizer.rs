//! Cross-axis time synchronization (§4.4): pick the smallest execution time that lies
//! outside every axis's inoperative interval, then re-run Step 2 for every axis that
//! isn't already at that exact time.
//!
//! Grounded on the teacher's `calculator_target.rs::synchronize`, generalized from its
//! fixed `DataArrayOrVec` storage to this crate's [`AxisData`].

use crate::otg2::alloc::vec;
use crate::otg2::alloc::vec::Vec;
use crate::otg2::block::Block;
use crate::otg2::request::Synchronization;
use crate::otg2::segment::AxisProfile;
use crate::otg2::util::AxisData;

#[derive(Debug, Default)]
pub struct Synchronizer<const DOF: usize> {
    possible_t_syncs: Vec<f64>,
    idx: Vec<usize>,
    degrees_of_freedom: usize,
}

impl<const DOF: usize> Synchronizer<DOF> {
    pub fn new(dofs: usize) -> Self {
        Self {
            possible_t_syncs: vec![0.0; 3 * dofs + 1],
            idx: vec![0; 3 * dofs + 1],
            degrees_of_freedom: dofs,
        }
    }

    /// Find the synchronization time and, for every axis whose block does not already
    /// reach that exact time through its minimum-time profile, the limiting profile to
    /// carry into Step 2. Returns `(t_sync, limiting_dof)`.
    pub fn synchronize(
        &mut self,
        blocks: &AxisData<Block, DOF>,
        synchronization: &AxisData<Synchronization, DOF>,
        t_min: Option<f64>,
        profiles: &mut AxisData<AxisProfile, DOF>,
        discrete_duration: bool,
        delta_time: f64,
    ) -> Option<(f64, Option<usize>)> {
        let eps = f64::EPSILON;
        let dof_n = self.degrees_of_freedom;

        let mut any_interval = false;
        for dof in 0..dof_n {
            if synchronization[dof] == Synchronization::None {
                self.possible_t_syncs[dof] = 0.0;
                self.possible_t_syncs[dof_n + dof] = f64::INFINITY;
                self.possible_t_syncs[2 * dof_n + dof] = f64::INFINITY;
                continue;
            }

            self.possible_t_syncs[dof] = blocks[dof].t_min;
            self.possible_t_syncs[dof_n + dof] = blocks[dof].a.as_ref().map_or(f64::INFINITY, |a| a.right);
            self.possible_t_syncs[2 * dof_n + dof] = blocks[dof].b.as_ref().map_or(f64::INFINITY, |b| b.right);
            any_interval |= blocks[dof].a.is_some() || blocks[dof].b.is_some();
        }
        self.possible_t_syncs[3 * dof_n] = t_min.unwrap_or(f64::INFINITY);
        any_interval |= t_min.is_some();

        if discrete_duration {
            for t in &mut self.possible_t_syncs {
                if t.is_infinite() {
                    continue;
                }
                let remainder = *t % delta_time;
                if remainder > eps {
                    *t += delta_time - remainder;
                }
            }
        }

        let idx_end = if any_interval { self.idx.len() } else { dof_n };
        for i in 0..idx_end {
            self.idx[i] = i;
        }
        self.idx[0..idx_end].sort_by(|&i, &j| self.possible_t_syncs[i].partial_cmp(&self.possible_t_syncs[j]).unwrap());

        for &i in &self.idx[dof_n.saturating_sub(1)..idx_end] {
            let candidate = self.possible_t_syncs[i];
            let blocked = (0..dof_n).any(|dof| {
                synchronization[dof] != Synchronization::None && blocks[dof].is_blocked(candidate)
            });
            if blocked || candidate < t_min.unwrap_or(0.0) || candidate.is_infinite() {
                continue;
            }

            if i == 3 * dof_n {
                return Some((candidate, None));
            }

            let div = i / dof_n;
            let limiting_dof = i % dof_n;
            profiles[limiting_dof] = match div {
                0 => blocks[limiting_dof].p_min.clone(),
                1 => blocks[limiting_dof].a.clone().unwrap().profile,
                _ => blocks[limiting_dof].b.clone().unwrap().profile,
            };
            return Some((candidate, Some(limiting_dof)));
        }

        None
    }
}
