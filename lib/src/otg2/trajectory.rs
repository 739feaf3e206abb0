//! The synthesized trajectory for one update cycle (§4.8/§4.9): one [`AxisProfile`] per
//! axis plus the synchronized duration, sampled at an arbitrary time via `sample_at`.
//!
//! Grounded on the teacher's `trajectory.rs`, collapsed from its multi-waypoint section
//! list (this kernel only ever re-plans from the current tick's boundary state, so
//! there is exactly one section) down to a single profile per axis.

use crate::otg2::alloc::vec;
use crate::otg2::alloc::vec::Vec;
use crate::otg2::segment::{AxisProfile, Bound};
use crate::otg2::util::{integrate, AxisData};

/// A single positional extremum of one axis, paired with the full state every axis is
/// in at the instant that extremum is reached (§4.9).
#[derive(Debug, Clone, Default)]
pub struct Extremum<const DOF: usize> {
    pub position: f64,
    pub time: f64,
    pub co_position: AxisData<f64, DOF>,
    pub co_velocity: AxisData<f64, DOF>,
    pub co_acceleration: AxisData<f64, DOF>,
}

impl<const DOF: usize> Extremum<DOF> {
    fn empty(dofs: usize) -> Self {
        Self {
            position: 0.0,
            time: 0.0,
            co_position: AxisData::new(Some(dofs), 0.0),
            co_velocity: AxisData::new(Some(dofs), 0.0),
            co_acceleration: AxisData::new(Some(dofs), 0.0),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Trajectory<const DOF: usize> {
    pub profiles: AxisData<AxisProfile, DOF>,
    pub duration: f64,
    pub independent_min_durations: AxisData<f64, DOF>,
    position_extrema: Vec<Bound>,
    degrees_of_freedom: usize,
}

impl<const DOF: usize> Trajectory<DOF> {
    pub fn new(dofs: Option<usize>) -> Self {
        Self {
            profiles: AxisData::new(dofs, AxisProfile::default()),
            duration: 0.0,
            independent_min_durations: AxisData::new(dofs, 0.0),
            position_extrema: vec![Bound::default(); dofs.unwrap_or(DOF)],
            degrees_of_freedom: dofs.unwrap_or(DOF),
        }
    }

    /// Sample every axis's position/velocity/acceleration at `time`, clamping to the
    /// final state once `time >= duration` (§4.9 "evaluate past the end").
    pub fn sample_at(
        &self,
        time: f64,
        new_position: &mut AxisData<f64, DOF>,
        new_velocity: &mut AxisData<f64, DOF>,
        new_acceleration: &mut AxisData<f64, DOF>,
    ) {
        for dof in 0..self.degrees_of_freedom {
            let p = &self.profiles[dof];
            let (t_local, p0, v0, a0) = self.local_time_and_state(p, time);
            let (pos, vel, acc) = integrate(t_local, p0, v0, a0);
            new_position[dof] = pos;
            new_velocity[dof] = vel;
            new_acceleration[dof] = acc;
        }
    }

    fn local_time_and_state(&self, p: &AxisProfile, time: f64) -> (f64, f64, f64, f64) {
        let mut t = time;

        if p.brake.duration > 0.0 {
            if t < p.brake.duration {
                return (t, p.brake.p[0], p.brake.v[0], p.brake.a[0]);
            }
            t -= p.brake.duration;
        }

        if t >= p.t_sum.last().copied().unwrap_or(0.0) {
            return (
                t - p.t_sum.last().copied().unwrap_or(0.0),
                p.p.last().copied().unwrap_or(p.pf),
                p.v.last().copied().unwrap_or(p.vf),
                p.a.last().copied().unwrap_or(p.af),
            );
        }

        let index = p.t_sum.iter().position(|&ts| ts > t).unwrap_or(p.t_sum.len() - 1);
        let t_local = if index > 0 { t - p.t_sum[index - 1] } else { t };
        (t_local, p.p[index], p.v[index], p.a[index])
    }

    pub fn get_position_extrema(&mut self) -> &[Bound] {
        for dof in 0..self.degrees_of_freedom {
            self.position_extrema[dof] = self.profiles[dof].get_position_extrema();
        }
        &self.position_extrema
    }

    /// Per-axis positional extrema (§4.9), each paired with the full K-dimensional
    /// state of every axis co-existing at the time that extremum is reached. Only
    /// computed when the caller opts in via
    /// [`crate::otg2::request::PositionRequest::enable_extremum_analysis`].
    pub fn extrema(&self) -> AxisData<(Extremum<DOF>, Extremum<DOF>), DOF> {
        let mut out = AxisData::new(Some(self.degrees_of_freedom), (Extremum::empty(self.degrees_of_freedom), Extremum::empty(self.degrees_of_freedom)));
        for dof in 0..self.degrees_of_freedom {
            let bound = self.profiles[dof].get_position_extrema();
            out[dof] = (self.co_state_at(bound.min, bound.t_min), self.co_state_at(bound.max, bound.t_max));
        }
        out
    }

    fn co_state_at(&self, position: f64, time: f64) -> Extremum<DOF> {
        let mut co_position = AxisData::new(Some(self.degrees_of_freedom), 0.0);
        let mut co_velocity = AxisData::new(Some(self.degrees_of_freedom), 0.0);
        let mut co_acceleration = AxisData::new(Some(self.degrees_of_freedom), 0.0);
        self.sample_at(time, &mut co_position, &mut co_velocity, &mut co_acceleration);
        Extremum { position, time, co_position, co_velocity, co_acceleration }
    }

    /// First time at which axis `dof` passes through `position`, if ever, found via the
    /// segment store's quadratic root solver (§4.1/§4.9).
    pub fn get_first_time_at_position(&self, dof: usize, position: f64) -> Option<f64> {
        if dof >= self.degrees_of_freedom {
            return None;
        }
        let p = &self.profiles[dof];
        for seg in p.segments() {
            let shifted = crate::otg2::segment::Segment {
                a2: seg.a2,
                a1: seg.a1,
                a0: seg.a0 - position,
                delta_t: seg.delta_t,
            };
            if let Some(root) = shifted.real_roots().into_iter().find(|&r| r >= 0.0) {
                return Some(seg.delta_t + root);
            }
        }
        None
    }
}
