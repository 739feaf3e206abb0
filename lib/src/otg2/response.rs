//! Per-tick output (§6): the kinematic state at the current time plus bookkeeping the
//! caller needs to feed the next tick and diagnose what happened.
//!
//! Grounded on the teacher's `output_parameter.rs`, with `new_jerk` dropped (this
//! kernel has no jerk term) and a `result` field added to surface [`StepResult`]
//! alongside the state, matching the spec's decision to return a status enum from
//! every `update` call rather than relying solely on `Result<_, Otg2Error>`.

use core::fmt;
use core::ops::Deref;

use crate::otg2::result::StepResult;
use crate::otg2::trajectory::{Extremum, Trajectory};
use crate::otg2::util::{join, AxisData};

#[derive(Debug, Clone)]
pub struct PositionResponse<const DOF: usize> {
    pub degrees_of_freedom: usize,
    pub trajectory: Trajectory<DOF>,
    pub new_position: AxisData<f64, DOF>,
    pub new_velocity: AxisData<f64, DOF>,
    pub new_acceleration: AxisData<f64, DOF>,
    pub time: f64,
    pub result: StepResult,
    pub new_calculation: bool,
    /// `(minimum, maximum)` positional extremum per axis (§4.9), populated only when
    /// [`crate::otg2::request::PositionRequest::enable_extremum_analysis`] is set.
    pub extrema: Option<AxisData<(Extremum<DOF>, Extremum<DOF>), DOF>>,
}

impl<const DOF: usize> PositionResponse<DOF> {
    pub fn new(dofs: Option<usize>) -> Self {
        Self {
            degrees_of_freedom: dofs.unwrap_or(DOF),
            trajectory: Trajectory::new(dofs),
            new_position: AxisData::new(dofs, 0.0),
            new_velocity: AxisData::new(dofs, 0.0),
            new_acceleration: AxisData::new(dofs, 0.0),
            time: 0.0,
            result: StepResult::Working,
            new_calculation: false,
            extrema: None,
        }
    }

    /// Feed this tick's state back in as the next tick's current state — the
    /// standard per-cycle loop (§2).
    pub fn pass_to_request(&self, req: &mut crate::otg2::request::PositionRequest<DOF>) {
        req.current_position = self.new_position.clone();
        req.current_velocity = self.new_velocity.clone();
        req.current_acceleration = self.new_acceleration.clone();
    }
}

impl<const DOF: usize> Default for PositionResponse<DOF> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<const DOF: usize> fmt::Display for PositionResponse<DOF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "new_position = [{}]", join(self.new_position.deref(), true))?;
        writeln!(f, "new_velocity = [{}]", join(self.new_velocity.deref(), true))?;
        write!(f, "time = {}", self.time)
    }
}

#[derive(Debug, Clone)]
pub struct VelocityResponse<const DOF: usize> {
    pub degrees_of_freedom: usize,
    pub new_position: AxisData<f64, DOF>,
    pub new_velocity: AxisData<f64, DOF>,
    pub new_acceleration: AxisData<f64, DOF>,
    pub time: f64,
    pub result: StepResult,
    pub new_calculation: bool,
}

impl<const DOF: usize> VelocityResponse<DOF> {
    pub fn new(dofs: Option<usize>) -> Self {
        Self {
            degrees_of_freedom: dofs.unwrap_or(DOF),
            new_position: AxisData::new(dofs, 0.0),
            new_velocity: AxisData::new(dofs, 0.0),
            new_acceleration: AxisData::new(dofs, 0.0),
            time: 0.0,
            result: StepResult::Working,
            new_calculation: false,
        }
    }
}

impl<const DOF: usize> Default for VelocityResponse<DOF> {
    fn default() -> Self {
        Self::new(None)
    }
}
