//! Per-tick input contracts (§3): the two-API split between position-controlled and
//! velocity-controlled motion, plus the shared enums that steer synchronization and
//! duration discretization.
//!
//! Grounded on the teacher's `input_parameter.rs`, split into two request types per the
//! spec's Design Notes instead of one `InputParameter` carrying a runtime
//! `control_interface` switch — the switch itself has no remaining use once the two
//! kernels are statically typed, so it isn't carried over.

use core::fmt;
use core::ops::Deref;

use crate::otg2::alloc::string::String;
use crate::otg2::error::{ErrorHandler, Otg2Error};
use crate::otg2::util::{join, AxisData};

/// How multiple axes are kept in lock-step (§4.4/§4.5).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Synchronization {
    /// Try phase synchronization first (§4.5); fall through to time synchronization
    /// when the input vectors are not collinear (default).
    #[default]
    PhaseIfPossible,
    /// Skip the phase-sync detector entirely: every enabled axis reaches its target
    /// at the same time, along its own (generally curved) path.
    TimeOnly,
    /// Every axis's profile must be a positive scalar multiple of one reference
    /// profile, producing straight-line motion in state space (§4.5); reports
    /// [`crate::otg2::result::StepResult::PhaseSyncNotPossible`] if the input vectors
    /// are not collinear rather than falling back to time synchronization.
    PhaseOnly,
    /// Each axis runs its own time-optimal profile independently, with no common
    /// synchronization time.
    None,
}

/// Whether the synchronized duration must land on a multiple of the control cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DurationDiscretization {
    #[default]
    Continuous,
    Discrete,
}

/// What happens once `cycle >= t_sync` (§3/§4.8).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FinalStatePolicy {
    /// Coast at `v_target` (holding position fixed when `v_target == 0`) until the
    /// caller changes the input (default).
    #[default]
    KeepTargetVelocity,
    /// After one `FinalStateReached` tick, the next `update` synthesizes a fresh
    /// trajectory toward the same target starting from the state just reached — the
    /// "bouncing" behavior of repeatedly re-arriving at rest.
    RecomputeTrajectory,
}

/// Request for the full position/velocity/acceleration kernel (§4.8 Layer 3).
#[derive(Debug, Clone)]
pub struct PositionRequest<const DOF: usize> {
    pub degrees_of_freedom: usize,
    pub synchronization: Synchronization,
    pub duration_discretization: DurationDiscretization,
    pub final_state_policy: FinalStatePolicy,

    pub current_position: AxisData<f64, DOF>,
    pub current_velocity: AxisData<f64, DOF>,
    pub current_acceleration: AxisData<f64, DOF>,
    pub target_position: AxisData<f64, DOF>,
    pub target_velocity: AxisData<f64, DOF>,
    pub target_acceleration: AxisData<f64, DOF>,

    pub max_velocity: AxisData<f64, DOF>,
    pub max_acceleration: AxisData<f64, DOF>,
    pub min_velocity: Option<AxisData<f64, DOF>>,
    pub min_acceleration: Option<AxisData<f64, DOF>>,

    pub enabled: AxisData<bool, DOF>,
    pub per_dof_synchronization: Option<AxisData<Synchronization, DOF>>,
    pub minimum_duration: Option<f64>,

    /// Opt in to §4.9's positional-extremum scan: after Step 2, report each axis's
    /// minimum/maximum position and the full co-existent state of every axis at the
    /// time it is reached. Off by default — it costs an extra pass over every segment.
    pub enable_extremum_analysis: bool,

    /// When Layer 2 (§4.8) is entered, ramp to the current velocity instead of the
    /// default `v_target := 0`, i.e. keep coasting rather than stopping.
    pub keep_current_velocity_in_case_of_fallback_strategy: bool,
    /// Caller-supplied alternative target velocity for Layer 2, overriding both the
    /// `v_target := 0` default and `keep_current_velocity_in_case_of_fallback_strategy`
    /// when present (§6 "optional alternative target velocity").
    pub fallback_target_velocity: Option<AxisData<f64, DOF>>,
}

impl<const DOF: usize> PositionRequest<DOF> {
    pub fn new(dofs: Option<usize>) -> Self {
        Self {
            degrees_of_freedom: dofs.unwrap_or(DOF),
            synchronization: Synchronization::default(),
            duration_discretization: DurationDiscretization::default(),
            final_state_policy: FinalStatePolicy::default(),
            current_position: AxisData::new(dofs, 0.0),
            current_velocity: AxisData::new(dofs, 0.0),
            current_acceleration: AxisData::new(dofs, 0.0),
            target_position: AxisData::new(dofs, 0.0),
            target_velocity: AxisData::new(dofs, 0.0),
            target_acceleration: AxisData::new(dofs, 0.0),
            max_velocity: AxisData::new(dofs, 0.0),
            max_acceleration: AxisData::new(dofs, f64::INFINITY),
            min_velocity: None,
            min_acceleration: None,
            enabled: AxisData::new(dofs, true),
            per_dof_synchronization: None,
            minimum_duration: None,
            enable_extremum_analysis: false,
            keep_current_velocity_in_case_of_fallback_strategy: false,
            fallback_target_velocity: None,
        }
    }

    pub fn min_velocity_of(&self, dof: usize) -> f64 {
        self.min_velocity.as_ref().map_or(-self.max_velocity[dof], |v| v[dof])
    }

    pub fn min_acceleration_of(&self, dof: usize) -> f64 {
        self.min_acceleration.as_ref().map_or(-self.max_acceleration[dof], |v| v[dof])
    }

    pub fn synchronization_of(&self, dof: usize) -> Synchronization {
        self.per_dof_synchronization.as_ref().map_or(self.synchronization, |v| v[dof])
    }

    /// Validate every axis's limits and boundary states (§3 edge cases).
    pub fn validate<E: ErrorHandler>(&self) -> Result<(), Otg2Error> {
        for dof in 0..self.degrees_of_freedom {
            let a_max = self.max_acceleration[dof];
            if a_max.is_nan() || a_max < 0.0 {
                E::handle_validation_error(&format!(
                    "maximum acceleration limit {} of axis {} must be >= 0",
                    a_max, dof
                ))?;
            }
            let a_min = self.min_acceleration_of(dof);
            if a_min.is_nan() || a_min > 0.0 {
                E::handle_validation_error(&format!(
                    "minimum acceleration limit {} of axis {} must be <= 0",
                    a_min, dof
                ))?;
            }
            let v_max = self.max_velocity[dof];
            if v_max.is_nan() || v_max < 0.0 {
                E::handle_validation_error(&format!(
                    "maximum velocity limit {} of axis {} must be >= 0",
                    v_max, dof
                ))?;
            }
            let v_min = self.min_velocity_of(dof);
            if v_min.is_nan() || v_min > 0.0 {
                E::handle_validation_error(&format!(
                    "minimum velocity limit {} of axis {} must be <= 0",
                    v_min, dof
                ))?;
            }
            for (name, value) in [
                ("current position", self.current_position[dof]),
                ("current velocity", self.current_velocity[dof]),
                ("current acceleration", self.current_acceleration[dof]),
                ("target position", self.target_position[dof]),
                ("target velocity", self.target_velocity[dof]),
                ("target acceleration", self.target_acceleration[dof]),
            ] {
                if value.is_nan() {
                    E::handle_validation_error(&format!("{} of axis {} must be a valid number", name, dof))?;
                }
            }
        }
        Ok(())
    }
}

impl<const DOF: usize> Default for PositionRequest<DOF> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<const DOF: usize> fmt::Display for PositionRequest<DOF> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "current_position = [{}]", join(self.current_position.deref(), true))?;
        writeln!(f, "current_velocity = [{}]", join(self.current_velocity.deref(), true))?;
        writeln!(f, "target_position = [{}]", join(self.target_position.deref(), true))?;
        write!(f, "target_velocity = [{}]", join(self.target_velocity.deref(), true))
    }
}

/// Request for the velocity-only kernel (§4.7), also used internally as Safety Layer 2.
#[derive(Debug, Clone)]
pub struct VelocityRequest<const DOF: usize> {
    pub degrees_of_freedom: usize,
    pub synchronization: Synchronization,
    pub duration_discretization: DurationDiscretization,

    pub current_position: AxisData<f64, DOF>,
    pub current_velocity: AxisData<f64, DOF>,
    pub current_acceleration: AxisData<f64, DOF>,
    pub target_velocity: AxisData<f64, DOF>,
    pub target_acceleration: AxisData<f64, DOF>,

    pub max_acceleration: AxisData<f64, DOF>,
    pub min_acceleration: Option<AxisData<f64, DOF>>,

    pub enabled: AxisData<bool, DOF>,
    pub minimum_duration: Option<f64>,
}

impl<const DOF: usize> VelocityRequest<DOF> {
    pub fn new(dofs: Option<usize>) -> Self {
        Self {
            degrees_of_freedom: dofs.unwrap_or(DOF),
            synchronization: Synchronization::default(),
            duration_discretization: DurationDiscretization::default(),
            current_position: AxisData::new(dofs, 0.0),
            current_velocity: AxisData::new(dofs, 0.0),
            current_acceleration: AxisData::new(dofs, 0.0),
            target_velocity: AxisData::new(dofs, 0.0),
            target_acceleration: AxisData::new(dofs, 0.0),
            max_acceleration: AxisData::new(dofs, f64::INFINITY),
            min_acceleration: None,
            enabled: AxisData::new(dofs, true),
            minimum_duration: None,
        }
    }

    pub fn min_acceleration_of(&self, dof: usize) -> f64 {
        self.min_acceleration.as_ref().map_or(-self.max_acceleration[dof], |v| v[dof])
    }
}

impl<const DOF: usize> Default for VelocityRequest<DOF> {
    fn default() -> Self {
        Self::new(None)
    }
}
