//! Velocity-mode orchestrator (§4.8, velocity interface): drives [`VelocityStep1`]/
//! [`VelocityStep2`] and the [`Synchronizer`] to produce a ramp from the current
//! velocity to the target velocity on every axis, synchronized in time.
//!
//! Grounded on the teacher's `ruckig.rs` for the `new`/`validate`/`calculate`/`update`
//! shape (renamed and made generic over `DOF`), and on `calculator_target.rs` for how
//! Step 1 results feed the synchronizer and Step 2.

use core::marker::PhantomData;

use crate::otg2::alloc::format;
use crate::otg2::block::Block;
use crate::otg2::constants::{INPUT_UNCHANGED_TOLERANCE, MAX_SYNCHRONIZATION_TIME};
use crate::otg2::error::{ErrorHandler, Otg2Error};
use crate::otg2::request::{DurationDiscretization, Synchronization, VelocityRequest};
use crate::otg2::response::VelocityResponse;
use crate::otg2::result::StepResult;
use crate::otg2::segment::AxisProfile;
use crate::otg2::synchronizer::Synchronizer;
use crate::otg2::trajectory::Trajectory;
use crate::otg2::util::AxisData;
use crate::otg2::velocity_kernel::{VelocityStep1, VelocityStep2};

pub struct VelocityGenerator<const DOF: usize, E: ErrorHandler> {
    degrees_of_freedom: usize,
    delta_time: f64,
    trajectory: Trajectory<DOF>,
    time: f64,
    initialized: bool,
    last_current_velocity: AxisData<f64, DOF>,
    last_target_velocity: AxisData<f64, DOF>,
    synchronizer: Synchronizer<DOF>,
    _error_handler: PhantomData<E>,
}

impl<const DOF: usize, E: ErrorHandler> VelocityGenerator<DOF, E> {
    pub fn new(dofs: Option<usize>, delta_time: f64) -> Self {
        let n = dofs.unwrap_or(DOF);
        Self {
            degrees_of_freedom: n,
            delta_time,
            trajectory: Trajectory::new(Some(n)),
            time: 0.0,
            initialized: false,
            last_current_velocity: AxisData::new(Some(n), 0.0),
            last_target_velocity: AxisData::new(Some(n), 0.0),
            synchronizer: Synchronizer::new(n),
            _error_handler: PhantomData,
        }
    }

    fn input_unchanged(&self, req: &VelocityRequest<DOF>) -> bool {
        (0..self.degrees_of_freedom).all(|dof| {
            (self.last_current_velocity[dof] - req.current_velocity[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
                && (self.last_target_velocity[dof] - req.target_velocity[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
        })
    }

    fn calculate(&mut self, req: &VelocityRequest<DOF>) -> Result<StepResult, Otg2Error> {
        let mut blocks = AxisData::<Block, DOF>::new(Some(self.degrees_of_freedom), Block::default());
        let mut synchronization = AxisData::<Synchronization, DOF>::new(Some(self.degrees_of_freedom), Synchronization::default());

        if req.synchronization == Synchronization::PhaseOnly {
            return Ok(StepResult::NoPhaseSyncPossibleInVelocityMode);
        }

        for dof in 0..self.degrees_of_freedom {
            synchronization[dof] = req.synchronization;

            if !req.enabled[dof] {
                synchronization[dof] = Synchronization::None;
                let p = &mut self.trajectory.profiles[dof];
                *p = AxisProfile::default();
                p.set_boundary(
                    req.current_position[dof],
                    req.current_velocity[dof],
                    req.current_acceleration[dof],
                    req.current_position[dof],
                    req.current_velocity[dof],
                    req.current_acceleration[dof],
                );
                p.v = [req.current_velocity[dof]; 8];
                p.p = [req.current_position[dof]; 8];
                p.a = [req.current_acceleration[dof]; 8];
                blocks[dof].set_min_profile(p);
                continue;
            }

            let p = &mut self.trajectory.profiles[dof];
            p.brake.compute_velocity_brake();
            p.set_boundary(
                req.current_position[dof],
                req.current_velocity[dof],
                req.current_acceleration[dof],
                0.0,
                req.target_velocity[dof],
                req.target_acceleration[dof],
            );

            let mut step1 = VelocityStep1::new(
                req.current_velocity[dof],
                req.target_velocity[dof],
                req.max_acceleration[dof],
                req.min_acceleration_of(dof),
            );
            if !step1.get_profile(p, &mut blocks[dof]) {
                E::handle_calculator_error(&format!("axis {} has no feasible velocity profile", dof))?;
                return Ok(StepResult::InvalidInput);
            }
        }

        let discrete = req.duration_discretization == DurationDiscretization::Discrete;
        let (t_sync, limiting_dof) = match self.synchronizer.synchronize(
            &blocks,
            &synchronization,
            req.minimum_duration,
            &mut self.trajectory.profiles,
            discrete,
            self.delta_time,
        ) {
            Some(s) => s,
            None => return Ok(StepResult::SynchronizationFailure),
        };

        if t_sync > MAX_SYNCHRONIZATION_TIME {
            return Ok(StepResult::ExecutionTimeTooBig);
        }

        for dof in 0..self.degrees_of_freedom {
            if !req.enabled[dof] || Some(dof) == limiting_dof {
                continue;
            }
            let tf = t_sync - self.trajectory.profiles[dof].brake.duration;
            let mut step2 = VelocityStep2::new(
                tf,
                req.current_velocity[dof],
                req.target_velocity[dof],
                req.max_acceleration[dof],
                req.min_acceleration_of(dof),
            );
            let mut profile = AxisProfile::default();
            profile.set_boundary_from(&self.trajectory.profiles[dof]);
            if step2.get_profile(&mut profile) {
                self.trajectory.profiles[dof] = profile;
            }
        }

        self.trajectory.duration = t_sync;
        self.last_current_velocity = req.current_velocity.clone();
        self.last_target_velocity = req.target_velocity.clone();
        Ok(StepResult::Working)
    }

    /// Advance one control cycle: recompute the ramp if the request changed since the
    /// last tick, then sample the trajectory at the new time.
    pub fn update(&mut self, req: &VelocityRequest<DOF>, resp: &mut VelocityResponse<DOF>) -> Result<StepResult, Otg2Error> {
        resp.new_calculation = false;

        if !self.initialized || !self.input_unchanged(req) {
            let result = self.calculate(req)?;
            if result.is_error() {
                resp.result = result;
                return Ok(result);
            }
            self.time = 0.0;
            self.initialized = true;
            resp.new_calculation = true;
        }

        self.time += self.delta_time;
        self.trajectory
            .sample_at(self.time, &mut resp.new_position, &mut resp.new_velocity, &mut resp.new_acceleration);
        resp.time = self.time;

        resp.result = if self.time >= self.trajectory.duration {
            StepResult::FinalStateReached
        } else {
            StepResult::Working
        };
        Ok(resp.result)
    }
}
