//! Position-mode orchestrator (§4.8): the full three-layer kernel. Layer 3 runs
//! [`PositionStep1`]/[`PositionStep2`] with phase- or time-synchronization; if any axis
//! has no feasible position profile, Layer 2 falls back to the [`VelocityGenerator`]
//! kernel (ramping every axis to its target velocity instead of its target position);
//! Layer 1 is a constant-acceleration coast used only if Layer 2 itself cannot produce
//! a profile (which does not happen for finite acceleration limits, but is kept as the
//! terminal fallback so `update` always returns a profile rather than failing closed).
//!
//! Grounded on the teacher's `calculator_target.rs` for the brake-then-boundary setup
//! per axis and on `ruckig.rs` for the cached-input `update` loop.

use core::marker::PhantomData;

use crate::otg2::alloc::format;
use crate::otg2::block::Block;
use crate::otg2::constants::{guarded_denominator, INPUT_UNCHANGED_TOLERANCE, MAX_SYNCHRONIZATION_TIME, TARGET_EQUALS_CURRENT_PERTURBATION};
use crate::otg2::error::{ErrorHandler, Otg2Error};
use crate::otg2::phase_sync;
use crate::otg2::request::{DurationDiscretization, FinalStatePolicy, PositionRequest, Synchronization, VelocityRequest};
use crate::otg2::response::PositionResponse;
use crate::otg2::result::StepResult;
use crate::otg2::segment::AxisProfile;
use crate::otg2::step1::PositionStep1;
use crate::otg2::step2::PositionStep2;
use crate::otg2::synchronizer::Synchronizer;
use crate::otg2::trajectory::Trajectory;
use crate::otg2::util::AxisData;
use crate::otg2::velocity_generator::VelocityGenerator;

pub struct PositionGenerator<const DOF: usize, E: ErrorHandler> {
    degrees_of_freedom: usize,
    delta_time: f64,
    trajectory: Trajectory<DOF>,
    time: f64,
    initialized: bool,
    last_current_position: AxisData<f64, DOF>,
    last_current_velocity: AxisData<f64, DOF>,
    last_target_position: AxisData<f64, DOF>,
    last_target_velocity: AxisData<f64, DOF>,
    synchronizer: Synchronizer<DOF>,
    velocity_fallback: VelocityGenerator<DOF, E>,
    degraded: bool,
    reached_final_state_last_tick: bool,
    _error_handler: PhantomData<E>,
}

impl<const DOF: usize, E: ErrorHandler> PositionGenerator<DOF, E> {
    pub fn new(dofs: Option<usize>, delta_time: f64) -> Self {
        let n = dofs.unwrap_or(DOF);
        Self {
            degrees_of_freedom: n,
            delta_time,
            trajectory: Trajectory::new(Some(n)),
            time: 0.0,
            initialized: false,
            last_current_position: AxisData::new(Some(n), 0.0),
            last_current_velocity: AxisData::new(Some(n), 0.0),
            last_target_position: AxisData::new(Some(n), 0.0),
            last_target_velocity: AxisData::new(Some(n), 0.0),
            synchronizer: Synchronizer::new(n),
            velocity_fallback: VelocityGenerator::new(Some(n), delta_time),
            degraded: false,
            reached_final_state_last_tick: false,
            _error_handler: PhantomData,
        }
    }

    /// Whether the previous tick fell back to Safety Layer 2 or 1.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    fn input_unchanged(&self, req: &PositionRequest<DOF>) -> bool {
        (0..self.degrees_of_freedom).all(|dof| {
            (self.last_current_position[dof] - req.current_position[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
                && (self.last_current_velocity[dof] - req.current_velocity[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
                && (self.last_target_position[dof] - req.target_position[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
                && (self.last_target_velocity[dof] - req.target_velocity[dof]).abs() < INPUT_UNCHANGED_TOLERANCE
        })
    }

    /// Layer 3: the full position kernel, phase- or time-synchronized.
    fn calculate_position(&mut self, req: &PositionRequest<DOF>) -> Result<StepResult, Otg2Error> {
        if let Some(phase) = phase_sync::detect(req) {
            return self.calculate_phase_synced(req, &phase.scale, phase.reference_dof);
        }

        let wants_phase_only =
            (0..self.degrees_of_freedom).any(|d| req.enabled[d] && req.synchronization_of(d) == Synchronization::PhaseOnly);
        if wants_phase_only {
            return Ok(StepResult::PhaseSyncNotPossible);
        }

        self.calculate_time_synced(req)
    }

    fn setup_axis(&mut self, req: &PositionRequest<DOF>, dof: usize) {
        let v_max = req.max_velocity[dof];
        let v_min = req.min_velocity_of(dof);
        let a_max = req.max_acceleration[dof];
        let a_min = req.min_acceleration_of(dof);

        let p = &mut self.trajectory.profiles[dof];
        p.brake.compute_position_brake(req.current_velocity[dof], v_max, v_min, a_max, a_min);

        let (mut p0, mut v0, mut a0) = (req.current_position[dof], req.current_velocity[dof], req.current_acceleration[dof]);
        p.brake.finalize(&mut p0, &mut v0, &mut a0);

        let mut pf = req.target_position[dof];
        if (pf - p0).abs() < TARGET_EQUALS_CURRENT_PERTURBATION && (req.target_velocity[dof] - v0).abs() < TARGET_EQUALS_CURRENT_PERTURBATION {
            pf += TARGET_EQUALS_CURRENT_PERTURBATION;
        }

        p.set_boundary(p0, v0, a0, pf, req.target_velocity[dof], req.target_acceleration[dof]);
    }

    fn calculate_time_synced(&mut self, req: &PositionRequest<DOF>) -> Result<StepResult, Otg2Error> {
        let mut blocks = AxisData::<Block, DOF>::new(Some(self.degrees_of_freedom), Block::default());
        let mut synchronization = AxisData::<Synchronization, DOF>::new(Some(self.degrees_of_freedom), Synchronization::default());

        for dof in 0..self.degrees_of_freedom {
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
                p.t = [0.0; 7];
                p.t_sum = [0.0; 7];
                p.v = [req.current_velocity[dof]; 8];
                p.p = [req.current_position[dof]; 8];
                p.a = [req.current_acceleration[dof]; 8];
                blocks[dof].set_min_profile(p);
                continue;
            }
            synchronization[dof] = req.synchronization_of(dof);

            self.setup_axis(req, dof);
            let p = &self.trajectory.profiles[dof];
            let input_snapshot = p.clone();

            let mut step1 = PositionStep1::new(
                p.p[0],
                p.v[0],
                p.pf,
                p.vf,
                req.max_velocity[dof],
                req.min_velocity_of(dof),
                req.max_acceleration[dof],
                req.min_acceleration_of(dof),
            );
            if !step1.get_profile(&input_snapshot, &mut blocks[dof]) {
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
            if synchronization[dof] == Synchronization::None {
                // Unsynchronized axis: keep its own minimum-time Step-1 profile rather
                // than stretching it to t_sync (§3 "none: each axis independently").
                self.trajectory.profiles[dof] = blocks[dof].p_min.clone();
                continue;
            }
            let p = &self.trajectory.profiles[dof];
            let tf = t_sync - p.brake.duration;
            let mut step2 = PositionStep2::new(
                tf,
                p.p[0],
                p.v[0],
                p.pf,
                p.vf,
                req.max_velocity[dof],
                req.min_velocity_of(dof),
                req.max_acceleration[dof],
                req.min_acceleration_of(dof),
            );
            let mut profile = AxisProfile::default();
            profile.set_boundary_from(p);
            if step2.get_profile(&mut profile) {
                self.trajectory.profiles[dof] = profile;
            }
        }

        // An axis left unsynchronized (§3 "none") keeps its own minimum-time duration,
        // which can run past t_sync; the tick isn't FinalStateReached until every
        // enabled axis, synced or not, has actually arrived.
        self.trajectory.duration = (0..self.degrees_of_freedom)
            .filter(|&d| req.enabled[d])
            .map(|d| {
                let p = &self.trajectory.profiles[d];
                p.brake.duration + p.t_sum.last().copied().unwrap_or(0.0)
            })
            .fold(t_sync, f64::max);
        Ok(StepResult::Working)
    }

    /// Every phase-synced axis's motion is `scale[dof]` times the reference axis's
    /// profile (§4.5): solve Step 1/2 once for the reference, then stretch the rest.
    fn calculate_phase_synced(&mut self, req: &PositionRequest<DOF>, scale: &AxisData<f64, DOF>, reference_dof: usize) -> Result<StepResult, Otg2Error> {
        self.setup_axis(req, reference_dof);
        let reference = self.trajectory.profiles[reference_dof].clone();

        let mut block = Block::default();
        let mut step1 = PositionStep1::new(
            reference.p[0],
            reference.v[0],
            reference.pf,
            reference.vf,
            req.max_velocity[reference_dof],
            req.min_velocity_of(reference_dof),
            req.max_acceleration[reference_dof],
            req.min_acceleration_of(reference_dof),
        );
        if !step1.get_profile(&reference, &mut block) {
            return Ok(StepResult::PhaseSyncNotPossible);
        }

        let t_sync = block.t_min;
        if t_sync > MAX_SYNCHRONIZATION_TIME {
            return Ok(StepResult::ExecutionTimeTooBig);
        }
        self.trajectory.profiles[reference_dof] = block.p_min.clone();

        for dof in 0..self.degrees_of_freedom {
            if dof == reference_dof {
                continue;
            }
            if !req.enabled[dof] {
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
                continue;
            }
            let s = scale[dof];
            let mut p = block.p_min.clone();
            p.set_boundary(
                req.current_position[dof],
                req.current_velocity[dof],
                req.current_acceleration[dof],
                req.target_position[dof],
                req.target_velocity[dof],
                req.target_acceleration[dof],
            );
            for v in p.a.iter_mut() {
                *v *= s;
            }
            for v in p.v.iter_mut() {
                *v *= s;
            }
            for (i, v) in p.p.iter_mut().enumerate() {
                *v = req.current_position[dof] + s * (block.p_min.p[i] - block.p_min.p[0]);
            }
            self.trajectory.profiles[dof] = p;
        }

        self.trajectory.duration = t_sync;
        Ok(StepResult::Working)
    }

    /// Layer 2: delegate entirely to the velocity kernel, ramping toward a safe target
    /// velocity (§4.8) rather than the original target position. Precedence: a
    /// caller-supplied `fallback_target_velocity` wins outright; otherwise coast at the
    /// current velocity if `keep_current_velocity_in_case_of_fallback_strategy` is set;
    /// otherwise decelerate to a stop (`v_target := 0`).
    fn calculate_velocity_fallback(&mut self, req: &PositionRequest<DOF>) -> Result<StepResult, Otg2Error> {
        let fallback_target_velocity = req.fallback_target_velocity.clone().unwrap_or_else(|| {
            if req.keep_current_velocity_in_case_of_fallback_strategy {
                req.current_velocity.clone()
            } else {
                AxisData::new(Some(self.degrees_of_freedom), 0.0)
            }
        });

        let mut vreq = VelocityRequest::<DOF>::new(Some(self.degrees_of_freedom));
        vreq.synchronization = Synchronization::None;
        vreq.duration_discretization = req.duration_discretization;
        vreq.current_position = req.current_position.clone();
        vreq.current_velocity = req.current_velocity.clone();
        vreq.current_acceleration = req.current_acceleration.clone();
        vreq.target_velocity = fallback_target_velocity.clone();
        vreq.target_acceleration = req.target_acceleration.clone();
        vreq.max_acceleration = req.max_acceleration.clone();
        vreq.min_acceleration = req.min_acceleration.clone();
        vreq.enabled = req.enabled.clone();

        let mut vresp = crate::otg2::response::VelocityResponse::<DOF>::new(Some(self.degrees_of_freedom));
        let result = self.velocity_fallback.update(&vreq, &mut vresp)?;
        if result.is_error() {
            return Ok(result);
        }

        for dof in 0..self.degrees_of_freedom {
            let mut p = AxisProfile::default();
            p.set_boundary(
                req.current_position[dof],
                req.current_velocity[dof],
                req.current_acceleration[dof],
                vresp.new_position[dof],
                fallback_target_velocity[dof],
                req.target_acceleration[dof],
            );
            p.t[1] = self.delta_time.max(guarded_denominator(0.0));
            p.a[1] = 0.0;
            p.t_sum = [self.delta_time; 7];
            self.trajectory.profiles[dof] = p;
        }
        self.trajectory.duration = self.delta_time;
        Ok(StepResult::Working)
    }

    /// Layer 1: freeze acceleration at zero and coast at the current velocity — used
    /// only if Layer 2 itself could not produce a profile.
    fn calculate_zero_acceleration_coast(&mut self, req: &PositionRequest<DOF>) {
        for dof in 0..self.degrees_of_freedom {
            let mut p = AxisProfile::default();
            p.set_boundary(
                req.current_position[dof],
                req.current_velocity[dof],
                0.0,
                req.current_position[dof] + req.current_velocity[dof] * self.delta_time,
                req.current_velocity[dof],
                0.0,
            );
            p.t = [0.0, self.delta_time, 0.0, 0.0, 0.0, 0.0, 0.0];
            p.t_sum = [0.0, self.delta_time, self.delta_time, self.delta_time, self.delta_time, self.delta_time, self.delta_time];
            p.v = [req.current_velocity[dof]; 8];
            p.p[0] = req.current_position[dof];
            p.p[1] = p.pf;
            self.trajectory.profiles[dof] = p;
        }
        self.trajectory.duration = self.delta_time;
    }

    fn calculate(&mut self, req: &PositionRequest<DOF>) -> Result<StepResult, Otg2Error> {
        req.validate::<E>()?;
        self.degraded = false;

        let result = self.calculate_position(req)?;
        if !result.is_error() {
            return Ok(result);
        }

        self.degraded = true;
        E::handle_calculator_error(&format!("position kernel degraded to velocity fallback: {:?}", result))?;

        let fallback_result = self.calculate_velocity_fallback(req)?;
        if !fallback_result.is_error() {
            return Ok(fallback_result);
        }

        E::handle_calculator_error("velocity fallback degraded to zero-acceleration coast")?;
        self.calculate_zero_acceleration_coast(req);
        Ok(StepResult::Working)
    }

    pub fn update(&mut self, req: &PositionRequest<DOF>, resp: &mut PositionResponse<DOF>) -> Result<StepResult, Otg2Error> {
        resp.new_calculation = false;

        // `recompute_trajectory` (§4.8) re-synthesizes a fresh trajectory toward the same
        // target every time the previous tick reported `FinalStateReached`, producing the
        // "bouncing" behavior of repeatedly re-arriving at rest instead of just coasting.
        let bounce = self.initialized
            && self.reached_final_state_last_tick
            && req.final_state_policy == FinalStatePolicy::RecomputeTrajectory;

        if !self.initialized || bounce || !self.input_unchanged(req) {
            let result = self.calculate(req)?;
            if result.is_error() {
                resp.result = result;
                return Ok(result);
            }
            self.time = 0.0;
            self.initialized = true;
            resp.new_calculation = true;
            self.last_current_position = req.current_position.clone();
            self.last_current_velocity = req.current_velocity.clone();
            self.last_target_position = req.target_position.clone();
            self.last_target_velocity = req.target_velocity.clone();
        }

        self.time += self.delta_time;
        self.trajectory
            .sample_at(self.time, &mut resp.new_position, &mut resp.new_velocity, &mut resp.new_acceleration);
        resp.time = self.time;
        resp.extrema = req.enable_extremum_analysis.then(|| self.trajectory.extrema());
        resp.trajectory = self.trajectory.clone();

        resp.result = if !self.degraded && self.time >= self.trajectory.duration {
            StepResult::FinalStateReached
        } else {
            StepResult::Working
        };
        self.reached_final_state_last_tick = resp.result == StepResult::FinalStateReached;
        Ok(resp.result)
    }
}
