use otg2::prelude::*;

use float_eq::assert_float_eq;

fn almost_equal_vecs(a: &[f64], b: &[f64], epsilon: f64) {
    assert_eq!(a.len(), b.len(), "length mismatch: left has {}, right has {}", a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        assert!(
            (x - y).abs() <= epsilon,
            "values at index {} differ: left = {}, right = {}, difference = {}",
            i,
            x,
            y,
            (x - y).abs()
        );
    }
}

#[test]
fn single_dof_reaches_target_and_holds() {
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.005);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.target_position = axis_stack![1.0];
    request.max_velocity = axis_stack![1.0];
    request.max_acceleration = axis_stack![1.0];

    let mut last_result = StepResult::Working;
    let mut ticks = 0;
    while last_result == StepResult::Working {
        last_result = otg.update(&request, &mut response).unwrap();
        response.pass_to_request(&mut request);
        ticks += 1;
        assert!(ticks < 100_000, "trajectory never converged");
    }

    assert_eq!(last_result, StepResult::FinalStateReached);
    assert_float_eq!(response.new_position[0], 1.0, abs <= 1e-6);
    assert_float_eq!(response.new_velocity[0], 0.0, abs <= 1e-6);

    // Holding policy: calling again with the same (now-target) state keeps reporting
    // FinalStateReached rather than recomputing (§4.8 Layer 3 fast path, default Hold).
    let held = otg.update(&request, &mut response).unwrap();
    assert_eq!(held, StepResult::FinalStateReached);
}

#[test]
fn per_tick_bounds_are_respected() {
    let cycle = 0.01;
    let v_max = 3.0;
    let a_max = 5.0;
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, cycle);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.current_position = axis_stack![2.0];
    request.current_velocity = axis_stack![-1.0];
    request.target_position = axis_stack![-7.0];
    request.target_velocity = axis_stack![0.5];
    request.max_velocity = axis_stack![v_max];
    request.max_acceleration = axis_stack![a_max];

    let mut result = StepResult::Working;
    let mut steps = 0;
    while result == StepResult::Working {
        let p_in = response.new_position[0];
        let v_in = response.new_velocity[0];
        result = otg.update(&request, &mut response).unwrap();
        let p_out = response.new_position[0];
        let v_out = response.new_velocity[0];

        // Invariant 1/2/3/4 (§8): bounded per-tick displacement, velocity change and limits.
        assert!((p_out - p_in).abs() <= v_max * cycle + 0.5 * a_max * cycle * cycle + 1e-9);
        assert!((v_out - v_in).abs() <= a_max * cycle * (1.0 + 1e-6));
        assert!(v_out.abs() <= v_max * (1.0 + 1e-6));
        assert!(response.new_acceleration[0].abs() <= a_max * (1.0 + 1e-6));

        response.pass_to_request(&mut request);
        steps += 1;
        assert!(steps < 100_000, "trajectory never converged");
    }
    assert_eq!(result, StepResult::FinalStateReached);
}

#[test]
fn three_dof_time_sync_reaches_target_together() {
    // S1 — position, basic (spec scenario).
    let mut otg = PositionGenerator::<3, ThrowErrorHandler>::new(None, 0.005);
    let mut request = PositionRequest::<3>::new(None);
    let mut response = PositionResponse::<3>::new(None);

    request.current_position = axis_stack![100.0, 0.0, 50.0];
    request.current_velocity = axis_stack![100.0, -220.0, -50.0];
    request.target_position = axis_stack![-600.0, -200.0, -350.0];
    request.target_velocity = axis_stack![50.0, -50.0, -200.0];
    request.max_velocity = axis_stack![300.0, 100.0, 300.0];
    request.max_acceleration = axis_stack![300.0, 200.0, 100.0];
    request.synchronization = Synchronization::TimeOnly;

    let mut last_result = StepResult::Working;
    let mut last_time = 0.0;
    while last_result == StepResult::Working {
        last_result = otg.update(&request, &mut response).unwrap();
        last_time = response.time;
        response.pass_to_request(&mut request);
    }

    assert_eq!(last_result, StepResult::FinalStateReached);
    assert_float_eq!(last_time, 3.903, abs <= 0.05);
    almost_equal_vecs(&response.new_position, &[-600.0, -200.0, -350.0], 1e-6);
}

#[test]
fn phase_sync_possible_produces_straight_line_path() {
    // S3 — phase-sync possible: position delta, current velocity and target velocity
    // are all collinear with (1, 1, 0).
    let mut otg = PositionGenerator::<3, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<3>::new(None);
    let mut response = PositionResponse::<3>::new(None);

    request.current_position = axis_stack![0.0, 0.0, 0.0];
    request.current_velocity = axis_stack![1.0, 1.0, 0.0];
    request.target_position = axis_stack![4.0, 4.0, 0.0];
    request.target_velocity = axis_stack![0.5, 0.5, 0.0];
    request.max_velocity = axis_stack![5.0, 5.0, 5.0];
    request.max_acceleration = axis_stack![5.0, 5.0, 5.0];

    let mut result = StepResult::Working;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        assert!(!otg.is_degraded(), "phase sync should be possible for a collinear setup");
        // Invariant 7 (§8): p0 == p1 at every intermediate tick for this configuration.
        assert_float_eq!(response.new_position[0], response.new_position[1], abs <= 1e-6);
        response.pass_to_request(&mut request);
    }
    assert_eq!(result, StepResult::FinalStateReached);
    assert_float_eq!(response.new_position[2], 0.0, abs <= 1e-9);
}

#[test]
fn phase_only_reports_not_possible_when_non_collinear() {
    let mut otg = PositionGenerator::<2, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<2>::new(None);
    let mut response = PositionResponse::<2>::new(None);

    request.current_position = axis_stack![0.0, 0.0];
    request.target_position = axis_stack![1.0, 2.0];
    request.current_velocity = axis_stack![0.0, 1.0];
    request.target_velocity = axis_stack![0.0, 0.0];
    request.max_velocity = axis_stack![3.0, 3.0];
    request.max_acceleration = axis_stack![3.0, 3.0];
    request.synchronization = Synchronization::PhaseOnly;

    let result = otg.update(&request, &mut response).unwrap();
    assert_eq!(result, StepResult::PhaseSyncNotPossible);
}

#[test]
fn unsynchronized_axes_run_independently() {
    // Synchronization::None: each enabled axis keeps its own minimum-time profile and
    // the trajectory only finishes once every axis has actually arrived.
    let mut otg = PositionGenerator::<2, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<2>::new(None);
    let mut response = PositionResponse::<2>::new(None);

    request.target_position = axis_stack![1.0, 10.0];
    request.max_velocity = axis_stack![2.0, 2.0];
    request.max_acceleration = axis_stack![2.0, 2.0];
    request.synchronization = Synchronization::None;

    let mut result = StepResult::Working;
    let mut fast_axis_arrival: Option<f64> = None;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        if fast_axis_arrival.is_none() && (response.new_position[0] - 1.0).abs() < 1e-6 {
            fast_axis_arrival = Some(response.time);
        }
        response.pass_to_request(&mut request);
    }

    assert_eq!(result, StepResult::FinalStateReached);
    let arrival = fast_axis_arrival.expect("short axis should have reached its target before the long one");
    assert!(arrival < response.time - 1e-6, "axis 0 should finish well before axis 1 under Synchronization::None");
}

#[test]
fn disabled_axis_holds_still() {
    let mut otg = PositionGenerator::<2, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<2>::new(None);
    let mut response = PositionResponse::<2>::new(None);

    request.current_position = axis_stack![5.0, 5.0];
    request.target_position = axis_stack![5.0, 10.0];
    request.max_velocity = axis_stack![2.0, 2.0];
    request.max_acceleration = axis_stack![2.0, 2.0];
    request.enabled = axis_stack![false, true];

    let mut result = StepResult::Working;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        assert_float_eq!(response.new_position[0], 5.0, abs <= 1e-9);
        assert_float_eq!(response.new_velocity[0], 0.0, abs <= 1e-9);
        response.pass_to_request(&mut request);
    }
    assert_eq!(result, StepResult::FinalStateReached);
}

#[test]
fn velocity_generator_ramps_to_target_velocity() {
    // S2 — velocity, basic.
    let mut otg = VelocityGenerator::<3, ThrowErrorHandler>::new(None, 0.01);
    let mut request = VelocityRequest::<3>::new(None);
    let mut response = VelocityResponse::<3>::new(None);

    request.current_position = axis_stack![-200.0, 100.0, -300.0];
    request.current_velocity = axis_stack![-150.0, 100.0, 50.0];
    request.target_velocity = axis_stack![150.0, 75.0, 100.0];
    request.max_acceleration = axis_stack![500.0, 500.0, 1000.0];

    let mut result = StepResult::Working;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        request.current_position = response.new_position.clone();
        request.current_velocity = response.new_velocity.clone();
        request.current_acceleration = response.new_acceleration.clone();
    }

    assert_eq!(result, StepResult::FinalStateReached);
    almost_equal_vecs(&response.new_velocity, &[150.0, 75.0, 100.0], 1e-6);
}

#[test]
fn velocity_request_rejects_phase_only() {
    let mut otg = VelocityGenerator::<2, ThrowErrorHandler>::new(None, 0.01);
    let mut request = VelocityRequest::<2>::new(None);
    let mut response = VelocityResponse::<2>::new(None);

    request.target_velocity = axis_stack![1.0, 2.0];
    request.max_acceleration = axis_stack![1.0, 1.0];
    request.synchronization = Synchronization::PhaseOnly;

    let result = otg.update(&request, &mut response).unwrap();
    assert_eq!(result, StepResult::NoPhaseSyncPossibleInVelocityMode);
}

#[test]
fn zero_acceleration_limit_falls_back_to_safety_layer() {
    // S5 — safety layer 1: a_max = 0 on the only selected axis leaves the position
    // kernel with no feasible profile, so the orchestrator degrades all the way down
    // to the zero-acceleration coast.
    let mut otg = PositionGenerator::<1, IgnoreErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.current_position = axis_stack![0.0];
    request.current_velocity = axis_stack![2.0];
    request.target_position = axis_stack![100.0];
    request.max_velocity = axis_stack![5.0];
    request.max_acceleration = axis_stack![0.0];

    let result = otg.update(&request, &mut response).unwrap();
    assert_eq!(result, StepResult::Working);
    assert!(otg.is_degraded());
    assert_float_eq!(response.new_position[0], 0.02, abs <= 1e-9);
    assert_float_eq!(response.new_velocity[0], 2.0, abs <= 1e-9);
    assert_float_eq!(response.new_acceleration[0], 0.0, abs <= 1e-9);
}

#[test]
fn target_equals_current_is_final_state_immediately() {
    // S6 — target equals current.
    let mut otg = PositionGenerator::<2, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<2>::new(None);
    let mut response = PositionResponse::<2>::new(None);

    request.current_position = axis_stack![3.0, -1.0];
    request.target_position = axis_stack![3.0, -1.0];
    request.max_velocity = axis_stack![1.0, 1.0];
    request.max_acceleration = axis_stack![1.0, 1.0];

    let result = otg.update(&request, &mut response).unwrap();
    assert_eq!(result, StepResult::FinalStateReached);
    assert_float_eq!(response.new_position[0], 3.0, abs <= 1e-9);
    assert_float_eq!(response.new_position[1], -1.0, abs <= 1e-9);
}

#[test]
fn recompute_trajectory_policy_bounces_at_the_target() {
    // S6, second half — `RecomputeTrajectory` keeps re-synthesizing a fresh trajectory
    // toward the same target once it's reached, instead of just coasting there forever.
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.target_position = axis_stack![2.0];
    request.max_velocity = axis_stack![1.0];
    request.max_acceleration = axis_stack![1.0];
    request.final_state_policy = FinalStatePolicy::RecomputeTrajectory;

    let mut reached_final_state_twice = false;
    let mut saw_new_calculation_after_first_arrival = false;
    let mut first_arrival_tick = None;
    for tick in 0..400 {
        let result = otg.update(&request, &mut response).unwrap();
        if result == StepResult::FinalStateReached {
            if first_arrival_tick.is_none() {
                first_arrival_tick = Some(tick);
            } else if !reached_final_state_twice {
                reached_final_state_twice = true;
            }
        }
        if first_arrival_tick.is_some() && tick > first_arrival_tick.unwrap() && response.new_calculation {
            saw_new_calculation_after_first_arrival = true;
        }
        if reached_final_state_twice && saw_new_calculation_after_first_arrival {
            break;
        }
    }

    assert!(first_arrival_tick.is_some(), "never reached the target");
    assert!(saw_new_calculation_after_first_arrival, "no fresh trajectory was synthesized after arrival");
    assert!(reached_final_state_twice, "never bounced back to FinalStateReached a second time");
    assert_float_eq!(response.new_position[0], 2.0, abs <= 1e-6);
}

#[test]
fn idempotent_fast_path_reuses_cached_trajectory() {
    // Invariant 8 (§8): an unchanged input just keeps sampling the same trajectory.
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.target_position = axis_stack![5.0];
    request.max_velocity = axis_stack![1.0];
    request.max_acceleration = axis_stack![1.0];

    otg.update(&request, &mut response).unwrap();
    assert!(response.new_calculation);

    let mut p = AxisData::<f64, 1>::new(None, 0.0);
    let mut v = AxisData::<f64, 1>::new(None, 0.0);
    let mut a = AxisData::<f64, 1>::new(None, 0.0);
    response.trajectory.sample_at(0.02, &mut p, &mut v, &mut a);
    let p_at_2cycles = p[0];

    let second = otg.update(&request, &mut response).unwrap();
    assert!(!response.new_calculation, "identical input must not trigger recalculation");
    assert_eq!(second, StepResult::Working);
    assert_float_eq!(response.new_position[0], p_at_2cycles, abs <= 1e-9);
}

#[test]
fn extremum_analysis_reports_apex_state() {
    let mut otg = PositionGenerator::<2, ThrowErrorHandler>::new(None, 0.005);
    let mut request = PositionRequest::<2>::new(None);
    let mut response = PositionResponse::<2>::new(None);

    request.current_position = axis_stack![0.0, 0.0];
    request.current_velocity = axis_stack![2.0, 0.0];
    request.target_position = axis_stack![0.0, 1.0];
    request.max_velocity = axis_stack![3.0, 3.0];
    request.max_acceleration = axis_stack![4.0, 4.0];
    request.synchronization = Synchronization::TimeOnly;
    request.enable_extremum_analysis = true;

    otg.update(&request, &mut response).unwrap();
    let extrema = response.extrema.expect("extremum analysis was requested");
    // Axis 0 overshoots past its target (0.0) before braking back, so its maximum
    // must be strictly greater than both its start and target positions.
    let (min0, max0) = &extrema[0];
    assert!(max0.position > 0.0);
    assert!(min0.position <= 0.0 + 1e-9);
}

#[test]
fn validation_rejects_negative_limits() {
    let mut request = PositionRequest::<1>::new(None);
    request.max_acceleration = axis_stack![-1.0];
    let result = request.validate::<ThrowErrorHandler>();
    assert!(matches!(result, Err(Otg2Error::ValidationError(_))));
}

#[test]
fn ignore_error_handler_swallows_validation_errors() {
    let mut request = PositionRequest::<1>::new(None);
    request.max_velocity = axis_stack![f64::NAN];
    assert!(request.validate::<IgnoreErrorHandler>().is_ok());
}
