use float_eq::assert_float_eq;
use otg2::prelude::*;

/// Drive `otg` to completion and assert the synchronized duration matches `duration`.
fn check_full_duration<const DOF: usize, E: ErrorHandler>(
    otg: &mut PositionGenerator<DOF, E>,
    request: &mut PositionRequest<DOF>,
    duration: f64,
) {
    let mut response = PositionResponse::new(None);
    let mut result = StepResult::Working;
    let mut last_time = 0.0;
    let mut ticks = 0;
    while result == StepResult::Working {
        result = otg.update(request, &mut response).unwrap();
        last_time = response.time;
        response.pass_to_request(request);
        ticks += 1;
        assert!(ticks < 1_000_000, "trajectory never converged");
    }
    assert_float_eq!(last_time, duration, abs <= 0.002);
}

#[test]
fn zero_displacement_has_zero_duration() {
    let mut otg = PositionGenerator::<3, IgnoreErrorHandler>::new(None, 0.004);
    let mut request = PositionRequest::new(None);

    request.max_velocity = axis_stack![1.0, 1.0, 1.0];
    request.max_acceleration = axis_stack![1.0, 1.0, 1.0];

    // Current already equals target on every axis: one tick, FinalStateReached.
    let mut response = PositionResponse::new(None);
    let result = otg.update(&request, &mut response).unwrap();
    assert_eq!(result, StepResult::FinalStateReached);
}

#[test]
fn unit_step_duration_matches_closed_form_minimum_time() {
    // A single axis starting and ending at rest, unit velocity/acceleration limits,
    // travelling one unit of distance: the minimum-time profile accelerates to
    // v_max, cruises, then decelerates (a full trapezoid since v_max = a_max = 1
    // and the unit distance is reached before v_max caps the velocity phase).
    let mut otg = PositionGenerator::<1, IgnoreErrorHandler>::new(None, 0.004);
    let mut request = PositionRequest::new(None);
    request.target_position = axis_stack![1.0];
    request.max_velocity = axis_stack![1.0];
    request.max_acceleration = axis_stack![1.0];

    // Triangular profile (never reaches v_max): t = 2 * sqrt(p_target / a_max).
    check_full_duration(&mut otg, &mut request.clone(), 2.0 * (1.0_f64).sqrt());
}

#[test]
fn doubling_acceleration_limit_shortens_triangular_profile_by_sqrt_two() {
    let mut otg_slow = PositionGenerator::<1, IgnoreErrorHandler>::new(None, 0.004);
    let mut request = PositionRequest::new(None);
    request.target_position = axis_stack![1.0];
    request.max_velocity = axis_stack![10.0];
    request.max_acceleration = axis_stack![1.0];
    check_full_duration(&mut otg_slow, &mut request.clone(), 2.0);

    let mut otg_fast = PositionGenerator::<1, IgnoreErrorHandler>::new(None, 0.004);
    request.max_acceleration = axis_stack![2.0];
    check_full_duration(&mut otg_fast, &mut request, 2.0 / (2.0_f64).sqrt());
}

#[test]
fn inoperative_interval_is_avoided_when_crossing_v_max() {
    // S4-flavored: a one-axis move whose velocity profile brushes v_max on the way to
    // a lower v_target. Whatever t_sync the decision tree settles on, the velocity
    // bound must still hold at every tick and the axis must still converge.
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.005);
    let mut request = PositionRequest::new(None);
    let mut response = PositionResponse::new(None);

    request.current_velocity = axis_stack![0.0];
    request.target_position = axis_stack![50.0];
    request.target_velocity = axis_stack![1.0];
    request.max_velocity = axis_stack![2.0];
    request.max_acceleration = axis_stack![3.0];

    let mut result = StepResult::Working;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        assert!(response.new_velocity[0] <= 2.0 * (1.0 + 1e-6));
        response.pass_to_request(&mut request);
    }
    assert_eq!(result, StepResult::FinalStateReached);
    assert_float_eq!(response.new_position[0], 50.0, abs <= 1e-6);
    assert_float_eq!(response.new_velocity[0], 1.0, abs <= 1e-6);
}

#[test]
fn minimum_duration_stretches_a_trivially_fast_move() {
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.005);
    let mut request = PositionRequest::new(None);
    request.target_position = axis_stack![0.01];
    request.max_velocity = axis_stack![10.0];
    request.max_acceleration = axis_stack![10.0];
    request.minimum_duration = Some(1.0);

    check_full_duration(&mut otg, &mut request, 1.0);
}

#[test]
fn discrete_duration_rounds_up_to_a_cycle_multiple() {
    let cycle = 0.01;
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, cycle);
    let mut request = PositionRequest::new(None);
    request.target_position = axis_stack![1.0];
    request.max_velocity = axis_stack![1.0];
    request.max_acceleration = axis_stack![1.0];
    request.duration_discretization = DurationDiscretization::Discrete;

    let mut response = PositionResponse::new(None);
    let mut result = StepResult::Working;
    let mut last_time = 0.0;
    while result == StepResult::Working {
        result = otg.update(&request, &mut response).unwrap();
        last_time = response.time;
        response.pass_to_request(&mut request);
    }
    let cycles = last_time / cycle;
    assert_float_eq!(cycles.round(), cycles, abs <= 1e-6);
}
