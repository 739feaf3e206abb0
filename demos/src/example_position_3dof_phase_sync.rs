use otg2::prelude::*;

fn main() {
    let mut otg = PositionGenerator::<3, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<3>::new(None);
    let mut response = PositionResponse::<3>::new(None);

    request.current_position = axis_stack![0.0, 0.0, 0.0];
    request.current_velocity = axis_stack![0.0, 0.0, 0.0];
    request.target_position = axis_stack![1.0, 2.0, -1.0];
    request.target_velocity = axis_stack![0.0, 0.0, 0.0];

    request.max_velocity = axis_stack![3.0, 3.0, 3.0];
    request.max_acceleration = axis_stack![5.0, 5.0, 5.0];

    request.synchronization = Synchronization::PhaseIfPossible;

    while otg.update(&request, &mut response).unwrap() == StepResult::Working {
        println!(
            "t={:.3}  p=[{:.4}, {:.4}, {:.4}]",
            response.time, response.new_position[0], response.new_position[1], response.new_position[2]
        );
        response.pass_to_request(&mut request);
    }

    if otg.is_degraded() {
        println!("phase synchronization was not possible; the position kernel fell back");
    }
}
