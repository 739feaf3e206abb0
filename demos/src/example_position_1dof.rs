use otg2::prelude::*;

fn main() {
    let mut otg = PositionGenerator::<1, ThrowErrorHandler>::new(None, 0.01);
    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.current_position[0] = 0.0;
    request.current_velocity[0] = 7.0;
    request.current_acceleration[0] = 0.0;

    request.target_position[0] = 10.0;
    request.target_velocity[0] = 0.0;
    request.target_acceleration[0] = 0.0;

    request.max_velocity[0] = 10.0;
    request.max_acceleration[0] = 10.0;

    while otg.update(&request, &mut response).unwrap() == StepResult::Working {
        println!(
            "t={:.3}  p={:.4}  v={:.4}  a={:.4}",
            response.time, response.new_position[0], response.new_velocity[0], response.new_acceleration[0]
        );
        response.pass_to_request(&mut request);
    }

    println!("reached target in {:.3}s", response.time);
}
