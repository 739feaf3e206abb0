use otg2::prelude::*;

fn main() {
    let mut otg = VelocityGenerator::<1, ThrowErrorHandler>::new(None, 0.01);
    let mut request = VelocityRequest::<1>::new(None);
    let mut response = VelocityResponse::<1>::new(None);

    request.current_velocity[0] = 0.0;
    request.target_velocity[0] = 4.0;
    request.max_acceleration[0] = 2.0;

    while otg.update(&request, &mut response).unwrap() == StepResult::Working {
        println!("t={:.3}  v={:.4}  a={:.4}", response.time, response.new_velocity[0], response.new_acceleration[0]);
    }

    println!("reached target velocity {:.4} at t={:.3}s", response.new_velocity[0], response.time);
}
