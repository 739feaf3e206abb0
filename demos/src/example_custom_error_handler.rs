use log::{error, info};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config, Root};
use otg2::error::{ErrorHandler, Otg2Error};
use otg2::prelude::*;

/// Logs validation/calculator errors through log4rs instead of throwing or swallowing
/// them, and keeps going — the position kernel's safety-layer fallback already handles
/// the degradation, so logging is all a caller needs to do here.
#[derive(Default, Debug)]
struct LogErrorHandler;

impl ErrorHandler for LogErrorHandler {
    fn handle_validation_error(message: &str) -> Result<(), Otg2Error> {
        error!("{}", message);
        Ok(())
    }
    fn handle_calculator_error(message: &str) -> Result<(), Otg2Error> {
        error!("{}", message);
        Ok(())
    }
}

fn main() {
    let stdout = ConsoleAppender::builder().build();
    let config = Config::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(log::LevelFilter::Info))
        .unwrap();
    log4rs::init_config(config).unwrap();

    let mut otg = PositionGenerator::<1, LogErrorHandler>::new(None, 0.01);
    info!("position generator initialized");

    let mut request = PositionRequest::<1>::new(None);
    let mut response = PositionResponse::<1>::new(None);

    request.current_position[0] = 0.0;
    request.current_velocity[0] = 7.0;

    request.target_position[0] = 10.0;
    // Intentionally exceeds max_velocity so the kernel degrades through its
    // safety layers instead of reporting a hard error.
    request.target_velocity[0] = 20.0;

    request.max_velocity[0] = 10.0;
    request.max_acceleration[0] = 10.0;

    while otg.update(&request, &mut response).unwrap() == StepResult::Working {
        response.pass_to_request(&mut request);
    }

    println!("reached target in {:.3}s (degraded: {})", response.time, otg.is_degraded());
}
