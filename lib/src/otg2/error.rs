//! Error types and customizable error handling (§7).

use crate::otg2::alloc::string::{String, ToString};
use thiserror::Error;

/// Errors that can occur while validating input or calculating a trajectory.
#[derive(Debug, Error)]
pub enum Otg2Error {
    /// Input values are out of range or inconsistent (e.g. a limit is non-positive, or
    /// the current/target state inevitably violates a velocity limit).
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A problem was encountered while synthesizing the trajectory (numerical
    /// instability, no feasible profile found, synchronization failure).
    #[error("Calculator error: {0}")]
    CalculatorError(String),
}

/// Customizes how `Otg2Error`s surface to the caller.
///
/// The library ships two implementations — [`ThrowErrorHandler`], which propagates
/// errors as `Result::Err`, and [`IgnoreErrorHandler`], which swallows them and lets
/// the orchestrator's fallback layers take over. Generators are generic over this trait
/// so a real-time caller can pick the zero-branching "ignore" path at compile time.
pub trait ErrorHandler {
    fn handle_validation_error(message: &str) -> Result<(), Otg2Error>;
    fn handle_calculator_error(message: &str) -> Result<(), Otg2Error>;
}

#[derive(Debug, Default)]
pub struct ThrowErrorHandler;

impl ErrorHandler for ThrowErrorHandler {
    fn handle_validation_error(message: &str) -> Result<(), Otg2Error> {
        Err(Otg2Error::ValidationError(message.to_string()))
    }

    fn handle_calculator_error(message: &str) -> Result<(), Otg2Error> {
        Err(Otg2Error::CalculatorError(message.to_string()))
    }
}

#[derive(Debug, Default)]
pub struct IgnoreErrorHandler;

impl ErrorHandler for IgnoreErrorHandler {
    fn handle_validation_error(_message: &str) -> Result<(), Otg2Error> {
        Ok(())
    }

    fn handle_calculator_error(_message: &str) -> Result<(), Otg2Error> {
        Ok(())
    }
}
