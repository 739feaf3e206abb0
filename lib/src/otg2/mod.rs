#![allow(clippy::too_many_arguments)]

pub mod alloc;
pub mod block;
pub mod brake;
pub mod constants;
pub mod error;
pub mod phase_sync;
pub mod position_generator;
pub mod request;
pub mod response;
pub mod result;
pub mod roots;
pub mod segment;
pub mod step1;
pub mod step2;
pub mod synchronizer;
pub mod trajectory;
pub mod util;
pub mod velocity_generator;
pub mod velocity_kernel;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::otg2::error::{Otg2Error, ErrorHandler, IgnoreErrorHandler, ThrowErrorHandler};
    pub use crate::otg2::position_generator::PositionGenerator;
    pub use crate::otg2::request::{
        DurationDiscretization, FinalStatePolicy, PositionRequest, Synchronization, VelocityRequest,
    };
    pub use crate::otg2::response::{PositionResponse, VelocityResponse};
    pub use crate::otg2::result::StepResult;
    pub use crate::otg2::trajectory::{Extremum, Trajectory};
    pub use crate::otg2::util::AxisData;
    pub use crate::otg2::velocity_generator::VelocityGenerator;
    pub use crate::{axis_heap, axis_stack, count_exprs};
}
