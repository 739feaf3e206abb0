/*!
# otg2

On-line trajectory generation for multi-axis mechanical systems (robots, servo drives).

Given, at each control tick, a current kinematic state (position, velocity) for `K`
degrees of freedom, per-axis kinematic limits (maximum velocity, maximum acceleration),
and a desired target state, `otg2` emits the next kinematic set-point such that the
concatenation of all emitted set-points forms a time-optimal, velocity-continuous,
acceleration-bounded trajectory that reaches the target state. This is an
acceleration-limited (second-order) kernel: jerk is not a controlled quantity, unlike
jerk-limited planners such as Ruckig.

## Getting started

```rust
use otg2::prelude::*;

let mut otg = PositionGenerator::<3, ThrowErrorHandler>::new(None, 0.001);
let mut request = PositionRequest::new(None);
let mut response = PositionResponse::new(None);

request.current_position = axis_stack![100.0, 0.0, 50.0];
request.current_velocity = axis_stack![100.0, -220.0, -50.0];
request.target_position = axis_stack![-600.0, -200.0, -350.0];
request.target_velocity = axis_stack![50.0, -50.0, -200.0];
request.max_velocity = axis_stack![300.0, 100.0, 300.0];
request.max_acceleration = axis_stack![300.0, 200.0, 100.0];

while otg.update(&request, &mut response).unwrap() == StepResult::Working {
    response.pass_to_request(&mut request);
}
```

## Two request types, one shared core

There are two statically-typed entry points: [`PositionRequest`]/[`PositionGenerator`] for
full position-velocity-acceleration control, and [`VelocityRequest`]/[`VelocityGenerator`]
for direct velocity control (visual servoing, controlled stops). `PositionGenerator` owns a
`VelocityGenerator` internally and falls back to it (Safety Layer 2) when the position
kernel cannot produce a synchronized trajectory.
*/

pub mod otg2;

pub use crate::otg2::error;

/// Re-exports of the most commonly used types.
pub mod prelude {
    pub use crate::otg2::prelude::*;
}
