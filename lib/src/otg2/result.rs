//! Status codes returned to the caller at the end of every tick (§6).

/// Result of a single `update()` or `sample_at()` call.
///
/// The discriminants match §6's status-code table exactly, including the sign and
/// magnitude convention (`+1` for normal progress, `0` for completion, negative for
/// every error condition) so the numeric value itself is part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StepResult {
    /// The trajectory is being tracked normally; more ticks remain before the target.
    Working = 1,

    /// This tick's state is (within tolerance) the target state.
    FinalStateReached = 0,

    /// Unclassified/unclassifiable input.
    InvalidInput = -100,

    /// The computed `t_sync` exceeds `MAX_SYNCHRONIZATION_TIME`.
    ExecutionTimeTooBig = -101,

    /// No candidate synchronization time lies outside every axis's inoperative
    /// interval; Safety Layer 2 was engaged.
    SynchronizationFailure = -102,

    /// `Synchronization::PhaseOnly` was requested but the phase-sync detector found
    /// the input vectors non-collinear.
    PhaseSyncNotPossible = -103,

    /// Phase synchronization was requested in velocity mode, where it is not defined.
    NoPhaseSyncPossibleInVelocityMode = -104,
}

impl StepResult {
    pub fn is_error(self) -> bool {
        (self as i32) < 0
    }

    pub fn is_working(self) -> bool {
        matches!(self, StepResult::Working)
    }
}
