use std::fmt;

use carbon_core::Snapshot;

/// Why the solver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Step length and constraint violation fell within tolerance.
    Converged,

    /// Reached the iteration limit without converging.
    MaxIters,

    /// The line search could not find a step that improves the merit function.
    LineSearchFailed,

    /// The linearized constraints admit no search direction.
    InconsistentConstraints,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

impl Status {
    /// Short human-readable reason, stable for callers that surface it.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Converged => "converged",
            Self::MaxIters => "iteration limit reached",
            Self::LineSearchFailed => "no improving step found",
            Self::InconsistentConstraints => "linearized constraints are inconsistent",
            Self::StoppedByObserver => "stopped by observer",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// The result of an SQP run.
#[derive(Debug, Clone)]
pub struct Solution<I, O, const N: usize> {
    /// Final solver status.
    pub status: Status,

    /// The last accepted point.
    pub x: [f64; N],

    /// Objective value at `x`.
    pub objective: f64,

    /// Largest constraint violation at `x`.
    pub violation: f64,

    /// Snapshot at `x`.
    pub snapshot: Snapshot<I, O>,

    /// Number of accepted steps.
    pub iters: usize,

    /// Number of problem evaluations, including finite differences.
    pub evals: usize,
}

impl<I, O, const N: usize> Solution<I, O, N> {
    /// Returns `true` if the solver converged.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Converged
    }
}
