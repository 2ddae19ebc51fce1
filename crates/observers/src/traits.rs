//! Capability traits for cross-solver observers.
//!
//! These traits abstract over solver-specific event and action types, enabling
//! observers to work generically across different solvers.
//!
//! # Event traits
//!
//! - [`HasObjective`]: events that carry an objective value
//! - [`HasIteration`]: events that mark an accepted iteration
//! - [`HasViolation`]: events that carry a constraint violation
//!
//! # Action traits
//!
//! - [`CanStopEarly`]: actions that can signal early termination
//! - [`CanAssumeWorse`]: actions that can signal a worse-than-evaluated outcome
//!
//! # Example
//!
//! ```rust
//! use carbon_core::Observer;
//! use carbon_observers::traits::{CanStopEarly, HasObjective};
//!
//! struct GoodEnough {
//!     target: f64,
//! }
//!
//! impl<E: HasObjective, A: CanStopEarly> Observer<E, A> for GoodEnough {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         (event.objective() <= self.target).then(A::stop_early)
//!     }
//! }
//! ```

use carbon_core::{MinimizationProblem, Model};

use carbon_solvers::optimization::sqp;

/// An event that carries an objective value.
pub trait HasObjective {
    /// Returns the objective for this event.
    ///
    /// Returns `f64::NAN` when the event represents an error and no objective
    /// is available.
    fn objective(&self) -> f64;
}

/// An event that may mark an accepted iteration.
pub trait HasIteration {
    /// Returns the iteration count, or `None` for events between iterations.
    fn iteration(&self) -> Option<usize>;
}

/// An event that carries a constraint violation.
pub trait HasViolation {
    /// Returns the largest constraint violation, or `f64::NAN` if unknown.
    fn violation(&self) -> f64;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the solver early.
    fn stop_early() -> Self;
}

/// An action type that can signal a worse-than-evaluated outcome.
pub trait CanAssumeWorse {
    /// Returns the action that treats this evaluation as non-improving.
    fn assume_worse() -> Self;
}

// --- sqp::Event ---

impl<M, P, const N: usize> HasObjective for sqp::Event<'_, M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    fn objective(&self) -> f64 {
        sqp::Event::objective(self)
    }
}

impl<M, P, const N: usize> HasIteration for sqp::Event<'_, M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    fn iteration(&self) -> Option<usize> {
        match self {
            sqp::Event::Iterated { iter, .. } => Some(*iter),
            sqp::Event::ModelFailed { .. } | sqp::Event::ProblemFailed { .. } => None,
        }
    }
}

impl<M, P, const N: usize> HasViolation for sqp::Event<'_, M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    fn violation(&self) -> f64 {
        match self {
            sqp::Event::Iterated { violation, .. } => *violation,
            sqp::Event::ModelFailed { .. } | sqp::Event::ProblemFailed { .. } => f64::NAN,
        }
    }
}

// --- sqp::Action ---

impl CanStopEarly for sqp::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}

impl CanAssumeWorse for sqp::Action {
    fn assume_worse() -> Self {
        Self::AssumeWorse
    }
}
