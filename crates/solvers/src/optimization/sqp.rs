//! Sequential quadratic programming for small constrained problems.
//!
//! # Algorithm
//!
//! Each iteration builds a local model of the problem at the current point:
//!
//! 1. The objective gradient is estimated with central finite differences
//!    (one-sided next to a bound so the model is never queried outside the box).
//! 2. Every inequality constraint is linearized with a finite-difference
//!    Jacobian; box bounds are linear already.
//! 3. A quadratic subproblem with a damped BFGS approximation of the
//!    Lagrangian Hessian is solved for a search direction that satisfies the
//!    linearized constraints.
//! 4. A backtracking line search on an L1 merit function (objective plus
//!    penalty-weighted violation) picks the step length.
//!
//! The starting point is projected into the box before the first iteration,
//! and every trial point is projected again, so iterates never leave the box.
//!
//! # Termination
//!
//! - [`Status::Converged`]: the subproblem step and the constraint violation
//!   are both within [`Config::tol`]
//! - [`Status::MaxIters`]: the iteration limit was reached
//! - [`Status::LineSearchFailed`]: no step length improved the merit function
//! - [`Status::InconsistentConstraints`]: the linearized constraints admit no
//!   direction
//! - [`Status::StoppedByObserver`]: an observer returned [`Action::StopEarly`]
//!
//! None of these are errors. [`Error`] is reserved for faults: the model or
//! problem failing, or a non-finite start, objective, or gradient.
//!
//! # Limitations
//!
//! - **Local only**: converges to a point no worse than its neighborhood
//! - **Small N**: the subproblem enumerates active sets, which is cheap for a
//!   handful of variables and constraints but grows combinatorially
//! - **Smoothness**: derivatives are finite differences, so non-smooth or
//!   discontinuous objectives may stall the line search
//!
//! # Observer Events
//!
//! - [`Event::Iterated`]: a step was accepted
//! - [`Event::ModelFailed`] / [`Event::ProblemFailed`]: a line search trial
//!   point failed to evaluate
//!
//! Observers can return [`Action::StopEarly`] to halt immediately with the
//! current point, or [`Action::AssumeWorse`] on a failed trial to keep
//! backtracking instead of aborting.

mod action;
mod config;
mod error;
mod event;
mod finite_diff;
mod line_search;
mod point;
mod search;
mod solution;
mod state;
mod subproblem;


pub use action::Action;
pub use config::{Config, ConfigError};
pub use error::Error;
pub use event::Event;
pub use point::Point;
pub use solution::{Solution, Status};

use carbon_core::{ConstraintSet, MinimizationProblem, Model, Observer};

/// Finds a local minimum of the objective within the constraint set.
///
/// The observer receives an [`Event`] for each accepted step and each failed
/// line search trial. See the [module docs](self) for details.
///
/// # Errors
///
/// Returns an error if the model or problem fails outside of a line search
/// trial the observer recovers from, or if the starting point, its objective,
/// or a gradient is not finite.
pub fn minimize<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    constraints: &ConstraintSet<N>,
    x0: [f64; N],
    config: &Config,
    observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    search::search(model, problem, constraints, x0, config, observer)
}

/// Finds a local minimum without observer support.
///
/// This is a convenience wrapper around [`minimize`] that uses a no-op observer.
///
/// # Errors
///
/// Same as [`minimize`].
pub fn minimize_unobserved<M, P, const N: usize>(
    model: &M,
    problem: &P,
    constraints: &ConstraintSet<N>,
    x0: [f64; N],
    config: &Config,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    minimize(model, problem, constraints, x0, config, ())
}
