//! Solvers for optimization problems: minimizing an objective.
//!
//! A [`MinimizationProblem`] maps solver variables `x: [f64; N]` to model
//! inputs, calls the model, and extracts a scalar objective. Solvers in this
//! module search for the `x` that minimizes that objective.
//!
//! # Solvers
//!
//! - [`sqp`]: local minimization over a box and inequality constraints using
//!   sequential quadratic programming with finite-difference derivatives
//!
//! [`MinimizationProblem`]: carbon_core::MinimizationProblem

mod evaluate;

pub use evaluate::{EvalError, EvaluateResult, Evaluation, Evaluator, evaluate};

pub mod sqp;
