//! Core traits and types for emission optimization.
//!
//! This crate defines the shared abstractions that solvers, observers, and
//! domain models build on:
//!
//! - [`Model`]: a callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives solver events and optionally returns control actions
//! - [`MinimizationProblem`]: adapts solver variables to model inputs and
//!   extracts an objective from outputs
//! - [`Bounds`], [`Inequality`], [`ConstraintSet`]: the feasible region a
//!   constrained solver searches

mod constraints;
mod model;
mod observer;
mod problems;

pub use constraints::{Bounds, BoundsError, ConstraintSet, Inequality};
pub use observer::Observer;
pub use problems::MinimizationProblem;
pub use {model::Model, model::Snapshot};
