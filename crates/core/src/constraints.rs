//! The feasible region searched by constrained solvers.
//!
//! A region is a box ([`Bounds`]) intersected with any number of inequality
//! constraints in `g(x) >= 0` form ([`Inequality`]). [`ConstraintSet`] ties
//! the two together and reports margins in a fixed order that solvers use to
//! linearize the region row by row.

mod bounds;
mod set;

pub use bounds::{Bounds, BoundsError};
pub use set::{ConstraintSet, Inequality};
