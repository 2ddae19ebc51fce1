//! Numerical solvers built on the [`carbon_core`] problem traits.
//!
//! - [`optimization`]: minimization of a model-backed objective
//!
//! [`carbon_core`]: carbon_core

pub mod optimization;
