//! CO2 emission prediction and minimization.
//!
//! A trained regression model predicts per-capita CO2 from per-capita CO and
//! CH4. This crate wraps that model as a [`PredictiveOracle`], describes the
//! physically allowed operating region, and searches it for the CO/CH4 point
//! with the lowest predicted CO2.
//!
//! # Lifecycle
//!
//! The model artifact is loaded once at startup with
//! [`PredictiveOracle::load`]; a missing or malformed artifact is an
//! [`OracleError`] and should end the process. The oracle is read-only from
//! then on and is shared through an `Arc` with every [`OptimizationService`],
//! so requests can run concurrently without coordination.
//!
//! # Request boundary
//!
//! [`request::handle_predict`] and [`request::handle_optimize`] take a JSON
//! body, validate it field by field (see [`validation`]), and map every
//! outcome to a status code and JSON body.

pub mod config;
pub mod request;
pub mod validation;

mod oracle;
mod point;
mod problem;
mod region;
mod result;
mod service;

pub use config::{ConfigLoadError, LimitsConfig, ServiceConfig, SolverConfig};
pub use oracle::{Coefficients, LinearModel, OracleError, PredictiveOracle, Predictor};
pub use point::Point;
pub use problem::{DomainError, EmissionProblem};
pub use region::{constraints_from, default_constraints};
pub use result::OptimizationResult;
pub use service::{OPTIMIZATION_FAILED, OptimizationService, OptimizeResponse, ServiceError, minimize};
pub use validation::ValidationError;
