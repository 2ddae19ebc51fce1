use std::sync::Arc;

use carbon_core::ConstraintSet;
use carbon_observers::TracingObserver;
use carbon_solvers::optimization::sqp;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    ConfigLoadError, EmissionProblem, OptimizationResult, Point, PredictiveOracle, ServiceConfig,
    region::{constraints_from, default_constraints},
};

/// Error body returned when the optimizer does not converge.
pub const OPTIMIZATION_FAILED: &str = "Optimization failed";

/// Faults that prevent an optimization from producing any result.
///
/// A run that finishes without converging is not an error; it is reported
/// through [`OptimizeResponse::Failed`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("starting point ({co}, {ch4}) must be finite and non-negative")]
    InvalidStart { co: f64, ch4: f64 },

    #[error("optimizer fault")]
    Solver(#[from] sqp::Error),
}

/// Result of [`OptimizationService::optimize_emissions`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OptimizeResponse {
    Optimized {
        #[serde(rename = "optimizedCO")]
        co: f64,
        #[serde(rename = "optimizedCH4")]
        ch4: f64,
        #[serde(rename = "optimizedCO2")]
        co2: f64,
    },
    Failed {
        error: &'static str,
    },
}

/// Runs the SQP solver against the oracle within a constraint set.
///
/// # Errors
///
/// Returns an [`sqp::Error`] if the solver faults.
pub fn minimize(
    oracle: &PredictiveOracle,
    constraints: &ConstraintSet<2>,
    start: Point,
    config: &sqp::Config,
) -> Result<OptimizationResult, sqp::Error> {
    let solution = sqp::minimize(
        oracle,
        &EmissionProblem,
        constraints,
        start.into(),
        config,
        TracingObserver::new("emissions"),
    )?;
    Ok(OptimizationResult::from(&solution))
}

/// Finds the CO/CH4 point with the lowest predicted CO2.
///
/// Holds only read-only state, so one service can serve concurrent requests.
#[derive(Debug)]
pub struct OptimizationService {
    oracle: Arc<PredictiveOracle>,
    constraints: ConstraintSet<2>,
    config: sqp::Config,
}

impl OptimizationService {
    /// Creates a service over the default region with default solver settings.
    #[must_use]
    pub fn new(oracle: Arc<PredictiveOracle>) -> Self {
        Self {
            oracle,
            constraints: default_constraints(),
            config: sqp::Config::default(),
        }
    }

    /// Creates a service using configured limits and solver settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigLoadError`] if the limits or solver settings are
    /// invalid.
    pub fn with_config(
        oracle: Arc<PredictiveOracle>,
        config: &ServiceConfig,
    ) -> Result<Self, ConfigLoadError> {
        Ok(Self {
            oracle,
            constraints: constraints_from(&config.limits)?,
            config: config.solver.to_sqp()?,
        })
    }

    #[must_use]
    pub fn oracle(&self) -> &PredictiveOracle {
        &self.oracle
    }

    #[must_use]
    pub fn constraints(&self) -> &ConstraintSet<2> {
        &self.constraints
    }

    /// Minimizes predicted CO2 from `start`.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] if the solver faults.
    pub fn minimize(&self, start: Point) -> Result<OptimizationResult, ServiceError> {
        Ok(minimize(&self.oracle, &self.constraints, start, &self.config)?)
    }

    /// Minimizes predicted CO2 starting from the given levels.
    ///
    /// A start outside the region is fine; it is projected onto the box.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidStart`] if either level is negative or
    /// not finite, or [`ServiceError::Solver`] if the solver faults.
    pub fn optimize_emissions(
        &self,
        initial_co: f64,
        initial_ch4: f64,
    ) -> Result<OptimizeResponse, ServiceError> {
        let in_domain = |v: f64| v.is_finite() && v >= 0.0;
        if !in_domain(initial_co) || !in_domain(initial_ch4) {
            return Err(ServiceError::InvalidStart {
                co: initial_co,
                ch4: initial_ch4,
            });
        }

        let result = self.minimize(Point::new(initial_co, initial_ch4))?;
        if !result.success {
            warn!(
                iterations = result.iterations,
                reason = %result.message,
                "optimization did not converge"
            );
            return Ok(OptimizeResponse::Failed {
                error: OPTIMIZATION_FAILED,
            });
        }

        let co2 = self.oracle.evaluate(result.point);
        info!(
            co = result.point.co,
            ch4 = result.point.ch4,
            co2,
            iterations = result.iterations,
            "optimization converged"
        );
        Ok(OptimizeResponse::Optimized {
            co: result.point.co,
            ch4: result.point.ch4,
            co2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    use crate::{LimitsConfig, LinearModel, SolverConfig};

    fn service(intercept: f64, co: f64, ch4: f64) -> OptimizationService {
        let model = LinearModel::new(intercept, co, ch4).unwrap();
        OptimizationService::new(Arc::new(PredictiveOracle::new(model)))
    }

    #[test]
    fn increasing_model_picks_lower_corner() {
        let response = service(100.0, 3.0, 5.0).optimize_emissions(20.0, 10.0).unwrap();

        let OptimizeResponse::Optimized { co, ch4, co2 } = response else {
            panic!("expected success, got {response:?}");
        };
        assert_relative_eq!(co, 5.0, epsilon = 1e-6);
        assert_relative_eq!(ch4, 5.0, epsilon = 1e-6);
        assert_relative_eq!(co2, 140.0, epsilon = 1e-4);
    }

    #[test]
    fn decreasing_model_picks_upper_corner() {
        let result = service(500.0, -2.0, -4.0)
            .minimize(Point::new(10.0, 10.0))
            .unwrap();

        assert!(result.success);
        assert_eq!(result.message, "converged");
        assert_relative_eq!(result.point.co, 30.0, epsilon = 1e-6);
        assert_relative_eq!(result.point.ch4, 25.0, epsilon = 1e-6);
        assert_relative_eq!(result.objective_value, 340.0, epsilon = 1e-4);
    }

    #[test]
    fn configured_cap_limits_result() {
        let config = ServiceConfig {
            limits: LimitsConfig {
                co_max: 20.0,
                ..LimitsConfig::default()
            },
            ..ServiceConfig::default()
        };
        let oracle = PredictiveOracle::new(LinearModel::new(500.0, -2.0, -4.0).unwrap());
        let service = OptimizationService::with_config(Arc::new(oracle), &config).unwrap();

        let result = service.minimize(Point::new(10.0, 10.0)).unwrap();
        assert!(result.success);
        assert_relative_eq!(result.point.co, 20.0, epsilon = 1e-5);
        assert_relative_eq!(result.point.ch4, 25.0, epsilon = 1e-6);
    }

    #[test]
    fn rejects_start_outside_domain() {
        let service = service(100.0, 3.0, 5.0);

        assert!(matches!(
            service.optimize_emissions(-1.0, 10.0),
            Err(ServiceError::InvalidStart { .. })
        ));
        assert!(matches!(
            service.optimize_emissions(10.0, f64::INFINITY),
            Err(ServiceError::InvalidStart { .. })
        ));
    }

    #[test]
    fn non_convergence_reports_failure_body() {
        let config = ServiceConfig {
            solver: SolverConfig {
                max_iters: 1,
                ..SolverConfig::default()
            },
            ..ServiceConfig::default()
        };
        let oracle = PredictiveOracle::new(LinearModel::new(100.0, 3.0, 5.0).unwrap());
        let service = OptimizationService::with_config(Arc::new(oracle), &config).unwrap();

        // One step reaches (17, 5); the corner needs more.
        let response = service.optimize_emissions(20.0, 10.0).unwrap();
        assert_eq!(
            response,
            OptimizeResponse::Failed {
                error: OPTIMIZATION_FAILED
            }
        );
    }
}
