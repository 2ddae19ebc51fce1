use carbon_solvers::optimization::sqp::{Solution, Status};
use serde::Serialize;

use crate::Point;

/// Outcome of one optimizer run, independent of the solver's internals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationResult {
    /// `true` only when the solver converged to a feasible point.
    pub success: bool,
    pub point: Point,
    pub objective_value: f64,
    pub iterations: usize,
    pub message: String,
}

impl<I, O> From<&Solution<I, O, 2>> for OptimizationResult {
    fn from(solution: &Solution<I, O, 2>) -> Self {
        Self {
            success: solution.status == Status::Converged,
            point: Point::from(solution.x),
            objective_value: solution.objective,
            iterations: solution.iters,
            message: solution.status.message().to_owned(),
        }
    }
}
