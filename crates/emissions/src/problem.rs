use carbon_core::MinimizationProblem;
use thiserror::Error;

use crate::Point;

/// A solver variable left the model's physical domain.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("{name} must be a finite non-negative amount, got {value}")]
pub struct DomainError {
    pub name: &'static str,
    pub value: f64,
}

/// Minimizes predicted CO2 over `x = [co, ch4]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmissionProblem;

impl MinimizationProblem<2> for EmissionProblem {
    type Input = Point;
    type Output = f64;
    type Error = DomainError;

    fn input(&self, &[co, ch4]: &[f64; 2]) -> Result<Point, DomainError> {
        for (name, value) in [("CO", co), ("CH4", ch4)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError { name, value });
            }
        }
        Ok(Point::new(co, ch4))
    }

    fn objective(&self, _input: &Point, output: &f64) -> Result<f64, DomainError> {
        Ok(*output)
    }
}
