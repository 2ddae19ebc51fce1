//! The request boundary: JSON in, status code and JSON out.
//!
//! | Outcome                         | Status | Body                                   |
//! |---------------------------------|--------|----------------------------------------|
//! | prediction                      | 200    | `{"predictedCO2": v}`                  |
//! | optimization converged          | 200    | `{"optimizedCO", "optimizedCH4", "optimizedCO2"}` |
//! | optimization did not converge   | 200    | `{"error": "Optimization failed"}`     |
//! | body not a non-empty object     | 400    | `{"error": "Invalid JSON format"}`     |
//! | invalid field                   | 400    | `{"error": <field message>}`           |
//! | solver fault                    | 500    | `{"error": "internal error"}`          |

use serde_json::{Value, json};
use tracing::{error, warn};

use crate::{
    OptimizationService, Point, PredictiveOracle, ServiceError,
    validation::{EmissionInputs, ValidationError},
};

/// Status code and JSON body for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    /// Returns `true` for 4xx and 5xx responses.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

impl From<ValidationError> for Response {
    fn from(err: ValidationError) -> Self {
        warn!(%err, "rejected request");
        Self::error(400, err.to_string())
    }
}

impl From<ServiceError> for Response {
    fn from(err: ServiceError) -> Self {
        error!(error = ?err, "request failed");
        Self::error(500, "internal error")
    }
}

/// Predicts CO2 for the `co` and `ch4` levels in `body`.
pub fn handle_predict(oracle: &PredictiveOracle, body: &Value) -> Response {
    match EmissionInputs::from_json(body) {
        Ok(inputs) => {
            let co2 = oracle.evaluate(Point::new(inputs.co, inputs.ch4));
            Response::ok(json!({ "predictedCO2": co2 }))
        }
        Err(err) => err.into(),
    }
}

/// Finds the lowest-emission levels starting from the `co` and `ch4` in
/// `body`.
pub fn handle_optimize(service: &OptimizationService, body: &Value) -> Response {
    let inputs = match EmissionInputs::from_json(body) {
        Ok(inputs) => inputs,
        Err(err) => return err.into(),
    };

    match service.optimize_emissions(inputs.co, inputs.ch4) {
        Ok(response) => match serde_json::to_value(response) {
            Ok(body) => Response::ok(body),
            Err(err) => {
                error!(%err, "failed to encode response");
                Response::error(500, "internal error")
            }
        },
        Err(err) => err.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use approx::assert_relative_eq;

    use crate::LinearModel;

    fn oracle() -> PredictiveOracle {
        PredictiveOracle::new(LinearModel::new(100.0, 3.0, 5.0).unwrap())
    }

    #[test]
    fn predict_returns_prediction() {
        let response = handle_predict(&oracle(), &json!({ "co": 20, "ch4": "10" }));

        assert_eq!(response.status, 200);
        assert_eq!(response.body, json!({ "predictedCO2": 210.0 }));
        assert!(!response.is_error());
    }

    #[test]
    fn predict_rejects_bad_fields() {
        let response = handle_predict(&oracle(), &json!({ "co": -5, "ch4": 10 }));
        assert_eq!(response.status, 400);
        assert_eq!(
            response.body,
            json!({ "error": "Invalid input: CO must be non-negative" })
        );

        let response = handle_predict(&oracle(), &json!({ "co": 5 }));
        assert_eq!(
            response.body,
            json!({ "error": "Missing input: CH4 is required" })
        );

        let response = handle_predict(&oracle(), &json!([]));
        assert_eq!(response.status, 400);
        assert_eq!(response.body, json!({ "error": "Invalid JSON format" }));
    }

    #[test]
    fn optimize_returns_optimized_levels() {
        let service = OptimizationService::new(Arc::new(oracle()));
        let response = handle_optimize(&service, &json!({ "co": 20, "ch4": 10 }));

        assert_eq!(response.status, 200);
        let body = response.body.as_object().unwrap();
        assert_eq!(body.len(), 3);
        assert_relative_eq!(body["optimizedCO"].as_f64().unwrap(), 5.0, epsilon = 1e-6);
        assert_relative_eq!(body["optimizedCH4"].as_f64().unwrap(), 5.0, epsilon = 1e-6);
        assert_relative_eq!(body["optimizedCO2"].as_f64().unwrap(), 140.0, epsilon = 1e-4);
    }

    #[test]
    fn optimize_rejects_before_solving() {
        let service = OptimizationService::new(Arc::new(oracle()));
        let response = handle_optimize(&service, &json!({ "co": "abc", "ch4": 10 }));

        assert_eq!(response.status, 400);
        assert_eq!(
            response.body,
            json!({ "error": "Invalid input: CO must be a number" })
        );
    }
}
