use std::{
    convert::Infallible,
    fmt, fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use carbon_core::Model;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::Point;

/// A trained regressor that predicts CO2 from CO and CH4.
///
/// Implementations must be deterministic and safe to call from many threads.
pub trait Predictor: Send + Sync {
    fn predict(&self, co: f64, ch4: f64) -> f64;
}

/// Errors that can occur when loading a model artifact.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("model artifact not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read model artifact {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed model artifact")]
    Malformed(#[from] serde_json::Error),

    #[error("model parameter `{name}` is not finite")]
    NonFinite { name: &'static str },
}

/// Regression weights for each input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coefficients {
    pub co: f64,
    pub ch4: f64,
}

/// A linear regressor, the shape of the persisted artifact.
///
/// ```json
/// { "intercept": 1.5, "coefficients": { "co": 0.8, "ch4": 1.2 } }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Coefficients,
}

impl LinearModel {
    /// Creates a linear model, rejecting non-finite parameters.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::NonFinite`] naming the first bad parameter.
    pub fn new(intercept: f64, co: f64, ch4: f64) -> Result<Self, OracleError> {
        let model = Self {
            intercept,
            coefficients: Coefficients { co, ch4 },
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), OracleError> {
        let params = [
            ("intercept", self.intercept),
            ("co", self.coefficients.co),
            ("ch4", self.coefficients.ch4),
        ];
        match params.into_iter().find(|(_, value)| !value.is_finite()) {
            Some((name, _)) => Err(OracleError::NonFinite { name }),
            None => Ok(()),
        }
    }
}

impl Predictor for LinearModel {
    fn predict(&self, co: f64, ch4: f64) -> f64 {
        self.intercept + self.coefficients.co * co + self.coefficients.ch4 * ch4
    }
}

/// The loaded model, shared read-only by every request.
///
/// Cloning is cheap; clones share the same predictor.
#[derive(Clone)]
pub struct PredictiveOracle {
    predictor: Arc<dyn Predictor>,
}

impl PredictiveOracle {
    /// Wraps an already constructed predictor.
    pub fn new(predictor: impl Predictor + 'static) -> Self {
        Self {
            predictor: Arc::new(predictor),
        }
    }

    /// Loads a [`LinearModel`] artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the file is missing, unreadable, or not
    /// a valid artifact.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OracleError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                OracleError::Missing {
                    path: path.to_path_buf(),
                }
            } else {
                OracleError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let oracle = Self::from_json(&text)?;
        info!(path = %path.display(), "loaded model artifact");
        Ok(oracle)
    }

    /// Parses a [`LinearModel`] artifact from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an [`OracleError`] if the text is not a valid artifact.
    pub fn from_json(text: &str) -> Result<Self, OracleError> {
        let model: LinearModel = serde_json::from_str(text)?;
        model.validate()?;
        Ok(Self::new(model))
    }

    /// Predicts CO2 at the given point.
    #[must_use]
    pub fn evaluate(&self, point: Point) -> f64 {
        self.predictor.predict(point.co, point.ch4)
    }
}

impl fmt::Debug for PredictiveOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictiveOracle").finish_non_exhaustive()
    }
}

impl Model for PredictiveOracle {
    type Input = Point;
    type Output = f64;
    type Error = Infallible;

    fn call(&self, input: &Point) -> Result<f64, Self::Error> {
        Ok(self.evaluate(*input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use tempfile::tempdir;

    const ARTIFACT: &str = r#"{ "intercept": 100.0, "coefficients": { "co": 3.0, "ch4": 5.0 } }"#;

    #[test]
    fn linear_model_predicts_weighted_sum() {
        let model = LinearModel::new(100.0, 3.0, 5.0).unwrap();
        assert_relative_eq!(model.predict(20.0, 10.0), 210.0);
        assert_relative_eq!(model.predict(0.0, 0.0), 100.0);
    }

    #[test]
    fn rejects_non_finite_parameters() {
        let err = LinearModel::new(0.0, f64::NAN, 1.0).unwrap_err();
        assert!(matches!(err, OracleError::NonFinite { name: "co" }));

        let err = LinearModel::new(f64::INFINITY, 1.0, 1.0).unwrap_err();
        assert!(matches!(err, OracleError::NonFinite { name: "intercept" }));
    }

    #[test]
    fn parses_artifact() {
        let oracle = PredictiveOracle::from_json(ARTIFACT).unwrap();
        assert_relative_eq!(oracle.evaluate(Point::new(5.0, 5.0)), 140.0);
        assert_eq!(oracle.call(&Point::new(1.0, 1.0)).unwrap(), 108.0);
    }

    #[test]
    fn rejects_malformed_artifacts() {
        for text in [
            "",
            "[1, 2, 3]",
            r#"{ "intercept": 1.0 }"#,
            r#"{ "intercept": 1.0, "coefficients": { "co": 1.0, "ch4": 1.0, "n2o": 1.0 } }"#,
        ] {
            assert!(matches!(
                PredictiveOracle::from_json(text),
                Err(OracleError::Malformed(_))
            ));
        }
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, ARTIFACT).unwrap();

        let oracle = PredictiveOracle::load(&path).unwrap();
        assert_relative_eq!(oracle.evaluate(Point::new(20.0, 10.0)), 210.0);
    }

    #[test]
    fn missing_artifact_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = PredictiveOracle::load(&path).unwrap_err();
        assert!(matches!(err, OracleError::Missing { path: p } if p == path));
    }
}
