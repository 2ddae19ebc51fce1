//! Service configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) gives the
//! standard operating region and solver settings:
//!
//! ```toml
//! model_path = "models/co2.json"
//!
//! [limits]
//! co = [5.0, 30.0]
//! ch4 = [5.0, 25.0]
//! co_max = 30.0
//! ch4_max = 25.0
//!
//! [solver]
//! max_iters = 100
//! tol = 1e-6
//! fd_rel_step = 1e-6
//! max_line_search = 30
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use carbon_core::BoundsError;
use carbon_solvers::optimization::sqp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::region::constraints_from;

/// Errors that can occur when loading a [`ServiceConfig`].
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config")]
    Parse(#[from] toml::de::Error),

    #[error("invalid operating limits")]
    Limits(#[from] BoundsError),

    #[error("invalid solver settings")]
    Solver(#[from] sqp::ConfigError),
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Model artifact path, used when none is given on the command line.
    pub model_path: Option<PathBuf>,
    pub limits: LimitsConfig,
    pub solver: SolverConfig,
}

/// Operating region limits, in per-capita kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimitsConfig {
    /// `[lo, hi]` range for CO.
    pub co: [f64; 2],
    /// `[lo, hi]` range for CH4.
    pub ch4: [f64; 2],
    pub co_max: f64,
    pub ch4_max: f64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            co: [5.0, 30.0],
            ch4: [5.0, 25.0],
            co_max: 30.0,
            ch4_max: 25.0,
        }
    }
}

/// Tuning for the SQP solver; see [`sqp::Config`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverConfig {
    pub max_iters: usize,
    pub tol: f64,
    pub fd_rel_step: f64,
    pub max_line_search: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let config = sqp::Config::default();
        Self {
            max_iters: config.max_iters(),
            tol: config.tol(),
            fd_rel_step: config.fd_rel_step(),
            max_line_search: config.max_line_search(),
        }
    }
}

impl SolverConfig {
    /// Converts to a validated solver config.
    ///
    /// # Errors
    ///
    /// Returns a [`sqp::ConfigError`] if any setting is out of range.
    pub fn to_sqp(&self) -> Result<sqp::Config, sqp::ConfigError> {
        sqp::Config::new(self.max_iters, self.tol, self.fd_rel_step, self.max_line_search)
    }
}

impl ServiceConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigLoadError`] if the text does not parse, or if the
    /// limits or solver settings are invalid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a config file.
    ///
    /// # Errors
    ///
    /// Same as [`ServiceConfig::from_toml_str`], plus I/O failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks that the limits form a valid region and the solver settings are
    /// in range.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        constraints_from(&self.limits)?;
        self.solver.to_sqp()?;
        Ok(())
    }
}
