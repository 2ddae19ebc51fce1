use thiserror::Error;

/// Configuration for the SQP solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    max_iters: usize,
    tol: f64,
    fd_rel_step: f64,
    max_line_search: usize,
}

/// Errors that can occur when validating an SQP solver config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tol must be finite and positive")]
    Tol,

    #[error("fd_rel_step must be finite and in (0, 1)")]
    FdRelStep,

    #[error("max_line_search must be at least 1")]
    MaxLineSearch,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_iters: 100,
            tol: 1e-6,
            fd_rel_step: 1e-6,
            max_line_search: 30,
        }
    }
}

impl Config {
    /// Creates a new config with validated tolerances.
    ///
    /// # Errors
    ///
    /// Returns an error if `tol` is not positive, `fd_rel_step` is outside
    /// `(0, 1)`, or `max_line_search` is zero.
    pub fn new(
        max_iters: usize,
        tol: f64,
        fd_rel_step: f64,
        max_line_search: usize,
    ) -> Result<Self, ConfigError> {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(ConfigError::Tol);
        }
        if !fd_rel_step.is_finite() || fd_rel_step <= 0.0 || fd_rel_step >= 1.0 {
            return Err(ConfigError::FdRelStep);
        }
        if max_line_search == 0 {
            return Err(ConfigError::MaxLineSearch);
        }

        Ok(Self {
            max_iters,
            tol,
            fd_rel_step,
            max_line_search,
        })
    }

    /// Returns the maximum number of SQP iterations.
    #[must_use]
    pub fn max_iters(&self) -> usize {
        self.max_iters
    }

    /// Returns the tolerance on step length and constraint violation.
    #[must_use]
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Returns the finite-difference step relative to each variable's scale.
    #[must_use]
    pub fn fd_rel_step(&self) -> f64 {
        self.fd_rel_step
    }

    /// Returns the maximum number of backtracking steps per line search.
    #[must_use]
    pub fn max_line_search(&self) -> usize {
        self.max_line_search
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let config = Config::default();

        assert_eq!(config.max_iters(), 100);
        assert_eq!(config.tol(), 1e-6);
        assert_eq!(config.fd_rel_step(), 1e-6);
        assert_eq!(config.max_line_search(), 30);
        assert_eq!(Config::new(100, 1e-6, 1e-6, 30), Ok(config));
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(Config::new(10, 0.0, 1e-6, 5), Err(ConfigError::Tol));
        assert_eq!(Config::new(10, f64::NAN, 1e-6, 5), Err(ConfigError::Tol));
        assert_eq!(Config::new(10, 1e-6, 1.0, 5), Err(ConfigError::FdRelStep));
        assert_eq!(Config::new(10, 1e-6, -1e-6, 5), Err(ConfigError::FdRelStep));
        assert_eq!(Config::new(10, 1e-6, 1e-6, 0), Err(ConfigError::MaxLineSearch));
    }
}
