use std::error::Error as StdError;

use thiserror::Error;

use crate::optimization::EvalError;

/// Errors that can occur during an SQP run.
///
/// A search that fails to converge is not an error; see [`Status`](super::Status).
#[derive(Debug, Error)]
pub enum Error {
    #[error("starting point is not finite")]
    NonFiniteStart,

    #[error("objective is not finite at {x:?}")]
    NonFiniteObjective { x: Vec<f64> },

    #[error("finite-difference gradient is not finite at {x:?}")]
    NonFiniteGradient { x: Vec<f64> },

    #[error("problem error")]
    Problem(#[source] Box<dyn StdError + Send + Sync>),

    #[error("model call failed")]
    Model(#[source] Box<dyn StdError + Send + Sync>),
}

impl<ME, PE> From<EvalError<ME, PE>> for Error
where
    ME: StdError + Send + Sync + 'static,
    PE: StdError + Send + Sync + 'static,
{
    fn from(err: EvalError<ME, PE>) -> Self {
        match err {
            EvalError::Model(e) => Self::Model(Box::new(e)),
            EvalError::Problem(e) => Self::Problem(Box::new(e)),
        }
    }
}
