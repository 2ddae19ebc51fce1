use carbon_core::{MinimizationProblem, Model, Observer};

use crate::optimization::EvalError;

use super::{Action, Point};

/// Events emitted by the SQP solver.
pub enum Event<'a, M, P, const N: usize>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    /// A step was accepted.
    Iterated {
        /// Number of accepted steps so far, starting at 1.
        iter: usize,

        /// The new point (x and objective).
        point: Point<N>,

        /// The point the step was taken from.
        previous: Point<N>,

        /// Step length actually taken, as an infinity norm.
        step: f64,

        /// Fraction of the subproblem step accepted by the line search.
        alpha: f64,

        /// Largest constraint violation at the new point.
        violation: f64,

        /// The model input at the new point.
        input: &'a M::Input,

        /// The model output at the new point.
        output: &'a M::Output,
    },

    /// Model evaluation failed at a line search trial point.
    ModelFailed {
        /// The trial point.
        x: [f64; N],

        /// The model error.
        error: &'a M::Error,
    },

    /// Problem method failed at a line search trial point.
    ProblemFailed {
        /// The trial point.
        x: [f64; N],

        /// The problem error.
        error: &'a P::Error,
    },
}

impl<M, P, const N: usize> Event<'_, M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    /// Returns the x value that was accepted (or attempted).
    #[must_use]
    pub fn x(&self) -> [f64; N] {
        match self {
            Self::Iterated { point, .. } => point.x,
            Self::ModelFailed { x, .. } | Self::ProblemFailed { x, .. } => *x,
        }
    }

    /// Returns the objective at the accepted point, or `NaN` for failures.
    #[must_use]
    pub fn objective(&self) -> f64 {
        match self {
            Self::Iterated { point, .. } => point.objective,
            Self::ModelFailed { .. } | Self::ProblemFailed { .. } => f64::NAN,
        }
    }

    /// Emits a failure event and returns the observer's action.
    pub(super) fn emit_failure<Obs>(
        x: [f64; N],
        error: &EvalError<M::Error, P::Error>,
        observer: &mut Obs,
    ) -> Option<Action>
    where
        Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
    {
        match error {
            EvalError::Model(e) => {
                let event = Event::ModelFailed { x, error: e };
                observer.observe(&event)
            }
            EvalError::Problem(e) => {
                let event = Event::ProblemFailed { x, error: e };
                observer.observe(&event)
            }
        }
    }
}
