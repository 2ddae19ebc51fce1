use carbon_core::{ConstraintSet, MinimizationProblem, Model, Observer};

use crate::optimization::{Evaluation, Evaluator};

use super::{Action, Config, Error, Event, Point};

/// Armijo sufficient-decrease constant.
const ARMIJO: f64 = 1e-4;

/// Step length reduction per backtrack.
const BACKTRACK: f64 = 0.5;

/// L1 merit: objective plus penalty-weighted total violation.
///
/// A NaN margin makes the merit infinite.
pub(super) fn merit(objective: f64, margins: &[f64], penalty: f64) -> f64 {
    objective + penalty * l1_violation(margins)
}

fn l1_violation(margins: &[f64]) -> f64 {
    margins
        .iter()
        .map(|m| if m.is_nan() { f64::INFINITY } else { (-m).max(0.0) })
        .sum()
}

/// Directional derivative bound of the merit along a subproblem step `d`.
///
/// Valid because `d` satisfies every linearized constraint, so each violated
/// margin shrinks at least as fast as it is violated.
pub(super) fn merit_slope<const N: usize>(
    gradient: &[f64; N],
    d: &[f64; N],
    margins: &[f64],
    penalty: f64,
) -> f64 {
    let gd: f64 = gradient.iter().zip(d).map(|(g, di)| g * di).sum();
    gd - penalty * l1_violation(margins)
}

pub(super) enum LineSearch<I, O, const N: usize> {
    Accepted {
        eval: Evaluation<I, O, N>,
        alpha: f64,
    },
    Exhausted,
    Stopped,
}

/// Backtracks from the full step until the merit decreases sufficiently.
///
/// Trial points are projected into the box. A trial that fails to evaluate
/// is reported to the observer, which may stop the run or ask for another
/// backtrack; otherwise the failure is returned as an error.
#[allow(clippy::too_many_arguments)]
pub(super) fn line_search<M, P, Obs, const N: usize>(
    evaluator: &mut Evaluator<'_, M, P>,
    constraints: &ConstraintSet<N>,
    from: Point<N>,
    d: &[f64; N],
    penalty: f64,
    slope: f64,
    config: &Config,
    observer: &mut Obs,
) -> Result<LineSearch<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    let merit0 = merit(from.objective, &constraints.violation(&from.x), penalty);
    let mut alpha = 1.0;

    for _ in 0..config.max_line_search() {
        let x = constraints
            .bounds()
            .project(&std::array::from_fn(|i| from.x[i] + alpha * d[i]));

        match evaluator.eval(x) {
            Ok(eval) => {
                let value = merit(eval.objective, &constraints.violation(&x), penalty);
                if value.is_finite() && sufficient_decrease(value, merit0, alpha, slope) {
                    return Ok(LineSearch::Accepted { eval, alpha });
                }
            }
            Err(error) => match Event::<M, P, N>::emit_failure(x, &error, observer) {
                Some(Action::StopEarly) => return Ok(LineSearch::Stopped),
                Some(Action::AssumeWorse) => {}
                None => return Err(error.into()),
            },
        }

        alpha *= BACKTRACK;
    }

    Ok(LineSearch::Exhausted)
}

fn sufficient_decrease(value: f64, merit0: f64, alpha: f64, slope: f64) -> bool {
    if slope < 0.0 {
        value <= merit0 + ARMIJO * alpha * slope
    } else {
        value < merit0
    }
}
