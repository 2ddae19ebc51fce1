use carbon_core::{ConstraintSet, MinimizationProblem, Model, Observer};

use crate::optimization::Evaluator;

use super::{
    Action, Config, Error, Event, Point, Solution, finite_diff,
    line_search::{LineSearch, line_search, merit_slope},
    solution::Status,
    state::State,
    subproblem,
};

/// Core SQP iteration.
pub(super) fn search<M, P, Obs, const N: usize>(
    model: &M,
    problem: &P,
    constraints: &ConstraintSet<N>,
    x0: [f64; N],
    config: &Config,
    mut observer: Obs,
) -> Result<Solution<M::Input, M::Output, N>, Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    Obs: for<'a> Observer<Event<'a, M, P, N>, Action>,
{
    if x0.iter().any(|v| !v.is_finite()) {
        return Err(Error::NonFiniteStart);
    }

    let mut evaluator = Evaluator::new(model, problem);
    let start = evaluator.eval(constraints.bounds().project(&x0))?;
    if !start.objective.is_finite() {
        return Err(Error::NonFiniteObjective {
            x: start.x.to_vec(),
        });
    }

    let gradient = objective_gradient(&mut evaluator, constraints, Point::from(&start), config)?;
    let jacobian = finite_diff::inequality_jacobian(&start.x, constraints, config.fd_rel_step());
    let mut state = State::new(start, gradient, jacobian);

    for iter in 0..config.max_iters() {
        let current = state.point();
        let margins = constraints.violation(&current.x);
        let violation = constraints.max_violation(&current.x);

        let Some(direction) =
            subproblem::solve(state.hessian(), state.gradient(), &state.rows(), &margins)
        else {
            let evals = evaluator.count();
            return Ok(state.into_solution(Status::InconsistentConstraints, iter, evals, constraints));
        };

        if inf_norm(&direction.d) <= config.tol() && violation <= config.tol() {
            let evals = evaluator.count();
            return Ok(state.into_solution(Status::Converged, iter, evals, constraints));
        }

        state.raise_penalty(&direction.multipliers);
        let slope = merit_slope(state.gradient(), &direction.d, &margins, state.penalty());

        let outcome = line_search(
            &mut evaluator,
            constraints,
            current,
            &direction.d,
            state.penalty(),
            slope,
            config,
            &mut observer,
        )?;
        let (eval, alpha) = match outcome {
            LineSearch::Accepted { eval, alpha } => (eval, alpha),
            LineSearch::Exhausted => {
                let evals = evaluator.count();
                return Ok(state.into_solution(Status::LineSearchFailed, iter, evals, constraints));
            }
            LineSearch::Stopped => {
                let evals = evaluator.count();
                return Ok(state.into_solution(Status::StoppedByObserver, iter, evals, constraints));
            }
        };

        let gradient = objective_gradient(&mut evaluator, constraints, Point::from(&eval), config)?;
        let jacobian = finite_diff::inequality_jacobian(&eval.x, constraints, config.fd_rel_step());
        state.advance(eval, gradient, jacobian, &direction.multipliers);

        let point = state.point();
        let step = inf_norm(&std::array::from_fn::<f64, N, _>(|i| point.x[i] - current.x[i]));
        let violation = constraints.max_violation(&point.x);

        let action = {
            let snapshot = state.snapshot();
            let event = Event::Iterated {
                iter: iter + 1,
                point,
                previous: current,
                step,
                alpha,
                violation,
                input: &snapshot.input,
                output: &snapshot.output,
            };
            observer.observe(&event)
        };
        if action == Some(Action::StopEarly) {
            let evals = evaluator.count();
            return Ok(state.into_solution(Status::StoppedByObserver, iter + 1, evals, constraints));
        }

        let change = (point.objective - current.objective).abs();
        if step <= config.tol()
            && change <= config.tol() * (1.0 + current.objective.abs())
            && violation <= config.tol()
        {
            let evals = evaluator.count();
            return Ok(state.into_solution(Status::Converged, iter + 1, evals, constraints));
        }
    }

    let evals = evaluator.count();
    Ok(state.into_solution(Status::MaxIters, config.max_iters(), evals, constraints))
}

/// Finite-difference objective gradient at an already evaluated point.
fn objective_gradient<M, P, const N: usize>(
    evaluator: &mut Evaluator<'_, M, P>,
    constraints: &ConstraintSet<N>,
    at: Point<N>,
    config: &Config,
) -> Result<[f64; N], Error>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let gradient = finite_diff::gradient(
        &at.x,
        at.objective,
        constraints.bounds(),
        config.fd_rel_step(),
        |x| evaluator.objective(x),
    )?;

    if gradient.iter().any(|g| !g.is_finite()) {
        return Err(Error::NonFiniteGradient { x: at.x.to_vec() });
    }
    Ok(gradient)
}

fn inf_norm<const N: usize>(v: &[f64; N]) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}
