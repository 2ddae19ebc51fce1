use thiserror::Error;

use carbon_core::{MinimizationProblem, Model, Snapshot};

/// The result of evaluating an optimization problem at a given `x`.
#[derive(Debug, Clone)]
pub struct Evaluation<I, O, const N: usize> {
    pub x: [f64; N],

    pub objective: f64,

    pub snapshot: Snapshot<I, O>,
}

/// Errors that can occur when evaluating an optimization problem.
#[derive(Debug, Error)]
pub enum EvalError<ME, PE> {
    /// The model call failed.
    #[error("model call failed")]
    Model(#[source] ME),

    /// Failed to construct input or compute the objective.
    #[error("problem error")]
    Problem(#[source] PE),
}

/// Type alias for the result of [`evaluate`].
pub type EvaluateResult<M, P, const N: usize> = Result<
    Evaluation<<M as Model>::Input, <M as Model>::Output, N>,
    EvalError<<M as Model>::Error, <P as MinimizationProblem<N>>::Error>,
>;

/// Evaluates the model in the context of an optimization problem.
///
/// This function maps `x` to model input, calls the model, then computes
/// the objective from the input and output.
///
/// # Errors
///
/// Returns an error if input mapping, model call, or objective computation fails.
pub fn evaluate<M, P, const N: usize>(model: &M, problem: &P, x: [f64; N]) -> EvaluateResult<M, P, N>
where
    M: Model,
    P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
{
    let input = problem.input(&x).map_err(EvalError::Problem)?;
    let output = model.call(&input).map_err(EvalError::Model)?;
    let objective = problem
        .objective(&input, &output)
        .map_err(EvalError::Problem)?;

    Ok(Evaluation {
        x,
        objective,
        snapshot: Snapshot::new(input, output),
    })
}

/// Counts evaluations made on behalf of a single solver run.
pub struct Evaluator<'a, M, P> {
    model: &'a M,
    problem: &'a P,
    count: usize,
}

impl<'a, M, P> Evaluator<'a, M, P> {
    pub fn new(model: &'a M, problem: &'a P) -> Self {
        Self {
            model,
            problem,
            count: 0,
        }
    }

    /// Number of evaluations attempted so far, including failed ones.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Evaluates at `x`, keeping the model input and output.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`].
    pub fn eval<const N: usize>(&mut self, x: [f64; N]) -> EvaluateResult<M, P, N>
    where
        M: Model,
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    {
        self.count += 1;
        evaluate(self.model, self.problem, x)
    }

    /// Evaluates at `x`, keeping only the objective.
    ///
    /// # Errors
    ///
    /// Same as [`evaluate`].
    pub fn objective<const N: usize>(
        &mut self,
        x: [f64; N],
    ) -> Result<f64, EvalError<M::Error, P::Error>>
    where
        M: Model,
        P: MinimizationProblem<N, Input = M::Input, Output = M::Output>,
    {
        self.eval(x).map(|eval| eval.objective)
    }
}
