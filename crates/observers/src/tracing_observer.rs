use carbon_core::Observer;
use tracing::{debug, info, warn};

use crate::traits::{CanAssumeWorse, CanStopEarly, HasIteration, HasObjective, HasViolation};

/// Logs every solver event through `tracing`.
///
/// Accepted iterations are logged at `debug`, failed evaluations at `warn`.
/// Optionally stops the solver after a number of iterations, and can ask the
/// solver to treat failed evaluations as non-improving instead of aborting.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
    budget: Option<usize>,
    recover_failures: bool,
    failures: usize,
}

impl TracingObserver {
    /// Creates an observer whose log lines carry `label` as the `run` field.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            budget: None,
            recover_failures: false,
            failures: 0,
        }
    }

    /// Stops the solver once `iterations` steps have been accepted.
    #[must_use]
    pub fn with_budget(mut self, iterations: usize) -> Self {
        self.budget = Some(iterations);
        self
    }

    /// Treats failed evaluations as non-improving rather than fatal.
    #[must_use]
    pub fn recover_failures(mut self) -> Self {
        self.recover_failures = true;
        self
    }
}

impl<E, A> Observer<E, A> for TracingObserver
where
    E: HasObjective + HasIteration + HasViolation,
    A: CanStopEarly + CanAssumeWorse,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        let Some(iter) = event.iteration() else {
            self.failures += 1;
            warn!(
                run = %self.label,
                failures = self.failures,
                recover = self.recover_failures,
                "evaluation failed"
            );
            return self.recover_failures.then(A::assume_worse);
        };

        debug!(
            run = %self.label,
            iter,
            objective = event.objective(),
            violation = event.violation(),
            "step accepted"
        );

        if self.budget.is_some_and(|budget| iter >= budget) {
            info!(run = %self.label, iter, "iteration budget exhausted");
            return Some(A::stop_early());
        }
        None
    }
}
