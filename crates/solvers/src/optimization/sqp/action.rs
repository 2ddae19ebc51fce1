/// Actions an observer can take during an SQP run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the solver early and return the current point.
    StopEarly,

    /// Treat a failed line search trial as non-improving and keep backtracking.
    ///
    /// Ignored for [`Event::Iterated`](super::Event::Iterated), since the step
    /// has already been accepted.
    AssumeWorse,
}
