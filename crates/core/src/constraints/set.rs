use super::Bounds;

/// An inequality constraint in `g(x) >= 0` form.
///
/// Any `Fn(&[f64; N]) -> f64` closure is an inequality.
pub trait Inequality<const N: usize> {
    /// Evaluates `g(x)`; negative values indicate infeasibility.
    fn value(&self, x: &[f64; N]) -> f64;
}

impl<const N: usize, F> Inequality<N> for F
where
    F: Fn(&[f64; N]) -> f64,
{
    fn value(&self, x: &[f64; N]) -> f64 {
        self(x)
    }
}

type BoxedInequality<const N: usize> = Box<dyn Inequality<N> + Send + Sync>;

/// Box bounds plus an ordered sequence of inequality constraints.
///
/// Margins are always reported in the same order: for each variable its
/// `lo` then `hi` margin, followed by each inequality in insertion order.
pub struct ConstraintSet<const N: usize> {
    bounds: Bounds<N>,
    inequalities: Vec<BoxedInequality<N>>,
}

impl<const N: usize> ConstraintSet<N> {
    /// Creates a set with only box bounds.
    #[must_use]
    pub fn new(bounds: Bounds<N>) -> Self {
        Self {
            bounds,
            inequalities: Vec::new(),
        }
    }

    /// Appends an inequality constraint.
    #[must_use]
    pub fn with_inequality<G>(mut self, g: G) -> Self
    where
        G: Inequality<N> + Send + Sync + 'static,
    {
        self.inequalities.push(Box::new(g));
        self
    }

    #[must_use]
    pub fn bounds(&self) -> &Bounds<N> {
        &self.bounds
    }

    /// Number of inequality constraints, excluding bounds.
    #[must_use]
    pub fn num_inequalities(&self) -> usize {
        self.inequalities.len()
    }

    /// Total number of margins reported by [`ConstraintSet::violation`].
    #[must_use]
    pub fn num_margins(&self) -> usize {
        2 * N + self.inequalities.len()
    }

    /// Evaluates the inequality constraints only, in insertion order.
    #[must_use]
    pub fn inequality_values(&self, x: &[f64; N]) -> Vec<f64> {
        self.inequalities.iter().map(|g| g.value(x)).collect()
    }

    /// Returns every margin; negative entries indicate infeasibility.
    #[must_use]
    pub fn violation(&self, x: &[f64; N]) -> Vec<f64> {
        let mut margins = Vec::with_capacity(self.num_margins());
        for (lo, hi) in self.bounds.margins(x) {
            margins.push(lo);
            margins.push(hi);
        }
        margins.extend(self.inequalities.iter().map(|g| g.value(x)));
        margins
    }

    /// Largest constraint violation at `x`, or zero if feasible.
    ///
    /// A NaN margin counts as an infinite violation.
    #[must_use]
    pub fn max_violation(&self, x: &[f64; N]) -> f64 {
        self.violation(x)
            .into_iter()
            .map(|m| if m.is_nan() { f64::INFINITY } else { (-m).max(0.0) })
            .fold(0.0, f64::max)
    }

    /// Returns `true` if `x` is inside the box and satisfies every inequality.
    #[must_use]
    pub fn is_feasible(&self, x: &[f64; N]) -> bool {
        self.bounds.contains(x) && self.inequalities.iter().all(|g| g.value(x) >= 0.0)
    }
}

impl<const N: usize> std::fmt::Debug for ConstraintSet<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConstraintSet")
            .field("bounds", &self.bounds)
            .field("inequalities", &self.inequalities.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn unit_disk() -> ConstraintSet<2> {
        let bounds = Bounds::from_pairs([(-2.0, 2.0), (-2.0, 2.0)]).unwrap();
        ConstraintSet::new(bounds).with_inequality(|x: &[f64; 2]| 1.0 - x[0] * x[0] - x[1] * x[1])
    }

    #[test]
    fn violation_order_is_bounds_then_inequalities() {
        let set = unit_disk();
        let margins = set.violation(&[0.5, -1.0]);

        assert_eq!(set.num_margins(), 5);
        assert_eq!(margins.len(), 5);
        assert_relative_eq!(margins[0], 2.5);
        assert_relative_eq!(margins[1], 1.5);
        assert_relative_eq!(margins[2], 1.0);
        assert_relative_eq!(margins[3], 3.0);
        assert_relative_eq!(margins[4], -0.25);
    }

    #[test]
    fn feasibility_requires_box_and_inequalities() {
        let set = unit_disk();

        assert!(set.is_feasible(&[0.0, 0.0]));
        assert!(!set.is_feasible(&[0.9, 0.9]));
        assert!(!set.is_feasible(&[3.0, 0.0]));
        assert_relative_eq!(set.max_violation(&[0.0, 0.0]), 0.0);
        assert_relative_eq!(set.max_violation(&[3.0, 0.0]), 8.0);
    }

    #[test]
    fn nan_margins_are_infinitely_violated() {
        let set = unit_disk().with_inequality(|_: &[f64; 2]| f64::NAN);

        assert!(!set.is_feasible(&[0.0, 0.0]));
        assert!(set.max_violation(&[0.0, 0.0]).is_infinite());
        assert_eq!(set.num_inequalities(), 2);
    }
}
