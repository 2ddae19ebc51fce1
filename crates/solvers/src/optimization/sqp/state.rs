use nalgebra::{DMatrix, DVector};

use carbon_core::{ConstraintSet, Snapshot};

use crate::optimization::Evaluation;

use super::solution::Status;
use super::{Point, Solution};

/// Penalty weight on constraint violation before any multiplier is known.
const INITIAL_PENALTY: f64 = 1.0;

/// Current iterate with everything the next subproblem needs.
pub(super) struct State<I, O, const N: usize> {
    point: Point<N>,
    snapshot: Snapshot<I, O>,
    gradient: [f64; N],
    jacobian: Vec<[f64; N]>,
    hessian: DMatrix<f64>,
    penalty: f64,
}

impl<I, O, const N: usize> State<I, O, N> {
    pub(super) fn new(
        eval: Evaluation<I, O, N>,
        gradient: [f64; N],
        jacobian: Vec<[f64; N]>,
    ) -> Self {
        Self {
            point: Point::from(&eval),
            snapshot: eval.snapshot,
            gradient,
            jacobian,
            hessian: DMatrix::identity(N, N),
            penalty: INITIAL_PENALTY,
        }
    }

    pub(super) fn point(&self) -> Point<N> {
        self.point
    }

    pub(super) fn snapshot(&self) -> &Snapshot<I, O> {
        &self.snapshot
    }

    pub(super) fn gradient(&self) -> &[f64; N] {
        &self.gradient
    }

    pub(super) fn hessian(&self) -> &DMatrix<f64> {
        &self.hessian
    }

    pub(super) fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Linearized constraint rows, in [`ConstraintSet::violation`] order.
    pub(super) fn rows(&self) -> Vec<[f64; N]> {
        let mut rows = Vec::with_capacity(2 * N + self.jacobian.len());
        for i in 0..N {
            let mut lo = [0.0; N];
            lo[i] = 1.0;
            let mut hi = [0.0; N];
            hi[i] = -1.0;
            rows.push(lo);
            rows.push(hi);
        }
        rows.extend_from_slice(&self.jacobian);
        rows
    }

    /// Keeps the penalty above the largest multiplier so the merit is exact.
    pub(super) fn raise_penalty(&mut self, multipliers: &[f64]) {
        let largest = multipliers.iter().copied().fold(0.0, f64::max);
        self.penalty = self.penalty.max(2.0 * largest);
    }

    /// Moves to an accepted point and updates the Hessian approximation.
    pub(super) fn advance(
        &mut self,
        eval: Evaluation<I, O, N>,
        gradient: [f64; N],
        jacobian: Vec<[f64; N]>,
        multipliers: &[f64],
    ) {
        let old_lagrangian = self.lagrangian_gradient(multipliers);
        let old_x = self.point.x;

        self.point = Point::from(&eval);
        self.snapshot = eval.snapshot;
        self.gradient = gradient;
        self.jacobian = jacobian;

        let s = DVector::from_fn(N, |i, _| self.point.x[i] - old_x[i]);
        let y = self.lagrangian_gradient(multipliers) - old_lagrangian;
        damped_bfgs(&mut self.hessian, &s, &y);
    }

    /// Gradient of `f - Σ λ_j g_j`, with rows ordered as in [`State::rows`].
    fn lagrangian_gradient(&self, multipliers: &[f64]) -> DVector<f64> {
        let mut grad = DVector::from_row_slice(&self.gradient);
        for (row, lambda) in self.rows().iter().zip(multipliers) {
            for i in 0..N {
                grad[i] -= lambda * row[i];
            }
        }
        grad
    }

    pub(super) fn into_solution(
        self,
        status: Status,
        iters: usize,
        evals: usize,
        constraints: &ConstraintSet<N>,
    ) -> Solution<I, O, N> {
        Solution {
            status,
            x: self.point.x,
            objective: self.point.objective,
            violation: constraints.max_violation(&self.point.x),
            snapshot: self.snapshot,
            iters,
            evals,
        }
    }
}

/// Powell-damped BFGS update, which keeps `b` positive definite.
///
/// When the curvature `sᵀy` is too small relative to `sᵀBs`, `y` is blended
/// toward `Bs` so that `sᵀr = 0.2 sᵀBs`. A non-finite or indefinite result
/// resets `b` to the identity.
fn damped_bfgs(b: &mut DMatrix<f64>, s: &DVector<f64>, y: &DVector<f64>) {
    if s.norm_squared() == 0.0 {
        return;
    }

    let bs = &*b * s;
    let sbs = s.dot(&bs);
    if !sbs.is_finite() || sbs <= 0.0 {
        b.fill_with_identity();
        return;
    }

    let sy = s.dot(y);
    let theta = if sy >= 0.2 * sbs {
        1.0
    } else {
        0.8 * sbs / (sbs - sy)
    };
    let r = y * theta + &bs * (1.0 - theta);
    let sr = s.dot(&r);
    if !sr.is_finite() || sr <= 0.0 {
        return;
    }

    let updated = &*b - (&bs * bs.transpose()) / sbs + (&r * r.transpose()) / sr;
    if updated.iter().all(|v| v.is_finite()) {
        *b = (&updated + updated.transpose()) * 0.5;
    } else {
        b.fill_with_identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn secant_condition_holds_with_enough_curvature() {
        let mut b = DMatrix::identity(2, 2);
        let s = DVector::from_row_slice(&[-0.5, 2.5]);
        let y = &s * 2.0;

        damped_bfgs(&mut b, &s, &y);

        let bs = &b * &s;
        assert_relative_eq!(bs[0], y[0], epsilon = 1e-12);
        assert_relative_eq!(bs[1], y[1], epsilon = 1e-12);
        assert_relative_eq!(b[(0, 1)], b[(1, 0)], epsilon = 1e-15);
    }

    #[test]
    fn zero_curvature_is_damped_and_stays_positive_definite() {
        let mut b = DMatrix::identity(2, 2);
        let s = DVector::from_row_slice(&[-3.0, -5.0]);
        let y = DVector::zeros(2);

        damped_bfgs(&mut b, &s, &y);

        // Curvature along s shrinks to 0.2, the orthogonal direction is untouched.
        let s_hat = s.normalize();
        assert_relative_eq!(s_hat.dot(&(&b * &s_hat)), 0.2, epsilon = 1e-12);
        let orth = DVector::from_row_slice(&[5.0, -3.0]).normalize();
        assert_relative_eq!(orth.dot(&(&b * &orth)), 1.0, epsilon = 1e-12);
        assert!(b.clone().cholesky().is_some());
    }

    #[test]
    fn zero_step_leaves_hessian_alone() {
        let mut b = DMatrix::from_row_slice(2, 2, &[2.0, 0.5, 0.5, 3.0]);
        let before = b.clone();

        damped_bfgs(&mut b, &DVector::zeros(2), &DVector::from_row_slice(&[1.0, 1.0]));

        assert_eq!(b, before);
    }
}
