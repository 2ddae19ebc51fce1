//! The quadratic subproblem solved at each SQP iteration.
//!
//! ```text
//! minimize    g·d + ½ dᵀ B d
//! subject to  a_j·d + c_j >= 0    for every constraint row j
//! ```
//!
//! `B` is positive definite, so the subproblem is strictly convex and its
//! minimizer is the minimizer of some equality-constrained problem over an
//! active set of at most `N` independent rows. Every such active set is
//! solved through its KKT system and the best primal-feasible candidate wins.

use nalgebra::{DMatrix, DVector};

/// Relative slack allowed when checking a candidate against a row.
const FEASIBILITY_TOL: f64 = 1e-9;

/// Gram determinant ratio below which an active set is treated as dependent.
const DEPENDENCE_TOL: f64 = 1e-10;

/// A search direction and the multipliers of the rows it was solved with.
#[derive(Debug, Clone)]
pub(super) struct Direction<const N: usize> {
    pub(super) d: [f64; N],

    /// One non-negative multiplier per constraint row; zero when inactive.
    pub(super) multipliers: Vec<f64>,
}

struct Candidate {
    d: DVector<f64>,
    value: f64,
    multipliers: Vec<f64>,
}

impl Candidate {
    fn dual_feasible(&self) -> bool {
        self.multipliers.iter().all(|l| *l >= -FEASIBILITY_TOL)
    }

    fn improves_on(&self, other: &Self) -> bool {
        let slack = 1e-12 * (1.0 + other.value.abs());
        if self.value < other.value - slack {
            return true;
        }
        self.value <= other.value + slack && self.dual_feasible() && !other.dual_feasible()
    }
}

/// Solves the subproblem, or returns `None` if no direction satisfies every row.
pub(super) fn solve<const N: usize>(
    hessian: &DMatrix<f64>,
    gradient: &[f64; N],
    rows: &[[f64; N]],
    offsets: &[f64],
) -> Option<Direction<N>> {
    debug_assert_eq!(rows.len(), offsets.len());

    let g = DVector::from_row_slice(gradient);
    let mut best: Option<Candidate> = None;

    for size in 0..=N.min(rows.len()) {
        for active in combinations(rows.len(), size) {
            let Some(candidate) = solve_active(hessian, &g, rows, offsets, &active) else {
                continue;
            };
            if !satisfies_rows(&candidate.d, rows, offsets) {
                continue;
            }
            if best.as_ref().is_none_or(|b| candidate.improves_on(b)) {
                best = Some(candidate);
            }
        }
    }

    best.map(|c| Direction {
        d: std::array::from_fn(|i| c.d[i]),
        multipliers: c.multipliers.into_iter().map(|l| l.max(0.0)).collect(),
    })
}

/// Solves the KKT system with `active` rows held as equalities.
fn solve_active<const N: usize>(
    hessian: &DMatrix<f64>,
    g: &DVector<f64>,
    rows: &[[f64; N]],
    offsets: &[f64],
    active: &[usize],
) -> Option<Candidate> {
    let k = active.len();
    if k > 0 && is_dependent(rows, active) {
        return None;
    }

    let size = N + k;
    let mut kkt = DMatrix::<f64>::zeros(size, size);
    let mut rhs = DVector::<f64>::zeros(size);
    kkt.view_mut((0, 0), (N, N)).copy_from(hessian);
    for i in 0..N {
        rhs[i] = -g[i];
    }
    for (s, &j) in active.iter().enumerate() {
        for c in 0..N {
            kkt[(N + s, c)] = rows[j][c];
            kkt[(c, N + s)] = -rows[j][c];
        }
        rhs[N + s] = -offsets[j];
    }

    let solution = kkt.lu().solve(&rhs)?;
    if solution.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let d = solution.rows(0, N).into_owned();
    let mut multipliers = vec![0.0; rows.len()];
    for (s, &j) in active.iter().enumerate() {
        multipliers[j] = solution[N + s];
    }
    let value = g.dot(&d) + 0.5 * d.dot(&(hessian * &d));

    Some(Candidate {
        d,
        value,
        multipliers,
    })
}

/// Returns `true` if the active rows are (nearly) linearly dependent.
///
/// Compares the Gram determinant against the product of squared row norms,
/// a ratio that is 1 for orthogonal rows and 0 for dependent ones.
fn is_dependent<const N: usize>(rows: &[[f64; N]], active: &[usize]) -> bool {
    let a = DMatrix::from_fn(active.len(), N, |r, c| rows[active[r]][c]);
    let scale: f64 = active
        .iter()
        .map(|&j| rows[j].iter().map(|v| v * v).sum::<f64>())
        .product();
    if scale == 0.0 {
        return true;
    }
    let gram = &a * a.transpose();
    gram.determinant().abs() <= DEPENDENCE_TOL * scale
}

fn satisfies_rows<const N: usize>(d: &DVector<f64>, rows: &[[f64; N]], offsets: &[f64]) -> bool {
    rows.iter().zip(offsets).all(|(row, &c)| {
        let ad: f64 = row.iter().zip(d.iter()).map(|(a, di)| a * di).sum();
        ad + c >= -FEASIBILITY_TOL * (1.0 + c.abs())
    })
}

/// All `k`-element subsets of `0..m`, in lexicographic order.
fn combinations(m: usize, k: usize) -> Vec<Vec<usize>> {
    fn extend(start: usize, m: usize, k: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if current.len() == k {
            out.push(current.clone());
            return;
        }
        for j in start..m {
            current.push(j);
            extend(j + 1, m, k, current, out);
            current.pop();
        }
    }

    let mut out = Vec::new();
    extend(0, m, k, &mut Vec::with_capacity(k), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    fn identity() -> DMatrix<f64> {
        DMatrix::identity(2, 2)
    }

    #[test]
    fn unconstrained_step_is_newton() {
        let hessian = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 4.0]);

        let dir = solve(&hessian, &[-2.0, 8.0], &[], &[]).unwrap();

        assert_relative_eq!(dir.d[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(dir.d[1], -2.0, epsilon = 1e-12);
        assert!(dir.multipliers.is_empty());
    }

    #[test]
    fn halfplane_constraint_becomes_active() {
        // min ½|d - (2, 5)|² subject to d0 + d1 <= 2.
        let rows = [[-1.0, -1.0]];
        let dir = solve(&identity(), &[-2.0, -5.0], &rows, &[2.0]).unwrap();

        assert_relative_eq!(dir.d[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(dir.d[1], 2.5, epsilon = 1e-12);
        assert_relative_eq!(dir.multipliers[0], 2.5, epsilon = 1e-12);
    }

    #[test]
    fn box_rows_stop_at_the_corner() {
        // Step toward (-3, -5) from a point 1 above both lower bounds.
        let rows = [[1.0, 0.0], [-1.0, 0.0], [0.0, 1.0], [0.0, -1.0]];
        let offsets = [1.0, 10.0, 1.0, 10.0];

        let dir = solve(&identity(), &[3.0, 5.0], &rows, &offsets).unwrap();

        assert_relative_eq!(dir.d[0], -1.0, epsilon = 1e-12);
        assert_relative_eq!(dir.d[1], -1.0, epsilon = 1e-12);
        assert_relative_eq!(dir.multipliers[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(dir.multipliers[2], 4.0, epsilon = 1e-12);
        assert_eq!(dir.multipliers[1], 0.0);
    }

    #[test]
    fn duplicated_rows_are_tolerated() {
        // An upper bound and an identical inequality on the same variable.
        let rows = [[-1.0, 0.0], [-1.0, 0.0]];
        let offsets = [0.5, 0.5];

        let dir = solve(&identity(), &[-4.0, 1.0], &rows, &offsets).unwrap();

        assert_relative_eq!(dir.d[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(dir.d[1], -1.0, epsilon = 1e-12);
    }

    #[test]
    fn contradictory_rows_have_no_direction() {
        // d0 >= 1 and d0 <= -1.
        let rows = [[1.0, 0.0], [-1.0, 0.0]];
        let offsets = [-1.0, -1.0];

        assert!(solve(&identity(), &[0.0, 0.0], &rows, &offsets).is_none());
    }

    #[test]
    fn combinations_are_lexicographic() {
        assert_eq!(
            combinations(4, 2),
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );
        assert_eq!(combinations(3, 0), vec![Vec::<usize>::new()]);
    }
}
