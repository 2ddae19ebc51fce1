use carbon_core::{Bounds, ConstraintSet};

/// Absolute step for a variable at `xi`, relative to its scale.
fn step_size(xi: f64, rel_step: f64) -> f64 {
    rel_step * xi.abs().max(1.0)
}

fn shifted<const N: usize>(x: &[f64; N], i: usize, value: f64) -> [f64; N] {
    let mut out = *x;
    out[i] = value;
    out
}

/// Finite-difference gradient that never evaluates outside `bounds`.
///
/// Central differences are used in the interior. Next to a bound the offset
/// on that side is clamped, which degrades to a one-sided difference and
/// reuses `fx` instead of re-evaluating at `x`. A variable pinned by
/// `lo == hi` gets a zero derivative.
pub(super) fn gradient<const N: usize, E, F>(
    x: &[f64; N],
    fx: f64,
    bounds: &Bounds<N>,
    rel_step: f64,
    mut f: F,
) -> Result<[f64; N], E>
where
    F: FnMut([f64; N]) -> Result<f64, E>,
{
    let mut grad = [0.0; N];
    for i in 0..N {
        let h = step_size(x[i], rel_step);
        let hi = (x[i] + h).min(bounds.hi()[i]);
        let lo = (x[i] - h).max(bounds.lo()[i]);
        let width = hi - lo;
        if width <= 0.0 {
            continue;
        }

        let f_hi = if hi > x[i] { f(shifted(x, i, hi))? } else { fx };
        let f_lo = if lo < x[i] { f(shifted(x, i, lo))? } else { fx };
        grad[i] = (f_hi - f_lo) / width;
    }
    Ok(grad)
}

/// Central-difference Jacobian of the inequality constraints, one row each.
pub(super) fn inequality_jacobian<const N: usize>(
    x: &[f64; N],
    constraints: &ConstraintSet<N>,
    rel_step: f64,
) -> Vec<[f64; N]> {
    let mut rows = vec![[0.0; N]; constraints.num_inequalities()];
    if rows.is_empty() {
        return rows;
    }

    for i in 0..N {
        let h = step_size(x[i], rel_step);
        let x_hi = shifted(x, i, x[i] + h);
        let x_lo = shifted(x, i, x[i] - h);
        let width = x_hi[i] - x_lo[i];

        let above = constraints.inequality_values(&x_hi);
        let below = constraints.inequality_values(&x_lo);
        for (row, (a, b)) in rows.iter_mut().zip(above.iter().zip(&below)) {
            row[i] = (a - b) / width;
        }
    }
    rows
}
