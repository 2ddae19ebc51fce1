use thiserror::Error;

/// Errors that can occur when constructing [`Bounds`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundsError {
    #[error("bound {index} is not finite")]
    NotFinite { index: usize },

    #[error("bound {index} has lo = {lo} greater than hi = {hi}")]
    Inverted { index: usize, lo: f64, hi: f64 },
}

/// Closed per-variable intervals `[lo, hi]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<const N: usize> {
    lo: [f64; N],
    hi: [f64; N],
}

impl<const N: usize> Bounds<N> {
    /// Creates validated bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if any limit is non-finite or any `lo > hi`.
    pub fn new(lo: [f64; N], hi: [f64; N]) -> Result<Self, BoundsError> {
        for index in 0..N {
            if !lo[index].is_finite() || !hi[index].is_finite() {
                return Err(BoundsError::NotFinite { index });
            }
            if lo[index] > hi[index] {
                return Err(BoundsError::Inverted {
                    index,
                    lo: lo[index],
                    hi: hi[index],
                });
            }
        }
        Ok(Self { lo, hi })
    }

    /// Creates bounds from `(lo, hi)` pairs, one per variable.
    ///
    /// # Errors
    ///
    /// Same as [`Bounds::new`].
    pub fn from_pairs(pairs: [(f64, f64); N]) -> Result<Self, BoundsError> {
        Self::new(pairs.map(|(lo, _)| lo), pairs.map(|(_, hi)| hi))
    }

    #[must_use]
    pub fn lo(&self) -> &[f64; N] {
        &self.lo
    }

    #[must_use]
    pub fn hi(&self) -> &[f64; N] {
        &self.hi
    }

    /// Returns `true` if every coordinate lies in its interval.
    #[must_use]
    pub fn contains(&self, x: &[f64; N]) -> bool {
        (0..N).all(|i| self.lo[i] <= x[i] && x[i] <= self.hi[i])
    }

    /// Clamps each coordinate into its interval.
    #[must_use]
    pub fn project(&self, x: &[f64; N]) -> [f64; N] {
        std::array::from_fn(|i| x[i].clamp(self.lo[i], self.hi[i]))
    }

    /// Per-variable `(x - lo, hi - x)` margins.
    #[must_use]
    pub fn margins(&self, x: &[f64; N]) -> [(f64, f64); N] {
        std::array::from_fn(|i| (x[i] - self.lo[i], self.hi[i] - x[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_non_finite() {
        assert_eq!(
            Bounds::new([0.0, 3.0], [1.0, 2.0]),
            Err(BoundsError::Inverted {
                index: 1,
                lo: 3.0,
                hi: 2.0
            })
        );
        assert_eq!(
            Bounds::new([f64::NEG_INFINITY], [1.0]),
            Err(BoundsError::NotFinite { index: 0 })
        );
        assert!(Bounds::new([1.0], [1.0]).is_ok());
    }

    #[test]
    fn project_clamps_into_the_box() {
        let bounds = Bounds::from_pairs([(5.0, 30.0), (5.0, 25.0)]).unwrap();

        assert_eq!(bounds.project(&[40.0, 1.0]), [30.0, 5.0]);
        assert_eq!(bounds.project(&[12.0, 7.5]), [12.0, 7.5]);
        assert!(bounds.contains(&bounds.project(&[-3.0, 99.0])));
    }

    #[test]
    fn margins_are_signed() {
        let bounds = Bounds::from_pairs([(5.0, 30.0)]).unwrap();

        assert_eq!(bounds.margins(&[10.0]), [(5.0, 20.0)]);
        assert_eq!(bounds.margins(&[2.0]), [(-3.0, 28.0)]);
        assert!(!bounds.contains(&[2.0]));
    }
}
