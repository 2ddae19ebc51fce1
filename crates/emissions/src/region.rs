//! The physically allowed operating region.

use carbon_core::{Bounds, BoundsError, ConstraintSet};

use crate::LimitsConfig;

/// Builds the operating region from configured limits.
///
/// The region is the box from `limits.co` and `limits.ch4`, plus the caps
/// `co <= co_max` and `ch4 <= ch4_max` as separate inequalities. With the
/// default limits the caps coincide with the box's upper bounds; they are
/// kept so a tighter cap can be configured without touching the box.
///
/// # Errors
///
/// Returns a [`BoundsError`] if a range is not finite or is inverted.
pub fn constraints_from(limits: &LimitsConfig) -> Result<ConstraintSet<2>, BoundsError> {
    let [co_lo, co_hi] = limits.co;
    let [ch4_lo, ch4_hi] = limits.ch4;
    let bounds = Bounds::from_pairs([(co_lo, co_hi), (ch4_lo, ch4_hi)])?;

    let (co_max, ch4_max) = (limits.co_max, limits.ch4_max);
    Ok(ConstraintSet::new(bounds)
        .with_inequality(move |x: &[f64; 2]| co_max - x[0])
        .with_inequality(move |x: &[f64; 2]| ch4_max - x[1]))
}

/// The default region: `5 <= co <= 30`, `5 <= ch4 <= 25`.
///
/// Built from [`LimitsConfig::default`], so the two never disagree.
#[must_use]
pub fn default_constraints() -> ConstraintSet<2> {
    constraints_from(&LimitsConfig::default()).expect("default limits are finite and ordered")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_matches_default_limits() {
        let defaults = default_constraints();
        let configured = constraints_from(&LimitsConfig::default()).unwrap();

        for x in [[5.0, 5.0], [30.0, 25.0], [17.5, 12.0], [4.0, 26.0]] {
            assert_eq!(defaults.violation(&x), configured.violation(&x));
        }
        assert_eq!(defaults.bounds().lo(), &[5.0, 5.0]);
        assert_eq!(defaults.bounds().hi(), &[30.0, 25.0]);
        assert_eq!(defaults.num_margins(), 6);
        assert_eq!(defaults.num_inequalities(), 2);
    }

    #[test]
    fn corners_are_feasible() {
        let region = default_constraints();

        for x in [[5.0, 5.0], [5.0, 25.0], [30.0, 5.0], [30.0, 25.0]] {
            assert!(region.is_feasible(&x), "{x:?}");
        }
        assert!(!region.is_feasible(&[30.5, 10.0]));
        assert!(!region.is_feasible(&[10.0, 4.9]));
    }

    #[test]
    fn tighter_cap_is_enforced_separately() {
        let limits = LimitsConfig {
            co_max: 20.0,
            ..LimitsConfig::default()
        };
        let region = constraints_from(&limits).unwrap();

        assert!(region.bounds().contains(&[25.0, 10.0]));
        assert!(!region.is_feasible(&[25.0, 10.0]));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let limits = LimitsConfig {
            ch4: [25.0, 5.0],
            ..LimitsConfig::default()
        };
        assert!(matches!(
            constraints_from(&limits),
            Err(BoundsError::Inverted { index: 1, .. })
        ));
    }
}
