//! Mean and interpolated grouped median.

use crate::{dataset::INTERVAL, error::StatError, grouped::WeightedValue};

/// Class interval assumed for raw samples.
pub const RAW_INTERVAL: f64 = 1.0;

/// Arithmetic mean of a sequence of values, summed in iteration order.
///
/// # Examples
///
/// ```
/// use freqstat_stats::central::mean;
///
/// assert_eq!(mean([1.0, 2.0, 3.0, 4.0]), Ok(2.5));
/// assert!(mean(Vec::new()).is_err());
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean<I>(values: I) -> Result<f64, StatError>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_u64), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return Err(StatError::ArithmeticFailure {
            reason: "mean of an empty frequency distribution",
        });
    }
    finite(sum / count as f64)
}

/// Arithmetic mean of weighted values, `sum(value * count) / sum(count)`.
///
/// Runs once per class, so a large `count` costs nothing extra. When every
/// `value * count` is exact in `f64` (e.g. integral or dyadic midpoints) the
/// result equals [`mean`] over the expanded samples.
///
/// # Examples
///
/// ```
/// use freqstat_stats::{central::mean_weighted, grouped::WeightedValue};
///
/// let classes = [(5.0, 2), (15.0, 1)].map(|(value, count)| WeightedValue { value, count });
/// assert_eq!(mean_weighted(&classes), Ok(25.0 / 3.0));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn mean_weighted(values: &[WeightedValue]) -> Result<f64, StatError> {
    let total = total_count(values)?;
    if total == 0 {
        return Err(StatError::ArithmeticFailure {
            reason: "mean of an empty frequency distribution",
        });
    }
    let sum = values
        .iter()
        .filter(|v| v.count > 0)
        .map(|v| v.value * v.count as f64)
        .sum::<f64>();
    finite(sum / total as f64)
}

/// Interpolated grouped median of weighted values.
///
/// With `n` the total count and `x` the value at sorted position `n / 2`, the
/// median class is the bin of width `interval` centred on `x`:
///
/// ```text
/// median = (x - interval / 2) + ((n / 2 - cf) / f) * interval
/// ```
///
/// where `cf` counts values strictly below `x` and `f` counts values equal to
/// `x`. The same formula applies for odd and even `n`; a dataset with a single
/// distinct value yields that value.
///
/// # Examples
///
/// ```
/// use freqstat_stats::{central::median_grouped, grouped::WeightedValue};
///
/// let classes = [(5.0, 5), (15.0, 10), (25.0, 5)]
///     .map(|(value, count)| WeightedValue { value, count });
/// assert_eq!(median_grouped(&classes, 10.0), Ok(15.0));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn median_grouped(values: &[WeightedValue], interval: f64) -> Result<f64, StatError> {
    let mut sorted = values
        .iter()
        .copied()
        .filter(|v| v.count > 0)
        .collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.value.total_cmp(&b.value));

    let total = total_count(&sorted)?;
    if total == 0 {
        return Err(StatError::ArithmeticFailure {
            reason: "median of an empty frequency distribution",
        });
    }

    let position = total / 2;
    let mut cumulative = 0_u64;
    let mut middle = None;
    for v in &sorted {
        cumulative += v.count;
        if cumulative > position {
            middle = Some(v.value);
            break;
        }
    }
    let Some(x) = middle else {
        return Err(StatError::ArithmeticFailure {
            reason: "median position out of range",
        });
    };

    let (below, at_or_below) = sorted.iter().fold((0_u64, 0_u64), |(below, at), v| {
        (
            below + if v.value < x { v.count } else { 0 },
            at + if v.value <= x { v.count } else { 0 },
        )
    });
    let cf = below as f64;
    let f = (at_or_below - below) as f64;
    let n = total as f64;

    let lower_boundary = x - interval / 2.0;
    tracing::trace!(x, lower_boundary, cf, f, n, interval, "grouped median bin");
    finite(lower_boundary + ((n / 2.0 - cf) / f) * interval)
}

/// Grouped median for raw samples, each weighted once with interval 1.
pub fn median_raw(samples: &[f64]) -> Result<f64, StatError> {
    let weighted = samples
        .iter()
        .map(|&value| WeightedValue { value, count: 1 })
        .collect::<Vec<_>>();
    median_grouped(&weighted, RAW_INTERVAL)
}

/// Grouped median for a normalized table; the shared interval is required.
pub fn median_classes(values: &[WeightedValue], interval: Option<f64>) -> Result<f64, StatError> {
    let interval = interval.ok_or(StatError::missing(INTERVAL))?;
    median_grouped(values, interval)
}

fn total_count(values: &[WeightedValue]) -> Result<u64, StatError> {
    values
        .iter()
        .try_fold(0_u64, |total, v| total.checked_add(v.count))
        .ok_or(StatError::ArithmeticFailure {
            reason: "total frequency overflows",
        })
}

pub(crate) fn finite(value: f64) -> Result<f64, StatError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatError::ArithmeticFailure {
            reason: "result is not a finite number",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weighted(pairs: &[(f64, u64)]) -> Vec<WeightedValue> {
        pairs
            .iter()
            .map(|&(value, count)| WeightedValue { value, count })
            .collect()
    }

    #[test]
    fn test_mean_is_sum_over_len() {
        let samples = [0.1, 0.2, 0.7, 13.25, -4.0];
        let expected = samples.iter().sum::<f64>() / 5.0;
        assert_eq!(mean(samples), Ok(expected));
    }

    #[test]
    fn test_mean_overflow() {
        assert!(matches!(
            mean([f64::MAX, f64::MAX]),
            Err(StatError::ArithmeticFailure { .. })
        ));
    }

    #[test]
    fn test_weighted_mean_matches_expanded_mean() {
        let classes = weighted(&[(0.5, 3), (2.25, 2), (9.0, 1), (4.0, 0)]);
        let expanded = [0.5, 0.5, 0.5, 2.25, 2.25, 9.0];
        assert_eq!(mean_weighted(&classes), mean(expanded));
    }

    #[test]
    fn test_weighted_mean_with_huge_counts() {
        assert_eq!(mean_weighted(&weighted(&[(1.0, u64::MAX)])), Ok(1.0));
        assert_eq!(
            mean_weighted(&weighted(&[(2.0, u64::MAX - 1), (4.0, 1)])),
            Ok(2.0)
        );
        assert_eq!(
            mean_weighted(&weighted(&[(1.0, u64::MAX), (3.0, 1)])),
            Err(StatError::ArithmeticFailure {
                reason: "total frequency overflows"
            })
        );
        assert!(matches!(
            mean_weighted(&weighted(&[(1.0, 0)])),
            Err(StatError::ArithmeticFailure { .. })
        ));
    }

    #[test]
    fn test_raw_median_even_and_odd() {
        // sorted [1, 2, 3, 4]: x = 3, L = 2.5, cf = 2, f = 1
        assert_eq!(median_raw(&[4.0, 1.0, 3.0, 2.0]), Ok(2.5));
        // sorted [1, 2, 3]: x = 2, L = 1.5, cf = 1, f = 1
        assert_eq!(median_raw(&[3.0, 1.0, 2.0]), Ok(2.0));
        // sorted [1, 3, 3, 3, 5]: x = 3, L = 2.5, cf = 1, f = 3
        assert_eq!(median_raw(&[3.0, 5.0, 3.0, 1.0, 3.0]), Ok(2.5 + 1.5 / 3.0));
    }

    #[test]
    fn test_single_distinct_value() {
        assert_eq!(median_raw(&[7.0]), Ok(7.0));
        assert_eq!(median_raw(&[7.0, 7.0, 7.0, 7.0]), Ok(7.0));
        assert_eq!(median_grouped(&weighted(&[(35.0, 9)]), 10.0), Ok(35.0));
    }

    #[test]
    fn test_grouped_median_reference() {
        let classes = weighted(&[(5.0, 5), (15.0, 10), (25.0, 5)]);
        assert_eq!(median_grouped(&classes, 10.0), Ok(15.0));
    }

    #[test]
    fn test_grouped_median_ignores_class_order_and_empty_classes() {
        let classes = weighted(&[(25.0, 5), (35.0, 0), (5.0, 5), (15.0, 10)]);
        assert_eq!(median_grouped(&classes, 10.0), Ok(15.0));
    }

    #[test]
    fn test_grouped_median_interpolates_within_class() {
        // n = 10, position 5 falls into the class at 15 (cf = 3, f = 4)
        let classes = weighted(&[(5.0, 3), (15.0, 4), (25.0, 3)]);
        assert_eq!(median_grouped(&classes, 10.0), Ok(10.0 + (2.0 / 4.0) * 10.0));
    }

    #[test]
    fn test_empty_distribution() {
        assert!(matches!(
            median_grouped(&weighted(&[(5.0, 0), (15.0, 0)]), 10.0),
            Err(StatError::ArithmeticFailure { .. })
        ));
    }

    #[test]
    fn test_classes_require_interval() {
        assert_eq!(
            median_classes(&weighted(&[(5.0, 1)]), None),
            Err(StatError::MissingRequiredField { field: "interval" })
        );
    }
}
