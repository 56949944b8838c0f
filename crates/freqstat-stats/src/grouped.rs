//! Normalization of grouped frequency tables.
//!
//! Each class is reduced to a `(mid, frequency)` pair and all classes are
//! checked against a single shared class interval. The weighted pairs feed the
//! mean and the grouped median directly; the expanded sample sequence is only
//! produced lazily on request.

use std::iter;

use crate::{dataset::FrequencyClass, error::StatError};

/// Running check that every class agrees on one class interval.
///
/// The interval is seeded from the first class that carries one (explicit
/// `interval`, or `upper_limit - lower_limit`). A later class matches when
/// either of those representations equals the seeded interval exactly; a class
/// carrying neither is not checked.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalCheck {
    current: Option<f64>,
}

impl IntervalCheck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[expect(clippy::float_cmp)]
    pub fn accept(&mut self, class: &FrequencyClass) -> Result<(), StatError> {
        let Some(candidate) = class.interval_candidate() else {
            return Ok(());
        };
        let Some(current) = self.current else {
            self.current = Some(candidate);
            return Ok(());
        };
        let matches_explicit = class.interval.is_some_and(|interval| interval == current);
        let matches_width = class.width().is_some_and(|width| width == current);
        if matches_explicit || matches_width {
            Ok(())
        } else {
            Err(StatError::InconsistentClassIntervals)
        }
    }

    /// The shared interval, if any class carried one.
    #[must_use]
    pub fn interval(&self) -> Option<f64> {
        self.current
    }
}

/// Validates interval consistency across `classes` and returns the shared interval.
///
/// # Examples
///
/// ```
/// use freqstat_stats::{dataset::FrequencyClass, grouped::shared_interval};
///
/// let class = |lower: f64, upper: f64| FrequencyClass {
///     lower_limit: Some(lower),
///     upper_limit: Some(upper),
///     frequency: Some(1),
///     ..FrequencyClass::default()
/// };
/// assert_eq!(shared_interval(&[class(0.0, 10.0), class(10.0, 20.0)]), Ok(Some(10.0)));
/// assert!(shared_interval(&[class(0.0, 10.0), class(10.0, 25.0)]).is_err());
/// ```
pub fn shared_interval(classes: &[FrequencyClass]) -> Result<Option<f64>, StatError> {
    let mut check = IntervalCheck::new();
    for class in classes {
        check.accept(class)?;
    }
    Ok(check.interval())
}

/// A class reduced to its midpoint and count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedValue {
    pub value: f64,
    pub count: u64,
}

/// A grouped frequency table after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedClasses {
    /// Classes in caller order.
    pub classes: Vec<WeightedValue>,
    /// Interval shared by every class, if any class carried one.
    pub interval: Option<f64>,
}

impl NormalizedClasses {
    /// Derives midpoints, checks the shared interval and requires a frequency on every class.
    ///
    /// Classes are processed in caller order and the first failure wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use freqstat_stats::{dataset::FrequencyClass, grouped::NormalizedClasses};
    ///
    /// let classes = [
    ///     FrequencyClass { lower_limit: Some(0.0), upper_limit: Some(10.0), frequency: Some(2), ..Default::default() },
    ///     FrequencyClass { lower_limit: Some(10.0), upper_limit: Some(20.0), frequency: Some(1), ..Default::default() },
    /// ];
    /// let normalized = NormalizedClasses::new(&classes).unwrap();
    /// assert_eq!(normalized.interval, Some(10.0));
    /// assert_eq!(normalized.expanded_samples().collect::<Vec<_>>(), [5.0, 5.0, 15.0]);
    /// ```
    pub fn new(classes: &[FrequencyClass]) -> Result<Self, StatError> {
        let mut check = IntervalCheck::new();
        let classes = classes
            .iter()
            .map(|class| {
                let value = class.require_mid()?;
                check.accept(class)?;
                let count = class.require_frequency()?;
                Ok(WeightedValue { value, count })
            })
            .collect::<Result<Vec<_>, StatError>>()?;

        Ok(Self {
            classes,
            interval: check.interval(),
        })
    }

    /// Each class midpoint repeated `frequency` times, in caller order.
    pub fn expanded_samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.classes.iter().flat_map(|class| {
            // a count beyond usize::MAX cannot be materialized anyway
            let count = usize::try_from(class.count).unwrap_or(usize::MAX);
            iter::repeat_n(class.value, count)
        })
    }

    /// Sum of all class frequencies.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.classes
            .iter()
            .fold(0_u64, |total, class| total.saturating_add(class.count))
    }
}
