//! Mode estimation.
//!
//! Raw samples report every value tied for the highest count. Grouped tables
//! interpolate inside the modal class:
//!
//! ```text
//! mode = L + ((f1 - f0) / (2 * f1 - f0 - f2)) * interval
//! ```
//!
//! where `L` is the modal class's lower limit, `f1` its frequency and `f0`/`f2`
//! the frequencies of the classes immediately before/after it once sorted.

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    central::finite,
    dataset::{FrequencyClass, INTERVAL},
    error::StatError,
    grouped,
};

/// What to do when the modal class is the first or last class.
///
/// Such a class lacks a neighbour on one side, so `f0` or `f2` is undefined.
///
/// Parsed from `zero-frequency` / `reject` on the command line and stored as
/// `zero_frequency` / `reject` in configuration files.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The missing neighbour contributes a frequency of 0.
    #[default]
    ZeroFrequency,
    /// Fail with [`StatError::BoundaryModalClass`].
    Reject,
}

impl BoundaryPolicy {
    pub const ALL: [Self; 2] = [Self::ZeroFrequency, Self::Reject];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ZeroFrequency => "zero-frequency",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown boundary policy '{input}', expected zero-frequency or reject")]
pub struct ParseBoundaryPolicyError {
    input: String,
}

impl FromStr for BoundaryPolicy {
    type Err = ParseBoundaryPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.name() == s)
            .ok_or_else(|| ParseBoundaryPolicyError {
                input: s.to_owned(),
            })
    }
}

/// All values sharing the highest count, in order of first appearance.
///
/// # Examples
///
/// ```
/// use freqstat_stats::mode::multimode;
///
/// assert_eq!(multimode(&[1.0, 1.0, 2.0, 2.0, 3.0]), vec![1.0, 2.0]);
/// assert_eq!(multimode(&[4.0, 1.0, 4.0]), vec![4.0]);
/// ```
#[must_use]
pub fn multimode(samples: &[f64]) -> Vec<f64> {
    let mut counts = Vec::<(f64, usize)>::new();
    let mut index = HashMap::<u64, usize>::new();
    for &sample in samples {
        // adding 0.0 folds -0.0 into 0.0 so both share a key
        let key = (sample + 0.0).to_bits();
        let slot = *index.entry(key).or_insert_with(|| {
            counts.push((sample, 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    let max_count = counts.iter().map(|(_, count)| *count).max().unwrap_or(0);
    counts
        .into_iter()
        .filter(|(_, count)| *count == max_count)
        .map(|(value, _)| value)
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct ModeClass {
    key: f64,
    lower_limit: f64,
    frequency: u64,
}

/// Interpolated mode of a grouped frequency table.
///
/// Classes are validated for a shared interval, then sorted by midpoint (or
/// lower limit when no midpoint can be derived). The modal class is the first
/// class in that order with the highest frequency.
///
/// # Examples
///
/// ```
/// use freqstat_stats::{dataset::FrequencyClass, mode::{grouped_mode, BoundaryPolicy}};
///
/// let classes = [2, 3, 5, 7, 1]
///     .into_iter()
///     .enumerate()
///     .map(|(i, frequency)| {
///         let lower = 10.0 * i as f64;
///         FrequencyClass {
///             lower_limit: Some(lower),
///             upper_limit: Some(lower + 10.0),
///             frequency: Some(frequency),
///             ..FrequencyClass::default()
///         }
///     })
///     .collect::<Vec<_>>();
/// assert_eq!(grouped_mode(&classes, BoundaryPolicy::ZeroFrequency), Ok(32.5));
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn grouped_mode(classes: &[FrequencyClass], policy: BoundaryPolicy) -> Result<f64, StatError> {
    let interval = grouped::shared_interval(classes)?;

    let mut sorted = classes
        .iter()
        .map(|class| {
            let lower_limit = class.require_lower_limit()?;
            let frequency = class.require_frequency()?;
            Ok(ModeClass {
                key: class.mid().unwrap_or(lower_limit),
                lower_limit,
                frequency,
            })
        })
        .collect::<Result<Vec<_>, StatError>>()?;
    let interval = interval.ok_or(StatError::missing(INTERVAL))?;
    sorted.sort_by(|a, b| a.key.total_cmp(&b.key));

    let mut modal: Option<(usize, ModeClass)> = None;
    for (idx, class) in sorted.iter().enumerate() {
        if modal.is_none_or(|(_, best)| class.frequency > best.frequency) {
            modal = Some((idx, *class));
        }
    }
    let Some((idx, modal)) = modal else {
        return Err(StatError::EmptyInput);
    };

    let before = idx
        .checked_sub(1)
        .and_then(|i| sorted.get(i))
        .map(|c| c.frequency);
    let after = sorted.get(idx + 1).map(|c| c.frequency);
    let (f0, f2) = match policy {
        BoundaryPolicy::ZeroFrequency => (before.unwrap_or(0), after.unwrap_or(0)),
        BoundaryPolicy::Reject => (
            before.ok_or(StatError::BoundaryModalClass)?,
            after.ok_or(StatError::BoundaryModalClass)?,
        ),
    };

    let f1 = modal.frequency as f64;
    let f0 = f0 as f64;
    let f2 = f2 as f64;
    let denominator = 2.0 * f1 - f0 - f2;
    if denominator == 0.0 {
        return Err(StatError::ArithmeticFailure {
            reason: "division by zero: modal class frequency equals both neighbours",
        });
    }

    tracing::trace!(
        lower_limit = modal.lower_limit,
        f0,
        f1,
        f2,
        interval,
        "grouped mode class"
    );
    finite(modal.lower_limit + ((f1 - f0) / denominator) * interval)
}
