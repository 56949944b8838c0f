//! Input classification.
//!
//! A request payload is decoded JSON of unknown shape. [`Dataset::classify`]
//! inspects it exactly once and produces a tagged variant, so that every
//! calculator downstream works on typed data instead of re-inspecting JSON.

use serde_json::{Map, Value};

use crate::error::StatError;

pub(crate) const LOWER_LIMIT: &str = "lower_limit";
pub(crate) const UPPER_LIMIT: &str = "upper_limit";
pub(crate) const MID: &str = "mid";
pub(crate) const FREQUENCY: &str = "frequency";
pub(crate) const INTERVAL: &str = "interval";

/// One class of a grouped frequency distribution.
///
/// Every field is kept optional as supplied by the caller; which of them are
/// required depends on the statistic being computed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrequencyClass {
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
    pub mid: Option<f64>,
    pub frequency: Option<u64>,
    pub interval: Option<f64>,
}

impl FrequencyClass {
    /// Explicit midpoint, or the centre of the class limits.
    #[must_use]
    pub fn mid(&self) -> Option<f64> {
        self.mid.or_else(|| {
            let (lower, upper) = self.lower_limit.zip(self.upper_limit)?;
            Some(f64::midpoint(upper, lower))
        })
    }

    /// Midpoint, or a missing-field error naming the first absent limit.
    pub fn require_mid(&self) -> Result<f64, StatError> {
        if let Some(mid) = self.mid() {
            return Ok(mid);
        }
        if self.lower_limit.is_none() {
            Err(StatError::missing(LOWER_LIMIT))
        } else {
            Err(StatError::missing(UPPER_LIMIT))
        }
    }

    /// `upper_limit - lower_limit`, when both limits are present.
    #[must_use]
    pub fn width(&self) -> Option<f64> {
        let (lower, upper) = self.lower_limit.zip(self.upper_limit)?;
        Some(upper - lower)
    }

    /// Explicit interval, falling back to the width derived from the limits.
    #[must_use]
    pub fn interval_candidate(&self) -> Option<f64> {
        self.interval.or_else(|| self.width())
    }

    pub fn require_frequency(&self) -> Result<u64, StatError> {
        self.frequency.ok_or(StatError::missing(FREQUENCY))
    }

    pub fn require_lower_limit(&self) -> Result<f64, StatError> {
        self.lower_limit.ok_or(StatError::missing(LOWER_LIMIT))
    }

    /// Parses a class from a JSON object.
    ///
    /// Unknown keys are ignored and `null` is treated as absent. A present
    /// field of the wrong type is an [`StatError::InvalidFieldValue`].
    pub fn from_object(object: &Map<String, Value>) -> Result<Self, StatError> {
        Ok(Self {
            lower_limit: number_field(object, LOWER_LIMIT)?,
            upper_limit: number_field(object, UPPER_LIMIT)?,
            mid: number_field(object, MID)?,
            frequency: count_field(object, FREQUENCY)?,
            interval: number_field(object, INTERVAL)?,
        })
    }
}

fn number_field(object: &Map<String, Value>, field: &'static str) -> Result<Option<f64>, StatError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).map(Some).ok_or(
            StatError::InvalidFieldValue {
                field,
                expected: "a finite number",
            },
        ),
        Some(_) => Err(StatError::InvalidFieldValue {
            field,
            expected: "a number",
        }),
    }
}

fn count_field(object: &Map<String, Value>, field: &'static str) -> Result<Option<u64>, StatError> {
    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_u64().map(Some).ok_or(StatError::InvalidFieldValue {
            field,
            expected: "a non-negative integer",
        }),
        Some(_) => Err(StatError::InvalidFieldValue {
            field,
            expected: "a non-negative integer",
        }),
    }
}

/// A classified request payload.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum Dataset {
    /// Individual numeric observations, in caller order.
    RawSamples(Vec<f64>),
    /// A grouped frequency table, in caller order.
    GroupedClasses(Vec<FrequencyClass>),
}

impl Dataset {
    /// Classifies a decoded JSON payload.
    ///
    /// # Examples
    ///
    /// ```
    /// use freqstat_stats::dataset::Dataset;
    /// use serde_json::json;
    ///
    /// let raw = Dataset::classify(&json!([1, 2.5, 3])).unwrap();
    /// assert_eq!(raw, Dataset::RawSamples(vec![1.0, 2.5, 3.0]));
    ///
    /// let grouped = Dataset::classify(&json!([{"mid": 5, "frequency": 2}])).unwrap();
    /// assert!(grouped.is_grouped_classes());
    ///
    /// assert!(Dataset::classify(&json!([1, {"mid": 5}])).is_err());
    /// ```
    pub fn classify(payload: &Value) -> Result<Self, StatError> {
        let Value::Array(elements) = payload else {
            return Err(StatError::NotAnArray);
        };
        let Some(first) = elements.first() else {
            return Err(StatError::EmptyInput);
        };

        let dataset = match first {
            Value::Number(_) => elements
                .iter()
                .map(|element| match element {
                    Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Self::RawSamples)
                .ok_or(StatError::MixedOrInvalidElementTypes)?,
            Value::Object(_) => {
                // shape first: a bad field never masks a non-object element
                let objects = elements
                    .iter()
                    .map(Value::as_object)
                    .collect::<Option<Vec<_>>>()
                    .ok_or(StatError::MixedOrInvalidElementTypes)?;
                let classes = objects
                    .into_iter()
                    .map(FrequencyClass::from_object)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::GroupedClasses(classes)
            }
            _ => return Err(StatError::MixedOrInvalidElementTypes),
        };

        tracing::debug!(
            shape = dataset.shape(),
            len = elements.len(),
            "classified payload"
        );
        Ok(dataset)
    }

    /// Short label of the variant, used in log output.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::RawSamples(_) => "raw",
            Self::GroupedClasses(_) => "grouped",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_array_is_rejected() {
        for payload in [json!({"a": 1}), json!(3), json!("1,2,3"), json!(null)] {
            assert_eq!(Dataset::classify(&payload), Err(StatError::NotAnArray));
        }
    }

    #[test]
    fn test_empty_array_is_rejected() {
        assert_eq!(Dataset::classify(&json!([])), Err(StatError::EmptyInput));
    }

    #[test]
    fn test_mixed_elements_are_rejected() {
        let payloads = [
            json!([1, {"mid": 1, "frequency": 1}]),
            json!([{"mid": 1, "frequency": 1}, 2]),
            json!([{"mid": 1, "frequency": "x"}, 2]),
            json!([{"mid": "a"}, {"frequency": -1}, [3]]),
            json!([1, "2"]),
            json!([true, false]),
            json!([[1, 2]]),
            json!([null]),
        ];
        for payload in payloads {
            assert_eq!(
                Dataset::classify(&payload),
                Err(StatError::MixedOrInvalidElementTypes),
                "payload: {payload}"
            );
        }
    }

    #[test]
    fn test_integers_and_floats_are_raw_samples() {
        let dataset = Dataset::classify(&json!([1, -2, 3.5])).unwrap();
        assert_eq!(dataset, Dataset::RawSamples(vec![1.0, -2.0, 3.5]));
    }

    #[test]
    fn test_class_fields_are_parsed() {
        let dataset = Dataset::classify(&json!([
            {"lower_limit": 0, "upper_limit": 10, "frequency": 5, "note": "ignored"},
            {"mid": 15, "frequency": 3, "interval": 10, "lower_limit": null},
        ]))
        .unwrap();
        let Dataset::GroupedClasses(classes) = dataset else {
            panic!("expected grouped classes");
        };
        assert_eq!(
            classes[0],
            FrequencyClass {
                lower_limit: Some(0.0),
                upper_limit: Some(10.0),
                frequency: Some(5),
                ..FrequencyClass::default()
            }
        );
        assert_eq!(classes[1].lower_limit, None);
        assert_eq!(classes[1].mid, Some(15.0));
        assert_eq!(classes[1].interval, Some(10.0));
    }

    #[test]
    fn test_missing_frequency_is_deferred_to_computation() {
        let dataset = Dataset::classify(&json!([{"mid": 1}])).unwrap();
        let Dataset::GroupedClasses(classes) = dataset else {
            panic!("expected grouped classes");
        };
        assert_eq!(
            classes[0].require_frequency(),
            Err(StatError::missing(FREQUENCY))
        );
    }

    #[test]
    fn test_invalid_field_values() {
        let cases = [
            (json!([{"mid": 1, "frequency": -1}]), FREQUENCY),
            (json!([{"mid": 1, "frequency": 1.5}]), FREQUENCY),
            (json!([{"mid": 1, "frequency": "3"}]), FREQUENCY),
            (json!([{"mid": "1", "frequency": 3}]), MID),
            (json!([{"lower_limit": [0], "frequency": 3}]), LOWER_LIMIT),
        ];
        for (payload, expected_field) in cases {
            match Dataset::classify(&payload) {
                Err(StatError::InvalidFieldValue { field, .. }) => {
                    assert_eq!(field, expected_field, "payload: {payload}");
                }
                other => panic!("unexpected result {other:?} for {payload}"),
            }
        }
    }

    #[test]
    fn test_mid_derivation() {
        let class = FrequencyClass {
            lower_limit: Some(10.0),
            upper_limit: Some(20.0),
            ..FrequencyClass::default()
        };
        assert_eq!(class.mid(), Some(15.0));
        assert_eq!(class.width(), Some(10.0));
        assert_eq!(class.interval_candidate(), Some(10.0));

        let explicit = FrequencyClass {
            mid: Some(14.0),
            interval: Some(5.0),
            ..class
        };
        assert_eq!(explicit.mid(), Some(14.0));
        assert_eq!(explicit.interval_candidate(), Some(5.0));
    }

    #[test]
    fn test_require_mid_names_missing_limit() {
        let no_limits = FrequencyClass::default();
        assert_eq!(no_limits.require_mid(), Err(StatError::missing(LOWER_LIMIT)));

        let lower_only = FrequencyClass {
            lower_limit: Some(0.0),
            ..FrequencyClass::default()
        };
        assert_eq!(lower_only.require_mid(), Err(StatError::missing(UPPER_LIMIT)));
    }
}
