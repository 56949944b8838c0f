//! Request boundary.
//!
//! [`Engine::respond`] is the only entry point a host needs: it takes the
//! statistic name and the decoded JSON payload and always produces a
//! [`Response`]. Failures from every stage are converted into the 400 error
//! shape here and nowhere else.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer, ser::SerializeMap};
use serde_json::Value;

use crate::{
    central,
    dataset::Dataset,
    error::{BAD_REQUEST, ErrorResponse, StatError},
    grouped::NormalizedClasses,
    mode::{self, BoundaryPolicy},
};

/// Status attached to a successful response.
pub const OK: u16 = 200;

/// A statistic the engine can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statistic {
    Mean,
    Median,
    Mode,
}

impl Statistic {
    pub const ALL: [Self; 3] = [Self::Mean, Self::Median, Self::Mode];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.name(), f)
    }
}

impl FromStr for Statistic {
    type Err = StatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|statistic| statistic.name() == s)
            .ok_or_else(|| StatError::UnknownStatistic { name: s.to_owned() })
    }
}

/// Value of a computed statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Single(#[serde(serialize_with = "serialize_number")] f64),
    Multiple(#[serde(serialize_with = "serialize_numbers")] Vec<f64>),
}

/// Successful result, serialized as `{"<statistic>": <value>}`.
#[derive(Debug, Clone, PartialEq)]
pub struct StatResult {
    pub statistic: Statistic,
    pub value: StatValue,
}

impl Serialize for StatResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.statistic.name(), &self.value)?;
        map.end()
    }
}

/// Integral values that fit an `i64` exactly are written as JSON integers,
/// everything else as floats. `[1, 2]` therefore stays `[1, 2]` on the wire.
#[expect(clippy::cast_possible_truncation)]
fn serialize_number<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0; // 2^53
    let value = *value;
    if value.fract() == 0.0 && value.abs() <= EXACT_LIMIT {
        return serializer.serialize_i64(value as i64);
    }
    serializer.serialize_f64(value)
}

#[expect(clippy::ptr_arg)]
fn serialize_numbers<S>(values: &Vec<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    struct Number(f64);
    impl Serialize for Number {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serialize_number(&self.0, serializer)
        }
    }
    serializer.collect_seq(values.iter().copied().map(Number))
}

/// Outcome of one request, paired with its HTTP-equivalent status.
#[derive(Debug, Clone, PartialEq, Serialize, derive_more::IsVariant)]
#[serde(untagged)]
pub enum Response {
    Ok(StatResult),
    Err(ErrorResponse),
}

impl Response {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Ok(_) => OK,
            Self::Err(err) => err.code,
        }
    }

    /// The response body as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        // both variants serialize to plain maps with string keys
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Result<StatResult, StatError>> for Response {
    fn from(result: Result<StatResult, StatError>) -> Self {
        match result {
            Ok(result) => Self::Ok(result),
            Err(err) => Self::Err(ErrorResponse::from(&err)),
        }
    }
}

/// Engine settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Policy for a modal class without a neighbour on one side.
    pub boundary_policy: BoundaryPolicy,
}

/// Stateless statistics engine.
///
/// # Examples
///
/// ```
/// use freqstat_stats::engine::Engine;
/// use serde_json::json;
///
/// let engine = Engine::default();
///
/// let response = engine.respond("mean", &json!([1, 2, 3, 4]));
/// assert_eq!(response.status(), 200);
/// assert_eq!(response.to_json(), json!({"mean": 2.5}));
///
/// let response = engine.respond("mode", &json!([1, 1, 2, 2, 3]));
/// assert_eq!(response.to_json(), json!({"mode": [1, 2]}));
///
/// let response = engine.respond("median", &json!([]));
/// assert_eq!(response.status(), 400);
/// assert_eq!(
///     response.to_json(),
///     json!({"code": 400, "message": "EmptyInput: Data is empty."})
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses the statistic name, computes it and converts any failure into a 400 response.
    #[must_use]
    pub fn respond(&self, statistic: &str, payload: &Value) -> Response {
        let result = statistic
            .parse::<Statistic>()
            .and_then(|statistic| self.compute(statistic, payload));
        if let Err(err) = &result {
            tracing::debug!(
                statistic,
                kind = err.kind(),
                status = BAD_REQUEST,
                "request rejected: {err}"
            );
        }
        Response::from(result)
    }

    /// Classifies `payload` and computes `statistic` on it.
    pub fn compute(&self, statistic: Statistic, payload: &Value) -> Result<StatResult, StatError> {
        let dataset = Dataset::classify(payload)?;
        let value = match (statistic, &dataset) {
            (Statistic::Mean, Dataset::RawSamples(samples)) => {
                StatValue::Single(central::mean(samples.iter().copied())?)
            }
            (Statistic::Mean, Dataset::GroupedClasses(classes)) => {
                let normalized = NormalizedClasses::new(classes)?;
                StatValue::Single(central::mean_weighted(&normalized.classes)?)
            }
            (Statistic::Median, Dataset::RawSamples(samples)) => {
                StatValue::Single(central::median_raw(samples)?)
            }
            (Statistic::Median, Dataset::GroupedClasses(classes)) => {
                let normalized = NormalizedClasses::new(classes)?;
                StatValue::Single(central::median_classes(
                    &normalized.classes,
                    normalized.interval,
                )?)
            }
            (Statistic::Mode, Dataset::RawSamples(samples)) => {
                StatValue::Multiple(mode::multimode(samples))
            }
            (Statistic::Mode, Dataset::GroupedClasses(classes)) => {
                StatValue::Single(mode::grouped_mode(classes, self.config.boundary_policy)?)
            }
        };
        tracing::debug!(%statistic, shape = dataset.shape(), ?value, "computed statistic");
        Ok(StatResult { statistic, value })
    }
}

/// Computes `statistic` on `payload` with the default configuration.
///
/// # Examples
///
/// ```
/// use freqstat_stats::engine::compute;
/// use serde_json::json;
///
/// let classes = json!([
///     {"lower_limit": 0, "upper_limit": 10, "frequency": 5},
///     {"lower_limit": 10, "upper_limit": 20, "frequency": 10},
///     {"lower_limit": 20, "upper_limit": 30, "frequency": 5},
/// ]);
/// assert_eq!(compute("median", &classes).to_json(), json!({"median": 15}));
/// ```
#[must_use]
pub fn compute(statistic: &str, payload: &Value) -> Response {
    Engine::default().respond(statistic, payload)
}
