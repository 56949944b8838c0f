use serde::{Deserialize, Serialize};

/// HTTP-equivalent status attached to every rejected request.
pub const BAD_REQUEST: u16 = 400;

/// Failure raised while classifying or computing a statistic.
///
/// The [`Display`](std::fmt::Display) output is the human-readable
/// description only; [`StatError::kind`] supplies the variant name used as
/// the prefix of the wire message.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum StatError {
    #[display("Data is empty.")]
    EmptyInput,
    #[display("Data must be an array.")]
    NotAnArray,
    #[display("Data must be an array of JSON objects, or an array of floats.")]
    MixedOrInvalidElementTypes,
    #[display("Missing required field '{field}'.")]
    MissingRequiredField { field: &'static str },
    #[display("Field '{field}' must be {expected}.")]
    InvalidFieldValue {
        field: &'static str,
        expected: &'static str,
    },
    #[display("Inconsistent class intervals.")]
    InconsistentClassIntervals,
    #[display("{reason}")]
    ArithmeticFailure { reason: &'static str },
    #[display("Modal class has no neighbouring class on one side.")]
    BoundaryModalClass,
    #[display("Unknown statistic '{name}'. Expected one of: mean, median, mode.")]
    UnknownStatistic { name: String },
}

impl StatError {
    pub(crate) const fn missing(field: &'static str) -> Self {
        Self::MissingRequiredField { field }
    }

    /// Name of the variant, as it appears in front of the wire message.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EmptyInput",
            Self::NotAnArray => "NotAnArray",
            Self::MixedOrInvalidElementTypes => "MixedOrInvalidElementTypes",
            Self::MissingRequiredField { .. } => "MissingRequiredField",
            Self::InvalidFieldValue { .. } => "InvalidFieldValue",
            Self::InconsistentClassIntervals => "InconsistentClassIntervals",
            Self::ArithmeticFailure { .. } => "ArithmeticFailure",
            Self::BoundaryModalClass => "BoundaryModalClass",
            Self::UnknownStatistic { .. } => "UnknownStatistic",
        }
    }
}

/// Wire shape of a rejected request: `{"code": 400, "message": "<Kind>: <description>"}`.
///
/// # Examples
///
/// ```
/// use freqstat_stats::error::{ErrorResponse, StatError};
///
/// let response = ErrorResponse::from(&StatError::EmptyInput);
/// assert_eq!(response.code, 400);
/// assert_eq!(response.message, "EmptyInput: Data is empty.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl From<&StatError> for ErrorResponse {
    fn from(err: &StatError) -> Self {
        Self {
            code: BAD_REQUEST,
            message: format!("{}: {err}", err.kind()),
        }
    }
}

impl From<StatError> for ErrorResponse {
    fn from(err: StatError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_prefixed_with_kind() {
        let cases = [
            (StatError::NotAnArray, "NotAnArray: Data must be an array."),
            (
                StatError::MixedOrInvalidElementTypes,
                "MixedOrInvalidElementTypes: Data must be an array of JSON objects, or an array of floats.",
            ),
            (
                StatError::missing("frequency"),
                "MissingRequiredField: Missing required field 'frequency'.",
            ),
            (
                StatError::InconsistentClassIntervals,
                "InconsistentClassIntervals: Inconsistent class intervals.",
            ),
            (
                StatError::ArithmeticFailure {
                    reason: "division by zero",
                },
                "ArithmeticFailure: division by zero",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(ErrorResponse::from(err).message, expected);
        }
    }

    #[test]
    fn test_serialized_shape() {
        let response = ErrorResponse::from(StatError::EmptyInput);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"code": 400, "message": "EmptyInput: Data is empty."})
        );
    }
}
