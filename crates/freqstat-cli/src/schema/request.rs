use freqstat_stats::{
    engine::{Engine, Response},
    error::{BAD_REQUEST, ErrorResponse},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line of a batch input file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BatchRequest {
    /// Statistic name (`mean`, `median` or `mode`)
    pub statistic: String,
    /// Payload handed to the engine unchanged
    pub data: Value,
}

/// One line of batch output, mirroring an HTTP response.
#[derive(Debug, Clone, Serialize)]
pub struct BatchResponse {
    /// 1-based line number in the input
    pub line: usize,
    pub status: u16,
    pub body: Value,
}

impl BatchResponse {
    pub fn from_response(line: usize, response: &Response) -> Self {
        Self {
            line,
            status: response.status(),
            body: response.to_json(),
        }
    }

    /// Decodes and answers a single batch line.
    ///
    /// A line that is not a valid request still gets a 400 body.
    pub fn answer(engine: &Engine, line: usize, text: &str) -> Self {
        match serde_json::from_str::<BatchRequest>(text) {
            Ok(request) => {
                Self::from_response(line, &engine.respond(&request.statistic, &request.data))
            }
            Err(err) => {
                tracing::debug!(line, "malformed batch request: {err}");
                let body = ErrorResponse {
                    code: BAD_REQUEST,
                    message: format!("MalformedRequest: {err}"),
                };
                Self {
                    line,
                    status: BAD_REQUEST,
                    body: serde_json::to_value(body).unwrap_or(Value::Null),
                }
            }
        }
    }
}
