//! Descriptive statistics over raw samples and grouped frequency tables.
//!
//! This crate computes mean, median and mode for a JSON payload that is either
//! an array of numbers or an array of frequency classes:
//!
//! - **Classification**: decide once whether a payload is raw or grouped
//! - **Grouped normalization**: derive class midpoints and check a shared class interval
//! - **Central tendency**: arithmetic mean and interpolated grouped median
//! - **Mode**: multimodal detection for raw samples, interpolation for grouped tables
//! - **Error reporting**: every failure becomes a `{"code": 400, "message": ...}` body
//!
//! # Modules
//!
//! - [`dataset`]: Payload classification into [`dataset::Dataset`]
//! - [`grouped`]: Interval validation and expanded sample sequences
//! - [`central`]: Mean and grouped median
//! - [`mode`]: Raw multimode and grouped mode with a configurable boundary policy
//! - [`error`]: Error taxonomy and its wire shape
//! - [`engine`]: The request boundary tying everything together
//!
//! Median and mode deliberately use different formulas for raw and grouped
//! input, so they generally differ between a sample set and its grouped
//! reconstruction. The mean does not: it is computed over the expanded sample
//! sequence and matches the raw mean exactly.
//!
//! # Examples
//!
//! ## Raw samples
//!
//! ```
//! use freqstat_stats::engine::compute;
//! use serde_json::json;
//!
//! assert_eq!(compute("mean", &json!([1, 2, 3, 4])).to_json(), json!({"mean": 2.5}));
//! assert_eq!(compute("mode", &json!([1, 1, 2, 2, 3])).to_json(), json!({"mode": [1, 2]}));
//! ```
//!
//! ## Grouped frequency table
//!
//! ```
//! use freqstat_stats::engine::compute;
//! use serde_json::json;
//!
//! let classes = json!([
//!     {"lower_limit": 0, "upper_limit": 10, "frequency": 2},
//!     {"lower_limit": 10, "upper_limit": 20, "frequency": 3},
//!     {"lower_limit": 20, "upper_limit": 30, "frequency": 5},
//!     {"lower_limit": 30, "upper_limit": 40, "frequency": 7},
//!     {"lower_limit": 40, "upper_limit": 50, "frequency": 1},
//! ]);
//! assert_eq!(compute("mode", &classes).to_json(), json!({"mode": 32.5}));
//! ```
//!
//! ## Errors
//!
//! ```
//! use freqstat_stats::engine::compute;
//! use serde_json::json;
//!
//! let response = compute("mean", &json!([]));
//! assert_eq!(response.status(), 400);
//! assert_eq!(
//!     response.to_json(),
//!     json!({"code": 400, "message": "EmptyInput: Data is empty."})
//! );
//! ```

pub mod central;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod grouped;
pub mod mode;
