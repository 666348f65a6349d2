//! Search request shaping and result decoration
//!
//! This module sits between application code and the engine's `_search`
//! API:
//! - [`parameters`] accumulates request options and projects them into the
//!   request shape the engine expects
//! - [`clause`] is the table of options, their placement and wire keys
//! - [`values`] holds typed inputs for options accepting several shapes
//! - [`explanation`] wraps the engine's score explanation trees
//!
//! # Examples
//!
//! ```rust
//! use quarry_core::search::{Explanation, SearchParameters, SortField};
//! use serde_json::json;
//!
//! let request = SearchParameters::new()
//!     .indices(["books"])
//!     .query(json!({"match": {"title": "rust"}}))
//!     .sort([SortField::ordered("year", "desc"), SortField::from("_score")])
//!     .explain(None)
//!     .to_value();
//!
//! assert_eq!(request["explain"], json!(true));
//! assert_eq!(request["body"]["sort"], json!([{"year": "desc"}, "_score"]));
//!
//! let explanation: Explanation = r#"{"value": 1.0, "description": "boost"}"#
//!     .parse()
//!     .unwrap();
//! assert_eq!(explanation.value(), 1.0);
//! ```

pub mod clause;
pub mod explanation;
pub mod parameters;
pub mod values;

pub use clause::{Clause, Placement};
pub use explanation::{Children, Explanation};
pub use parameters::{SearchParameters, BODY_KEY};
pub use values::{SortField, SourceFilter, TrackTotalHits};
