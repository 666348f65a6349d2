//! Typed inputs for clauses that accept more than one shape
//!
//! The engine accepts several spellings for `sort`, `_source` and
//! `track_total_hits`. These enums name each spelling so the compiler rejects
//! anything else, and each converts into the JSON value stored by the
//! builder without reshaping it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the `sort` clause
///
/// # Examples
///
/// ```
/// use quarry_core::search::SortField;
/// use serde_json::json;
///
/// let by_score = SortField::from("_score");
/// assert_eq!(serde_json::Value::from(by_score), json!("_score"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SortField {
    /// A bare field name, such as `_score`
    Field(String),
    /// A mapping such as `{"title": "asc"}` or `{"price": {"order": "desc"}}`
    Spec(Map<String, Value>),
}

impl SortField {
    /// Sort on `field` in the given order (`asc` or `desc`)
    pub fn ordered<F: Into<String>, O: Into<String>>(field: F, order: O) -> Self {
        let mut spec = Map::new();
        spec.insert(field.into(), Value::String(order.into()));
        Self::Spec(spec)
    }
}

impl From<&str> for SortField {
    fn from(field: &str) -> Self {
        Self::Field(field.to_string())
    }
}

impl From<String> for SortField {
    fn from(field: String) -> Self {
        Self::Field(field)
    }
}

impl From<Map<String, Value>> for SortField {
    fn from(spec: Map<String, Value>) -> Self {
        Self::Spec(spec)
    }
}

impl From<SortField> for Value {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Field(name) => Value::String(name),
            SortField::Spec(spec) => Value::Object(spec),
        }
    }
}

/// The `_source` clause: which parts of each hit's source to return
///
/// Decoding rejects objects with keys other than `includes` and `excludes`,
/// so a decoded filter always converts back to the object it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged, from = "SourceFilterRepr")]
pub enum SourceFilter {
    /// `true` returns the whole source, `false` none of it
    Enabled(bool),
    /// A single wildcard pattern
    Pattern(String),
    /// Several wildcard patterns
    Patterns(Vec<String>),
    /// Explicit include and exclude pattern lists
    Filter {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        includes: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        excludes: Option<Vec<String>>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceFilterRepr {
    Enabled(bool),
    Pattern(String),
    Patterns(Vec<String>),
    Filter(FilterRepr),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FilterRepr {
    #[serde(default)]
    includes: Option<OneOrMany>,
    #[serde(default)]
    excludes: Option<OneOrMany>,
}

/// The engine takes a single pattern wherever it takes a list
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for Vec<String> {
    fn from(patterns: OneOrMany) -> Self {
        match patterns {
            OneOrMany::One(pattern) => vec![pattern],
            OneOrMany::Many(patterns) => patterns,
        }
    }
}

impl From<SourceFilterRepr> for SourceFilter {
    fn from(repr: SourceFilterRepr) -> Self {
        match repr {
            SourceFilterRepr::Enabled(enabled) => Self::Enabled(enabled),
            SourceFilterRepr::Pattern(pattern) => Self::Pattern(pattern),
            SourceFilterRepr::Patterns(patterns) => Self::Patterns(patterns),
            SourceFilterRepr::Filter(filter) => Self::Filter {
                includes: filter.includes.map(Into::into),
                excludes: filter.excludes.map(Into::into),
            },
        }
    }
}

impl SourceFilter {
    /// Build an includes/excludes filter
    pub fn filter<I, E, S1, S2>(includes: I, excludes: E) -> Self
    where
        I: IntoIterator<Item = S1>,
        E: IntoIterator<Item = S2>,
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::Filter {
            includes: Some(includes.into_iter().map(Into::into).collect()),
            excludes: Some(excludes.into_iter().map(Into::into).collect()),
        }
    }
}

impl From<bool> for SourceFilter {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<&str> for SourceFilter {
    fn from(pattern: &str) -> Self {
        Self::Pattern(pattern.to_string())
    }
}

impl From<String> for SourceFilter {
    fn from(pattern: String) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<Vec<String>> for SourceFilter {
    fn from(patterns: Vec<String>) -> Self {
        Self::Patterns(patterns)
    }
}

impl From<Vec<&str>> for SourceFilter {
    fn from(patterns: Vec<&str>) -> Self {
        Self::Patterns(patterns.into_iter().map(str::to_string).collect())
    }
}

impl From<SourceFilter> for Value {
    fn from(source: SourceFilter) -> Self {
        match source {
            SourceFilter::Enabled(enabled) => Value::Bool(enabled),
            SourceFilter::Pattern(pattern) => Value::String(pattern),
            SourceFilter::Patterns(patterns) => {
                Value::Array(patterns.into_iter().map(Value::String).collect())
            }
            SourceFilter::Filter { includes, excludes } => {
                let mut filter = Map::new();
                if let Some(includes) = includes {
                    filter.insert("includes".to_string(), Value::from(includes));
                }
                if let Some(excludes) = excludes {
                    filter.insert("excludes".to_string(), Value::from(excludes));
                }
                Value::Object(filter)
            }
        }
    }
}

/// The `track_total_hits` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackTotalHits {
    /// Count every hit (`true`) or skip counting (`false`)
    Enabled(bool),
    /// Count accurately up to this many hits
    UpTo(u64),
}

impl From<bool> for TrackTotalHits {
    fn from(enabled: bool) -> Self {
        Self::Enabled(enabled)
    }
}

impl From<u64> for TrackTotalHits {
    fn from(limit: u64) -> Self {
        Self::UpTo(limit)
    }
}

impl From<TrackTotalHits> for Value {
    fn from(track: TrackTotalHits) -> Self {
        match track {
            TrackTotalHits::Enabled(enabled) => Value::Bool(enabled),
            TrackTotalHits::UpTo(limit) => Value::from(limit),
        }
    }
}
