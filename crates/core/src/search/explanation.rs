//! Score explanation trees
//!
//! When a search runs with `explain` enabled, each hit carries an
//! `_explanation` object describing how its score was computed:
//!
//! ```json
//! {
//!   "value": 4.2008432,
//!   "description": "weight(foo:bar in 0) [PerFieldSimilarity], result of:",
//!   "details": [ { "value": 0.123456, "description": "boost", "details": [] } ]
//! }
//! ```
//!
//! [`Explanation`] is a read-only view over such an object. Building one
//! does not walk the tree; children are wrapped on demand, borrowing from
//! their parent, each time [`Explanation::children`] is called.

use crate::{QuarryError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::fmt;
use std::ops::Index;
use std::str::FromStr;
use tracing::warn;

const VALUE_KEY: &str = "value";
const DESCRIPTION_KEY: &str = "description";
const DETAILS_KEY: &str = "details";

/// One node of a score explanation tree
///
/// The node keeps the raw object it was built from untouched, so any key the
/// engine emits beyond `value`, `description` and `details` stays reachable
/// through [`Explanation::get`] or indexing.
///
/// # Examples
///
/// ```
/// use quarry_core::search::Explanation;
/// use serde_json::json;
///
/// let explanation: Explanation = json!({
///     "value": 1.5,
///     "description": "sum of:",
///     "details": [{"value": 1.5, "description": "boost", "details": []}]
/// })
/// .try_into()
/// .unwrap();
///
/// assert_eq!(explanation.value(), 1.5);
/// assert_eq!(explanation.description().unwrap(), "sum of:");
///
/// let boost = explanation.children().unwrap().next().unwrap().unwrap();
/// assert_eq!(boost.description().unwrap(), "boost");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation<'a> {
    raw: Cow<'a, Map<String, Value>>,
}

impl Explanation<'static> {
    /// Wrap an owned raw explanation object
    pub fn new(raw: Map<String, Value>) -> Self {
        Self {
            raw: Cow::Owned(raw),
        }
    }
}

impl<'a> Explanation<'a> {
    /// Wrap a borrowed raw explanation object
    pub fn borrowed(raw: &'a Map<String, Value>) -> Self {
        Self {
            raw: Cow::Borrowed(raw),
        }
    }

    /// The score contribution of this node
    ///
    /// A missing or `null` value reads as `0.0`. So does a value that is not
    /// a JSON number, including numeric strings such as `"1.5"`; that case
    /// is logged at `warn`.
    pub fn value(&self) -> f64 {
        match self.raw.get(VALUE_KEY) {
            None | Some(Value::Null) => 0.0,
            Some(value) => value.as_f64().unwrap_or_else(|| {
                warn!(value = %value, "Explanation value is not a number, reading it as 0");
                0.0
            }),
        }
    }

    /// How the value was derived
    ///
    /// # Errors
    ///
    /// Returns `QuarryError::MalformedExplanation` if the description is
    /// missing or is not a string
    pub fn description(&self) -> Result<&str> {
        match self.raw.get(DESCRIPTION_KEY) {
            Some(Value::String(description)) => Ok(description.as_str()),
            Some(_) => Err(QuarryError::malformed_explanation(
                DESCRIPTION_KEY,
                "is not a string",
            )),
            None => Err(QuarryError::malformed_explanation(
                DESCRIPTION_KEY,
                "is missing",
            )),
        }
    }

    /// The nested contributions of this node, in order
    ///
    /// Missing, `null` or empty `details` give an empty iterator. Each item
    /// is an `Err` if that entry of `details` is not an object.
    ///
    /// # Errors
    ///
    /// Returns `QuarryError::MalformedExplanation` if `details` is present
    /// but not an array
    pub fn children(&self) -> Result<Children<'_>> {
        let details: &[Value] = match self.raw.get(DETAILS_KEY) {
            None | Some(Value::Null) => &[],
            Some(Value::Array(details)) => details,
            Some(_) => {
                return Err(QuarryError::malformed_explanation(
                    DETAILS_KEY,
                    "is not an array",
                ))
            }
        };

        Ok(Children {
            details: details.iter(),
        })
    }

    /// Whether this node has nested contributions
    pub fn has_children(&self) -> bool {
        matches!(self.raw.get(DETAILS_KEY), Some(Value::Array(details)) if !details.is_empty())
    }

    /// Number of levels in the tree rooted at this node
    ///
    /// A node without children has depth 1.
    pub fn depth(&self) -> Result<usize> {
        let mut deepest = 0;
        for child in self.children()? {
            deepest = deepest.max(child?.depth()?);
        }
        Ok(deepest + 1)
    }

    /// The raw object this node was built from
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Take the raw object back
    pub fn into_raw(self) -> Map<String, Value> {
        self.raw.into_owned()
    }

    /// Any field of the raw object
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Whether the raw object has a field
    pub fn contains_key(&self, key: &str) -> bool {
        self.raw.contains_key(key)
    }

    /// Detach this node from whatever it borrows
    pub fn into_owned(self) -> Explanation<'static> {
        Explanation::new(self.raw.into_owned())
    }

    fn write_outline(&self, f: &mut fmt::Formatter<'_>, level: usize) -> fmt::Result {
        let description = self.description().unwrap_or("<missing description>");
        writeln!(f, "{:indent$}{} = {}", "", self.value(), description, indent = level * 2)?;

        match self.children() {
            Ok(children) => {
                for child in children {
                    match child {
                        Ok(child) => child.write_outline(f, level + 1)?,
                        Err(e) => writeln!(f, "{:indent$}<{}>", "", e, indent = (level + 1) * 2)?,
                    }
                }
            }
            Err(e) => writeln!(f, "{:indent$}<{}>", "", e, indent = (level + 1) * 2)?,
        }

        Ok(())
    }
}

/// Lazily wraps each entry of an explanation's `details`
#[derive(Debug, Clone)]
pub struct Children<'a> {
    details: std::slice::Iter<'a, Value>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Result<Explanation<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.details.next().map(|detail| match detail {
            Value::Object(raw) => Ok(Explanation::borrowed(raw)),
            _ => Err(QuarryError::malformed_explanation(
                DETAILS_KEY,
                "contains an entry that is not an object",
            )),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.details.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

impl Index<&str> for Explanation<'_> {
    type Output = Value;

    /// Missing keys index to `Value::Null`, as with `serde_json::Value`
    fn index(&self, key: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.raw.get(key).unwrap_or(&NULL)
    }
}

impl TryFrom<Value> for Explanation<'static> {
    type Error = QuarryError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Ok(Self::new(raw)),
            _ => Err(QuarryError::malformed_explanation(
                "explanation",
                "is not an object",
            )),
        }
    }
}

impl From<Map<String, Value>> for Explanation<'static> {
    fn from(raw: Map<String, Value>) -> Self {
        Self::new(raw)
    }
}

impl FromStr for Explanation<'static> {
    type Err = QuarryError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::try_from(value)
    }
}

impl Serialize for Explanation<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Explanation<'static> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(Self::new)
    }
}

impl fmt::Display for Explanation<'_> {
    /// Renders the tree as an indented outline, one `value = description`
    /// line per node
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_outline(f, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn explanation(value: Value) -> Explanation<'static> {
        Explanation::try_from(value).unwrap()
    }

    fn nested() -> Value {
        json!({
            "value": 4.2008432,
            "description": "weight(foo:bar in 0) [PerFieldSimilarity], result of:",
            "details": [
                {
                    "value": 0.123456,
                    "description": "boost",
                    "details": [
                        {"value": 0.123456, "description": "queryNorm", "details": []}
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_value_is_read_exactly() {
        let node = explanation(nested());
        assert_eq!(node.value(), 4.2008432);
    }

    #[test]
    fn test_null_or_missing_value_reads_as_zero() {
        let null = explanation(json!({"value": null, "description": "x", "details": []}));
        assert_eq!(null.value(), 0.0);

        let missing = explanation(json!({"description": "x"}));
        assert_eq!(missing.value(), 0.0);
    }

    #[test]
    fn test_non_numeric_value_reads_as_zero() {
        let node = explanation(json!({"value": "high", "description": "x"}));
        assert_eq!(node.value(), 0.0);

        let node = explanation(json!({"value": "1.5", "description": "x"}));
        assert_eq!(node.value(), 0.0);
    }

    #[test]
    fn test_description() {
        let node = explanation(nested());
        assert_eq!(
            node.description().unwrap(),
            "weight(foo:bar in 0) [PerFieldSimilarity], result of:"
        );
    }

    #[test]
    fn test_missing_description_is_an_error() {
        let node = explanation(json!({"value": 1.0}));
        assert_matches!(
            node.description(),
            Err(QuarryError::MalformedExplanation { ref field, .. }) if field == "description"
        );

        let node = explanation(json!({"value": 1.0, "description": 7}));
        assert!(node.description().is_err());
    }

    #[test]
    fn test_children_are_nested_nodes() {
        let node = explanation(nested());

        let children: Vec<_> = node.children().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].description().unwrap(), "boost");

        let grandchildren: Vec<_> = children[0]
            .children()
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(grandchildren.len(), 1);
        assert_eq!(grandchildren[0].description().unwrap(), "queryNorm");
        assert_eq!(grandchildren[0].children().unwrap().len(), 0);
    }

    #[test]
    fn test_empty_absent_or_null_details_give_no_children() {
        for raw in [
            json!({"description": "x", "details": []}),
            json!({"description": "x"}),
            json!({"description": "x", "details": null}),
        ] {
            let node = explanation(raw);
            assert_eq!(node.children().unwrap().count(), 0);
            assert!(!node.has_children());
        }
    }

    #[test]
    fn test_malformed_details() {
        let node = explanation(json!({"description": "x", "details": {"value": 1}}));
        assert_matches!(
            node.children(),
            Err(QuarryError::MalformedExplanation { .. })
        );

        let node = explanation(json!({"description": "x", "details": [1, {"description": "y"}]}));
        let items: Vec<_> = node.children().unwrap().collect();
        assert!(items[0].is_err());
        assert!(items[1].is_ok());
    }

    #[test]
    fn test_children_are_stable_across_calls() {
        let node = explanation(nested());
        let first: Vec<_> = node.children().unwrap().collect::<Result<_>>().unwrap();
        let second: Vec<_> = node.children().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_raw_round_trip() {
        let raw = nested();
        let node = explanation(raw.clone());
        assert_eq!(Value::Object(node.raw().clone()), raw);
        assert_eq!(Value::Object(node.into_raw()), raw);
    }

    #[test]
    fn test_extra_fields_are_reachable() {
        let node = explanation(json!({
            "value": 1.0,
            "description": "x",
            "_shard": "[books][0]",
            "_node": "abc"
        }));

        assert!(node.contains_key("_shard"));
        assert_eq!(node.get("_node"), Some(&json!("abc")));
        assert_eq!(node["_shard"], json!("[books][0]"));
        assert_eq!(node["nope"], Value::Null);
    }

    #[test]
    fn test_depth() {
        assert_eq!(explanation(nested()).depth().unwrap(), 3);
        assert_eq!(explanation(json!({"description": "leaf"})).depth().unwrap(), 1);
    }

    #[test]
    fn test_try_from_non_object() {
        assert_matches!(
            Explanation::try_from(json!([1, 2])),
            Err(QuarryError::MalformedExplanation { .. })
        );
    }

    #[test]
    fn test_from_str_and_serde() {
        let text = nested().to_string();
        let parsed: Explanation = text.parse().unwrap();
        assert_eq!(parsed.value(), 4.2008432);

        let deserialized: Explanation = serde_json::from_str(&text).unwrap();
        assert_eq!(deserialized, parsed);
        assert_eq!(serde_json::to_value(&deserialized).unwrap(), nested());
    }

    #[test]
    fn test_display_outline() {
        let node = explanation(json!({
            "value": 2.5,
            "description": "sum of:",
            "details": [
                {"value": 2.0, "description": "a", "details": []},
                {"value": 0.5, "description": "b"}
            ]
        }));

        assert_eq!(node.to_string(), "2.5 = sum of:\n  2 = a\n  0.5 = b\n");
    }

    #[test]
    fn test_into_owned_detaches_child() {
        let node = explanation(nested());
        let child = node
            .children()
            .unwrap()
            .next()
            .unwrap()
            .unwrap()
            .into_owned();
        drop(node);
        assert_eq!(child.description().unwrap(), "boost");
    }
}
