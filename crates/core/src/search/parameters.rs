//! Search request parameter builder
//!
//! [`SearchParameters`] records the options of one search request and
//! projects them into the two-tier shape the engine's `_search` API expects:
//! a handful of options sit directly on the request (`index`, `routing`,
//! `search_type`, `preference`, `explain`) and everything else is nested in
//! a single `body` object.
//!
//! # Examples
//!
//! ```
//! use quarry_core::search::SearchParameters;
//! use serde_json::json;
//!
//! let params = SearchParameters::new()
//!     .indices(["books", "authors"])
//!     .query(json!({"match": {"title": "rust"}}))
//!     .from(10)
//!     .size(100);
//!
//! assert_eq!(
//!     params.to_value(),
//!     json!({
//!         "index": "books,authors",
//!         "body": {
//!             "query": {"match": {"title": "rust"}},
//!             "from": 10,
//!             "size": 100
//!         }
//!     })
//! );
//! ```
//!
//! # Chaining
//!
//! Every setter consumes the builder and hands it back with one more clause
//! recorded. A link of the chain cannot be observed once a later setter has
//! run on it. To branch a chain, clone it first; the clone is an independent
//! snapshot.

use crate::config::SearchDefaults;
use crate::search::clause::{Clause, Placement};
use crate::search::values::{SortField, SourceFilter, TrackTotalHits};
use crate::Result;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Key of the nested object holding every body clause
pub const BODY_KEY: &str = "body";

/// Accumulates the clauses of one search request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchParameters {
    clauses: BTreeMap<Clause, Value>,
}

impl SearchParameters {
    /// Create an empty set of search parameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a builder with configured defaults
    ///
    /// Later setters overwrite any seeded clause.
    pub fn from_defaults(defaults: &SearchDefaults) -> Self {
        let mut params = Self::new();

        if !defaults.indices.is_empty() {
            params = params.indices(&defaults.indices);
        }
        if !defaults.routing.is_empty() {
            params = params.routing(&defaults.routing);
        }
        if let Some(ref search_type) = defaults.search_type {
            params = params.search_type(search_type.as_str());
        }
        if let Some(ref preference) = defaults.preference {
            params = params.preference(preference.as_str());
        }
        if let Some(size) = defaults.size {
            params = params.size(size);
        }
        if let Some(track_total_hits) = defaults.track_total_hits {
            params = params.track_total_hits(track_total_hits);
        }

        debug!(clauses = params.len(), "Seeded search parameters from defaults");
        params
    }

    fn with(mut self, clause: Clause, value: Value) -> Self {
        self.clauses.insert(clause, value);
        self
    }

    /// Indices to search, sent as a comma separated `index` option
    pub fn indices<I, S>(self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with(Clause::Indices, Value::String(join_comma(indices)))
    }

    /// Routing values, sent as a comma separated `routing` option
    pub fn routing<I, S>(self, routing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.with(Clause::Routing, Value::String(join_comma(routing)))
    }

    /// Search type, such as `query_then_fetch`
    pub fn search_type<S: Into<String>>(self, search_type: S) -> Self {
        self.with(Clause::SearchType, Value::String(search_type.into()))
    }

    /// Shard copy preference, such as `_local`
    pub fn preference<S: Into<String>>(self, preference: S) -> Self {
        self.with(Clause::Preference, Value::String(preference.into()))
    }

    /// Ask the engine to explain each hit's score
    ///
    /// `None` means `true`, so `explain(None)` turns explanations on.
    pub fn explain<E: Into<Option<bool>>>(self, explain: E) -> Self {
        let explain = explain.into().unwrap_or(true);
        self.with(Clause::Explain, Value::Bool(explain))
    }

    /// The query clause
    pub fn query<V: Into<Value>>(self, query: V) -> Self {
        self.with(Clause::Query, query.into())
    }

    /// Highlighting configuration
    pub fn highlight<V: Into<Value>>(self, highlight: V) -> Self {
        self.with(Clause::Highlight, highlight.into())
    }

    /// Sort order, as field names and sort specs
    pub fn sort<I, F>(self, sort: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SortField>,
    {
        let sort = sort
            .into_iter()
            .map(|field| Value::from(field.into()))
            .collect();
        self.with(Clause::Sort, Value::Array(sort))
    }

    /// Rescore configuration
    pub fn rescore<V: Into<Value>>(self, rescore: V) -> Self {
        self.with(Clause::Rescore, rescore.into())
    }

    /// Offset of the first hit to return
    pub fn from(self, from: u64) -> Self {
        self.with(Clause::From, Value::from(from))
    }

    /// Number of hits to return
    pub fn size(self, size: u64) -> Self {
        self.with(Clause::Size, Value::from(size))
    }

    /// Suggesters
    pub fn suggest<V: Into<Value>>(self, suggest: V) -> Self {
        self.with(Clause::Suggest, suggest.into())
    }

    /// Source filtering, sent as `_source`
    pub fn source<S: Into<SourceFilter>>(self, source: S) -> Self {
        self.with(Clause::Source, Value::from(source.into()))
    }

    /// Field collapsing
    pub fn collapse<V: Into<Value>>(self, collapse: V) -> Self {
        self.with(Clause::Collapse, collapse.into())
    }

    /// Named aggregations
    pub fn aggregations<I, K, V>(self, aggregations: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.with(Clause::Aggregations, Value::Object(to_object(aggregations)))
    }

    /// Filter applied to hits after aggregations are computed
    pub fn post_filter<V: Into<Value>>(self, post_filter: V) -> Self {
        self.with(Clause::PostFilter, post_filter.into())
    }

    /// How accurately to count the total number of hits
    pub fn track_total_hits<T: Into<TrackTotalHits>>(self, track_total_hits: T) -> Self {
        self.with(Clause::TrackTotalHits, Value::from(track_total_hits.into()))
    }

    /// Per-index score boosts
    ///
    /// Each pair becomes its own single-entry object, so the order of the
    /// pairs is kept. A NaN or infinite boost has no JSON form and is sent
    /// as `null`.
    pub fn indices_boost<I, K>(self, boosts: I) -> Self
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let boosts = boosts
            .into_iter()
            .map(|(index, boost)| {
                let mut entry = Map::new();
                entry.insert(index.into(), float_value("indices_boost", boost));
                Value::Object(entry)
            })
            .collect();
        self.with(Clause::IndicesBoost, Value::Array(boosts))
    }

    /// Compute scores even when sorting on a field
    pub fn track_scores(self, track_scores: bool) -> Self {
        self.with(Clause::TrackScores, Value::Bool(track_scores))
    }

    /// Named script fields
    pub fn script_fields<I, K, V>(self, script_fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.with(Clause::ScriptFields, Value::Object(to_object(script_fields)))
    }

    /// Minimum score a hit needs to be returned
    ///
    /// A NaN or infinite score has no JSON form and is sent as `null`.
    pub fn min_score(self, min_score: f64) -> Self {
        self.with(Clause::MinScore, float_value("min_score", min_score))
    }

    /// Remove a clause
    pub fn without(mut self, clause: Clause) -> Self {
        self.clauses.remove(&clause);
        self
    }

    /// The stored value of a clause
    pub fn get(&self, clause: Clause) -> Option<&Value> {
        self.clauses.get(&clause)
    }

    /// Whether a clause has been set
    pub fn contains(&self, clause: Clause) -> bool {
        self.clauses.contains_key(&clause)
    }

    /// The clauses that have been set, in projection order
    pub fn clauses(&self) -> impl Iterator<Item = Clause> + '_ {
        self.clauses.keys().copied()
    }

    /// Number of clauses set
    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    /// Whether no clause has been set
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Project the recorded clauses into the request shape
    ///
    /// Top-level clauses become keys of the returned map. Body clauses are
    /// nested under `body`, which is only present when at least one body
    /// clause was set.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut request = Map::new();
        let mut body = Map::new();

        for (clause, value) in &self.clauses {
            let target = match clause.placement() {
                Placement::TopLevel => &mut request,
                Placement::Body => &mut body,
            };
            target.insert(clause.output_key().to_string(), value.clone());
        }

        debug!(
            top_level = request.len(),
            body = body.len(),
            "Projected search parameters"
        );

        if !body.is_empty() {
            request.insert(BODY_KEY.to_string(), Value::Object(body));
        }

        request
    }

    /// The projection as a JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.to_map())
    }

    /// The projection as JSON text
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_map())?)
    }
}

impl Serialize for SearchParameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

fn float_value(clause: &str, value: f64) -> Value {
    if !value.is_finite() {
        warn!(clause, value, "Non-finite number has no JSON form, sending null");
    }
    Value::from(value)
}

fn join_comma<I, S>(values: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .map(|value| value.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn to_object<I, K, V>(entries: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}
