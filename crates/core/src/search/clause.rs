//! The clause table for search requests
//!
//! Every option a search request can carry is a [`Clause`]. A clause knows
//! where it lands in the projected request ([`Placement`]) and the key it is
//! serialized under, which is not always the builder method's name
//! (`post_filter`, `_source`, `index`).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a clause lands in the projected request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// A direct key of the request, next to `body`
    TopLevel,
    /// A key of the nested `body` object
    Body,
}

/// One independently settable piece of a search request
///
/// The declaration order is the order clauses are projected in. It has no
/// semantic weight: clause keys are unique, so any order yields the same
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    Indices,
    Routing,
    SearchType,
    Preference,
    Explain,
    Query,
    Highlight,
    Sort,
    Rescore,
    From,
    Size,
    Suggest,
    Source,
    Collapse,
    Aggregations,
    PostFilter,
    TrackTotalHits,
    IndicesBoost,
    TrackScores,
    ScriptFields,
    MinScore,
}

impl Clause {
    /// Every clause, in projection order
    pub const ALL: [Clause; 21] = [
        Clause::Indices,
        Clause::Routing,
        Clause::SearchType,
        Clause::Preference,
        Clause::Explain,
        Clause::Query,
        Clause::Highlight,
        Clause::Sort,
        Clause::Rescore,
        Clause::From,
        Clause::Size,
        Clause::Suggest,
        Clause::Source,
        Clause::Collapse,
        Clause::Aggregations,
        Clause::PostFilter,
        Clause::TrackTotalHits,
        Clause::IndicesBoost,
        Clause::TrackScores,
        Clause::ScriptFields,
        Clause::MinScore,
    ];

    /// Where this clause lands in the projected request
    pub fn placement(self) -> Placement {
        match self {
            Self::Indices | Self::Routing | Self::SearchType | Self::Preference | Self::Explain => {
                Placement::TopLevel
            }
            _ => Placement::Body,
        }
    }

    /// The key this clause is serialized under
    pub fn output_key(self) -> &'static str {
        match self {
            Self::Indices => "index",
            Self::Routing => "routing",
            Self::SearchType => "search_type",
            Self::Preference => "preference",
            Self::Explain => "explain",
            Self::Query => "query",
            Self::Highlight => "highlight",
            Self::Sort => "sort",
            Self::Rescore => "rescore",
            Self::From => "from",
            Self::Size => "size",
            Self::Suggest => "suggest",
            Self::Source => "_source",
            Self::Collapse => "collapse",
            Self::Aggregations => "aggregations",
            Self::PostFilter => "post_filter",
            Self::TrackTotalHits => "track_total_hits",
            Self::IndicesBoost => "indices_boost",
            Self::TrackScores => "track_scores",
            Self::ScriptFields => "script_fields",
            Self::MinScore => "min_score",
        }
    }

    /// Look a clause up by its serialized key
    pub fn from_output_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|clause| clause.output_key() == key)
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.output_key())
    }
}
