//! Endpoint candidate model and deduplication
//!
//! A `Finding` is one potential call site to a backend endpoint, produced by
//! the extractor, collapsed by [`deduplicate`], and enriched by the agent.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Classification of a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    Http,
    WebSocket,
    GraphQl,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::Http => "http",
            FindingKind::WebSocket => "websocket",
            FindingKind::GraphQl => "graphql",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The tuple distinguishing one finding from a duplicate
pub type IdentityKey = (FindingKind, Option<String>, String, String, usize);

/// A potential call site to a backend endpoint
///
/// `headers`, `params` and `body` start empty and are populated only by the
/// enrichment agent. `confidence` is set by the matcher that produced the
/// finding and is only ever lowered by later stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    /// HTTP verb, absent for websocket/graphql and for matches pending
    /// downstream inference
    pub method: Option<String>,
    /// Literal or partially-resolved URL as it appears in source
    pub url: String,
    /// Root-relative source file path
    pub file: String,
    /// 1-based line number of the matched literal
    pub line: usize,
    /// Bounded source excerpt around the match
    pub snippet: String,
    pub confidence: f64,
    pub headers: BTreeMap<String, serde_json::Value>,
    pub params: BTreeMap<String, serde_json::Value>,
    pub body: BTreeMap<String, serde_json::Value>,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        method: Option<String>,
        url: impl Into<String>,
        file: impl Into<String>,
        line: usize,
        snippet: impl Into<String>,
        confidence: f64,
    ) -> Self {
        Self {
            kind,
            method,
            url: url.into(),
            file: file.into(),
            line,
            snippet: snippet.into(),
            confidence,
            headers: BTreeMap::new(),
            params: BTreeMap::new(),
            body: BTreeMap::new(),
        }
    }

    /// Deduplication key: two findings with equal keys are the same finding
    pub fn identity_key(&self) -> IdentityKey {
        (
            self.kind,
            self.method.clone(),
            self.url.clone(),
            self.file.clone(),
            self.line,
        )
    }
}

/// Collapses findings sharing an identity key.
///
/// The collapsed confidence is the group maximum; all other fields come from
/// the highest-confidence member, first-encountered winning ties. Output
/// order is the first-seen order of identity keys.
pub fn deduplicate(raw: Vec<Finding>) -> Vec<Finding> {
    let mut out: Vec<Finding> = Vec::new();
    let mut index: HashMap<IdentityKey, usize> = HashMap::new();

    for finding in raw {
        let key = finding.identity_key();
        match index.get(&key) {
            Some(&slot) => {
                if finding.confidence > out[slot].confidence {
                    out[slot] = finding;
                }
            }
            None => {
                index.insert(key, out.len());
                out.push(finding);
            }
        }
    }

    out
}
