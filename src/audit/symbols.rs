//! Cross-file symbol index
//!
//! Flat, name-keyed table of constant/function/class declarations built in a
//! single regex pass per file. Scoping, shadowing and hoisting are not
//! resolved; a name maps to an ordered sequence of definitions in corpus
//! order, and ambiguity is handed to the caller.

use crate::audit::scanner::SourceFile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

static DECLARATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:(?:const|let|var)\s+(?P<konst>[A-Za-z_$][\w$]*)\s*=|(?:async\s+)?function\s+(?P<func>[A-Za-z_$][\w$]*)\s*\(|class\s+(?P<class>[A-Za-z_$][\w$]*))",
    )
    .unwrap()
});

/// Lines of context captured below a definition
const SNIPPET_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Constant,
    Function,
    Class,
}

/// A recorded definition site for a named identifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolRef {
    pub name: String,
    pub kind: SymbolKind,
    pub file: String,
    pub line: usize,
    pub snippet: String,
}

/// The immutable name to definition-sequence table, built once per run and
/// shared read-only by every enrichment invocation.
#[derive(Debug, Default)]
pub struct SymbolIndex {
    defs: HashMap<String, Vec<SymbolRef>>,
}

impl SymbolIndex {
    /// Indexes the scanned corpus. Definitions are recorded in corpus order:
    /// file scan order, then line order within a file.
    pub fn build(files: &[SourceFile]) -> Self {
        let mut defs: HashMap<String, Vec<SymbolRef>> = HashMap::new();

        for file in files {
            let lines: Vec<&str> = file.content.lines().collect();
            for (idx, line) in lines.iter().enumerate() {
                let caps = match DECLARATION_RE.captures(line) {
                    Some(caps) => caps,
                    None => continue,
                };

                let (name, kind) = if let Some(m) = caps.name("konst") {
                    (m.as_str(), SymbolKind::Constant)
                } else if let Some(m) = caps.name("func") {
                    (m.as_str(), SymbolKind::Function)
                } else if let Some(m) = caps.name("class") {
                    (m.as_str(), SymbolKind::Class)
                } else {
                    continue;
                };

                let end = (idx + SNIPPET_LINES).min(lines.len());
                let snippet = lines[idx..end].join("\n");

                defs.entry(name.to_string()).or_default().push(SymbolRef {
                    name: name.to_string(),
                    kind,
                    file: file.path.clone(),
                    line: idx + 1,
                    snippet,
                });
            }
        }

        debug!(symbols = defs.len(), "symbol index built");
        Self { defs }
    }

    /// All definitions recorded for `name`, in corpus order.
    pub fn lookup(&self, name: &str) -> &[SymbolRef] {
        self.defs.get(name).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Definitions for `name`, resolved relative to a query context.
    ///
    /// Tie-break: definitions in `context_file` come first (by line), then
    /// the remaining candidates ordered by file path, then line number.
    pub fn lookup_for(&self, name: &str, context_file: &str) -> Vec<SymbolRef> {
        let mut same_file: Vec<SymbolRef> = Vec::new();
        let mut others: Vec<SymbolRef> = Vec::new();

        for r in self.lookup(name) {
            if r.file == context_file {
                same_file.push(r.clone());
            } else {
                others.push(r.clone());
            }
        }

        same_file.sort_by_key(|r| r.line);
        others.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));

        same_file.extend(others);
        same_file
    }

    /// Case-insensitive substring search over names and snippets, ordered by
    /// (file, line) for reproducible output.
    pub fn search(&self, query: &str) -> Vec<&SymbolRef> {
        let needle = query.to_lowercase();
        let mut results: Vec<&SymbolRef> = self
            .defs
            .values()
            .flatten()
            .filter(|r| {
                r.name.to_lowercase().contains(&needle)
                    || r.snippet.to_lowercase().contains(&needle)
            })
            .collect();

        results.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        results
    }

    /// Number of unique identifiers indexed
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}
