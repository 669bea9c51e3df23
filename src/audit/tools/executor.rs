//! Tool dispatch against the frozen symbol index and scanned corpus
//!
//! Both tools only touch in-memory structures; they never block on I/O.
//! Result counts are capped so a single tool round stays bounded.

use super::registry::{TOOL_CODE_SEARCH, TOOL_SYMBOL_LOOKUP};
use crate::audit::scanner::SourceFile;
use crate::audit::symbols::SymbolIndex;
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct ToolExecutor {
    index: Arc<SymbolIndex>,
    corpus: Arc<Vec<SourceFile>>,
    result_cap: usize,
}

impl ToolExecutor {
    pub fn new(index: Arc<SymbolIndex>, corpus: Arc<Vec<SourceFile>>, result_cap: usize) -> Self {
        Self {
            index,
            corpus,
            result_cap,
        }
    }

    /// Runs one tool invocation. `context_file` is the file of the finding
    /// under enrichment and drives the same-file symbol preference.
    pub fn execute(&self, tool_name: &str, arguments: &Value, context_file: &str) -> Result<String> {
        info!(tool = tool_name, args = ?arguments, "executing tool");

        let result = match tool_name {
            TOOL_SYMBOL_LOOKUP => self.symbol_lookup(arguments, context_file),
            TOOL_CODE_SEARCH => self.code_search(arguments),
            _ => {
                warn!(tool = tool_name, "unknown tool requested");
                Err(anyhow!("Unknown tool: {}", tool_name))
            }
        };

        match &result {
            Ok(output) => debug!(tool = tool_name, output_len = output.len(), "tool completed"),
            Err(e) => warn!(tool = tool_name, error = %e, "tool failed"),
        }

        result
    }

    fn symbol_lookup(&self, args: &Value, context_file: &str) -> Result<String> {
        let name = args["name"]
            .as_str()
            .ok_or_else(|| anyhow!("Missing 'name' parameter"))?
            .trim();

        let refs = self.index.lookup_for(name, context_file);
        if refs.is_empty() {
            return Ok(format!("No definitions found for `{}`", name));
        }

        let shown = refs.len().min(self.result_cap);
        let mut lines = vec![format!("Definitions for `{}`:", name)];
        for r in refs.iter().take(shown) {
            lines.push(format!("- {}:{}\n```js\n{}\n```", r.file, r.line, r.snippet));
        }
        if refs.len() > shown {
            lines.push(format!("... ({} more omitted)", refs.len() - shown));
        }

        Ok(lines.join("\n"))
    }

    fn code_search(&self, args: &Value) -> Result<String> {
        let query = args["query"]
            .as_str()
            .ok_or_else(|| anyhow!("Missing 'query' parameter"))?
            .trim();
        if query.is_empty() {
            return Err(anyhow!("Empty search query"));
        }

        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        let mut total = 0usize;

        for file in self.corpus.iter() {
            for (idx, line) in file.content.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    total += 1;
                    if matches.len() < self.result_cap {
                        matches.push(format!("- {}:{}: {}", file.path, idx + 1, line.trim()));
                    }
                }
            }
        }

        if matches.is_empty() {
            return Ok(format!("No matches for `{}`", query));
        }

        let mut lines = vec![format!("Matches for `{}`:", query)];
        lines.extend(matches);
        if total > self.result_cap {
            lines.push(format!("... ({} more omitted)", total - self.result_cap));
        }

        Ok(lines.join("\n"))
    }
}
