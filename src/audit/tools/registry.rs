//! Tool definitions with JSON schemas for the enrichment agent

use crate::llm::ToolDefinition;
use serde_json::json;

pub const TOOL_SYMBOL_LOOKUP: &str = "symbol_lookup";
pub const TOOL_CODE_SEARCH: &str = "code_search";

pub struct ToolRegistry;

impl ToolRegistry {
    /// Create the two lookup tools available during enrichment
    pub fn create_all_tools() -> Vec<ToolDefinition> {
        vec![
            Self::create_symbol_lookup_tool(),
            Self::create_code_search_tool(),
        ]
    }

    fn create_symbol_lookup_tool() -> ToolDefinition {
        ToolDefinition {
            name: TOOL_SYMBOL_LOOKUP.to_string(),
            description:
                "Given a symbol name, return file:line and code snippet definitions. Use this to \
                 resolve identifiers referenced at the call site (e.g. baseURL constants, helper \
                 functions building headers)."
                    .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "name": {
                        "type": "string",
                        "description": "Identifier to look up, case-sensitive (e.g. 'API_BASE', 'getToken')"
                    }
                },
                "required": ["name"]
            }),
        }
    }

    fn create_code_search_tool() -> ToolDefinition {
        ToolDefinition {
            name: TOOL_CODE_SEARCH.to_string(),
            description:
                "Given a literal substring, return matching file:line and snippet entries across \
                 the scanned sources. Use this to find where a URL, header name or parameter is \
                 mentioned."
                    .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Substring to search for (e.g. '/api/users', 'Authorization')"
                    }
                },
                "required": ["query"]
            }),
        }
    }
}
