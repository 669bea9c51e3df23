//! Lookup tools exposed to the enrichment agent

mod executor;
mod registry;

pub use executor::ToolExecutor;
pub use registry::{ToolRegistry, TOOL_CODE_SEARCH, TOOL_SYMBOL_LOOKUP};
