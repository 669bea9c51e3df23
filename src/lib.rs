//! endscope - LLM-assisted API endpoint discovery for frontend codebases
//!
//! endscope scans a frontend codebase for API call sites, builds a cross-file
//! symbol index, and runs a bounded tool-calling reasoning loop to infer the
//! request metadata (headers, parameters, bodies) behind each endpoint
//! candidate. Results are best-effort heuristics meant for human review.
//!
//! # Core Concepts
//!
//! - **Finding**: a candidate API endpoint usage extracted from source, keyed
//!   by (kind, method, url, file, line)
//! - **SymbolIndex**: an immutable name-to-definitions table built once per
//!   run and shared read-only during enrichment
//! - **Enrichment**: a bounded loop in which the model either requests a
//!   lookup tool (`symbol_lookup`, `code_search`) or emits a final structured
//!   answer
//!
//! # Example Usage
//!
//! ```ignore
//! use endscope::{AuditConfig, AuditPipeline, GenAIClient, RealFileSystem};
//! use genai::adapter::AdapterKind;
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! async fn audit() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(GenAIClient::new(
//!         AdapterKind::Ollama,
//!         "qwen2.5-coder:7b".to_string(),
//!         Duration::from_secs(60),
//!     ));
//!     let pipeline = AuditPipeline::new(
//!         client,
//!         Arc::new(RealFileSystem::new()),
//!         AuditConfig::default(),
//!     );
//!
//!     let result = pipeline.run(Path::new("./webapp")).await?;
//!     for finding in &result.findings {
//!         println!("{} {} ({}:{})", finding.kind, finding.url, finding.file, finding.line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`audit`]: the static audit pipeline (scanner, extractor, symbol index,
//!   enrichment agent, orchestrator, reports)
//! - [`llm`]: the injected completion dependency (GenAI-backed client plus a
//!   scripted mock)
//! - [`fs`]: the injected filesystem capability
//! - [`cli`]: command-line surface

pub mod audit;
pub mod cli;
pub mod config;
pub mod fs;
pub mod llm;

// Re-export key types for convenient access
pub use audit::{
    deduplicate, extract_endpoints, AgentState, AuditError, AuditPipeline, AuditResult,
    EnrichmentAgent, Finding, FindingKind, FileScanner, ReportWriter, ScanError, SourceFile,
    SymbolIndex, SymbolKind, SymbolRef, TraceEvent,
};
pub use config::AuditConfig;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use llm::{GenAIClient, LLMClient, LlmError, MockLLMClient, MockResponse};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_endscope() {
        assert_eq!(NAME, "endscope");
    }
}
