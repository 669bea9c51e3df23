//! Static audit pipeline
//!
//! Scan -> extract -> deduplicate -> index -> enrich. The scanner collects
//! the corpus, the extractor harvests endpoint candidates with conservative
//! regex matchers, the symbol indexer builds a cross-file name table, and the
//! enrichment agent fills in request metadata through a bounded tool loop.

pub mod agent;
pub mod extractor;
pub mod finding;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod symbols;
pub mod tools;

pub use agent::{AgentState, EnrichmentAgent, EnrichmentOutcome, TraceEvent};
pub use extractor::extract_endpoints;
pub use finding::{deduplicate, Finding, FindingKind, IdentityKey};
pub use pipeline::{AuditError, AuditPipeline, AuditResult};
pub use report::{render_markdown, ReportWriter};
pub use scanner::{FileScanner, ScanError, ScanOutcome, SourceFile};
pub use symbols::{SymbolIndex, SymbolKind, SymbolRef};
pub use tools::{ToolExecutor, ToolRegistry};
