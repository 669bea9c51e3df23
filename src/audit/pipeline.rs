//! Audit orchestration
//!
//! Sequences scan -> extract -> deduplicate -> index -> enrich and assembles
//! the final [`AuditResult`]. A single file's or finding's failure never
//! aborts the batch; only a missing root is fatal, before any work begins.

use crate::audit::agent::{EnrichmentAgent, EnrichmentOutcome, TraceEvent};
use crate::audit::extractor::extract_endpoints;
use crate::audit::finding::{deduplicate, Finding};
use crate::audit::scanner::{FileScanner, ScanError, ScanOutcome};
use crate::audit::symbols::SymbolIndex;
use crate::audit::tools::ToolExecutor;
use crate::config::AuditConfig;
use crate::fs::FileSystem;
use crate::llm::LLMClient;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Final aggregate handed to the reporting side: enriched findings in
/// first-seen identity-key order, the full reasoning trace in
/// finding-then-step order, and every recovered warning.
#[derive(Debug, Serialize)]
pub struct AuditResult {
    pub findings: Vec<Finding>,
    pub trace: Vec<TraceEvent>,
    pub warnings: Vec<String>,
}

pub struct AuditPipeline {
    llm_client: Arc<dyn LLMClient>,
    file_system: Arc<dyn FileSystem>,
    config: AuditConfig,
}

impl AuditPipeline {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        file_system: Arc<dyn FileSystem>,
        config: AuditConfig,
    ) -> Self {
        Self {
            llm_client,
            file_system,
            config,
        }
    }

    pub async fn run(&self, root: &Path) -> Result<AuditResult, AuditError> {
        info!(root = %root.display(), "static audit started");

        let scanner = FileScanner::new(self.file_system.clone(), &self.config);
        let ScanOutcome {
            files,
            mut warnings,
        } = scanner.scan(root)?;
        if files.is_empty() {
            warn!(root = %root.display(), "no source files found");
        }

        let mut raw = Vec::new();
        for file in &files {
            let extracted = extract_endpoints(&file.content, &file.path);
            debug!(file = %file.path, candidates = extracted.len(), "extracted candidates");
            raw.extend(extracted);
        }
        let findings = deduplicate(raw);
        info!(findings = findings.len(), "deduplicated findings");

        // Frozen before any enrichment begins; agents share it read-only
        let index = Arc::new(SymbolIndex::build(&files));
        info!(symbols = index.len(), "symbol index built");

        if !self.config.enrich || findings.is_empty() {
            return Ok(AuditResult {
                findings,
                trace: Vec::new(),
                warnings,
            });
        }

        let executor = ToolExecutor::new(index, Arc::new(files), self.config.tool_result_cap);
        let agent = Arc::new(EnrichmentAgent::new(
            self.llm_client.clone(),
            executor,
            self.config.max_rounds,
            self.config.exhausted_confidence_ceiling,
        ));

        let (findings, trace) = if self.config.enrichment_workers > 1 {
            self.enrich_concurrent(agent, findings, &mut warnings)
                .await
        } else {
            Self::enrich_sequential(agent, findings).await
        };

        info!(
            findings = findings.len(),
            trace_events = trace.len(),
            "audit complete"
        );
        Ok(AuditResult {
            findings,
            trace,
            warnings,
        })
    }

    async fn enrich_sequential(
        agent: Arc<EnrichmentAgent>,
        findings: Vec<Finding>,
    ) -> (Vec<Finding>, Vec<TraceEvent>) {
        let mut enriched = Vec::with_capacity(findings.len());
        let mut trace = Vec::new();

        for finding in findings {
            let outcome = agent.enrich(finding).await;
            enriched.push(outcome.finding);
            trace.extend(outcome.trace);
        }

        (enriched, trace)
    }

    /// Bounded worker pool. Output is re-sorted by original finding order,
    /// never completion order, so concurrency does not change the result.
    async fn enrich_concurrent(
        &self,
        agent: Arc<EnrichmentAgent>,
        findings: Vec<Finding>,
        warnings: &mut Vec<String>,
    ) -> (Vec<Finding>, Vec<TraceEvent>) {
        let originals = findings.clone();
        let semaphore = Arc::new(Semaphore::new(self.config.enrichment_workers));
        let mut set = JoinSet::new();

        for (idx, finding) in findings.into_iter().enumerate() {
            let agent = agent.clone();
            let semaphore = semaphore.clone();
            set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (idx, agent.enrich(finding).await)
            });
        }

        let mut slots: Vec<Option<EnrichmentOutcome>> =
            originals.iter().map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, outcome)) => slots[idx] = Some(outcome),
                Err(e) => warn!(error = %e, "enrichment task panicked"),
            }
        }

        let mut enriched = Vec::with_capacity(slots.len());
        let mut trace = Vec::new();
        for (slot, original) in slots.into_iter().zip(originals) {
            match slot {
                Some(outcome) => {
                    enriched.push(outcome.finding);
                    trace.extend(outcome.trace);
                }
                None => {
                    let note = format!(
                        "enrichment failed for {}:{}, keeping pre-enrichment finding",
                        original.file, original.line
                    );
                    warn!("{}", note);
                    warnings.push(note);
                    enriched.push(original);
                }
            }
        }

        (enriched, trace)
    }
}
