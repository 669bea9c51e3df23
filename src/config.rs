//! Audit configuration
//!
//! Explicit configuration record passed to the pipeline at construction.
//! No environment-driven credentials: provider settings live on the CLI and
//! are used to build the LLM client, never read implicitly by the core.

/// Configuration for a single audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// File extensions to scan (without the leading dot)
    pub include_exts: Vec<String>,
    /// Directory names skipped at any depth
    pub exclude_dirs: Vec<String>,
    /// Maximum number of files collected per run; the scan is truncated,
    /// never failed, when the cap is reached
    pub max_files: usize,
    /// Maximum tool-invocation rounds per finding before the agent gives up
    pub max_rounds: usize,
    /// Maximum entries returned by a single tool invocation
    pub tool_result_cap: usize,
    /// Confidence ceiling applied to findings whose reasoning loop exhausted
    pub exhausted_confidence_ceiling: f64,
    /// Worker count for enrichment; 1 means strictly sequential
    pub enrichment_workers: usize,
    /// Whether the LLM enrichment stage runs at all
    pub enrich: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            include_exts: vec![
                "js".to_string(),
                "ts".to_string(),
                "jsx".to_string(),
                "tsx".to_string(),
            ],
            exclude_dirs: vec![
                "node_modules".to_string(),
                "dist".to_string(),
                "build".to_string(),
                ".git".to_string(),
            ],
            max_files: 1000,
            max_rounds: 6,
            tool_result_cap: 20,
            exhausted_confidence_ceiling: 0.3,
            enrichment_workers: 1,
            enrich: true,
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include_exts(mut self, exts: Vec<String>) -> Self {
        self.include_exts = exts;
        self
    }

    pub fn with_exclude_dirs(mut self, dirs: Vec<String>) -> Self {
        self.exclude_dirs = dirs;
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_tool_result_cap(mut self, cap: usize) -> Self {
        self.tool_result_cap = cap;
        self
    }

    pub fn with_confidence_ceiling(mut self, ceiling: f64) -> Self {
        self.exhausted_confidence_ceiling = ceiling;
        self
    }

    pub fn with_enrichment_workers(mut self, workers: usize) -> Self {
        self.enrichment_workers = workers.max(1);
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AuditConfig::default();
        assert_eq!(config.include_exts, vec!["js", "ts", "jsx", "tsx"]);
        assert_eq!(
            config.exclude_dirs,
            vec!["node_modules", "dist", "build", ".git"]
        );
        assert_eq!(config.max_files, 1000);
        assert_eq!(config.max_rounds, 6);
        assert_eq!(config.tool_result_cap, 20);
        assert_eq!(config.exhausted_confidence_ceiling, 0.3);
        assert_eq!(config.enrichment_workers, 1);
        assert!(config.enrich);
    }

    #[test]
    fn test_builder_pattern() {
        let config = AuditConfig::new()
            .with_include_exts(vec!["js".to_string()])
            .with_exclude_dirs(vec!["vendor".to_string()])
            .with_max_files(50)
            .with_max_rounds(3)
            .with_tool_result_cap(10)
            .with_confidence_ceiling(0.2)
            .with_enrichment_workers(4)
            .with_enrichment(false);

        assert_eq!(config.include_exts, vec!["js"]);
        assert_eq!(config.exclude_dirs, vec!["vendor"]);
        assert_eq!(config.max_files, 50);
        assert_eq!(config.max_rounds, 3);
        assert_eq!(config.tool_result_cap, 10);
        assert_eq!(config.exhausted_confidence_ceiling, 0.2);
        assert_eq!(config.enrichment_workers, 4);
        assert!(!config.enrich);
    }

    #[test]
    fn test_workers_floor_at_one() {
        let config = AuditConfig::new().with_enrichment_workers(0);
        assert_eq!(config.enrichment_workers, 1);
    }
}
