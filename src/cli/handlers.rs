//! Command handlers wiring CLI arguments to the audit pipeline

use super::commands::AuditArgs;
use super::output::OutputFormatter;
use crate::audit::{AuditPipeline, ReportWriter};
use crate::config::AuditConfig;
use crate::fs::RealFileSystem;
use crate::llm::{GenAIClient, LLMClient};
use genai::adapter::AdapterKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const DEFAULT_MODEL: &str = "qwen2.5-coder:7b";

/// Runs the audit command. Returns the process exit code: 0 on completion
/// (including partial-enrichment completions), 1 on setup failure.
pub async fn handle_audit(args: &AuditArgs, quiet: bool) -> i32 {
    let path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = build_config(args);

    let provider = args.provider.unwrap_or(AdapterKind::Ollama);
    let model = args
        .model
        .clone()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    info!(provider = provider.as_str(), model = %model, "using LLM backend");

    let llm_client: Arc<dyn LLMClient> = Arc::new(GenAIClient::new(
        provider,
        model,
        Duration::from_secs(args.timeout),
    ));
    let file_system = Arc::new(RealFileSystem::new());

    let pipeline = AuditPipeline::new(llm_client, file_system, config);
    let result = match pipeline.run(&path).await {
        Ok(result) => result,
        Err(e) => {
            error!("audit failed: {}", e);
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Some(out_dir) = &args.out_dir {
        if let Err(e) = ReportWriter::new(out_dir).write(&result) {
            eprintln!("Error: failed to write reports: {}", e);
            return 1;
        }
    }

    match OutputFormatter::new(args.format.into()).format(&result) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    }

    if !quiet && !result.warnings.is_empty() {
        eprintln!(
            "{} warning(s) recorded during the run",
            result.warnings.len()
        );
    }

    0
}

fn build_config(args: &AuditArgs) -> AuditConfig {
    let mut config = AuditConfig::default()
        .with_max_files(args.max_files)
        .with_max_rounds(args.max_rounds)
        .with_enrichment_workers(args.workers)
        .with_enrichment(!args.no_enrich);

    if let Some(include) = &args.include {
        config = config.with_include_exts(split_list(include));
    }
    if let Some(exclude) = &args.exclude {
        config = config.with_exclude_dirs(split_list(exclude));
    }

    config
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::{CliArgs, Commands};
    use clap::Parser;

    fn audit_args(argv: &[&str]) -> AuditArgs {
        let args = CliArgs::parse_from(argv);
        let Commands::Audit(audit_args) = args.command;
        audit_args
    }

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&audit_args(&["endscope", "audit"]));

        assert_eq!(config.include_exts, vec!["js", "ts", "jsx", "tsx"]);
        assert_eq!(config.max_files, 1000);
        assert_eq!(config.max_rounds, 6);
        assert!(config.enrich);
    }

    #[test]
    fn test_build_config_overrides() {
        let config = build_config(&audit_args(&[
            "endscope",
            "audit",
            "--include",
            "js, vue",
            "--exclude",
            "vendor",
            "--max-files",
            "10",
            "--no-enrich",
        ]));

        assert_eq!(config.include_exts, vec!["js", "vue"]);
        assert_eq!(config.exclude_dirs, vec!["vendor"]);
        assert_eq!(config.max_files, 10);
        assert!(!config.enrich);
    }

    #[test]
    fn test_split_list_trims_and_drops_empties() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list("").is_empty());
    }
}
