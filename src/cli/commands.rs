use clap::{Parser, Subcommand, ValueEnum};
use genai::adapter::AdapterKind;
use std::path::PathBuf;

/// LLM-assisted API endpoint discovery for frontend codebases
#[derive(Parser, Debug)]
#[command(
    name = "endscope",
    about = "LLM-assisted API endpoint discovery for frontend codebases",
    version,
    author,
    long_about = "endscope scans JavaScript/TypeScript sources for API call sites, builds a \
                  cross-file symbol index and uses an LLM with lookup tools to infer request \
                  metadata (headers, parameters, bodies). It supports multiple AI backends \
                  (Ollama, OpenAI, Claude, Gemini, Grok, Groq)."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (can be used multiple times)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Audit a codebase for API endpoints",
        long_about = "Scans source files for HTTP, WebSocket and GraphQL call sites, then \
                      enriches each finding with inferred request metadata.\n\n\
                      Examples:\n  \
                      endscope audit\n  \
                      endscope audit /path/to/webapp\n  \
                      endscope audit --include js,ts --exclude node_modules,dist\n  \
                      endscope audit --provider ollama --model qwen2.5-coder:7b\n  \
                      endscope audit --no-enrich --format json"
    )]
    Audit(AuditArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AuditArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the codebase (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "EXT,EXT",
        help = "Comma-separated file extensions to scan (default: js,ts,jsx,tsx)"
    )]
    pub include: Option<String>,

    #[arg(
        long,
        value_name = "DIR,DIR",
        help = "Comma-separated directory names to skip (default: node_modules,dist,build,.git)"
    )]
    pub exclude: Option<String>,

    #[arg(
        long,
        value_name = "N",
        default_value = "1000",
        help = "Maximum number of files to scan"
    )]
    pub max_files: usize,

    #[arg(
        long,
        value_name = "N",
        default_value = "6",
        help = "Maximum reasoning rounds per finding"
    )]
    pub max_rounds: usize,

    #[arg(
        long,
        value_name = "N",
        default_value = "1",
        help = "Enrichment worker count (1 = strictly sequential)"
    )]
    pub workers: usize,

    #[arg(
        short = 'b',
        long,
        value_parser = parse_adapter_kind,
        help = "AI backend provider (default: ollama)"
    )]
    pub provider: Option<AdapterKind>,

    #[arg(
        short = 'm',
        long,
        value_name = "MODEL",
        help = "Model name to use (provider-specific, e.g. 'qwen2.5-coder:7b' for Ollama)"
    )]
    pub model: Option<String>,

    #[arg(
        long,
        value_name = "SECONDS",
        default_value = "60",
        help = "Request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "DIR",
        help = "Write findings.json, trace.json and report.md to this directory"
    )]
    pub out_dir: Option<PathBuf>,

    #[arg(long, help = "Skip LLM enrichment and emit raw deduplicated findings")]
    pub no_enrich: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

fn parse_adapter_kind(s: &str) -> Result<AdapterKind, String> {
    AdapterKind::from_lower_str(&s.to_lowercase()).ok_or_else(|| {
        format!(
            "Invalid provider: {}. Valid options: ollama, openai, anthropic, gemini, xai, groq",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_audit_args() {
        let args = CliArgs::parse_from(["endscope", "audit"]);
        let Commands::Audit(audit_args) = args.command;

        assert!(audit_args.path.is_none());
        assert!(audit_args.include.is_none());
        assert!(audit_args.exclude.is_none());
        assert_eq!(audit_args.max_files, 1000);
        assert_eq!(audit_args.max_rounds, 6);
        assert_eq!(audit_args.workers, 1);
        assert!(audit_args.provider.is_none());
        assert_eq!(audit_args.timeout, 60);
        assert_eq!(audit_args.format, OutputFormatArg::Human);
        assert!(!audit_args.no_enrich);
    }

    #[test]
    fn test_audit_with_path() {
        let args = CliArgs::parse_from(["endscope", "audit", "/tmp/webapp"]);
        let Commands::Audit(audit_args) = args.command;
        assert_eq!(audit_args.path, Some(PathBuf::from("/tmp/webapp")));
    }

    #[test]
    fn test_audit_with_options() {
        let args = CliArgs::parse_from([
            "endscope",
            "audit",
            "--include",
            "js,ts",
            "--exclude",
            "node_modules,vendor",
            "--max-files",
            "200",
            "--max-rounds",
            "4",
            "--provider",
            "ollama",
            "--model",
            "qwen2.5-coder:7b",
            "--timeout",
            "120",
            "--format",
            "json",
            "--no-enrich",
        ]);

        let Commands::Audit(audit_args) = args.command;
        assert_eq!(audit_args.include.as_deref(), Some("js,ts"));
        assert_eq!(audit_args.exclude.as_deref(), Some("node_modules,vendor"));
        assert_eq!(audit_args.max_files, 200);
        assert_eq!(audit_args.max_rounds, 4);
        assert_eq!(audit_args.provider, Some(AdapterKind::Ollama));
        assert_eq!(audit_args.model.as_deref(), Some("qwen2.5-coder:7b"));
        assert_eq!(audit_args.timeout, 120);
        assert_eq!(audit_args.format, OutputFormatArg::Json);
        assert!(audit_args.no_enrich);
    }

    #[test]
    fn test_global_verbose_flag() {
        let args = CliArgs::parse_from(["endscope", "-v", "audit"]);
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_global_quiet_flag() {
        let args = CliArgs::parse_from(["endscope", "-q", "audit"]);
        assert!(!args.verbose);
        assert!(args.quiet);
    }

    #[test]
    fn test_log_level_flag() {
        let args = CliArgs::parse_from(["endscope", "--log-level", "debug", "audit"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_adapter_kind_parsing() {
        assert!(parse_adapter_kind("ollama").is_ok());
        assert!(parse_adapter_kind("openai").is_ok());
        assert!(parse_adapter_kind("anthropic").is_ok());
        assert!(parse_adapter_kind("gemini").is_ok());
        assert!(parse_adapter_kind("invalid").is_err());
    }

    #[test]
    fn test_out_dir_flag() {
        let args = CliArgs::parse_from(["endscope", "audit", "-o", "reports"]);
        let Commands::Audit(audit_args) = args.command;
        assert_eq!(audit_args.out_dir, Some(PathBuf::from("reports")));
    }
}
