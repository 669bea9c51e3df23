//! Output formatting for audit results
//!
//! Renders the final result to stdout as machine-readable JSON or a compact
//! human summary; the full artifacts go through the report writer instead.

use crate::audit::finding::FindingKind;
use crate::audit::pipeline::AuditResult;
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Human,
}

pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &AuditResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_json(result),
            OutputFormat::Human => Ok(self.format_human(result)),
        }
    }

    fn format_json(&self, result: &AuditResult) -> Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "findings": result.findings,
            "warnings": result.warnings,
        }))
        .context("Failed to serialize audit result to JSON")
    }

    fn format_human(&self, result: &AuditResult) -> String {
        let count = |kind: FindingKind| {
            result
                .findings
                .iter()
                .filter(|f| f.kind == kind)
                .count()
        };

        let mut lines = vec![
            "API Endpoint Audit".to_string(),
            "==================".to_string(),
            String::new(),
            format!(
                "{} findings ({} http, {} websocket, {} graphql)",
                result.findings.len(),
                count(FindingKind::Http),
                count(FindingKind::WebSocket),
                count(FindingKind::GraphQl),
            ),
            String::new(),
        ];

        for finding in &result.findings {
            lines.push(format!(
                "  [{}] {} {}  ({}:{}, confidence {:.2})",
                finding.kind,
                finding.method.as_deref().unwrap_or("-"),
                finding.url,
                finding.file,
                finding.line,
                finding.confidence,
            ));
        }

        if !result.warnings.is_empty() {
            lines.push(String::new());
            lines.push(format!("Warnings ({}):", result.warnings.len()));
            for warning in &result.warnings {
                lines.push(format!("  - {}", warning));
            }
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::finding::Finding;

    fn sample_result() -> AuditResult {
        let ws = Finding::new(
            FindingKind::WebSocket,
            None,
            "wss://api.example.com/live",
            "live.js",
            3,
            "new WebSocket('wss://api.example.com/live')",
            0.8,
        );

        AuditResult {
            findings: vec![
                Finding::new(
                    FindingKind::Http,
                    Some("POST".to_string()),
                    "/api/users",
                    "app.js",
                    10,
                    "fetch('/api/users', {method:'POST'})",
                    0.8,
                ),
                ws,
            ],
            trace: Vec::new(),
            warnings: vec!["unreadable file src/x.js".to_string()],
        }
    }

    #[test]
    fn test_json_format() {
        let rendered = OutputFormatter::new(OutputFormat::Json)
            .format(&sample_result())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed["findings"][0]["url"], "/api/users");
        assert_eq!(parsed["findings"][1]["type"], "websocket");
        assert_eq!(parsed["warnings"][0], "unreadable file src/x.js");
    }

    #[test]
    fn test_human_format() {
        let rendered = OutputFormatter::new(OutputFormat::Human)
            .format(&sample_result())
            .unwrap();

        assert!(rendered.contains("2 findings (1 http, 1 websocket, 0 graphql)"));
        assert!(rendered.contains("[http] POST /api/users  (app.js:10, confidence 0.80)"));
        assert!(rendered.contains("[websocket] - wss://api.example.com/live"));
        assert!(rendered.contains("Warnings (1):"));
    }

    #[test]
    fn test_human_format_empty_result() {
        let result = AuditResult {
            findings: Vec::new(),
            trace: Vec::new(),
            warnings: Vec::new(),
        };
        let rendered = OutputFormatter::new(OutputFormat::Human)
            .format(&result)
            .unwrap();

        assert!(rendered.contains("0 findings"));
        assert!(!rendered.contains("Warnings"));
    }
}
