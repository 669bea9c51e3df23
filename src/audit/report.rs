//! Report artifacts
//!
//! Writes `findings.json`, `trace.json` and a human-reviewable `report.md`
//! grouped by method + url. The JSON artifacts are byte-stable across runs
//! with an unchanged corpus and a scripted reasoning service.

use crate::audit::finding::Finding;
use crate::audit::pipeline::AuditResult;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

const STATIC_EXTS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".ico", ".css", ".svg", ".woff", ".ttf", ".webp",
];

pub struct ReportWriter {
    out_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn write(&self, result: &AuditResult) -> Result<()> {
        fs::create_dir_all(&self.out_dir)
            .context(format!("Failed to create output dir {:?}", self.out_dir))?;

        let findings_path = self.out_dir.join("findings.json");
        let findings_json =
            serde_json::to_string_pretty(&serde_json::json!({ "findings": result.findings }))
                .context("Failed to serialize findings")?;
        fs::write(&findings_path, findings_json + "\n")
            .context(format!("Failed to write {:?}", findings_path))?;
        info!(path = %findings_path.display(), "wrote findings report");

        let trace_path = self.out_dir.join("trace.json");
        let trace_json = serde_json::to_string_pretty(&result.trace)
            .context("Failed to serialize trace")?;
        fs::write(&trace_path, trace_json + "\n")
            .context(format!("Failed to write {:?}", trace_path))?;
        info!(path = %trace_path.display(), "wrote reasoning trace");

        let md_path = self.out_dir.join("report.md");
        fs::write(&md_path, render_markdown(result))
            .context(format!("Failed to write {:?}", md_path))?;
        info!(path = %md_path.display(), "wrote markdown report");

        Ok(())
    }
}

/// Renders findings grouped by method + url, one section per group.
pub fn render_markdown(result: &AuditResult) -> String {
    let mut lines: Vec<String> = vec![
        "# Static Audit Report".to_string(),
        String::new(),
        format!(
            "_Generated: {}_",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        String::new(),
        format!(
            "{} findings, {} warnings.",
            result.findings.len(),
            result.warnings.len()
        ),
        String::new(),
    ];

    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Finding>> = HashMap::new();
    for finding in &result.findings {
        let label = group_label(finding);
        if !groups.contains_key(&label) {
            group_order.push(label.clone());
        }
        groups.entry(label).or_default().push(finding);
    }

    for label in &group_order {
        let members = &groups[label];
        let heading = if is_static_resource(&members[0].url) {
            format!("## [static] {}", label)
        } else {
            format!("## {}", label)
        };
        lines.push(heading);
        lines.push(String::new());

        for finding in members {
            lines.push(format!("- **File**: `{}:{}`", finding.file, finding.line));
            lines.push(format!("- **Kind**: `{}`", finding.kind));
            lines.push(format!("- **Confidence**: `{:.2}`", finding.confidence));
            push_json_block(&mut lines, "Headers", &finding.headers);
            push_json_block(&mut lines, "Params", &finding.params);
            push_json_block(&mut lines, "Body", &finding.body);
            lines.push("- **Snippet**:".to_string());
            lines.push("```js".to_string());
            lines.push(finding.snippet.clone());
            lines.push("```".to_string());
            lines.push(String::new());
        }
    }

    if !result.warnings.is_empty() {
        lines.push("## Warnings".to_string());
        lines.push(String::new());
        for warning in &result.warnings {
            lines.push(format!("- {}", warning));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn push_json_block(
    lines: &mut Vec<String>,
    title: &str,
    map: &std::collections::BTreeMap<String, serde_json::Value>,
) {
    if map.is_empty() {
        return;
    }
    let rendered = serde_json::to_string_pretty(map).unwrap_or_else(|_| "{}".to_string());
    lines.push(format!("- **{}**:", title));
    lines.push("```json".to_string());
    lines.push(rendered);
    lines.push("```".to_string());
}

fn group_label(finding: &Finding) -> String {
    let method = finding
        .method
        .clone()
        .unwrap_or_else(|| finding.kind.as_str().to_uppercase());
    format!("{} {}", method, finding.url)
}

fn is_static_resource(url: &str) -> bool {
    let url = url.to_lowercase();
    STATIC_EXTS.iter().any(|ext| url.ends_with(ext))
}
