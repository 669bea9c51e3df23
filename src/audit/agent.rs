//! Tool-augmented enrichment of findings
//!
//! Each finding goes through a bounded reasoning loop: the model either
//! requests a tool invocation or emits a final structured answer. The loop is
//! an explicit state machine (`Started -> ToolRequested -> ToolResult -> ...
//! -> Answered | Exhausted`) so suspension points and the round bound are
//! testable with a scripted client.

use crate::audit::finding::Finding;
use crate::audit::tools::{ToolExecutor, ToolRegistry};
use crate::llm::{ChatMessage, LLMClient, LLMRequest, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

const SYSTEM_PROMPT: &str = r#"You are a security engineer analysing JavaScript frontend code.
You may call tools to gather additional information:
- symbol_lookup: given a symbol name, return file:line and code snippet definitions.
- code_search: given a substring, return matching file:line and snippet entries.

For the endpoint you are given, work out:
- Missing URL parts (e.g. baseURL variables)
- Required headers or auth tokens
- Body/query parameters with types

When you are done, respond with a single-line JSON object with keys
`url`, `method`, `headers`, `params`, `body`, `confidence`.
Respond with the JSON object only - no surrounding text."#;

/// Per-finding reasoning state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Started,
    ToolRequested,
    ToolResult,
    Answered,
    Exhausted,
}

/// One step in the run trace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub role: String,
    pub content: String,
}

impl TraceEvent {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Result of enriching one finding
#[derive(Debug)]
pub struct EnrichmentOutcome {
    pub finding: Finding,
    pub state: AgentState,
    pub trace: Vec<TraceEvent>,
}

impl EnrichmentOutcome {
    pub fn is_incomplete(&self) -> bool {
        self.state == AgentState::Exhausted
    }
}

/// Expected shape of the model's final answer
#[derive(Debug, Deserialize)]
struct AgentAnswer {
    url: Option<String>,
    method: Option<String>,
    headers: Option<BTreeMap<String, Value>>,
    params: Option<BTreeMap<String, Value>>,
    body: Option<BTreeMap<String, Value>>,
    confidence: Option<f64>,
}

pub struct EnrichmentAgent {
    llm_client: Arc<dyn LLMClient>,
    executor: ToolExecutor,
    tools: Vec<ToolDefinition>,
    max_rounds: usize,
    confidence_ceiling: f64,
}

impl EnrichmentAgent {
    pub fn new(
        llm_client: Arc<dyn LLMClient>,
        executor: ToolExecutor,
        max_rounds: usize,
        confidence_ceiling: f64,
    ) -> Self {
        Self {
            llm_client,
            executor,
            tools: ToolRegistry::create_all_tools(),
            max_rounds,
            confidence_ceiling,
        }
    }

    /// Runs the reasoning loop for one finding.
    ///
    /// Never fails: transport errors consume a round and are recorded in the
    /// trace; a malformed final answer or an exceeded round bound terminates
    /// the loop as `Exhausted` with the confidence ceiling applied.
    pub async fn enrich(&self, mut finding: Finding) -> EnrichmentOutcome {
        info!(file = %finding.file, line = finding.line, url = %finding.url, "enriching finding");

        let question = format!(
            "File: {}:{}\nCode:\n{}\nThink step-by-step. Use tools when needed.",
            finding.file, finding.line, finding.snippet
        );
        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(&question),
        ];
        let mut trace = vec![TraceEvent::user(&question)];
        let mut state = AgentState::Started;

        for round in 1..=self.max_rounds {
            debug!(round, max_rounds = self.max_rounds, state = ?state, "reasoning round");

            let request = LLMRequest::new(messages.clone())
                .with_tools(self.tools.clone())
                .with_temperature(0.0);

            let response = match self.llm_client.chat(request).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(file = %finding.file, line = finding.line, round, error = %e, "reasoning step failed");
                    trace.push(TraceEvent::system(format!("transport error: {}", e)));
                    continue;
                }
            };

            if response.has_tool_calls() {
                state = AgentState::ToolRequested;
                trace.push(TraceEvent::assistant(render_assistant_with_calls(&response.content, &response.tool_calls)));
                messages.push(ChatMessage::assistant_with_tools(
                    &response.content,
                    response.tool_calls.clone(),
                ));

                for call in &response.tool_calls {
                    let output =
                        match self.executor.execute(&call.name, &call.arguments, &finding.file) {
                            Ok(output) => output,
                            Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
                        };
                    trace.push(TraceEvent::tool(&output));
                    messages.push(ChatMessage::tool_response(&call.call_id, &output));
                }
                state = AgentState::ToolResult;
                continue;
            }

            trace.push(TraceEvent::assistant(&response.content));

            match parse_answer(&response.content) {
                Ok(answer) => {
                    apply_answer(&mut finding, answer);
                    debug!(file = %finding.file, line = finding.line, round, "finding answered");
                    return EnrichmentOutcome {
                        finding,
                        state: AgentState::Answered,
                        trace,
                    };
                }
                Err(e) => {
                    // Raw text stays in the trace for audit
                    warn!(file = %finding.file, line = finding.line, error = %e, "malformed final answer");
                    return self.exhaust(finding, trace, "malformed final answer");
                }
            }
        }

        let reason = format!("max tool rounds reached ({})", self.max_rounds);
        self.exhaust(finding, trace, &reason)
    }

    fn exhaust(
        &self,
        mut finding: Finding,
        mut trace: Vec<TraceEvent>,
        reason: &str,
    ) -> EnrichmentOutcome {
        finding.confidence = finding.confidence.min(self.confidence_ceiling);
        trace.push(TraceEvent::system(format!("incomplete: {}", reason)));
        EnrichmentOutcome {
            finding,
            state: AgentState::Exhausted,
            trace,
        }
    }
}

fn render_assistant_with_calls(content: &str, calls: &[crate::llm::ToolCall]) -> String {
    let rendered: Vec<Value> = calls
        .iter()
        .map(|call| serde_json::json!({ "name": call.name, "arguments": call.arguments }))
        .collect();
    let calls_json = serde_json::to_string(&rendered).unwrap_or_default();
    if content.is_empty() {
        calls_json
    } else {
        format!("{}\n{}", content, calls_json)
    }
}

fn parse_answer(content: &str) -> Result<AgentAnswer, serde_json::Error> {
    serde_json::from_str(strip_code_fences(content))
}

/// Models sometimes wrap the answer in a markdown fence despite instructions
fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn apply_answer(finding: &mut Finding, answer: AgentAnswer) {
    if let Some(url) = answer.url {
        if !url.is_empty() {
            finding.url = url;
        }
    }
    if let Some(method) = answer.method {
        if !method.is_empty() {
            finding.method = Some(method.to_uppercase());
        }
    }
    if let Some(headers) = answer.headers {
        finding.headers.extend(headers);
    }
    if let Some(params) = answer.params {
        finding.params.extend(params);
    }
    if let Some(body) = answer.body {
        finding.body.extend(body);
    }
    if let Some(confidence) = answer.confidence {
        finding.confidence = finding.confidence.min(confidence.clamp(0.0, 1.0));
    }
}
