//! Regex harvesting of endpoint candidates
//!
//! Conservative line-oriented matchers over comment-stripped source. High
//! recall, low precision: the enrichment agent reasons about the survivors.
//! When several matcher families hit overlapping spans on one line, the
//! highest-priority family wins and the overlapped candidates are dropped;
//! non-overlapping matches are all recorded.

use crate::audit::finding::{Finding, FindingKind};
use once_cell::sync::Lazy;
use regex::Regex;

const HTTP_CALL_CONFIDENCE: f64 = 0.8;
const WEBSOCKET_CONFIDENCE: f64 = 0.8;
const BARE_URL_CONFIDENCE: f64 = 0.6;
const GRAPHQL_HINT_CONFIDENCE: f64 = 0.5;
const MAX_SNIPPET_CHARS: usize = 200;

static FETCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)fetch\(\s*['"](?P<url>[^'"]+)['"]"#).unwrap());
static FETCH_METHOD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)method\s*:\s*['"](?P<verb>[a-z]+)['"]"#).unwrap());
static AXIOS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)axios\.(?P<method>get|post|put|delete|patch)\(\s*['"](?P<url>[^'"]+)['"]"#)
        .unwrap()
});
static WEBSOCKET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)new\s+WebSocket\(\s*['"](?P<url>wss?://[^'"]+)['"]"#).unwrap());
static ABSOLUTE_URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://[a-zA-Z0-9_\-./:?=&%#]+").unwrap());
static API_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/api/[a-zA-Z0-9_\-./:?=&%#]+").unwrap());
static GRAPHQL_PATH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"/graphql\b").unwrap());
static OPERATION_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"operationName\s*:").unwrap());

struct Candidate {
    priority: u8,
    start: usize,
    end: usize,
    finding: Finding,
}

/// Extracts raw endpoint candidates from one file's content.
///
/// A match's line number is the 1-based line of the matched literal's start.
/// Line comments are stripped best-effort before matching; `//` inside a
/// quoted string does not cut the line.
pub fn extract_endpoints(content: &str, file_path: &str) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_line_comment(raw_line);
        if line.trim().is_empty() {
            continue;
        }

        let snippet = truncate_chars(raw_line.trim(), MAX_SNIPPET_CHARS);
        let mut candidates: Vec<Candidate> = Vec::new();

        // Priority 1: explicit HTTP-call forms
        for caps in FETCH_RE.captures_iter(line) {
            let (whole, url) = match (caps.get(0), caps.name("url")) {
                (Some(w), Some(u)) => (w, u),
                _ => continue,
            };
            let method = FETCH_METHOD_RE
                .captures(&line[whole.start()..])
                .and_then(|m| m.name("verb"))
                .map(|v| v.as_str().to_uppercase());
            candidates.push(Candidate {
                priority: 1,
                start: whole.start(),
                end: whole.end(),
                finding: Finding::new(
                    FindingKind::Http,
                    method,
                    url.as_str(),
                    file_path,
                    line_no,
                    snippet.clone(),
                    HTTP_CALL_CONFIDENCE,
                ),
            });
        }
        for caps in AXIOS_RE.captures_iter(line) {
            let (whole, url, method) = match (caps.get(0), caps.name("url"), caps.name("method")) {
                (Some(w), Some(u), Some(m)) => (w, u, m),
                _ => continue,
            };
            candidates.push(Candidate {
                priority: 1,
                start: whole.start(),
                end: whole.end(),
                finding: Finding::new(
                    FindingKind::Http,
                    Some(method.as_str().to_uppercase()),
                    url.as_str(),
                    file_path,
                    line_no,
                    snippet.clone(),
                    HTTP_CALL_CONFIDENCE,
                ),
            });
        }

        // Priority 2: socket-connection constructors
        for caps in WEBSOCKET_RE.captures_iter(line) {
            let (whole, url) = match (caps.get(0), caps.name("url")) {
                (Some(w), Some(u)) => (w, u),
                _ => continue,
            };
            candidates.push(Candidate {
                priority: 2,
                start: whole.start(),
                end: whole.end(),
                finding: Finding::new(
                    FindingKind::WebSocket,
                    None,
                    url.as_str(),
                    file_path,
                    line_no,
                    snippet.clone(),
                    WEBSOCKET_CONFIDENCE,
                ),
            });
        }

        // Priority 3: bare URL literals, method left for downstream inference
        for re in [&*ABSOLUTE_URL_RE, &*API_PATH_RE] {
            for m in re.find_iter(line) {
                candidates.push(Candidate {
                    priority: 3,
                    start: m.start(),
                    end: m.end(),
                    finding: Finding::new(
                        FindingKind::Http,
                        None,
                        m.as_str(),
                        file_path,
                        line_no,
                        snippet.clone(),
                        BARE_URL_CONFIDENCE,
                    ),
                });
            }
        }

        // Priority 4: query-layer hints
        for re in [&*GRAPHQL_PATH_RE, &*OPERATION_NAME_RE] {
            for m in re.find_iter(line) {
                candidates.push(Candidate {
                    priority: 4,
                    start: m.start(),
                    end: m.end(),
                    finding: Finding::new(
                        FindingKind::GraphQl,
                        None,
                        m.as_str(),
                        file_path,
                        line_no,
                        snippet.clone(),
                        GRAPHQL_HINT_CONFIDENCE,
                    ),
                });
            }
        }

        findings.extend(resolve_overlaps(candidates));
    }

    findings
}

/// Keeps the highest-priority candidate for each overlapping span group.
/// Survivors are emitted in line order.
fn resolve_overlaps(mut candidates: Vec<Candidate>) -> Vec<Finding> {
    candidates.sort_by_key(|c| c.priority);

    let mut kept: Vec<Candidate> = Vec::new();
    for candidate in candidates {
        let overlaps = kept
            .iter()
            .any(|k| candidate.start < k.end && k.start < candidate.end);
        if !overlaps {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|c| (c.start, c.priority));
    kept.into_iter().map(|c| c.finding).collect()
}

/// Cuts a `//` comment unless it sits inside a quoted string.
fn strip_line_comment(line: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev_slash = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            prev_slash = false;
            continue;
        }
        match quote {
            Some(q) => {
                if c == '\\' {
                    escaped = true;
                } else if c == q {
                    quote = None;
                }
                prev_slash = false;
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    prev_slash = false;
                }
                '/' => {
                    if prev_slash {
                        return &line[..i - 1];
                    }
                    prev_slash = true;
                }
                _ => prev_slash = false,
            },
        }
    }

    line
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        text.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_with_method_on_line_ten() {
        let mut content = "\n".repeat(9);
        content.push_str("fetch('/api/users', {method:'POST'})\n");

        let findings = extract_endpoints(&content, "src/app.js");

        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!(f.kind, FindingKind::Http);
        assert_eq!(f.method.as_deref(), Some("POST"));
        assert_eq!(f.url, "/api/users");
        assert_eq!(f.line, 10);
        assert_eq!(f.confidence, 0.8);
    }

    #[test]
    fn test_fetch_without_method_stays_none() {
        let findings = extract_endpoints("fetch(\"/api/items\")", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].method, None);
        assert_eq!(findings[0].url, "/api/items");
    }

    #[test]
    fn test_axios_verb_submethod() {
        let findings = extract_endpoints("axios.delete('/api/users/42')", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::Http);
        assert_eq!(findings[0].method.as_deref(), Some("DELETE"));
        assert_eq!(findings[0].url, "/api/users/42");
    }

    #[test]
    fn test_websocket_constructor() {
        let findings =
            extract_endpoints("const ws = new WebSocket('wss://api.example.com/live');", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::WebSocket);
        assert_eq!(findings[0].url, "wss://api.example.com/live");
        assert_eq!(findings[0].confidence, 0.8);
    }

    #[test]
    fn test_bare_absolute_url() {
        let findings = extract_endpoints("const base = 'https://api.example.com/v2';", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::Http);
        assert_eq!(findings[0].method, None);
        assert_eq!(findings[0].url, "https://api.example.com/v2");
        assert_eq!(findings[0].confidence, 0.6);
    }

    #[test]
    fn test_bare_api_path() {
        let findings = extract_endpoints("const path = '/api/orders/open';", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].url, "/api/orders/open");
        assert_eq!(findings[0].method, None);
    }

    #[test]
    fn test_graphql_hints() {
        let findings = extract_endpoints(
            "client.post(url, { operationName: 'GetUser' });",
            "a.js",
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::GraphQl);
        assert_eq!(findings[0].confidence, 0.5);
    }

    #[test]
    fn test_graphql_path_line_number() {
        let findings = extract_endpoints("let x = 1;\nconst gq = '/graphql';", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::GraphQl);
        assert_eq!(findings[0].line, 2);
    }

    #[test]
    fn test_http_call_suppresses_overlapping_bare_url() {
        let findings = extract_endpoints("fetch('/api/users', {method:'POST'})", "a.js");

        // The /api/users literal also matches the bare-URL pattern; the
        // explicit-call family wins the overlap.
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].method.as_deref(), Some("POST"));
    }

    #[test]
    fn test_http_call_wins_over_graphql_hint() {
        let findings = extract_endpoints("fetch('/graphql', {method:'POST'})", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::Http);
        assert_eq!(findings[0].url, "/graphql");
    }

    #[test]
    fn test_non_overlapping_matches_all_recorded() {
        let findings = extract_endpoints(
            "fetch('/api/users'); const docs = 'https://docs.example.com';",
            "a.js",
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].url, "/api/users");
        assert_eq!(findings[1].url, "https://docs.example.com");
    }

    #[test]
    fn test_line_comment_not_matched() {
        let findings = extract_endpoints("// fetch('/api/users')", "a.js");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_slashes_inside_string_survive_stripping() {
        let findings = extract_endpoints("fetch('https://api.example.com/users')", "a.js");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].url, "https://api.example.com/users");
    }

    #[test]
    fn test_trailing_comment_stripped() {
        let findings = extract_endpoints(
            "const a = 1; // see fetch('/api/legacy')",
            "a.js",
        );
        assert!(findings.is_empty());
    }

    #[test]
    fn test_snippet_is_trimmed_line() {
        let findings = extract_endpoints("    fetch('/api/users')  ", "a.js");
        assert_eq!(findings[0].snippet, "fetch('/api/users')");
    }

    #[test]
    fn test_snippet_capped() {
        let long_tail = "x".repeat(400);
        let content = format!("fetch('/api/users') // {}", long_tail);
        let findings = extract_endpoints(&content, "a.js");
        assert!(findings[0].snippet.chars().count() <= 200);
    }

    #[test]
    fn test_empty_content_yields_nothing() {
        assert!(extract_endpoints("", "a.js").is_empty());
    }
}
