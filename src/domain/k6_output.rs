//! Line-oriented scanner for k6's human-readable run summary.
//!
//! Matching rules:
//!
//! - scenario marker: a line whose trimmed form starts with `* `
//!   (`* default: 1 iterations for each of 1 VUs (...)`); the scenario key is
//!   the text before the first `:`.
//! - progress line: `<key> [✓|✗] [ <progress> ] <vus> <elapsed>/<total> ...`;
//!   the 100% line wins over intermediate ones.
//! - failed threshold: a summary metric line prefixed with `✗`
//!   (`✗ http_req_duration....: avg=...`), a failed threshold expression
//!   (`✗ 'p(95)<200' p(95)=312ms`), or k6's closing threshold diagnostic.
//! - failed checks: a `checks` rate other than `100.00%`, or a non-zero
//!   `checks_failed` rate.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::execution::{StepResult, StepStatus};

const SCENARIO_MARKER: &str = "* ";

#[allow(clippy::expect_used)]
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b\[[0-9;?]*[A-Za-z]").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static PROGRESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<key>\S+)\s+(?:[✓✗]\s+)?\[(?P<bar>[^\]]*)\](?P<rest>.*)$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static DURATION_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\d+(?:\.\d+)?[hms](?:\d+(?:\.\d+)?[hms])*/\d+(?:\.\d+)?[hms](?:\d+(?:\.\d+)?[hms])*$",
    )
    .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static DURATION_SINGLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?[hms](?:\d+(?:\.\d+)?[hms])*$")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static FAILED_METRIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*✗\s+(?P<metric>\S.*?)\.{2,}:").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static FAILED_THRESHOLD_EXPRESSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*✗\s+'[^']+'").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static THRESHOLD_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"some thresholds have failed|thresholds on metrics .* (?:have been|were) crossed")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static CHECKS_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[✓✗]\s+)?checks(?:_succeeded)?\.*:\s+(?P<rate>\d+(?:\.\d+)?)%")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static CHECKS_FAILED_RATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[✓✗]\s+)?checks_failed\.*:\s+(?P<rate>\d+(?:\.\d+)?)%")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static SCENARIO_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"scenario\s*:\s*(?P<key>[^\s,}]+)").expect("constant regex pattern is valid")
});

/// Everything the result assembler needs from k6's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSummary {
    /// Scenarios in first-seen order.
    pub scenarios: Vec<StepResult>,
    pub thresholds_failed: bool,
    pub checks_failed: bool,
    /// Last `level=error` / `ERRO[...]` line k6 printed.
    pub error_line: Option<String>,
}

impl ParsedSummary {
    pub fn has_scenarios(&self) -> bool {
        !self.scenarios.is_empty()
    }
}

/// Extracts a [`ParsedSummary`] from raw tool output.
pub trait OutputParser {
    fn parse(&self, output: &str) -> ParsedSummary;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct K6SummaryParser;

impl K6SummaryParser {
    pub fn new() -> Self {
        Self
    }
}

#[derive(Debug)]
struct Progress {
    duration: Option<String>,
    complete: bool,
}

#[derive(Debug, Default)]
struct Scan {
    names: Vec<(String, String)>,
    progress: HashMap<String, Progress>,
    failed_scenarios: Vec<String>,
    untagged_threshold_failure: bool,
    thresholds_failed: bool,
    checks_failed: bool,
    error_line: Option<String>,
}

impl OutputParser for K6SummaryParser {
    fn parse(&self, output: &str) -> ParsedSummary {
        let cleaned = ANSI_ESCAPE.replace_all(output, "");
        let mut scan = Scan::default();

        for line in cleaned.lines() {
            scan.line(line);
        }

        scan.finish()
    }
}

impl Scan {
    fn line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(name) = trimmed.strip_prefix(SCENARIO_MARKER) {
            let name = name.trim();
            let key = scenario_key(name);
            if !key.is_empty() && !self.names.iter().any(|(k, _)| k == key) {
                self.names.push((key.to_string(), name.to_string()));
            }
            return;
        }

        if let Some(caps) = PROGRESS_LINE.captures(line)
            && self.names.iter().any(|(k, _)| k == &caps["key"])
        {
            let progress = Progress {
                duration: duration_token(&caps["rest"]),
                complete: caps["bar"].contains("100%"),
            };
            let keep_existing = self
                .progress
                .get(&caps["key"])
                .is_some_and(|existing| existing.complete && !progress.complete);
            if !keep_existing {
                self.progress.insert(caps["key"].to_string(), progress);
            }
            return;
        }

        if let Some(caps) = FAILED_METRIC_LINE.captures(line) {
            self.thresholds_failed = true;
            match SCENARIO_TAG.captures(&caps["metric"]) {
                Some(tag) => self.failed_scenarios.push(tag["key"].to_string()),
                None => self.untagged_threshold_failure = true,
            }
        } else if FAILED_THRESHOLD_EXPRESSION.is_match(line) {
            self.thresholds_failed = true;
            self.untagged_threshold_failure = true;
        }

        if THRESHOLD_DIAGNOSTIC.is_match(line) {
            self.thresholds_failed = true;
        }

        if let Some(caps) = CHECKS_FAILED_RATE.captures(line) {
            if parse_rate(&caps["rate"]).is_some_and(|rate| rate > 0.0) {
                self.checks_failed = true;
            }
        } else if let Some(caps) = CHECKS_RATE.captures(line)
            && parse_rate(&caps["rate"]).is_some_and(|rate| rate < 100.0)
        {
            self.checks_failed = true;
        }

        if trimmed.contains("level=error") || trimmed.starts_with("ERRO[") {
            self.error_line = Some(trimmed.to_string());
        }
    }

    fn finish(mut self) -> ParsedSummary {
        // Untagged threshold and check failures are aggregated across scenarios.
        let fail_all = self.untagged_threshold_failure
            || self.checks_failed
            || (self.thresholds_failed && self.failed_scenarios.is_empty());
        let scenarios = self
            .names
            .iter()
            .map(|(key, name)| {
                let progress = self.progress.remove(key);
                let failed = fail_all || self.failed_scenarios.iter().any(|f| f == key);
                StepResult {
                    name: name.clone(),
                    duration: progress.and_then(|p| p.duration).unwrap_or_default(),
                    status: if failed { StepStatus::Failed } else { StepStatus::Success },
                }
            })
            .collect();

        ParsedSummary {
            scenarios,
            thresholds_failed: self.thresholds_failed,
            checks_failed: self.checks_failed,
            error_line: self.error_line,
        }
    }
}

/// Text before the first `:` of a scenario marker.
pub fn scenario_key(name: &str) -> &str {
    name.split(':').next().unwrap_or_default().trim()
}

/// First `elapsed/total` token of a progress line tail, falling back to a bare
/// duration for executors that only report elapsed time.
fn duration_token(rest: &str) -> Option<String> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    tokens
        .iter()
        .find(|t| DURATION_PAIR.is_match(t))
        .or_else(|| tokens.iter().find(|t| DURATION_SINGLE.is_match(t)))
        .map(|t| t.to_string())
}

fn parse_rate(rate: &str) -> Option<f64> {
    rate.parse::<f64>().ok()
}
