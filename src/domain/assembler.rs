//! Turns a parsed k6 summary plus the process exit code into an execution result.

use super::execution::{ExecutionResult, RawRunOutput};
use super::k6_output::ParsedSummary;

/// Diagnostic for any failed threshold or check in the summary.
pub const THRESHOLDS_FAILED: &str = "some thresholds have failed";
pub const NO_SCENARIOS: &str = "no scenarios found in k6 output";

/// Assemble the terminal result. `raw.combined_output` is retained verbatim.
///
/// Threshold and check failure markers win regardless of exit code, then a
/// non-zero exit. Step status only ever comes from those markers.
pub fn assemble(summary: ParsedSummary, raw: &RawRunOutput) -> ExecutionResult {
    let output = raw.combined_output.clone();

    if summary.thresholds_failed || summary.checks_failed {
        return ExecutionResult::failed(THRESHOLDS_FAILED, summary.scenarios, output);
    }

    if !raw.succeeded() {
        let message = match &summary.error_line {
            Some(line) => format!("k6 exited with status {}: {}", raw.exit_code, line),
            None => format!("k6 exited with status {}", raw.exit_code),
        };
        return ExecutionResult::failed(message, summary.scenarios, output);
    }

    if !summary.has_scenarios() {
        return ExecutionResult::failed(NO_SCENARIOS, Vec::new(), output);
    }

    ExecutionResult::success(summary.scenarios, output)
}
