//! k6-runner: run k6 load-test scripts and turn their output into structured results.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::io::Read;
use std::path::Path;

pub use app::{ConfigLayer, K6Runner, RunnerConfig, load_config};
pub use domain::{
    AppError, ExecutionRequest, ExecutionResult, ExecutionStatus, Repository, StepResult,
    StepStatus, TestContent,
};

/// Run one execution request against the real k6 binary.
///
/// Always returns a result; failures are reported through
/// [`ExecutionResult::status`] and [`ExecutionResult::error_message`].
pub fn run(request: &ExecutionRequest, config: RunnerConfig) -> ExecutionResult {
    K6Runner::from_config(config).run(request)
}

// =============================================================================
// Request I/O
// =============================================================================

/// Read an execution request as JSON from a file, or from stdin when `path`
/// is `None` or `-`.
pub fn read_request(path: Option<&Path>) -> Result<ExecutionRequest, AppError> {
    let content = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p).map_err(|e| {
            AppError::config_error(format!("Failed to read request {}: {}", p.display(), e))
        })?,
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_request(&content)
}

/// Parse an execution request from JSON.
pub fn parse_request(content: &str) -> Result<ExecutionRequest, AppError> {
    Ok(serde_json::from_str(content)?)
}

/// Serialize a result as pretty JSON.
pub fn render_result(result: &ExecutionResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(result)?)
}
