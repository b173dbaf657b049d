pub mod assembler;
pub mod error;
pub mod execution;
pub mod k6_output;
pub mod masking;

pub use assembler::{NO_SCENARIOS, THRESHOLDS_FAILED, assemble};
pub use error::AppError;
pub use execution::{
    ExecutionRequest, ExecutionResult, ExecutionStatus, K6Subcommand, RawRunOutput, Repository,
    ResolvedTarget, StepResult, StepStatus, TestContent,
};
pub use k6_output::{K6SummaryParser, OutputParser, ParsedSummary};
pub use masking::SecretMask;
