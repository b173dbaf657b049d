//! The execution pipeline: resolve content, invoke k6, parse, assemble.

use chrono::Utc;

use crate::adapters::{CommandProcessRunner, FilesystemContentFetcher};
use crate::app::command_builder::CommandBuilder;
use crate::app::config::RunnerConfig;
use crate::app::resolver::ContentResolver;
use crate::domain::{
    AppError, ExecutionRequest, ExecutionResult, K6SummaryParser, OutputParser, SecretMask,
    assemble,
};
use crate::ports::{ContentFetcher, ProcessRunner};

/// Runs one execution request at a time, synchronously.
///
/// Holds no state between runs besides its collaborators. Concurrent runs must
/// use distinct data directories: staging paths are not namespaced per run.
pub struct K6Runner<F, P, O = K6SummaryParser>
where
    F: ContentFetcher,
    P: ProcessRunner,
    O: OutputParser,
{
    resolver: ContentResolver<F>,
    builder: CommandBuilder,
    process: P,
    parser: O,
}

impl K6Runner<FilesystemContentFetcher, CommandProcessRunner> {
    /// Runner backed by the local filesystem, libgit2 and a real `k6` process.
    pub fn from_config(config: RunnerConfig) -> Self {
        Self::new(config, FilesystemContentFetcher::new(), CommandProcessRunner::new())
    }
}

impl<F, P> K6Runner<F, P>
where
    F: ContentFetcher,
    P: ProcessRunner,
{
    pub fn new(config: RunnerConfig, fetcher: F, process: P) -> Self {
        Self::with_parser(config, fetcher, process, K6SummaryParser::new())
    }
}

impl<F, P, O> K6Runner<F, P, O>
where
    F: ContentFetcher,
    P: ProcessRunner,
    O: OutputParser,
{
    pub fn with_parser(config: RunnerConfig, fetcher: F, process: P, parser: O) -> Self {
        Self {
            resolver: ContentResolver::new(fetcher, config.data_dir),
            builder: CommandBuilder::new(config.k6_binary),
            process,
            parser,
        }
    }

    /// Execute `request` to completion. Never fails: every error becomes an
    /// error-status result.
    pub fn run(&self, request: &ExecutionRequest) -> ExecutionResult {
        let started_at = Utc::now();
        let span = tracing::info_span!(
            "k6.run",
            subcommand = request.subcommand().as_str(),
            data_dir = %self.resolver.data_dir().display()
        );
        let _enter = span.enter();

        let mask = SecretMask::from_envs(&request.secret_envs);
        let result = match self.execute(request, &mask) {
            Ok(result) => result,
            Err(e) => {
                let message = mask.apply(&e.to_string());
                tracing::warn!(error = %message, "run failed before k6 produced output");
                ExecutionResult::error(message)
            }
        };

        match &result.error_message {
            Some(message) => {
                tracing::warn!(
                    steps = result.steps.len(),
                    error = %message,
                    "run finished with error"
                );
            }
            None => tracing::info!(steps = result.steps.len(), "run finished successfully"),
        }

        result.with_timing(started_at, Utc::now())
    }

    fn execute(
        &self,
        request: &ExecutionRequest,
        mask: &SecretMask,
    ) -> Result<ExecutionResult, AppError> {
        let target = self.resolver.resolve(&request.content)?;
        tracing::info!(
            working_directory = %target.working_directory.display(),
            inline = target.script_argument.is_some(),
            "content resolved"
        );

        let invocation = self.builder.build(&target, request)?;
        tracing::info!(command = %mask.apply(&invocation.display_command()), "invoking k6");

        let raw = self.process.run(&invocation)?;
        tracing::info!(exit_code = raw.exit_code, bytes = raw.combined_output.len(), "k6 exited");

        // Parsed unmasked; masking applies to the assembled result.
        let summary = self.parser.parse(&raw.combined_output);
        tracing::debug!(
            scenarios = summary.scenarios.len(),
            thresholds_failed = summary.thresholds_failed,
            checks_failed = summary.checks_failed,
            "parsed k6 summary"
        );

        Ok(mask.mask_result(assemble(summary, &raw)))
    }
}
