//! Execution request and result model.

use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Suffix of a test type that selects `k6 cloud` over `k6 run`.
const CLOUD_TEST_TYPE_SUFFIX: &str = "/cloud";

/// One test execution as handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Executor test type, e.g. `k6/script` or `k6/cloud`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    pub content: TestContent,
    /// Tokens forwarded verbatim to k6, in order.
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default)]
    pub envs: BTreeMap<String, String>,
    /// Injected like `envs`; values are masked in every retained output.
    #[serde(default)]
    pub secret_envs: BTreeMap<String, String>,
}

impl ExecutionRequest {
    pub fn new(content: TestContent) -> Self {
        Self {
            test_type: None,
            content,
            args: Vec::new(),
            envs: BTreeMap::new(),
            secret_envs: BTreeMap::new(),
        }
    }

    /// Inline script request.
    pub fn inline<S: Into<String>>(text: S) -> Self {
        Self::new(TestContent::Inline { text: text.into() })
    }

    /// Repository directory request.
    pub fn git_directory(repository: Repository) -> Self {
        Self::new(TestContent::GitDirectory { repository })
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    pub fn with_secret_env<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.secret_envs.insert(key.into(), value.into());
        self
    }

    pub fn with_test_type<S: Into<String>>(mut self, test_type: S) -> Self {
        self.test_type = Some(test_type.into());
        self
    }

    /// The k6 subcommand this request runs under.
    pub fn subcommand(&self) -> K6Subcommand {
        match &self.test_type {
            Some(t) if t.ends_with(CLOUD_TEST_TYPE_SUFFIX) => K6Subcommand::Cloud,
            _ => K6Subcommand::Run,
        }
    }
}

/// Where the test script comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TestContent {
    /// Script text, staged as a file in the data directory before the run.
    #[serde(rename = "string")]
    Inline { text: String },
    /// Directory inside a remote git repository.
    #[serde(rename = "git-dir")]
    GitDirectory { repository: Repository },
}

impl TestContent {
    pub fn is_inline(&self) -> bool {
        matches!(self, TestContent::Inline { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub uri: String,
    pub branch: String,
    /// Sub-path inside the repository used as working directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl Repository {
    pub fn new<U: Into<String>, B: Into<String>>(uri: U, branch: B) -> Self {
        Self { uri: uri.into(), branch: branch.into(), path: None }
    }

    pub fn with_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum K6Subcommand {
    Run,
    Cloud,
}

impl K6Subcommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            K6Subcommand::Run => "run",
            K6Subcommand::Cloud => "cloud",
        }
    }
}

/// Script location produced by content resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub working_directory: PathBuf,
    /// Absolute staged script path for inline content. `None` means the script
    /// name is the trailing token of the request args.
    pub script_argument: Option<PathBuf>,
}

/// What the subprocess left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRunOutput {
    /// Process exit code; `-1` when the process was terminated by a signal.
    pub exit_code: i32,
    /// stdout followed by stderr, verbatim.
    pub combined_output: String,
}

impl RawRunOutput {
    pub fn new<S: Into<String>>(exit_code: i32, combined_output: S) -> Self {
        Self { exit_code, combined_output: combined_output.into() }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
}

/// One scenario reported by k6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    /// Full scenario marker line without the leading `* `.
    pub name: String,
    /// Verbatim `elapsed/total` token, e.g. `00m01.1s/10m0s`. Empty when k6
    /// never printed a progress line for the scenario.
    pub duration: String,
    pub status: StepStatus,
}

pub const OUTPUT_TYPE_TEXT: &str = "text/plain";

/// Terminal outcome of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepResult>,
    #[serde(default)]
    pub output: String,
    pub output_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl ExecutionResult {
    pub fn success(steps: Vec<StepResult>, output: String) -> Self {
        Self {
            status: ExecutionStatus::Success,
            error_message: None,
            steps,
            output,
            output_type: OUTPUT_TYPE_TEXT.to_string(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Error result with no steps and no captured output.
    pub fn error<S: Into<String>>(message: S) -> Self {
        Self::failed(message, Vec::new(), String::new())
    }

    pub fn failed<S: Into<String>>(message: S, steps: Vec<StepResult>, output: String) -> Self {
        Self {
            status: ExecutionStatus::Error,
            error_message: Some(message.into()),
            steps,
            output,
            output_type: OUTPUT_TYPE_TEXT.to_string(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }

    pub fn with_timing(mut self, started_at: DateTime<Utc>, finished_at: DateTime<Utc>) -> Self {
        self.started_at = Some(started_at);
        self.finished_at = Some(finished_at);
        self
    }
}
