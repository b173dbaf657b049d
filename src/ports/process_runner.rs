use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::domain::{AppError, RawRunOutput};

/// A fully built subprocess call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    /// Added to the inherited environment; these values win on collision.
    pub envs: BTreeMap<String, String>,
}

impl Invocation {
    /// Human-readable command line for logs.
    pub fn display_command(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs a subprocess to completion.
pub trait ProcessRunner {
    /// Blocks until the process exits. `Err` only when the process could not
    /// be started at all; a non-zero exit is still `Ok`.
    fn run(&self, invocation: &Invocation) -> Result<RawRunOutput, AppError>;
}
