use std::process::Command;

use crate::domain::{AppError, RawRunOutput};
use crate::ports::{Invocation, ProcessRunner};

/// Runs invocations with `std::process::Command`, blocking until exit.
///
/// There is no timeout: a hung tool blocks the caller.
#[derive(Debug, Clone, Default)]
pub struct CommandProcessRunner;

impl CommandProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for CommandProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RawRunOutput, AppError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        command.current_dir(&invocation.working_directory);
        command.envs(&invocation.envs);

        let output = command.output().map_err(|e| AppError::ToolStart {
            tool: invocation.program.clone(),
            details: e.to_string(),
        })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }

        let exit_code = output.status.code().unwrap_or(-1);
        Ok(RawRunOutput { exit_code, combined_output: combined })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sh(script: &str, dir: &TempDir) -> Invocation {
        Invocation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_directory: dir.path().to_path_buf(),
            envs: BTreeMap::new(),
        }
    }

    #[test]
    fn combines_stdout_and_stderr() {
        let dir = TempDir::new().unwrap();
        let output =
            CommandProcessRunner::new().run(&sh("echo out; echo err >&2; exit 3", &dir)).unwrap();

        assert_eq!(output.exit_code, 3);
        assert_eq!(output.combined_output, "out\nerr\n");
    }

    #[test]
    fn runs_in_working_directory_with_envs() {
        let dir = TempDir::new().unwrap();
        let mut invocation = sh("pwd; printf %s \"$TARGET_HOSTNAME\"", &dir);
        invocation.envs.insert("TARGET_HOSTNAME".to_string(), "example.com".to_string());

        let output = CommandProcessRunner::new().run(&invocation).unwrap();

        assert!(output.succeeded());
        let canonical = dir.path().canonicalize().unwrap();
        assert!(output.combined_output.contains(canonical.to_str().unwrap()));
        assert!(output.combined_output.ends_with("example.com"));
    }

    #[test]
    fn missing_program_is_a_start_error() {
        let dir = TempDir::new().unwrap();
        let invocation = Invocation {
            program: "definitely-not-k6-binary".to_string(),
            args: vec![],
            working_directory: dir.path().to_path_buf(),
            envs: BTreeMap::new(),
        };

        let err = CommandProcessRunner::new().run(&invocation).unwrap_err();
        assert!(matches!(
            err,
            AppError::ToolStart { ref tool, .. } if tool == "definitely-not-k6-binary"
        ));
    }
}
