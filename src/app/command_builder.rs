//! Builds the k6 invocation for a resolved target.
//!
//! Caller flags are not validated here. They are forwarded verbatim and k6's
//! own flag parsing rejects unknown ones with a non-zero exit, which surfaces
//! as an error result.

use std::collections::BTreeMap;

use crate::domain::{AppError, ExecutionRequest, ResolvedTarget};
use crate::ports::Invocation;

pub struct CommandBuilder {
    k6_binary: String,
}

impl CommandBuilder {
    pub fn new<S: Into<String>>(k6_binary: S) -> Self {
        Self { k6_binary: k6_binary.into() }
    }

    /// `<k6> <run|cloud> [args...] [script]`.
    ///
    /// Inline content appends the staged script unless the args already end
    /// with it. Directory content takes the script from the trailing arg, which
    /// must name a file under the working directory.
    pub fn build(
        &self,
        target: &ResolvedTarget,
        request: &ExecutionRequest,
    ) -> Result<Invocation, AppError> {
        let mut args = Vec::with_capacity(request.args.len() + 2);
        args.push(request.subcommand().as_str().to_string());
        args.extend(request.args.iter().cloned());

        match &target.script_argument {
            Some(script) => {
                let script = script.to_string_lossy().into_owned();
                if request.args.last() != Some(&script) {
                    args.push(script);
                }
            }
            None => {
                let script = request
                    .args
                    .last()
                    .filter(|s| !s.trim().is_empty())
                    .ok_or(AppError::ScriptArgumentMissing)?;
                let script_path = target.working_directory.join(script);
                if !script_path.is_file() {
                    return Err(AppError::ScriptNotFound(script_path));
                }
            }
        }

        Ok(Invocation {
            program: self.k6_binary.clone(),
            args,
            working_directory: target.working_directory.clone(),
            envs: merged_envs(request),
        })
    }
}

fn merged_envs(request: &ExecutionRequest) -> BTreeMap<String, String> {
    let mut envs = request.envs.clone();
    envs.extend(request.secret_envs.iter().map(|(k, v)| (k.clone(), v.clone())));
    envs
}
