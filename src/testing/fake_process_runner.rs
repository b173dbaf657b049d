use std::sync::{Arc, Mutex};

use crate::domain::{AppError, RawRunOutput};
use crate::ports::{Invocation, ProcessRunner};

/// Scripted process runner that records every invocation.
#[derive(Clone)]
pub struct FakeProcessRunner {
    response: Result<RawRunOutput, String>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

#[allow(dead_code)]
impl FakeProcessRunner {
    pub fn returning<S: Into<String>>(exit_code: i32, output: S) -> Self {
        Self {
            response: Ok(RawRunOutput::new(exit_code, output)),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Behave like a binary that cannot be spawned.
    pub fn unstartable<S: Into<String>>(details: S) -> Self {
        Self { response: Err(details.into()), invocations: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn last_invocation(&self) -> Option<Invocation> {
        self.invocations.lock().unwrap().last().cloned()
    }
}

impl ProcessRunner for FakeProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<RawRunOutput, AppError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        match &self.response {
            Ok(output) => Ok(output.clone()),
            Err(details) => Err(AppError::ToolStart {
                tool: invocation.program.clone(),
                details: details.clone(),
            }),
        }
    }
}
