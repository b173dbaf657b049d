//! Masks secret environment values in captured output.

use std::collections::BTreeMap;

use super::execution::ExecutionResult;

const MASK: &str = "********";

/// Secret values to hide from any text retained after a run.
#[derive(Debug, Clone, Default)]
pub struct SecretMask {
    values: Vec<String>,
}

impl SecretMask {
    pub fn from_envs(secret_envs: &BTreeMap<String, String>) -> Self {
        let mut values: Vec<String> =
            secret_envs.values().filter(|v| !v.is_empty()).cloned().collect();
        // Longest first so a secret containing another is masked whole.
        values.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        values.dedup();
        Self { values }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        self.values.iter().fold(text.to_string(), |acc, secret| acc.replace(secret.as_str(), MASK))
    }

    /// Mask the retained text of an assembled result: output, error message
    /// and step names. Durations are left as parsed.
    pub fn mask_result(&self, mut result: ExecutionResult) -> ExecutionResult {
        if self.is_empty() {
            return result;
        }
        result.output = self.apply(&result.output);
        result.error_message = result.error_message.map(|m| self.apply(&m));
        for step in &mut result.steps {
            step.name = self.apply(&step.name);
        }
        result
    }
}
