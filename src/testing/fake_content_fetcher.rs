use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::{CHECKOUT_DIR, STAGED_CONTENT_FILE};
use crate::domain::{AppError, Repository};
use crate::ports::ContentFetcher;

/// In-process stand-in for the content backend.
///
/// Inline text is written like the real adapter; "cloning" materializes the
/// configured files under `<data_dir>/repo`.
#[derive(Clone, Default)]
pub struct FakeContentFetcher {
    skip_staging: bool,
    fail_fetch: bool,
    repository_files: Vec<(String, String)>,
    fetched: Arc<Mutex<Vec<Repository>>>,
}

#[allow(dead_code)]
impl FakeContentFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend to stage inline content without writing the file.
    pub fn skip_staging(mut self) -> Self {
        self.skip_staging = true;
        self
    }

    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    pub fn with_repository_file(mut self, path: &str, content: &str) -> Self {
        self.repository_files.push((path.to_string(), content.to_string()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }

    pub fn fetched(&self) -> Vec<Repository> {
        self.fetched.lock().unwrap().clone()
    }
}

impl ContentFetcher for FakeContentFetcher {
    fn stage_inline(&self, text: &str, data_dir: &Path) -> Result<PathBuf, AppError> {
        let path = data_dir.join(STAGED_CONTENT_FILE);
        if !self.skip_staging {
            fs::write(&path, text)?;
        }
        Ok(path)
    }

    fn fetch_repository(
        &self,
        repository: &Repository,
        data_dir: &Path,
    ) -> Result<PathBuf, AppError> {
        self.fetched.lock().unwrap().push(repository.clone());
        if self.fail_fetch {
            return Err(AppError::Git {
                operation: format!("clone {}", repository.uri),
                details: "remote unreachable".to_string(),
            });
        }

        let checkout = data_dir.join(CHECKOUT_DIR);
        if checkout.exists() {
            fs::remove_dir_all(&checkout)?;
        }
        fs::create_dir_all(&checkout)?;
        for (path, content) in &self.repository_files {
            let file = checkout.join(path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, content)?;
        }
        Ok(checkout)
    }
}
