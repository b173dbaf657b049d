use std::path::{Path, PathBuf};

use crate::domain::{AppError, Repository};

/// Materializes test content on local storage.
pub trait ContentFetcher {
    /// Write inline script text into the staging area of `data_dir` and return
    /// the staged file path.
    fn stage_inline(&self, text: &str, data_dir: &Path) -> Result<PathBuf, AppError>;

    /// Check out `repository` into a fresh directory under `data_dir` and
    /// return the checkout root (not narrowed to `repository.path`).
    fn fetch_repository(
        &self,
        repository: &Repository,
        data_dir: &Path,
    ) -> Result<PathBuf, AppError>;
}
