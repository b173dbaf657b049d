//! Content resolution: request content descriptor to working directory + script.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::{AppError, Repository, ResolvedTarget, TestContent};
use crate::ports::ContentFetcher;

/// Resolves test content under a fixed data directory.
pub struct ContentResolver<F: ContentFetcher> {
    fetcher: F,
    data_dir: PathBuf,
}

impl<F: ContentFetcher> ContentResolver<F> {
    pub fn new<P: Into<PathBuf>>(fetcher: F, data_dir: P) -> Self {
        Self { fetcher, data_dir: data_dir.into() }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Resolve `content` to a target.
    ///
    /// Directory content never resolves the script itself; the script name is
    /// the trailing request argument and is checked when the command is built.
    pub fn resolve(&self, content: &TestContent) -> Result<ResolvedTarget, AppError> {
        if !self.data_dir.is_dir() {
            return Err(AppError::DataDirMissing(self.data_dir.clone()));
        }

        match content {
            TestContent::Inline { text } => self.resolve_inline(text),
            TestContent::GitDirectory { repository } => self.resolve_directory(repository),
        }
    }

    fn resolve_inline(&self, text: &str) -> Result<ResolvedTarget, AppError> {
        let staged = self.fetcher.stage_inline(text, &self.data_dir)?;

        let not_found =
            |details: String| AppError::ContentNotFound { path: staged.clone(), details };
        let metadata = fs::metadata(&staged).map_err(|e| not_found(e.to_string()))?;
        if !metadata.is_file() {
            return Err(not_found("not a regular file".to_string()));
        }
        let script = fs::canonicalize(&staged).map_err(|e| not_found(e.to_string()))?;

        let working_directory =
            script.parent().map(Path::to_path_buf).unwrap_or_else(|| self.data_dir.clone());
        Ok(ResolvedTarget { working_directory, script_argument: Some(script) })
    }

    fn resolve_directory(&self, repository: &Repository) -> Result<ResolvedTarget, AppError> {
        let sub_path = match repository.path.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => Some(checked_sub_path(repository, p)?),
            _ => None,
        };

        let checkout = self.fetcher.fetch_repository(repository, &self.data_dir)?;
        let working_directory = match sub_path {
            Some(p) => checkout.join(p),
            None => checkout,
        };

        if !working_directory.is_dir() {
            return Err(AppError::ContentNotFound {
                path: working_directory,
                details: "repository path is not a directory".to_string(),
            });
        }

        Ok(ResolvedTarget { working_directory, script_argument: None })
    }
}

/// A repository sub-path must stay inside the checkout.
fn checked_sub_path<'a>(repository: &Repository, path: &'a str) -> Result<&'a Path, AppError> {
    let sub_path = Path::new(path);
    let escapes = sub_path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::RootDir | Component::Prefix(_)));
    if escapes {
        return Err(AppError::InvalidRepository {
            uri: repository.uri.clone(),
            reason: format!("path '{}' escapes the repository checkout", path),
        });
    }
    Ok(sub_path)
}
