use std::fs;
use std::path::{Path, PathBuf};

use git2::build::RepoBuilder;
use url::Url;

use crate::domain::{AppError, Repository};
use crate::ports::ContentFetcher;

/// File name inline scripts are staged under.
pub const STAGED_CONTENT_FILE: &str = "test-content";
/// Directory repositories are cloned into.
pub const CHECKOUT_DIR: &str = "repo";

const ALLOWED_SCHEMES: &[&str] = &["https", "http", "ssh", "git", "file"];

/// Stages inline content as a plain file and clones repositories with libgit2.
#[derive(Debug, Clone, Default)]
pub struct FilesystemContentFetcher;

impl FilesystemContentFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl ContentFetcher for FilesystemContentFetcher {
    fn stage_inline(&self, text: &str, data_dir: &Path) -> Result<PathBuf, AppError> {
        let path = data_dir.join(STAGED_CONTENT_FILE);
        fs::write(&path, text)?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "staged inline content");
        Ok(path)
    }

    fn fetch_repository(
        &self,
        repository: &Repository,
        data_dir: &Path,
    ) -> Result<PathBuf, AppError> {
        validate_repository(repository)?;

        let checkout = data_dir.join(CHECKOUT_DIR);
        if checkout.exists() {
            fs::remove_dir_all(&checkout)?;
        }

        tracing::info!(
            uri = %repository.uri,
            branch = %repository.branch,
            dest = %checkout.display(),
            "cloning repository"
        );
        RepoBuilder::new()
            .branch(&repository.branch)
            .clone(&repository.uri, &checkout)
            .map_err(|e| {
                AppError::git(format!("clone {}@{}", repository.uri, repository.branch), e)
            })?;

        Ok(checkout)
    }
}

/// Reject descriptors libgit2 would choke on with an opaque message.
///
/// URIs that do not parse as URLs (local paths, scp-like `git@host:org/repo`)
/// are passed through to libgit2 unchanged.
fn validate_repository(repository: &Repository) -> Result<(), AppError> {
    let invalid = |reason: &str| AppError::InvalidRepository {
        uri: repository.uri.clone(),
        reason: reason.to_string(),
    };

    if repository.uri.trim().is_empty() {
        return Err(invalid("uri is empty"));
    }
    if repository.branch.trim().is_empty() {
        return Err(invalid("branch is empty"));
    }
    if let Ok(url) = Url::parse(&repository.uri)
        && url.scheme().len() > 1
        && !ALLOWED_SCHEMES.contains(&url.scheme())
    {
        return Err(invalid(&format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(())
}
