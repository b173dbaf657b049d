mod filesystem_content_fetcher;
mod process_command;

pub use filesystem_content_fetcher::{CHECKOUT_DIR, FilesystemContentFetcher, STAGED_CONTENT_FILE};
pub use process_command::CommandProcessRunner;
