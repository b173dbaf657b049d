mod content_fetcher;
mod process_runner;

pub use content_fetcher::ContentFetcher;
pub use process_runner::{Invocation, ProcessRunner};
