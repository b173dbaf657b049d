mod fake_content_fetcher;
mod fake_process_runner;

pub use fake_content_fetcher::FakeContentFetcher;
pub use fake_process_runner::FakeProcessRunner;
