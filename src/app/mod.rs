pub mod command_builder;
pub mod config;
pub mod resolver;
pub mod runner;

pub use command_builder::CommandBuilder;
pub use config::{ConfigLayer, RunnerConfig, load_config};
pub use resolver::ContentResolver;
pub use runner::K6Runner;
