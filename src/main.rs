use std::path::PathBuf;

use clap::{Parser, Subcommand};
use k6_runner::{AppError, ConfigLayer};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "k6-runner")]
#[command(version)]
#[command(about = "Run k6 load tests and report structured results", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a request (JSON) and print the execution result (JSON)
    #[clap(visible_alias = "r")]
    Run {
        /// Request file; reads stdin when omitted or `-`
        #[arg(short, long)]
        request: Option<PathBuf>,
        /// Staging root for inline scripts and repository checkouts
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        /// k6 executable to invoke
        #[arg(long)]
        k6_binary: Option<String>,
        /// TOML config file with a [runner] table
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(
    request: Option<PathBuf>,
    flags: ConfigLayer,
    config: Option<PathBuf>,
) -> Result<(), AppError> {
    let config = k6_runner::load_config(config.as_deref(), flags)?;
    let request = k6_runner::read_request(request.as_deref())?;
    let result = k6_runner::run(&request, config);
    println!("{}", k6_runner::render_result(&result)?);
    Ok(())
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { request, data_dir, k6_binary, config } => {
            run(request, ConfigLayer { data_dir, k6_binary }, config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
