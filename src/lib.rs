use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

pub mod activity;
pub mod app;
pub mod cli;
pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod issue_key;
pub mod phrase;
pub mod tracker;
pub mod workflow;

pub use app::AppContext;
pub use duration::{Duration, RoundTo};
pub use error::{AppError, Result, ValidationError};
pub use issue_key::IssueKey;
pub use phrase::{format_duration, parse_phrase, DurationPhrase};

pub fn run() -> ExitCode {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();

    let cli = cli::Cli::parse();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            error!("Failed to start async runtime: {}", err);
            return ExitCode::FAILURE;
        }
    };

    info!("Starting JIRA time logger");
    match runtime.block_on(cli::execute(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
