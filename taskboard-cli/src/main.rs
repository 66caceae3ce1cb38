use clap::Parser;
use std::process;

mod cli;
mod commands;
mod config;

use cli::Cli;
use config::{CliConfig, CliOverrides};
use taskboard_kanban::KanbanError;

const EXIT_SUCCESS: i32 = 0;
/// The command failed but trying again may work
const EXIT_WARNING: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        data_dir: cli.data_dir.clone(),
        user: cli.user.clone(),
        log_level: if cli.debug {
            Some("debug".to_string())
        } else if cli.quiet {
            Some("error".to_string())
        } else {
            None
        },
    };

    let config = match CliConfig::load(&overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_ERROR);
        }
    };

    configure_logging(&config.log_level);

    let code = match commands::run(cli.command, &config, cli.format).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            tracing::debug!("command failed: {:?}", e);
            eprintln!("Error: {:#}", e);
            match e.downcast_ref::<KanbanError>() {
                Some(err) if err.is_retryable() => EXIT_WARNING,
                _ => EXIT_ERROR,
            }
        }
    };
    process::exit(code);
}

fn configure_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
