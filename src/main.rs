mod cli_messages;
mod config;
mod consts;
mod controller;
mod environment;
mod error_classifier;
mod events;
mod feeds;
mod logging;
mod records;
mod session;
mod table;
mod ui;

use crate::config::{Config, Overrides, get_config_path, resolve_config};
use crate::consts::cli_consts::DEFAULT_PAGE_SIZE_OPTIONS;
use crate::session::{run_headless_mode, run_snapshot_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Live arbitrage opportunities dashboard
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the dashboard
    Start {
        /// Base URL of the arbitrage API
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Seconds between two refreshes
        #[arg(long, value_name = "SECS")]
        refresh_interval: Option<u64>,

        /// Initial number of rows per page; must be one of the configured options
        #[arg(long, value_name = "ROWS")]
        page_size: Option<usize>,

        /// Print events and tables to the console instead of the TUI
        #[arg(long, action = clap::ArgAction::SetTrue)]
        headless: bool,

        /// Start with the subscription marked inactive
        #[arg(long, action = clap::ArgAction::SetTrue)]
        inactive: bool,

        /// Paint a dark background behind the dashboard
        #[arg(long = "with-background", action = clap::ArgAction::SetTrue)]
        with_background: bool,
    },
    /// Run one refresh cycle and print both tables
    Snapshot {
        /// Base URL of the arbitrage API
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Rows printed per table
        #[arg(long, value_name = "ROWS", default_value_t = 10, value_parser = parse_row_count)]
        limit: usize,
    },
    /// Show the resolved configuration
    Config {
        /// Write the resolved configuration to the config file
        #[arg(long, action = clap::ArgAction::SetTrue)]
        save: bool,
    },
}

fn parse_row_count(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            crate::print_cmd_error!("arbi-dash failed", e.to_string().as_str());
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;

    match command {
        Command::Start {
            api_url,
            refresh_interval,
            page_size,
            headless,
            inactive,
            with_background,
        } => {
            let overrides = Overrides {
                api_url,
                refresh_interval_seconds: refresh_interval,
                inactive,
            };
            let config = resolve_config(&config_path, &overrides)?;
            let page_size = page_size
                .map(|size| config.check_page_size(size))
                .transpose()?;
            start(config, headless, with_background, page_size).await
        }
        Command::Snapshot { api_url, limit } => {
            let overrides = Overrides {
                api_url,
                ..Overrides::default()
            };
            let config = resolve_config(&config_path, &overrides)?;
            let session = setup_session(config, CancellationToken::new())?;
            run_snapshot_mode(session, limit).await
        }
        Command::Config { save } => {
            let config = resolve_config(&config_path, &Overrides::default())?;
            show_config(&config)?;
            if save {
                config
                    .save(&config_path)
                    .map_err(|e| format!("Failed to save config: {}", e))?;
                crate::print_cmd_success!("Configuration saved", "{}", config_path.display());
            }
            Ok(())
        }
    }
}

fn show_config(config: &Config) -> Result<(), Box<dyn Error>> {
    crate::print_cmd_info!("Environment", "{:?}", config.environment()?);
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}

/// Starts the dashboard in TUI or headless mode.
async fn start(
    config: Config,
    headless: bool,
    with_background: bool,
    page_size: Option<usize>,
) -> Result<(), Box<dyn Error>> {
    let session = setup_session(config, CancellationToken::new())?;
    if headless {
        let rows = page_size
            .or_else(|| session.config.page_size_options.first().copied())
            .unwrap_or(DEFAULT_PAGE_SIZE_OPTIONS[0]);
        run_headless_mode(session, rows).await
    } else {
        run_tui_mode(session, with_background, page_size).await
    }
}
