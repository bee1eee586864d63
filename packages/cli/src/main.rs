#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route safety analyzer.
//!
//! Geocodes two addresses, plans a route between them, looks up the
//! crimes along it and prints the backend's safety rating. Also prints
//! the city-wide crime dashboard.
//!
//! Uses `indicatif-log-bridge` (via [`route_safety_cli_utils::init_logger`])
//! so that log lines and the loading spinner never fight for the terminal.

mod display;
mod interactive;
mod session;

use std::time::Duration;

use clap::{Parser, Subcommand};
use route_safety_cli_utils::IndicatifLoading;
use route_safety_client::config::{API_URL_ENV, ROUTING_URL_ENV, TIMEOUT_ENV};
use route_safety_client::{ClientConfig, SUMMARY_FAILED_MESSAGE};

use crate::display::{AnalysisReport, DashboardReport};
use crate::session::Session;

#[derive(Parser)]
#[command(name = "route_safety", about = "Route safety analyzer")]
struct Cli {
    /// Crime backend base URL
    #[arg(long, env = API_URL_ENV)]
    api_url: Option<String>,
    /// Routing service base URL
    #[arg(long, env = ROUTING_URL_ENV)]
    routing_url: Option<String>,
    /// Per-request timeout in seconds (0 waits indefinitely)
    #[arg(long, env = TIMEOUT_ENV)]
    timeout_secs: Option<u64>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze the crimes along the route between two addresses
    Analyze {
        /// Starting location
        #[arg(long)]
        from: String,
        /// Destination
        #[arg(long)]
        to: String,
    },
    /// Show the city-wide crime dashboard
    Summary,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = route_safety_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_base_url(url);
    }
    if let Some(url) = &cli.routing_url {
        config = config.with_routing_base_url(url);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout((secs > 0).then_some(Duration::from_secs(secs)));
    }
    log::debug!(
        "Using crime backend {} and routing service {}",
        config.api_base_url,
        config.routing_base_url,
    );

    let mut session = Session::new(&config, IndicatifLoading::spinner(&multi))?;

    let Some(command) = cli.command else {
        return interactive::run(&mut session).await;
    };

    match command {
        Commands::Analyze { from, to } => match session.analyze(&from, &to).await {
            Ok(view) => print!("{}", AnalysisReport(view)),
            Err(e) => {
                eprintln!("{}", e.user_message());
                std::process::exit(1);
            }
        },
        Commands::Summary => match session.load_summary().await {
            Ok(view) => print!("{}", DashboardReport(view)),
            Err(e) => {
                log::error!("{e}");
                eprintln!("{SUMMARY_FAILED_MESSAGE}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
