mod cmd;
mod modules;

use crate::cmd::{
    bridge::{self, BridgeArgs},
    inspect::{self, InspectArgs},
    scrape::{self, ScrapeArgs},
    server::{self, ServerArgs},
};
use anyhow::Result;
use clap::{Parser, Subcommand};
use devpost_bridge_libs::BridgeResponse;
use dotenvy::dotenv;
use std::{env, ffi::OsString, io, process::ExitCode, str::FromStr};
use tokio::runtime::Builder;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{self, time::OffsetTime},
};

#[derive(Debug, Parser)]
#[command(name = "devpost_bridge")]
#[command(about = "Fetch hackathon listings from Devpost and emit them as normalized JSON")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print a single JSON envelope to stdout, for use as a subprocess
    Bridge(BridgeArgs),
    /// Save hackathons to a JSON file
    Scrape(ScrapeArgs),
    /// Dump the raw API response for troubleshooting
    Inspect(InspectArgs),
    /// Serve hackathon listings over HTTP
    Server(ServerArgs),
}

fn init_tracing() -> Result<()> {
    // RUST_LOG may also hold per-target directives, which from_env_lossy picks up.
    let log_level = env::var("RUST_LOG").unwrap_or(String::from("info"));
    let filter = EnvFilter::builder()
        .with_default_directive(
            LevelFilter::from_str(&log_level)
                .unwrap_or(LevelFilter::INFO)
                .into(),
        )
        .from_env_lossy();
    let format = fmt::format()
        .with_level(true)
        .with_target(true)
        .with_ansi(false)
        .with_thread_ids(true)
        .with_timer(OffsetTime::local_rfc_3339()?);
    // stdout carries the JSON payloads, so every log line goes to stderr.
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .event_format(format)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// `bridge` callers read stdout only, so a usage error there still has to be an envelope.
fn bridge_usage_failure(args: &[OsString], error: &clap::Error) -> Option<BridgeResponse> {
    let is_bridge = args.get(1).map_or(false, |command| command == "bridge");
    if is_bridge && error.use_stderr() {
        Some(bridge::usage_failure(error))
    } else {
        None
    }
}

fn main() -> ExitCode {
    dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("failed to set tracing subscriber: {:#}", e);
        return ExitCode::FAILURE;
    }

    let runtime = match Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("failed to build tokio runtime: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    let args: Vec<OsString> = env::args_os().collect();
    let cli = match Cli::try_parse_from(&args) {
        Ok(cli) => cli,
        Err(e) => match bridge_usage_failure(&args, &e) {
            Some(response) => {
                tracing::error!("invalid bridge arguments: {}", e);
                let stdout = io::stdout();
                if let Err(e) = bridge::write_response(&mut stdout.lock(), &response) {
                    tracing::error!("failed to write failure envelope: {:#}", e);
                }
                return ExitCode::FAILURE;
            }
            None => e.exit(),
        },
    };

    let result = match cli.command {
        Commands::Bridge(args) => runtime.block_on(bridge::run(args)),
        Commands::Scrape(args) => runtime.block_on(scrape::run(args)),
        Commands::Inspect(args) => runtime.block_on(inspect::run(args)),
        Commands::Server(args) => runtime.block_on(server::run(args)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("command failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
