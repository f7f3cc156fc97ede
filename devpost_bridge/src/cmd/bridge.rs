use crate::cmd::{create_client, FilterArgs};
use anyhow::Result;
use clap::Args;
use devpost_bridge_libs::{
    devpost::{client::HackathonSource, query::HackathonQuery},
    BridgeResponse,
};
use std::io::{self, Write};

#[derive(Debug, Args)]
pub struct BridgeArgs {
    #[command(flatten)]
    filter: FilterArgs,
}

/// Writes exactly one JSON envelope to stdout. Any error that escapes the fetch is reported
/// as a failure envelope and makes the process exit with a non-zero status.
pub async fn run(args: BridgeArgs) -> Result<()> {
    tracing::info!("Starting Devpost API bridge with {:?}", args);

    let (response, outcome) = match fetch(&args.filter).await {
        Ok(response) => (response, Ok(())),
        Err(e) => (BridgeResponse::failure(format!("{:#}", e)), Err(e)),
    };

    let stdout = io::stdout();
    write_response(&mut stdout.lock(), &response)?;

    outcome
}

async fn fetch(filter: &FilterArgs) -> Result<BridgeResponse> {
    let query = filter.to_query()?;
    let client = create_client()?;
    Ok(collect(&client, &query).await)
}

/// Failure envelope for a `bridge` invocation clap refused to parse.
pub fn usage_failure(error: &clap::Error) -> BridgeResponse {
    let message = error.to_string();
    let first_line = message.lines().next().unwrap_or_default();
    BridgeResponse::failure(first_line.trim_start_matches("error: "))
}

pub async fn collect<S: HackathonSource>(source: &S, query: &HackathonQuery) -> BridgeResponse {
    BridgeResponse::success(source.hackathons(query).await)
}

pub fn write_response<W: Write>(writer: &mut W, response: &BridgeResponse) -> Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
