use crate::cmd::{create_client, FilterArgs};
use anyhow::{Context, Result};
use clap::Args;
use devpost_bridge_libs::{
    devpost::{client::HackathonSource, query::HackathonQuery},
    SavedHackathons,
};
use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Output file path
    #[arg(long, default_value = "hackathons.json")]
    output: PathBuf,
}

pub async fn run(args: ScrapeArgs) -> Result<()> {
    let query = args.filter.to_query()?;
    let client = create_client()?;

    let saved = match scrape(&client, &query, &args.output).await? {
        Some(saved) => saved,
        None => return Ok(()),
    };

    if !io::stdout().is_terminal() {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    }

    Ok(())
}

/// Fetches and saves the listing. Returns `None` and leaves `output` untouched when nothing
/// was found.
pub async fn scrape<S: HackathonSource>(
    source: &S,
    query: &HackathonQuery,
    output: &Path,
) -> Result<Option<SavedHackathons>> {
    tracing::info!("Fetching up to {} hackathons from Devpost...", query.limit);
    let hackathons = source.hackathons(query).await;

    if hackathons.is_empty() {
        tracing::warn!("No hackathons found.");
        return Ok(None);
    }
    tracing::info!("Found {} hackathons.", hackathons.len());

    let saved = SavedHackathons { hackathons };
    save(&saved, output).await?;
    tracing::info!("Data saved to {}", output.display());

    Ok(Some(saved))
}

pub async fn save(saved: &SavedHackathons, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(saved)?;
    tokio::fs::write(path, json).await.with_context(|| {
        let message = format!("failed to write hackathons to {}", path.display());
        tracing::error!(message);
        message
    })
}
