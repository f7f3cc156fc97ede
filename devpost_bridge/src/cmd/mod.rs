pub mod bridge;
pub mod inspect;
pub mod scrape;
pub mod server;

use anyhow::{Context, Result};
use clap::Args;
use devpost_bridge_libs::devpost::{
    client::{DevpostClient, DEVPOST_API_URL},
    query::{HackathonQuery, StatusFilter, DEFAULT_LIMIT},
};
use std::env;

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Maximum number of hackathons to fetch
    #[arg(long, default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,
    /// Get only active hackathons
    #[arg(long, conflicts_with = "upcoming")]
    pub active: bool,
    /// Get only upcoming hackathons
    #[arg(long)]
    pub upcoming: bool,
}

impl FilterArgs {
    pub fn to_query(&self) -> Result<HackathonQuery> {
        let status = StatusFilter::from_flags(self.active, self.upcoming)?;
        Ok(HackathonQuery::new(self.limit, status))
    }
}

pub fn api_url() -> String {
    env::var("DEVPOST_API_URL").unwrap_or_else(|_| {
        tracing::debug!(
            "DEVPOST_API_URL environment variable is not set. Default value `{}` will be used.",
            DEVPOST_API_URL
        );
        String::from(DEVPOST_API_URL)
    })
}

pub fn create_client() -> Result<DevpostClient> {
    let api_url = api_url();
    DevpostClient::new(&api_url).with_context(|| {
        let message = format!("couldn't create Devpost API client for `{}`", api_url);
        tracing::error!(message);
        message
    })
}
