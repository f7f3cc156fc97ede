use crate::cmd::create_client;
use anyhow::{Context, Result};
use clap::Args;
use devpost_bridge_libs::{
    devpost::query::{HackathonQuery, StatusFilter},
    ToQueryParameter,
};
use itertools::Itertools;
use serde_json::Value;
use std::path::PathBuf;

const PREVIEW_LENGTH: usize = 1000;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Number of hackathons to request
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,
    /// Where to save the raw response
    #[arg(long, default_value = "devpost_api_debug.json")]
    save: PathBuf,
}

pub async fn run(args: InspectArgs) -> Result<()> {
    let client = create_client()?;
    let query = HackathonQuery::new(args.limit, StatusFilter::Any);

    println!("Fetching URL: {}", client.api_url());
    println!("Parameters: {:?}", query.to_query());

    let (status, body) = client.probe(&query).await.with_context(|| {
        let message = "request to Devpost API failed";
        tracing::error!(message);
        message
    })?;
    println!("HTTP Status Code: {}", status);

    if status.as_u16() != 200 {
        println!("{}", body);
        anyhow::bail!(
            "failed to get a successful response from Devpost API: {}",
            status
        );
    }
    println!("Response Length: {} characters", body.chars().count());

    let data: Value = match serde_json::from_str(&body) {
        Ok(data) => data,
        Err(e) => {
            println!("\nERROR: Failed to parse JSON response: {}", e);
            println!("\nResponse preview:\n{}", preview(&body, PREVIEW_LENGTH));
            return Ok(());
        }
    };

    print!("{}", describe(&data));

    tokio::fs::write(&args.save, serde_json::to_string_pretty(&data)?)
        .await
        .with_context(|| format!("failed to save API response to {}", args.save.display()))?;
    println!(
        "\nSaved API response to {} for inspection",
        args.save.display()
    );

    Ok(())
}

/// Human-readable summary of the shape of a listing response.
pub fn describe(data: &Value) -> String {
    let mut lines = vec![String::from("\nAPI response structure:")];
    describe_into(data, &mut lines);
    lines.iter().map(|line| format!("{}\n", line)).collect()
}

fn describe_into(data: &Value, lines: &mut Vec<String>) {
    let Some(root) = data.as_object() else {
        lines.push(String::from("ERROR: response is not a JSON object"));
        return;
    };
    lines.push(format!("Root keys: {}", root.keys().join(", ")));

    let Some(hackathons) = root.get("hackathons") else {
        lines.push(String::from("\nERROR: No 'hackathons' key found in API response."));
        return;
    };
    let Some(hackathons) = hackathons.as_array() else {
        lines.push(String::from("\nERROR: 'hackathons' is not a list."));
        return;
    };
    lines.push(format!("Found {} hackathons in API response", hackathons.len()));

    let Some(first) = hackathons.first() else {
        lines.push(String::from("\nNo hackathons found in API response."));
        return;
    };
    lines.push(String::from("\nExample hackathon data:"));
    for (label, key) in [("Title", "title"), ("URL", "url"), ("Status", "open_state")] {
        lines.push(format!("{}: {}", label, first.get(key).unwrap_or(&Value::Null)));
    }
    let fields = first
        .as_object()
        .map(|fields| fields.keys().join(", "))
        .unwrap_or_default();
    lines.push(format!("Available fields: {}", fields));
}

pub fn preview(body: &str, max_chars: usize) -> String {
    if body.chars().count() > max_chars {
        format!("{}...", body.chars().take(max_chars).collect::<String>())
    } else {
        String::from(body)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn describe_listing_with_items() {
        let data = json!({
            "hackathons": [
                {"title": "Alpha", "url": "https://alpha.devpost.com/", "open_state": "open"}
            ],
            "meta": {"total_count": 1}
        });
        let report = describe(&data);

        assert!(report.contains("Root keys: hackathons, meta"));
        assert!(report.contains("Found 1 hackathons in API response"));
        assert!(report.contains("Title: \"Alpha\""));
        assert!(report.contains("Status: \"open\""));
        assert!(report.contains("Available fields: open_state, title, url"));
    }

    #[test]
    fn describe_listing_without_container_key() {
        let report = describe(&json!({"results": []}));
        assert!(report.contains("No 'hackathons' key found"));
    }

    #[test]
    fn describe_empty_listing() {
        let report = describe(&json!({"hackathons": []}));
        assert!(report.contains("Found 0 hackathons"));
        assert!(report.contains("No hackathons found in API response."));
    }

    #[test]
    fn describe_reports_every_line_once() {
        let report = describe(&json!({"hackathons": [{"title": "Alpha"}]}));

        assert!(report.starts_with("\nAPI response structure:\n"));
        assert!(report.ends_with("Available fields: title\n"));
        assert_eq!(report.matches("Root keys: hackathons").count(), 1);
        assert!(report.contains("URL: null\n"));
    }

    #[test]
    fn describe_non_object_response() {
        assert_eq!(
            describe(&json!([1, 2])),
            "\nAPI response structure:\nERROR: response is not a JSON object\n"
        );
    }

    #[test]
    fn preview_truncates_long_bodies() {
        let body = "x".repeat(1500);
        let shown = preview(&body, 1000);
        assert_eq!(shown.len(), 1003);
        assert!(shown.ends_with("..."));

        assert_eq!(preview("short", 1000), "short");
    }
}
