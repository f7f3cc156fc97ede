use crate::api::ToQueryParameter;
use crate::devpost::{model::RawListing, query::HackathonQuery};
use crate::normalize::{normalize_batch, HackathonRecord};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Local};
use reqwest::{self, header::ACCEPT, Client, StatusCode, Url};
use thiserror::Error;

type Result<T> = std::result::Result<T, DevpostError>;

pub const DEVPOST_API_URL: &str = "https://devpost.com/api/hackathons";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Error)]
pub enum DevpostError {
    #[error("failed to request to Devpost API")]
    RequestError(#[from] reqwest::Error),
    #[error("failed to deserialize JSON data")]
    DeserializeError(#[from] serde_json::Error),
    #[error("invalid Devpost API url given")]
    InvalidUrlError(#[from] url::ParseError),
    #[error("unexpected status code {0} returned from Devpost API")]
    StatusError(StatusCode),
    #[error("active and upcoming filters are mutually exclusive")]
    ConflictingFilters,
}

#[async_trait]
pub trait HackathonSource: Send + Sync {
    /// Requests one page of hackathons and returns the raw listing.
    async fn listing(&self, query: &HackathonQuery) -> Result<RawListing>;

    /// Fetches and normalizes hackathons.
    ///
    /// Every request or parse failure is logged and yields an empty list, so callers never
    /// have to tell "nothing found" apart from "request failed".
    async fn hackathons(&self, query: &HackathonQuery) -> Vec<HackathonRecord> {
        tracing::info!(
            "Fetching up to {} hackathons with filter {}",
            query.limit,
            query.status
        );

        let listing = match self.listing(query).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::error!("failed to fetch hackathons cause: {:?}", e);
                return Vec::new();
            }
        };

        let scraped_at: DateTime<FixedOffset> = Local::now().into();
        let batch = normalize_batch(listing.hackathons, scraped_at);

        tracing::info!(
            "{} hackathons successfully fetched, {} skipped.",
            batch.records.len(),
            batch.skipped.len()
        );

        batch.records
    }
}

pub struct DevpostClient {
    api_url: Url,
    client: Client,
}

impl DevpostClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let api_url = Url::parse(api_url)?;
        let client = Client::builder().gzip(true).user_agent(USER_AGENT).build()?;

        Ok(DevpostClient { api_url, client })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Returns the status and the body as is, without any interpretation.
    pub async fn probe(&self, query: &HackathonQuery) -> Result<(StatusCode, String)> {
        let res = self
            .client
            .get(self.api_url.clone())
            .query(&query.to_query())
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = res.status();
        let body = res.text().await?;

        Ok((status, body))
    }
}

#[async_trait]
impl HackathonSource for DevpostClient {
    async fn listing(&self, query: &HackathonQuery) -> Result<RawListing> {
        let params = query.to_query();
        tracing::debug!("GET {} with params {:?}", self.api_url, params);

        let res = self
            .client
            .get(self.api_url.clone())
            .query(&params)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = res.status();
        tracing::debug!("Response status code: {}", status);
        if status != StatusCode::OK {
            return Err(DevpostError::StatusError(status));
        }

        let body = res.bytes().await?;
        let listing: RawListing = serde_json::from_slice(&body)?;

        Ok(listing)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::devpost::query::StatusFilter;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;

    fn client_for(server: &ServerGuard) -> DevpostClient {
        DevpostClient::new(&format!("{}/api/hackathons", server.url())).unwrap()
    }

    #[test]
    fn create_new_client() {
        let client = DevpostClient::new(DEVPOST_API_URL).unwrap();
        assert_eq!(
            client.api_url(),
            &Url::parse("https://devpost.com/api/hackathons").unwrap()
        );
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = DevpostClient::new("not a url");
        assert!(matches!(result, Err(DevpostError::InvalidUrlError(_))));
    }

    #[tokio::test]
    async fn fetch_and_normalize_hackathons() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("page".into(), "1".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
                Matcher::UrlEncoded("open_state[]".into(), "open".into()),
            ]))
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "hackathons": [
                        {"title": "Alpha", "open_state": "open", "registrations_count": 42},
                        {"title": "Beta", "open_state": "open"}
                    ],
                    "meta": {"total_count": 2, "per_page": 2}
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let query = HackathonQuery::new(2, StatusFilter::Open);
        let records = client.hackathons(&query).await;

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Alpha");
        assert_eq!(records[0].participants, "42 participants");
        assert_eq!(records[1].title, "Beta");
        assert_eq!(records[1].location, "Online");
    }

    #[tokio::test]
    async fn upcoming_filter_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::UrlEncoded("open_state[]".into(), "upcoming".into()))
            .with_status(200)
            .with_body(r#"{"hackathons": []}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let records = client
            .hackathons(&HackathonQuery::new(20, StatusFilter::Upcoming))
            .await;

        mock.assert_async().await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_yields_empty_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body(r#"{"hackathons": [{"title": "ignored"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.listing(&HackathonQuery::default()).await;
        assert!(matches!(
            result,
            Err(DevpostError::StatusError(StatusCode::SERVICE_UNAVAILABLE))
        ));

        let records = client.hackathons(&HackathonQuery::default()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_yields_empty_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>definitely not json</html>")
            .create_async()
            .await;

        let client = client_for(&server);
        let result = client.listing(&HackathonQuery::default()).await;
        assert!(matches!(result, Err(DevpostError::DeserializeError(_))));

        let records = client.hackathons(&HackathonQuery::default()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn missing_container_key_yields_empty_list() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"results": [{"title": "Alpha"}]}"#)
            .create_async()
            .await;

        let client = client_for(&server);
        let records = client.hackathons(&HackathonQuery::default()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn connection_failure_yields_empty_list() {
        let client = DevpostClient::new("http://127.0.0.1:1/api/hackathons").unwrap();

        let result = client.listing(&HackathonQuery::default()).await;
        assert!(matches!(result, Err(DevpostError::RequestError(_))));

        let records = client.hackathons(&HackathonQuery::default()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn malformed_record_is_dropped_from_batch() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "hackathons": [
                        {"title": "Alpha"},
                        {"title": "Broken", "displayed_location": "Berlin"},
                        {"title": "Gamma"}
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = client_for(&server);
        let records = client.hackathons(&HackathonQuery::default()).await;

        let titles: Vec<&str> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Gamma"]);
    }

    #[tokio::test]
    async fn probe_returns_raw_status_and_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/hackathons")
            .match_query(Matcher::UrlEncoded("per_page".into(), "5".into()))
            .with_status(404)
            .with_body("not found")
            .create_async()
            .await;

        let client = client_for(&server);
        let (status, body) = client
            .probe(&HackathonQuery::new(5, StatusFilter::Any))
            .await
            .unwrap();

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "not found");
    }
}
