use std::time::Duration;

use reqwest::{Client, ClientBuilder};

use crate::errors::ScrapeError;
use crate::extract::enforce_https;

// Bound on a hung page load; surfaced to the pipeline as a 500 ScrapeError.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct RequestClient {
    client: Client,
}

impl RequestClient {
    pub fn new() -> anyhow::Result<Self> {
        let client = ClientBuilder::new().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Fetch the rendered markup of a page, upgrading the URL scheme to
    /// https first. Non-success statuses and transport failures both come
    /// back as a status-carrying [`ScrapeError`].
    pub async fn fetch_url_body(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self
            .client
            .get(enforce_https(url))
            .send()
            .await
            .map_err(|e| ScrapeError::transport(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::new(
                status.as_u16(),
                format!("unexpected status fetching {}", url),
            ));
        }

        response.text().await.map_err(|e| ScrapeError::transport(&e))
    }
}
