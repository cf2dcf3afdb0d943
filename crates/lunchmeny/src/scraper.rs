use crate::fetcher::{FetchedPage, PageFetcher};
use crate::parser::parse_page;

use reqwest::Client;
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Empty response for {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, ScraperError> {
        log::info!("Fetching {}", url);
        let (final_url, html) = self.get_html(url).await?;

        if html.trim().is_empty() {
            return Err(ScraperError::EmptyResponse(url.to_string()));
        }
        if final_url != *url {
            log::debug!("{} redirected to {}", url, final_url);
        }

        Ok(parse_page(&html, &final_url))
    }

    async fn get_html(&self, url: &Url) -> Result<(Url, String), ScraperError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?
            .error_for_status()?;
        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?;
        Ok((final_url, html))
    }
}

impl PageFetcher for WebScraper {
    type Error = ScraperError;

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, ScraperError> {
        self.fetch_page(url).await
    }
}
