use crate::adapter::CompiledSelectors;
use crate::error::{PageError, PageResult};
use crate::scrape::scrape_html;
use crate::types::ScrapePayload;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// Fetches exercise pages so the scraper can run against them. This is the
/// "injection" step: anything that stops us from reading the page is an
/// injection failure.
#[derive(Clone)]
pub struct PageLoader {
    http: Client,
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLoader {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("codehelper/0.2")
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { http }
    }

    pub async fn load(&self, url: &str) -> PageResult<String> {
        let parsed =
            Url::parse(url).map_err(|e| PageError::Injection(format!("invalid page URL {url}: {e}")))?;

        match parsed.scheme() {
            "http" | "https" => {
                debug!("Fetching page over HTTP: {}", parsed);
                let response = self.http.get(parsed.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(PageError::Injection(format!(
                        "page returned {} for {}",
                        status, parsed
                    )));
                }
                Ok(response.text().await?)
            }
            "file" => {
                let path = parsed
                    .to_file_path()
                    .map_err(|_| PageError::Injection(format!("not a local path: {parsed}")))?;
                debug!("Reading page from disk: {}", path.display());
                Ok(tokio::fs::read_to_string(&path).await?)
            }
            _ => Err(PageError::UnsupportedUrl(url.to_string())),
        }
    }

    /// Loads the page and scrapes it. Injection failures come back as an
    /// error payload so they reach the user like any other scrape failure.
    pub async fn inject(&self, url: &str, selectors: &CompiledSelectors) -> ScrapePayload {
        match self.load(url).await {
            Ok(html) => {
                info!("Injected scraper into {}", url);
                scrape_html(&html, selectors)
            }
            Err(e) => {
                error!("{}", e);
                ScrapePayload::failed(e.to_string())
            }
        }
    }
}
