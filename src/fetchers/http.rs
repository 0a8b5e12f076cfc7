use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::fetchers::PageFetcher;
use crate::results::FetchedPage;
use reqwest::Client;
use std::time::Instant;
use url::Url;

/// Plain HTTP GET of the server-rendered HTML
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with the configured crawler user agent and timeout
    pub fn new(config: &AuditConfig) -> Result<Self, AuditError> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.static_timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, AuditError> {
        ::log::info!("Static fetch: {}", url);
        let started = Instant::now();

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            // Non-2xx bodies are still analysed
            ::log::warn!("Static fetch of {} returned HTTP {}", url, status);
        }
        let html = response.text().await?;
        let elapsed = started.elapsed();

        ::log::debug!(
            "Static fetch of {} took {:.2}s ({} bytes)",
            url,
            elapsed.as_secs_f64(),
            html.len()
        );

        Ok(FetchedPage::new(html, elapsed).with_status(status.as_u16()))
    }
}
