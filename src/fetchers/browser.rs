use crate::config::AuditConfig;
use crate::error::AuditError;
use crate::fetchers::PageFetcher;
use crate::results::FetchedPage;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::time::{Duration, Instant};
use url::Url;

/// Loads the page in a headless browser over WebDriver and captures the DOM
/// once the settle period has passed.
pub struct BrowserFetcher {
    webdriver_urls: Vec<String>,
    browser_args: Vec<String>,
    settle: Duration,
}

impl BrowserFetcher {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            webdriver_urls: config.webdriver_candidates(),
            browser_args: config.browser_args.clone(),
            settle: config.settle_period(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        // geckodriver only understands the headless switch
        let firefox_args: Vec<&String> = self
            .browser_args
            .iter()
            .filter(|arg| arg.as_str() == "--headless")
            .collect();

        let mut caps = Capabilities::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({ "args": self.browser_args }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({ "args": firefox_args }),
        );
        caps
    }

    /// Opens a session on the first WebDriver server that accepts one
    async fn connect(&self) -> Result<Client, AuditError> {
        let mut last_error = String::from("no WebDriver URL configured");

        for (i, webdriver_url) in self.webdriver_urls.iter().enumerate() {
            if i > 0 {
                ::log::info!("Trying fallback WebDriver URL: {}", webdriver_url);
            }

            let mut builder = ClientBuilder::native();
            builder.capabilities(self.capabilities());
            match builder.connect(webdriver_url).await {
                Ok(client) => {
                    ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                    return Ok(client);
                }
                Err(e) => {
                    ::log::warn!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                    last_error = e.to_string();
                }
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(AuditError::WebDriverConnect {
            tried: self.webdriver_urls.clone(),
            last_error,
        })
    }

    async fn capture(&self, client: &Client, url: &Url) -> Result<String, AuditError> {
        client
            .goto(url.as_str())
            .await
            .map_err(|e| AuditError::browser("navigating", e))?;

        // No reliable "DOM stable" signal exists, so wait a fixed period
        ::log::debug!("Waiting {:?} for client-side rendering", self.settle);
        tokio::time::sleep(self.settle).await;

        client
            .source()
            .await
            .map_err(|e| AuditError::browser("reading page source", e))
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, AuditError> {
        let client = self.connect().await?;

        ::log::info!("Rendered fetch: {}", url);
        let started = Instant::now();
        let captured = self.capture(&client, url).await;
        let elapsed = started.elapsed();

        if let Err(e) = client.close().await {
            ::log::warn!("Failed to close WebDriver session: {}", e);
        }

        let html = captured?;
        ::log::debug!(
            "Rendered fetch of {} took {:.2}s ({} bytes)",
            url,
            elapsed.as_secs_f64(),
            html.len()
        );
        Ok(FetchedPage::new(html, elapsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_carry_browser_args() {
        let fetcher = BrowserFetcher::new(&AuditConfig::default());
        let caps = fetcher.capabilities();
        let chrome_args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert_eq!(chrome_args.len(), 4);
        assert_eq!(chrome_args[0], "--headless");
        let firefox_args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert_eq!(firefox_args.len(), 1);
    }

    #[test]
    fn test_uses_all_webdriver_candidates() {
        let fetcher = BrowserFetcher::new(&AuditConfig::default());
        assert_eq!(fetcher.webdriver_urls.len(), 3);
        assert_eq!(fetcher.settle, Duration::from_secs(5));
    }
}
