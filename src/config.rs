use crate::error::AuditError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for one audit run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// URL of the WebDriver server used for the rendered fetch
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// WebDriver URLs tried in order when `webdriver_url` refuses a session
    #[serde(default = "default_fallback_webdriver_urls")]
    pub fallback_webdriver_urls: Vec<String>,

    /// Seconds to wait after navigation before the rendered DOM is captured
    #[serde(default = "default_settle_secs")]
    pub settle_secs: u64,

    /// Timeout for the static HTTP fetch (the browser fetch has none)
    #[serde(default = "default_static_timeout_secs")]
    pub static_timeout_secs: u64,

    /// User agent sent with the static fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Command-line flags handed to the browser
    #[serde(default = "default_browser_args")]
    pub browser_args: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            fallback_webdriver_urls: default_fallback_webdriver_urls(),
            settle_secs: default_settle_secs(),
            static_timeout_secs: default_static_timeout_secs(),
            user_agent: default_user_agent(),
            browser_args: default_browser_args(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AuditError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, AuditError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Replace the WebDriver URL with `WEBDRIVER_URL` if it is set and non-empty
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            self.apply_webdriver_override(&webdriver_url);
        }
    }

    fn apply_webdriver_override(&mut self, webdriver_url: &str) {
        if !webdriver_url.is_empty() {
            ::log::debug!("WebDriver URL overridden to {}", webdriver_url);
            self.webdriver_url = webdriver_url.to_string();
        }
    }

    pub fn settle_period(&self) -> Duration {
        Duration::from_secs(self.settle_secs)
    }

    pub fn static_timeout(&self) -> Duration {
        Duration::from_secs(self.static_timeout_secs)
    }

    /// The primary WebDriver URL followed by every distinct fallback
    pub fn webdriver_candidates(&self) -> Vec<String> {
        let mut candidates = vec![self.webdriver_url.clone()];
        for url in &self.fallback_webdriver_urls {
            if !candidates.contains(url) {
                candidates.push(url.clone());
            }
        }
        candidates
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_fallback_webdriver_urls() -> Vec<String> {
    vec![
        "http://localhost:9515".to_string(), // ChromeDriver default
        "http://127.0.0.1:4444".to_string(),
    ]
}

fn default_settle_secs() -> u64 {
    5
}

fn default_static_timeout_secs() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; Googlebot/2.1)".to_string()
}

fn default_browser_args() -> Vec<String> {
    [
        "--headless",
        "--no-sandbox",
        "--disable-dev-shm-usage",
        "--disable-gpu",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
