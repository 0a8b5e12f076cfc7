pub mod config;
pub mod error;
pub mod fetchers;
pub mod parsers;
pub mod report;
pub mod results;
pub mod scoring;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::AuditConfig;
pub use error::{AuditError, FetchStage};
pub use fetchers::PageFetcher;
pub use parsers::extract;
pub use report::AuditReport;
pub use results::PageSnapshot;
pub use scoring::{AuditResult, score};

use fetchers::{BrowserFetcher, HttpFetcher};
use std::path::Path;
use url::Url;

/// Builder for a single-URL static-vs-rendered audit
pub struct Audit {
    url: String,
    config: AuditConfig,
}

impl Audit {
    /// Create a new audit of `url` with default settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            config: AuditConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let config = AuditConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, AuditError> {
        let config = AuditConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self
    }

    /// Set the wait between navigation and DOM capture
    pub fn with_settle_secs(mut self, seconds: u64) -> Self {
        self.config.settle_secs = seconds;
        self
    }

    /// Set the timeout of the static fetch
    pub fn with_static_timeout(mut self, seconds: u64) -> Self {
        self.config.static_timeout_secs = seconds;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Fetch over HTTP and WebDriver, then extract and score
    pub async fn run(self) -> Result<AuditReport, AuditError> {
        let http = HttpFetcher::new(&self.config)?;
        let browser = BrowserFetcher::new(&self.config);
        self.run_with(&http, &browser).await
    }

    /// Same as [`Audit::run`] with caller-supplied fetchers
    pub async fn run_with<S, R>(
        self,
        static_fetcher: &S,
        rendered_fetcher: &R,
    ) -> Result<AuditReport, AuditError>
    where
        S: PageFetcher,
        R: PageFetcher,
    {
        let url = parse_target(&self.url)?;
        ::log::info!("Starting audit of {}", url);

        // The fetches are independent; the rendered one still waits out its settle period
        let (static_page, rendered_page) =
            tokio::try_join!(static_fetcher.fetch(&url), rendered_fetcher.fetch(&url))?;

        let static_snapshot = extract(&static_page.html).ok_or(AuditError::EmptyDocument {
            stage: FetchStage::Static,
        })?;
        let rendered_snapshot = extract(&rendered_page.html).ok_or(AuditError::EmptyDocument {
            stage: FetchStage::Rendered,
        })?;

        let result = score(&static_snapshot, &rendered_snapshot);
        let rendered_links = utils::LinkBreakdown::classify(&rendered_snapshot.links, &url);

        Ok(AuditReport {
            url: url.to_string(),
            static_elapsed_secs: static_page.elapsed.as_secs_f64(),
            rendered_elapsed_secs: rendered_page.elapsed.as_secs_f64(),
            static_status: static_page.status,
            rendered_links,
            static_snapshot,
            rendered_snapshot,
            result,
        })
    }
}

/// Accepts absolute http(s) URLs only
pub fn parse_target(url: &str) -> Result<Url, AuditError> {
    let parsed = Url::parse(url.trim()).map_err(|e| AuditError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(AuditError::InvalidUrl {
            url: url.to_string(),
            reason: format!("unsupported scheme {:?}", other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::FetchedPage;
    use crate::scoring::Deduction;
    use std::time::Duration;

    /// Serves a fixed document regardless of URL
    struct CannedFetcher {
        html: &'static str,
        elapsed: Duration,
    }

    impl CannedFetcher {
        fn new(html: &'static str) -> Self {
            Self {
                html,
                elapsed: Duration::from_millis(250),
            }
        }
    }

    impl PageFetcher for CannedFetcher {
        async fn fetch(&self, _url: &Url) -> Result<FetchedPage, AuditError> {
            Ok(FetchedPage::new(self.html.to_string(), self.elapsed).with_status(200))
        }
    }

    struct FailingFetcher;

    impl PageFetcher for FailingFetcher {
        async fn fetch(&self, _url: &Url) -> Result<FetchedPage, AuditError> {
            Err(AuditError::WebDriverConnect {
                tried: vec!["http://localhost:4444".to_string()],
                last_error: "connection refused".to_string(),
            })
        }
    }

    const STATIC_SHELL: &str = r#"<html><head>
        <title>Shop</title>
        <script src="/bundle.js"></script>
        </head><body><div id="root">Loading</div></body></html>"#;

    const HYDRATED: &str = r#"<html><head>
        <title>Shop</title>
        <link rel="canonical" href="https://shop.example/">
        <script src="/bundle.js"></script>
        <script type="application/ld+json">{"@type":"Store"}</script>
        </head><body><div id="root">
        <h1>Spring collection</h1>
        <p>Fresh trainers and boots for every season</p>
        <a href="/boots">Boots</a> <a href="https://blog.example/">Blog</a>
        <img src="hero.png">
        </div></body></html>"#;

    #[tokio::test]
    async fn test_audit_with_canned_pages() {
        let report = Audit::new("https://shop.example/")
            .run_with(&CannedFetcher::new(STATIC_SHELL), &CannedFetcher::new(HYDRATED))
            .await
            .unwrap();

        assert_eq!(report.static_snapshot.word_count, 2);
        assert_eq!(report.rendered_snapshot.word_count, 12);
        assert!(report.result.js_reliance_percent > 80.0);
        assert_eq!(report.result.deductions, vec![Deduction::HighJsReliance]);
        assert_eq!(report.result.health_score, 80);
        assert_eq!(report.result.deltas.schema_count, 1);
        assert_eq!(report.rendered_links.internal, 1);
        assert_eq!(report.rendered_links.external, 1);
        assert_eq!(report.static_status, Some(200));
        assert!((report.rendered_elapsed_secs - 0.25).abs() < 1e-9);

        let text = report.to_text();
        assert!(text.contains("Health score: 80/100"));
        assert!(text.contains("Spring collection"));
        assert!(text.contains("Robots tag: not declared (implies index, follow)"));
        assert!(text.contains("Types: Store"));
        assert!(text.contains("server-side rendering"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["result"]["health_score"], 80);
        assert_eq!(json["rendered_snapshot"]["headings"]["H1"][0], "Spring collection");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_fatal() {
        let err = Audit::new("https://shop.example/")
            .run_with(&CannedFetcher::new(STATIC_SHELL), &FailingFetcher)
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::WebDriverConnect { .. }));
    }

    #[tokio::test]
    async fn test_empty_rendered_document() {
        let err = Audit::new("https://shop.example/")
            .run_with(&CannedFetcher::new(STATIC_SHELL), &CannedFetcher::new(""))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuditError::EmptyDocument {
                stage: FetchStage::Rendered
            }
        ));
    }

    #[test]
    fn test_parse_target() {
        assert!(parse_target("https://example.com/page").is_ok());
        assert!(parse_target("  http://example.com  ").is_ok());
        assert!(matches!(
            parse_target("example.com"),
            Err(AuditError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_target("ftp://example.com/file"),
            Err(AuditError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_builder_overrides() {
        let audit = Audit::new("https://example.com")
            .with_config_str(r#"{"settle_secs": 9}"#)
            .unwrap()
            .with_webdriver_url("http://grid:4444")
            .with_static_timeout(3)
            .with_user_agent("test-agent");
        assert_eq!(audit.config().settle_secs, 9);
        assert_eq!(audit.config().webdriver_url, "http://grid:4444");
        assert_eq!(audit.config().static_timeout_secs, 3);
        assert_eq!(audit.config().user_agent, "test-agent");
    }
}
