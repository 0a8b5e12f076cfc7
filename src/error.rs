use serde::Serialize;
use thiserror::Error;

/// Which of the two fetches a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStage {
    /// Plain HTTP request, server-rendered HTML
    Static,
    /// Headless browser, client-rendered DOM
    Rendered,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Static => write!(f, "static"),
            FetchStage::Rendered => write!(f, "rendered"),
        }
    }
}

/// Errors that abort a scan
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("static fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not start a WebDriver session (tried {tried:?}): {last_error}")]
    WebDriverConnect {
        tried: Vec<String>,
        last_error: String,
    },

    #[error("browser failed while {context}: {source}")]
    Browser {
        context: &'static str,
        #[source]
        source: fantoccini::error::CmdError,
    },

    #[error("{stage} fetch returned an empty document")]
    EmptyDocument { stage: FetchStage },

    #[error("failed to read configuration: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl AuditError {
    pub(crate) fn browser(context: &'static str, source: fantoccini::error::CmdError) -> Self {
        AuditError::Browser { context, source }
    }
}
