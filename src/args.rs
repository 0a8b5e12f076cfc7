use clap::{Parser, ValueEnum};
use render_gap::{Audit, AuditError};

#[derive(Parser, Debug)]
#[command(name = "render-gap")]
#[command(about = "Compares a page's server HTML with its rendered DOM and scores it for SEO")]
#[command(version)]
pub struct Args {
    /// Absolute http(s) URL to audit
    pub url: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Seconds to let client-side rendering settle before capturing the DOM
    #[arg(long)]
    pub settle_secs: Option<u64>,

    /// Timeout in seconds for the static HTTP fetch
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// User agent for the static HTTP fetch
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Layer the configuration: file, then environment, then command-line flags
pub fn build_audit(args: &Args) -> Result<Audit, AuditError> {
    let mut audit = Audit::new(args.url.clone());
    if let Some(path) = &args.config {
        audit = audit.with_config_file(path)?;
    }

    let mut config = audit.config().clone();
    config.apply_env();
    audit = audit.with_config(config);

    if let Some(webdriver_url) = &args.webdriver_url {
        audit = audit.with_webdriver_url(webdriver_url.clone());
    }
    if let Some(seconds) = args.settle_secs {
        audit = audit.with_settle_secs(seconds);
    }
    if let Some(seconds) = args.timeout_secs {
        audit = audit.with_static_timeout(seconds);
    }
    if let Some(user_agent) = &args.user_agent {
        audit = audit.with_user_agent(user_agent.clone());
    }
    Ok(audit)
}
