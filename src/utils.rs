use serde::Serialize;
use url::Url;

/// Round to one decimal place
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Shorten a value for a table cell, appending "..." when cut
pub fn truncate_display(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let cut: String = value.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Anchor hrefs classified against the audited page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LinkBreakdown {
    /// Same host as the audited page
    pub internal: usize,
    /// Another host
    pub external: usize,
    /// Non-navigational schemes (mailto:, javascript:, tel:) or hrefs that fail to resolve
    pub other: usize,
}

impl LinkBreakdown {
    pub fn classify(links: &[String], base: &Url) -> Self {
        let mut breakdown = Self::default();
        for link in links {
            match base.join(link) {
                Ok(resolved) if matches!(resolved.scheme(), "http" | "https") => {
                    if resolved.host_str() == base.host_str() {
                        breakdown.internal += 1;
                    } else {
                        breakdown.external += 1;
                    }
                }
                _ => breakdown.other += 1,
            }
        }
        breakdown
    }
}
