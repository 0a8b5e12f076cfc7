use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Robots directive assumed when a page carries no `<meta name="robots">`
pub const DEFAULT_ROBOTS_DIRECTIVE: &str = "index, follow";

/// Raw content returned by one fetch
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Serialized HTML
    pub html: String,

    /// Wall-clock time the fetch took (including any settle period)
    pub elapsed: Duration,

    /// HTTP status, when the fetcher can observe one
    pub status: Option<u16>,
}

impl FetchedPage {
    pub fn new(html: String, elapsed: Duration) -> Self {
        Self {
            html,
            elapsed,
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

/// Heading levels tracked by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
}

impl HeadingLevel {
    pub const ALL: [HeadingLevel; 3] = [HeadingLevel::H1, HeadingLevel::H2, HeadingLevel::H3];

    pub fn tag(self) -> &'static str {
        match self {
            HeadingLevel::H1 => "h1",
            HeadingLevel::H2 => "h2",
            HeadingLevel::H3 => "h3",
        }
    }
}

impl std::fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeadingLevel::H1 => write!(f, "H1"),
            HeadingLevel::H2 => write!(f, "H2"),
            HeadingLevel::H3 => write!(f, "H3"),
        }
    }
}

/// Heading text per level, in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headings {
    #[serde(rename = "H1")]
    pub h1: Vec<String>,
    #[serde(rename = "H2")]
    pub h2: Vec<String>,
    #[serde(rename = "H3")]
    pub h3: Vec<String>,
}

impl Headings {
    pub fn get(&self, level: HeadingLevel) -> &[String] {
        match level {
            HeadingLevel::H1 => &self.h1,
            HeadingLevel::H2 => &self.h2,
            HeadingLevel::H3 => &self.h3,
        }
    }

    pub(crate) fn get_mut(&mut self, level: HeadingLevel) -> &mut Vec<String> {
        match level {
            HeadingLevel::H1 => &mut self.h1,
            HeadingLevel::H2 => &mut self.h2,
            HeadingLevel::H3 => &mut self.h3,
        }
    }
}

/// Image counts for a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageStats {
    /// Every `<img>` element
    pub total: usize,

    /// Images with no `alt` attribute at all (`alt=""` is present)
    pub missing_alt: usize,
}

/// SEO-relevant fields extracted from one HTML document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub title: Option<String>,
    pub description: Option<String>,
    pub canonical: Option<String>,

    /// Content of `<meta name="robots">` as declared; `None` when the tag is absent
    pub robots: Option<String>,

    pub open_graph_title: Option<String>,
    pub hreflang_values: Vec<String>,
    pub headings: Headings,

    /// Anchor hrefs as written in the document, not resolved
    pub links: Vec<String>,

    pub image_stats: ImageStats,

    /// External scripts only (`<script src>`)
    pub script_count: usize,

    /// One entry per parseable JSON-LD block; `None` where the block has no `@type`
    pub structured_data_types: Vec<Option<String>>,

    pub word_count: usize,
    pub html_size_kb: f64,
    pub raw_text: String,
}

impl PageSnapshot {
    /// Effective robots directive, falling back to the implied default
    pub fn robots_directive(&self) -> &str {
        self.robots.as_deref().unwrap_or(DEFAULT_ROBOTS_DIRECTIVE)
    }

    /// Whether the robots directive was declared rather than implied
    pub fn robots_declared(&self) -> bool {
        self.robots.is_some()
    }

    pub fn h1_count(&self) -> usize {
        self.headings.h1.len()
    }

    pub fn schema_count(&self) -> usize {
        self.structured_data_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_tags() {
        let tags: Vec<_> = HeadingLevel::ALL.iter().map(|l| l.tag()).collect();
        assert_eq!(tags, vec!["h1", "h2", "h3"]);
        assert_eq!(HeadingLevel::H2.to_string(), "H2");
    }

    #[test]
    fn test_headings_serialize_with_level_keys() {
        let headings = Headings {
            h1: vec!["Main".to_string()],
            ..Headings::default()
        };
        let json = serde_json::to_value(&headings).unwrap();
        assert_eq!(json["H1"][0], "Main");
        assert!(json["H3"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_fetched_page_status() {
        let page = FetchedPage::new("<p>x</p>".to_string(), Duration::from_millis(10)).with_status(404);
        assert_eq!(page.status, Some(404));
    }
}
