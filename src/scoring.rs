//! Static-vs-rendered comparison and SEO health scoring.

use crate::results::PageSnapshot;
use crate::utils::round_to_tenth;
use serde::Serialize;

pub const MAX_SCORE: u8 = 100;

/// Reliance ratio above which the score is penalised
pub const JS_RELIANCE_PENALTY_RATIO: f64 = 0.30;
/// Reliance percent above which server-side rendering is recommended
pub const JS_RELIANCE_ADVISORY_PERCENT: f64 = 25.0;
/// Images without alt text tolerated before the score is penalised
pub const MISSING_ALT_TOLERANCE: usize = 5;

/// A penalty subtracted from the health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Deduction {
    MissingCanonical,
    MissingH1,
    ExcessMissingAlt,
    HighJsReliance,
}

impl Deduction {
    pub fn points(self) -> u8 {
        match self {
            Deduction::MissingCanonical => 15,
            Deduction::MissingH1 => 15,
            Deduction::ExcessMissingAlt => 10,
            Deduction::HighJsReliance => 20,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Deduction::MissingCanonical => "rendered page has no canonical link",
            Deduction::MissingH1 => "rendered page has no H1",
            Deduction::ExcessMissingAlt => "more than 5 images lack alt text",
            Deduction::HighJsReliance => "over 30% of the content depends on JavaScript",
        }
    }
}

/// Textual recommendation derived from the rendered snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Reliance percent above the advisory threshold
    ServerSideRendering { reliance_percent: f64 },
    /// Some images lack alt text
    MissingAltText { count: usize },
    /// Anything other than exactly one H1
    HeadingStructure { h1_count: usize },
    MissingCanonical,
}

impl std::fmt::Display for Advisory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Advisory::ServerSideRendering { reliance_percent } => write!(
                f,
                "High JS reliance ({:.1}%). Serve this content with server-side rendering.",
                reliance_percent
            ),
            Advisory::MissingAltText { count } => write!(
                f,
                "Add alt text to {} image(s) to improve accessibility and image rankings.",
                count
            ),
            Advisory::HeadingStructure { h1_count } => write!(
                f,
                "Heading structure should contain exactly one H1 tag (found {}).",
                h1_count
            ),
            Advisory::MissingCanonical => {
                write!(f, "Declare a canonical URL with <link rel=\"canonical\">.")
            }
        }
    }
}

/// Rendered minus static, per metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricDeltas {
    pub word_count: i64,
    pub link_count: i64,
    pub schema_count: i64,
    pub html_size_kb: f64,
    pub image_count: i64,
    pub script_count: i64,
}

impl MetricDeltas {
    pub fn between(static_page: &PageSnapshot, rendered: &PageSnapshot) -> Self {
        Self {
            word_count: signed_delta(static_page.word_count, rendered.word_count),
            link_count: signed_delta(static_page.links.len(), rendered.links.len()),
            schema_count: signed_delta(static_page.schema_count(), rendered.schema_count()),
            html_size_kb: round_to_tenth(rendered.html_size_kb - static_page.html_size_kb),
            image_count: signed_delta(static_page.image_stats.total, rendered.image_stats.total),
            script_count: signed_delta(static_page.script_count, rendered.script_count),
        }
    }
}

fn signed_delta(from: usize, to: usize) -> i64 {
    to as i64 - from as i64
}

/// Outcome of comparing a static snapshot with its rendered counterpart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditResult {
    /// 0..=100
    pub health_score: u8,

    /// Signed percentage of rendered words absent from the static HTML
    pub js_reliance_percent: f64,

    /// Unsigned ratio used for scoring
    pub js_reliance_ratio: f64,

    pub deltas: MetricDeltas,
    pub deductions: Vec<Deduction>,
    pub advisories: Vec<Advisory>,
}

/// `|rendered - static| / rendered`, or 0 when the rendered page has no words.
pub fn js_reliance_ratio(static_words: usize, rendered_words: usize) -> f64 {
    if rendered_words == 0 {
        return 0.0;
    }
    static_words.abs_diff(rendered_words) as f64 / rendered_words as f64
}

/// `(rendered - static) / rendered * 100` to one decimal, or 0 when the
/// rendered page has no words. Negative when rendering removed content.
pub fn js_reliance_percent(static_words: usize, rendered_words: usize) -> f64 {
    if rendered_words == 0 {
        return 0.0;
    }
    let gained = signed_delta(static_words, rendered_words) as f64;
    round_to_tenth(gained / rendered_words as f64 * 100.0)
}

/// Scores the rendered page and compares it to the static one.
pub fn score(static_page: &PageSnapshot, rendered: &PageSnapshot) -> AuditResult {
    let ratio = js_reliance_ratio(static_page.word_count, rendered.word_count);
    let percent = js_reliance_percent(static_page.word_count, rendered.word_count);

    let mut deductions = Vec::new();
    if rendered.canonical.is_none() {
        deductions.push(Deduction::MissingCanonical);
    }
    if rendered.headings.h1.is_empty() {
        deductions.push(Deduction::MissingH1);
    }
    if rendered.image_stats.missing_alt > MISSING_ALT_TOLERANCE {
        deductions.push(Deduction::ExcessMissingAlt);
    }
    if ratio > JS_RELIANCE_PENALTY_RATIO {
        deductions.push(Deduction::HighJsReliance);
    }

    let health_score = deductions.iter().fold(MAX_SCORE, |score, deduction| {
        ::log::debug!("-{} {}", deduction.points(), deduction.reason());
        score.saturating_sub(deduction.points())
    });

    let result = AuditResult {
        health_score,
        js_reliance_percent: percent,
        js_reliance_ratio: ratio,
        deltas: MetricDeltas::between(static_page, rendered),
        deductions,
        advisories: advisories(rendered, percent),
    };

    ::log::info!(
        "Health score {}/{} with {:.1}% JS reliance",
        result.health_score,
        MAX_SCORE,
        result.js_reliance_percent
    );
    result
}

fn advisories(rendered: &PageSnapshot, reliance_percent: f64) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if reliance_percent > JS_RELIANCE_ADVISORY_PERCENT {
        advisories.push(Advisory::ServerSideRendering { reliance_percent });
    }
    if rendered.image_stats.missing_alt > 0 {
        advisories.push(Advisory::MissingAltText {
            count: rendered.image_stats.missing_alt,
        });
    }
    if rendered.h1_count() != 1 {
        advisories.push(Advisory::HeadingStructure {
            h1_count: rendered.h1_count(),
        });
    }
    if rendered.canonical.is_none() {
        advisories.push(Advisory::MissingCanonical);
    }
    advisories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Headings, ImageStats};

    fn page(words: usize) -> PageSnapshot {
        PageSnapshot {
            title: Some("Title".to_string()),
            description: None,
            canonical: Some("https://example.com/".to_string()),
            robots: None,
            open_graph_title: None,
            hreflang_values: Vec::new(),
            headings: Headings {
                h1: vec!["Heading".to_string()],
                ..Headings::default()
            },
            links: Vec::new(),
            image_stats: ImageStats::default(),
            script_count: 0,
            structured_data_types: Vec::new(),
            word_count: words,
            html_size_kb: 1.0,
            raw_text: String::new(),
        }
    }

    #[test]
    fn test_identical_snapshots_have_no_reliance_penalty() {
        let snapshot = page(800);
        let result = score(&snapshot, &snapshot);
        assert_eq!(result.js_reliance_ratio, 0.0);
        assert_eq!(result.js_reliance_percent, 0.0);
        assert_eq!(result.health_score, 100);
        assert!(result.deductions.is_empty());
        assert!(result.advisories.is_empty());
    }

    #[test]
    fn test_moderate_reliance_is_not_penalised() {
        let result = score(&page(1000), &page(1300));
        assert!((result.js_reliance_ratio - 300.0 / 1300.0).abs() < 1e-9);
        assert_eq!(result.js_reliance_percent, 23.1);
        assert!(!result.deductions.contains(&Deduction::HighJsReliance));
        assert_eq!(result.health_score, 100);
        assert!(result.advisories.is_empty());
    }

    #[test]
    fn test_high_reliance_is_penalised() {
        let result = score(&page(500), &page(1000));
        assert_eq!(result.js_reliance_ratio, 0.5);
        assert_eq!(result.js_reliance_percent, 50.0);
        assert_eq!(result.health_score, 80);
        assert_eq!(
            result.advisories,
            vec![Advisory::ServerSideRendering {
                reliance_percent: 50.0
            }]
        );
    }

    #[test]
    fn test_zero_rendered_words_avoids_division() {
        assert_eq!(js_reliance_ratio(300, 0), 0.0);
        assert_eq!(js_reliance_percent(300, 0), 0.0);
        let result = score(&page(300), &page(0));
        assert_eq!(result.js_reliance_percent, 0.0);
        assert_eq!(result.deltas.word_count, -300);
    }

    #[test]
    fn test_shrinking_content_is_signed_percent_but_absolute_ratio() {
        // 1000 static words, 500 rendered: ratio is |500 - 1000| / 500
        let result = score(&page(1000), &page(500));
        assert_eq!(result.js_reliance_ratio, 1.0);
        assert_eq!(result.js_reliance_percent, -100.0);
        assert!(result.deductions.contains(&Deduction::HighJsReliance));
        assert!(
            !result
                .advisories
                .iter()
                .any(|a| matches!(a, Advisory::ServerSideRendering { .. }))
        );
    }

    #[test]
    fn test_missing_h1_scores_85() {
        let mut rendered = page(100);
        rendered.headings.h1.clear();
        rendered.image_stats = ImageStats {
            total: 8,
            missing_alt: 5,
        };
        let result = score(&page(100), &rendered);
        assert_eq!(result.health_score, 85);
        assert_eq!(result.deductions, vec![Deduction::MissingH1]);
        assert!(
            result
                .advisories
                .contains(&Advisory::HeadingStructure { h1_count: 0 })
        );
        assert!(
            result
                .advisories
                .contains(&Advisory::MissingAltText { count: 5 })
        );
    }

    #[test]
    fn test_every_deduction_applies_independently() {
        let mut rendered = page(1000);
        rendered.canonical = None;
        rendered.headings.h1.clear();
        rendered.image_stats = ImageStats {
            total: 6,
            missing_alt: 6,
        };
        let result = score(&page(100), &rendered);
        assert_eq!(result.deductions.len(), 4);
        assert_eq!(result.health_score, 100 - 15 - 15 - 10 - 20);
        assert!(result.advisories.contains(&Advisory::MissingCanonical));
    }

    #[test]
    fn test_duplicate_h1_warns_without_deduction() {
        let mut rendered = page(10);
        rendered.headings.h1.push("Another".to_string());
        let result = score(&page(10), &rendered);
        assert_eq!(result.health_score, 100);
        assert_eq!(
            result.advisories,
            vec![Advisory::HeadingStructure { h1_count: 2 }]
        );
    }

    #[test]
    fn test_deltas_are_rendered_minus_static() {
        let mut static_page = page(10);
        static_page.links = vec!["/a".to_string()];
        static_page.html_size_kb = 10.0;
        static_page.script_count = 4;
        let mut rendered = page(25);
        rendered.links = vec!["/a".to_string(), "/b".to_string(), "/c".to_string()];
        rendered.structured_data_types = vec![Some("Product".to_string())];
        rendered.html_size_kb = 42.26;
        rendered.image_stats.total = 3;
        rendered.script_count = 1;

        let deltas = MetricDeltas::between(&static_page, &rendered);
        assert_eq!(deltas.word_count, 15);
        assert_eq!(deltas.link_count, 2);
        assert_eq!(deltas.schema_count, 1);
        assert_eq!(deltas.html_size_kb, 32.3);
        assert_eq!(deltas.image_count, 3);
        assert_eq!(deltas.script_count, -3);
    }
}
