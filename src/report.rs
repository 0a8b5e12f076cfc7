use crate::results::{HeadingLevel, PageSnapshot};
use crate::scoring::{AuditResult, MAX_SCORE};
use crate::utils::{LinkBreakdown, round_to_tenth, truncate_display};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt::Write;

const NOT_AVAILABLE: &str = "N/A";
const CELL_WIDTH: usize = 30;

/// Everything one scan produced
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub url: String,
    pub static_snapshot: PageSnapshot,
    pub rendered_snapshot: PageSnapshot,
    pub static_elapsed_secs: f64,
    pub rendered_elapsed_secs: f64,
    pub static_status: Option<u16>,
    pub rendered_links: LinkBreakdown,
    pub result: AuditResult,
}

impl AuditReport {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Plain-text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        let s = &self.static_snapshot;
        let r = &self.rendered_snapshot;
        let deltas = &self.result.deltas;

        writeln!(out, "Audit of {}", self.url)?;
        writeln!(
            out,
            "Health score: {}/{}",
            self.result.health_score, MAX_SCORE
        )?;
        for deduction in &self.result.deductions {
            writeln!(out, "  -{:<3} {}", deduction.points(), deduction.reason())?;
        }
        writeln!(
            out,
            "JS dependency: {:.1}%",
            self.result.js_reliance_percent
        )?;

        section(out, "Static vs rendered")?;
        row(out, "Metric", "Static (Server)", "Rendered (JS)", "Delta")?;
        row(
            out,
            "Word Count",
            &s.word_count.to_string(),
            &r.word_count.to_string(),
            &deltas.word_count.to_string(),
        )?;
        row(
            out,
            "Total Links",
            &s.links.len().to_string(),
            &r.links.len().to_string(),
            &deltas.link_count.to_string(),
        )?;
        row(
            out,
            "H1 Tag",
            &first_h1(s),
            &first_h1(r),
            match_label(s.headings.h1.first() == r.headings.h1.first()),
        )?;
        row(
            out,
            "Canonical URL",
            &or_na(s.canonical.as_deref()),
            &or_na(r.canonical.as_deref()),
            match_label(s.canonical == r.canonical),
        )?;
        row(
            out,
            "Schema Objects",
            &s.schema_count().to_string(),
            &r.schema_count().to_string(),
            &deltas.schema_count.to_string(),
        )?;
        row(
            out,
            "HTML Size (KB)",
            &format!("{:.1}", round_to_tenth(s.html_size_kb)),
            &format!("{:.1}", round_to_tenth(r.html_size_kb)),
            &format!("{:.1}", deltas.html_size_kb),
        )?;
        row(
            out,
            "Images Found",
            &s.image_stats.total.to_string(),
            &r.image_stats.total.to_string(),
            &deltas.image_count.to_string(),
        )?;
        row(
            out,
            "Scripts Detected",
            &s.script_count.to_string(),
            &r.script_count.to_string(),
            &deltas.script_count.to_string(),
        )?;

        section(out, "Content integrity")?;
        for level in HeadingLevel::ALL {
            let headings = r.headings.get(level);
            writeln!(out, "{}: {} found", level, headings.len())?;
            for heading in headings {
                writeln!(out, "    {}", heading)?;
            }
        }

        section(out, "Technical SEO")?;
        writeln!(out, "TTFB (static): {:.2}s", self.static_elapsed_secs)?;
        if let Some(status) = self.static_status {
            writeln!(out, "HTTP status (static): {}", status)?;
        }
        writeln!(out, "Full render time: {:.2}s", self.rendered_elapsed_secs)?;
        writeln!(
            out,
            "Images missing alt: {} of {}",
            r.image_stats.missing_alt, r.image_stats.total
        )?;
        if r.robots_declared() {
            writeln!(out, "Robots tag: {}", r.robots_directive())?;
        } else {
            writeln!(
                out,
                "Robots tag: not declared (implies {})",
                r.robots_directive()
            )?;
        }
        if r.hreflang_values.is_empty() {
            writeln!(out, "Hreflang: none detected")?;
        } else {
            writeln!(out, "Hreflang: {}", r.hreflang_values.join(", "))?;
        }
        writeln!(
            out,
            "Links: {} internal, {} external, {} other",
            self.rendered_links.internal, self.rendered_links.external, self.rendered_links.other
        )?;

        section(out, "Social graph & metadata")?;
        writeln!(out, "Title: {}", or_na(r.title.as_deref()))?;
        writeln!(out, "OpenGraph title: {}", or_na(r.open_graph_title.as_deref()))?;
        writeln!(out, "Meta description: {}", or_na(r.description.as_deref()))?;
        writeln!(out, "Canonical URL: {}", or_na(r.canonical.as_deref()))?;

        section(out, "Structured data (JSON-LD)")?;
        if r.structured_data_types.is_empty() {
            writeln!(out, "No JSON-LD detected")?;
        } else {
            let types: BTreeSet<&str> = r
                .structured_data_types
                .iter()
                .map(|t| t.as_deref().unwrap_or("(untyped)"))
                .collect();
            writeln!(out, "Detected {} schema objects", r.schema_count())?;
            writeln!(
                out,
                "Types: {}",
                types.into_iter().collect::<Vec<_>>().join(", ")
            )?;
        }

        section(out, "Advisories")?;
        if self.result.advisories.is_empty() {
            writeln!(out, "None")?;
        }
        for advisory in &self.result.advisories {
            writeln!(out, "- {}", advisory)?;
        }
        Ok(())
    }
}

fn section(out: &mut String, title: &str) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "== {} ==", title)
}

fn row(out: &mut String, metric: &str, stat: &str, rendered: &str, delta: &str) -> std::fmt::Result {
    writeln!(
        out,
        "{:<18} {:<33} {:<33} {}",
        metric,
        truncate_display(stat, CELL_WIDTH),
        truncate_display(rendered, CELL_WIDTH),
        delta
    )
}

fn or_na(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn first_h1(page: &PageSnapshot) -> String {
    page.headings
        .h1
        .first()
        .cloned()
        .unwrap_or_else(|| "Missing".to_string())
}

fn match_label(same: bool) -> &'static str {
    if same { "Match" } else { "Differs" }
}
