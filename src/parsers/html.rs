use crate::parsers::schema;
use crate::results::{HeadingLevel, Headings, ImageStats, PageSnapshot};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Elements whose text never reaches the reader
const NON_VISIBLE_ELEMENTS: [&str; 3] = ["script", "style", "template"];

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse - this is a bug")
}

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[name="description"]"#));
static META_ROBOTS: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[name="robots"]"#));
static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static CANONICAL: LazyLock<Selector> = LazyLock::new(|| selector(r#"link[rel~="canonical"]"#));
static HREFLANG: LazyLock<Selector> = LazyLock::new(|| selector("link[hreflang]"));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| selector("a[href]"));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static EXTERNAL_SCRIPT: LazyLock<Selector> = LazyLock::new(|| selector("script[src]"));
static JSON_LD: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"script[type="application/ld+json"]"#));
static HEADINGS: LazyLock<[(HeadingLevel, Selector); 3]> = LazyLock::new(|| {
    HeadingLevel::ALL.map(|level| (level, selector(level.tag())))
});

/// Parses an HTML document into a snapshot of its SEO-relevant fields.
///
/// Returns `None` only for an empty document; malformed markup is recovered
/// by the parser and extracted best-effort.
pub fn extract(html: &str) -> Option<PageSnapshot> {
    if html.is_empty() {
        return None;
    }

    let doc = Html::parse_document(html);
    if !doc.errors.is_empty() {
        ::log::trace!("HTML parser recovered from {} errors", doc.errors.len());
    }

    let raw_text = visible_text(&doc);
    let word_count = raw_text.split_whitespace().count();

    let snapshot = PageSnapshot {
        title: first_text(&doc, &TITLE),
        description: first_attr(&doc, &META_DESCRIPTION, "content"),
        canonical: first_attr(&doc, &CANONICAL, "href"),
        robots: first_attr(&doc, &META_ROBOTS, "content"),
        open_graph_title: first_attr(&doc, &OG_TITLE, "content"),
        hreflang_values: all_attrs(&doc, &HREFLANG, "hreflang"),
        headings: headings(&doc),
        links: all_attrs(&doc, &ANCHOR, "href"),
        image_stats: image_stats(&doc),
        script_count: doc.select(&EXTERNAL_SCRIPT).count(),
        structured_data_types: structured_data_types(&doc),
        word_count,
        html_size_kb: html.len() as f64 / 1024.0,
        raw_text,
    };

    ::log::debug!(
        "Extracted snapshot: {} words, {} links, {} images, {} schema blocks",
        snapshot.word_count,
        snapshot.links.len(),
        snapshot.image_stats.total,
        snapshot.structured_data_types.len()
    );

    Some(snapshot)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

/// Attribute of the first matching element; absent if either is missing
fn first_attr(doc: &Html, selector: &Selector, attr: &str) -> Option<String> {
    doc.select(selector)
        .next()
        .and_then(|e| e.value().attr(attr))
        .map(|s| s.to_string())
}

fn all_attrs(doc: &Html, selector: &Selector, attr: &str) -> Vec<String> {
    doc.select(selector)
        .filter_map(|e| e.value().attr(attr))
        .map(|s| s.to_string())
        .collect()
}

fn headings(doc: &Html) -> Headings {
    let mut headings = Headings::default();
    for (level, selector) in HEADINGS.iter() {
        *headings.get_mut(*level) = doc.select(selector).map(element_text).collect();
    }
    headings
}

fn image_stats(doc: &Html) -> ImageStats {
    let mut stats = ImageStats::default();
    for img in doc.select(&IMAGE) {
        stats.total += 1;
        if img.value().attr("alt").is_none() {
            stats.missing_alt += 1;
        }
    }
    stats
}

fn structured_data_types(doc: &Html) -> Vec<Option<String>> {
    doc.select(&JSON_LD)
        .filter_map(|block| schema::block_type(&block.text().collect::<String>()))
        .collect()
}

/// All document text in order, minus script, style and template contents
fn visible_text(doc: &Html) -> String {
    let mut text = String::new();
    for node in doc.tree.root().descendants() {
        let Node::Text(fragment) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => NON_VISIBLE_ELEMENTS.contains(&element.name()),
            _ => false,
        });
        if !hidden {
            text.push_str(fragment);
        }
    }
    text
}
