//! Extraction of SEO-relevant fields from HTML documents.

pub mod html;
pub mod schema;


pub use html::extract;
