pub mod browser;
pub mod http;

use crate::error::AuditError;
use crate::results::FetchedPage;
use std::future::Future;
use url::Url;

pub use browser::BrowserFetcher;
pub use http::HttpFetcher;

/// Something that can retrieve a page's HTML for one URL.
///
/// The audit pipeline takes two of these, one for the server-delivered HTML
/// and one for the rendered DOM, so the extraction and scoring path can run
/// against canned documents without a network or a browser.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, AuditError>> + Send;
}
