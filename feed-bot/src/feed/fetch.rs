//! Feed client: fetches a feed URL and parses it into entries.
//!
//! Failures here are per-feed and transient; the refresher logs them and moves
//! on to the next subscription.

use std::io::Cursor;
use std::time::Duration;

use feed_rs::parser;
use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One feed item: title plus the link that identifies it in the dedup ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
}

/// Errors from fetching or parsing one feed.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP status {0}")]
    Status(u16),
    #[error("Malformed feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// HTTP client for feed documents. The request timeout bounds every fetch so
/// a stalled feed fails on its own instead of stalling the whole pass.
#[derive(Clone)]
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches and parses one feed, in the document's natural entry order.
    pub async fn fetch(&self, url: &str) -> Result<Vec<FeedEntry>, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = response.bytes().await?;
        parse_entries(&bytes)
    }
}

/// Parses a feed document into entries, dropping items with no usable link.
pub fn parse_entries(bytes: &[u8]) -> Result<Vec<FeedEntry>, FetchError> {
    let feed = parser::parse(Cursor::new(bytes))?;
    Ok(feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let link = select_entry_link(&entry)?;
            let title = entry
                .title
                .map(|t| t.content)
                .unwrap_or_else(|| "No Title".to_string());
            Some(FeedEntry { title, link })
        })
        .collect())
}

/// Picks the entry link: alternate/unqualified rel first, then any non-empty
/// link, then the entry id when it is itself a URL.
fn select_entry_link(entry: &feed_rs::model::Entry) -> Option<String> {
    for link in &entry.links {
        let href = link.href.trim();
        if href.is_empty() {
            continue;
        }
        let rel = link.rel.as_deref().unwrap_or("");
        if rel.is_empty() || rel.eq_ignore_ascii_case("alternate") {
            return Some(href.to_string());
        }
    }
    if let Some(link) = entry.links.iter().find(|l| !l.href.trim().is_empty()) {
        return Some(link.href.clone());
    }
    let id = entry.id.trim();
    if id.starts_with("http://") || id.starts_with("https://") {
        return Some(id.to_string());
    }
    None
}
