//! Feed layer: HTTP fetch and RSS/Atom parsing.

mod fetch;

pub use fetch::{FeedClient, FeedEntry, FetchError};
