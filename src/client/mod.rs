//! Rust client for the listings API.
//!
//! [`ListingsClient`] talks HTTP; [`SearchSession`] keeps the state of a
//! search page with "show more" pagination; [`NewListingsWatcher`] polls a
//! query in the background and reports listings that appeared since the last
//! poll. The latter two only need a [`ListingSource`], so they can be driven
//! by something other than HTTP in tests.

use std::future::Future;

use thiserror::Error;

use crate::domain::listing::Listing;

pub mod http;
pub mod session;
pub mod watcher;

pub use http::ListingsClient;
pub use session::SearchSession;
pub use watcher::{NewListingsWatcher, PollOutcome, PollState, WatcherConfig};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Validation(String),

    #[error("server responded {status}: {message}")]
    Api { status: u16, message: String },
}

/// Anything that can answer an encoded listings query with one page.
pub trait ListingSource: Send + Sync {
    /// `query` is a query string as produced by
    /// [`crate::domain::filter::FilterState::encode`].
    fn fetch_page(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Listing>, ClientError>> + Send;
}
