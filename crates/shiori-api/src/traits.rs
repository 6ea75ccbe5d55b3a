//! Seam between the MangaDex client and the network.
//!
//! The client only needs "GET this URL and hand me the JSON", so the
//! transport is a trait. [`crate::HttpFetcher`] is the reqwest-backed
//! implementation; tests plug in canned responses.

use std::future::Future;

use crate::mangadex::MangaDexError;

/// Something that can GET a URL and decode the body as JSON.
pub trait JsonFetcher: Send + Sync {
    /// Fetch `url` and parse the response body as JSON.
    ///
    /// Implementations report every failure (transport, status, decoding)
    /// as an error and never retry.
    fn fetch_json(
        &self,
        url: &str,
    ) -> impl Future<Output = Result<serde_json::Value, MangaDexError>> + Send;
}
