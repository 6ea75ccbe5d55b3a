//! Read-only client for the MangaDex catalog API.
//!
//! [`MangaDexClient`] exposes five lookups (search, manga detail, chapter
//! list, page URLs, statistics). Each one comes in two flavours: a `try_*`
//! method returning [`MangaDexError`], and a plain method that logs the
//! failure and falls back to an empty list or `None`.

pub mod config;
pub mod mangadex;
pub mod models;
pub mod traits;

pub use config::{Config, ConfigError, MangaDexConfig};
pub use mangadex::{HttpFetcher, MangaDexClient, MangaDexError, PageQuality};
pub use models::{Chapter, MangaStats, MangaSummary, SearchResult};
pub use traits::JsonFetcher;
