pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::MangaDexClient;
pub use error::MangaDexError;
pub use http::HttpFetcher;
pub use types::PageQuality;
