use serde::de::DeserializeOwned;

use super::error::MangaDexError;
use super::http::HttpFetcher;
use super::types::{
    AtHomeResponse, ChapterListResponse, MangaEntityResponse, MangaListResponse, PageQuality,
    StatisticsResponse,
};
use crate::config::MangaDexConfig;
use crate::models::{Chapter, MangaStats, MangaSummary, SearchResult};
use crate::traits::JsonFetcher;

/// Page size for title searches.
const SEARCH_LIMIT: u32 = 20;

/// Read-only MangaDex API client.
///
/// The `try_*` methods report failures as [`MangaDexError`]. The plain
/// methods log the failure and return an empty list or `None` instead, so
/// callers that only care about "something or nothing" never see an error.
pub struct MangaDexClient<F = HttpFetcher> {
    base_url: String,
    fetcher: F,
}

impl MangaDexClient<HttpFetcher> {
    /// Client for the public API with the default identity and timeouts.
    pub fn new() -> Result<Self, MangaDexError> {
        Self::from_config(&MangaDexConfig::default())
    }

    pub fn from_config(config: &MangaDexConfig) -> Result<Self, MangaDexError> {
        let fetcher = HttpFetcher::new(config)?;
        Ok(Self::with_fetcher(config.base_url.as_str(), fetcher))
    }
}

impl<F: JsonFetcher> MangaDexClient<F> {
    pub fn with_fetcher(base_url: impl Into<String>, fetcher: F) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, fetcher }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> Result<T, MangaDexError> {
        let value = self.fetcher.fetch_json(url).await?;
        serde_json::from_value(value).map_err(|e| MangaDexError::Parse(e.to_string()))
    }

    // ── Typed lookups ───────────────────────────────────────────

    /// Search manga by title. Results keep the upstream order; entries
    /// without an id or a usable title are skipped.
    pub async fn try_search_manga(&self, title: &str) -> Result<Vec<SearchResult>, MangaDexError> {
        let body: MangaListResponse = self.fetch(&search_url(&self.base_url, title)).await?;
        Ok(body.into_search_results())
    }

    /// Look up one manga. `Ok(None)` when the response has no id or no
    /// usable title.
    pub async fn try_get_manga(&self, manga_id: &str) -> Result<Option<MangaSummary>, MangaDexError> {
        let body: MangaEntityResponse = self.fetch(&manga_url(&self.base_url, manga_id)).await?;
        Ok(body.into_summary())
    }

    /// English chapters in ascending chapter order, one per upstream entry.
    pub async fn try_get_chapters(&self, manga_id: &str) -> Result<Vec<Chapter>, MangaDexError> {
        let body: ChapterListResponse = self.fetch(&chapters_url(&self.base_url, manga_id)).await?;
        Ok(body.into_chapters())
    }

    /// Image URLs for a chapter in reading order.
    pub async fn try_get_page_urls(
        &self,
        chapter_id: &str,
        quality: PageQuality,
    ) -> Result<Vec<String>, MangaDexError> {
        let body: AtHomeResponse = self.fetch(&at_home_url(&self.base_url, chapter_id)).await?;
        Ok(body.page_urls(quality))
    }

    /// Raw statistics object for a manga, as nested under its id.
    pub async fn try_get_manga_stats(
        &self,
        manga_id: &str,
    ) -> Result<Option<MangaStats>, MangaDexError> {
        let body: StatisticsResponse =
            self.fetch(&statistics_url(&self.base_url, manga_id)).await?;

        Ok(body
            .statistics
            .and_then(|mut stats| stats.remove(manga_id))
            .filter(|v| !v.is_null())
            .map(MangaStats::new))
    }

    // ── Lookups with empty fallbacks ────────────────────────────

    pub async fn search_manga(&self, title: &str) -> Vec<SearchResult> {
        or_empty("search_manga", self.try_search_manga(title).await)
    }

    pub async fn get_manga(&self, manga_id: &str) -> Option<MangaSummary> {
        or_empty("get_manga", self.try_get_manga(manga_id).await)
    }

    pub async fn get_chapters(&self, manga_id: &str) -> Vec<Chapter> {
        or_empty("get_chapters", self.try_get_chapters(manga_id).await)
    }

    pub async fn get_page_urls(&self, chapter_id: &str) -> Vec<String> {
        self.get_page_urls_with(chapter_id, PageQuality::Data).await
    }

    pub async fn get_page_urls_with(&self, chapter_id: &str, quality: PageQuality) -> Vec<String> {
        or_empty(
            "get_page_urls",
            self.try_get_page_urls(chapter_id, quality).await,
        )
    }

    pub async fn get_manga_stats(&self, manga_id: &str) -> Option<MangaStats> {
        or_empty("get_manga_stats", self.try_get_manga_stats(manga_id).await)
    }
}

fn or_empty<T: Default>(operation: &'static str, result: Result<T, MangaDexError>) -> T {
    result.unwrap_or_else(|e| {
        tracing::warn!(operation, error = %e, "MangaDex lookup failed");
        T::default()
    })
}

// ── Endpoints ───────────────────────────────────────────────────

/// Percent-encode an id for a path segment or query value.
fn encode(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

fn search_url(base: &str, title: &str) -> String {
    let title: String = url::form_urlencoded::byte_serialize(title.as_bytes()).collect();
    format!("{base}/manga?limit={SEARCH_LIMIT}&title={title}")
}

fn manga_url(base: &str, manga_id: &str) -> String {
    format!("{base}/manga/{}", encode(manga_id))
}

fn chapters_url(base: &str, manga_id: &str) -> String {
    format!(
        "{base}/chapter?manga={}&translatedLanguage[]=en&order[chapter]=asc",
        encode(manga_id)
    )
}

fn at_home_url(base: &str, chapter_id: &str) -> String {
    format!("{base}/at-home/server/{}", encode(chapter_id))
}

fn statistics_url(base: &str, manga_id: &str) -> String {
    format!("{base}/statistics/manga/{}", encode(manga_id))
}
