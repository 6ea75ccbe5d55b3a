use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::{Chapter, MangaSummary, SearchResult};

// ── Manga responses ─────────────────────────────────────────────

/// List bodies keep each item as raw JSON so one odd item cannot sink
/// the rest of the page.
#[derive(Debug, Deserialize)]
pub struct MangaListResponse {
    pub data: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct MangaEntityResponse {
    pub data: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct MangaResource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub attributes: Option<MangaAttributes>,
}

#[derive(Debug, Deserialize)]
pub struct MangaAttributes {
    #[serde(default, deserialize_with = "lenient_title_map")]
    pub title: BTreeMap<String, String>,
}

// ── Chapter responses ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChapterListResponse {
    pub data: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterResource {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    pub attributes: Option<ChapterAttributes>,
}

#[derive(Debug, Deserialize)]
pub struct ChapterAttributes {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chapter: Option<String>,
}

// ── Lenient field decoding ──────────────────────────────────────

/// Strings pass through and numbers are rendered as text. Anything else
/// reads as absent.
fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// A language → title object. Non-string entries are skipped, and the
/// `[]` MangaDex sends for an empty map reads as empty.
fn lenient_title_map<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<BTreeMap<String, String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(map) => map
            .into_iter()
            .filter_map(|(lang, title)| match title {
                Value::String(t) => Some((lang, t)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

// ── At-home server response ─────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeResponse {
    pub base_url: Option<String>,
    pub chapter: Option<AtHomeChapter>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtHomeChapter {
    pub hash: Option<String>,
    pub data: Option<Vec<String>>,
    pub data_saver: Option<Vec<String>>,
}

// ── Statistics response ─────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatisticsResponse {
    pub statistics: Option<serde_json::Map<String, serde_json::Value>>,
}

// ── Page quality ────────────────────────────────────────────────

/// Which image set of a chapter to serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageQuality {
    /// Original uploads.
    #[default]
    Data,
    /// Recompressed, smaller images.
    DataSaver,
}

impl PageQuality {
    /// Path component used by the at-home image servers.
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::DataSaver => "data-saver",
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────

/// Pick a display title from a language → title map.
///
/// English wins when it is non-empty. Otherwise the first non-empty title
/// in language-code order is used, so the choice is stable across runs.
pub fn resolve_title(titles: &BTreeMap<String, String>) -> Option<String> {
    titles
        .get("en")
        .filter(|t| !t.is_empty())
        .or_else(|| titles.values().find(|t| !t.is_empty()))
        .cloned()
}

impl MangaListResponse {
    /// Usable search hits in upstream order; unusable items are skipped.
    pub fn into_search_results(self) -> Vec<SearchResult> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .filter_map(MangaResource::from_value)
            .filter_map(MangaResource::into_search_result)
            .collect()
    }
}

impl MangaEntityResponse {
    pub fn into_summary(self) -> Option<MangaSummary> {
        self.data
            .and_then(MangaResource::from_value)
            .and_then(MangaResource::into_summary)
    }
}

impl MangaResource {
    pub fn from_value(value: Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// The `(id, title)` pair, if both are present and non-empty.
    fn id_and_title(self) -> Option<(String, String)> {
        let id = self.id.filter(|id| !id.is_empty())?;
        let title = resolve_title(&self.attributes?.title)?;
        Some((id, title))
    }

    pub fn into_search_result(self) -> Option<SearchResult> {
        self.id_and_title()
            .map(|(id, title)| SearchResult { id, title })
    }

    pub fn into_summary(self) -> Option<MangaSummary> {
        self.id_and_title()
            .map(|(id, title)| MangaSummary { id, title })
    }
}

impl ChapterListResponse {
    /// One chapter per upstream item, whatever shape the item has.
    pub fn into_chapters(self) -> Vec<Chapter> {
        self.data
            .unwrap_or_default()
            .into_iter()
            .map(|item| ChapterResource::from_value(item).into_chapter())
            .collect()
    }
}

impl ChapterResource {
    /// Decode one item. If its attributes are unreadable, the id is still
    /// kept when there is one.
    pub fn from_value(value: Value) -> Self {
        let id = value.get("id").and_then(|id| id.as_str()).map(str::to_string);
        serde_json::from_value(value).unwrap_or(Self {
            id,
            attributes: None,
        })
    }

    pub fn into_chapter(self) -> Chapter {
        let (title, number) = match self.attributes {
            Some(attrs) => (
                attrs.title.unwrap_or_default(),
                attrs.chapter.unwrap_or_default(),
            ),
            None => (String::new(), String::new()),
        };

        Chapter {
            id: self.id.unwrap_or_default(),
            title,
            number,
        }
    }
}

impl AtHomeResponse {
    /// Build full image URLs for one quality level.
    ///
    /// Returns an empty list unless both the server base URL and the
    /// chapter hash are known. File order is reading order and is kept.
    pub fn page_urls(self, quality: PageQuality) -> Vec<String> {
        let base_url = match self.base_url.filter(|b| !b.is_empty()) {
            Some(b) => b,
            None => return Vec::new(),
        };
        let chapter = match self.chapter {
            Some(c) => c,
            None => return Vec::new(),
        };
        let hash = match chapter.hash.filter(|h| !h.is_empty()) {
            Some(h) => h,
            None => return Vec::new(),
        };

        let files = match quality {
            PageQuality::Data => chapter.data,
            PageQuality::DataSaver => chapter.data_saver,
        };
        let segment = quality.path_segment();

        files
            .unwrap_or_default()
            .into_iter()
            .map(|file| format!("{base_url}/{segment}/{hash}/{file}"))
            .collect()
    }
}
