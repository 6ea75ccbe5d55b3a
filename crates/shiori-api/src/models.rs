use std::fmt;

use serde::{Deserialize, Serialize};

/// A hit from a title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
}

/// A single manga looked up by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MangaSummary {
    pub id: String,
    pub title: String,
}

/// One chapter of a manga.
///
/// `number` is the upstream chapter label ("12", "12.5", "Extra", or empty
/// for oneshots); it is not guaranteed to parse as a number.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub title: String,
    pub number: String,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl fmt::Display for MangaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ch.{}", self.number)?;
        if !self.title.is_empty() {
            write!(f, " - {}", self.title)?;
        }
        Ok(())
    }
}

/// Popularity statistics for one manga, kept exactly as MangaDex sent them.
///
/// The accessors read the commonly used fields; anything else is available
/// through [`MangaStats::as_value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MangaStats(serde_json::Value);

impl MangaStats {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Mean user rating (`rating.average`).
    pub fn rating_average(&self) -> Option<f64> {
        self.0.pointer("/rating/average").and_then(|v| v.as_f64())
    }

    /// Bayesian-weighted rating (`rating.bayesian`).
    pub fn rating_bayesian(&self) -> Option<f64> {
        self.0.pointer("/rating/bayesian").and_then(|v| v.as_f64())
    }

    /// Number of users following the manga.
    pub fn follows(&self) -> Option<u64> {
        self.0.get("follows").and_then(|v| v.as_u64())
    }

    /// Reply count of the manga's forum thread (`comments.repliesCount`).
    pub fn comment_count(&self) -> Option<u64> {
        self.0
            .pointer("/comments/repliesCount")
            .and_then(|v| v.as_u64())
    }
}
