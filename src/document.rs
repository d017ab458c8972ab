//! Data types for stored documents, projections, and search hits.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A document held by the store, with the attributes the access policy and
/// result ordering operate on.
///
/// The embedding vector is used only for similarity scoring; backends that
/// do not return vectors with their hits leave it empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Genre tags attached to the document.
    pub genres: Vec<String>,
    /// Release date.
    pub released: NaiveDate,
    /// Category of the document (the store's `type` field, e.g. "movie").
    #[serde(rename = "type")]
    pub kind: String,
    /// Number of awards won, used as the sort tiebreaker.
    pub award_wins: u32,
    /// The vector embedding used for similarity scoring.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub embedding: Vec<f32>,
}

/// The display projection of a [`Document`].
///
/// Only `title`, `genres`, `released`, and `kind` survive projection; the
/// embedding and sort-only attributes are dropped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentSummary {
    /// Display title.
    pub title: String,
    /// Genre tags.
    pub genres: Vec<String>,
    /// Release date.
    pub released: NaiveDate,
    /// Category of the document.
    #[serde(rename = "type")]
    pub kind: String,
}

impl From<&Document> for DocumentSummary {
    fn from(document: &Document) -> Self {
        Self {
            title: document.title.clone(),
            genres: document.genres.clone(),
            released: document.released,
            kind: document.kind.clone(),
        }
    }
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] ({}, released {})",
            self.title,
            self.genres.join(", "),
            self.kind,
            self.released
        )
    }
}

/// A retrieved [`Document`] paired with a similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    /// The retrieved document.
    pub document: Document,
    /// The similarity score (higher is more relevant).
    pub score: f32,
}
