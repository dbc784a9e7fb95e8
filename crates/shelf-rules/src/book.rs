//! Book records as supplied by the host library.
//!
//! The engine never owns or mutates these; it reads them through the
//! extractor in [`crate::extract`] and the facet dimensions in
//! [`crate::facet`]. Everything is optional because exports from older
//! servers routinely omit whole sub-objects.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// A single book record.
///
/// Attributes the model does not name are kept in [`Book::extra`] so that
/// rules over custom fields keep working without code changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Book {
    pub id: u64,
    /// Format tag, e.g. `EPUB`, `PDF`, `CBX`.
    pub book_type: Option<String>,
    pub library_id: Option<u64>,
    pub library_name: Option<String>,
    pub metadata: Option<BookMetadata>,
    #[serde(deserialize_with = "null_as_default")]
    pub shelves: Vec<ShelfRef>,
    pub read_status: Option<ReadStatus>,
    pub date_finished: Option<String>,
    pub last_read_time: Option<String>,
    pub added_on: Option<String>,
    pub file_size_kb: Option<f64>,
    pub personal_rating: Option<f64>,
    pub metadata_match_score: Option<f64>,
    pub epub_progress: Option<Progress>,
    pub pdf_progress: Option<Progress>,
    pub cbx_progress: Option<Progress>,
    pub audiobook_progress: Option<Progress>,
    pub koreader_progress: Option<Progress>,
    pub kobo_progress: Option<Progress>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Descriptive metadata. May be missing entirely on freshly imported files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookMetadata {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub asin: Option<String>,
    pub page_count: Option<f64>,
    pub series_name: Option<String>,
    pub series_number: Option<f64>,
    pub series_total: Option<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub authors: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub moods: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub amazon_rating: Option<f64>,
    pub amazon_review_count: Option<f64>,
    pub goodreads_rating: Option<f64>,
    pub goodreads_review_count: Option<f64>,
    pub hardcover_rating: Option<f64>,
    pub hardcover_review_count: Option<f64>,
}

/// Membership of a book in a user shelf.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfRef {
    pub id: u64,
    pub name: Option<String>,
}

/// Reading progress for one format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Progress {
    pub percentage: Option<f64>,
}

/// Reading state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadStatus {
    Unread,
    Reading,
    ReReading,
    Read,
    PartiallyRead,
    Paused,
    WontRead,
    Abandoned,
    Unset,
    #[serde(other)]
    Unknown,
}

impl ReadStatus {
    /// All statuses in display order.
    pub const ALL: [ReadStatus; 10] = [
        ReadStatus::Unread,
        ReadStatus::Reading,
        ReadStatus::ReReading,
        ReadStatus::Read,
        ReadStatus::PartiallyRead,
        ReadStatus::Paused,
        ReadStatus::WontRead,
        ReadStatus::Abandoned,
        ReadStatus::Unset,
        ReadStatus::Unknown,
    ];

    /// Returns the wire name of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            ReadStatus::Unread => "UNREAD",
            ReadStatus::Reading => "READING",
            ReadStatus::ReReading => "RE_READING",
            ReadStatus::Read => "READ",
            ReadStatus::PartiallyRead => "PARTIALLY_READ",
            ReadStatus::Paused => "PAUSED",
            ReadStatus::WontRead => "WONT_READ",
            ReadStatus::Abandoned => "ABANDONED",
            ReadStatus::Unset => "UNSET",
            ReadStatus::Unknown => "UNKNOWN",
        }
    }

    /// Returns `true` for statuses that count as "currently being read".
    pub fn is_in_progress(self) -> bool {
        matches!(self, ReadStatus::Reading | ReadStatus::ReReading)
    }

    /// Returns `true` once the reader has started the book in any way.
    pub fn is_started(self) -> bool {
        matches!(
            self,
            ReadStatus::Read
                | ReadStatus::Reading
                | ReadStatus::ReReading
                | ReadStatus::PartiallyRead
        )
    }
}

impl std::fmt::Display for ReadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Book {
    /// Creates an empty book with the given id.
    pub fn new(id: u64) -> Self {
        Book {
            id,
            ..Book::default()
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata.as_ref()?.title.as_deref()
    }

    /// Series name, if the book belongs to one. Blank names count as none.
    pub fn series_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()?
            .series_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }

    pub fn series_number(&self) -> Option<f64> {
        self.metadata.as_ref()?.series_number.filter(|n| n.is_finite())
    }

    pub fn series_total(&self) -> Option<f64> {
        self.metadata.as_ref()?.series_total.filter(|n| n.is_finite())
    }

    /// Read status, with a missing status reported as [`ReadStatus::Unset`].
    pub fn status(&self) -> ReadStatus {
        self.read_status.unwrap_or(ReadStatus::Unset)
    }

    /// Iterates over the progress objects that are present.
    pub fn progress_entries(&self) -> impl Iterator<Item = &Progress> {
        [
            &self.epub_progress,
            &self.pdf_progress,
            &self.cbx_progress,
            &self.audiobook_progress,
            &self.koreader_progress,
            &self.kobo_progress,
        ]
        .into_iter()
        .flatten()
    }

    /// Highest percentage across all formats, `0.0` when nothing was read.
    pub fn effective_progress(&self) -> f64 {
        self.progress_entries()
            .filter_map(|p| p.percentage)
            .filter(|p| p.is_finite())
            .fold(0.0, f64::max)
    }

    /// Returns `true` if the book sits on at least one shelf.
    pub fn is_shelved(&self) -> bool {
        !self.shelves.is_empty()
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
