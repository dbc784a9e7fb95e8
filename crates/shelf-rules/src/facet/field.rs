//! Facet dimensions and their per-book values.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::book::{Book, ReadStatus};
use crate::error::RulesError;
use crate::extract::shelf_status;
use crate::value::parse_date;

use super::ranges::{self, NumericRange};

/// A sidebar dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FacetField {
    Author,
    Category,
    Series,
    Publisher,
    Tag,
    Mood,
    Language,
    Library,
    Shelf,
    ShelfStatus,
    ReadStatus,
    BookType,
    PublishedYear,
    PersonalRating,
    AmazonRating,
    GoodreadsRating,
    HardcoverRating,
    FileSize,
    PageCount,
    MatchScore,
}

impl FacetField {
    pub const ALL: [FacetField; 20] = [
        FacetField::Author,
        FacetField::Category,
        FacetField::Series,
        FacetField::Publisher,
        FacetField::Tag,
        FacetField::Mood,
        FacetField::Language,
        FacetField::Library,
        FacetField::Shelf,
        FacetField::ShelfStatus,
        FacetField::ReadStatus,
        FacetField::BookType,
        FacetField::PublishedYear,
        FacetField::PersonalRating,
        FacetField::AmazonRating,
        FacetField::GoodreadsRating,
        FacetField::HardcoverRating,
        FacetField::FileSize,
        FacetField::PageCount,
        FacetField::MatchScore,
    ];

    /// Parses a dimension key. Keys are matched without regard to case.
    pub fn parse(key: &str) -> Option<FacetField> {
        let key = key.trim();
        FacetField::ALL
            .into_iter()
            .find(|field| field.key().eq_ignore_ascii_case(key))
            .or_else(|| {
                key.eq_ignore_ascii_case("publishedDate")
                    .then_some(FacetField::PublishedYear)
            })
    }

    /// The dimension key used in filter maps and query strings.
    pub fn key(self) -> &'static str {
        match self {
            FacetField::Author => "author",
            FacetField::Category => "category",
            FacetField::Series => "series",
            FacetField::Publisher => "publisher",
            FacetField::Tag => "tag",
            FacetField::Mood => "mood",
            FacetField::Language => "language",
            FacetField::Library => "library",
            FacetField::Shelf => "shelf",
            FacetField::ShelfStatus => "shelfStatus",
            FacetField::ReadStatus => "readStatus",
            FacetField::BookType => "bookType",
            FacetField::PublishedYear => "publishedYear",
            FacetField::PersonalRating => "personalRating",
            FacetField::AmazonRating => "amazonRating",
            FacetField::GoodreadsRating => "goodreadsRating",
            FacetField::HardcoverRating => "hardcoverRating",
            FacetField::FileSize => "fileSize",
            FacetField::PageCount => "pageCount",
            FacetField::MatchScore => "matchScore",
        }
    }

    /// The bucket table of a range dimension.
    pub fn ranges(self) -> Option<&'static [NumericRange]> {
        match self {
            FacetField::PersonalRating
            | FacetField::AmazonRating
            | FacetField::GoodreadsRating
            | FacetField::HardcoverRating => Some(ranges::RATING_RANGES),
            FacetField::FileSize => Some(ranges::FILE_SIZE_RANGES),
            FacetField::PageCount => Some(ranges::PAGE_COUNT_RANGES),
            FacetField::MatchScore => Some(ranges::MATCH_SCORE_RANGES),
            _ => None,
        }
    }

    /// Intrinsic display position of a facet value, for dimensions that have one.
    pub fn sort_index(self, value: &str) -> Option<usize> {
        match self {
            FacetField::ReadStatus => ReadStatus::ALL.iter().position(|s| s.as_str() == value),
            other => other.ranges().and_then(|table| ranges::sort_index(table, value)),
        }
    }

    /// The facet values a book contributes to this dimension.
    ///
    /// Range dimensions yield the id of the bucket holding the book's number.
    pub fn values(self, book: &Book) -> Vec<String> {
        let meta = book.metadata.as_ref();
        match self {
            FacetField::Author => meta.map(|m| m.authors.clone()).unwrap_or_default(),
            FacetField::Category => meta.map(|m| m.categories.clone()).unwrap_or_default(),
            FacetField::Tag => meta.map(|m| m.tags.clone()).unwrap_or_default(),
            FacetField::Mood => meta.map(|m| m.moods.clone()).unwrap_or_default(),
            FacetField::Series => book.series_name().map(str::to_string).into_iter().collect(),
            FacetField::Publisher => present(meta.and_then(|m| m.publisher.as_deref())),
            FacetField::Language => present(meta.and_then(|m| m.language.as_deref())),
            FacetField::Library => book.library_id.map(|id| id.to_string()).into_iter().collect(),
            FacetField::Shelf => book.shelves.iter().map(|s| s.id.to_string()).collect(),
            FacetField::ShelfStatus => vec![shelf_status(book).to_string()],
            FacetField::ReadStatus => vec![book.status().as_str().to_string()],
            FacetField::BookType => present(book.book_type.as_deref()),
            FacetField::PublishedYear => meta
                .and_then(|m| m.published_date.as_deref())
                .and_then(parse_date)
                .map(|d| d.year().to_string())
                .into_iter()
                .collect(),
            range_field => {
                let (Some(table), Some(n)) = (range_field.ranges(), range_field.number(book)) else {
                    return Vec::new();
                };
                ranges::bucket_for(table, n)
                    .map(|range| range.id.to_string())
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Whether `book` carries the selected facet value.
    pub fn matches_value(self, book: &Book, selected: &str) -> bool {
        let selected = selected.trim();
        if let Some(table) = self.ranges() {
            return self
                .number(book)
                .is_some_and(|n| ranges::in_range(table, n, selected));
        }
        match self {
            FacetField::Library | FacetField::Shelf => {
                let Ok(id) = selected.parse::<u64>() else {
                    return false;
                };
                match self {
                    FacetField::Library => book.library_id == Some(id),
                    _ => book.shelves.iter().any(|s| s.id == id),
                }
            }
            FacetField::ReadStatus | FacetField::ShelfStatus | FacetField::BookType => self
                .values(book)
                .iter()
                .any(|v| v.eq_ignore_ascii_case(selected)),
            _ => self.values(book).iter().any(|v| v == selected),
        }
    }

    fn number(self, book: &Book) -> Option<f64> {
        let meta = book.metadata.as_ref();
        match self {
            FacetField::PersonalRating => book.personal_rating,
            FacetField::AmazonRating => meta.and_then(|m| m.amazon_rating),
            FacetField::GoodreadsRating => meta.and_then(|m| m.goodreads_rating),
            FacetField::HardcoverRating => meta.and_then(|m| m.hardcover_rating),
            FacetField::FileSize => book.file_size_kb,
            FacetField::PageCount => meta.and_then(|m| m.page_count),
            FacetField::MatchScore => book.metadata_match_score,
            _ => None,
        }
    }
}

fn present(s: Option<&str>) -> Vec<String> {
    s.filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .into_iter()
        .collect()
}

impl FromStr for FacetField {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetField::parse(s).ok_or_else(|| RulesError::UnknownFacetField(s.to_string()))
    }
}

impl fmt::Display for FacetField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
