//! Value extraction: what a field means on a given record.

use tracing::trace;

use crate::book::{Book, BookMetadata};
use crate::field::Field;
use crate::value::{self, Value};

/// Extracts the value of `field` from `book`.
///
/// Named text fields come back lower-cased, lists come back lower-cased and never
/// missing (an absent list is empty), dates are parsed or `Null`.
/// Composite fields have no per-record value and extract as `Null`.
pub fn extract(book: &Book, field: &Field) -> Value {
    let meta = book.metadata.as_ref();
    match field {
        Field::Library => Value::number(book.library_id.map(|id| id as f64)),
        Field::Shelf => Value::Numbers(book.shelves.iter().map(|s| s.id as f64).collect()),
        Field::ShelfStatus => Value::Text(shelf_status(book).to_string()),
        Field::Title => lower(meta.and_then(|m| m.title.as_deref())),
        Field::Subtitle => lower(meta.and_then(|m| m.subtitle.as_deref())),
        Field::Authors => list(meta.map(|m| &m.authors)),
        Field::Categories => list(meta.map(|m| &m.categories)),
        Field::Moods => list(meta.map(|m| &m.moods)),
        Field::Tags => list(meta.map(|m| &m.tags)),
        Field::Publisher => lower(meta.and_then(|m| m.publisher.as_deref())),
        Field::PublishedDate => Value::date(meta.and_then(|m| m.published_date.as_deref())),
        Field::Description => lower(meta.and_then(|m| m.description.as_deref())),
        Field::Language => lower(meta.and_then(|m| m.language.as_deref())),
        Field::Isbn10 => lower(meta.and_then(|m| m.isbn10.as_deref())),
        Field::Isbn13 => lower(meta.and_then(|m| m.isbn13.as_deref())),
        Field::Asin => lower(meta.and_then(|m| m.asin.as_deref())),
        Field::SeriesName => lower(meta.and_then(|m| m.series_name.as_deref())),
        Field::SeriesNumber => Value::number(book.series_number()),
        Field::SeriesTotal => Value::number(book.series_total()),
        Field::PageCount => meta_number(meta, |m| m.page_count),
        Field::FileType => lower(book.book_type.as_deref()),
        Field::FileSize => Value::number(book.file_size_kb),
        Field::ReadStatus => lower(book.read_status.map(|s| s.as_str())),
        Field::DateFinished => Value::date(book.date_finished.as_deref()),
        Field::LastReadTime => Value::date(book.last_read_time.as_deref()),
        Field::AddedOn => Value::date(book.added_on.as_deref()),
        Field::PersonalRating => Value::number(book.personal_rating),
        Field::AmazonRating => meta_number(meta, |m| m.amazon_rating),
        Field::AmazonReviewCount => meta_number(meta, |m| m.amazon_review_count),
        Field::GoodreadsRating => meta_number(meta, |m| m.goodreads_rating),
        Field::GoodreadsReviewCount => meta_number(meta, |m| m.goodreads_review_count),
        Field::HardcoverRating => meta_number(meta, |m| m.hardcover_rating),
        Field::HardcoverReviewCount => meta_number(meta, |m| m.hardcover_review_count),
        Field::MetadataScore => Value::number(book.metadata_match_score),
        Field::ReadingProgress => Value::Number(book.effective_progress()),
        Field::SeriesStatus | Field::SeriesGaps | Field::SeriesPosition => Value::Null,
        // Custom text keeps its case until normalization so timestamps still parse
        Field::Custom(name) => match book.extra.get(name) {
            Some(json) => value::from_json(json),
            None => {
                trace!(field = %name, book = book.id, "custom field not present on record");
                Value::Null
            }
        },
    }
}

/// The lower-cased list view of a field, used by the set operators.
///
/// Unlike [`extract`] followed by normalization, nothing is parsed or mapped:
/// scalars become one-element lists and missing values an empty list.
pub fn extract_projection(book: &Book, field: &Field) -> Vec<String> {
    extract(book, field).projection()
}

/// `shelved` when the book is on any shelf, `unshelved` otherwise.
pub fn shelf_status(book: &Book) -> &'static str {
    if book.is_shelved() {
        "shelved"
    } else {
        "unshelved"
    }
}

/// Folds UI-facing format names onto the canonical tags stored on records.
///
/// Applied to rule values only; the record's own tag is already canonical.
pub fn canonical_file_type(name: &str) -> String {
    let lowered = name.trim().to_lowercase();
    match lowered.as_str() {
        "cbr" | "cbz" | "cb7" => "cbx".to_string(),
        "azw" => "azw3".to_string(),
        _ => lowered,
    }
}

fn lower(s: Option<&str>) -> Value {
    s.map_or(Value::Null, |s| Value::Text(s.to_lowercase()))
}

fn list(items: Option<&Vec<String>>) -> Value {
    Value::Texts(
        items
            .map(|items| items.iter().map(|s| s.to_lowercase()).collect())
            .unwrap_or_default(),
    )
}

fn meta_number(meta: Option<&BookMetadata>, get: impl Fn(&BookMetadata) -> Option<f64>) -> Value {
    Value::number(meta.and_then(get))
}
