//! The closed vocabulary of rule fields.
//!
//! Every identifier a rule can name maps to a [`Field`] variant with a
//! declared [`FieldType`]. Identifiers outside the vocabulary become
//! [`Field::Custom`] and are resolved against [`Book::extra`](crate::Book::extra).

use serde::{Deserialize, Serialize};

/// How a field's raw rule values are parsed and its record values compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Free text, compared case-insensitively.
    String,
    /// Whole numbers; textual rule values are truncated when parsed.
    Number,
    /// Fractional numbers.
    Decimal,
    /// Calendar dates and timestamps.
    Date,
    /// Lists of text values (authors, tags, ...).
    Array,
    /// A single numeric identifier.
    Id,
    /// A list of numeric identifiers.
    IdArray,
    /// Evaluated over the whole series, see [`crate::series`].
    Composite,
}

/// A field a rule can test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Field {
    Library,
    Shelf,
    ShelfStatus,
    Title,
    Subtitle,
    Authors,
    Categories,
    Moods,
    Tags,
    Publisher,
    PublishedDate,
    Description,
    Language,
    Isbn10,
    Isbn13,
    Asin,
    SeriesName,
    SeriesNumber,
    SeriesTotal,
    PageCount,
    FileType,
    FileSize,
    ReadStatus,
    DateFinished,
    LastReadTime,
    AddedOn,
    PersonalRating,
    AmazonRating,
    AmazonReviewCount,
    GoodreadsRating,
    GoodreadsReviewCount,
    HardcoverRating,
    HardcoverReviewCount,
    MetadataScore,
    ReadingProgress,
    SeriesStatus,
    SeriesGaps,
    SeriesPosition,
    /// Any identifier outside the vocabulary.
    Custom(String),
}

impl Field {
    /// Every field of the closed vocabulary, in declaration order.
    pub const KNOWN: [Field; 38] = [
        Field::Library,
        Field::Shelf,
        Field::ShelfStatus,
        Field::Title,
        Field::Subtitle,
        Field::Authors,
        Field::Categories,
        Field::Moods,
        Field::Tags,
        Field::Publisher,
        Field::PublishedDate,
        Field::Description,
        Field::Language,
        Field::Isbn10,
        Field::Isbn13,
        Field::Asin,
        Field::SeriesName,
        Field::SeriesNumber,
        Field::SeriesTotal,
        Field::PageCount,
        Field::FileType,
        Field::FileSize,
        Field::ReadStatus,
        Field::DateFinished,
        Field::LastReadTime,
        Field::AddedOn,
        Field::PersonalRating,
        Field::AmazonRating,
        Field::AmazonReviewCount,
        Field::GoodreadsRating,
        Field::GoodreadsReviewCount,
        Field::HardcoverRating,
        Field::HardcoverReviewCount,
        Field::MetadataScore,
        Field::ReadingProgress,
        Field::SeriesStatus,
        Field::SeriesGaps,
        Field::SeriesPosition,
    ];

    /// Resolves an identifier. Never fails: unknown names become [`Field::Custom`].
    pub fn from_name(name: &str) -> Field {
        match name {
            "library" => Field::Library,
            "shelf" => Field::Shelf,
            "shelfStatus" => Field::ShelfStatus,
            "title" => Field::Title,
            "subtitle" => Field::Subtitle,
            "authors" => Field::Authors,
            "categories" => Field::Categories,
            "moods" => Field::Moods,
            "tags" => Field::Tags,
            "publisher" => Field::Publisher,
            "publishedDate" => Field::PublishedDate,
            "description" => Field::Description,
            "language" => Field::Language,
            "isbn10" => Field::Isbn10,
            "isbn13" => Field::Isbn13,
            "asin" => Field::Asin,
            "seriesName" => Field::SeriesName,
            "seriesNumber" => Field::SeriesNumber,
            "seriesTotal" => Field::SeriesTotal,
            "pageCount" => Field::PageCount,
            "fileType" => Field::FileType,
            "fileSize" => Field::FileSize,
            "readStatus" => Field::ReadStatus,
            "dateFinished" => Field::DateFinished,
            "lastReadTime" => Field::LastReadTime,
            "addedOn" => Field::AddedOn,
            "personalRating" => Field::PersonalRating,
            "amazonRating" => Field::AmazonRating,
            "amazonReviewCount" => Field::AmazonReviewCount,
            "goodreadsRating" => Field::GoodreadsRating,
            "goodreadsReviewCount" => Field::GoodreadsReviewCount,
            "hardcoverRating" => Field::HardcoverRating,
            "hardcoverReviewCount" => Field::HardcoverReviewCount,
            "metadataScore" => Field::MetadataScore,
            "readingProgress" => Field::ReadingProgress,
            "seriesStatus" => Field::SeriesStatus,
            "seriesGaps" => Field::SeriesGaps,
            "seriesPosition" => Field::SeriesPosition,
            other => Field::Custom(other.to_string()),
        }
    }

    /// Returns the identifier used in persisted rules.
    pub fn as_str(&self) -> &str {
        match self {
            Field::Library => "library",
            Field::Shelf => "shelf",
            Field::ShelfStatus => "shelfStatus",
            Field::Title => "title",
            Field::Subtitle => "subtitle",
            Field::Authors => "authors",
            Field::Categories => "categories",
            Field::Moods => "moods",
            Field::Tags => "tags",
            Field::Publisher => "publisher",
            Field::PublishedDate => "publishedDate",
            Field::Description => "description",
            Field::Language => "language",
            Field::Isbn10 => "isbn10",
            Field::Isbn13 => "isbn13",
            Field::Asin => "asin",
            Field::SeriesName => "seriesName",
            Field::SeriesNumber => "seriesNumber",
            Field::SeriesTotal => "seriesTotal",
            Field::PageCount => "pageCount",
            Field::FileType => "fileType",
            Field::FileSize => "fileSize",
            Field::ReadStatus => "readStatus",
            Field::DateFinished => "dateFinished",
            Field::LastReadTime => "lastReadTime",
            Field::AddedOn => "addedOn",
            Field::PersonalRating => "personalRating",
            Field::AmazonRating => "amazonRating",
            Field::AmazonReviewCount => "amazonReviewCount",
            Field::GoodreadsRating => "goodreadsRating",
            Field::GoodreadsReviewCount => "goodreadsReviewCount",
            Field::HardcoverRating => "hardcoverRating",
            Field::HardcoverReviewCount => "hardcoverReviewCount",
            Field::MetadataScore => "metadataScore",
            Field::ReadingProgress => "readingProgress",
            Field::SeriesStatus => "seriesStatus",
            Field::SeriesGaps => "seriesGaps",
            Field::SeriesPosition => "seriesPosition",
            Field::Custom(name) => name,
        }
    }

    /// Returns the declared type of this field.
    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Library => FieldType::Id,
            Field::Shelf => FieldType::IdArray,
            Field::Authors | Field::Categories | Field::Moods | Field::Tags => FieldType::Array,
            Field::PublishedDate | Field::DateFinished | Field::LastReadTime | Field::AddedOn => {
                FieldType::Date
            }
            Field::PageCount
            | Field::SeriesTotal
            | Field::AmazonReviewCount
            | Field::GoodreadsReviewCount
            | Field::HardcoverReviewCount => FieldType::Number,
            Field::SeriesNumber
            | Field::FileSize
            | Field::PersonalRating
            | Field::AmazonRating
            | Field::GoodreadsRating
            | Field::HardcoverRating
            | Field::MetadataScore
            | Field::ReadingProgress => FieldType::Decimal,
            Field::SeriesStatus | Field::SeriesGaps | Field::SeriesPosition => {
                FieldType::Composite
            }
            _ => FieldType::String,
        }
    }

    /// Returns `true` for fields evaluated over a whole series.
    pub fn is_composite(&self) -> bool {
        self.field_type() == FieldType::Composite
    }

    /// Returns `true` for fields outside the closed vocabulary.
    pub fn is_custom(&self) -> bool {
        matches!(self, Field::Custom(_))
    }
}

impl From<String> for Field {
    fn from(name: String) -> Self {
        match Field::from_name(&name) {
            Field::Custom(_) => Field::Custom(name),
            known => known,
        }
    }
}

impl From<&str> for Field {
    fn from(name: &str) -> Self {
        Field::from_name(name)
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        match field {
            Field::Custom(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
