//! Named numeric buckets for the range dimensions.
//!
//! Every bucket is half-open, `[min, max)`; the last bucket of each table is
//! unbounded above.

/// One named bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub id: &'static str,
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    const fn new(id: &'static str, min: f64, max: f64) -> Self {
        NumericRange { id, min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }
}

const MB: f64 = 1024.0;
const GB: f64 = 1024.0 * MB;

/// Rating buckets, shared by personal and external ratings.
pub const RATING_RANGES: &[NumericRange] = &[
    NumericRange::new("0to1", 0.0, 1.0),
    NumericRange::new("1to2", 1.0, 2.0),
    NumericRange::new("2to3", 2.0, 3.0),
    NumericRange::new("3to4", 3.0, 4.0),
    NumericRange::new("4to4.5", 4.0, 4.5),
    NumericRange::new("4.5to5", 4.5, f64::INFINITY),
];

/// File size buckets, in kilobytes.
pub const FILE_SIZE_RANGES: &[NumericRange] = &[
    NumericRange::new("<1MB", 0.0, MB),
    NumericRange::new("1-10MB", MB, 10.0 * MB),
    NumericRange::new("10-50MB", 10.0 * MB, 50.0 * MB),
    NumericRange::new("50-100MB", 50.0 * MB, 100.0 * MB),
    NumericRange::new("100-500MB", 100.0 * MB, 500.0 * MB),
    NumericRange::new("500MB-1GB", 500.0 * MB, GB),
    NumericRange::new("1-2GB", GB, 2.0 * GB),
    NumericRange::new("2GB+", 2.0 * GB, f64::INFINITY),
];

pub const PAGE_COUNT_RANGES: &[NumericRange] = &[
    NumericRange::new("<50", 0.0, 50.0),
    NumericRange::new("50-100", 50.0, 100.0),
    NumericRange::new("100-200", 100.0, 200.0),
    NumericRange::new("200-400", 200.0, 400.0),
    NumericRange::new("400-600", 400.0, 600.0),
    NumericRange::new("600-1000", 600.0, 1000.0),
    NumericRange::new("1000+", 1000.0, f64::INFINITY),
];

/// Metadata match score buckets, in percent.
pub const MATCH_SCORE_RANGES: &[NumericRange] = &[
    NumericRange::new("0-50", 0.0, 50.0),
    NumericRange::new("50-70", 50.0, 70.0),
    NumericRange::new("70-80", 70.0, 80.0),
    NumericRange::new("80-90", 80.0, 90.0),
    NumericRange::new("90-95", 90.0, 95.0),
    NumericRange::new("95-100", 95.0, f64::INFINITY),
];

/// Looks a bucket up by id. The lower-cased form of an id is accepted too.
pub fn find<'t>(table: &'t [NumericRange], id: &str) -> Option<&'t NumericRange> {
    table
        .iter()
        .find(|range| range.id == id || range.id.to_lowercase() == id)
}

/// Position of a bucket in its table, which is also its display order.
pub fn sort_index(table: &[NumericRange], id: &str) -> Option<usize> {
    table
        .iter()
        .position(|range| range.id == id || range.id.to_lowercase() == id)
}

/// The bucket `value` falls into, if any.
pub fn bucket_for(table: &[NumericRange], value: f64) -> Option<&NumericRange> {
    table.iter().find(|range| range.contains(value))
}

/// Whether `value` lies in the bucket named `id`. Unknown ids never match.
pub fn in_range(table: &[NumericRange], value: f64, id: &str) -> bool {
    find(table, id).is_some_and(|range| range.contains(value))
}

/// Whether a file size in kilobytes lies in the named bucket.
pub fn is_file_size_in_range(kb: f64, id: &str) -> bool {
    in_range(FILE_SIZE_RANGES, kb, id)
}
