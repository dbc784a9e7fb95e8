//! Relative-date arithmetic for `within_last`, `older_than` and `this_period`.
//!
//! All calendar math runs in UTC.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Unit of a relative amount. Defaults to days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateUnit {
    #[default]
    Days,
    Weeks,
    Months,
    Years,
}

impl DateUnit {
    /// Parses a unit name, accepting singular and plural forms.
    /// Anything unrecognised falls back to days.
    pub fn parse(name: Option<&str>) -> DateUnit {
        match name.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("week" | "weeks") => DateUnit::Weeks,
            Some("month" | "months") => DateUnit::Months,
            Some("year" | "years") => DateUnit::Years,
            _ => DateUnit::Days,
        }
    }
}

/// Calendar period for `this_period`. Defaults to the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Period {
    Week,
    Month,
    #[default]
    Year,
}

impl Period {
    pub fn parse(name: Option<&str>) -> Period {
        match name.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("week") => Period::Week,
            Some("month") => Period::Month,
            _ => Period::Year,
        }
    }
}

/// First day of the week for `this_period: week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

/// Returns `now - amount * unit`.
///
/// Day and week amounts may be fractional. Month and year amounts are
/// truncated to whole months. Negative or non-finite amounts yield `None`.
pub fn cutoff(now: DateTime<Utc>, amount: f64, unit: DateUnit) -> Option<DateTime<Utc>> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    match unit {
        DateUnit::Days => now.checked_sub_signed(fractional_days(amount)?),
        DateUnit::Weeks => now.checked_sub_signed(fractional_days(amount * 7.0)?),
        DateUnit::Months => now.checked_sub_months(Months::new(whole(amount)?)),
        DateUnit::Years => now.checked_sub_months(Months::new(whole(amount)?.checked_mul(12)?)),
    }
}

/// Returns the first instant of the period containing `now`.
pub fn period_start(
    now: DateTime<Utc>,
    period: Period,
    week_start: WeekStart,
) -> Option<DateTime<Utc>> {
    let today = now.date_naive();
    let start = match period {
        Period::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
        Period::Month => NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
        Period::Week => {
            let offset = match week_start {
                WeekStart::Sunday => today.weekday().num_days_from_sunday(),
                WeekStart::Monday => today.weekday().num_days_from_monday(),
            };
            today.checked_sub_signed(Duration::days(i64::from(offset)))?
        }
    };
    Some(Utc.from_utc_datetime(&start.and_hms_opt(0, 0, 0)?))
}

fn fractional_days(days: f64) -> Option<Duration> {
    let millis = days * 86_400_000.0;
    if millis > i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

fn whole(amount: f64) -> Option<u32> {
    let truncated = amount.trunc();
    (truncated <= f64::from(u32::MAX)).then_some(truncated as u32)
}
