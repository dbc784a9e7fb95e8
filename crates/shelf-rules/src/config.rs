//! Engine configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::temporal::WeekStart;

/// Default cap on the number of facets returned per dimension.
pub const DEFAULT_FACET_LIMIT: usize = 100;

/// Knobs shared by the rule and facet engines.
///
/// Every field has a default, so an empty YAML or JSON document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    /// Fixed evaluation time. When unset, the wall clock is read on each call.
    pub now: Option<DateTime<Utc>>,
    /// First day of the week for `this_period: week`.
    pub week_start: WeekStart,
    /// Maximum facets returned per dimension.
    pub facet_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            now: None,
            week_start: WeekStart::default(),
            facet_limit: DEFAULT_FACET_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Pins the evaluation clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn with_week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_facet_limit(mut self, limit: usize) -> Self {
        self.facet_limit = limit;
        self
    }

    /// The configured time, or the current time.
    pub fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.facet_limit, 100);
        assert_eq!(config.week_start, WeekStart::Sunday);
        assert!(config.now.is_none());
    }

    #[test]
    fn partial_documents_fill_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"week_start": "monday"}"#).unwrap();
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.facet_limit, 100);

        let config: EngineConfig =
            serde_json::from_str(r#"{"now": "2024-01-01T00:00:00Z", "facet_limit": 5}"#).unwrap();
        assert_eq!(config.now().to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(config.facet_limit, 5);
    }

    #[test]
    fn fixed_clock_wins() {
        let fixed = DateTime::parse_from_rfc3339("2020-02-02T02:02:02Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(EngineConfig::default().with_now(fixed).now(), fixed);
    }
}
