use std::collections::BTreeSet;

use serde::Deserialize;

use crate::error::{Error, Result};

/// One togglable calendar feed. Identity is `id`; the declaration order
/// in the configuration is the tiebreak order for marker selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub color: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    /// Lower means shown first; absent sorts last.
    #[serde(default)]
    pub priority: Option<i64>,
}

/// Which weekday starts a grid row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

/// Widget configuration consumed by the core. Immutable after setup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: Vec<CalendarSource>,
    #[serde(default)]
    pub week_start: WeekStart,
    /// Marker display budget per day cell.
    #[serde(default = "default_marker_cap")]
    pub marker_cap: usize,
    /// Selected-day event list cap; absent means unlimited.
    #[serde(default)]
    pub max_events: Option<usize>,
}

fn default_marker_cap() -> usize {
    2
}

impl Config {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input)?;
        config.validated()
    }

    /// Checks the source list and clamps the display caps.
    pub fn validated(mut self) -> Result<Self> {
        if self.sources.is_empty() {
            return Err(Error::InvalidConfiguration(
                "`sources` is required and must not be empty".to_string(),
            ));
        }
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(Error::InvalidConfiguration(format!(
                    "duplicate source id `{}`",
                    source.id
                )));
            }
        }
        self.marker_cap = self.marker_cap.clamp(1, 7);
        self.max_events = self.max_events.map(|n| n.clamp(1, 50));
        Ok(self)
    }

    /// Looks up a configured source by id.
    pub fn source(&self, id: &str) -> Option<&CalendarSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    /// Ids of every configured source, for the initial enabled set.
    pub fn all_source_ids(&self) -> BTreeSet<String> {
        self.sources.iter().map(|s| s.id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_toml_with_defaults() {
        let config = Config::from_toml_str(
            r##"
            [[sources]]
            id = "calendar.family"
            color = "#44739e"
            label = "Family"
            priority = 1

            [[sources]]
            id = "calendar.work"
            color = "#e8a13b"
            "##,
        )
        .unwrap();

        assert_eq!(config.sources.len(), 2);
        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.marker_cap, 2);
        assert_eq!(config.max_events, None);
        assert_eq!(config.sources[1].priority, None);
    }

    #[test]
    fn parses_explicit_week_start_and_caps() {
        let config = Config::from_toml_str(
            r##"
            week_start = "sunday"
            marker_cap = 3
            max_events = 5

            [[sources]]
            id = "calendar.family"
            color = "#44739e"
            "##,
        )
        .unwrap();

        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.marker_cap, 3);
        assert_eq!(config.max_events, Some(5));
    }

    #[test]
    fn empty_source_list_is_fatal() {
        let err = Config::from_toml_str("sources = []").unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_source_id_is_fatal() {
        let err = Config::from_toml_str(
            r##"
            [[sources]]
            id = "calendar.family"
            color = "#44739e"

            [[sources]]
            id = "calendar.family"
            color = "#e8a13b"
            "##,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn caps_are_clamped() {
        let config = Config::from_toml_str(
            r##"
            marker_cap = 99
            max_events = 500

            [[sources]]
            id = "calendar.family"
            color = "#44739e"
            "##,
        )
        .unwrap();
        assert_eq!(config.marker_cap, 7);
        assert_eq!(config.max_events, Some(50));
    }

    #[test]
    fn malformed_toml_maps_to_invalid_configuration() {
        let err = Config::from_toml_str("sources = 3").unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }
}
