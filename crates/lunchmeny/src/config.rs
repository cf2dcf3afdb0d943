use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Weekday, WeekdayLabel};

/// Lines kept after the last day's label, since nothing bounds it from below.
pub const DEFAULT_LAST_DAY_LINES: usize = 10;
pub const DEFAULT_LINK_KEYWORD: &str = "lunch";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Expected {expected} weekday labels, got {got}")]
    WrongDayCount { expected: usize, got: usize },
    #[error("Weekday label for {0} is empty")]
    EmptyLabel(Weekday),
    #[error("Weekday label '{0}' is used more than once")]
    DuplicateLabel(String),
    #[error("Weekdays must be listed Monday to Friday, found {found} at position {position}")]
    OutOfOrder { found: Weekday, position: usize },
    #[error("Last day line cap must be greater than 0")]
    ZeroLineCap,
    #[error("Link keyword must not be empty")]
    EmptyKeyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinderConfig {
    pub days: Vec<WeekdayLabel>,
    pub last_day_lines: usize,
    pub link_keyword: String,
    /// Read the menu from the root page itself when it has no lunch link but
    /// already lists the whole week.
    #[serde(default)]
    pub root_page_fallback: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            days: WeekdayLabel::swedish_week(),
            last_day_lines: DEFAULT_LAST_DAY_LINES,
            link_keyword: DEFAULT_LINK_KEYWORD.to_string(),
            root_page_fallback: false,
        }
    }
}

impl FinderConfig {
    /// Replaces the weekday vocabulary with `labels`, given Monday first.
    pub fn with_labels<S: AsRef<str>>(mut self, labels: &[S]) -> Result<Self, ConfigError> {
        if labels.len() != Weekday::ALL.len() {
            return Err(ConfigError::WrongDayCount {
                expected: Weekday::ALL.len(),
                got: labels.len(),
            });
        }
        self.days = Weekday::ALL
            .iter()
            .zip(labels)
            .map(|(day, label)| WeekdayLabel::new(*day, label.as_ref().trim()))
            .collect();
        Ok(self)
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.days.len() != Weekday::ALL.len() {
            return Err(ConfigError::WrongDayCount {
                expected: Weekday::ALL.len(),
                got: self.days.len(),
            });
        }

        let mut seen = HashSet::new();
        for (position, (day, expected)) in self.days.iter().zip(Weekday::ALL).enumerate() {
            if day.weekday != expected {
                return Err(ConfigError::OutOfOrder {
                    found: day.weekday,
                    position,
                });
            }
            if day.label.trim().is_empty() {
                return Err(ConfigError::EmptyLabel(day.weekday));
            }
            if !seen.insert(day.label.to_lowercase()) {
                return Err(ConfigError::DuplicateLabel(day.label.clone()));
            }
        }

        if self.last_day_lines == 0 {
            return Err(ConfigError::ZeroLineCap);
        }
        if self.link_keyword.trim().is_empty() {
            return Err(ConfigError::EmptyKeyword);
        }
        Ok(self)
    }
}
