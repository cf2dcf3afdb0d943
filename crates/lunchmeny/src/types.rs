use std::fmt::Display;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    pub fn swedish(&self) -> &'static str {
        match self {
            Weekday::Monday => "måndag",
            Weekday::Tuesday => "tisdag",
            Weekday::Wednesday => "onsdag",
            Weekday::Thursday => "torsdag",
            Weekday::Friday => "fredag",
        }
    }
}

impl Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Weekday::Monday => write!(f, "Monday"),
            Weekday::Tuesday => write!(f, "Tuesday"),
            Weekday::Wednesday => write!(f, "Wednesday"),
            Weekday::Thursday => write!(f, "Thursday"),
            Weekday::Friday => write!(f, "Friday"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayLabel {
    pub weekday: Weekday,
    pub label: String,
}

impl WeekdayLabel {
    pub fn new(weekday: Weekday, label: impl Into<String>) -> Self {
        Self {
            weekday,
            label: label.into(),
        }
    }

    pub fn swedish_week() -> Vec<WeekdayLabel> {
        Weekday::ALL
            .iter()
            .map(|day| WeekdayLabel::new(*day, day.swedish()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMenu {
    pub weekday: Weekday,
    pub label: String,
    /// Cleaned menu text, line breaks rendered as `<br>`.
    pub menu: String,
}

impl Display for DayMenu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<9} {}", self.weekday, self.menu.replace("<br>", "\n          "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyMenuResult {
    pub restaurant_url: String,
    pub lunch_page_url: String,
    pub menus: Vec<DayMenu>,
}

impl WeeklyMenuResult {
    pub fn menu_for(&self, weekday: Weekday) -> Option<&DayMenu> {
        self.menus.iter().find(|m| m.weekday == weekday)
    }

    pub fn is_complete(&self) -> bool {
        self.menus.len() == Weekday::ALL.len()
    }
}

impl Display for WeeklyMenuResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {}", self.restaurant_url)?;
        if self.lunch_page_url != self.restaurant_url {
            writeln!(f, "│  Lunch page: {}", self.lunch_page_url)?;
        }
        writeln!(f, "└─ {} of 5 day(s)", self.menus.len())?;
        for menu in &self.menus {
            writeln!(f, "   {}", menu)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateLink {
    pub url: Url,
    pub anchor_text: String,
}

impl Display for CandidateLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.anchor_text.trim(), self.url)
    }
}
