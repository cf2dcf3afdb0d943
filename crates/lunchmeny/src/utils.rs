use serde::Serialize;

use crate::finder::MenuError;
use crate::types::WeeklyMenuResult;

/// Restaurant URLs from a list file: one per line, `#` starts a comment.
/// Later duplicates are dropped.
pub fn parse_url_list(contents: &str) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for line in contents.lines() {
        let url = line.split('#').next().unwrap_or_default().trim();
        if !url.is_empty() && !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    urls
}

#[derive(Debug, Serialize)]
pub struct BatchEntry<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu: Option<&'a WeeklyMenuResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> BatchEntry<'a> {
    pub fn new(url: &'a str, result: &'a Result<WeeklyMenuResult, MenuError>) -> Self {
        match result {
            Ok(menu) => BatchEntry {
                url,
                menu: Some(menu),
                error: None,
            },
            Err(e) => BatchEntry {
                url,
                menu: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub complete: usize,
    pub partial: usize,
    pub fetch_failed: usize,
    pub no_lunch_page: usize,
    pub incomplete_week: usize,
    pub total: usize,
}

impl BatchStats {
    pub fn from_results<'a, I>(results: I) -> BatchStats
    where
        I: IntoIterator<Item = &'a Result<WeeklyMenuResult, MenuError>>,
    {
        let mut stats = BatchStats::default();
        for result in results {
            stats.total += 1;
            match result {
                Ok(menu) if menu.is_complete() => stats.complete += 1,
                Ok(_) => stats.partial += 1,
                Err(MenuError::FetchFailed { .. }) => stats.fetch_failed += 1,
                Err(MenuError::LunchPageNotFound { .. }) => stats.no_lunch_page += 1,
                Err(MenuError::IncompleteWeek { .. }) => stats.incomplete_week += 1,
            }
        }
        stats
    }
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(f, "  Complete weeks:      {}", self.complete)?;
        writeln!(f, "  Partial weeks:       {}", self.partial)?;
        writeln!(f, "  Fetch failures:      {}", self.fetch_failed)?;
        writeln!(f, "  No lunch page:       {}", self.no_lunch_page)?;
        writeln!(f, "  Incomplete week:     {}", self.incomplete_week)?;
        writeln!(f, "  Total:               {}", self.total)
    }
}
