pub mod config;
pub mod fetcher;
pub mod finder;
pub mod locator;
mod parser;
pub mod sanitizer;
pub mod scraper;
pub mod segmenter;
mod text;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

pub use config::FinderConfig;
pub use finder::{MenuError, MenuFinder};
pub use scraper::{ScraperError, WebScraper};
pub use types::{DayMenu, Weekday, WeeklyMenuResult};
