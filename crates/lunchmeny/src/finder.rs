use std::error::Error;

use futures::stream::{self, StreamExt};
use url::Url;

use crate::config::{ConfigError, FinderConfig};
use crate::fetcher::PageFetcher;
use crate::locator::{LinkPredicate, LunchPage, candidate_links, locate_lunch_page, normalize_page_text};
use crate::sanitizer::sanitize_day;
use crate::scraper::{ScraperError, WebScraper};
use crate::segmenter::{missing_label, segment_week};
use crate::types::{CandidateLink, DayMenu, WeeklyMenuResult};

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("Failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
    #[error("Could not find any lunch page on {url}")]
    LunchPageNotFound { url: String },
    #[error("Could not find all weekdays, '{missing}' is missing")]
    IncompleteWeek { missing: String },
}

impl MenuError {
    pub(crate) fn fetch_failed(url: impl ToString, source: impl Error + Send + Sync + 'static) -> Self {
        MenuError::FetchFailed {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuFinder<F = WebScraper> {
    fetcher: F,
    config: FinderConfig,
    predicate: LinkPredicate,
}

impl MenuFinder<WebScraper> {
    pub fn new() -> Result<Self, ScraperError> {
        Ok(Self::with_fetcher(WebScraper::new()?))
    }
}

impl<F: PageFetcher> MenuFinder<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        let config = FinderConfig::default();
        let predicate = LinkPredicate::anchor_text_contains(config.link_keyword.as_str());
        Self {
            fetcher,
            config,
            predicate,
        }
    }

    /// Also resets the link predicate to the config's keyword.
    pub fn with_config(mut self, config: FinderConfig) -> Result<Self, ConfigError> {
        let config = config.validate()?;
        self.predicate = LinkPredicate::anchor_text_contains(config.link_keyword.as_str());
        self.config = config;
        Ok(self)
    }

    pub fn with_link_predicate(mut self, predicate: LinkPredicate) -> Self {
        self.predicate = predicate;
        self
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Fails only when a page cannot be fetched, no lunch page is linked, or the
    /// lunch page does not list every weekday. Days whose text cannot be
    /// cleaned up are left out of the result instead.
    pub async fn get_weekly_lunch_menu(&self, url: &str) -> Result<WeeklyMenuResult, MenuError> {
        let root_url = Url::parse(url).map_err(|e| MenuError::fetch_failed(url, e))?;
        let root = self
            .fetcher
            .fetch(&root_url)
            .await
            .map_err(|e| MenuError::fetch_failed(&root_url, e))?;

        let lunch = match locate_lunch_page(&self.fetcher, &root, &root.url, &self.predicate).await {
            Ok(page) => page,
            Err(MenuError::LunchPageNotFound { url: page_url }) if self.config.root_page_fallback => {
                let text = normalize_page_text(&root.text);
                if missing_label(&text, &self.config.days).is_some() {
                    return Err(MenuError::LunchPageNotFound { url: page_url });
                }
                log::info!("No lunch link on {}, reading the menu from the page itself", page_url);
                LunchPage {
                    url: root.url.clone(),
                    text,
                }
            }
            Err(e) => return Err(e),
        };

        let segments = segment_week(&lunch.text, &self.config.days, self.config.last_day_lines)?;
        let menus: Vec<DayMenu> = segments
            .iter()
            .filter_map(|segment| sanitize_day(segment).ok())
            .collect();

        log::info!("Found {} day(s) of lunch menu on {}", menus.len(), lunch.url);

        Ok(WeeklyMenuResult {
            restaurant_url: url.to_string(),
            lunch_page_url: lunch.url.to_string(),
            menus,
        })
    }

    pub async fn find_lunch_links(&self, url: &str) -> Result<Vec<CandidateLink>, MenuError> {
        let root_url = Url::parse(url).map_err(|e| MenuError::fetch_failed(url, e))?;
        let root = self
            .fetcher
            .fetch(&root_url)
            .await
            .map_err(|e| MenuError::fetch_failed(&root_url, e))?;
        Ok(candidate_links(&root, &root.url, &self.predicate))
    }

    /// Runs independent lookups for every URL, at most `concurrency` at a time.
    /// Results come back in the order of `urls`.
    pub async fn get_weekly_lunch_menus(
        &self,
        urls: &[String],
        concurrency: usize,
    ) -> Vec<(String, Result<WeeklyMenuResult, MenuError>)> {
        let lookups: Vec<_> = urls
            .iter()
            .map(|url| async move {
                let result = self
                    .get_weekly_lunch_menu(url)
                    .await
                    .inspect_err(|e| log::warn!("No weekly menu for {}: {}", url, e));
                (url.clone(), result)
            })
            .collect();
        stream::iter(lookups)
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
