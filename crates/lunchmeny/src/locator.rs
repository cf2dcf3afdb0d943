use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::fetcher::{FetchedPage, PageFetcher};
use crate::finder::MenuError;
use crate::text::contains_ci;
use crate::types::CandidateLink;

/// Decides which outbound links may lead to the lunch page.
#[derive(Clone)]
pub struct LinkPredicate(Arc<dyn Fn(&CandidateLink) -> bool + Send + Sync>);

impl LinkPredicate {
    pub fn new(f: impl Fn(&CandidateLink) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn anchor_text_contains(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        Self::new(move |link| contains_ci(&link.anchor_text, &keyword))
    }

    pub fn matches(&self, link: &CandidateLink) -> bool {
        (self.0)(link)
    }
}

impl fmt::Debug for LinkPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkPredicate(..)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LunchPage {
    pub url: Url,
    pub text: String,
}

pub fn normalize_page_text(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '\r' | '\t')).collect()
}

pub fn candidate_links(page: &FetchedPage, base: &Url, predicate: &LinkPredicate) -> Vec<CandidateLink> {
    page.links
        .iter()
        .filter_map(|link| {
            let href = link.href.as_deref()?;
            let url = base
                .join(href)
                .inspect_err(|e| log::debug!("Skipping unresolvable href '{href}': {e}"))
                .ok()?;
            matches!(url.scheme(), "http" | "https").then(|| CandidateLink {
                url,
                anchor_text: link.text.trim().to_string(),
            })
        })
        .filter(|link| predicate.matches(link))
        .collect()
}

pub async fn locate_lunch_page<F: PageFetcher>(
    fetcher: &F,
    root: &FetchedPage,
    base: &Url,
    predicate: &LinkPredicate,
) -> Result<LunchPage, MenuError> {
    let candidates = candidate_links(root, base, predicate);
    log::debug!("{} candidate lunch link(s) on {}", candidates.len(), base);

    let link = candidates
        .into_iter()
        .next()
        .ok_or_else(|| MenuError::LunchPageNotFound {
            url: base.to_string(),
        })?;
    log::info!("Following '{}' to {}", link.anchor_text, link.url);

    let page = fetcher
        .fetch(&link.url)
        .await
        .map_err(|e| MenuError::fetch_failed(&link.url, e))?;

    Ok(LunchPage {
        url: link.url,
        text: normalize_page_text(&page.text),
    })
}
