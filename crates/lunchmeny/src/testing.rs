use std::collections::HashMap;

use url::Url;

use crate::fetcher::{FetchedPage, PageFetcher, RawLink};
use crate::parser::parse_page;

#[derive(Debug, thiserror::Error)]
#[error("No page served at {0}")]
pub struct NoSuchPage(pub String);

#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, FetchedPage>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_html(mut self, url: &str, html: &str) -> Self {
        let url = Url::parse(url).expect("test URL should parse");
        self.pages.insert(url.to_string(), parse_page(html, &url));
        self
    }

    pub fn with_text(mut self, url: &str, text: &str) -> Self {
        let url = Url::parse(url).expect("test URL should parse");
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                url,
                links: Vec::new(),
                text: text.to_string(),
            },
        );
        self
    }

    pub fn with_links(mut self, url: &str, links: &[(&str, &str)]) -> Self {
        let url = Url::parse(url).expect("test URL should parse");
        self.pages.insert(
            url.to_string(),
            FetchedPage {
                url,
                links: links
                    .iter()
                    .map(|(href, text)| RawLink {
                        href: Some(href.to_string()),
                        text: text.to_string(),
                    })
                    .collect(),
                text: String::new(),
            },
        );
        self
    }
}

impl PageFetcher for StaticFetcher {
    type Error = NoSuchPage;

    async fn fetch(&self, url: &Url) -> Result<FetchedPage, NoSuchPage> {
        self.pages
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| NoSuchPage(url.to_string()))
    }
}
