use std::future::Future;

use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLink {
    pub href: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: Url,
    pub links: Vec<RawLink>,
    pub text: String,
}

pub trait PageFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, Self::Error>> + Send;
}
