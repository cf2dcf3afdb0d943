use lunchmeny::MenuFinder;
use lunchmeny::config::FinderConfig;
use lunchmeny::utils::BatchEntry;
use rmcp::{
    ServerHandler,
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{ErrorData as McpError, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;

const DEFAULT_CONCURRENCY: u16 = 4;
const MAX_CONCURRENCY: u16 = 16;

#[derive(Debug, Clone)]
pub struct McpServer {
    finder: MenuFinder,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl McpServer {
    pub fn new() -> Result<Self, anyhow::Error> {
        Ok(Self {
            finder: MenuFinder::new()?,
            tool_router: Self::tool_router(),
        })
    }

    /// A finder using the request's overrides on top of the defaults.
    fn finder_for(&self, options: FinderOptions) -> Result<MenuFinder, McpError> {
        let mut config = FinderConfig {
            root_page_fallback: options.root_fallback,
            ..Default::default()
        };
        if let Some(keyword) = options.keyword {
            config.link_keyword = keyword;
        }
        if let Some(days) = options.days {
            config = config
                .with_labels(&days)
                .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
        }

        self.finder
            .clone()
            .with_config(config)
            .inspect_err(|e| log::error!("Invalid params: {e:?}"))
            .map_err(|e| McpError::invalid_params(e.to_string(), None))
    }

    #[tool(
        name = "get_weekly_lunch_menu",
        description = "Find the weekly lunch menu of a restaurant from its website's root URL. Follows the first link whose text mentions 'lunch' and splits that page into Monday to Friday menus (Swedish weekday names unless `days` is given). Days that cannot be read are left out."
    )]
    pub async fn get_weekly_lunch_menu(
        &self,
        Parameters(params): Parameters<GetWeeklyLunchMenuParams>,
    ) -> Result<String, McpError> {
        let finder = self.finder_for(params.options)?;

        let menu = finder
            .get_weekly_lunch_menu(&params.url)
            .await
            .inspect_err(|e| log::error!("Failed to find lunch menu: {e}"))
            .map_err(|e| McpError::internal_error(format!("Failed to find lunch menu: {e}"), None))?;

        let json = serde_json::to_string_pretty(&menu).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize lunch menu: {e}"), None)
        })?;

        Ok(json)
    }

    #[tool(
        name = "get_weekly_lunch_menus",
        description = "Find weekly lunch menus for several restaurants at once. Each URL is looked up independently; failures are reported per URL instead of failing the whole call."
    )]
    pub async fn get_weekly_lunch_menus(
        &self,
        Parameters(params): Parameters<GetWeeklyLunchMenusParams>,
    ) -> Result<String, McpError> {
        if params.urls.is_empty() {
            return Err(McpError::invalid_params("`urls` must not be empty", None));
        }
        let finder = self.finder_for(params.options)?;
        let concurrency = params
            .concurrency
            .unwrap_or(DEFAULT_CONCURRENCY)
            .clamp(1, MAX_CONCURRENCY);

        let results = finder
            .get_weekly_lunch_menus(&params.urls, concurrency as usize)
            .await;

        let entries: Vec<BatchEntry> = results
            .iter()
            .map(|(url, result)| BatchEntry::new(url, result))
            .collect();

        let json = serde_json::to_string_pretty(&entries).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize lunch menus: {e}"), None)
        })?;

        Ok(json)
    }

    #[tool(
        name = "find_lunch_links",
        description = "List the links on a restaurant's page whose text contains the keyword ('lunch' by default), resolved to absolute URLs in page order. The first one is what get_weekly_lunch_menu follows."
    )]
    pub async fn find_lunch_links(
        &self,
        Parameters(params): Parameters<FindLunchLinksParams>,
    ) -> Result<String, McpError> {
        let finder = self.finder_for(FinderOptions {
            keyword: params.keyword,
            ..Default::default()
        })?;

        let links = finder
            .find_lunch_links(&params.url)
            .await
            .inspect_err(|e| log::error!("Failed to fetch links: {e}"))
            .map_err(|e| McpError::internal_error(format!("Failed to fetch links: {e}"), None))?;

        let json = serde_json::to_string_pretty(&links).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize links: {e}"), None)
        })?;

        Ok(json)
    }
}

#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct FinderOptions {
    /// Weekday labels, Monday first. Defaults to Swedish.
    days: Option<Vec<String>>,
    /// Text a link must contain to be taken as the lunch page.
    keyword: Option<String>,
    /// Read the menu from the given page itself when it links to no lunch page.
    #[serde(default)]
    root_fallback: bool,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWeeklyLunchMenuParams {
    url: String,
    #[serde(flatten)]
    options: FinderOptions,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct GetWeeklyLunchMenusParams {
    urls: Vec<String>,
    concurrency: Option<u16>,
    #[serde(flatten)]
    options: FinderOptions,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct FindLunchLinksParams {
    url: String,
    keyword: Option<String>,
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(include_str!("./instructions.md").to_string()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server() -> McpServer {
        McpServer::new().expect("Failed to create server")
    }

    #[test]
    fn test_params_accept_flattened_options() {
        let params: GetWeeklyLunchMenuParams = serde_json::from_value(serde_json::json!({
            "url": "https://krogen.example.se/",
            "keyword": "meny",
            "root_fallback": true
        }))
        .unwrap();

        assert_eq!(params.url, "https://krogen.example.se/");
        assert_eq!(params.options.keyword.as_deref(), Some("meny"));
        assert!(params.options.root_fallback);
        assert!(params.options.days.is_none());
    }

    #[test]
    fn test_finder_for_applies_overrides() {
        let finder = server()
            .finder_for(FinderOptions {
                days: Some(
                    ["mandag", "tirsdag", "onsdag", "torsdag", "fredag"]
                        .map(String::from)
                        .to_vec(),
                ),
                keyword: Some("frokost".to_string()),
                root_fallback: true,
            })
            .expect("Should accept overrides");

        let config = finder.config();
        assert_eq!(config.days[0].label, "mandag");
        assert_eq!(config.link_keyword, "frokost");
        assert!(config.root_page_fallback);
    }

    #[test]
    fn test_finder_for_rejects_bad_vocabulary() {
        let result = server().finder_for(FinderOptions {
            days: Some(vec!["måndag".to_string()]),
            ..Default::default()
        });
        assert!(result.is_err());
    }
}
