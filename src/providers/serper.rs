//! Web search (Serper.dev) and page scraping backends for the
//! capability provider interface.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ProviderError;

use super::{CapabilityProvider, ProviderResult, SearchHit};

const SERPER_API_URL: &str = "https://google.serper.dev/search";
const HTTP_TIMEOUT_SECS: u64 = 20;

/// Cap on extracted page text handed back to workers.
const MAX_PAGE_TEXT: usize = 8_000;

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

fn parse_search_response(body: &str) -> ProviderResult<Vec<SearchHit>> {
    let response: SerperResponse = serde_json::from_str(body)?;
    Ok(response
        .organic
        .into_iter()
        .map(|o| SearchHit {
            title: o.title,
            url: o.link,
            snippet: o.snippet,
        })
        .collect())
}

/// Extract readable text from an HTML document: headings, paragraphs
/// and list items, joined with newlines and truncated to a sane size.
fn extract_text(html: &str) -> String {
    let document = Html::parse_document(html);
    // selector literals are valid, parse cannot fail
    let selector = Selector::parse("h1, h2, h3, p, li").unwrap();

    let mut text = String::new();
    for element in document.select(&selector) {
        let fragment: String = element.text().collect::<Vec<_>>().join(" ");
        let trimmed = fragment.split_whitespace().collect::<Vec<_>>().join(" ");
        if trimmed.is_empty() {
            continue;
        }
        text.push_str(&trimmed);
        text.push('\n');
        if text.len() >= MAX_PAGE_TEXT {
            // truncate on a char boundary, a raw byte cut can split a
            // multibyte character
            let mut cut = MAX_PAGE_TEXT;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            break;
        }
    }
    text
}

pub struct SerperSearch {
    client: Client,
    api_key: String,
}

impl SerperSearch {
    pub fn new(api_key: String) -> ProviderResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ProviderError::Auth("search API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, api_key })
    }

    pub async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>> {
        debug!("Searching for: {}", query);

        let response = self
            .client
            .post(SERPER_API_URL)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "q": query }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::Auth(format!("search provider: HTTP {}", status)),
                429 => ProviderError::RateLimit,
                _ => ProviderError::Rejected(format!("search provider: HTTP {}", status)),
            });
        }

        parse_search_response(&body)
    }
}

pub struct PageScraper {
    client: Client,
}

impl PageScraper {
    pub fn new() -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36")
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    pub async fn scrape(&self, url: &str) -> ProviderResult<String> {
        debug!("Scraping page: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Rejected(format!(
                "scrape target returned HTTP {}",
                status
            )));
        }

        let html = response.text().await?;
        let text = extract_text(&html);
        if text.is_empty() {
            warn!("No readable text extracted from {}", url);
        }
        Ok(text)
    }
}

/// Combined search + scrape backend handed to the coordinator.
pub struct WebCapabilityProvider {
    search: SerperSearch,
    scraper: PageScraper,
}

impl WebCapabilityProvider {
    pub fn new(search_api_key: String) -> ProviderResult<Self> {
        Ok(Self {
            search: SerperSearch::new(search_api_key)?,
            scraper: PageScraper::new()?,
        })
    }
}

#[async_trait]
impl CapabilityProvider for WebCapabilityProvider {
    async fn search(&self, query: &str) -> ProviderResult<Vec<SearchHit>> {
        self.search.search(query).await
    }

    async fn scrape(&self, url: &str) -> ProviderResult<String> {
        self.scraper.scrape(url).await
    }
}
