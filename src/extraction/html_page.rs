// src/extraction/html_page.rs
//! Static HTML snapshot as a DomAccess implementation, plus the HTTP fetcher
//! that produces one from a URL.
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use scraper::{ElementRef, Html, Node, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::dom::{DomAccess, Lookup};
use super::PageContext;
use crate::errors::ScrapeError;
use crate::utils::clean_lines;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BLOCK_ELEMENTS: [&str; 24] = [
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "fieldset",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "li", "p",
    "section", "tr",
];

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

// Screen-reader duplicates of visible text
const HIDDEN_CLASSES: [&str; 2] = ["visually-hidden", "sr-only"];

pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    fn select_texts(&self, selector_str: &str) -> Vec<String> {
        let selector = match Selector::parse(selector_str) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("Skipping invalid selector '{}': {}", selector_str, e);
                return Vec::new();
            }
        };

        self.document.select(&selector).map(element_text).collect()
    }
}

/// Visible text of an element. Block-level children sit on their own lines,
/// inline runs are joined, and whitespace is collapsed within each line.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw);
    clean_lines(&raw).join("\n")
}

fn push_text(element: ElementRef<'_>, raw: &mut String) {
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            raw.push_str(text);
        } else if let Some(child) = ElementRef::wrap(child) {
            let el = child.value();
            if SKIPPED_ELEMENTS.contains(&el.name())
                || el.classes().any(|class| HIDDEN_CLASSES.contains(&class))
            {
                continue;
            }

            let block = BLOCK_ELEMENTS.contains(&el.name());
            if block {
                raw.push('\n');
            }
            push_text(child, raw);
            if block {
                raw.push('\n');
            }
        }
    }
}

#[async_trait(?Send)]
impl DomAccess for HtmlPage {
    async fn query_text(&self, selector: &str) -> Result<Lookup<String>, ScrapeError> {
        Ok(self.select_texts(selector).into_iter().next().into())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        Ok(self.select_texts(selector))
    }

    async fn wait_ms(&self, duration_ms: u64) -> Result<(), ScrapeError> {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;
        Ok(())
    }

    async fn trigger_action(&self, selector: &str) -> Result<bool, ScrapeError> {
        // A snapshot has nothing left to expand; report whether the target exists.
        let present = !self.select_texts(selector).is_empty();
        debug!("trigger_action '{}' on static page: present={}", selector, present);
        Ok(present)
    }
}

/// Downloads a page and hands back its snapshot and context.
pub struct PageFetcher {
    client: Client,
    timeout_secs: u64,
}

impl PageFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ScrapeError::Fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    pub async fn fetch(&self, url: &str) -> Result<(PageContext, HtmlPage), ScrapeError> {
        let context = PageContext::from_url(url)?;
        info!("Fetching page: {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ScrapeError::Timeout(self.timeout_secs * 1000)
            } else {
                ScrapeError::Fetch(format!("Failed to fetch {}: {}", url, e))
            }
        })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ScrapeError::Blocked(format!(
                "{} refused access (HTTP {})",
                context.hostname, status
            )));
        }
        if !status.is_success() {
            return Err(ScrapeError::Fetch(format!("HTTP error: {}", status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::Fetch(format!("Failed to read response body: {}", e)))?;

        info!("Fetched {} bytes from {}", html.len(), context.hostname);
        Ok((context, HtmlPage::parse(&html)))
    }
}

/// Hostname of `url`, without the port.
pub fn hostname_of(url: &str) -> Result<String, ScrapeError> {
    let parsed = Url::parse(url).map_err(|e| ScrapeError::Fetch(format!("Invalid URL '{}': {}", url, e)))?;
    parsed
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| ScrapeError::Fetch(format!("URL has no host: {}", url)))
}
