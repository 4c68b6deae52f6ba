// src/extraction/mod.rs
//! Page -> job description, application questions, or LinkedIn profile fields

pub mod dom;
#[cfg(test)]
pub mod fake;
pub mod html_page;
pub mod job_description;
pub mod linkedin_profile;
pub mod questions;
pub mod selectors;

pub use dom::{DomAccess, Lookup};
#[cfg(test)]
pub use fake::FakeDom;
pub use html_page::{HtmlPage, PageFetcher};
pub use selectors::{LinkedInSelectors, Probe, ProbeSource, QueryMode, SelectorStrategy, SiteSelectors};

use tracing::info;

use crate::errors::ScrapeError;
use crate::types::Profile;
use crate::utils::clean_text;

/// Wait after expanding a hidden panel before reading it.
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1500;

/// What the extractor knows about the page besides its DOM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub hostname: String,
    pub url: Option<String>,
}

impl PageContext {
    pub fn new(hostname: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            url: None,
        }
    }

    pub fn from_url(url: &str) -> Result<Self, ScrapeError> {
        Ok(Self {
            hostname: html_page::hostname_of(url)?,
            url: Some(url.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    JobDescription,
    Questions,
    LinkedInProfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSignal {
    JobDescription(Lookup<String>),
    Questions(Lookup<Vec<String>>),
    Profile(Profile),
}

pub struct PageSignalExtractor {
    strategy: SelectorStrategy,
    settle_delay_ms: u64,
}

impl Default for PageSignalExtractor {
    fn default() -> Self {
        Self::new(SelectorStrategy::default(), DEFAULT_SETTLE_DELAY_MS)
    }
}

impl PageSignalExtractor {
    pub fn new(strategy: SelectorStrategy, settle_delay_ms: u64) -> Self {
        Self {
            strategy,
            settle_delay_ms,
        }
    }

    pub fn strategy(&self) -> &SelectorStrategy {
        &self.strategy
    }

    pub async fn extract<D: DomAccess + ?Sized>(
        &self,
        mode: ExtractionMode,
        context: &PageContext,
        dom: &D,
    ) -> Result<PageSignal, ScrapeError> {
        info!("Extracting {:?} from {}", mode, context.hostname);
        match mode {
            ExtractionMode::JobDescription => self
                .job_description(context, dom)
                .await
                .map(PageSignal::JobDescription),
            ExtractionMode::Questions => self
                .questions(context, dom)
                .await
                .map(PageSignal::Questions),
            ExtractionMode::LinkedInProfile => self
                .linkedin_profile(context, dom)
                .await
                .map(PageSignal::Profile),
        }
    }

    pub async fn job_description<D: DomAccess + ?Sized>(
        &self,
        context: &PageContext,
        dom: &D,
    ) -> Result<Lookup<String>, ScrapeError> {
        job_description::extract(&self.strategy, &context.hostname, dom).await
    }

    pub async fn questions<D: DomAccess + ?Sized>(
        &self,
        context: &PageContext,
        dom: &D,
    ) -> Result<Lookup<Vec<String>>, ScrapeError> {
        questions::extract(&self.strategy, &context.hostname, dom).await
    }

    pub async fn linkedin_profile<D: DomAccess + ?Sized>(
        &self,
        context: &PageContext,
        dom: &D,
    ) -> Result<Profile, ScrapeError> {
        linkedin_profile::extract(
            &self.strategy.linkedin_profile,
            self.settle_delay_ms,
            context,
            dom,
        )
        .await
    }
}

/// Raw candidate texts for one probe.
pub(crate) async fn read_probe<D: DomAccess + ?Sized>(
    dom: &D,
    probe: &Probe<'_>,
) -> Result<Vec<String>, ScrapeError> {
    match probe.mode {
        QueryMode::First => Ok(dom.query_text(probe.selector).await?.found().into_iter().collect()),
        QueryMode::All => dom.query_all(probe.selector).await,
    }
}

/// First selector whose first element has non-blank text, whitespace-collapsed.
pub(crate) async fn first_text<D: DomAccess + ?Sized>(
    dom: &D,
    selectors: &[String],
) -> Result<Lookup<String>, ScrapeError> {
    for selector in selectors {
        if let Lookup::Found(text) = dom.query_text(selector).await? {
            let text = clean_text(&text);
            if !text.is_empty() {
                return Ok(Lookup::Found(text));
            }
        }
    }
    Ok(Lookup::NotFound)
}
