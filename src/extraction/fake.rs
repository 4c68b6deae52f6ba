//! In-memory DomAccess for tests and offline runs.

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::HashMap;

use super::dom::{DomAccess, Lookup};
use crate::errors::ScrapeError;

type Reveal = (String, Vec<String>);

/// A hand-rolled page keyed by selector string.
///
/// Supports:
/// - Fixed text per selector ([`with`](FakeDom::with)).
/// - Content that only renders after an action **and** a wait
///   ([`reveal_on`](FakeDom::reveal_on)), like an expanding panel.
/// - Access failures per selector ([`fail_on`](FakeDom::fail_on)).
/// - Recording of waits and triggered actions.
#[derive(Default)]
pub struct FakeDom {
    elements: RefCell<HashMap<String, Vec<String>>>,
    on_trigger: HashMap<String, Vec<Reveal>>,
    pending: RefCell<Vec<Reveal>>,
    failures: HashMap<String, String>,
    waits: RefCell<Vec<u64>>,
    triggered: RefCell<Vec<String>>,
}

impl FakeDom {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, selector: &str, texts: &[&str]) -> Self {
        self.elements
            .borrow_mut()
            .entry(selector.to_string())
            .or_default()
            .extend(texts.iter().map(|t| t.to_string()));
        self
    }

    /// After `trigger` is actioned, the next wait makes `texts` visible under `selector`.
    pub fn reveal_on(mut self, trigger: &str, selector: &str, texts: &[&str]) -> Self {
        self.on_trigger
            .entry(trigger.to_string())
            .or_default()
            .push((selector.to_string(), texts.iter().map(|t| t.to_string()).collect()));
        self
    }

    /// Any primitive touching `selector` fails with an access error.
    pub fn fail_on(mut self, selector: &str, cause: &str) -> Self {
        self.failures.insert(selector.to_string(), cause.to_string());
        self
    }

    pub fn waits(&self) -> Vec<u64> {
        self.waits.borrow().clone()
    }

    pub fn triggered(&self) -> Vec<String> {
        self.triggered.borrow().clone()
    }

    fn check(&self, selector: &str) -> Result<(), ScrapeError> {
        match self.failures.get(selector) {
            Some(cause) => Err(ScrapeError::Access(cause.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait(?Send)]
impl DomAccess for FakeDom {
    async fn query_text(&self, selector: &str) -> Result<Lookup<String>, ScrapeError> {
        self.check(selector)?;
        Ok(self
            .elements
            .borrow()
            .get(selector)
            .and_then(|texts| texts.first().cloned())
            .into())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<String>, ScrapeError> {
        self.check(selector)?;
        Ok(self
            .elements
            .borrow()
            .get(selector)
            .cloned()
            .unwrap_or_default())
    }

    async fn wait_ms(&self, duration_ms: u64) -> Result<(), ScrapeError> {
        self.waits.borrow_mut().push(duration_ms);
        let pending: Vec<Reveal> = self.pending.borrow_mut().drain(..).collect();
        let mut elements = self.elements.borrow_mut();
        for (selector, texts) in pending {
            elements.entry(selector).or_default().extend(texts);
        }
        Ok(())
    }

    async fn trigger_action(&self, selector: &str) -> Result<bool, ScrapeError> {
        self.check(selector)?;
        if let Some(reveals) = self.on_trigger.get(selector) {
            self.pending.borrow_mut().extend(reveals.iter().cloned());
        } else if !self.elements.borrow().contains_key(selector) {
            return Ok(false);
        }
        self.triggered.borrow_mut().push(selector.to_string());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn revealed_content_needs_trigger_then_wait() {
        let dom = FakeDom::new().reveal_on("button.more", "li.skill", &["Rust"]);
        assert!(dom.query_all("li.skill").await.unwrap().is_empty());

        assert!(dom.trigger_action("button.more").await.unwrap());
        assert!(dom.query_all("li.skill").await.unwrap().is_empty());

        dom.wait_ms(10).await.unwrap();
        assert_eq!(dom.query_all("li.skill").await.unwrap(), ["Rust"]);
        assert_eq!(dom.waits(), [10]);
        assert_eq!(dom.triggered(), ["button.more"]);
    }

    #[tokio::test]
    async fn failures_surface_as_access_errors() {
        let dom = FakeDom::new().fail_on("iframe form", "cross-origin frame");
        let err = dom.query_all("iframe form").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Access(cause) if cause == "cross-origin frame"));
    }

    #[tokio::test]
    async fn missing_trigger_is_not_an_error() {
        let dom = FakeDom::new();
        assert!(!dom.trigger_action("button.more").await.unwrap());
        assert!(dom.triggered().is_empty());
    }
}
