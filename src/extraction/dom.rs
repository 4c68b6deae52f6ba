// src/extraction/dom.rs
//! Page access capability injected into the extractor

use async_trait::async_trait;

use crate::errors::ScrapeError;

/// Explicit "absent" result, distinct from a present-but-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    Found(T),
    NotFound,
}

impl<T> Lookup<T> {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::NotFound => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Self::Found(value) => Lookup::Found(value),
            Self::NotFound => Lookup::NotFound,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Self::Found(value) => Lookup::Found(f(value)),
            Self::NotFound => Lookup::NotFound,
        }
    }
}

impl<T: Default> Lookup<T> {
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Found(value),
            None => Self::NotFound,
        }
    }
}

/// DOM primitives. Implementations report `Err` only when the access itself
/// fails (blocked frame, detached document, timeout); a selector that matches
/// nothing is `Lookup::NotFound` or an empty list.
///
/// Not `Send`: a document handle lives on the thread that created it.
#[async_trait(?Send)]
pub trait DomAccess {
    /// Text of the first element matching `selector`.
    async fn query_text(&self, selector: &str) -> Result<Lookup<String>, ScrapeError>;

    /// Text of every element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<String>, ScrapeError>;

    /// Suspend for `duration_ms` so UI-driven content can render.
    async fn wait_ms(&self, duration_ms: u64) -> Result<(), ScrapeError>;

    /// Click-equivalent on the first element matching `selector`.
    /// Returns `false` when nothing matched.
    async fn trigger_action(&self, selector: &str) -> Result<bool, ScrapeError>;
}
