// src/extraction/job_description.rs
use tracing::{debug, info, warn};

use super::dom::{DomAccess, Lookup};
use super::read_probe;
use super::selectors::SelectorStrategy;
use crate::errors::ScrapeError;
use crate::utils::char_len;

/// Shorter matches are labels or headings, not the posting body.
pub const MIN_DESCRIPTION_CHARS: usize = 100;

pub fn is_description(text: &str) -> bool {
    char_len(text) > MIN_DESCRIPTION_CHARS
}

pub async fn extract<D: DomAccess + ?Sized>(
    strategy: &SelectorStrategy,
    hostname: &str,
    dom: &D,
) -> Result<Lookup<String>, ScrapeError> {
    for probe in strategy.job_description_probes(hostname) {
        let candidates = read_probe(dom, &probe).await?;

        if let Some(text) = candidates
            .iter()
            .map(|text| text.trim())
            .find(|text| is_description(text))
        {
            info!(
                "Job description found via {:?} selector '{}' ({} chars)",
                probe.source,
                probe.selector,
                char_len(text)
            );
            return Ok(Lookup::Found(text.to_string()));
        }

        if !candidates.is_empty() {
            debug!(
                "Selector '{}' matched {} element(s), all under {} chars",
                probe.selector,
                candidates.len(),
                MIN_DESCRIPTION_CHARS
            );
        }
    }

    warn!("No job description found on {}", hostname);
    Ok(Lookup::NotFound)
}
