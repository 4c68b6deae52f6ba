// src/errors.rs
//! Error taxonomy. A missing field is never an error: extractors return
//! `Lookup::NotFound` or an empty string for it.

use thiserror::Error;

/// The page-access primitive itself failed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Page access failed: {0}")]
    Access(String),

    #[error("Page access blocked: {0}")]
    Blocked(String),

    #[error("Page did not respond within {0} ms")]
    Timeout(u64),

    #[error("Failed to fetch page: {0}")]
    Fetch(String),
}

/// Resume text could not be turned into a profile.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Resume text is empty")]
    EmptyInput,

    #[error("No extractable content found in resume text")]
    NoContent,
}

/// The content generation service failed or could not be reached.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Content generation service unreachable: {0}")]
    Unreachable(String),

    /// Message as reported by the service.
    #[error("{0}")]
    Failed(String),

    #[error("Invalid response from content generation service: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Scrape(_) => "SCRAPING_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::Generation(_) => "GENERATION_ERROR",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Scrape(ScrapeError::Blocked(_)) => vec![
                "The page does not allow content access from this context".to_string(),
                "Open the posting directly and try again".to_string(),
            ],
            Self::Scrape(_) => vec![
                "Verify the page is accessible and fully loaded".to_string(),
                "The posting may be behind authentication or no longer available".to_string(),
                "Try again".to_string(),
            ],
            Self::Parse(_) => vec![
                "Upload a text-based resume (PDF, DOCX or TXT)".to_string(),
                "Use section headers such as Experience, Education and Skills".to_string(),
                "Fill in the profile manually if parsing keeps failing".to_string(),
            ],
            Self::Generation(_) => vec![
                "The content generation service is temporarily unavailable".to_string(),
                "Try again in a few moments".to_string(),
            ],
            Self::Validation(_) => vec!["Fill in the missing fields and save again".to_string()],
            Self::Storage(_) | Self::Internal(_) => {
                vec!["Try again; previously saved data is unchanged".to_string()]
            }
        }
    }

    /// Short single-line message for a status bar.
    pub fn status_message(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}
