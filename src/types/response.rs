// src/types/response.rs
//! Request and response shapes exchanged with the content generation service

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::profile::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    CoverLetter,
    Questions,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CoverLetter => "cover_letter",
            Self::Questions => "questions",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "cover_letter" | "coverletter" | "letter" => Ok(Self::CoverLetter),
            "questions" | "answers" => Ok(Self::Questions),
            other => Err(format!(
                "Unknown content type: {}. Use cover_letter or questions",
                other
            )),
        }
    }
}

// ===== Generation Request =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    #[serde(rename = "user_profile")]
    pub profile: Profile,
    pub job_description: String,
    pub content_type: ContentType,
    pub questions: Option<String>,
}

// ===== Generation Response =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub generated_content: String,
    /// Seconds spent by the service
    #[serde(default)]
    pub processing_time: f64,
    #[serde(default)]
    pub token_usage: Option<TokenUsage>,
    /// Every other key the service returned (content_type, success, ...)
    #[serde(flatten)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

/// Error body returned by the service on failure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationErrorBody {
    pub error: String,
    #[serde(default)]
    pub detail: Option<String>,
}

impl GenerationErrorBody {
    pub fn message(&self) -> String {
        match self.detail.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(detail) => format!("{}: {}", self.error, detail),
            None => self.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}
