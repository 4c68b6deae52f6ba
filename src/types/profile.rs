// src/types/profile.rs
//! Profile and job posting records shared by the extractor, the segmenter and the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ===== Candidate Profile =====

/// Structured candidate record. Every text field is a plain string; an
/// absent value is the empty string, never a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub experience: String,
    pub education: String,
    pub degree: String,
    pub university: String,
    /// Comma-joined skill list ("Python, Go, Rust")
    pub skills: String,
    pub projects: String,
    pub linkedin_url: String,
    pub scraped_job: String,
    pub scraped_profile: String,
    /// Stamped by the store on save, `None` until the profile is persisted
    pub last_updated: Option<DateTime<Utc>>,
}

impl Profile {
    /// Trim every text field in place.
    pub fn normalize(&mut self) {
        for field in self.text_fields_mut() {
            let trimmed = field.trim();
            if trimmed.len() != field.len() {
                *field = trimmed.to_string();
            }
        }
    }

    /// True when no text field carries any content.
    pub fn is_blank(&self) -> bool {
        self.text_fields().iter().all(|f| f.trim().is_empty())
    }

    /// Names of the fields that hold content, in declaration order.
    pub fn filled_fields(&self) -> Vec<&'static str> {
        Self::FIELD_NAMES
            .iter()
            .zip(self.text_fields())
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect()
    }

    /// The persistence layer refuses profiles without a name or an email.
    pub fn validate_for_save(&self) -> Result<(), AppError> {
        let mut missing = Vec::new();
        if self.full_name.trim().is_empty() {
            missing.push("fullName");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(format!(
                "Profile is missing required field(s): {}",
                missing.join(", ")
            )))
        }
    }

    const FIELD_NAMES: [&'static str; 14] = [
        "fullName",
        "email",
        "phone",
        "location",
        "summary",
        "experience",
        "education",
        "degree",
        "university",
        "skills",
        "projects",
        "linkedinUrl",
        "scrapedJob",
        "scrapedProfile",
    ];

    fn text_fields(&self) -> [&String; 14] {
        [
            &self.full_name,
            &self.email,
            &self.phone,
            &self.location,
            &self.summary,
            &self.experience,
            &self.education,
            &self.degree,
            &self.university,
            &self.skills,
            &self.projects,
            &self.linkedin_url,
            &self.scraped_job,
            &self.scraped_profile,
        ]
    }

    fn text_fields_mut(&mut self) -> [&mut String; 14] {
        [
            &mut self.full_name,
            &mut self.email,
            &mut self.phone,
            &mut self.location,
            &mut self.summary,
            &mut self.experience,
            &mut self.education,
            &mut self.degree,
            &mut self.university,
            &mut self.skills,
            &mut self.projects,
            &mut self.linkedin_url,
            &mut self.scraped_job,
            &mut self.scraped_profile,
        ]
    }
}

// ===== Job Posting =====

/// Scraped job text, held for the duration of one generation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub description: String,
    /// Newline-delimited question strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<String>,
}

impl JobPosting {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            questions: None,
        }
    }

    pub fn with_questions(mut self, questions: &[String]) -> Self {
        self.questions = if questions.is_empty() {
            None
        } else {
            Some(questions.join("\n"))
        };
        self
    }

    /// Question lines, skipping blanks.
    pub fn question_list(&self) -> Vec<&str> {
        self.questions
            .as_deref()
            .map(|q| {
                q.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
