// src/resume/mod.rs
//! Resume text -> Profile

pub mod fields;
pub mod segmenter;

pub use segmenter::{segment, Section, SectionBuffer, SectionClassifier, Step};

use tracing::{debug, info, warn};

use crate::errors::ParseError;
use crate::types::Profile;
use crate::utils::collapse_blank_lines;

pub struct ResumeSegmenter;

impl ResumeSegmenter {
    /// Parse flat resume text (already decoded from PDF/DOCX/TXT) into a profile.
    ///
    /// Deterministic: the same text always yields the same profile. A resume
    /// without section headers is not an error; only the header-derived
    /// fields are filled in that case.
    pub fn parse(text: &str) -> Result<Profile, ParseError> {
        if text.trim().is_empty() {
            warn!("Resume text is empty");
            return Err(ParseError::EmptyInput);
        }

        let buffer = segment(text);
        for section in Section::ALL {
            debug!(
                "Section {}: {} line(s)",
                section.as_str(),
                buffer.lines(section).len()
            );
        }

        let profile = Self::build_profile(&buffer);
        if profile.is_blank() {
            warn!("Resume text produced no extractable fields");
            return Err(ParseError::NoContent);
        }

        info!(
            "Parsed resume into profile with fields: {}",
            profile.filled_fields().join(", ")
        );
        Ok(profile)
    }

    fn build_profile(buffer: &SectionBuffer) -> Profile {
        let header = buffer.lines(Section::Header);
        let contact = fields::extract_contact(header);
        let full_name = fields::extract_name(header, &contact.location);
        let (university, degree) =
            fields::extract_degree_university(buffer.lines(Section::Education));

        let mut profile = Profile {
            full_name,
            email: contact.email,
            phone: contact.phone,
            location: contact.location,
            linkedin_url: contact.linkedin_url,
            summary: buffer.text(Section::Summary),
            experience: collapse_blank_lines(&buffer.text(Section::Experience)),
            education: buffer.text(Section::Education),
            degree,
            university,
            skills: fields::normalize_skills(buffer.lines(Section::Skills)),
            projects: collapse_blank_lines(&buffer.text(Section::Projects)),
            ..Default::default()
        };
        profile.normalize();
        profile
    }
}
