// src/resume/fields.rs
//! Field-level extraction passes applied to section buffers

use once_cell::sync::Lazy;
use regex::Regex;

use crate::utils::{char_len, contains_ignore_case};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4}").expect("valid phone regex")
});

// "Capitalized, Capitalized" on a single line, e.g. "San Francisco, CA"
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z][A-Za-z.'-]*(?:[ ][A-Z][A-Za-z.'-]*)*,[ \t]*[A-Z][A-Za-z.'-]*(?:[ ][A-Z][A-Za-z.'-]*)*")
        .expect("valid location regex")
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:[a-z]{2,3}\.)?linkedin\.com/in/[A-Za-z0-9_%-]+/?")
        .expect("valid linkedin regex")
});

static DIGIT_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{3,}").expect("valid digit regex"));

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:university|college|institute|school|academy)\b")
        .expect("valid institution regex")
});

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i:\b(?:bachelor|master|associate|diploma))|\b(?:B\.Sc?|M\.Sc?|Ph\.D|MBA)")
        .expect("valid degree regex")
});

static CATEGORY_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9 &/+.()'-]{0,40}:\s*").expect("valid label regex")
});

static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\u{2022}\u{25AA}\u{25CF}\u{2013}*-]+\s*").expect("valid bullet regex"));

/// Location candidates containing one of these come from education lines.
const LOCATION_EXCLUSIONS: [&str; 7] = [
    "University",
    "College",
    "Bachelor",
    "Master",
    "Ph.D",
    "High School",
    "Experience",
];

const MIN_SKILL_LEN: usize = 2;
const MAX_SKILL_LEN: usize = 29;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin_url: String,
}

/// Contact details from the header lines: first match wins for each field.
pub fn extract_contact(header: &[String]) -> ContactInfo {
    let joined = header.join("\n");

    let email = EMAIL_RE
        .find(&joined)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = PHONE_RE
        .find(&joined)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let linkedin_url = LINKEDIN_RE
        .find(&joined)
        .map(|m| m.as_str().trim_end_matches('/').to_string())
        .unwrap_or_default();

    ContactInfo {
        email,
        phone,
        location: extract_location(header),
        linkedin_url,
    }
}

fn extract_location(header: &[String]) -> String {
    header
        .iter()
        .flat_map(|line| LOCATION_RE.find_iter(line))
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            !LOCATION_EXCLUSIONS
                .iter()
                .any(|keyword| candidate.contains(keyword))
        })
        .map(str::to_string)
        .unwrap_or_default()
}

/// Pick the candidate's name from the header lines.
///
/// Disqualification rules run in this order: contains "@", contains a run of
/// three or more digits, mentions "linkedin", contains the extracted location.
/// The first surviving line with 2-4 words and an uppercase first letter wins.
/// Without a winner the first header line is returned as-is.
pub fn extract_name(header: &[String], location: &str) -> String {
    let candidate = header.iter().find(|line| {
        if line.contains('@') {
            return false;
        }
        if DIGIT_RUN_RE.is_match(line) {
            return false;
        }
        if contains_ignore_case(line, "linkedin") {
            return false;
        }
        if !location.is_empty() && line.contains(location) {
            return false;
        }

        let words = line.split_whitespace().count();
        (2..=4).contains(&words) && line.chars().next().is_some_and(char::is_uppercase)
    });

    candidate
        .or_else(|| header.first())
        .cloned()
        .unwrap_or_default()
}

pub fn is_institution_line(line: &str) -> bool {
    INSTITUTION_RE.is_match(line)
}

pub fn is_degree_line(line: &str) -> bool {
    DEGREE_RE.is_match(line)
}

/// (university, degree) from education lines. Each field takes the first
/// line matching its keyword set; when neither set matches anything, the
/// first two lines are used positionally.
pub fn extract_degree_university(education: &[String]) -> (String, String) {
    let university = education.iter().find(|line| is_institution_line(line));
    let degree = education.iter().find(|line| is_degree_line(line));

    if university.is_none() && degree.is_none() {
        return (
            education.first().cloned().unwrap_or_default(),
            education.get(1).cloned().unwrap_or_default(),
        );
    }

    (
        university.cloned().unwrap_or_default(),
        degree.cloned().unwrap_or_default(),
    )
}

/// Flatten skill lines into "A, B, C".
pub fn normalize_skills<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .flat_map(|line| {
            let line = BULLET_RE.replace(line.as_ref().trim(), "");
            let line = CATEGORY_LABEL_RE.replace(&line, "").into_owned();
            line.split(',')
                .map(|token| token.trim().to_string())
                .collect::<Vec<_>>()
        })
        .filter(|token| {
            let len = char_len(token);
            (MIN_SKILL_LEN..=MAX_SKILL_LEN).contains(&len)
                && !contains_ignore_case(token, "experience")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn contact_extraction_takes_first_matches() {
        let header = lines(&[
            "Jane Doe",
            "jane.doe@example.com | (555) 123-4567",
            "Austin, TX",
            "linkedin.com/in/janedoe",
        ]);
        let contact = extract_contact(&header);
        assert_eq!(contact.email, "jane.doe@example.com");
        assert_eq!(contact.phone, "(555) 123-4567");
        assert_eq!(contact.location, "Austin, TX");
        assert_eq!(contact.linkedin_url, "linkedin.com/in/janedoe");
    }

    #[test]
    fn email_is_the_exact_token() {
        let header = lines(&["Contact: jane_doe+jobs@mail.example.org."]);
        assert_eq!(extract_contact(&header).email, "jane_doe+jobs@mail.example.org");
    }

    #[test]
    fn location_skips_education_lines() {
        let header = lines(&["Springfield University, Springfield", "Portland, OR"]);
        assert_eq!(extract_contact(&header).location, "Portland, OR");

        let header = lines(&["Master of Science, Stanford University"]);
        assert_eq!(extract_contact(&header).location, "");
    }

    #[test]
    fn name_rules_apply_in_order() {
        let header = lines(&[
            "jane@example.com",
            "555-123-4567",
            "LinkedIn Profile Page",
            "Austin, TX",
            "Jane Q Doe",
        ]);
        assert_eq!(extract_name(&header, "Austin, TX"), "Jane Q Doe");
    }

    #[test]
    fn name_requires_word_count_and_capital() {
        let header = lines(&["resume", "jane doe", "Senior Staff Software Engineer Lead", "Jane Doe"]);
        assert_eq!(extract_name(&header, ""), "Jane Doe");
    }

    #[test]
    fn name_falls_back_to_first_header_line() {
        let header = lines(&["JANEDOE", "jane@example.com"]);
        assert_eq!(extract_name(&header, ""), "JANEDOE");
        assert_eq!(extract_name(&[], ""), "");
    }

    #[test]
    fn degree_and_university_by_keyword() {
        let education = lines(&[
            "Springfield University",
            "Bachelor of Science in Computer Science",
        ]);
        assert_eq!(
            extract_degree_university(&education),
            (
                "Springfield University".to_string(),
                "Bachelor of Science in Computer Science".to_string()
            )
        );
    }

    #[test]
    fn degree_and_university_are_independent() {
        let education = lines(&["M.Sc Data Science", "2019 - 2021", "Shelbyville Institute of Technology"]);
        let (university, degree) = extract_degree_university(&education);
        assert_eq!(university, "Shelbyville Institute of Technology");
        assert_eq!(degree, "M.Sc Data Science");

        let education = lines(&["Coursework in algorithms", "MBA, 2020"]);
        assert_eq!(
            extract_degree_university(&education),
            (String::new(), "MBA, 2020".to_string())
        );
    }

    #[test]
    fn degree_and_university_positional_fallback() {
        let education = lines(&["Springfield Tech", "BA History", "2010"]);
        assert_eq!(
            extract_degree_university(&education),
            ("Springfield Tech".to_string(), "BA History".to_string())
        );
        assert_eq!(extract_degree_university(&[]), (String::new(), String::new()));
    }

    #[test]
    fn skills_strip_labels_and_normalize() {
        assert_eq!(normalize_skills(&["Languages: Python, Go,  Rust "]), "Python, Go, Rust");
    }

    #[test]
    fn skills_filter_short_long_and_experience_tokens() {
        let skills = normalize_skills(&[
            "• C, Rust, Kubernetes",
            "Tools: 3 years experience with Docker, a-really-long-token-that-keeps-going",
            "Frameworks: Axum, Tokio,",
        ]);
        assert_eq!(skills, "Rust, Kubernetes, Axum, Tokio");
    }
}
