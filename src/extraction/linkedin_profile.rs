// src/extraction/linkedin_profile.rs
//! LinkedIn profile page -> partial Profile. Every probe tolerates absence;
//! only a failing page-access primitive aborts the extraction.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::dom::{DomAccess, Lookup};
use super::first_text;
use super::selectors::LinkedInSelectors;
use super::PageContext;
use crate::errors::ScrapeError;
use crate::resume::fields::{is_degree_line, is_institution_line, normalize_skills};
use crate::types::Profile;
use crate::utils::{clean_lines, host_matches};

const SUMMARY_HEADERS: [&str; 2] = ["About", "Summary"];
const EXPERIENCE_HEADERS: [&str; 1] = ["Experience"];
const EDUCATION_HEADERS: [&str; 1] = ["Education"];
const PROJECTS_HEADERS: [&str; 1] = ["Projects"];
const SKILLS_HEADERS: [&str; 1] = ["Skills"];

pub async fn extract<D: DomAccess + ?Sized>(
    selectors: &LinkedInSelectors,
    settle_delay_ms: u64,
    context: &PageContext,
    dom: &D,
) -> Result<Profile, ScrapeError> {
    if !host_matches(&context.hostname, "linkedin.com") {
        warn!(
            "Profile extraction on non-LinkedIn host {}, results may be sparse",
            context.hostname
        );
    }

    let mut profile = Profile {
        full_name: first_text(dom, &selectors.name).await?.unwrap_or_default(),
        location: first_text(dom, &selectors.location).await?.unwrap_or_default(),
        ..Default::default()
    };

    let sections = read_sections(dom, &selectors.sections).await?;
    profile.summary = section_body(&sections, &SUMMARY_HEADERS).join("\n");
    profile.email = probe_email(dom, selectors, settle_delay_ms).await?;
    profile.experience = section_body(&sections, &EXPERIENCE_HEADERS).join("\n");

    let education = section_body(&sections, &EDUCATION_HEADERS);
    let (university, degree) = pair_university_degree(&education);
    profile.education = education.join("\n");
    profile.university = university;
    profile.degree = degree;

    profile.projects = section_body(&sections, &PROJECTS_HEADERS).join("\n");
    profile.skills = probe_skills(dom, selectors, settle_delay_ms, &sections).await?;
    profile.linkedin_url = profile_url(context).unwrap_or_default();

    profile.normalize();
    profile.scraped_profile = digest(&profile);

    info!(
        "Extracted LinkedIn profile fields: {}",
        profile.filled_fields().join(", ")
    );
    Ok(profile)
}

/// Open the contact-info overlay if there is one, let it render, then read
/// the email link.
async fn probe_email<D: DomAccess + ?Sized>(
    dom: &D,
    selectors: &LinkedInSelectors,
    settle_delay_ms: u64,
) -> Result<String, ScrapeError> {
    for trigger in &selectors.contact_info_trigger {
        if dom.trigger_action(trigger).await? {
            debug!("Opened contact info via '{}'", trigger);
            dom.wait_ms(settle_delay_ms).await?;
            break;
        }
    }

    let email = match first_text(dom, &selectors.contact_email).await? {
        Lookup::Found(text) => text.trim_start_matches("mailto:").trim().to_string(),
        Lookup::NotFound => return Ok(String::new()),
    };

    if email.contains('@') {
        Ok(email)
    } else {
        debug!("Discarding contact email candidate without '@'");
        Ok(String::new())
    }
}

/// Skill names, after expanding the skills panel when an expander exists.
/// Falls back to the Skills section body.
async fn probe_skills<D: DomAccess + ?Sized>(
    dom: &D,
    selectors: &LinkedInSelectors,
    settle_delay_ms: u64,
    sections: &[Vec<String>],
) -> Result<String, ScrapeError> {
    for expander in &selectors.skills_expand {
        if dom.trigger_action(expander).await? {
            debug!("Expanded skills via '{}'", expander);
            dom.wait_ms(settle_delay_ms).await?;
            break;
        }
    }

    for selector in &selectors.skills_items {
        let items = dom.query_all(selector).await?;
        if items.is_empty() {
            continue;
        }
        let mut seen = HashSet::new();
        let unique: Vec<String> = items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| seen.insert(item.clone()))
            .collect();
        return Ok(normalize_skills(&unique));
    }

    Ok(normalize_skills(&section_body(sections, &SKILLS_HEADERS)))
}

/// Text lines of every section container, from the first selector that matches any.
async fn read_sections<D: DomAccess + ?Sized>(
    dom: &D,
    selectors: &[String],
) -> Result<Vec<Vec<String>>, ScrapeError> {
    for selector in selectors {
        let sections = dom.query_all(selector).await?;
        if !sections.is_empty() {
            return Ok(sections.iter().map(|text| clean_lines(text)).collect());
        }
    }
    Ok(Vec::new())
}

/// Body lines of the first section whose heading is one of `headers`.
/// Repeated heading lines (visually hidden duplicates) are dropped.
pub fn section_body(sections: &[Vec<String>], headers: &[&str]) -> Vec<String> {
    let is_header = |line: &str| headers.iter().any(|h| line.eq_ignore_ascii_case(h));

    sections
        .iter()
        .find(|lines| lines.first().is_some_and(|first| is_header(first.as_str())))
        .map(|lines| {
            lines
                .iter()
                .skip_while(|line| is_header(line.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

/// (university, degree): an institution line directly followed by a degree
/// line, otherwise the first two lines in order.
pub fn pair_university_degree(education: &[String]) -> (String, String) {
    education
        .windows(2)
        .find(|pair| is_institution_line(&pair[0]) && is_degree_line(&pair[1]))
        .map(|pair| (pair[0].clone(), pair[1].clone()))
        .unwrap_or_else(|| {
            (
                education.first().cloned().unwrap_or_default(),
                education.get(1).cloned().unwrap_or_default(),
            )
        })
}

fn profile_url(context: &PageContext) -> Option<String> {
    let url = context.url.as_deref()?;
    if !host_matches(&context.hostname, "linkedin.com") || !url.contains("/in/") {
        return None;
    }
    let url = url.split(['?', '#']).next().unwrap_or(url);
    Some(url.trim_end_matches('/').to_string())
}

/// Plain-text digest of the probed fields, kept alongside the structured ones.
fn digest(profile: &Profile) -> String {
    [
        ("Name", &profile.full_name),
        ("Location", &profile.location),
        ("Email", &profile.email),
        ("About", &profile.summary),
        ("Experience", &profile.experience),
        ("Education", &profile.education),
        ("Skills", &profile.skills),
        ("Projects", &profile.projects),
    ]
    .iter()
    .filter(|(_, value)| !value.is_empty())
    .map(|(label, value)| format!("{}: {}", label, value))
    .collect::<Vec<_>>()
    .join("\n\n")
}
