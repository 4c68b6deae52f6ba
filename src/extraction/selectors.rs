// src/extraction/selectors.rs
//! Site selector table. Concrete selectors track third-party markup that
//! changes often, so the table is plain data loadable from config.yaml.
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::host_matches;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSelectors {
    pub name: String,
    /// Registrable domains; subdomains match too.
    pub hosts: Vec<String>,
    #[serde(default)]
    pub job_description: Vec<String>,
    #[serde(default)]
    pub questions: Vec<String>,
}

impl SiteSelectors {
    pub fn matches(&self, hostname: &str) -> bool {
        self.hosts.iter().any(|domain| host_matches(hostname, domain))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInSelectors {
    pub name: Vec<String>,
    pub location: Vec<String>,
    pub contact_info_trigger: Vec<String>,
    pub contact_email: Vec<String>,
    /// Containers searched for section bodies by their header text.
    pub sections: Vec<String>,
    pub skills_expand: Vec<String>,
    pub skills_items: Vec<String>,
}

impl Default for LinkedInSelectors {
    fn default() -> Self {
        Self {
            name: strings(&[
                "h1.text-heading-xlarge",
                ".pv-text-details__left-panel h1",
                ".top-card-layout__title",
                "h1",
            ]),
            location: strings(&[
                ".pv-text-details__left-panel .text-body-small.inline",
                ".top-card__subline-item",
                ".top-card-layout__first-subline .not-first-middot span",
            ]),
            contact_info_trigger: strings(&[
                "#top-card-text-details-contact-info",
                "a[href*='overlay/contact-info']",
            ]),
            contact_email: strings(&[
                ".pv-contact-info__contact-type.ci-email a",
                "section.ci-email a",
                "a[href^='mailto:']",
            ]),
            sections: strings(&["section.artdeco-card", "section"]),
            skills_expand: strings(&[
                "#navigation-index-see-all-skills",
                "a[href*='/details/skills']",
            ]),
            skills_items: strings(&[
                ".pvs-list__paged-list-item .t-bold span[aria-hidden='true']",
                ".pv-skill-category-entity__name-text",
                ".skill-card-skill-topic",
            ]),
        }
    }
}

/// Where a probe's selector came from; used for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeSource<'a> {
    Site(&'a str),
    Generic,
    Permissive,
}

/// How a probe reads the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// First matching element only.
    First,
    /// Every matching element, in document order.
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe<'a> {
    pub source: ProbeSource<'a>,
    pub selector: &'a str,
    pub mode: QueryMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorStrategy {
    /// Configured sites replace the built-in entry of the same name; new
    /// names are appended.
    #[serde(deserialize_with = "merge_with_default_sites")]
    pub sites: Vec<SiteSelectors>,
    pub generic_job_description: Vec<String>,
    pub generic_questions: Vec<String>,
    /// Text-bearing elements scanned by the second question pass.
    pub permissive_questions: Vec<String>,
    pub linkedin_profile: LinkedInSelectors,
}

impl Default for SelectorStrategy {
    fn default() -> Self {
        Self {
            sites: default_sites(),
            generic_job_description: strings(&[
                "[class*='description']",
                "[id*='description']",
                "section",
                "article",
            ]),
            generic_questions: strings(&[
                "label",
                "legend",
                "[class*='question']",
                "[id*='question']",
            ]),
            permissive_questions: strings(&[
                "p", "li", "span", "h2", "h3", "h4", "h5", "h6", "td", "div",
            ]),
            linkedin_profile: LinkedInSelectors::default(),
        }
    }
}

impl SelectorStrategy {
    pub fn site_for(&self, hostname: &str) -> Option<&SiteSelectors> {
        self.sites.iter().find(|site| site.matches(hostname))
    }

    /// Job description probes: the site's primary selectors (first element
    /// each), then the generic fallbacks (every element each).
    pub fn job_description_probes(&self, hostname: &str) -> Vec<Probe<'_>> {
        let mut probes = Vec::new();
        if let Some(site) = self.site_for(hostname) {
            probes.extend(site.job_description.iter().map(|selector| Probe {
                source: ProbeSource::Site(&site.name),
                selector: selector.as_str(),
                mode: QueryMode::First,
            }));
        }
        probes.extend(self.generic_job_description.iter().map(|selector| Probe {
            source: ProbeSource::Generic,
            selector: selector.as_str(),
            mode: QueryMode::All,
        }));
        probes
    }

    /// First-pass question probes: site selectors when the host is known and
    /// has any, otherwise the generic ones.
    pub fn question_probes(&self, hostname: &str) -> Vec<Probe<'_>> {
        let site_probes: Vec<Probe<'_>> = self
            .site_for(hostname)
            .map(|site| {
                site.questions
                    .iter()
                    .map(|selector| Probe {
                        source: ProbeSource::Site(&site.name),
                        selector: selector.as_str(),
                        mode: QueryMode::All,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if !site_probes.is_empty() {
            return site_probes;
        }

        self.generic_questions
            .iter()
            .map(|selector| Probe {
                source: ProbeSource::Generic,
                selector: selector.as_str(),
                mode: QueryMode::All,
            })
            .collect()
    }

    pub fn permissive_question_probes(&self) -> Vec<Probe<'_>> {
        self.permissive_questions
            .iter()
            .map(|selector| Probe {
                source: ProbeSource::Permissive,
                selector: selector.as_str(),
                mode: QueryMode::All,
            })
            .collect()
    }
}

fn default_sites() -> Vec<SiteSelectors> {
    vec![
        SiteSelectors {
            name: "linkedin".to_string(),
            hosts: strings(&["linkedin.com"]),
            job_description: strings(&[
                ".jobs-description__content",
                ".jobs-box__html-content",
                ".jobs-description-content__text",
                ".show-more-less-html__markup",
                "[data-test-id='job-description']",
            ]),
            questions: strings(&[
                ".jobs-easy-apply-form-section__grouping label",
                ".fb-dash-form-element__label",
                "fieldset legend",
            ]),
        },
        SiteSelectors {
            name: "greenhouse".to_string(),
            hosts: strings(&["greenhouse.io"]),
            job_description: strings(&["#content", ".job__description", "#app_body .content"]),
            questions: strings(&["#custom_fields label", ".application-question label"]),
        },
        SiteSelectors {
            name: "lever".to_string(),
            hosts: strings(&["lever.co"]),
            job_description: strings(&[
                "[data-qa='job-description']",
                ".posting-page .section-wrapper",
                ".posting-description",
            ]),
            questions: strings(&[
                ".application-question .application-label",
                ".application-additional label",
            ]),
        },
        SiteSelectors {
            name: "workday".to_string(),
            hosts: strings(&["myworkdayjobs.com", "myworkday.com"]),
            job_description: strings(&["[data-automation-id='jobPostingDescription']"]),
            questions: strings(&[
                "[data-automation-id='formField'] label",
                "[data-automation-id='questionnaire'] label",
            ]),
        },
        SiteSelectors {
            name: "indeed".to_string(),
            hosts: strings(&["indeed.com"]),
            job_description: strings(&["#jobDescriptionText", ".jobsearch-jobDescriptionText"]),
            questions: strings(&[".ia-Questions-item label"]),
        },
        SiteSelectors {
            name: "glassdoor".to_string(),
            hosts: strings(&["glassdoor.com"]),
            job_description: strings(&[
                "[class*='JobDetails_jobDescription']",
                "#JobDescriptionContainer",
            ]),
            questions: Vec::new(),
        },
    ]
}

fn merge_with_default_sites<'de, D>(deserializer: D) -> Result<Vec<SiteSelectors>, D::Error>
where
    D: Deserializer<'de>,
{
    let configured = Vec::<SiteSelectors>::deserialize(deserializer)?;
    let mut sites = default_sites();
    for site in configured {
        match sites.iter_mut().find(|existing| existing.name == site.name) {
            Some(existing) => *existing = site,
            None => sites.push(site),
        }
    }
    Ok(sites)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
