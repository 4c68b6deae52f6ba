// src/extraction/questions.rs
//! Application question extraction: site/generic pass, then a permissive
//! pass over every text-bearing element when the first pass comes up short.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::dom::{DomAccess, Lookup};
use super::read_probe;
use super::selectors::{Probe, SelectorStrategy};
use crate::errors::ScrapeError;
use crate::utils::{char_len, clean_text};

/// A first pass yielding fewer questions than this triggers the permissive pass.
pub const MIN_FIRST_PASS: usize = 2;
/// The permissive pass stops once the list holds this many questions.
pub const MAX_QUESTIONS: usize = 10;

const MIN_QUESTION_CHARS: usize = 5;
const MAX_QUESTION_CHARS: usize = 300;

static QUESTION_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:why|describe|tell|explain|experience|motivation|interest(?:ed|s)?|salary|availability|available|start\s+date|sponsorship|visa|relocate|authorized|years)\b",
    )
    .expect("valid question keyword regex")
});

/// Whitespace-collapsed text without trailing required-field markers.
pub fn normalize_candidate(text: &str) -> String {
    clean_text(text)
        .trim_end_matches(|c: char| c == '*' || c.is_whitespace())
        .to_string()
}

pub fn is_question(text: &str) -> bool {
    let len = char_len(text);
    (MIN_QUESTION_CHARS..=MAX_QUESTION_CHARS).contains(&len)
        && (text.contains('?') || QUESTION_KEYWORDS.is_match(text))
}

/// Accepted questions in first-seen order, deduplicated by exact text.
#[derive(Debug, Default)]
pub struct QuestionList {
    seen: HashSet<String>,
    questions: Vec<String>,
}

impl QuestionList {
    /// Returns true when `raw` qualified and was new.
    pub fn offer(&mut self, raw: &str) -> bool {
        let text = normalize_candidate(raw);
        if !is_question(&text) || self.seen.contains(&text) {
            return false;
        }
        self.seen.insert(text.clone());
        self.questions.push(text);
        true
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.questions
    }
}

pub async fn extract<D: DomAccess + ?Sized>(
    strategy: &SelectorStrategy,
    hostname: &str,
    dom: &D,
) -> Result<Lookup<Vec<String>>, ScrapeError> {
    let mut list = QuestionList::default();

    for probe in strategy.question_probes(hostname) {
        collect(dom, &probe, &mut list, usize::MAX, false).await?;
    }
    debug!("First question pass on {} found {}", hostname, list.len());

    if list.len() < MIN_FIRST_PASS {
        for probe in strategy.permissive_question_probes() {
            if list.len() >= MAX_QUESTIONS {
                break;
            }
            collect(dom, &probe, &mut list, MAX_QUESTIONS, true).await?;
        }
        debug!("Permissive question pass brought total to {}", list.len());
    }

    if list.is_empty() {
        warn!("No application questions found on {}", hostname);
        return Ok(Lookup::NotFound);
    }

    info!("Found {} application question(s) on {}", list.len(), hostname);
    Ok(Lookup::Found(list.into_vec()))
}

/// With `single_line`, candidates spanning several lines are containers of
/// other candidates and are skipped.
async fn collect<D: DomAccess + ?Sized>(
    dom: &D,
    probe: &Probe<'_>,
    list: &mut QuestionList,
    cap: usize,
    single_line: bool,
) -> Result<(), ScrapeError> {
    for text in read_probe(dom, probe).await? {
        if list.len() >= cap {
            break;
        }
        if single_line && text.trim().contains('\n') {
            continue;
        }
        list.offer(&text);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::{FakeDom, HtmlPage};

    #[test]
    fn filter_accepts_question_marks_and_keywords() {
        assert!(is_question("Why do you want this job?"));
        assert!(is_question("Desired salary"));
        assert!(is_question("Will you now or in the future require sponsorship"));
        assert!(is_question("Earliest start date"));
        assert!(!is_question("First name"));
        assert!(!is_question("Submit application"));
        assert!(!is_question("?"));
    }

    #[test]
    fn keywords_match_whole_words_only() {
        assert!(!is_question("Upload your Curriculum Whyte file"));
        assert!(is_question("Tell us about yourself"));
    }

    #[test]
    fn required_markers_are_stripped() {
        assert_eq!(normalize_candidate("  Why Acme?\n *"), "Why Acme?");
    }

    #[tokio::test]
    async fn duplicate_questions_are_listed_once() {
        let dom = FakeDom::new().with(
            "label",
            &["Why do you want this job?", "Why do you want this job?", "Describe a project you led"],
        );
        let result = extract(&SelectorStrategy::default(), "careers.example.org", &dom)
            .await
            .unwrap();
        assert_eq!(
            result,
            Lookup::Found(vec![
                "Why do you want this job?".to_string(),
                "Describe a project you led".to_string()
            ])
        );
    }

    #[tokio::test]
    async fn duplicate_questions_in_real_markup() {
        let html = r#"
            <form>
              <label>Why do you want this job?</label>
              <label>Why do you want this job?</label>
              <label>Email</label>
            </form>"#;
        let page = HtmlPage::parse(html);
        let questions = extract(&SelectorStrategy::default(), "example.org", &page)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions, ["Why do you want this job?"]);
    }

    #[tokio::test]
    async fn site_selectors_take_priority() {
        let dom = FakeDom::new()
            .with(
                "#custom_fields label",
                &["Are you authorized to work in the US?", "Why Acme?"],
            )
            .with("label", &["Do you need a visa?"]);
        let questions = extract(&SelectorStrategy::default(), "boards.greenhouse.io", &dom)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions, ["Are you authorized to work in the US?", "Why Acme?"]);
    }

    #[tokio::test]
    async fn permissive_pass_runs_when_first_pass_is_short() {
        let dom = FakeDom::new()
            .with("label", &["Why do you want this job?"])
            .with("p", &["Tell us about a hard bug.", "We are an equal opportunity employer."])
            .with("div", &["Why do you want this job?"]);
        let questions = extract(&SelectorStrategy::default(), "example.org", &dom)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions, ["Why do you want this job?", "Tell us about a hard bug."]);
    }

    #[tokio::test]
    async fn permissive_pass_skips_containers_of_other_questions() {
        let html = r#"
            <div>
              <label>Why do you want to join?</label>
              <p>Tell us about a project</p>
            </div>"#;
        let page = HtmlPage::parse(html);
        let questions = extract(&SelectorStrategy::default(), "example.org", &page)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions, ["Why do you want to join?", "Tell us about a project"]);
    }

    #[tokio::test]
    async fn permissive_pass_is_capped() {
        let many: Vec<String> = (0..25).map(|i| format!("Question number {}?", i)).collect();
        let many: Vec<&str> = many.iter().map(String::as_str).collect();
        let dom = FakeDom::new().with("li", &many);
        let questions = extract(&SelectorStrategy::default(), "example.org", &dom)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions.len(), MAX_QUESTIONS);
        assert_eq!(questions[0], "Question number 0?");
    }

    #[tokio::test]
    async fn permissive_pass_skipped_when_first_pass_suffices() {
        let dom = FakeDom::new()
            .with("label", &["Why us?", "Salary expectations"])
            .with("p", &["Tell us anything else?"]);
        let questions = extract(&SelectorStrategy::default(), "example.org", &dom)
            .await
            .unwrap()
            .unwrap_or_default();
        assert_eq!(questions, ["Why us?", "Salary expectations"]);
    }

    #[tokio::test]
    async fn nothing_qualifying_is_not_found() {
        let dom = FakeDom::new().with("label", &["First name", "Last name"]);
        let result = extract(&SelectorStrategy::default(), "example.org", &dom)
            .await
            .unwrap();
        assert_eq!(result, Lookup::NotFound);
    }
}
