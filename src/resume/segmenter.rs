// src/resume/segmenter.rs
//! Line classification state machine: flat resume text -> section buffers

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Header,
    Summary,
    Experience,
    Education,
    Skills,
    Projects,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Header,
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::Skills,
        Section::Projects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Summary => "summary",
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
            Self::Projects => "projects",
        }
    }
}

// Order matters: the first matching pattern wins.
static HEADER_PATTERNS: Lazy<Vec<(Section, Regex)>> = Lazy::new(|| {
    [
        (
            Section::Summary,
            r"(?i)^(?:professional[\s-]+)?(?:summary|profile|objective|about[\s-]+me)\s*:?$",
        ),
        (
            Section::Experience,
            r"(?i)^(?:(?:work|professional)[\s-]+experience|experience|employment(?:[\s-]+history)?|career(?:[\s-]+history)?)\s*:?$",
        ),
        (
            Section::Education,
            r"(?i)^(?:education|academic[\s-]+background|qualifications)\s*:?$",
        ),
        (
            Section::Skills,
            r"(?i)^(?:(?:technical[\s-]+)?skills|competencies|technologies)\s*:?$",
        ),
        (
            Section::Projects,
            r"(?i)^(?:(?:personal|selected)[\s-]+)?projects\s*:?$",
        ),
    ]
    .into_iter()
    .map(|(section, pattern)| (section, Regex::new(pattern).expect("valid header regex")))
    .collect()
});

/// Outcome of feeding one line to the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The line was a section header; the machine moves to this state.
    Transition(Section),
    /// The line belongs to the body of this section.
    Append(Section),
}

/// Finite-state classifier over resume lines. There is no terminal state:
/// every state can move to any section whose header pattern matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionClassifier;

impl SectionClassifier {
    /// Header patterns that leave `from`. Every state shares the same table.
    pub fn transitions(&self, _from: Section) -> &'static [(Section, Regex)] {
        HEADER_PATTERNS.as_slice()
    }

    /// Section named by a header line, if the whole line is a header.
    pub fn header_section(&self, line: &str) -> Option<Section> {
        let line = line.trim();
        self.transitions(Section::Header)
            .iter()
            .find(|(_, pattern)| pattern.is_match(line))
            .map(|(section, _)| *section)
    }

    pub fn step(&self, state: Section, line: &str) -> Step {
        let line = line.trim();
        match self
            .transitions(state)
            .iter()
            .find(|(_, pattern)| pattern.is_match(line))
        {
            Some((next, _)) => Step::Transition(*next),
            None => Step::Append(state),
        }
    }
}

/// Accumulated lines per section, built once per parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionBuffer {
    sections: BTreeMap<Section, Vec<String>>,
}

impl SectionBuffer {
    pub fn push(&mut self, section: Section, line: &str) {
        self.sections
            .entry(section)
            .or_default()
            .push(line.to_string());
    }

    pub fn lines(&self, section: Section) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Section body with a trailing newline after every line.
    pub fn text(&self, section: Section) -> String {
        self.lines(section)
            .iter()
            .map(|line| format!("{}\n", line))
            .collect()
    }

    pub fn is_empty(&self, section: Section) -> bool {
        self.lines(section).is_empty()
    }
}

/// Run the state machine over `text`. The final state is discarded.
pub fn segment(text: &str) -> SectionBuffer {
    let classifier = SectionClassifier;
    let mut buffer = SectionBuffer::default();
    let mut state = Section::Header;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        match classifier.step(state, line) {
            Step::Transition(next) => state = next,
            Step::Append(current) => buffer.push(current, line),
        }
    }

    buffer
}
