//! Field Extractor — best-effort contact and skill extraction from resume text.
//!
//! Emails, phones and skills come from regular expressions; names come from
//! a `NameRecognizer` and are passed in. No confidence scoring.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Names, emails and phones are truncated to this many entries.
pub const MAX_CONTACT_FIELDS: usize = 3;

/// Fixed skill vocabulary matched case-insensitively on word boundaries.
pub const SKILL_BANK: &[&str] = &[
    "python",
    "sql",
    "pytorch",
    "tensorflow",
    "aws",
    "docker",
    "react",
    "node",
    "java",
    "c++",
];

static RE_EMAIL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[\w.\-]+@[\w.\-]+").ok());

// 9+ characters: a digit, seven or more digits/dashes/whitespace, a digit.
static RE_PHONE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\+?\d[\d\-\s]{7,}\d").ok());

// `\b` cannot bound terms that end in punctuation (c++), so boundaries are
// spelled out as non-word characters or the ends of the text.
static SKILL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SKILL_BANK
        .iter()
        .filter_map(|skill| {
            let pattern = format!(r"(?i)(?:^|[^\w]){}(?:[^\w]|$)", regex::escape(skill));
            Regex::new(&pattern).ok().map(|re| (*skill, re))
        })
        .collect()
});

/// Per-upload extraction output. Serialized into `resumes.parsed_json` and
/// returned from the upload endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub names: Vec<String>,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub skills: Vec<String>,
    pub raw: String,
}

/// Combines recognized `names` with the regex scans over `text`.
pub fn extract_fields(text: &str, names: Vec<String>) -> ExtractionResult {
    ExtractionResult {
        names: truncate(dedup_first_seen(names), MAX_CONTACT_FIELDS),
        emails: truncate(dedup_first_seen(find_emails(text)), MAX_CONTACT_FIELDS),
        phones: truncate(dedup_first_seen(find_phones(text)), MAX_CONTACT_FIELDS),
        skills: find_skills(text),
        raw: text.to_string(),
    }
}

/// Every email-like token in order of appearance. Trailing sentence
/// punctuation is not part of the address.
pub fn find_emails(text: &str) -> Vec<String> {
    let Some(re) = RE_EMAIL.as_ref() else {
        return Vec::new();
    };
    re.find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', '-']).to_string())
        .filter(|email| !email.ends_with('@'))
        .collect()
}

pub fn find_phones(text: &str) -> Vec<String> {
    let Some(re) = RE_PHONE.as_ref() else {
        return Vec::new();
    };
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Skills from `SKILL_BANK` present in `text`, in vocabulary order.
pub fn find_skills(text: &str) -> Vec<String> {
    SKILL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(skill, _)| skill.to_string())
        .collect()
}

/// Removes duplicates, keeping the first occurrence of each value.
pub fn dedup_first_seen(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

fn truncate(mut items: Vec<String>, limit: usize) -> Vec<String> {
    items.truncate(limit);
    items
}
