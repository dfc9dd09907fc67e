//! Person-name recognition for resume text.
//!
//! Recognizers return every person mention in order of appearance; the field
//! extractor handles dedup and truncation.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::NerBackend;
use crate::llm_client::{strip_json_fences, ChatModel, ResponseFormat};
use crate::resumes::prompts::NAME_EXTRACTION_PROMPT;

/// Longest name, in tokens, the heuristic accepts.
const MAX_NAME_TOKENS: usize = 3;
/// Characters of resume text sent to the model for name extraction.
const LLM_TEXT_LIMIT: usize = 6000;

/// Capitalised words that head resume sections or describe roles, places and
/// dates rather than people.
const NON_NAME_WORDS: &[&str] = &[
    "resume", "curriculum", "vitae", "cv", "summary", "profile", "objective", "experience",
    "education", "skills", "projects", "certifications", "languages", "references", "contact",
    "email", "phone", "mobile", "address", "linkedin", "github", "work", "professional",
    "technical", "personal", "senior", "junior", "lead", "principal", "staff", "head", "chief",
    "software", "hardware", "engineer", "engineering", "developer", "development", "manager",
    "management", "director", "analyst", "scientist", "intern", "internship", "consultant",
    "architect", "designer", "specialist", "administrator", "officer", "assistant", "associate",
    "team", "product", "data", "machine", "learning", "cloud", "backend", "frontend", "full",
    "stack", "web", "mobile", "systems", "university", "college", "school", "institute",
    "academy", "bachelor", "bachelors", "master", "masters", "science", "arts", "degree",
    "inc", "llc", "ltd", "corp", "corporation", "company", "group", "street", "avenue", "road",
    "city", "state", "present", "current", "january", "february", "march", "april", "may",
    "june", "july", "august", "september", "october", "november", "december", "jan", "feb",
    "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "the", "and", "of",
    "for", "in", "at", "with", "to", "on", "by", "from",
];

#[async_trait]
pub trait NameRecognizer: Send + Sync {
    async fn recognize(&self, text: &str) -> Result<Vec<String>>;
}

/// Builds the recognizer selected by configuration.
pub fn from_config(backend: NerBackend, llm: Arc<dyn ChatModel>) -> Arc<dyn NameRecognizer> {
    match backend {
        NerBackend::Heuristic => Arc::new(HeuristicNameRecognizer),
        NerBackend::Llm => Arc::new(LlmNameRecognizer::new(llm)),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// HeuristicNameRecognizer — local default
// ────────────────────────────────────────────────────────────────────────────

/// Treats runs of two or three consecutive capitalised words on one line as
/// a person name. Words in `NON_NAME_WORDS` break a run.
pub struct HeuristicNameRecognizer;

#[async_trait]
impl NameRecognizer for HeuristicNameRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<String>> {
        Ok(heuristic_names(text))
    }
}

pub fn heuristic_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for line in text.lines() {
        let mut run: Vec<&str> = Vec::new();
        for raw in line.split_whitespace() {
            let lead_trimmed = raw.trim_start_matches(['(', '"', '\'', '[']);
            let word = lead_trimmed.trim_end_matches([',', '.', ';', ':', ')', '!', '?', '"', ']']);
            let closes_run = word.len() != lead_trimmed.len();

            if is_name_word(word) {
                run.push(word);
                if closes_run {
                    flush_run(&mut run, &mut names);
                }
            } else {
                flush_run(&mut run, &mut names);
            }
        }
        flush_run(&mut run, &mut names);
    }
    names
}

fn flush_run(run: &mut Vec<&str>, names: &mut Vec<String>) {
    if (2..=MAX_NAME_TOKENS).contains(&run.len()) {
        names.push(run.join(" "));
    }
    run.clear();
}

fn is_name_word(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() || word.chars().count() < 2 {
        return false;
    }
    let rest_ok = chars.all(|c| c.is_lowercase() || c == '-' || c == '\'');
    rest_ok && !NON_NAME_WORDS.contains(&word.to_lowercase().as_str())
}

// ────────────────────────────────────────────────────────────────────────────
// LlmNameRecognizer — hosted model
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmNameRecognizer {
    llm: Arc<dyn ChatModel>,
}

impl LlmNameRecognizer {
    pub fn new(llm: Arc<dyn ChatModel>) -> Self {
        Self { llm }
    }
}

#[derive(Deserialize)]
struct NamesReply {
    #[serde(default)]
    names: Vec<String>,
}

#[async_trait]
impl NameRecognizer for LlmNameRecognizer {
    async fn recognize(&self, text: &str) -> Result<Vec<String>> {
        let excerpt: String = text.chars().take(LLM_TEXT_LIMIT).collect();
        let prompt = NAME_EXTRACTION_PROMPT.replace("{text}", &excerpt);
        let reply = self
            .llm
            .complete(&prompt, ResponseFormat::JsonObject)
            .await
            .context("name extraction call failed")?;
        let parsed: NamesReply = serde_json::from_str(strip_json_fences(&reply))
            .context("name extraction reply was not the expected JSON")?;
        Ok(parsed
            .names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect())
    }
}
