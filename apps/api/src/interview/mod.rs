//! Interview Assistant — question generation and answer scoring, one chat
//! completion each.
//!
//! Malformed model output is not an error: question lists that do not parse
//! come back empty, and evaluations without a JSON object come back as
//! `{"raw": <reply>}`.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{ChatModel, ResponseFormat};

pub mod handlers;
pub mod prompts;

use prompts::{evaluation_prompt, questions_prompt};

/// Questions requested per generation call.
pub const DEFAULT_QUESTION_COUNT: usize = 3;

/// Sub-score keys every evaluation should carry.
pub const RUBRIC_KEYS: &[&str] = &["correctness", "clarity", "completeness"];
const MIN_SCORE: i64 = 1;
const MAX_SCORE: i64 = 5;

// First `{` through last `}`, across lines.
static RE_JSON_SPAN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

static RE_NUMBER_MARKER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d+\s*[.)]?\s*").ok());

/// Result of scoring one answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Evaluation {
    /// The JSON object the model produced, unchanged.
    Scored(Value),
    /// The full reply when no JSON object could be parsed from it.
    Raw { raw: String },
}

/// Asks for `n` numbered questions and keeps only the lines that start with a
/// digit, minus their number marker. No check that exactly `n` came back.
pub async fn generate_questions(
    llm: &dyn ChatModel,
    title: &str,
    level: &str,
    competencies: &[String],
    n: usize,
) -> Result<Vec<String>, AppError> {
    let prompt = questions_prompt(title, level, competencies, n);
    let reply = llm
        .complete(&prompt, ResponseFormat::Text)
        .await
        .map_err(|e| AppError::Llm(format!("Question generation failed: {e}")))?;
    Ok(parse_numbered_list(&reply))
}

/// Scores `answer_text` against `reference_points`.
pub async fn evaluate_answer(
    llm: &dyn ChatModel,
    answer_text: &str,
    reference_points: &[String],
) -> Result<Evaluation, AppError> {
    let prompt = evaluation_prompt(answer_text, reference_points);
    let reply = llm
        .complete(&prompt, ResponseFormat::JsonObject)
        .await
        .map_err(|e| AppError::Llm(format!("Answer evaluation failed: {e}")))?;
    Ok(parse_evaluation(&reply))
}

pub fn parse_numbered_list(reply: &str) -> Vec<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(|c: char| c.is_ascii_digit()))
        .map(strip_number_marker)
        .filter(|q| !q.is_empty())
        .collect()
}

fn strip_number_marker(line: &str) -> String {
    match RE_NUMBER_MARKER.as_ref() {
        Some(re) => re.replace(line, "").trim().to_string(),
        None => line.to_string(),
    }
}

pub fn parse_evaluation(reply: &str) -> Evaluation {
    let parsed = RE_JSON_SPAN
        .as_ref()
        .and_then(|re| re.find(reply))
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok());

    match parsed {
        Some(value) => {
            let issues = rubric_issues(&value);
            if !issues.is_empty() {
                warn!("Evaluation does not match rubric: {}", issues.join("; "));
            }
            Evaluation::Scored(value)
        }
        None => {
            warn!("Evaluation reply held no parseable JSON object");
            Evaluation::Raw {
                raw: reply.to_string(),
            }
        }
    }
}

/// Lists every way `value` departs from the rubric schema.
pub fn rubric_issues(value: &Value) -> Vec<String> {
    let mut issues = Vec::new();

    match value.get("score") {
        Some(score) => check_score("score", score, &mut issues),
        None => issues.push("missing 'score'".to_string()),
    }

    match value.get("breakdown").and_then(Value::as_object) {
        Some(breakdown) => {
            for key in RUBRIC_KEYS {
                match breakdown.get(*key) {
                    Some(score) => check_score(key, score, &mut issues),
                    None => issues.push(format!("missing 'breakdown.{key}'")),
                }
            }
        }
        None => issues.push("missing 'breakdown' object".to_string()),
    }

    if !value.get("explanation").is_some_and(Value::is_string) {
        issues.push("missing 'explanation' text".to_string());
    }

    issues
}

fn check_score(name: &str, score: &Value, issues: &mut Vec<String>) {
    match score.as_i64() {
        Some(s) if (MIN_SCORE..=MAX_SCORE).contains(&s) => {}
        Some(s) => issues.push(format!("'{name}' = {s} outside {MIN_SCORE}-{MAX_SCORE}")),
        None => issues.push(format!("'{name}' is not an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedChat;
    use serde_json::json;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_generate_questions_from_numbered_reply() {
        let chat = ScriptedChat::replying("1. Q1\n2. Q2\n3. Q3");
        let questions = generate_questions(
            &chat,
            "Backend Engineer",
            "mid",
            &strings(&["APIs", "testing"]),
            3,
        )
        .await
        .unwrap();
        assert_eq!(questions, vec!["Q1", "Q2", "Q3"]);

        let prompt = &chat.prompts()[0];
        assert!(prompt.contains("Generate 3 interview questions for a mid Backend Engineer"));
        assert!(prompt.contains("APIs, testing"));
    }

    #[test]
    fn test_non_numbered_lines_dropped() {
        let reply = "Here are your questions:\n- bullet\n1) First?\n\n  2.  Second?\nThanks";
        assert_eq!(parse_numbered_list(reply), vec!["First?", "Second?"]);
    }

    #[test]
    fn test_bullets_only_yield_empty() {
        assert!(parse_numbered_list("- a\n- b\n* c").is_empty());
    }

    #[test]
    fn test_two_digit_markers_stripped() {
        assert_eq!(parse_numbered_list("10. Tenth question"), vec!["Tenth question"]);
    }

    #[tokio::test]
    async fn test_evaluate_returns_parsed_object_unchanged() {
        let object = json!({
            "score": 4,
            "breakdown": {"correctness": 4, "clarity": 5, "completeness": 3},
            "explanation": "Solid answer."
        });
        let reply = format!("Here is the evaluation:\n{object}\nGood luck!");
        let chat = ScriptedChat::replying(&reply);

        let evaluation = evaluate_answer(&chat, "I would add tests", &strings(&["use examples"]))
            .await
            .unwrap();
        assert_eq!(evaluation, Evaluation::Scored(object));
    }

    #[tokio::test]
    async fn test_evaluate_non_json_returns_raw() {
        let reply = "I think the candidate did fine.";
        let chat = ScriptedChat::replying(reply);
        let evaluation = evaluate_answer(&chat, "answer", &[]).await.unwrap();
        assert_eq!(serde_json::to_value(&evaluation).unwrap(), json!({ "raw": reply }));
    }

    #[test]
    fn test_unbalanced_braces_return_raw() {
        let reply = "{\"score\": 4, \"breakdown\": {";
        assert_eq!(
            parse_evaluation(reply),
            Evaluation::Raw {
                raw: reply.to_string()
            }
        );
    }

    #[test]
    fn test_scored_serializes_as_bare_object() {
        let evaluation = Evaluation::Scored(json!({"score": 3}));
        assert_eq!(serde_json::to_value(&evaluation).unwrap(), json!({"score": 3}));
    }

    #[test]
    fn test_rubric_issues_flags_out_of_range_and_missing() {
        let value = json!({
            "score": 9,
            "breakdown": {"correctness": 4, "clarity": "good"},
            "explanation": "ok"
        });
        let issues = rubric_issues(&value);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.contains("'score' = 9")));
        assert!(issues.iter().any(|i| i.contains("'clarity' is not an integer")));
        assert!(issues.iter().any(|i| i.contains("breakdown.completeness")));
    }

    #[test]
    fn test_rubric_accepts_valid_evaluation() {
        let value = json!({
            "score": 5,
            "breakdown": {"correctness": 5, "clarity": 5, "completeness": 5},
            "explanation": "Excellent."
        });
        assert!(rubric_issues(&value).is_empty());
    }

    #[tokio::test]
    async fn test_model_failure_is_llm_error() {
        let chat = ScriptedChat::failing("invalid api key");
        let err = generate_questions(&chat, "QA", "junior", &[], 3).await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
