// Prompt builders for the interview assistant.

use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

pub fn questions_prompt(title: &str, level: &str, competencies: &[String], n: usize) -> String {
    format!(
        "Generate {n} interview questions for a {level} {title} \
         focused on these competencies: {}. \
         Return ONLY the numbered list of questions.",
        competencies.join(", ")
    )
}

pub fn evaluation_prompt(answer_text: &str, reference_points: &[String]) -> String {
    format!(
        r#"You are an expert interviewer. Given reference points: {refs}
Score the candidate answer on a scale of 1-5 for correctness, clarity, and completeness.
Return strictly this JSON structure:
{{
  "score": int,
  "breakdown": {{
      "correctness": int,
      "clarity": int,
      "completeness": int
  }},
  "explanation": "text"
}}
{JSON_ONLY_INSTRUCTION}
Candidate answer: {answer_text}
"#,
        refs = reference_points.join("; "),
    )
}
