// Prompt constants for the resume pipeline.

/// Name extraction prompt. Replace `{text}` before sending.
pub const NAME_EXTRACTION_PROMPT: &str = r#"List every person's name that appears in the resume text below, in order of first appearance.
Do not include company, school, product or place names.

Return a JSON object with this EXACT schema:
{"names": ["Jane Doe"]}

Return {"names": []} if no person is named.

Resume text:
{text}"#;
