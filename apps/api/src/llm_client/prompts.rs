// Cross-cutting prompt fragments. Each component that calls the model keeps
// its own prompts.rs alongside it.

/// Appended to prompts that run in JSON response mode.
pub const JSON_ONLY_INSTRUCTION: &str = "\
    Respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";
