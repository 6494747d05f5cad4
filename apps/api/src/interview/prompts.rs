// All LLM prompt constants for the interview module.
// Question generation and score explanations only; scoring itself never
// touches the LLM.

/// System prompt for question generation. Enforces JSON-array-only output.
pub const QUESTION_GEN_SYSTEM: &str = "You are an experienced technical interviewer. \
    Generate realistic interview questions for the requested role and level. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Question generation prompt template.
/// Replace `{role}`, `{difficulty}`, `{count}` before sending.
pub const QUESTION_GEN_PROMPT_TEMPLATE: &str = r#"Generate {count} interview questions for a {difficulty} {role} candidate.

Return a JSON ARRAY with this EXACT schema (no extra fields):
[
  {
    "question": "Explain how you would design a rate limiter for a public API.",
    "expected_concepts": ["token bucket", "sliding window", "throttling"]
  }
]

Rules:
- Each question must be answerable verbally in 2-4 minutes.
- "expected_concepts" lists 2-4 short keywords or phrases a strong answer
  would mention. Keep them lowercase and concrete.
- Mix conceptual and practical questions appropriate for the level.
- Do not number the questions inside the text."#;

/// System prompt for score explanations. Plain prose, not JSON.
pub const EXPLAIN_SYSTEM: &str = "You are a supportive interview coach. \
    Explain an answer's score in 2-3 encouraging, specific sentences. \
    Respond with plain text only — no lists, no markup.";

/// Explanation prompt template.
/// Replace `{question}`, `{answer}`, `{score}`, `{rationale}` before sending.
pub const EXPLAIN_PROMPT_TEMPLATE: &str = r#"The candidate was asked:
{question}

They answered:
{answer}

The rubric scored this {score}/100 because: {rationale}

Explain the score to the candidate and name the single most valuable improvement."#;
