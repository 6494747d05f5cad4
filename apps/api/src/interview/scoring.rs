//! Answer Scorer: heuristic rubric turning a cleaned answer into a
//! `QuestionAnalysis`.
//!
//! Five weighted sub-scores summed and capped at 100:
//! 1. concept coverage: (mentioned / expected) × 40, flat 30 when the
//!    question lists no concepts ("mentioned" = case-insensitive substring)
//! 2. depth: min(20, words/15 × 10)
//! 3. examples bonus: +15 on any exemplar phrase
//! 4. structure bonus: +10 on any enumeration marker
//! 5. vocabulary bonus: +15 on any keyword from the per-role table
//!
//! Pure computation over the inputs plus static tables. No I/O, no LLM.

use crate::models::interview::{
    CorrectnessTier, Question, QuestionAnalysis, Role, ScoreBreakdown,
};

const CONCEPT_WEIGHT: f64 = 40.0;
const NO_CONCEPT_FLAT: f64 = 30.0;
const DEPTH_CAP: f64 = 20.0;
const DEPTH_WORDS_PER_POINT_BLOCK: f64 = 15.0;
const EXAMPLES_BONUS: f64 = 15.0;
const STRUCTURE_BONUS: f64 = 10.0;
const VOCABULARY_BONUS: f64 = 15.0;

/// Phrases signalling the answer grounds itself in a concrete example.
const EXEMPLAR_PHRASES: &[&str] = &[
    "for example",
    "for instance",
    "such as",
    "e.g.",
    "in my experience",
    "when i worked",
    "in a project",
];

/// Markers signalling an enumerated or stepwise structure.
const STRUCTURE_MARKERS: &[&str] = &[
    "first", "second", "third", "finally", "1.", "2.", "3.", "step", "to begin",
];

/// Answers shorter than this read as too brief to show depth.
const BRIEF_WORD_COUNT: usize = 20;
/// Answers longer than this read as rambling.
const VERBOSE_WORD_COUNT: usize = 150;

pub fn score_answer(question: &Question, cleaned_answer: &str, role: &Role) -> QuestionAnalysis {
    let answer = cleaned_answer.trim();
    if answer.is_empty() {
        return empty_answer_analysis(question);
    }

    let lower = answer.to_lowercase();
    let word_count = answer.split_whitespace().count();

    let mut covered = Vec::new();
    let mut missing = Vec::new();
    for concept in &question.expected_concepts {
        if lower.contains(&concept.to_lowercase()) {
            covered.push(concept.clone());
        } else {
            missing.push(concept.clone());
        }
    }

    let concepts = if question.expected_concepts.is_empty() {
        NO_CONCEPT_FLAT
    } else {
        (covered.len() as f64 / question.expected_concepts.len() as f64) * CONCEPT_WEIGHT
    };
    let depth = ((word_count as f64 / DEPTH_WORDS_PER_POINT_BLOCK) * 10.0).min(DEPTH_CAP);
    let has_examples = EXEMPLAR_PHRASES.iter().any(|p| lower.contains(p));
    let has_structure = STRUCTURE_MARKERS.iter().any(|m| lower.contains(m));
    let has_vocabulary = role_vocabulary(role).iter().any(|k| lower.contains(k));

    let breakdown = ScoreBreakdown {
        concepts,
        depth,
        examples: if has_examples { EXAMPLES_BONUS } else { 0.0 },
        structure: if has_structure { STRUCTURE_BONUS } else { 0.0 },
        vocabulary: if has_vocabulary { VOCABULARY_BONUS } else { 0.0 },
    };
    let score = breakdown.total();
    let tier = CorrectnessTier::from_score(score);

    let strengths = build_strengths(tier, &covered, has_examples, has_structure, word_count);
    let weaknesses = build_weaknesses(
        tier,
        role,
        &missing,
        has_examples,
        has_structure,
        word_count,
    );
    let rationale = build_rationale(question, &covered, has_examples, word_count);

    QuestionAnalysis {
        question_id: question.id,
        score,
        tier,
        strengths,
        weaknesses,
        missing_concepts: missing,
        rationale,
        breakdown,
        word_count,
    }
}

fn empty_answer_analysis(question: &Question) -> QuestionAnalysis {
    QuestionAnalysis {
        question_id: question.id,
        score: 0,
        tier: CorrectnessTier::Incorrect,
        strengths: Vec::new(),
        weaknesses: vec!["No answer was given".to_string()],
        missing_concepts: question.expected_concepts.clone(),
        rationale: "No answer given.".to_string(),
        breakdown: ScoreBreakdown::default(),
        word_count: 0,
    }
}

fn build_strengths(
    tier: CorrectnessTier,
    covered: &[String],
    has_examples: bool,
    has_structure: bool,
    word_count: usize,
) -> Vec<String> {
    let mut strengths = Vec::new();
    if !covered.is_empty() {
        strengths.push(format!("Addressed key concepts: {}", covered.join(", ")));
    }
    if has_examples {
        strengths.push("Grounded the answer in concrete examples".to_string());
    }
    if has_structure {
        strengths.push("Organized the answer into clear steps".to_string());
    }
    if word_count >= 60 {
        strengths.push("Gave a detailed, in-depth answer".to_string());
    }
    if tier == CorrectnessTier::Correct {
        strengths.push("Demonstrated solid command of the topic".to_string());
    }
    strengths
}

fn build_weaknesses(
    tier: CorrectnessTier,
    role: &Role,
    missing: &[String],
    has_examples: bool,
    has_structure: bool,
    word_count: usize,
) -> Vec<String> {
    let mut weaknesses = Vec::new();
    if !missing.is_empty() {
        weaknesses.push(format!("Did not mention: {}", missing.join(", ")));
    }
    if !has_examples {
        weaknesses.push("No concrete examples to back the answer".to_string());
    }
    if word_count < BRIEF_WORD_COUNT {
        weaknesses.push("Answer was too brief to demonstrate depth".to_string());
    } else if word_count > VERBOSE_WORD_COUNT {
        weaknesses.push("Answer rambled; a tighter response lands better".to_string());
    }
    if tier != CorrectnessTier::Correct && !has_structure {
        weaknesses.push("Lacked a clear structure (no enumeration or steps)".to_string());
    }
    if tier == CorrectnessTier::Incorrect {
        for concept in missing {
            weaknesses.push(concept_explanation(role, concept));
        }
    }
    weaknesses
}

/// Deterministic, templated summary, not natural-language generation.
fn build_rationale(
    question: &Question,
    covered: &[String],
    has_examples: bool,
    word_count: usize,
) -> String {
    let coverage_clause = if question.expected_concepts.is_empty() {
        "No specific concepts were expected for this question.".to_string()
    } else {
        format!(
            "Covered {} of {} expected concepts.",
            covered.len(),
            question.expected_concepts.len()
        )
    };
    let example_clause = if has_examples {
        "Good use of concrete examples."
    } else {
        "Adding a concrete example would strengthen the answer."
    };
    let length_clause = if word_count < BRIEF_WORD_COUNT {
        "The answer was brief; aim for more depth."
    } else if word_count > VERBOSE_WORD_COUNT {
        "The answer was verbose; tighten it up."
    } else {
        "Good level of detail."
    };
    format!("{coverage_clause} {example_clause} {length_clause}")
}

/// Technical vocabulary rewarded per role. `Custom` roles use the general
/// table rather than guessing a track from the free-text label.
fn role_vocabulary(role: &Role) -> &'static [&'static str] {
    match role {
        Role::Frontend => &[
            "component",
            "render",
            "dom",
            "css",
            "accessibility",
            "state management",
            "bundle",
            "responsive",
        ],
        Role::Backend => &[
            "api",
            "database",
            "cache",
            "queue",
            "index",
            "transaction",
            "latency",
            "microservice",
        ],
        Role::Fullstack => &[
            "api",
            "component",
            "database",
            "deployment",
            "rest",
            "frontend",
            "backend",
            "integration",
        ],
        Role::DataScience => &[
            "model",
            "data",
            "feature",
            "training",
            "overfitting",
            "regression",
            "neural",
            "statistic",
        ],
        Role::Devops => &[
            "pipeline",
            "container",
            "kubernetes",
            "deploy",
            "monitoring",
            "infrastructure",
            "rollback",
            "terraform",
        ],
        Role::Mobile => &[
            "lifecycle",
            "native",
            "offline",
            "battery",
            "push notification",
            "ui thread",
            "app store",
            "memory",
        ],
        Role::Custom(_) => &[
            "algorithm",
            "complexity",
            "design",
            "architecture",
            "performance",
            "testing",
            "trade-off",
            "scalab",
        ],
    }
}

/// One-line review pointer for a concept the answer missed. Role-specific
/// entries for the static bank's concepts, generic template otherwise.
fn concept_explanation(role: &Role, concept: &str) -> String {
    let table: &[(&str, &str)] = match role {
        Role::Frontend => &[
            (
                "virtual dom",
                "The virtual DOM lets frameworks diff UI trees cheaply before touching the real DOM",
            ),
            (
                "reconciliation",
                "Reconciliation is how a framework decides which DOM nodes to update after a re-render",
            ),
            (
                "critical rendering path",
                "The critical rendering path is the browser pipeline from HTML/CSS to pixels; shortening it speeds first paint",
            ),
        ],
        Role::Backend => &[
            (
                "index",
                "Database indexes trade write cost for fast lookups; know when a query can use one",
            ),
            (
                "idempotency",
                "Idempotent endpoints can be retried safely, which matters for unreliable networks",
            ),
            (
                "cache invalidation",
                "Cache invalidation determines when stale data is evicted; stale reads are its failure mode",
            ),
        ],
        Role::DataScience => &[
            (
                "overfitting",
                "Overfitting is when a model memorizes training noise and fails to generalize",
            ),
            (
                "bias",
                "Bias is systematic error from an overly simple model; high bias underfits",
            ),
            (
                "variance",
                "Variance is sensitivity to the training sample; high variance overfits",
            ),
        ],
        Role::Devops => &[
            (
                "blue-green deployment",
                "Blue-green deployments switch traffic between two identical environments for zero-downtime releases",
            ),
            (
                "observability",
                "Observability is inferring internal state from logs, metrics, and traces",
            ),
        ],
        _ => &[],
    };

    let concept_lower = concept.to_lowercase();
    for (key, explanation) in table {
        if concept_lower == *key {
            return explanation.to_string();
        }
    }
    format!(
        "Review '{concept}' — interviewers expect a {} to be able to speak to it",
        role.label()
    )
}
