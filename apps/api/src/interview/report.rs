//! Session Aggregator: folds per-question analyses into one `SessionReport`.
//!
//! Idempotent given identical inputs; no hidden state.

use crate::models::interview::{
    CorrectnessTier, KnowledgeLevel, QuestionAnalysis, SessionReport, TierCounts,
};

/// Flattened strength/weakness/concept lists are truncated to this length.
const MAX_REPORT_ITEMS: usize = 5;
/// Suggestions are padded to at least 3 and truncated to 5.
const MIN_SUGGESTIONS: usize = 3;
const MAX_SUGGESTIONS: usize = 5;

const GENERIC_SUGGESTIONS: &[&str] = &[
    "Practice answering out loud to build fluency before the real interview",
    "Rehearse a few stories from past work you can reuse across questions",
    "Review the fundamentals of your target role and revisit weak areas",
];

pub fn aggregate(analyses: &[QuestionAnalysis]) -> SessionReport {
    if analyses.is_empty() {
        return empty_report();
    }

    let overall_score = {
        let sum: u32 = analyses.iter().map(|a| a.score).sum();
        ((sum as f64) / (analyses.len() as f64)).round() as u32
    };

    let tier_counts = TierCounts {
        correct: count_tier(analyses, CorrectnessTier::Correct),
        partial: count_tier(analyses, CorrectnessTier::Partial),
        incorrect: count_tier(analyses, CorrectnessTier::Incorrect),
    };

    let strengths = dedup_truncate(analyses.iter().flat_map(|a| a.strengths.iter()));
    let weaknesses = dedup_truncate(analyses.iter().flat_map(|a| a.weaknesses.iter()));
    let missing_concepts =
        dedup_truncate(analyses.iter().flat_map(|a| a.missing_concepts.iter()));

    let avg_word_count =
        analyses.iter().map(|a| a.word_count).sum::<usize>() as f64 / analyses.len() as f64;
    let knowledge_level = classify_knowledge(overall_score, avg_word_count);

    let suggestions = build_suggestions(analyses);

    SessionReport {
        overall_score,
        tier_counts,
        strengths,
        weaknesses,
        missing_concepts,
        suggestions,
        knowledge_level,
        per_question: analyses.to_vec(),
    }
}

fn empty_report() -> SessionReport {
    SessionReport {
        overall_score: 0,
        tier_counts: TierCounts::default(),
        strengths: Vec::new(),
        weaknesses: Vec::new(),
        missing_concepts: Vec::new(),
        suggestions: GENERIC_SUGGESTIONS
            .iter()
            .take(MIN_SUGGESTIONS)
            .map(|s| s.to_string())
            .collect(),
        knowledge_level: KnowledgeLevel::Beginner,
        per_question: Vec::new(),
    }
}

fn count_tier(analyses: &[QuestionAnalysis], tier: CorrectnessTier) -> usize {
    analyses.iter().filter(|a| a.tier == tier).count()
}

/// Order-preserving dedup (first occurrence wins), truncated to 5.
fn dedup_truncate<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if out.len() == MAX_REPORT_ITEMS {
            break;
        }
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Both the score bar AND the depth bar must clear for a tier; otherwise
/// fall through to the next lower one.
fn classify_knowledge(overall_score: u32, avg_word_count: f64) -> KnowledgeLevel {
    if overall_score >= 85 && avg_word_count >= 60.0 {
        KnowledgeLevel::Expert
    } else if overall_score >= 70 && avg_word_count >= 40.0 {
        KnowledgeLevel::Advanced
    } else if overall_score >= 50 && avg_word_count >= 20.0 {
        KnowledgeLevel::Intermediate
    } else {
        KnowledgeLevel::Beginner
    }
}

fn build_suggestions(analyses: &[QuestionAnalysis]) -> Vec<String> {
    let mut suggestions: Vec<String> = Vec::new();

    if analyses.iter().any(|a| a.tier == CorrectnessTier::Incorrect) {
        suggestions.push(
            "Go back over the concepts you missed and explain each one in your own words"
                .to_string(),
        );
    }
    if analyses.iter().any(|a| a.breakdown.examples == 0.0) {
        suggestions.push(
            "Work a concrete example into every answer (\"for example, when I...\")".to_string(),
        );
    }
    if analyses.iter().any(|a| a.word_count > 0 && a.word_count < 20) {
        suggestions
            .push("Elaborate on short answers — aim for at least a few sentences".to_string());
    }

    for generic in GENERIC_SUGGESTIONS {
        if suggestions.len() >= MIN_SUGGESTIONS {
            break;
        }
        suggestions.push(generic.to_string());
    }
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}
