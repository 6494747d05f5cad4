//! Question Source: supplies role/difficulty-appropriate questions.
//!
//! Two backends: a static per-role bank and LLM generation through
//! `llm_client`. Generation failures of any kind (no API key, network,
//! malformed payload, empty list) fall back to the bank, so question
//! sourcing never fails outright.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::interview::prompts::{QUESTION_GEN_PROMPT_TEMPLATE, QUESTION_GEN_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::models::interview::{Difficulty, Question, Role};

struct BankEntry {
    text: &'static str,
    concepts: &'static [&'static str],
    difficulty: Difficulty,
}

macro_rules! entry {
    ($text:expr, $concepts:expr, $difficulty:expr) => {
        BankEntry {
            text: $text,
            concepts: $concepts,
            difficulty: $difficulty,
        }
    };
}

const FRONTEND_BANK: &[BankEntry] = &[
    entry!(
        "What is the virtual DOM and why do frameworks use it?",
        &["virtual dom", "diffing", "reconciliation"],
        Difficulty::Junior
    ),
    entry!(
        "How would you make a page accessible to screen-reader users?",
        &["aria", "semantic html", "focus"],
        Difficulty::Junior
    ),
    entry!(
        "Walk me through what happens from typing a URL to seeing a page.",
        &["dns", "critical rendering path", "parsing"],
        Difficulty::Mid
    ),
    entry!(
        "How do you decide between local state and a global store?",
        &["state management", "prop drilling", "context"],
        Difficulty::Mid
    ),
    entry!(
        "How would you cut the bundle size of a large single-page app?",
        &["code splitting", "tree shaking", "lazy loading"],
        Difficulty::Senior
    ),
    entry!(
        "Design a component library used by several product teams.",
        &["design tokens", "versioning", "composition"],
        Difficulty::Senior
    ),
];

const BACKEND_BANK: &[BankEntry] = &[
    entry!(
        "What does a database index do, and what does it cost you?",
        &["index", "lookup", "write amplification"],
        Difficulty::Junior
    ),
    entry!(
        "Explain the difference between authentication and authorization.",
        &["authentication", "authorization", "token"],
        Difficulty::Junior
    ),
    entry!(
        "How would you design a rate limiter for a public API?",
        &["token bucket", "sliding window", "throttling"],
        Difficulty::Mid
    ),
    entry!(
        "When would you add a cache, and how do you keep it correct?",
        &["cache invalidation", "ttl", "stale reads"],
        Difficulty::Mid
    ),
    entry!(
        "Design an idempotent payment endpoint that survives retries.",
        &["idempotency", "deduplication", "transaction"],
        Difficulty::Senior
    ),
    entry!(
        "How would you split a monolith into services without downtime?",
        &["strangler pattern", "bounded context", "migration"],
        Difficulty::Senior
    ),
];

const FULLSTACK_BANK: &[BankEntry] = &[
    entry!(
        "How do the frontend and backend agree on an API contract?",
        &["rest", "schema", "versioning"],
        Difficulty::Junior
    ),
    entry!(
        "Where would you validate user input, and why there?",
        &["validation", "client", "server"],
        Difficulty::Junior
    ),
    entry!(
        "Take a form submission end to end: what can fail and where?",
        &["validation", "error handling", "persistence"],
        Difficulty::Mid
    ),
    entry!(
        "How would you add real-time updates to an existing CRUD app?",
        &["websocket", "polling", "push"],
        Difficulty::Mid
    ),
    entry!(
        "Design the deployment story for a web app with a database migration.",
        &["migration", "rollback", "zero downtime"],
        Difficulty::Senior
    ),
    entry!(
        "How do you keep a feature consistent across web and API layers?",
        &["integration", "contract testing", "shared types"],
        Difficulty::Senior
    ),
];

const DATA_SCIENCE_BANK: &[BankEntry] = &[
    entry!(
        "Explain the bias-variance tradeoff.",
        &["bias", "variance", "overfitting"],
        Difficulty::Junior
    ),
    entry!(
        "How do you handle missing values in a dataset?",
        &["imputation", "dropping", "missingness"],
        Difficulty::Junior
    ),
    entry!(
        "How would you detect that a deployed model is degrading?",
        &["drift", "monitoring", "baseline"],
        Difficulty::Mid
    ),
    entry!(
        "Why can accuracy be misleading, and what would you use instead?",
        &["class imbalance", "precision", "recall"],
        Difficulty::Mid
    ),
    entry!(
        "Design an A/B test for a ranking change on a marketplace.",
        &["hypothesis", "significance", "guardrail metrics"],
        Difficulty::Senior
    ),
    entry!(
        "How would you explain a complex model's prediction to a regulator?",
        &["interpretability", "feature importance", "shap"],
        Difficulty::Senior
    ),
];

const DEVOPS_BANK: &[BankEntry] = &[
    entry!(
        "What happens in a CI pipeline between a push and a deploy?",
        &["build", "test", "artifact"],
        Difficulty::Junior
    ),
    entry!(
        "Why run services in containers instead of on the host?",
        &["container", "isolation", "image"],
        Difficulty::Junior
    ),
    entry!(
        "How would you roll out a release with zero downtime?",
        &["blue-green deployment", "canary", "rollback"],
        Difficulty::Mid
    ),
    entry!(
        "A service is slow in production. Where do you start looking?",
        &["observability", "metrics", "tracing"],
        Difficulty::Mid
    ),
    entry!(
        "Design the on-call and incident process for a small platform team.",
        &["alerting", "runbook", "postmortem"],
        Difficulty::Senior
    ),
    entry!(
        "How do you manage infrastructure changes across environments safely?",
        &["infrastructure as code", "drift", "review"],
        Difficulty::Senior
    ),
];

const MOBILE_BANK: &[BankEntry] = &[
    entry!(
        "Walk me through an app's lifecycle when the user backgrounds it.",
        &["lifecycle", "state saving", "background"],
        Difficulty::Junior
    ),
    entry!(
        "Why must long work stay off the UI thread?",
        &["ui thread", "jank", "async"],
        Difficulty::Junior
    ),
    entry!(
        "How would you make an app usable offline?",
        &["offline", "sync", "conflict resolution"],
        Difficulty::Mid
    ),
    entry!(
        "What drains battery in a mobile app and how do you avoid it?",
        &["battery", "wake lock", "polling"],
        Difficulty::Mid
    ),
    entry!(
        "Design push notifications for a chat app across platforms.",
        &["push notification", "delivery", "token refresh"],
        Difficulty::Senior
    ),
    entry!(
        "How do you ship a risky change to an app you cannot hotfix?",
        &["feature flag", "staged rollout", "app store"],
        Difficulty::Senior
    ),
];

/// Fallback bank for `Custom` roles: role-agnostic engineering questions.
const GENERAL_BANK: &[BankEntry] = &[
    entry!(
        "Tell me about a technical decision you later regretted.",
        &["trade-off", "reflection"],
        Difficulty::Junior
    ),
    entry!(
        "How do you decide something is tested well enough to ship?",
        &["testing", "coverage", "risk"],
        Difficulty::Junior
    ),
    entry!(
        "Describe a time you had to debug a problem you did not understand.",
        &["debugging", "hypothesis", "isolation"],
        Difficulty::Mid
    ),
    entry!(
        "How do you evaluate a new technology before adopting it?",
        &["trade-off", "prototype", "maintenance"],
        Difficulty::Mid
    ),
    entry!(
        "Design a system you know well for ten times its current load.",
        &["scalability", "bottleneck", "capacity"],
        Difficulty::Senior
    ),
    entry!(
        "How do you bring a large codebase's architecture back under control?",
        &["architecture", "refactoring", "boundaries"],
        Difficulty::Senior
    ),
];

fn bank_for(role: &Role) -> &'static [BankEntry] {
    match role {
        Role::Frontend => FRONTEND_BANK,
        Role::Backend => BACKEND_BANK,
        Role::Fullstack => FULLSTACK_BANK,
        Role::DataScience => DATA_SCIENCE_BANK,
        Role::Devops => DEVOPS_BANK,
        Role::Mobile => MOBILE_BANK,
        Role::Custom(_) => GENERAL_BANK,
    }
}

/// Builds `count` questions from the static bank, preferring entries at the
/// requested difficulty and cycling when the bank runs short.
pub fn mock_questions(role: &Role, difficulty: Difficulty, count: usize) -> Vec<Question> {
    let bank = bank_for(role);
    let mut ordered: Vec<&BankEntry> = bank
        .iter()
        .filter(|e| e.difficulty == difficulty)
        .collect();
    ordered.extend(bank.iter().filter(|e| e.difficulty != difficulty));

    (0..count)
        .map(|i| {
            let entry = ordered[i % ordered.len()];
            Question::new(entry.text, entry.concepts, entry.difficulty)
        })
        .collect()
}

/// Shape of one generated question in the remote response array.
#[derive(Debug, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    #[serde(default)]
    pub expected_concepts: Vec<String>,
}

/// The remote question backend. Implement this to swap backends without
/// touching the sourcing logic or its callers.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        role: &Role,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, LlmError>;
}

#[async_trait]
impl QuestionGenerator for LlmClient {
    async fn generate(
        &self,
        role: &Role,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>, LlmError> {
        let prompt = QUESTION_GEN_PROMPT_TEMPLATE
            .replace("{count}", &count.to_string())
            .replace("{difficulty}", difficulty.label())
            .replace("{role}", role.label());
        self.call_json_array(&prompt, QUESTION_GEN_SYSTEM).await
    }
}

/// Sources `count` questions, remote-first when a generator is configured.
/// Never fails: every error path degrades to the static bank.
pub async fn source_questions<G>(
    generator: Option<&G>,
    role: &Role,
    difficulty: Difficulty,
    count: usize,
) -> Vec<Question>
where
    G: QuestionGenerator + ?Sized,
{
    if let Some(generator) = generator {
        match generate_remote(generator, role, difficulty, count).await {
            Ok(questions) if !questions.is_empty() => {
                info!("Generated {} questions via LLM", questions.len());
                let mut questions = questions;
                questions.truncate(count);
                if questions.len() < count {
                    let deficit = count - questions.len();
                    questions.extend(mock_questions(role, difficulty, deficit));
                }
                return questions;
            }
            Ok(_) => warn!("LLM returned an empty question list, using the static bank"),
            Err(e) => warn!("Question generation failed ({e}), using the static bank"),
        }
    }
    mock_questions(role, difficulty, count)
}

async fn generate_remote<G>(
    generator: &G,
    role: &Role,
    difficulty: Difficulty,
    count: usize,
) -> Result<Vec<Question>, LlmError>
where
    G: QuestionGenerator + ?Sized,
{
    let generated = generator.generate(role, difficulty, count).await?;

    Ok(generated
        .into_iter()
        .filter(|g| !g.question.trim().is_empty())
        .map(|g| {
            let concepts: Vec<&str> = g.expected_concepts.iter().map(String::as_str).collect();
            Question::new(g.question, &concepts, difficulty)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{extract_json_array, sanitize_text};

    #[test]
    fn test_mock_questions_exact_count() {
        let questions = mock_questions(&Role::Backend, Difficulty::Mid, 5);
        assert_eq!(questions.len(), 5);
    }

    #[test]
    fn test_mock_questions_prefer_requested_difficulty() {
        let questions = mock_questions(&Role::Backend, Difficulty::Senior, 2);
        assert!(questions.iter().all(|q| q.difficulty == Difficulty::Senior));
    }

    #[test]
    fn test_mock_questions_cycle_past_bank_size() {
        let questions = mock_questions(&Role::Frontend, Difficulty::Junior, 10);
        assert_eq!(questions.len(), 10);
        // Cycled entries are fresh Question values with their own ids.
        assert_ne!(questions[0].id, questions[6].id);
        assert_eq!(questions[0].text, questions[6].text);
    }

    #[test]
    fn test_custom_role_draws_from_general_bank() {
        let questions = mock_questions(
            &Role::Custom("Kernel Hacker".to_string()),
            Difficulty::Senior,
            2,
        );
        assert!(questions
            .iter()
            .all(|q| GENERAL_BANK.iter().any(|e| e.text == q.text)));
    }

    #[test]
    fn test_every_bank_entry_has_concepts() {
        for bank in [
            FRONTEND_BANK,
            BACKEND_BANK,
            FULLSTACK_BANK,
            DATA_SCIENCE_BANK,
            DEVOPS_BANK,
            MOBILE_BANK,
            GENERAL_BANK,
        ] {
            for entry in bank {
                assert!(!entry.concepts.is_empty(), "{} has no concepts", entry.text);
            }
        }
    }

    #[test]
    fn test_generated_payload_parses_through_sanitizer() {
        // The remote service returns free text that merely contains a JSON
        // array; HTML and control characters must not break parsing.
        let raw = "<p>Here you go:</p>\u{0000} [{\"question\": \"Explain TTL caching.\", \"expected_concepts\": [\"ttl\"]}] thanks!";
        let clean = sanitize_text(raw);
        let array = extract_json_array(&clean).unwrap();
        let parsed: Vec<GeneratedQuestion> = serde_json::from_str(array).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].expected_concepts, vec!["ttl"]);
    }

    #[tokio::test]
    async fn test_source_questions_without_client_uses_bank() {
        let questions =
            source_questions(None::<&LlmClient>, &Role::Devops, Difficulty::Mid, 4).await;
        assert_eq!(questions.len(), 4);
        assert!(questions
            .iter()
            .all(|q| DEVOPS_BANK.iter().any(|e| e.text == q.text)));
    }

    /// Generator whose every call fails, as a malformed remote payload does.
    struct BrokenGenerator;

    #[async_trait]
    impl QuestionGenerator for BrokenGenerator {
        async fn generate(
            &self,
            _role: &Role,
            _difficulty: Difficulty,
            _count: usize,
        ) -> Result<Vec<GeneratedQuestion>, LlmError> {
            Err(LlmError::NoJsonArray)
        }
    }

    #[tokio::test]
    async fn test_source_questions_falls_back_when_generation_fails() {
        let questions =
            source_questions(Some(&BrokenGenerator), &Role::Backend, Difficulty::Mid, 5).await;
        assert_eq!(questions.len(), 5);
        assert!(questions
            .iter()
            .all(|q| BACKEND_BANK.iter().any(|e| e.text == q.text)));
    }

    /// Generator that parses fine but yields only blank question texts.
    struct BlankGenerator;

    #[async_trait]
    impl QuestionGenerator for BlankGenerator {
        async fn generate(
            &self,
            _role: &Role,
            _difficulty: Difficulty,
            count: usize,
        ) -> Result<Vec<GeneratedQuestion>, LlmError> {
            Ok((0..count)
                .map(|_| GeneratedQuestion {
                    question: "   ".to_string(),
                    expected_concepts: Vec::new(),
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_source_questions_falls_back_on_blank_remote_list() {
        let questions =
            source_questions(Some(&BlankGenerator), &Role::Frontend, Difficulty::Junior, 3).await;
        assert_eq!(questions.len(), 3);
        assert!(questions
            .iter()
            .all(|q| FRONTEND_BANK.iter().any(|e| e.text == q.text)));
    }
}
