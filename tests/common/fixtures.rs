//! Texts and a scripted chat model for evaluation tests.

use recital::llm::LlmError;
use recital::scoring::concepts::{
    CONCEPT_SYSTEM_PROMPT, SIMILARITY_SYSTEM_PROMPT, split_on_punctuation,
};
use recital::scoring::factcheck::FACT_CHECK_SYSTEM_PROMPT;
use recital::scoring::rubric::SCORING_SYSTEM_PROMPT;
use serde_json::json;

pub const DIM: usize = 768;

pub const DOCUMENT_ID: &str = "zorg";

pub const ZORG_DOCUMENT: &str =
    "The sky on planet Zorg is green. Zorg has two moons called Ip and Op.";

pub const FAITHFUL_TRANSCRIPT: &str =
    "The sky on planet Zorg is green. Zorg has two moons called Ip and Op.";

pub const CONTRADICTING_TRANSCRIPT: &str =
    "The sky on planet Zorg is blue. Zorg has two moons called Ip and Op.";

pub const UNRELATED_TRANSCRIPT: &str =
    "Quarterly invoices require accountant signatures before payment processing deadlines.";

/// Text between the first pair of triple quotes.
pub fn quoted_block(prompt: &str) -> &str {
    prompt
        .split_once("\"\"\"\n")
        .and_then(|(_, rest)| rest.split_once("\n\"\"\""))
        .map(|(block, _)| block)
        .unwrap_or_default()
}

fn line_after<'a>(prompt: &'a str, marker: &str) -> &'a str {
    prompt
        .lines()
        .find_map(|line| line.strip_prefix(marker))
        .unwrap_or_default()
        .trim()
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 3)
        .map(str::to_lowercase)
        .collect()
}

/// Share of `a`'s longer words found in `b`; a green/blue swap scores 0.3.
pub fn judged_similarity(a: &str, b: &str) -> f32 {
    if a.contains("green") && b.contains("blue") {
        return 0.3;
    }
    let a_words = words(a);
    if a_words.is_empty() {
        return 0.0;
    }
    let b_words = words(b);
    a_words.iter().filter(|w| b_words.contains(w)).count() as f32 / a_words.len() as f32
}

/// Behaves like a careful grader: sentence-level concepts, word-overlap
/// similarity, and a lower accuracy grade for contradicted colours.
pub fn grader(prompt: &str, system: &str) -> Result<String, LlmError> {
    let response = if system == SCORING_SYSTEM_PROMPT {
        let accuracy = if prompt.contains("is blue") { 85 } else { 92 };
        json!({
            "scores": {
                "accuracy": accuracy,
                "clarity": 88,
                "completeness": 90,
                "coherence": 86,
                "fluency": 80
            },
            "strengths": ["Covers the moons accurately"],
            "improvements": ["Vary the pacing"],
            "detailed_feedback": "A concise summary of the document."
        })
    } else if system == CONCEPT_SYSTEM_PROMPT {
        let concepts: Vec<_> = split_on_punctuation(quoted_block(prompt))
            .into_iter()
            .map(|s| json!({"concept": s.trim_end_matches('.'), "importance": 0.8, "sentence": s}))
            .collect();
        json!({ "concepts": concepts })
    } else if system == SIMILARITY_SYSTEM_PROMPT {
        let a = line_after(prompt, "STATEMENT A (reference):");
        let b = line_after(prompt, "STATEMENT B (presentation):");
        json!({ "similarity": judged_similarity(a, b) })
    } else if system == FACT_CHECK_SYSTEM_PROMPT {
        if prompt.starts_with("TRANSCRIPT:") {
            json!({ "statements": split_on_punctuation(quoted_block(prompt)) })
        } else if line_after(prompt, "STATEMENT:").contains("blue") {
            json!({"supported": false, "severity": "critical", "explanation": "The sky is green."})
        } else {
            json!({"supported": true, "severity": "none", "explanation": ""})
        }
    } else {
        return Err(LlmError::Request {
            reason: format!("unexpected system prompt: {system}"),
        });
    };
    Ok(format!("```json\n{response}\n```"))
}

/// Like [`grader`], but concept extraction calls fail.
pub fn grader_without_concepts(prompt: &str, system: &str) -> Result<String, LlmError> {
    if system == CONCEPT_SYSTEM_PROMPT {
        return Err(LlmError::Timeout { after_ms: 1 });
    }
    grader(prompt, system)
}
