//! Primary scoring prompt and response parsing.

use serde_json::{Map, Value};

use crate::constants::FALLBACK_CRITERION_SCORE;
use crate::llm::LlmError;
use crate::llm::json::{loose_f64, loose_string_list, parse_json_object};
use crate::scoring::types::{Criterion, CriterionScores, Feedback};

pub const SCORING_SYSTEM_PROMPT: &str = "You are a strict examiner grading an oral presentation \
against a reference document. The document is the only source of truth. Never correct the \
document and never reward knowledge it does not contain. Answer with a single JSON object and \
nothing else.";

/// Typed view of a parsed scoring response.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmEvaluation {
    pub scores: CriterionScores,
    pub feedback: Feedback,
}

impl LlmEvaluation {
    /// Neutral evaluation used when the model output cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            scores: CriterionScores::uniform(FALLBACK_CRITERION_SCORE),
            feedback: Feedback {
                strengths: Vec::new(),
                improvements: vec![
                    "Automatic scoring could not be completed; scores are neutral placeholders."
                        .to_string(),
                ],
                detailed: "The evaluation response could not be parsed, so every criterion was \
                           set to a neutral value."
                    .to_string(),
            },
        }
    }
}

pub fn build_scoring_prompt(context: &str, transcript: &str) -> String {
    format!(
        "REFERENCE DOCUMENT EXCERPTS:\n\"\"\"\n{context}\n\"\"\"\n\n\
         PRESENTATION TRANSCRIPT:\n\"\"\"\n{transcript}\n\"\"\"\n\n\
         Grade the presentation on each criterion from 0 to 100.\n\
         - accuracy: every claim must agree with the excerpts. A claim that is absent from the \
         excerpts counts as wrong even if it is true in the real world. A claim that contradicts \
         the excerpts is a serious error, even if the excerpts themselves seem mistaken.\n\
         - clarity: ideas are expressed understandably and precisely.\n\
         - completeness: the important ideas of the excerpts are covered.\n\
         - coherence: ideas follow a logical order and connect to each other.\n\
         - fluency: delivery reads naturally, without excessive filler or broken sentences.\n\n\
         Respond with JSON only, in this shape:\n\
         {{\"accuracy\": 0, \"clarity\": 0, \"completeness\": 0, \"coherence\": 0, \"fluency\": 0, \
         \"strengths\": [\"...\"], \"improvements\": [\"...\"], \"detailed_feedback\": \"...\"}}"
    )
}

/// Parses a scoring response into typed scores clamped to [0,100].
///
/// Scores may be numbers or numeric strings, at the top level or under `scores`.
/// All five criteria are required.
pub fn parse_scoring_response(text: &str) -> Result<LlmEvaluation, LlmError> {
    let value = parse_json_object(text)?;
    let root = value.as_object().ok_or_else(|| LlmError::InvalidJson {
        reason: "top-level value is not an object".to_string(),
    })?;
    let nested = root.get("scores").and_then(Value::as_object);

    let mut scores = CriterionScores::uniform(0.0);
    for criterion in Criterion::ALL {
        let raw = nested
            .and_then(|s| lookup(s, criterion.key()))
            .or_else(|| lookup(root, criterion.key()))
            .and_then(loose_f64)
            .ok_or_else(|| LlmError::InvalidJson {
                reason: format!("missing or non-numeric score for {criterion}"),
            })?;
        scores.set(criterion, (raw as f32).clamp(0.0, 100.0));
    }

    let improvements = first_list(root, &["improvements", "areas_for_improvement", "weaknesses"]);
    let detailed = ["detailed_feedback", "detailed", "feedback", "summary"]
        .iter()
        .find_map(|key| lookup(root, key).and_then(Value::as_str))
        .unwrap_or_default()
        .trim()
        .to_string();

    Ok(LlmEvaluation {
        scores,
        feedback: Feedback {
            strengths: first_list(root, &["strengths"]),
            improvements,
            detailed,
        },
    })
}

/// Case-insensitive key lookup.
fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key).or_else(|| {
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn first_list(map: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    keys.iter()
        .map(|key| loose_string_list(lookup(map, key)))
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}
