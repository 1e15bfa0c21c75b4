//! Concept extraction and cross-matching between context and transcript.
//!
//! Both texts are reduced to weighted concepts by the model (falling back to
//! sentence splitting when the output is unusable). Every document concept is
//! paired with its best transcript concept; a word-overlap pre-filter decides
//! which pairs get a model similarity judgment, the rest keep the overlap ratio.

use std::collections::{HashMap, HashSet};

use futures_util::StreamExt;
use futures_util::stream;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::{
    DISTORTION_PENALTY_SCALE, DISTORTION_THRESHOLD, EXTRA_FIDELITY_PENALTY, FULL_COVERAGE_BONUS,
    PRESENCE_THRESHOLD,
};
use crate::language::{LanguageProfile, content_token_set};
use crate::llm::json::{loose_f64, parse_json_object};
use crate::llm::{LlmClient, LlmError};

const DEFAULT_IMPORTANCE: f32 = 0.5;
const MAX_FALLBACK_CONCEPTS: usize = 20;
const MAX_CONCEPT_CHARS: usize = 160;

pub const CONCEPT_SYSTEM_PROMPT: &str = "You extract the distinct factual ideas stated in a text. \
Report only what the text itself says. Answer with a single JSON object.";

pub const SIMILARITY_SYSTEM_PROMPT: &str = "You compare two short statements and rate how closely \
their meanings agree. Answer with a single JSON object.";

/// One idea extracted from a text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Concept {
    pub text: String,
    /// Weight in [0,1].
    pub importance: f32,
    /// Sentence the concept came from.
    pub sentence: String,
}

impl Concept {
    pub fn new(text: impl Into<String>, importance: f32) -> Self {
        let text = text.into();
        Self {
            sentence: text.clone(),
            text,
            importance: importance.clamp(0.0, 1.0),
        }
    }
}

/// Where a match similarity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilaritySource {
    Model,
    Lexical,
}

/// A document concept and its best transcript counterpart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptMatch {
    pub concept: Concept,
    /// Index into the transcript concepts, if any exist.
    pub best_match: Option<usize>,
    pub similarity: f32,
    pub present: bool,
    pub source: SimilaritySource,
    pub distortion: f32,
}

impl ConceptMatch {
    pub fn is_distorted(&self) -> bool {
        self.present && self.similarity < DISTORTION_THRESHOLD
    }
}

/// Outcome of matching all document concepts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptReport {
    pub matches: Vec<ConceptMatch>,
    pub transcript_concepts: Vec<Concept>,
    /// Indices of transcript concepts that back no present document concept.
    pub extra: Vec<usize>,
    pub model_judgments: usize,
}

impl ConceptReport {
    pub fn total(&self) -> usize {
        self.matches.len()
    }

    pub fn matched(&self) -> usize {
        self.matches.iter().filter(|m| m.present).count()
    }

    pub fn missing(&self) -> impl Iterator<Item = &ConceptMatch> {
        self.matches.iter().filter(|m| !m.present)
    }

    pub fn distorted(&self) -> impl Iterator<Item = &ConceptMatch> {
        self.matches.iter().filter(|m| m.is_distorted())
    }

    pub fn extra_concepts(&self) -> impl Iterator<Item = &Concept> {
        self.extra.iter().filter_map(|&i| self.transcript_concepts.get(i))
    }

    /// Matched share in percent; 100 when there is nothing to match.
    pub fn coverage(&self) -> f32 {
        if self.matches.is_empty() {
            return 100.0;
        }
        self.matched() as f32 / self.total() as f32 * 100.0
    }

    /// Mean similarity over present concepts.
    pub fn average_similarity(&self) -> f32 {
        let present: Vec<f32> = self
            .matches
            .iter()
            .filter(|m| m.present)
            .map(|m| m.similarity)
            .collect();
        if present.is_empty() {
            return 0.0;
        }
        present.iter().sum::<f32>() / present.len() as f32
    }

    /// Coverage minus penalties for extras and distortion, plus a bonus for
    /// consistently strong matches; clamped to [0,100].
    pub fn fidelity(&self) -> f32 {
        let coverage = self.coverage();
        let extra_penalty =
            self.extra.len() as f32 / self.total().max(1) as f32 * EXTRA_FIDELITY_PENALTY;

        let present: Vec<&ConceptMatch> = self.matches.iter().filter(|m| m.present).collect();
        let distortion_penalty = if present.is_empty() {
            0.0
        } else {
            present
                .iter()
                .map(|m| m.distortion * DISTORTION_PENALTY_SCALE)
                .sum::<f32>()
                / present.len() as f32
        };

        let bonus = if self.average_similarity() > DISTORTION_THRESHOLD {
            FULL_COVERAGE_BONUS
        } else {
            0.0
        };

        (coverage - extra_penalty - distortion_penalty + bonus).clamp(0.0, 100.0)
    }
}

/// Distortion of a match with similarity `s` for a concept of `importance`.
pub fn distortion_score(similarity: f32, importance: f32) -> f32 {
    let s = similarity.clamp(0.0, 1.0);
    let value = if s < PRESENCE_THRESHOLD {
        0.8 + (1.0 - s) * 0.2
    } else if s < DISTORTION_THRESHOLD {
        (1.0 - s) * importance.clamp(0.0, 1.0)
    } else {
        0.0
    };
    value.clamp(0.0, 1.0)
}

/// Share of the document concept's content words found in the transcript concept.
pub fn lexical_similarity(document: &str, transcript: &str, profile: &LanguageProfile) -> f32 {
    let doc = content_words(document, profile);
    if doc.is_empty() {
        return 0.0;
    }
    let other = content_words(transcript, profile);
    doc.intersection(&other).count() as f32 / doc.len() as f32
}

fn content_words(text: &str, profile: &LanguageProfile) -> HashSet<String> {
    content_token_set(text)
        .into_iter()
        .filter(|t| !profile.is_stop_word(t))
        .collect()
}

/// Splits on sentence punctuation and line breaks regardless of capitalization.
pub fn split_on_punctuation(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            push_piece(&mut pieces, &mut current);
            continue;
        }
        current.push(c);
        if matches!(c, '.' | '!' | '?' | '…' | ';')
            && chars.peek().is_none_or(|next| next.is_whitespace())
        {
            push_piece(&mut pieces, &mut current);
        }
    }
    push_piece(&mut pieces, &mut current);
    pieces
}

fn push_piece(pieces: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if trimmed.chars().any(char::is_alphanumeric) {
        pieces.push(trimmed.to_string());
    }
    current.clear();
}

pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        "TEXT:\n\"\"\"\n{text}\n\"\"\"\n\n\
         List the key concepts stated in the text. A concept is one short phrase (at most \
         twelve words) carrying a single idea, with an importance between 0 and 1 and the \
         sentence it comes from. Return an empty list if the text states nothing.\n\
         Respond with JSON only:\n\
         {{\"concepts\": [{{\"concept\": \"...\", \"importance\": 0.8, \"sentence\": \"...\"}}]}}"
    )
}

pub fn build_similarity_prompt(document_concept: &str, transcript_concept: &str) -> String {
    format!(
        "STATEMENT A (reference): {document_concept}\n\
         STATEMENT B (presentation): {transcript_concept}\n\n\
         Rate from 0 to 1 how closely B conveys the meaning of A. 1 means the same meaning, \
         values near 0.7 mean the idea is there with altered details, 0 means unrelated or \
         contradictory.\n\
         Respond with JSON only: {{\"similarity\": 0.0}}"
    )
}

/// Parses an extraction response; `None` when the output is unusable.
///
/// An explicitly empty `concepts` list is a valid answer.
pub fn parse_concepts(text: &str) -> Option<Vec<Concept>> {
    let value = parse_json_object(text).ok()?;
    let items = value.get("concepts")?.as_array()?;

    let concepts = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => Some(Concept::new(s.trim(), DEFAULT_IMPORTANCE)),
            Value::Object(obj) => {
                let text = ["concept", "text", "name"]
                    .iter()
                    .find_map(|k| obj.get(*k).and_then(Value::as_str))?
                    .trim();
                let importance = obj
                    .get("importance")
                    .and_then(loose_f64)
                    .map(|v| v as f32)
                    .unwrap_or(DEFAULT_IMPORTANCE);
                let mut concept = Concept::new(text, importance);
                if let Some(sentence) = obj.get("sentence").and_then(Value::as_str)
                    && !sentence.trim().is_empty()
                {
                    concept.sentence = sentence.trim().to_string();
                }
                Some(concept)
            }
            _ => None,
        })
        .filter(|c| !c.text.is_empty())
        .collect();
    Some(concepts)
}

/// Sentence-level concepts used when extraction output is unusable.
pub fn fallback_concepts(text: &str) -> Vec<Concept> {
    split_on_punctuation(text)
        .into_iter()
        .take(MAX_FALLBACK_CONCEPTS)
        .map(|sentence| {
            let text: String = sentence.chars().take(MAX_CONCEPT_CHARS).collect();
            Concept {
                text,
                importance: DEFAULT_IMPORTANCE,
                sentence,
            }
        })
        .collect()
}

/// Parses a pairwise judgment into [0,1]. Percentages are rescaled.
pub fn parse_similarity(text: &str) -> Option<f32> {
    let value = parse_json_object(text).ok()?;
    let raw = ["similarity", "score"]
        .iter()
        .find_map(|k| value.get(*k).and_then(loose_f64))?;
    let scaled = if raw > 1.0 && raw <= 100.0 { raw / 100.0 } else { raw };
    Some((scaled as f32).clamp(0.0, 1.0))
}

/// Extracts concepts and cross-matches them.
#[derive(Debug, Clone)]
pub struct ConceptMatcher<'a> {
    llm: &'a LlmClient,
    profile: &'a LanguageProfile,
    max_pairwise_candidates: usize,
    concurrency: usize,
}

impl<'a> ConceptMatcher<'a> {
    pub fn new(
        llm: &'a LlmClient,
        profile: &'a LanguageProfile,
        max_pairwise_candidates: usize,
        concurrency: usize,
    ) -> Self {
        Self {
            llm,
            profile,
            max_pairwise_candidates,
            concurrency: concurrency.max(1),
        }
    }

    /// Extracts concepts from `text`. Call failures propagate; unusable output
    /// falls back to sentence splitting.
    pub async fn extract(&self, text: &str) -> Result<Vec<Concept>, LlmError> {
        let response = self
            .llm
            .complete(&build_extraction_prompt(text), CONCEPT_SYSTEM_PROMPT)
            .await?;

        match parse_concepts(&response) {
            Some(concepts) => Ok(concepts),
            None => {
                warn!("Concept extraction output unusable, falling back to sentences");
                Ok(fallback_concepts(text))
            }
        }
    }

    /// Pairs each document concept with its best transcript concept.
    pub async fn match_concepts(
        &self,
        document: Vec<Concept>,
        transcript: Vec<Concept>,
    ) -> ConceptReport {
        let lexical: Vec<Vec<f32>> = document
            .iter()
            .map(|d| {
                transcript
                    .iter()
                    .map(|t| lexical_similarity(&d.text, &t.text, self.profile))
                    .collect()
            })
            .collect();

        let pairs: Vec<(usize, usize)> = lexical
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                shortlist(row, self.max_pairwise_candidates)
                    .into_iter()
                    .map(move |j| (i, j))
            })
            .collect();

        let judged: HashMap<(usize, usize), f32> = stream::iter(pairs)
            .map(|(i, j)| {
                let prompt = build_similarity_prompt(&document[i].text, &transcript[j].text);
                async move {
                    let judgment = self.llm.complete(&prompt, SIMILARITY_SYSTEM_PROMPT).await;
                    ((i, j), judgment)
                }
            })
            .buffer_unordered(self.concurrency)
            .filter_map(|((i, j), judgment)| async move {
                match judgment.map(|text| parse_similarity(&text)) {
                    Ok(Some(similarity)) => Some(((i, j), similarity)),
                    Ok(None) => {
                        debug!(i, j, "Unparseable similarity judgment, using word overlap");
                        None
                    }
                    Err(err) => {
                        debug!(i, j, error = %err, "Similarity judgment failed, using word overlap");
                        None
                    }
                }
            })
            .collect()
            .await;

        let mut matches = Vec::with_capacity(document.len());
        for (i, concept) in document.into_iter().enumerate() {
            let mut best: Option<(usize, f32, SimilaritySource)> = None;
            for (j, lexical_score) in lexical[i].iter().enumerate() {
                let (similarity, source) = match judged.get(&(i, j)) {
                    Some(s) => (*s, SimilaritySource::Model),
                    None => (*lexical_score, SimilaritySource::Lexical),
                };
                if best.is_none_or(|(_, s, _)| similarity > s) {
                    best = Some((j, similarity, source));
                }
            }

            let (best_match, similarity, source) = match best {
                Some((j, s, source)) => (Some(j), s, source),
                None => (None, 0.0, SimilaritySource::Lexical),
            };
            matches.push(ConceptMatch {
                distortion: distortion_score(similarity, concept.importance),
                present: similarity >= PRESENCE_THRESHOLD,
                concept,
                best_match,
                similarity,
                source,
            });
        }

        let backing: HashSet<usize> = matches
            .iter()
            .filter(|m| m.present)
            .filter_map(|m| m.best_match)
            .collect();
        let extra = (0..transcript.len())
            .filter(|j| !backing.contains(j))
            .collect();

        ConceptReport {
            matches,
            transcript_concepts: transcript,
            extra,
            model_judgments: judged.len(),
        }
    }
}

/// Indices of the `limit` highest scores, ties in index order.
fn shortlist(scores: &[f32], limit: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order.truncate(limit);
    order
}
