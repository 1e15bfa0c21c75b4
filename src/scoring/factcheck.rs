//! Optional statement-level fact-check against the retrieved context.
//!
//! Produces a separate accuracy estimate; it is reported next to the
//! reconciled scores and never merged into them.

use std::fmt;

use futures_util::StreamExt;
use futures_util::stream;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::llm::json::{loose_string_list, parse_json_object};
use crate::llm::{LlmClient, LlmError};
use crate::scoring::concepts::split_on_punctuation;

pub const CRITICAL_PENALTY: f32 = 20.0;
pub const MODERATE_PENALTY: f32 = 10.0;
pub const MINOR_PENALTY: f32 = 3.0;

const MAX_STATEMENTS: usize = 40;

pub const FACT_CHECK_SYSTEM_PROMPT: &str = "You verify statements strictly against a reference \
text. Anything the reference does not state is unsupported. Answer with a single JSON object.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Minor,
    Moderate,
    Critical,
}

impl Severity {
    pub fn penalty(&self) -> f32 {
        match self {
            Severity::None => 0.0,
            Severity::Minor => MINOR_PENALTY,
            Severity::Moderate => MODERATE_PENALTY,
            Severity::Critical => CRITICAL_PENALTY,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "none" | "ok" | "correct" => Some(Severity::None),
            "minor" | "low" => Some(Severity::Minor),
            "moderate" | "medium" => Some(Severity::Moderate),
            "critical" | "high" | "major" | "severe" => Some(Severity::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::None => "none",
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementCheck {
    pub statement: String,
    pub supported: bool,
    pub severity: Severity,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactCheckReport {
    pub checks: Vec<StatementCheck>,
    /// Statements whose check call failed or was unparseable.
    pub skipped: usize,
    /// `100 - Σ penalties`, clamped; `None` when nothing was checked.
    pub accuracy: Option<f32>,
    /// Statements came from punctuation splitting instead of the model.
    pub segmentation_fallback: bool,
}

impl FactCheckReport {
    pub fn count(&self, severity: Severity) -> usize {
        self.checks.iter().filter(|c| c.severity == severity).count()
    }
}

/// `100 - Σ penalties`, clamped to [0,100].
pub fn fact_check_accuracy(checks: &[StatementCheck]) -> f32 {
    let penalty: f32 = checks.iter().map(|c| c.severity.penalty()).sum();
    (100.0 - penalty).clamp(0.0, 100.0)
}

pub fn build_segmentation_prompt(transcript: &str) -> String {
    format!(
        "TRANSCRIPT:\n\"\"\"\n{transcript}\n\"\"\"\n\n\
         Split the transcript into self-contained factual statements. Drop greetings, filler \
         and questions. Keep the speaker's wording.\n\
         Respond with JSON only: {{\"statements\": [\"...\"]}}"
    )
}

pub fn build_statement_prompt(context: &str, statement: &str) -> String {
    format!(
        "REFERENCE:\n\"\"\"\n{context}\n\"\"\"\n\n\
         STATEMENT: {statement}\n\n\
         Is the statement supported by the reference? Severity describes the error: none \
         (supported), minor (imprecise detail), moderate (wrong detail or unsupported claim), \
         critical (contradicts the reference).\n\
         Respond with JSON only: {{\"supported\": true, \"severity\": \"none\", \
         \"explanation\": \"...\"}}"
    )
}

/// Parses a statement verdict; `None` if unusable.
pub fn parse_statement_check(statement: &str, text: &str) -> Option<StatementCheck> {
    let value = parse_json_object(text).ok()?;
    let supported = value.get("supported").and_then(Value::as_bool);
    let severity = value
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse);

    let (supported, severity) = match (supported, severity) {
        (Some(supported), Some(severity)) => (supported, severity),
        (Some(true), None) => (true, Severity::None),
        (Some(false), None) => (false, Severity::Moderate),
        (None, Some(severity)) => (severity == Severity::None, severity),
        (None, None) => return None,
    };

    Some(StatementCheck {
        statement: statement.to_string(),
        supported,
        severity,
        explanation: value
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct FactChecker<'a> {
    llm: &'a LlmClient,
    concurrency: usize,
}

impl<'a> FactChecker<'a> {
    pub fn new(llm: &'a LlmClient, concurrency: usize) -> Self {
        Self {
            llm,
            concurrency: concurrency.max(1),
        }
    }

    /// Statements via the model, or punctuation splitting if that fails.
    pub async fn segment(&self, transcript: &str) -> (Vec<String>, bool) {
        let response: Result<Vec<String>, LlmError> = async {
            let text = self
                .llm
                .complete(&build_segmentation_prompt(transcript), FACT_CHECK_SYSTEM_PROMPT)
                .await?;
            let value = parse_json_object(&text)?;
            Ok(loose_string_list(value.get("statements")))
        }
        .await;

        match response {
            Ok(statements) if !statements.is_empty() => (statements, false),
            Ok(_) => {
                debug!("Segmentation returned no statements, splitting on punctuation");
                (split_on_punctuation(transcript), true)
            }
            Err(err) => {
                warn!(error = %err, "Statement segmentation failed, splitting on punctuation");
                (split_on_punctuation(transcript), true)
            }
        }
    }

    pub async fn check(&self, transcript: &str, context: &str) -> FactCheckReport {
        let (mut statements, segmentation_fallback) = self.segment(transcript).await;
        statements.truncate(MAX_STATEMENTS);

        let results: Vec<(usize, Option<StatementCheck>)> = stream::iter(statements.iter().cloned().enumerate())
            .map(|(i, statement)| async move {
                let prompt = build_statement_prompt(context, &statement);
                let verdict = match self.llm.complete(&prompt, FACT_CHECK_SYSTEM_PROMPT).await {
                    Ok(text) => parse_statement_check(&statement, &text),
                    Err(err) => {
                        debug!(statement = i, error = %err, "Statement check failed");
                        None
                    }
                };
                (i, verdict)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut ordered = results;
        ordered.sort_by_key(|(i, _)| *i);
        let skipped = ordered.iter().filter(|(_, c)| c.is_none()).count();
        let checks: Vec<StatementCheck> = ordered.into_iter().filter_map(|(_, c)| c).collect();
        let accuracy = (!checks.is_empty()).then(|| fact_check_accuracy(&checks));

        info!(
            statements = statements.len(),
            checked = checks.len(),
            skipped,
            accuracy,
            "Fact-check complete"
        );

        FactCheckReport {
            checks,
            skipped,
            accuracy,
            segmentation_fallback,
        }
    }
}
