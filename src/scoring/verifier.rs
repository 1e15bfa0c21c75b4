use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::constants::{DEFAULT_CONCURRENCY, DEFAULT_MAX_PAIRWISE_CANDIDATES};
use crate::context::ContextBundle;
use crate::language::LanguageProfile;
use crate::llm::LlmClient;
use crate::scoring::concepts::{ConceptMatcher, ConceptReport};
use crate::scoring::error::ScoringError;
use crate::scoring::factcheck::FactChecker;
use crate::scoring::reconcile::{append_concept_feedback, reconcile_scores, summarize};
use crate::scoring::rubric::{
    LlmEvaluation, SCORING_SYSTEM_PROMPT, build_scoring_prompt, parse_scoring_response,
};
use crate::scoring::types::{EvaluationMetadata, EvaluationResult, VerificationStage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierConfig {
    /// Parallel pairwise and fact-check calls.
    pub concurrency: usize,
    /// Transcript concepts judged by the model per document concept.
    pub max_pairwise_candidates: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_pairwise_candidates: DEFAULT_MAX_PAIRWISE_CANDIDATES,
        }
    }
}

impl VerifierConfig {
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn max_pairwise_candidates(mut self, limit: usize) -> Self {
        self.max_pairwise_candidates = limit;
        self
    }

    pub fn validate(&self) -> Result<(), ScoringError> {
        if self.concurrency == 0 {
            return Err(ScoringError::InvalidInput {
                reason: "concurrency must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Visited stages of one run. Only legal transitions are recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTrail {
    stages: Vec<VerificationStage>,
}

impl StageTrail {
    /// A trail positioned at [`VerificationStage::Retrieved`].
    pub fn start() -> Self {
        Self {
            stages: vec![VerificationStage::Retrieved],
        }
    }

    pub fn current(&self) -> VerificationStage {
        self.stages
            .last()
            .copied()
            .unwrap_or(VerificationStage::Retrieved)
    }

    pub fn advance(&mut self, next: VerificationStage) -> Result<(), ScoringError> {
        let from = self.current();
        if !from.can_advance_to(next) {
            return Err(ScoringError::InvalidTransition { from, to: next });
        }
        debug!(from = %from, to = %next, "Verification stage");
        self.stages.push(next);
        Ok(())
    }

    pub fn stages(&self) -> &[VerificationStage] {
        &self.stages
    }

    pub fn into_stages(self) -> Vec<VerificationStage> {
        self.stages
    }
}

/// Inputs for one verification run. Retrieval has already happened.
#[derive(Debug, Clone, Copy)]
pub struct VerificationRequest<'a> {
    pub document_id: &'a str,
    pub transcript: &'a str,
    pub context: &'a ContextBundle,
    pub fact_check: bool,
    pub started_at: DateTime<Utc>,
}

/// Scores a transcript against retrieved context and reconciles the model's
/// grades with a deterministic concept comparison.
#[derive(Debug, Clone)]
pub struct Verifier {
    llm: Arc<LlmClient>,
    profile: Arc<LanguageProfile>,
    config: VerifierConfig,
}

impl Verifier {
    pub fn new(
        llm: Arc<LlmClient>,
        profile: Arc<LanguageProfile>,
        config: VerifierConfig,
    ) -> Result<Self, ScoringError> {
        config.validate()?;
        Ok(Self {
            llm,
            profile,
            config,
        })
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    #[instrument(
        skip(self, request),
        fields(
            document_id = %request.document_id,
            chunks = request.context.len(),
            fact_check = request.fact_check
        )
    )]
    pub async fn verify(
        &self,
        request: VerificationRequest<'_>,
    ) -> Result<EvaluationResult, ScoringError> {
        let context = request.context.combined_text.as_str();
        let mut trail = StageTrail::start();

        let (evaluation, parse_fallback) = self.score(context, request.transcript).await?;
        trail.advance(VerificationStage::Scored)?;

        let llm_scores = evaluation.scores;
        let mut scores = llm_scores;
        let mut feedback = evaluation.feedback;
        let mut concept_coherence = None;
        let mut concept_check_error = None;

        match self.concept_check(context, request.transcript).await {
            Ok(report) => {
                trail.advance(VerificationStage::ConceptChecked)?;
                scores = reconcile_scores(&llm_scores, &report);
                let summary = summarize(&report);
                append_concept_feedback(&mut feedback, &summary);
                debug!(
                    coverage = summary.coverage,
                    forced_accuracy = summary.forced_accuracy,
                    llm_accuracy = llm_scores.accuracy,
                    "Scores reconciled"
                );
                concept_coherence = Some(summary);
                trail.advance(VerificationStage::Reconciled)?;
            }
            Err(err) => {
                warn!(error = %err, "Concept check failed, keeping model scores");
                concept_check_error = Some(err.to_string());
            }
        }

        let fact_check = if request.fact_check {
            Some(
                FactChecker::new(&self.llm, self.config.concurrency)
                    .check(request.transcript, context)
                    .await,
            )
        } else {
            None
        };

        trail.advance(VerificationStage::Finalized)?;
        let overall = scores.overall();
        let finished_at = Utc::now();
        let processing_ms = (finished_at - request.started_at).num_milliseconds().max(0) as u64;

        info!(
            overall,
            accuracy = scores.accuracy,
            completeness = scores.completeness,
            parse_fallback,
            processing_ms,
            "Evaluation finalized"
        );

        Ok(EvaluationResult {
            scores,
            overall,
            feedback,
            llm_scores,
            fact_check,
            metadata: EvaluationMetadata {
                evaluation_id: Uuid::new_v4(),
                document_id: request.document_id.to_string(),
                transcript_words: request.transcript.split_whitespace().count(),
                transcript_chars: request.transcript.chars().count(),
                chunks_used: request.context.len(),
                context_score: request.context.total_score,
                started_at: request.started_at,
                finished_at,
                processing_ms,
                stages: trail.into_stages(),
                parse_fallback,
                concept_check_error,
                concept_coherence,
            },
        })
    }

    /// Primary rubric call. Returns the evaluation and whether it is the
    /// neutral fallback.
    async fn score(
        &self,
        context: &str,
        transcript: &str,
    ) -> Result<(LlmEvaluation, bool), ScoringError> {
        let response = self
            .llm
            .complete_with_retry(&build_scoring_prompt(context, transcript), SCORING_SYSTEM_PROMPT)
            .await
            .map_err(ScoringError::Upstream)?;

        match parse_scoring_response(&response) {
            Ok(evaluation) => Ok((evaluation, false)),
            Err(err) => {
                warn!(error = %err, "Scoring response unparseable, using neutral evaluation");
                Ok((LlmEvaluation::fallback(), true))
            }
        }
    }

    async fn concept_check(
        &self,
        context: &str,
        transcript: &str,
    ) -> Result<ConceptReport, ScoringError> {
        let matcher = ConceptMatcher::new(
            &self.llm,
            &self.profile,
            self.config.max_pairwise_candidates,
            self.config.concurrency,
        );

        let document_concepts = matcher
            .extract(context)
            .await
            .map_err(|source| ScoringError::ConceptExtraction {
                side: "context",
                source,
            })?;
        let transcript_concepts = matcher
            .extract(transcript)
            .await
            .map_err(|source| ScoringError::ConceptExtraction {
                side: "transcript",
                source,
            })?;

        debug!(
            document = document_concepts.len(),
            transcript = transcript_concepts.len(),
            "Concepts extracted"
        );
        Ok(matcher
            .match_concepts(document_concepts, transcript_concepts)
            .await)
    }
}
