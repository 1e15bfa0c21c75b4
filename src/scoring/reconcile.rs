//! Reconciliation of model scores with concept-derived metrics.

use crate::constants::{
    DISTORTION_PENALTY_SCALE, EXTRA_CONCEPT_PENALTY, FULL_COVERAGE_BONUS, MISSING_CONCEPT_PENALTY,
};
use crate::scoring::concepts::ConceptReport;
use crate::scoring::types::{ConceptCoherenceSummary, CriterionScores, Feedback};

/// Concepts named per feedback bullet before the rest are summarized.
pub const MAX_NAMED_CONCEPTS: usize = 5;

const COVERAGE_BONUS_THRESHOLD: f32 = 90.0;

/// Accuracy ceiling implied by the concept report, in [0,100].
pub fn forced_accuracy(report: &ConceptReport) -> f32 {
    let total = report.total();
    let missing_penalty = if total == 0 {
        0.0
    } else {
        report.missing().count() as f32 / total as f32 * MISSING_CONCEPT_PENALTY
    };
    let extra_penalty = report.extra.len() as f32 * EXTRA_CONCEPT_PENALTY;
    let distortion_penalty: f32 = report
        .distorted()
        .map(|m| m.distortion * DISTORTION_PENALTY_SCALE)
        .sum();
    let bonus = if report.coverage() > COVERAGE_BONUS_THRESHOLD {
        FULL_COVERAGE_BONUS
    } else {
        0.0
    };

    (100.0 - missing_penalty - extra_penalty - distortion_penalty + bonus).clamp(0.0, 100.0)
}

/// Takes the more conservative of each model score and its deterministic
/// counterpart. Clarity, coherence and fluency pass through unchanged.
pub fn reconcile_scores(llm: &CriterionScores, report: &ConceptReport) -> CriterionScores {
    CriterionScores {
        accuracy: llm.accuracy.min(forced_accuracy(report)),
        completeness: llm.completeness.min(report.coverage()),
        ..*llm
    }
}

pub fn summarize(report: &ConceptReport) -> ConceptCoherenceSummary {
    ConceptCoherenceSummary {
        document_concepts: report.total(),
        transcript_concepts: report.transcript_concepts.len(),
        matched: report.matched(),
        missing: report.missing().map(|m| m.concept.text.clone()).collect(),
        extra: report.extra_concepts().map(|c| c.text.clone()).collect(),
        distorted: report.distorted().map(|m| m.concept.text.clone()).collect(),
        coverage: report.coverage(),
        fidelity: report.fidelity(),
        forced_accuracy: forced_accuracy(report),
        average_similarity: report.average_similarity(),
        model_judgments: report.model_judgments,
    }
}

/// Appends one improvement bullet per non-empty concept category.
pub fn append_concept_feedback(feedback: &mut Feedback, summary: &ConceptCoherenceSummary) {
    let categories = [
        ("Ideas from the document that were not presented", &summary.missing),
        ("Ideas presented with a changed meaning", &summary.distorted),
        ("Claims that the document does not support", &summary.extra),
    ];
    for (label, concepts) in categories {
        if let Some(bullet) = concept_bullet(label, concepts) {
            feedback.improvements.push(bullet);
        }
    }
}

/// `"{label}: a, b, c (+N more)"`, or `None` for an empty list.
pub fn concept_bullet(label: &str, concepts: &[String]) -> Option<String> {
    if concepts.is_empty() {
        return None;
    }
    let named = concepts
        .iter()
        .take(MAX_NAMED_CONCEPTS)
        .map(|c| format!("\"{c}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let hidden = concepts.len().saturating_sub(MAX_NAMED_CONCEPTS);
    Some(if hidden > 0 {
        format!("{label}: {named} (+{hidden} more)")
    } else {
        format!("{label}: {named}")
    })
}
