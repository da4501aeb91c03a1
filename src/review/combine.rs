//! Merging AI and rule-based signals into one verdict.
//!
//! AI criterion scores are only ever adjusted downward: when rule-based
//! evidence contradicts a favorable AI score, the score is clamped to a
//! fixed per-criterion ceiling and an evidence summary is appended to the
//! criterion's feedback (existing feedback is never overwritten). The
//! overall score is then recomputed as a weighted mean over the criteria
//! shared between the adjusted map and the weight table.

use std::fmt::Write;
use tracing::debug;

use crate::ai::AiReview;
use crate::analysis::RuleBasedAnalysis;
use crate::config::{Criterion, ScoringWeights};

use super::{CombinedReview, ReviewMetadata};

/// Ceiling for the security criterion when rule-based concerns exist
const SECURITY_CEILING: f64 = 4.0;
/// Ceiling for the spelling criterion when rule-based mistakes exist
const SPELLING_CEILING: f64 = 5.0;
/// Ceiling for the naming criterion when rule-based violations exist
const NAMING_CEILING: f64 = 6.0;
/// Ceiling for the complexity criterion once the average exceeds the bar
const COMPLEXITY_CEILING: f64 = 3.0;
/// Average complexity above which the complexity clamp applies
const HIGH_AVERAGE_COMPLEXITY: f64 = 10.0;
/// Commit-message clamp applies only below this rule-based score
const COMMIT_CLAMP_BELOW: u32 = 8;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Merges an AI review with a rule-based analysis
#[derive(Debug, Clone)]
pub struct ReviewCombiner {
    weights: ScoringWeights,
}

impl ReviewCombiner {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Produce the combined review for one evaluation.
    pub fn combine(
        &self,
        ai: AiReview,
        analysis: RuleBasedAnalysis,
        metadata: ReviewMetadata,
    ) -> CombinedReview {
        let mut criteria = ai.criteria_scores;

        // Every criterion score in the final artifact stays within [0, 10]
        for entry in criteria.values_mut() {
            entry.score = entry.score.clamp(0.0, 10.0);
        }

        if let Some(entry) = criteria.get_mut(Criterion::CyclomaticComplexity.key()) {
            if let Some(metrics) = &analysis.overall_metrics.complexity_metrics {
                if metrics.average_complexity > HIGH_AVERAGE_COMPLEXITY {
                    entry.score = entry.score.min(COMPLEXITY_CEILING);
                    let _ = write!(
                        entry.feedback,
                        " Rule-based analysis found high complexity (avg: {:.1}).",
                        metrics.average_complexity
                    );
                }
            }
        }

        if let Some(entry) = criteria.get_mut(Criterion::SecurityConcerns.key()) {
            let concerns = &analysis.overall_metrics.security_concerns;
            if !concerns.is_empty() {
                entry.score = entry.score.min(SECURITY_CEILING);
                let mut kinds: Vec<&str> = Vec::new();
                for concern in concerns {
                    if !kinds.contains(&concern.kind.as_str()) {
                        kinds.push(&concern.kind);
                    }
                }
                let _ = write!(
                    entry.feedback,
                    " Rule-based analysis found {} security concerns: {}.",
                    concerns.len(),
                    kinds.join(", ")
                );
            }
        }

        if let Some(entry) = criteria.get_mut(Criterion::SpellingMistakes.key()) {
            let mistakes = &analysis.overall_metrics.spelling_mistakes;
            if !mistakes.is_empty() {
                entry.score = entry.score.min(SPELLING_CEILING);
                let _ = write!(
                    entry.feedback,
                    " Rule-based analysis found {} spelling mistakes.",
                    mistakes.len()
                );
            }
        }

        if let Some(entry) = criteria.get_mut(Criterion::NamingConventionFollowed.key()) {
            let violations = &analysis.overall_metrics.naming_violations;
            if !violations.is_empty() {
                entry.score = entry.score.min(NAMING_CEILING);
                let _ = write!(
                    entry.feedback,
                    " Rule-based analysis found {} naming violations.",
                    violations.len()
                );
            }
        }

        if let Some(entry) = criteria.get_mut(Criterion::CommitMessageWellWritten.key()) {
            let commit = &analysis.commit_analysis;
            if commit.quality_score < COMMIT_CLAMP_BELOW {
                entry.score = entry.score.min(f64::from(commit.quality_score));
                if !commit.issues.is_empty() {
                    let shown: Vec<&str> =
                        commit.issues.iter().take(3).map(String::as_str).collect();
                    let _ = write!(entry.feedback, " Issues found: {}.", shown.join(", "));
                }
            }
        }

        // Weighted mean over criteria present in both the adjusted map and
        // the weight table; keys outside the table are carried through the
        // artifact but never scored
        let mut weighted_sum = 0.0;
        let mut total_weight = 0.0;
        for (key, entry) in &criteria {
            if let Some(weight) = self.weights.weight_for_key(key) {
                weighted_sum += entry.score * weight;
                total_weight += weight;
            }
        }

        let weighted_overall_score = if total_weight > 0.0 {
            round2(weighted_sum / total_weight)
        } else {
            ai.overall_score
        };

        debug!(
            review = %metadata.review_id,
            weighted = weighted_overall_score,
            "combined review scores"
        );

        CombinedReview {
            overall_score: ai.overall_score,
            overall_feedback: ai.overall_feedback,
            criteria_scores: criteria,
            summary: ai.summary,
            approval_recommendation: ai.approval_recommendation,
            confidence_level: ai.confidence_level,
            rule_based_analysis: analysis,
            weighted_overall_score,
            review_metadata: metadata,
        }
    }
}
