//! Combined review artifacts and scoring.

pub mod combine;
pub mod id;

pub use combine::ReviewCombiner;
pub use id::ReviewId;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::{Approval, CriterionScore, ReviewSummary};
use crate::analysis::RuleBasedAnalysis;
use crate::host::ChangeInfo;

/// Version tag recorded in review metadata
pub const EVALUATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Provenance of one combined review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewMetadata {
    pub review_id: ReviewId,
    pub change: ChangeInfo,
    pub evaluation_timestamp: DateTime<Utc>,
    pub evaluator_version: String,
    pub ai_model: String,
    pub rule_based_checks: bool,
}

/// The final review artifact: AI scores adjusted by rule-based evidence,
/// the full rule-based analysis, and a recalculated weighted overall score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedReview {
    pub overall_score: f64,
    pub overall_feedback: String,
    pub criteria_scores: BTreeMap<String, CriterionScore>,
    pub summary: ReviewSummary,
    pub approval_recommendation: Approval,
    pub confidence_level: f64,
    pub rule_based_analysis: RuleBasedAnalysis,
    pub weighted_overall_score: f64,
    pub review_metadata: ReviewMetadata,
}
