//! Data model of an AI reviewer response.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score and feedback for one review criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    /// 0-10
    pub score: f64,
    pub feedback: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Structured summary of a review
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub critical_issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// The reviewer's overall recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approval {
    #[serde(rename = "APPROVE")]
    Approve,
    #[serde(rename = "NEEDS_WORK")]
    NeedsWork,
    #[serde(rename = "REJECT")]
    Reject,
}

impl std::fmt::Display for Approval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Approval::Approve => write!(f, "APPROVE"),
            Approval::NeedsWork => write!(f, "NEEDS_WORK"),
            Approval::Reject => write!(f, "REJECT"),
        }
    }
}

/// A complete AI review of one change.
///
/// Criteria are keyed by their camelCase wire keys; keys unknown to the
/// criterion table are preserved but excluded from weighted scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiReview {
    /// 1-10
    pub overall_score: f64,
    pub overall_feedback: String,
    pub criteria_scores: BTreeMap<String, CriterionScore>,
    #[serde(default)]
    pub summary: ReviewSummary,
    pub approval_recommendation: Approval,
    /// 0-1
    #[serde(default)]
    pub confidence_level: f64,
}
