//! Rendering a combined review as a human-readable comment.

use std::fmt::Write;

use chrono::Utc;

use crate::config::Criterion;
use crate::review::CombinedReview;

/// Criterion scores below this value are called out individually
const LOW_SCORE_BAR: f64 = 6.0;
/// At most this many low-scoring criteria are listed
const MAX_LOW_SCORES: usize = 5;
/// Per-criterion feedback is truncated to this many characters
const FEEDBACK_PREVIEW_LEN: usize = 100;

fn score_emoji(score: f64) -> &'static str {
    if score < 5.0 {
        "🔴"
    } else if score < 7.0 {
        "🟡"
    } else {
        "🟢"
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Render the markdown comment posted back to the change.
///
/// Sections with no content are omitted entirely.
pub fn render_summary_comment(review: &CombinedReview) -> String {
    let score = review.overall_score;

    let mut comment = format!(
        "\n## 🤖 Automated Code Review {}\n\n\
         **Overall Score**: {:.1}/10\n\
         **Recommendation**: {}\n\n\
         ### Summary\n{}\n\n\
         ### Key Findings\n",
        score_emoji(score),
        score,
        review.approval_recommendation,
        review.overall_feedback,
    );

    let summary = &review.summary;

    if !summary.strengths.is_empty() {
        comment.push_str("\n**✅ Strengths:**\n");
        for strength in summary.strengths.iter().take(3) {
            let _ = writeln!(comment, "- {strength}");
        }
    }

    if !summary.weaknesses.is_empty() {
        comment.push_str("\n**⚠️ Areas for Improvement:**\n");
        for weakness in summary.weaknesses.iter().take(3) {
            let _ = writeln!(comment, "- {weakness}");
        }
    }

    if !summary.critical_issues.is_empty() {
        comment.push_str("\n**🚨 Critical Issues:**\n");
        for issue in &summary.critical_issues {
            let _ = writeln!(comment, "- {issue}");
        }
    }

    let mut low_scores: Vec<(&str, f64, &str)> = review
        .criteria_scores
        .iter()
        .filter(|(_, data)| data.score < LOW_SCORE_BAR)
        .map(|(key, data)| {
            let label = Criterion::from_key(key).map_or(key.as_str(), |c| c.label());
            (label, data.score, data.feedback.as_str())
        })
        .collect();

    if !low_scores.is_empty() {
        comment.push_str("\n### Low Scoring Areas\n");
        low_scores.sort_by(|a, b| a.1.total_cmp(&b.1));
        for (label, score, feedback) in low_scores.into_iter().take(MAX_LOW_SCORES) {
            let _ = writeln!(
                comment,
                "**{label}** ({score}/10): {}...",
                truncate_chars(feedback, FEEDBACK_PREVIEW_LEN)
            );
        }
    }

    if !summary.recommendations.is_empty() {
        comment.push_str("\n### Recommendations\n");
        for recommendation in summary.recommendations.iter().take(3) {
            let _ = writeln!(comment, "- {recommendation}");
        }
    }

    let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    let _ = write!(comment, "\n---\n*Automated review generated at {timestamp}*");

    comment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Approval, CriterionScore, ReviewSummary};
    use crate::analysis::{analyze_commit_message, OverallMetrics, RuleBasedAnalysis};
    use crate::host::ChangeInfo;
    use crate::review::{ReviewId, ReviewMetadata};
    use std::collections::BTreeMap;

    fn sample_review(score: f64) -> CombinedReview {
        let mut criteria_scores = BTreeMap::new();
        criteria_scores.insert(
            "securityConcernsAny".to_string(),
            CriterionScore {
                score: 3.0,
                feedback: "Hardcoded credentials in the client setup.".to_string(),
                suggestions: vec![],
            },
        );
        criteria_scores.insert(
            "isCodeWellWritten".to_string(),
            CriterionScore {
                score: 8.5,
                feedback: "Clean and readable.".to_string(),
                suggestions: vec![],
            },
        );
        CombinedReview {
            overall_score: score,
            overall_feedback: "Solid change with one security gap.".to_string(),
            criteria_scores,
            summary: ReviewSummary {
                strengths: vec!["Good test coverage".to_string()],
                weaknesses: vec!["Large function bodies".to_string()],
                critical_issues: vec!["Secret committed to the repo".to_string()],
                recommendations: vec!["Move the secret to configuration".to_string()],
            },
            approval_recommendation: Approval::NeedsWork,
            confidence_level: 0.8,
            rule_based_analysis: RuleBasedAnalysis {
                file_analyses: BTreeMap::new(),
                overall_metrics: OverallMetrics::default(),
                commit_analysis: analyze_commit_message("Fix credential handling"),
            },
            weighted_overall_score: 2.5,
            review_metadata: ReviewMetadata {
                review_id: ReviewId::from_string("feedfacefeedface"),
                change: ChangeInfo::for_test("c1", "r1"),
                evaluation_timestamp: Utc::now(),
                evaluator_version: "0.1.0".to_string(),
                ai_model: "test-model".to_string(),
                rule_based_checks: true,
            },
        }
    }

    #[test]
    fn test_report_sections() {
        let comment = render_summary_comment(&sample_review(6.2));
        assert!(comment.contains("## 🤖 Automated Code Review 🟡"));
        assert!(comment.contains("**Overall Score**: 6.2/10"));
        assert!(comment.contains("**Recommendation**: NEEDS_WORK"));
        assert!(comment.contains("Solid change with one security gap."));
        assert!(comment.contains("- Good test coverage"));
        assert!(comment.contains("- Secret committed to the repo"));
        assert!(comment.contains("### Low Scoring Areas"));
        assert!(comment.contains("**Security Concerns Any** (3/10)"));
        // High-scoring criteria are not listed as low
        assert!(!comment.contains("**Is Code Well Written**"));
        assert!(comment.contains("### Recommendations"));
        assert!(comment.contains("Automated review generated at"));
    }

    #[test]
    fn test_header_shows_ai_overall_not_weighted() {
        // sample_review pins weighted_overall_score at 2.5; the header
        // must still show and band on the AI overall score
        let comment = render_summary_comment(&sample_review(8.0));
        assert!(comment.contains("**Overall Score**: 8.0/10"));
        assert!(comment.contains("🟢"));
        assert!(!comment.contains("**Overall Score**: 2.5/10"));
    }

    #[test]
    fn test_score_emoji_bands() {
        assert!(render_summary_comment(&sample_review(3.0)).contains("🔴"));
        assert!(render_summary_comment(&sample_review(5.5)).contains("🟡"));
        assert!(render_summary_comment(&sample_review(9.0)).contains("🟢"));
    }

    #[test]
    fn test_empty_summary_sections_omitted() {
        let mut review = sample_review(8.0);
        review.summary = ReviewSummary::default();
        review.criteria_scores.clear();
        let comment = render_summary_comment(&review);
        assert!(!comment.contains("Strengths"));
        assert!(!comment.contains("Critical Issues"));
        assert!(!comment.contains("Low Scoring Areas"));
        assert!(!comment.contains("Recommendations"));
    }
}
