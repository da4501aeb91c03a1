//! The end-to-end evaluation pipeline.
//!
//! A notification enters through [`queue::ReviewQueue`], the background
//! processor pulls it off, and [`Evaluator`] runs the whole evaluation:
//! hydrate the change from the host, ask the AI reviewer, run the
//! rule-based analysis, merge the two, persist the artifact, and
//! optionally post the verdict back to the change host.

pub mod processor;
pub mod queue;

pub use processor::{spawn_processor, ProcessorHandle, ProcessorState};
pub use queue::{review_queue, ReviewQueue, ReviewReceiver, ReviewTask};

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::ai::{render_summary_comment, AiReviewer};
use crate::analysis::RuleBasedAnalyzer;
use crate::config::ScoringWeights;
use crate::error::Result;
use crate::host::gerrit::review_labels;
use crate::host::{ChangeHost, ChangeInfo, CodeChange, HostReview};
use crate::review::{CombinedReview, ReviewCombiner, ReviewId, ReviewMetadata, EVALUATOR_VERSION};
use crate::storage::ReviewStore;

/// Runs one complete evaluation per task
pub struct Evaluator {
    host: Arc<dyn ChangeHost>,
    reviewer: Arc<dyn AiReviewer>,
    analyzer: RuleBasedAnalyzer,
    combiner: ReviewCombiner,
    store: ReviewStore,
    min_review_score: f64,
    auto_post: bool,
}

impl Evaluator {
    pub fn new(
        host: Arc<dyn ChangeHost>,
        reviewer: Arc<dyn AiReviewer>,
        store: ReviewStore,
        weights: ScoringWeights,
        min_review_score: f64,
        auto_post: bool,
    ) -> Self {
        Self {
            host,
            reviewer,
            analyzer: RuleBasedAnalyzer,
            combiner: ReviewCombiner::new(weights),
            store,
            min_review_score,
            auto_post,
        }
    }

    /// Evaluate a queued notification task
    pub async fn evaluate_task(&self, task: &ReviewTask) -> Result<CombinedReview> {
        let info = task.event.change_info()?;
        self.evaluate(info).await
    }

    /// Evaluate one change revision end to end.
    ///
    /// An AI reviewer failure aborts the evaluation; there is no
    /// rule-based-only fallback. A post-back failure is logged and does
    /// not affect the already persisted artifact.
    pub async fn evaluate(&self, info: ChangeInfo) -> Result<CombinedReview> {
        let review_id = ReviewId::generate(&info.change_id, &info.revision_id);
        info!(
            review = %review_id,
            change = %info.change_id,
            revision = %info.revision_id,
            "starting review evaluation"
        );

        let mut change = CodeChange::new(info.clone());
        change.load(self.host.as_ref()).await?;

        let context = change.review_context();
        let ai_review = self.reviewer.review(&context).await?;
        let analysis = self.analyzer.analyze(&change);

        let metadata = ReviewMetadata {
            review_id,
            change: info,
            evaluation_timestamp: Utc::now(),
            evaluator_version: EVALUATOR_VERSION.to_string(),
            ai_model: self.reviewer.model_name().to_string(),
            rule_based_checks: true,
        };

        let combined = self.combiner.combine(ai_review, analysis, metadata);

        let path = self.store.save(&combined)?;
        info!(
            review = %combined.review_metadata.review_id,
            path = %path.display(),
            "review persisted"
        );

        if self.auto_post {
            self.post_back(&combined).await;
        }

        Ok(combined)
    }

    async fn post_back(&self, review: &CombinedReview) {
        // The vote follows the AI's overall score; the recalculated
        // weighted score is stored in the artifact but never voted on
        let score: i8 = if review.overall_score >= self.min_review_score {
            1
        } else {
            -1
        };

        let host_review = HostReview {
            message: render_summary_comment(review),
            score,
            labels: review_labels(score),
        };

        let change = &review.review_metadata.change;
        if let Err(e) = self
            .host
            .post_review(&change.change_id, &change.revision_id, &host_review)
            .await
        {
            warn!(change = %change.change_id, "failed to post review back: {e}");
        } else {
            info!(change = %change.change_id, vote = score, "review posted back");
        }
    }
}
