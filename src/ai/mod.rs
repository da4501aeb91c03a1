//! AI reviewer boundary.
//!
//! The pipeline depends only on the [`AiReviewer`] trait; the production
//! implementation is an HTTP client that sends a structured review prompt
//! and parses the model's JSON response. A failed call or unparsable
//! response surfaces as [`crate::GavelError::Ai`] and aborts that
//! evaluation - rule-based-only partial reviews are never substituted.

pub mod client;
pub mod prompt;
pub mod report;
pub mod types;

pub use client::HttpAiReviewer;
pub use prompt::build_review_prompt;
pub use report::render_summary_comment;
pub use types::{AiReview, Approval, CriterionScore, ReviewSummary};

use async_trait::async_trait;

use crate::error::Result;
use crate::host::ReviewContext;

/// External reviewer producing per-criterion scores for a change
#[async_trait]
pub trait AiReviewer: Send + Sync {
    /// Produce a structured review for the given change context
    async fn review(&self, context: &ReviewContext) -> Result<AiReview>;

    /// Model identifier recorded in review metadata
    fn model_name(&self) -> &str;
}
