//! Change-hosting system boundary.
//!
//! The evaluation pipeline only ever talks to the change host through the
//! [`ChangeHost`] trait: fetch a commit message, list changed files, fetch a
//! file diff, and post a finished review. The production implementation is
//! the Gerrit REST client in [`gerrit`]; tests substitute in-memory fakes.

pub mod events;
pub mod gerrit;

pub use events::{EventChange, EventOwner, GerritEvent, PatchsetRef};
pub use gerrit::GerritClient;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::error::Result;

/// Review payload posted back to the change host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostReview {
    /// Rendered multi-section human-readable report
    pub message: String,
    /// -1 or 1, derived from the overall score vs. the configured minimum
    pub score: i8,
    /// Label name -> vote
    pub labels: BTreeMap<String, i8>,
}

/// Access to the system hosting the code change
#[async_trait]
pub trait ChangeHost: Send + Sync {
    /// Fetch the commit message for a revision
    async fn commit_message(&self, change_id: &str, revision_id: &str) -> Result<String>;

    /// List the paths changed in a revision
    async fn changed_files(&self, change_id: &str, revision_id: &str) -> Result<Vec<String>>;

    /// Fetch the unified diff text for one file of a revision
    async fn file_diff(
        &self,
        change_id: &str,
        revision_id: &str,
        file_path: &str,
    ) -> Result<String>;

    /// Post a review to the change
    async fn post_review(
        &self,
        change_id: &str,
        revision_id: &str,
        review: &HostReview,
    ) -> Result<()>;
}

/// Identity of one code change under review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub change_id: String,
    pub change_number: String,
    pub revision_id: String,
    pub project: String,
    pub branch: String,
    pub subject: String,
    pub owner: String,
    pub owner_email: String,
}

impl ChangeInfo {
    #[cfg(test)]
    pub(crate) fn for_test(change_id: &str, revision_id: &str) -> Self {
        Self {
            change_id: change_id.to_string(),
            change_number: "1".to_string(),
            revision_id: revision_id.to_string(),
            project: "demo".to_string(),
            branch: "main".to_string(),
            subject: "Test change".to_string(),
            owner: "Tester".to_string(),
            owner_email: "tester@example.com".to_string(),
        }
    }
}

/// A code change with everything needed for review.
///
/// Immutable once loaded except for the `loaded` flag set on successful
/// hydration from the change host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeChange {
    pub info: ChangeInfo,
    /// File path -> raw unified diff text
    pub files_diff: BTreeMap<String, String>,
    pub commit_message: String,
    pub loaded: bool,
}

/// All context needed for one review pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewContext {
    pub change: ChangeInfo,
    pub commit_message: String,
    pub files_diff: BTreeMap<String, String>,
    pub file_count: usize,
    pub total_lines_changed: usize,
    pub timestamp: DateTime<Utc>,
}

impl CodeChange {
    pub fn new(info: ChangeInfo) -> Self {
        Self {
            info,
            files_diff: BTreeMap::new(),
            commit_message: String::new(),
            loaded: false,
        }
    }

    /// Hydrate the change from the host.
    ///
    /// A missing commit message or an unreadable individual diff degrades
    /// gracefully; a failure listing the changed files aborts the load.
    pub async fn load(&mut self, host: &dyn ChangeHost) -> Result<()> {
        let change_id = self.info.change_id.clone();
        let revision_id = self.info.revision_id.clone();

        self.commit_message = match host.commit_message(&change_id, &revision_id).await {
            Ok(message) => message,
            Err(e) => {
                warn!(change = %change_id, "failed to fetch commit message: {e}");
                String::new()
            }
        };

        let files = host.changed_files(&change_id, &revision_id).await?;

        for file_path in files {
            // The magic commit-message entry is not a real file
            if file_path == "/COMMIT_MSG" {
                continue;
            }

            match host.file_diff(&change_id, &revision_id, &file_path).await {
                Ok(diff) if !diff.is_empty() => {
                    self.files_diff.insert(file_path, diff);
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(change = %change_id, file = %file_path, "failed to fetch diff: {e}");
                }
            }
        }

        self.loaded = true;
        info!(
            change = %change_id,
            files = self.files_diff.len(),
            "loaded change data"
        );
        Ok(())
    }

    /// Assemble the review context for the AI reviewer
    pub fn review_context(&self) -> ReviewContext {
        let total_lines_changed = self
            .files_diff
            .values()
            .map(|diff| {
                diff.split('\n')
                    .filter(|line| line.starts_with('+') || line.starts_with('-'))
                    .count()
            })
            .sum();

        ReviewContext {
            change: self.info.clone(),
            commit_message: self.commit_message.clone(),
            files_diff: self.files_diff.clone(),
            file_count: self.files_diff.len(),
            total_lines_changed,
            timestamp: Utc::now(),
        }
    }
}
