//! Deterministic short review identifiers.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Truncated hex length of a review id
const ID_LEN: usize = 16;

/// Short, one-way identifier for a persisted review.
///
/// Derived from the change id, revision id, and wall-clock time; generated
/// once per evaluation and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    /// Generate a fresh id for one evaluation of the given revision
    pub fn generate(change_id: &str, revision_id: &str) -> Self {
        let combined = format!("{change_id}_{revision_id}_{}", Utc::now().to_rfc3339());
        let digest = Sha256::digest(combined.as_bytes());
        Self(format!("{digest:x}")[..ID_LEN].to_string())
    }

    /// Wrap an existing id string, e.g. from a CLI argument
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
