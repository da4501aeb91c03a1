//! On-disk persistence for completed reviews.
//!
//! Each review is written as pretty-printed JSON under the configured
//! directory as `review_<id>.json`. The artifact is the full combined
//! review and round-trips losslessly through serde.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{GavelError, Result};
use crate::review::CombinedReview;
use crate::review::ReviewId;

/// Replace characters that are invalid in filenames on common platforms
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            other => other,
        })
        .collect()
}

/// Stores review artifacts as JSON files in a single directory
#[derive(Debug, Clone)]
pub struct ReviewStore {
    dir: PathBuf,
}

impl ReviewStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &ReviewId) -> PathBuf {
        self.dir
            .join(format!("review_{}.json", sanitize_filename(id.as_str())))
    }

    /// Persist a combined review, creating the directory if needed.
    ///
    /// Returns the path the artifact was written to.
    pub fn save(&self, review: &CombinedReview) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            GavelError::storage_at("failed to create review directory", &self.dir)
                .with_source(e)
        })?;

        let path = self.path_for(&review.review_metadata.review_id);
        let json = serde_json::to_string_pretty(review)?;
        fs::write(&path, json).map_err(|e| {
            GavelError::storage_at("failed to write review artifact", &path).with_source(e)
        })?;

        debug!(path = %path.display(), "saved review artifact");
        Ok(path)
    }

    /// Load a previously saved review by id.
    pub fn load(&self, id: &ReviewId) -> Result<CombinedReview> {
        let path = self.path_for(id);
        let json = fs::read_to_string(&path).map_err(|e| {
            GavelError::storage_at(format!("review {id} not found"), &path).with_source(e)
        })?;
        let review = serde_json::from_str(&json)?;
        Ok(review)
    }

    /// Ids of every review currently on disk, unordered.
    pub fn list(&self) -> Result<Vec<ReviewId>> {
        let mut ids = Vec::new();
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(ids),
            Err(e) => {
                return Err(
                    GavelError::storage_at("failed to read review directory", &self.dir)
                        .with_source(e),
                )
            }
        };
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if let Some(id) = name
                .strip_prefix("review_")
                .and_then(|rest| rest.strip_suffix(".json"))
            {
                ids.push(ReviewId::from_string(id));
            }
        }
        Ok(ids)
    }
}
