//! Gerrit REST API client.
//!
//! Minimal authenticated client for the endpoints the pipeline needs:
//! commit message, changed-file listing, per-file diffs, and posting a
//! review. Gerrit JSON responses are prefixed with `)]}'` to prevent XSSI;
//! the prefix is stripped before parsing.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::GerritConfig;
use crate::error::{GavelError, Result};

use super::{ChangeHost, HostReview};

const XSSI_PREFIX: &str = ")]}'";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Gerrit REST API
pub struct GerritClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

/// Diff content block as returned by Gerrit's file diff endpoint
#[derive(Debug, Deserialize)]
struct DiffContent {
    #[serde(default)]
    ab: Option<Vec<String>>,
    #[serde(default)]
    a: Option<Vec<String>>,
    #[serde(default)]
    b: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct FileDiff {
    #[serde(default)]
    content: Vec<DiffContent>,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

impl GerritClient {
    pub fn new(config: &GerritConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GavelError::config("failed to create HTTP client").with_source(e))?;

        let base_url = format!("http://{}:{}", config.host, config.port);
        info!("initialized Gerrit client for {base_url}");

        Ok(Self {
            client,
            base_url,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// GET an authenticated endpoint and parse the XSSI-prefixed JSON body
    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}/a/{}", self.base_url, endpoint);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| GavelError::host(format!("Gerrit request failed: {endpoint}")).with_source(e))?;

        let body = response.text().await?;
        let body = body.strip_prefix(XSSI_PREFIX).unwrap_or(&body);

        serde_json::from_str(body.trim())
            .map_err(|e| GavelError::host("failed to parse Gerrit response").with_source(e))
    }

    /// Render Gerrit's structured diff content into unified diff text
    fn format_diff(diff: &FileDiff) -> String {
        let mut lines = Vec::new();
        for content in &diff.content {
            if let Some(ab) = &content.ab {
                for line in ab {
                    lines.push(format!(" {line}"));
                }
            } else if let Some(a) = &content.a {
                for line in a {
                    lines.push(format!("-{line}"));
                }
            } else if let Some(b) = &content.b {
                for line in b {
                    lines.push(format!("+{line}"));
                }
            }
        }
        lines.join("\n")
    }
}

#[async_trait]
impl ChangeHost for GerritClient {
    async fn commit_message(&self, change_id: &str, revision_id: &str) -> Result<String> {
        let endpoint = format!("changes/{change_id}/revisions/{revision_id}/commit");
        let value = self.get_json(&endpoint).await?;
        let commit: CommitDetail = serde_json::from_value(value)
            .map_err(|e| GavelError::host("commit detail missing message").with_source(e))?;
        Ok(commit.message)
    }

    async fn changed_files(&self, change_id: &str, revision_id: &str) -> Result<Vec<String>> {
        let endpoint = format!("changes/{change_id}/revisions/{revision_id}/files");
        let value = self.get_json(&endpoint).await?;

        match value {
            Value::Object(map) => Ok(map.keys().cloned().collect()),
            _ => Err(GavelError::host("unexpected file listing shape")),
        }
    }

    async fn file_diff(
        &self,
        change_id: &str,
        revision_id: &str,
        file_path: &str,
    ) -> Result<String> {
        // Gerrit expects the file path percent-encoded as a single segment
        let encoded: String = file_path
            .bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                    (b as char).to_string()
                }
                _ => format!("%{b:02X}"),
            })
            .collect();

        let endpoint =
            format!("changes/{change_id}/revisions/{revision_id}/files/{encoded}/diff?context=ALL");
        let value = self.get_json(&endpoint).await?;
        let diff: FileDiff = serde_json::from_value(value)
            .map_err(|e| GavelError::host("failed to parse file diff").with_source(e))?;

        Ok(Self::format_diff(&diff))
    }

    async fn post_review(
        &self,
        change_id: &str,
        revision_id: &str,
        review: &HostReview,
    ) -> Result<()> {
        let url = format!(
            "{}/a/changes/{change_id}/revisions/{revision_id}/review",
            self.base_url
        );
        info!(change = %change_id, score = review.score, "posting review");

        self.client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(review)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| GavelError::host("failed to post review").with_source(e))?;

        Ok(())
    }
}

/// Build the labels map for a vote on the standard review label
pub fn review_labels(score: i8) -> BTreeMap<String, i8> {
    BTreeMap::from([("Code-Review".to_string(), score)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_diff_markers() {
        let diff = FileDiff {
            content: vec![
                DiffContent {
                    ab: Some(vec!["context".to_string()]),
                    a: None,
                    b: None,
                },
                DiffContent {
                    ab: None,
                    a: Some(vec!["removed".to_string()]),
                    b: None,
                },
                DiffContent {
                    ab: None,
                    a: None,
                    b: Some(vec!["added".to_string()]),
                },
            ],
        };
        assert_eq!(GerritClient::format_diff(&diff), " context\n-removed\n+added");
    }

    #[test]
    fn test_xssi_prefix_stripped() {
        let body = ")]}'\n{\"message\": \"hi\"}";
        let stripped = body.strip_prefix(XSSI_PREFIX).unwrap();
        let value: Value = serde_json::from_str(stripped.trim()).unwrap();
        assert_eq!(value["message"], "hi");
    }

    #[test]
    fn test_review_labels() {
        let labels = review_labels(-1);
        assert_eq!(labels.get("Code-Review"), Some(&-1));
    }
}
