//! Inbound change-notification payloads.
//!
//! Only `patchset-created` events trigger a review; everything else is
//! acknowledged and discarded before it reaches the queue.

use serde::{Deserialize, Serialize};

use crate::error::{GavelError, Result};

use super::ChangeInfo;

/// Event type accepted for review
pub const PATCHSET_CREATED: &str = "patchset-created";

/// A change-notification event from the change host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GerritEvent {
    #[serde(rename = "eventType")]
    pub event_type: String,
    pub change: EventChange,
    #[serde(rename = "patchSet")]
    pub patch_set: PatchsetRef,
}

/// The change block of a notification payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventChange {
    pub id: String,
    pub number: u64,
    pub project: String,
    pub branch: String,
    pub subject: String,
    pub owner: EventOwner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventOwner {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchsetRef {
    pub revision: String,
}

impl GerritEvent {
    /// Parse a raw JSON payload, rejecting structurally invalid ones
    pub fn parse(payload: &serde_json::Value) -> Result<Self> {
        serde_json::from_value(payload.clone())
            .map_err(|e| GavelError::validation(format!("malformed notification payload: {e}")))
    }

    /// Whether this event should trigger a review
    pub fn is_review_trigger(&self) -> bool {
        self.event_type == PATCHSET_CREATED
    }

    /// Extract the change identity for evaluation.
    /// Fails for event types that are not review triggers.
    pub fn change_info(&self) -> Result<ChangeInfo> {
        if !self.is_review_trigger() {
            return Err(GavelError::validation(format!(
                "ignoring event type: {}",
                self.event_type
            )));
        }

        Ok(ChangeInfo {
            change_id: self.change.id.clone(),
            change_number: self.change.number.to_string(),
            revision_id: self.patch_set.revision.clone(),
            project: self.change.project.clone(),
            branch: self.change.branch.clone(),
            subject: self.change.subject.clone(),
            owner: self.change.owner.name.clone(),
            owner_email: self.change.owner.email.clone(),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn patchset_created_payload() -> serde_json::Value {
        json!({
            "eventType": "patchset-created",
            "change": {
                "id": "I8f2c5d1a",
                "number": 42,
                "project": "tools/gavel",
                "branch": "main",
                "subject": "Fix queue shutdown race",
                "owner": {"name": "Jo Developer", "email": "jo@example.com"}
            },
            "patchSet": {"revision": "abc123"}
        })
    }

    #[test]
    fn test_parse_and_extract() {
        let event = GerritEvent::parse(&patchset_created_payload()).unwrap();
        assert!(event.is_review_trigger());

        let info = event.change_info().unwrap();
        assert_eq!(info.change_id, "I8f2c5d1a");
        assert_eq!(info.change_number, "42");
        assert_eq!(info.revision_id, "abc123");
        assert_eq!(info.owner, "Jo Developer");
    }

    #[test]
    fn test_other_event_types_rejected() {
        let mut payload = patchset_created_payload();
        payload["eventType"] = serde_json::Value::String("comment-added".to_string());

        let event = GerritEvent::parse(&payload).unwrap();
        assert!(!event.is_review_trigger());
        assert!(event.change_info().is_err());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let payload = json!({"eventType": "patchset-created"});
        assert!(GerritEvent::parse(&payload).is_err());
    }
}
