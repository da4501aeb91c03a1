//! End-to-end pipeline tests with in-memory host and reviewer fakes.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use gavel::ai::{AiReview, AiReviewer, Approval, CriterionScore, ReviewSummary};
use gavel::config::ScoringWeights;
use gavel::host::{ChangeHost, ChangeInfo, GerritEvent, HostReview};
use gavel::pipeline::{
    review_queue, spawn_processor, Evaluator, ProcessorState, ReviewTask,
};
use gavel::review::ReviewId;
use gavel::storage::ReviewStore;
use gavel::{GavelError, Result};

struct StubHost {
    commit_message: String,
    diffs: BTreeMap<String, String>,
    posted: Mutex<Vec<HostReview>>,
}

impl StubHost {
    fn new(commit_message: &str, diffs: &[(&str, &str)]) -> Self {
        Self {
            commit_message: commit_message.to_string(),
            diffs: diffs
                .iter()
                .map(|(path, diff)| (path.to_string(), diff.to_string()))
                .collect(),
            posted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ChangeHost for StubHost {
    async fn commit_message(&self, _: &str, _: &str) -> Result<String> {
        Ok(self.commit_message.clone())
    }

    async fn changed_files(&self, _: &str, _: &str) -> Result<Vec<String>> {
        Ok(self.diffs.keys().cloned().collect())
    }

    async fn file_diff(&self, _: &str, _: &str, file_path: &str) -> Result<String> {
        self.diffs
            .get(file_path)
            .cloned()
            .ok_or_else(|| GavelError::host("diff unavailable"))
    }

    async fn post_review(&self, _: &str, _: &str, review: &HostReview) -> Result<()> {
        self.posted.lock().unwrap().push(review.clone());
        Ok(())
    }
}

struct StubReviewer {
    review: AiReview,
    fail: bool,
}

#[async_trait]
impl AiReviewer for StubReviewer {
    async fn review(&self, _: &gavel::host::ReviewContext) -> Result<AiReview> {
        if self.fail {
            return Err(GavelError::ai("model unavailable"));
        }
        Ok(self.review.clone())
    }

    fn model_name(&self) -> &str {
        "stub-model"
    }
}

fn stub_ai_review(criteria: &[(&str, f64)]) -> AiReview {
    AiReview {
        overall_score: 8.0,
        overall_feedback: "Reasonable change.".to_string(),
        criteria_scores: criteria
            .iter()
            .map(|(key, score)| {
                (
                    key.to_string(),
                    CriterionScore {
                        score: *score,
                        feedback: "Fine.".to_string(),
                        suggestions: vec![],
                    },
                )
            })
            .collect(),
        summary: ReviewSummary::default(),
        approval_recommendation: Approval::Approve,
        confidence_level: 0.9,
    }
}

fn change_info() -> ChangeInfo {
    ChangeInfo {
        change_id: "Iabc123".to_string(),
        change_number: "7".to_string(),
        revision_id: "deadbeef".to_string(),
        project: "tools/widgets".to_string(),
        branch: "main".to_string(),
        subject: "Fix widget parsing".to_string(),
        owner: "Jo Developer".to_string(),
        owner_email: "jo@example.com".to_string(),
    }
}

fn evaluator(
    host: Arc<StubHost>,
    reviewer: StubReviewer,
    store_dir: &TempDir,
    auto_post: bool,
) -> Evaluator {
    Evaluator::new(
        host,
        Arc::new(reviewer),
        ReviewStore::new(store_dir.path()),
        ScoringWeights::default(),
        7.0,
        auto_post,
    )
}

#[tokio::test]
async fn test_evaluate_persists_and_posts_back() {
    let host = Arc::new(StubHost::new(
        "Fix the widget parser edge case",
        &[("widgets/parser.py", "+def parse(data):\n+    return data\n")],
    ));
    let dir = TempDir::new().unwrap();
    let eval = evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[("isCodeWellWritten", 9.0), ("securityConcernsAny", 9.0)]),
            fail: false,
        },
        &dir,
        true,
    );

    let review = eval.evaluate(change_info()).await.unwrap();

    // Persisted artifact loads back identically scored
    let store = ReviewStore::new(dir.path());
    let loaded = store.load(&review.review_metadata.review_id).unwrap();
    assert_eq!(
        loaded.weighted_overall_score,
        review.weighted_overall_score
    );
    assert_eq!(loaded.review_metadata.ai_model, "stub-model");

    // Posted back with a vote derived from the weighted score
    let posted = host.posted.lock().unwrap();
    assert_eq!(posted.len(), 1);
    assert!(posted[0].message.contains("Automated Code Review"));
    assert_eq!(
        posted[0].score,
        if review.overall_score >= 7.0 { 1 } else { -1 }
    );
    assert_eq!(posted[0].labels.get("Code-Review"), Some(&posted[0].score));
}

#[tokio::test]
async fn test_vote_follows_ai_overall_despite_clamped_weighted_score() {
    // Security evidence drags the weighted score below the minimum, but
    // the posted vote follows the AI overall score
    let host = Arc::new(StubHost::new(
        "Fix widget auth handling",
        &[("widgets/auth.py", "+result = eval(user_input)\n")],
    ));
    let dir = TempDir::new().unwrap();
    let eval = evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[("securityConcernsAny", 9.0)]),
            fail: false,
        },
        &dir,
        true,
    );

    let review = eval.evaluate(change_info()).await.unwrap();
    assert_eq!(review.overall_score, 8.0);
    assert!(review.weighted_overall_score <= 4.0);

    let posted = host.posted.lock().unwrap();
    assert_eq!(posted.len(), 1);
    assert_eq!(posted[0].score, 1);
}

#[tokio::test]
async fn test_rule_based_evidence_clamps_ai_scores() {
    let host = Arc::new(StubHost::new(
        "Fix widget auth handling",
        &[(
            "widgets/auth.py",
            "+password = \"hunter2\"\n+result = eval(user_input)\n",
        )],
    ));
    let dir = TempDir::new().unwrap();
    let eval = evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[("securityConcernsAny", 9.0)]),
            fail: false,
        },
        &dir,
        false,
    );

    let review = eval.evaluate(change_info()).await.unwrap();
    let security = &review.criteria_scores["securityConcernsAny"];
    assert!(security.score <= 4.0);
    assert!(security.feedback.contains("Rule-based analysis found"));
    assert!(!review
        .rule_based_analysis
        .overall_metrics
        .security_concerns
        .is_empty());
}

#[tokio::test]
async fn test_ai_failure_aborts_without_artifact() {
    let host = Arc::new(StubHost::new(
        "Fix things",
        &[("a.py", "+x = 1\n")],
    ));
    let dir = TempDir::new().unwrap();
    let eval = evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[]),
            fail: true,
        },
        &dir,
        true,
    );

    let err = eval.evaluate(change_info()).await.unwrap_err();
    assert!(matches!(err, GavelError::Ai { .. }));

    // Nothing persisted, nothing posted
    assert!(ReviewStore::new(dir.path()).list().unwrap().is_empty());
    assert!(host.posted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_processor_drains_queue_and_stops() {
    let host = Arc::new(StubHost::new(
        "Fix the queue shutdown race",
        &[("q.py", "+x = 1\n")],
    ));
    let dir = TempDir::new().unwrap();
    let eval = Arc::new(evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[("isCodeWellWritten", 8.0)]),
            fail: false,
        },
        &dir,
        false,
    ));

    let (queue, receiver) = review_queue(8);
    let handle = spawn_processor(receiver, eval, Duration::from_millis(20));

    let payload = serde_json::json!({
        "eventType": "patchset-created",
        "change": {
            "id": "Iabc123",
            "number": 7,
            "project": "tools/widgets",
            "branch": "main",
            "subject": "Fix the queue shutdown race",
            "owner": {"name": "Jo Developer", "email": "jo@example.com"}
        },
        "patchSet": {"revision": "deadbeef"}
    });
    let event = GerritEvent::parse(&payload).unwrap();
    queue.enqueue(ReviewTask::new(event)).unwrap();

    // Give the processor time to drain the task
    let store = ReviewStore::new(dir.path());
    let mut saved = Vec::new();
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        saved = store.list().unwrap();
        if !saved.is_empty() {
            break;
        }
    }
    assert_eq!(saved.len(), 1);
    assert_eq!(queue.depth(), 0);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_processor_survives_failing_task() {
    let host = Arc::new(StubHost::new("Fix things", &[("a.py", "+x = 1\n")]));
    let dir = TempDir::new().unwrap();
    let eval = Arc::new(evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[]),
            fail: true,
        },
        &dir,
        false,
    ));

    let (queue, receiver) = review_queue(8);
    let handle = spawn_processor(receiver, eval, Duration::from_millis(20));

    let payload = serde_json::json!({
        "eventType": "patchset-created",
        "change": {
            "id": "Iabc123",
            "number": 7,
            "project": "p",
            "branch": "main",
            "subject": "s",
            "owner": {"name": "n", "email": "e@example.com"}
        },
        "patchSet": {"revision": "r1"}
    });
    queue
        .enqueue(ReviewTask::new(GerritEvent::parse(&payload).unwrap()))
        .unwrap();

    // Failed task is dropped, processor keeps running
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        if queue.depth() == 0 {
            break;
        }
    }
    assert_eq!(queue.depth(), 0);
    assert_ne!(handle.state(), ProcessorState::Stopped);
    assert!(ReviewStore::new(dir.path()).list().unwrap().is_empty());

    handle.shutdown().await;
}

#[tokio::test]
async fn test_review_id_recorded_in_artifact() {
    let host = Arc::new(StubHost::new("Fix ids", &[("a.py", "+x = 1\n")]));
    let dir = TempDir::new().unwrap();
    let eval = evaluator(
        Arc::clone(&host),
        StubReviewer {
            review: stub_ai_review(&[("isCodeWellWritten", 8.0)]),
            fail: false,
        },
        &dir,
        false,
    );

    let review = eval.evaluate(change_info()).await.unwrap();
    let id = review.review_metadata.review_id.as_str().to_string();
    assert_eq!(id.len(), 16);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));

    let loaded = ReviewStore::new(dir.path())
        .load(&ReviewId::from_string(id))
        .unwrap();
    assert_eq!(loaded.review_metadata.change.change_id, "Iabc123");
}
