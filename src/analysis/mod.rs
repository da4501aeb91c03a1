//! Rule-based static analysis over diff text.
//!
//! This is the deterministic half of the review verdict: a set of heuristic,
//! line/regex-based detectors that scan the added content of each changed
//! file, plus the aggregation that merges per-file results into one
//! [`RuleBasedAnalysis`] for the whole change. Deliberately not a full
//! static-analysis tool - there is no AST or control-flow graph here.

pub mod commit;
pub mod complexity;
pub mod diff;
pub mod file;
pub mod language;
pub mod metrics;
pub mod naming;
pub mod security;
pub mod smells;
pub mod spelling;

pub use commit::{analyze_commit_message, CommitAnalysis};
pub use complexity::cyclomatic_complexity;
pub use diff::{parse_diff, DiffStats};
pub use file::{analyze_file, FileAnalysis};
pub use language::Language;
pub use metrics::{calculate_file_metrics, FileMetrics};
pub use naming::validate_naming;
pub use security::scan_security;
pub use smells::detect_code_smells;
pub use spelling::check_spelling;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::host::CodeChange;

/// A single heuristic detector hit.
///
/// Findings are tagged with the detector's category, an optional 1-based
/// source line, and detector-specific extras. They never mutate once
/// created; detectors accumulate them into lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violating_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(kind: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            line: None,
            description: description.into(),
            code_snippet: None,
            violating_name: None,
            word: None,
            suggestion: None,
        }
    }

    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }

    pub fn with_violating_name(mut self, name: impl Into<String>) -> Self {
        self.violating_name = Some(name.into());
        self
    }

    pub fn with_correction(mut self, word: impl Into<String>, suggestion: impl Into<String>) -> Self {
        self.word = Some(word.into());
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Aggregate complexity over files whose complexity exceeds the base of 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub average_complexity: f64,
    pub total_complexity: u64,
    pub files_analyzed: usize,
}

/// Cross-file aggregate counters and concatenated finding lists
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_files: usize,
    pub total_lines_changed: usize,
    pub security_concerns: Vec<Finding>,
    pub code_smells: Vec<Finding>,
    pub spelling_mistakes: Vec<Finding>,
    pub naming_violations: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity_metrics: Option<ComplexityMetrics>,
}

/// The full rule-based half of a review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleBasedAnalysis {
    pub file_analyses: BTreeMap<String, FileAnalysis>,
    pub overall_metrics: OverallMetrics,
    pub commit_analysis: CommitAnalysis,
}

/// Aggregates per-file analyses across all files of a change
#[derive(Debug, Clone, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Run every detector over every file of the change and aggregate.
    ///
    /// Files are analyzed independently; the detectors are infallible by
    /// construction, so one file can never abort analysis of the rest.
    pub fn analyze(&self, change: &CodeChange) -> RuleBasedAnalysis {
        let mut file_analyses = BTreeMap::new();
        let mut overall = OverallMetrics {
            total_files: change.files_diff.len(),
            ..OverallMetrics::default()
        };

        let mut total_complexity = 0u64;
        let mut files_with_code = 0usize;

        for (file_path, diff_content) in &change.files_diff {
            let analysis = analyze_file(file_path, diff_content);
            debug!(
                file = %file_path,
                lines_changed = analysis.lines_changed,
                complexity = analysis.complexity,
                "analyzed file"
            );

            overall.total_lines_changed += analysis.lines_changed;
            overall
                .security_concerns
                .extend(analysis.security_concerns.iter().cloned());
            overall.code_smells.extend(analysis.code_smells.iter().cloned());
            overall
                .spelling_mistakes
                .extend(analysis.spelling_mistakes.iter().cloned());
            overall
                .naming_violations
                .extend(analysis.naming_violations.iter().cloned());

            if analysis.complexity > 1 {
                total_complexity += u64::from(analysis.complexity);
                files_with_code += 1;
            }

            file_analyses.insert(file_path.clone(), analysis);
        }

        if files_with_code > 0 {
            overall.complexity_metrics = Some(ComplexityMetrics {
                average_complexity: total_complexity as f64 / files_with_code as f64,
                total_complexity,
                files_analyzed: files_with_code,
            });
        }

        RuleBasedAnalysis {
            file_analyses,
            overall_metrics: overall,
            commit_analysis: analyze_commit_message(&change.commit_message),
        }
    }
}
