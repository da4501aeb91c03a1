//! Commit message quality analysis.

use serde::{Deserialize, Serialize};

use super::spelling::check_spelling;
use super::Finding;

/// Imperative verbs a well-formed first line is expected to start with
const IMPERATIVE_VERBS: &[&str] = &[
    "Add", "Fix", "Update", "Remove", "Create", "Implement", "Refactor",
];

const MAX_FIRST_LINE: usize = 72;
const MIN_FIRST_LINE: usize = 10;

/// Rule-based commit message assessment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitAnalysis {
    /// 1-10, floored at 1
    pub quality_score: u32,
    pub message_length: usize,
    pub first_line_length: usize,
    pub line_count: usize,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub spelling_mistakes: Vec<Finding>,
}

/// Score a commit message against formatting and style rules.
///
/// Starts at 10 and subtracts for an over-long or too-short first line, a
/// non-imperative opening, a missing blank separator line, and each known
/// misspelling. An empty message short-circuits to a score of 1.
pub fn analyze_commit_message(commit_message: &str) -> CommitAnalysis {
    if commit_message.is_empty() {
        return CommitAnalysis {
            quality_score: 1,
            message_length: 0,
            first_line_length: 0,
            line_count: 0,
            issues: vec!["Commit message is empty".to_string()],
            suggestions: vec!["Add a descriptive commit message".to_string()],
            spelling_mistakes: Vec::new(),
        };
    }

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    let mut score: i32 = 10;

    let lines: Vec<&str> = commit_message.trim().split('\n').collect();
    let first_line = lines.first().copied().unwrap_or("");

    if first_line.len() > MAX_FIRST_LINE {
        issues.push("First line is too long (>72 characters)".to_string());
        suggestions.push("Keep the first line under 72 characters".to_string());
        score -= 2;
    }

    if first_line.len() < MIN_FIRST_LINE {
        issues.push("First line is too short (<10 characters)".to_string());
        suggestions.push("Make the commit message more descriptive".to_string());
        score -= 2;
    }

    if !IMPERATIVE_VERBS.iter().any(|v| first_line.starts_with(v)) {
        suggestions.push("Consider using imperative mood (Add, Fix, Update, etc.)".to_string());
        score -= 1;
    }

    // The second line, when present, should be a blank separator
    if lines.len() > 1 && !lines[1].trim().is_empty() {
        issues.push("Missing blank line after first line".to_string());
        suggestions.push("Add a blank line after the first line".to_string());
        score -= 1;
    }

    let spelling_mistakes = check_spelling(commit_message);
    if !spelling_mistakes.is_empty() {
        issues.push(format!(
            "Spelling mistakes found: {}",
            spelling_mistakes.len()
        ));
        for mistake in spelling_mistakes.iter().take(3) {
            if let (Some(word), Some(suggestion)) = (&mistake.word, &mistake.suggestion) {
                suggestions.push(format!("Fix spelling: {word} -> {suggestion}"));
            }
        }
        score -= spelling_mistakes.len() as i32;
    }

    CommitAnalysis {
        quality_score: score.max(1) as u32,
        message_length: commit_message.len(),
        first_line_length: first_line.len(),
        line_count: lines.len(),
        issues,
        suggestions,
        spelling_mistakes,
    }
}
