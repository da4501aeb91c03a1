//! Per-file analysis composition.
//!
//! Wires the diff parser and every heuristic detector together into one
//! [`FileAnalysis`] record for a single changed file.

use serde::{Deserialize, Serialize};

use super::complexity::cyclomatic_complexity;
use super::diff::parse_diff;
use super::language::Language;
use super::metrics::{calculate_file_metrics, FileMetrics};
use super::naming::validate_naming;
use super::security::scan_security;
use super::smells::detect_code_smells;
use super::spelling::check_spelling;
use super::Finding;

/// Complete rule-based analysis of one changed file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub file_path: String,
    pub language: Language,
    pub lines_changed: usize,
    pub lines_added: usize,
    pub lines_removed: usize,
    pub complexity: u32,
    pub complexity_indicators: Vec<String>,
    pub code_smells: Vec<Finding>,
    pub security_concerns: Vec<Finding>,
    pub naming_violations: Vec<Finding>,
    pub spelling_mistakes: Vec<Finding>,
    pub file_metrics: FileMetrics,
}

/// Analyze a single file's diff.
///
/// All detectors operate on the file's added content only; removed lines
/// contribute to the change counts but are never scanned.
pub fn analyze_file(file_path: &str, diff_content: &str) -> FileAnalysis {
    let diff = parse_diff(diff_content);
    let added_code = diff.added_content.join("\n");
    let language = Language::from_path(file_path);

    FileAnalysis {
        file_path: file_path.to_string(),
        language,
        lines_changed: diff.modified_lines,
        lines_added: diff.added_lines,
        lines_removed: diff.removed_lines,
        complexity: cyclomatic_complexity(&added_code),
        complexity_indicators: diff.complexity_indicators,
        code_smells: detect_code_smells(&added_code, file_path),
        security_concerns: scan_security(&added_code),
        naming_violations: validate_naming(&added_code, language),
        spelling_mistakes: check_spelling(&added_code),
        file_metrics: calculate_file_metrics(&added_code),
    }
}
