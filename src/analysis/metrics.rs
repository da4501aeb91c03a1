//! Per-file line-category metrics.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::complexity::cyclomatic_complexity;

/// Comment syntax prefixes: Python/shell, C-family line comments, and
/// C-style block comment open/continuation/close
static COMMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"^\s*#", r"^\s*//", r"^\s*/\*", r"^\s*\*", r"^\s*\*/"]
        .iter()
        .map(|p| Regex::new(p).expect("valid comment pattern"))
        .collect()
});

/// Line-category counts and comment ratio for one file's added content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub lines_of_code: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub total_lines: usize,
    pub complexity: u32,
    pub comment_ratio: f64,
}

/// Calculate line-category metrics for a block of text.
///
/// A line is blank if empty after trim, else a comment if it matches one of
/// the fixed comment prefixes, else code. The comment ratio divides by
/// `max(code_lines, 1)` to avoid division by zero, which slightly skews the
/// ratio toward 0 when there is no code.
pub fn calculate_file_metrics(file_content: &str) -> FileMetrics {
    if file_content.is_empty() {
        return FileMetrics {
            complexity: 1,
            ..FileMetrics::default()
        };
    }

    let lines: Vec<&str> = file_content.split('\n').collect();
    let total_lines = lines.len();
    let mut blank_lines = 0;
    let mut comment_lines = 0;
    let mut code_lines = 0;

    for line in &lines {
        if line.trim().is_empty() {
            blank_lines += 1;
        } else if COMMENT_PATTERNS.iter().any(|p| p.is_match(line)) {
            comment_lines += 1;
        } else {
            code_lines += 1;
        }
    }

    FileMetrics {
        lines_of_code: code_lines,
        blank_lines,
        comment_lines,
        total_lines,
        complexity: cyclomatic_complexity(file_content),
        comment_ratio: comment_lines as f64 / code_lines.max(1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_content() {
        let metrics = calculate_file_metrics("");
        assert_eq!(metrics.total_lines, 0);
        assert_eq!(metrics.complexity, 1);
        assert_eq!(metrics.comment_ratio, 0.0);
    }

    #[test]
    fn test_line_categories() {
        let content = "x = 1\n\n# a comment\n// another\ny = 2";
        let metrics = calculate_file_metrics(content);
        assert_eq!(metrics.total_lines, 5);
        assert_eq!(metrics.blank_lines, 1);
        assert_eq!(metrics.comment_lines, 2);
        assert_eq!(metrics.lines_of_code, 2);
    }

    #[test]
    fn test_comment_ratio() {
        let metrics = calculate_file_metrics("# one\n# two\nx = 1");
        assert_eq!(metrics.comment_ratio, 2.0);
    }

    #[test]
    fn test_ratio_with_zero_code_lines() {
        // Divisor floors at 1, so a comment-only file reports ratio == comments
        let metrics = calculate_file_metrics("# only\n# comments");
        assert_eq!(metrics.lines_of_code, 0);
        assert_eq!(metrics.comment_ratio, 2.0);
    }

    #[test]
    fn test_block_comment_continuation() {
        let content = "/*\n * middle\n */";
        let metrics = calculate_file_metrics(content);
        assert_eq!(metrics.comment_lines, 3);
    }
}
