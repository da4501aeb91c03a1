//! Unified-diff parsing.
//!
//! Turns the raw diff text for one file into structured added/removed line
//! lists plus the coarse "complexity indicator" lines used downstream by the
//! rule-based analyzer.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Keywords that mark a line as a branching-complexity indicator
static COMPLEXITY_INDICATORS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bif\b",
        r"(?i)\belse\b",
        r"(?i)\belif\b",
        r"(?i)\bwhile\b",
        r"(?i)\bfor\b",
        r"(?i)\btry\b",
        r"(?i)\bcatch\b",
        r"(?i)\bexcept\b",
        r"(?i)\bswitch\b",
        r"(?i)\bcase\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid complexity indicator pattern"))
    .collect()
});

/// Structured view of one file's diff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiffStats {
    pub added_lines: usize,
    pub removed_lines: usize,
    /// Sum of added and removed lines
    pub modified_lines: usize,
    pub added_content: Vec<String>,
    pub removed_content: Vec<String>,
    pub complexity_indicators: Vec<String>,
}

/// Parse raw unified-diff text into [`DiffStats`].
///
/// Lines beginning with `+` (but not `+++`) are added lines; symmetric for
/// `-`/`---`. Empty input yields all-zero stats and never fails.
pub fn parse_diff(diff_text: &str) -> DiffStats {
    if diff_text.is_empty() {
        return DiffStats::default();
    }

    let mut stats = DiffStats::default();

    for line in diff_text.split('\n') {
        if line.starts_with('+') && !line.starts_with("+++") {
            stats.added_content.push(line[1..].trim().to_string());
            stats.added_lines += 1;

            for pattern in COMPLEXITY_INDICATORS.iter() {
                if pattern.is_match(line) {
                    stats.complexity_indicators.push(line.trim().to_string());
                }
            }
        } else if line.starts_with('-') && !line.starts_with("---") {
            stats.removed_content.push(line[1..].trim().to_string());
            stats.removed_lines += 1;
        }
    }

    stats.modified_lines = stats.added_lines + stats.removed_lines;
    stats
}
