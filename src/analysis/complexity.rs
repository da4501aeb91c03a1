//! Approximate cyclomatic complexity.
//!
//! Keyword-density proxy for branching complexity: base 1, plus one per
//! branch/boolean pattern match anywhere in the block. This is deliberately
//! not a control-flow-graph computation; the pattern set is fixed and must
//! stay stable for score parity across runs.

use once_cell::sync::Lazy;
use regex::Regex;

static COMPLEXITY_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?im)\bif\b",
        r"(?im)\belse\s+if\b",
        r"(?im)\belif\b",
        r"(?im)\bwhile\b",
        r"(?im)\bfor\b",
        r"(?im)\btry\b",
        r"(?im)\bcatch\b",
        r"(?im)\bexcept\b",
        r"(?im)\bswitch\b",
        r"(?im)\bcase\b",
        // Ternary operator
        r"(?im)\b\?\s*.*\s*:\s*.*\b",
        // Logical AND / OR
        r"(?im)\b&&\b",
        r"(?im)\b\|\|\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid complexity pattern"))
    .collect()
});

/// Calculate approximate cyclomatic complexity of a code block.
///
/// Empty input returns the base complexity of 1.
pub fn cyclomatic_complexity(code_text: &str) -> u32 {
    if code_text.is_empty() {
        return 1;
    }

    let mut complexity = 1u32;
    for pattern in COMPLEXITY_PATTERNS.iter() {
        complexity += pattern.find_iter(code_text).count() as u32;
    }
    complexity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_base_complexity() {
        assert_eq!(cyclomatic_complexity(""), 1);
    }

    #[test]
    fn test_each_branch_adds_one() {
        assert_eq!(cyclomatic_complexity("if x:\n    pass"), 2);
        assert_eq!(cyclomatic_complexity("if x:\n    pass\nwhile y:\n    pass"), 3);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            cyclomatic_complexity("IF x THEN"),
            cyclomatic_complexity("if x then")
        );
    }

    #[test]
    fn test_monotone_under_appended_keywords() {
        let mut text = String::from("let x = 1;");
        let mut previous = cyclomatic_complexity(&text);
        for keyword in ["if", "while", "for", "case", "catch"] {
            text.push('\n');
            text.push_str(keyword);
            let current = cyclomatic_complexity(&text);
            assert!(current >= previous, "complexity decreased after {keyword}");
            previous = current;
        }
    }

    #[test]
    fn test_plain_code_stays_at_base() {
        assert_eq!(cyclomatic_complexity("x = a + b\ny = x * 2"), 1);
    }
}
