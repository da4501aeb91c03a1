//! Heuristic code-smell detection.
//!
//! Three independent, cumulative passes over a block of added code:
//! long methods, magic numbers, and duplicated lines. All passes are
//! line/regex based - precision is traded for language-agnostic coverage.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use super::Finding;

/// How many lines a function may span before it is flagged
const LONG_METHOD_THRESHOLD: usize = 50;

/// Minimum trimmed length for a line to participate in duplicate detection
const DUPLICATE_MIN_LEN: usize = 10;

/// Function/method signature approximations: Python-style, JavaScript-style,
/// and class-member-style declarations
static FUNCTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"def\s+\w+\s*\(",
        r"function\s+\w+\s*\(",
        r"(public|private|protected)?\s*(static)?\s*\w+\s+\w+\s*\(",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid function pattern"))
    .collect()
});

/// Standalone integer literals of two or more digits, not adjacent to
/// identifier or decimal characters
static MAGIC_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^\w.])\d{2,}(?:[^\w.]|$)").expect("valid magic number pattern"));

/// Detect common code smells in a block of code.
///
/// The `file_path` is accepted for parity with the other detectors but the
/// heuristics themselves are path-independent.
pub fn detect_code_smells(code_text: &str, _file_path: &str) -> Vec<Finding> {
    let mut smells = Vec::new();

    if code_text.is_empty() {
        return smells;
    }

    let lines: Vec<&str> = code_text.split('\n').collect();

    // Long method detection: once a signature is seen, count lines until the
    // threshold is crossed, emit one finding at the signature line, and arm
    // again only on the next signature.
    let mut in_function = false;
    let mut function_line_count = 0usize;
    let mut function_start = 0usize;

    for (i, line) in lines.iter().enumerate() {
        for pattern in FUNCTION_PATTERNS.iter() {
            if pattern.is_match(line) {
                in_function = true;
                function_start = i;
                function_line_count = 0;
                break;
            }
        }

        if in_function {
            function_line_count += 1;

            if function_line_count > LONG_METHOD_THRESHOLD {
                smells.push(
                    Finding::new(
                        "Long Method",
                        format!(
                            "Method/function is {function_line_count} lines long, consider breaking it down"
                        ),
                    )
                    .at_line(function_start + 1),
                );
                in_function = false;
            }
        }
    }

    // Magic numbers: one finding per line containing an occurrence
    for (i, line) in lines.iter().enumerate() {
        if MAGIC_NUMBER.is_match(line) {
            smells.push(
                Finding::new(
                    "Magic Number",
                    "Consider extracting magic numbers into named constants",
                )
                .at_line(i + 1),
            );
        }
    }

    // Duplicate lines: first occurrence of each hash is remembered, not
    // flagged; later occurrences reference the earlier line
    let mut line_hashes: HashMap<String, usize> = HashMap::new();
    for (i, line) in lines.iter().enumerate() {
        let stripped = line.trim();
        if stripped.len() > DUPLICATE_MIN_LEN {
            let digest = format!("{:x}", Sha256::digest(stripped.as_bytes()));
            match line_hashes.get(&digest) {
                Some(&first) => {
                    smells.push(
                        Finding::new("Duplicate Code", format!("Similar to line {}", first + 1))
                            .at_line(i + 1),
                    );
                }
                None => {
                    line_hashes.insert(digest, i);
                }
            }
        }
    }

    smells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(detect_code_smells("", "foo.py").is_empty());
    }

    #[test]
    fn test_long_method_flagged_once() {
        let mut code = String::from("def long_one():\n");
        for i in 0..60 {
            code.push_str(&format!("    x = compute(step_{i})\n"));
        }
        let smells = detect_code_smells(&code, "foo.py");
        let long: Vec<_> = smells.iter().filter(|s| s.kind == "Long Method").collect();
        assert_eq!(long.len(), 1);
        assert_eq!(long[0].line, Some(1));
    }

    #[test]
    fn test_short_function_not_flagged() {
        let code = "def tiny():\n    return 1\n";
        let smells = detect_code_smells(code, "foo.py");
        assert!(smells.iter().all(|s| s.kind != "Long Method"));
    }

    #[test]
    fn test_magic_number_per_line() {
        let code = "timeout = 300\nretries = 3\ndelay = 5000";
        let magic: Vec<_> = detect_code_smells(code, "foo.py")
            .into_iter()
            .filter(|s| s.kind == "Magic Number")
            .collect();
        assert_eq!(magic.len(), 2);
        assert_eq!(magic[0].line, Some(1));
        assert_eq!(magic[1].line, Some(3));
    }

    #[test]
    fn test_identifier_digits_not_magic() {
        let code = "sha256_digest = hash_v2(value)";
        let smells = detect_code_smells(code, "foo.py");
        assert!(smells.iter().all(|s| s.kind != "Magic Number"));
    }

    #[test]
    fn test_duplicate_references_first_occurrence() {
        let code = "result = compute_totals(a, b)\nother = 1\nresult = compute_totals(a, b)";
        let dups: Vec<_> = detect_code_smells(code, "foo.py")
            .into_iter()
            .filter(|s| s.kind == "Duplicate Code")
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].line, Some(3));
        assert!(dups[0].description.contains("line 1"));
    }

    #[test]
    fn test_short_lines_not_duplicates() {
        let code = "x = 1\ny = 2\nx = 1";
        let smells = detect_code_smells(code, "foo.py");
        assert!(smells.iter().all(|s| s.kind != "Duplicate Code"));
    }
}
