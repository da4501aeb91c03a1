//! Pattern-based security scanning.
//!
//! A declarative table of (pattern, category, description) rules evaluated
//! line-by-line. One line may produce multiple findings when several
//! patterns match; each finding carries the trimmed line as a snippet.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Finding;

struct SecurityRule {
    pattern: Regex,
    category: &'static str,
    description: &'static str,
}

static SECURITY_RULES: Lazy<Vec<SecurityRule>> = Lazy::new(|| {
    let table: &[(&str, &str, &str)] = &[
        (
            r"(?i)eval\s*\(",
            "Code Injection",
            "Use of eval() can lead to code injection",
        ),
        (
            r"(?i)exec\s*\(",
            "Code Injection",
            "Use of exec() can lead to code injection",
        ),
        (
            r"(?i)system\s*\(",
            "Command Injection",
            "Direct system calls can be dangerous",
        ),
        (
            r"(?i)shell_exec\s*\(",
            "Command Injection",
            "Shell execution can be dangerous",
        ),
        (
            r#"(?i)password\s*=\s*["'][^"']*["']"#,
            "Hardcoded Credentials",
            "Hardcoded password detected",
        ),
        (
            r#"(?i)api_key\s*=\s*["'][^"']*["']"#,
            "Hardcoded Credentials",
            "Hardcoded API key detected",
        ),
        (
            r#"(?i)secret\s*=\s*["'][^"']*["']"#,
            "Hardcoded Credentials",
            "Hardcoded secret detected",
        ),
        (
            r"(?i)md5\s*\(",
            "Weak Cryptography",
            "MD5 is cryptographically broken",
        ),
        (
            r"(?i)sha1\s*\(",
            "Weak Cryptography",
            "SHA1 is deprecated for security purposes",
        ),
        (
            r"(?i)http://",
            "Insecure Communication",
            "Use HTTPS instead of HTTP",
        ),
        (
            r"(?i)INSERT\s+INTO.*VALUES.*\+",
            "SQL Injection",
            "Potential SQL injection vulnerability",
        ),
        (
            r"(?i)SELECT.*FROM.*WHERE.*\+",
            "SQL Injection",
            "Potential SQL injection vulnerability",
        ),
    ];

    table
        .iter()
        .map(|(pattern, category, description)| SecurityRule {
            pattern: Regex::new(pattern).expect("valid security pattern"),
            category,
            description,
        })
        .collect()
});

/// Scan a block of code for potential security concerns.
///
/// Text with no matching patterns yields an empty list, never an error.
pub fn scan_security(code_text: &str) -> Vec<Finding> {
    let mut concerns = Vec::new();

    if code_text.is_empty() {
        return concerns;
    }

    for (i, line) in code_text.split('\n').enumerate() {
        for rule in SECURITY_RULES.iter() {
            if rule.pattern.is_match(line) {
                concerns.push(
                    Finding::new(rule.category, rule.description)
                        .at_line(i + 1)
                        .with_snippet(line.trim()),
                );
            }
        }
    }

    concerns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_yields_nothing() {
        assert!(scan_security("let total = items.len();").is_empty());
        assert!(scan_security("").is_empty());
    }

    #[test]
    fn test_eval_flagged_as_code_injection() {
        let findings = scan_security("result = eval(user_input)");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "Code Injection");
        assert_eq!(findings[0].line, Some(1));
        assert_eq!(
            findings[0].code_snippet.as_deref(),
            Some("result = eval(user_input)")
        );
    }

    #[test]
    fn test_hardcoded_credentials() {
        let findings = scan_security(r#"password = "letmein""#);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, "Hardcoded Credentials");
    }

    #[test]
    fn test_multiple_findings_on_one_line() {
        // Both the weak hash and the insecure URL match the same line
        let findings = scan_security(r#"digest = md5("http://example.com")"#);
        let kinds: Vec<_> = findings.iter().map(|f| f.kind.as_str()).collect();
        assert!(kinds.contains(&"Weak Cryptography"));
        assert!(kinds.contains(&"Insecure Communication"));
    }

    #[test]
    fn test_sql_concatenation() {
        let findings =
            scan_security(r#"query = "SELECT * FROM users WHERE name = '" + name + "'""#);
        assert!(findings.iter().any(|f| f.kind == "SQL Injection"));
    }

    #[test]
    fn test_case_insensitive() {
        let findings = scan_security("EVAL (payload)");
        assert!(findings.iter().any(|f| f.kind == "Code Injection"));
    }
}
