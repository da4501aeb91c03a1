//! Language-conditional naming convention checks.

use once_cell::sync::Lazy;
use regex::Regex;

use super::language::Language;
use super::Finding;

struct NamingRule {
    pattern: Regex,
    message: &'static str,
}

fn build_rules(table: &[(&str, &'static str)]) -> Vec<NamingRule> {
    table
        .iter()
        .map(|(pattern, message)| NamingRule {
            pattern: Regex::new(pattern).expect("valid naming pattern"),
            message,
        })
        .collect()
}

static PYTHON_RULES: Lazy<Vec<NamingRule>> = Lazy::new(|| {
    build_rules(&[
        (
            r"def\s+([A-Z][a-zA-Z0-9_]*)\s*\(",
            "Function names should be lowercase with underscores",
        ),
        (
            r"class\s+([a-z][a-zA-Z0-9_]*)",
            "Class names should use PascalCase",
        ),
        (
            r"([A-Z][A-Z_]+)\s*=",
            "Constants should be UPPERCASE_WITH_UNDERSCORES",
        ),
    ])
});

static JAVASCRIPT_RULES: Lazy<Vec<NamingRule>> = Lazy::new(|| {
    build_rules(&[
        (
            r"function\s+([A-Z][a-zA-Z0-9]*)\s*\(",
            "Function names should be camelCase",
        ),
        (
            r"class\s+([a-z][a-zA-Z0-9]*)",
            "Class names should use PascalCase",
        ),
        (
            r"const\s+([a-z_][a-zA-Z0-9_]*)\s*=",
            "Constants should be UPPERCASE_WITH_UNDERSCORES",
        ),
    ])
});

/// Validate naming conventions for the given language.
///
/// Languages without a rule set yield an empty result, not an error.
pub fn validate_naming(code_text: &str, language: Language) -> Vec<Finding> {
    let rules: &[NamingRule] = match language {
        Language::Python => &PYTHON_RULES,
        Language::JavaScript | Language::TypeScript => &JAVASCRIPT_RULES,
        _ => return Vec::new(),
    };

    let mut violations = Vec::new();

    if code_text.is_empty() {
        return violations;
    }

    for (i, line) in code_text.split('\n').enumerate() {
        for rule in rules {
            if let Some(captures) = rule.pattern.captures(line) {
                let name = captures
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or("unknown");
                violations.push(
                    Finding::new("Naming Convention", rule.message)
                        .at_line(i + 1)
                        .with_violating_name(name),
                );
            }
        }
    }

    violations
}
