//! The closed review-criteria table.
//!
//! Criteria are a fixed enumeration rather than free-form string keys: each
//! carries its wire key (the camelCase name used in AI responses and
//! persisted reviews), a human-readable label, and a scoring weight. The
//! weight table doubles as the membership filter for the weighted overall
//! score - criteria keys unknown to this table are carried through verbatim
//! but never contribute to the recalculated score.

use serde::{Deserialize, Serialize};

/// A named dimension of review quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criterion {
    CodeChangesOptimized,
    CodeChangesRelative,
    CodeFormatted,
    CodeWellWritten,
    CommentsWritten,
    CyclomaticComplexity,
    MissingElements,
    Loopholes,
    CommitMessageWellWritten,
    NamingConventionFollowed,
    SpellingMistakes,
    SecurityConcerns,
    CodeDuplicated,
    ConstantsDefinedCentrally,
    CodeModular,
    LoggingDoneProperly,
}

impl Criterion {
    /// Every criterion, in table order
    pub const ALL: [Criterion; 16] = [
        Criterion::CodeChangesOptimized,
        Criterion::CodeChangesRelative,
        Criterion::CodeFormatted,
        Criterion::CodeWellWritten,
        Criterion::CommentsWritten,
        Criterion::CyclomaticComplexity,
        Criterion::MissingElements,
        Criterion::Loopholes,
        Criterion::CommitMessageWellWritten,
        Criterion::NamingConventionFollowed,
        Criterion::SpellingMistakes,
        Criterion::SecurityConcerns,
        Criterion::CodeDuplicated,
        Criterion::ConstantsDefinedCentrally,
        Criterion::CodeModular,
        Criterion::LoggingDoneProperly,
    ];

    /// The camelCase key used on the wire and in persisted reviews
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::CodeChangesOptimized => "areCodeChangesOptimized",
            Criterion::CodeChangesRelative => "areCodeChangesRelative",
            Criterion::CodeFormatted => "isCodeFormatted",
            Criterion::CodeWellWritten => "isCodeWellWritten",
            Criterion::CommentsWritten => "areCommentsWritten",
            Criterion::CyclomaticComplexity => "cyclomaticComplexityScore",
            Criterion::MissingElements => "missingElements",
            Criterion::Loopholes => "loopholes",
            Criterion::CommitMessageWellWritten => "isCommitMessageWellWritten",
            Criterion::NamingConventionFollowed => "isNamingConventionFollowed",
            Criterion::SpellingMistakes => "areThereAnySpellingMistakes",
            Criterion::SecurityConcerns => "securityConcernsAny",
            Criterion::CodeDuplicated => "isCodeDuplicated",
            Criterion::ConstantsDefinedCentrally => "areConstantsDefinedCentrally",
            Criterion::CodeModular => "isCodeModular",
            Criterion::LoggingDoneProperly => "isLoggingDoneProperly",
        }
    }

    /// Human-readable label for rendered reports
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::CodeChangesOptimized => "Are Code Changes Optimized",
            Criterion::CodeChangesRelative => "Are Code Changes Relative",
            Criterion::CodeFormatted => "Is Code Formatted",
            Criterion::CodeWellWritten => "Is Code Well Written",
            Criterion::CommentsWritten => "Are Comments Written",
            Criterion::CyclomaticComplexity => "Cyclomatic Complexity Score",
            Criterion::MissingElements => "Missing Elements",
            Criterion::Loopholes => "Loopholes",
            Criterion::CommitMessageWellWritten => "Is Commit Message Well Written",
            Criterion::NamingConventionFollowed => "Is Naming Convention Followed",
            Criterion::SpellingMistakes => "Are There Any Spelling Mistakes",
            Criterion::SecurityConcerns => "Security Concerns Any",
            Criterion::CodeDuplicated => "Is Code Duplicated",
            Criterion::ConstantsDefinedCentrally => "Are Constants Defined Centrally",
            Criterion::CodeModular => "Is Code Modular",
            Criterion::LoggingDoneProperly => "Is Logging Done Properly",
        }
    }

    /// Description supplied to the AI reviewer prompt
    pub fn description(&self) -> &'static str {
        match self {
            Criterion::CodeChangesOptimized => {
                "Evaluates if the code changes are optimized for performance and efficiency"
            }
            Criterion::CodeChangesRelative => {
                "Checks if code changes are relevant to the intended functionality"
            }
            Criterion::CodeFormatted => {
                "Verifies proper code formatting and style consistency"
            }
            Criterion::CodeWellWritten => "Assesses overall code quality and readability",
            Criterion::CommentsWritten => "Checks for adequate and meaningful comments",
            Criterion::CyclomaticComplexity => {
                "Measures code complexity using cyclomatic complexity"
            }
            Criterion::MissingElements => {
                "Identifies missing components like error handling, validation"
            }
            Criterion::Loopholes => "Identifies potential logic gaps or edge cases",
            Criterion::CommitMessageWellWritten => {
                "Evaluates commit message quality and informativeness"
            }
            Criterion::NamingConventionFollowed => "Checks adherence to naming conventions",
            Criterion::SpellingMistakes => "Identifies spelling errors in code and comments",
            Criterion::SecurityConcerns => "Identifies potential security vulnerabilities",
            Criterion::CodeDuplicated => "Detects code duplication and suggests refactoring",
            Criterion::ConstantsDefinedCentrally => {
                "Checks if constants are properly centralized"
            }
            Criterion::CodeModular => "Evaluates code modularity and separation of concerns",
            Criterion::LoggingDoneProperly => "Checks for proper logging implementation",
        }
    }

    /// Default scoring weight of this criterion
    pub fn weight(&self) -> f64 {
        match self {
            Criterion::CodeChangesOptimized => 1.0,
            Criterion::CodeChangesRelative => 1.0,
            Criterion::CodeFormatted => 0.8,
            Criterion::CodeWellWritten => 1.2,
            Criterion::CommentsWritten => 0.9,
            Criterion::CyclomaticComplexity => 1.1,
            Criterion::MissingElements => 1.0,
            Criterion::Loopholes => 1.2,
            Criterion::CommitMessageWellWritten => 0.7,
            Criterion::NamingConventionFollowed => 0.8,
            Criterion::SpellingMistakes => 0.6,
            Criterion::SecurityConcerns => 1.5,
            Criterion::CodeDuplicated => 1.0,
            Criterion::ConstantsDefinedCentrally => 0.8,
            Criterion::CodeModular => 1.1,
            Criterion::LoggingDoneProperly => 0.9,
        }
    }

    /// Resolve a wire key back to a criterion, `None` for unknown keys
    pub fn from_key(key: &str) -> Option<Criterion> {
        Criterion::ALL.iter().copied().find(|c| c.key() == key)
    }
}

/// Per-criterion scoring weights, resolved once per evaluation.
///
/// Defaults come from the criterion table; individual weights may be
/// overridden through configuration.
#[derive(Debug, Clone, Default)]
pub struct ScoringWeights {
    overrides: Vec<(Criterion, f64)>,
}

impl ScoringWeights {
    /// Build weights from configured overrides keyed by wire key.
    /// Unknown keys are ignored.
    pub fn from_overrides<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Self {
        let overrides = pairs
            .into_iter()
            .filter_map(|(key, weight)| Criterion::from_key(key).map(|c| (c, weight)))
            .collect();
        Self { overrides }
    }

    /// Weight for a known criterion
    pub fn weight_of(&self, criterion: Criterion) -> f64 {
        self.overrides
            .iter()
            .find(|(c, _)| *c == criterion)
            .map(|(_, w)| *w)
            .unwrap_or_else(|| criterion.weight())
    }

    /// Weight for a wire key, `None` when the key is not in the table
    pub fn weight_for_key(&self, key: &str) -> Option<f64> {
        Criterion::from_key(key).map(|c| self.weight_of(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_keys_round_trip() {
        for criterion in Criterion::ALL {
            assert_eq!(Criterion::from_key(criterion.key()), Some(criterion));
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert_eq!(Criterion::from_key("madeUpCriterion"), None);
        assert!(ScoringWeights::default()
            .weight_for_key("madeUpCriterion")
            .is_none());
    }

    #[test]
    fn test_security_weight_highest() {
        let weights = ScoringWeights::default();
        for criterion in Criterion::ALL {
            assert!(weights.weight_of(criterion) <= weights.weight_of(Criterion::SecurityConcerns));
        }
    }

    #[test]
    fn test_override_applies() {
        let weights = ScoringWeights::from_overrides([("securityConcernsAny", 2.0)]);
        assert_eq!(weights.weight_of(Criterion::SecurityConcerns), 2.0);
        // Others keep their defaults
        assert_eq!(weights.weight_of(Criterion::CodeWellWritten), 1.2);
    }
}
