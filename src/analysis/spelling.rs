//! Closed-dictionary spelling check.
//!
//! Matches tokens against a fixed table of common misspellings. Only words
//! in the table trigger findings; this is not a general spell checker.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Finding;

/// Fixed misspelling -> correction table
static COMMON_MISSPELLINGS: &[(&str, &str)] = &[
    ("recieve", "receive"),
    ("occured", "occurred"),
    ("seperate", "separate"),
    ("definately", "definitely"),
    ("befor", "before"),
    ("afte", "after"),
    ("lenght", "length"),
    ("widht", "width"),
    ("heigth", "height"),
    ("paramater", "parameter"),
    ("paramters", "parameters"),
    ("retrun", "return"),
    ("calback", "callback"),
    ("sucessful", "successful"),
    ("sucessfully", "successfully"),
];

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-zA-Z]+\b").expect("valid word pattern"));

/// Check text for known misspellings (case-insensitive).
pub fn check_spelling(text: &str) -> Vec<Finding> {
    let lowered = text.to_lowercase();
    let mut mistakes = Vec::new();

    for word in WORD.find_iter(&lowered) {
        let word = word.as_str();
        if let Some(&(_, suggestion)) = COMMON_MISSPELLINGS.iter().find(|(w, _)| *w == word) {
            mistakes.push(
                Finding::new(
                    "Spelling Mistake",
                    format!("\"{word}\" should be \"{suggestion}\""),
                )
                .with_correction(word, suggestion),
            );
        }
    }

    mistakes
}
