//! Language detection from file extensions.

use serde::{Deserialize, Serialize};

/// Languages recognized by the rule-based analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Cpp,
    C,
    CSharp,
    Php,
    Ruby,
    Go,
    Rust,
    Kotlin,
    Swift,
    Html,
    Css,
    Sql,
    Shell,
    Yaml,
    Json,
    Xml,
    Unknown,
}

/// Extension suffix -> language table
const EXTENSION_TABLE: &[(&str, Language)] = &[
    (".py", Language::Python),
    (".js", Language::JavaScript),
    (".ts", Language::TypeScript),
    (".java", Language::Java),
    (".cpp", Language::Cpp),
    (".c", Language::C),
    (".cs", Language::CSharp),
    (".php", Language::Php),
    (".rb", Language::Ruby),
    (".go", Language::Go),
    (".rs", Language::Rust),
    (".kt", Language::Kotlin),
    (".swift", Language::Swift),
    (".html", Language::Html),
    (".css", Language::Css),
    (".sql", Language::Sql),
    (".sh", Language::Shell),
    (".yml", Language::Yaml),
    (".yaml", Language::Yaml),
    (".json", Language::Json),
    (".xml", Language::Xml),
];

impl Language {
    /// Determine the language from a file path's extension.
    /// Paths with no recognized suffix map to [`Language::Unknown`].
    pub fn from_path(file_path: &str) -> Language {
        let lowered = file_path.to_lowercase();
        EXTENSION_TABLE
            .iter()
            .find(|(ext, _)| lowered.ends_with(ext))
            .map(|(_, lang)| *lang)
            .unwrap_or(Language::Unknown)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Kotlin => "kotlin",
            Language::Swift => "swift",
            Language::Html => "html",
            Language::Css => "css",
            Language::Sql => "sql",
            Language::Shell => "shell",
            Language::Yaml => "yaml",
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Unknown => "unknown",
        };
        write!(f, "{tag}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_extensions() {
        assert_eq!(Language::from_path("src/app.py"), Language::Python);
        assert_eq!(Language::from_path("web/index.ts"), Language::TypeScript);
        assert_eq!(Language::from_path("lib.rs"), Language::Rust);
        assert_eq!(Language::from_path("config.yaml"), Language::Yaml);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(Language::from_path("Main.JAVA"), Language::Java);
    }

    #[test]
    fn test_unknown_suffix() {
        assert_eq!(Language::from_path("Makefile"), Language::Unknown);
        assert_eq!(Language::from_path("notes.txt"), Language::Unknown);
    }

    #[test]
    fn test_display_tags() {
        assert_eq!(Language::CSharp.to_string(), "csharp");
        assert_eq!(Language::Unknown.to_string(), "unknown");
    }
}
