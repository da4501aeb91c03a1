//! Unified error type for the gavel service.
//!
//! One enum covers the whole failure taxonomy: configuration problems,
//! change-host access, AI reviewer failures, analysis errors, persistence,
//! queue rejection, and payload validation. Nothing here is fatal to the
//! process; the background processor logs failures and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience result alias used throughout the crate
pub type Result<T> = std::result::Result<T, GavelError>;

/// The unified error type for the entire gavel application
#[derive(Error, Debug)]
pub enum GavelError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Change host error: {message}")]
    Host {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("AI reviewer error: {message}")]
    Ai {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Analysis error in {file}: {message}")]
    Analysis { file: String, message: String },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Review queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("Validation error: {message}")]
    Validation { message: String },
}

impl GavelError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a change-host error
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
            source: None,
        }
    }

    /// Create an AI reviewer error
    pub fn ai(message: impl Into<String>) -> Self {
        Self::Ai {
            message: message.into(),
            source: None,
        }
    }

    /// Create a per-file analysis error
    pub fn analysis(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Analysis {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            path: None,
            source: None,
        }
    }

    /// Create a storage error referencing a path
    pub fn storage_at(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Storage {
            message: message.into(),
            path: Some(path.into()),
            source: None,
        }
    }

    /// Create a payload validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Attach an underlying cause to this error
    pub fn with_source(
        mut self,
        src: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        match &mut self {
            Self::Config { source, .. }
            | Self::Host { source, .. }
            | Self::Ai { source, .. }
            | Self::Storage { source, .. } => *source = Some(Box::new(src)),
            Self::Analysis { .. } | Self::QueueFull { .. } | Self::Validation { .. } => {}
        }
        self
    }
}

impl From<std::io::Error> for GavelError {
    fn from(err: std::io::Error) -> Self {
        GavelError::storage("I/O operation failed").with_source(err)
    }
}

impl From<serde_json::Error> for GavelError {
    fn from(err: serde_json::Error) -> Self {
        GavelError::storage("JSON serialization failed").with_source(err)
    }
}

impl From<reqwest::Error> for GavelError {
    fn from(err: reqwest::Error) -> Self {
        GavelError::host("HTTP request failed").with_source(err)
    }
}
