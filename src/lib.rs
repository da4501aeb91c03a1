//! # Gavel
//!
//! An automated change-review service. Gavel evaluates a source-code change
//! (per-file diffs plus a commit message) and produces a single structured
//! quality verdict combining two signal sources: scores from an external AI
//! reviewer and scores from a deterministic rule-based analyzer operating
//! directly on the diff text.
//!
//! ## Modules
//!
//! - `analysis` - Rule-based static analysis over diff text (heuristic detectors)
//! - `ai` - AI reviewer boundary: trait, HTTP client, prompt and report rendering
//! - `config` - Settings and the closed review-criteria table
//! - `host` - Change-hosting system boundary (Gerrit client, notification events)
//! - `pipeline` - Task queue, background processor, and the end-to-end evaluator
//! - `review` - Review combination, scoring, and identifiers
//! - `server` - HTTP surface for webhooks and service introspection
//! - `storage` - JSON-file persistence of combined reviews

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod host;
pub mod pipeline;
pub mod review;
pub mod server;
pub mod storage;

pub use error::{GavelError, Result};
