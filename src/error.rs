//! Level loading errors
//!
//! All of these are one-shot validations at level-load time. A failed level
//! start leaves the controller idle; nothing here is fatal to the process.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LevelError {
    /// Requested level index has no entry in the pack.
    #[error("level {index} not found (pack has {count} levels)")]
    MissingLevel { index: usize, count: usize },
    /// Level has no exit point.
    #[error("level {index} ({name:?}) has no exit")]
    MissingExit { index: usize, name: String },
    /// Level pack contains no levels.
    #[error("level pack is empty")]
    EmptyPack,
    /// JSON could not be decoded.
    #[error("invalid level JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
