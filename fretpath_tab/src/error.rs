// Error types for tab generation.
//
// Configuration problems (bad tunings, malformed notes, unreadable config
// files) surface here and are fatal at construction time. Unplayable notes
// are not errors under the default skip policy; `UnplayableNote` is only
// produced when a caller opts into strict generation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("Unknown tuning preset: {0}")]
    UnknownTuning(String),

    #[error("Invalid note: {0}")]
    InvalidNote(String),

    #[error("Note {index} (pitch {pitch}) has no position on this instrument")]
    UnplayableNote { index: usize, pitch: u8 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TabError>;
