use thiserror::Error;

use dc_core::{MazeError, Severity};

/// Save/restore errors
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Maze(#[from] MazeError),

    #[error("Save slot '{0}' not found")]
    NotFound(String),

    #[error("Invalid save file header")]
    InvalidHeader,

    #[error("Incompatible save version: expected {expected}, found {found}")]
    IncompatibleVersion { expected: u32, found: u32 },

    #[error("Walk reached {found} rooms but the maze holds {expected}")]
    RoomCountMismatch { expected: usize, found: usize },

    #[error("Room {room}: missing {field}")]
    MissingField { room: String, field: &'static str },

    #[error("Malformed document entry '{key}': {reason}")]
    Malformed { key: String, reason: String },

    #[error("Could not load save slot '{slot}': {source}")]
    Load {
        slot: String,
        #[source]
        source: Box<SaveError>,
    },

    #[error("Could not write save slot '{slot}': {source}")]
    Save {
        slot: String,
        #[source]
        source: Box<SaveError>,
    },
}

impl SaveError {
    /// Decided by the failed operation: a save that could not be written
    /// leaves the session playable, a partial load does not
    pub fn severity(&self) -> Severity {
        match self {
            SaveError::Save { .. } | SaveError::RoomCountMismatch { .. } => Severity::Warning,
            SaveError::Load { .. } => Severity::Fatal,
            SaveError::Maze(err) => err.severity(),
            _ => Severity::Fatal,
        }
    }

    /// The error underneath any `Load`/`Save` wrapping
    pub fn root(&self) -> &SaveError {
        match self {
            SaveError::Load { source, .. } | SaveError::Save { source, .. } => source.root(),
            other => other,
        }
    }
}
