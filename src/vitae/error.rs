use std::path::PathBuf;
use thiserror::Error;

/// Input that a document operation refused. Nothing is written when one of these is
/// returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    #[error("Category already exists: {0}")]
    DuplicateCategory(String),

    #[error("Category not found: {0}")]
    UnknownCategory(String),

    #[error("Entry name cannot be empty")]
    EmptyEntryName,

    #[error("No entry at index {index} in '{category}' ({len} entries)")]
    IndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },
}

#[derive(Error, Debug)]
pub enum VitaeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{} stayed busy after {attempts} attempts: {source}", path.display())]
    Busy {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Rejected(#[from] Rejection),

    #[error("Config error: {0}")]
    Config(String),
}

impl VitaeError {
    /// True when the caller's input was refused, as opposed to the store failing.
    pub fn is_rejection(&self) -> bool {
        matches!(self, VitaeError::Rejected(_))
    }

    /// True when the failure came from a busy/locked file that never freed up.
    pub fn is_transient(&self) -> bool {
        matches!(self, VitaeError::Busy { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            VitaeError::Rejected(r) => Some(r),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, VitaeError>;
