use thiserror::Error;

use crate::director::utils::fourcc_to_string;

/// Failures that abort reading a whole movie.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("not a Director file (tag {})", fourcc_to_string(*.tag))]
    NotADirectorFile { tag: u32 },

    #[error("cannot read {path}: {source}")]
    Open {
        path: String,
        source: std::io::Error,
    },

    #[error("file truncated: {0}")]
    Truncated(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

/// Failures local to one chunk. Callers log these and move on.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{fourcc} chunk is malformed: {reason}")]
    Malformed { fourcc: &'static str, reason: String },

    #[error("chunk {0} is missing")]
    Missing(u32),
}

impl ChunkError {
    pub fn malformed(fourcc: &'static str, reason: impl Into<String>) -> ChunkError {
        ChunkError::Malformed {
            fourcc,
            reason: reason.into(),
        }
    }
}

/// Reported when control flow recovery finds a block that leaves the range
/// it was discovered in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecompileError {
    #[error("block at instruction {index} ends at {end}, outside of {range_end}")]
    BlockOutOfRange {
        index: usize,
        end: usize,
        range_end: usize,
    },
}
