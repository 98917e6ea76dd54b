//! Error types for configuration resolution and board rendering.
//!
//! Every failure in this crate is fatal: nothing is retried and no partial
//! output is produced. The variants mirror the three ways a run can go wrong:
//! bad configuration, a grid too small for its id range, and file output.

use std::fmt;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Failure while resolving configuration, rendering a board, or writing output.
#[derive(Debug)]
pub enum BoardError {
    /// Bad or missing configuration values, including id ranges that fall
    /// outside the tag family's id space.
    Configuration(String),
    /// The configured grid cannot hold the board's id range.
    Capacity {
        /// Name of the offending board.
        board: String,
        /// Number of tags the id range requires.
        required: u32,
        /// Number of grid cells available.
        capacity: u32,
    },
    /// File or encoder output failed.
    Io(String),
}

impl BoardError {
    /// Creates a configuration error from any displayable message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an I/O error from any displayable message.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Capacity {
                board,
                required,
                capacity,
            } => write!(
                f,
                "board '{board}' needs {required} tags but the grid only holds {capacity} \
                 ({} short)",
                required - capacity
            ),
            Self::Io(msg) => write!(f, "output error: {msg}"),
        }
    }
}

impl std::error::Error for BoardError {}
