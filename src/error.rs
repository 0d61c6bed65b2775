//! Error types for the Expendibots engine.
//!
//! `BoardError` covers a single rejected mutation of a [`crate::engine::Board`]. The successor
//! generator treats these as "this move does not exist" and keeps enumerating. `Error` is what
//! the rest of the crate surfaces to callers: bad input positions, illegal actions in an
//! interactive game, and loader failures.

use crate::engine::Owner;
use thiserror::Error;

/// Reasons a single slide or explosion is rejected by the board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("coordinate ({x}, {y}) is outside the 8x8 board")]
    OutOfRange { x: usize, y: usize },

    #[error("cannot move {requested} pieces from a stack of {available}")]
    InsufficientPieces { requested: u8, available: u8 },

    #[error("destination ({x}, {y}) is off the board")]
    OutOfBounds { x: isize, y: isize },

    #[error("destination ({x}, {y}) is held by {owner}")]
    BlockedByOpponent { x: usize, y: usize, owner: Owner },

    #[error("slide from {from:?} to {to:?} is not along a single row or column")]
    NotOrthogonal {
        from: (usize, usize),
        to: (usize, usize),
    },
}

/// Crate-level error type.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("invalid position: {reason}")]
    InvalidPosition { reason: String },

    #[error("illegal action: {reason}")]
    IllegalAction { reason: String },

    #[error("failed to parse position JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn invalid_position(reason: impl Into<String>) -> Self {
        Error::InvalidPosition {
            reason: reason.into(),
        }
    }

    pub(crate) fn illegal_action(reason: impl Into<String>) -> Self {
        Error::IllegalAction {
            reason: reason.into(),
        }
    }
}
