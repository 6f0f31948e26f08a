use thiserror::Error;

use crate::{CellCount, Coord};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot place {mines} mines on a {size}x{size} grid")]
    Configuration { size: Coord, mines: CellCount },
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("This game is over or invalid")]
    SessionNotFound,
    #[error("A game is already running in this group")]
    GroupBusy,
    #[error("No active game in this group")]
    GroupStale,
}

impl GameError {
    /// Short machine-readable name, stable across message wording changes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::InvalidCoords => "invalid_coords",
            Self::SessionNotFound => "session_not_found",
            Self::GroupBusy => "group_busy",
            Self::GroupStale => "group_stale",
        }
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
