use serde::{Deserialize, Serialize};
use skirmish_core::*;

use crate::ProtocolError;

/// Everything a transport can ask of the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    StartMines,
    Reveal {
        session: SessionId,
        row: Coord,
        col: Coord,
        actor: String,
    },
    Show {
        session: SessionId,
    },
    DropMines {
        session: SessionId,
    },
    StartRps {
        group: GroupId,
    },
    PickMove {
        group: GroupId,
        participant: ParticipantId,
        name: String,
        #[serde(rename = "move")]
        choice: Move,
    },
    CancelRps {
        group: GroupId,
    },
}

impl Request {
    pub fn from_json(line: &str) -> crate::Result<Self> {
        serde_json::from_str(line).map_err(|err| ProtocolError::Json(err.to_string()))
    }
}

/// Everything the engine hands back for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    MinesStarted {
        grid: GridSnapshot,
    },
    Revealed {
        outcome: RevealOutcome,
        grid: GridSnapshot,
    },
    Grid {
        grid: GridSnapshot,
    },
    MinesDropped {
        session: SessionId,
        existed: bool,
    },
    RpsStarted {
        group: GroupId,
    },
    RpsWaiting {
        group: GroupId,
        count: usize,
    },
    RpsResolved {
        group: GroupId,
        result: RpsResult,
    },
    RpsCancelled {
        group: GroupId,
        existed: bool,
    },
    Error {
        code: String,
        message: String,
    },
}

impl Response {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            log::error!("Could not serialize response: {}", err);
            String::from(r#"{"kind":"error","code":"internal","message":"serialization failed"}"#)
        })
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<GameError> for Response {
    fn from(err: GameError) -> Self {
        Self::Error {
            code: err.code().to_owned(),
            message: err.to_string(),
        }
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Self::Error {
            code: err.code().to_owned(),
            message: err.to_string(),
        }
    }
}
