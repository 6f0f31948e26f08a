use core::fmt;
use core::str::FromStr;
use skirmish_core::{Coord, GroupId, Move, ParticipantId, SessionId};

use crate::{ProtocolError, Request};

const RPS_PREFIX: &str = "rps:";
const RPS_CANCEL: &str = "cancel";

/// Payload carried by an inline button and echoed back when it is pressed.
///
/// Reveal buttons keep the `<session>:<row>:<col>` shape, RPS buttons use
/// `rps:<move>` and `rps:cancel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Callback {
    Reveal {
        session: SessionId,
        row: Coord,
        col: Coord,
    },
    Pick(Move),
    CancelRps,
}

/// Who pressed a button, and where.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presser {
    pub group: GroupId,
    pub participant: ParticipantId,
    pub name: String,
}

impl Callback {
    pub fn into_request(self, presser: Presser) -> Request {
        match self {
            Self::Reveal { session, row, col } => Request::Reveal {
                session,
                row,
                col,
                actor: presser.name,
            },
            Self::Pick(choice) => Request::PickMove {
                group: presser.group,
                participant: presser.participant,
                name: presser.name,
                choice,
            },
            Self::CancelRps => Request::CancelRps {
                group: presser.group,
            },
        }
    }
}

impl fmt::Display for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reveal { session, row, col } => write!(f, "{session}:{row}:{col}"),
            Self::Pick(choice) => write!(f, "{RPS_PREFIX}{choice}"),
            Self::CancelRps => write!(f, "{RPS_PREFIX}{RPS_CANCEL}"),
        }
    }
}

impl FromStr for Callback {
    type Err = ProtocolError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::Callback(data.to_owned());

        if let Some(rest) = data.strip_prefix(RPS_PREFIX) {
            return if rest == RPS_CANCEL {
                Ok(Self::CancelRps)
            } else {
                rest.parse().map(Self::Pick).map_err(|_| malformed())
            };
        }

        let mut parts = data.rsplitn(3, ':');
        let (Some(col), Some(row), Some(session)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if session.is_empty() {
            return Err(malformed());
        }

        Ok(Self::Reveal {
            session: session.to_owned(),
            row: row.parse().map_err(|_| malformed())?,
            col: col.parse().map_err(|_| malformed())?,
        })
    }
}
