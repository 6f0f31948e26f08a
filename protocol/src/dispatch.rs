use skirmish_core::{Clock, GameError, MatchStatus, SessionRegistry};

use crate::{Request, Response};

/// Runs one request against the registry; engine errors come back as [`Response::Error`].
pub fn dispatch<C: Clock>(registry: &SessionRegistry<C>, request: Request) -> Response {
    log::trace!("dispatching {:?}", request);
    handle(registry, request).unwrap_or_else(|err| {
        log::debug!("request failed: {}", err);
        Response::from(err)
    })
}

fn handle<C: Clock>(
    registry: &SessionRegistry<C>,
    request: Request,
) -> Result<Response, GameError> {
    Ok(match request {
        Request::StartMines => {
            let (_, grid) = registry.start_mines()?;
            Response::MinesStarted { grid }
        }
        Request::Reveal {
            session,
            row,
            col,
            actor,
        } => {
            let (outcome, grid) = registry.reveal_with_grid(&session, row, col, &actor)?;
            Response::Revealed { outcome, grid }
        }
        Request::Show { session } => Response::Grid {
            grid: registry.snapshot(&session)?,
        },
        Request::DropMines { session } => {
            let existed = registry.cancel_mines(&session);
            Response::MinesDropped { session, existed }
        }
        Request::StartRps { group } => {
            registry.start_rps(group)?;
            Response::RpsStarted { group }
        }
        Request::PickMove {
            group,
            participant,
            name,
            choice,
        } => match registry.pick_move(group, participant, &name, choice)? {
            MatchStatus::Waiting { count } => Response::RpsWaiting { group, count },
            MatchStatus::Resolved { result } => Response::RpsResolved { group, result },
        },
        Request::CancelRps { group } => Response::RpsCancelled {
            group,
            existed: registry.cancel_rps(group),
        },
    })
}
