//! Pure text/glyph formatting of engine payloads. Nothing here touches a session.

use skirmish_core::{
    Cell, GridSnapshot, Move, Resolution, RevealOutcome, RpsResult, SessionState, Verdict,
};

use crate::{Callback, Response};

pub const MINES_STARTED: &str = "🧨 Mines Game Started!\nClick a box and avoid the mine 💣";
pub const GAME_INVALID: &str = "❌ This game is over or invalid.";
pub const RPS_STARTED: &str = "🎮 Rock Paper Scissors!\nPick your move, the first two players fight it out.";

/// One inline button: the label and the data sent back when pressed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub data: String,
}

pub const fn cell_glyph(cell: Cell) -> &'static str {
    match cell {
        Cell::Hidden => "⬜",
        Cell::Revealed => "✅",
        Cell::Flagged => "🚩",
        Cell::Exploded => "💥",
    }
}

pub const fn move_glyph(choice: Move) -> &'static str {
    match choice {
        Move::Rock => "🪨",
        Move::Paper => "📄",
        Move::Scissors => "✂️",
    }
}

pub fn grid_text(grid: &GridSnapshot) -> String {
    grid.rows()
        .map(|row| row.iter().map(|&cell| cell_glyph(cell)).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clickable board, one button per cell.
pub fn grid_keyboard(grid: &GridSnapshot) -> Vec<Vec<Button>> {
    grid.rows()
        .zip(0..)
        .map(|(row, r)| {
            row.iter()
                .zip(0..)
                .map(|(&cell, c)| Button {
                    text: cell_glyph(cell).to_owned(),
                    data: Callback::Reveal {
                        session: grid.session.clone(),
                        row: r,
                        col: c,
                    }
                    .to_string(),
                })
                .collect()
        })
        .collect()
}

pub fn rps_keyboard() -> Vec<Vec<Button>> {
    let moves = Move::ALL
        .into_iter()
        .map(|choice| Button {
            text: format!("{} {}", move_glyph(choice), capitalize(choice.name())),
            data: Callback::Pick(choice).to_string(),
        })
        .collect();
    let cancel = vec![Button {
        text: "❌ Cancel".to_owned(),
        data: Callback::CancelRps.to_string(),
    }];
    vec![moves, cancel]
}

pub fn verdict_text(verdict: &Verdict) -> String {
    let actor = verdict.actor.as_deref().unwrap_or("nobody");
    match verdict.state {
        SessionState::Won => format!("🎉 All safe boxes opened!\n✅ WINNER: {actor}"),
        SessionState::Lost => format!("💣 BOOM! {actor} clicked a mine!\n❌ LOSER: {actor}"),
        SessionState::Expired => "⌛ Time is up, nobody cleared the board.".to_owned(),
        SessionState::Open => String::new(),
    }
}

/// Status line for a reveal; `None` when only the board needs redrawing.
pub fn outcome_text(outcome: &RevealOutcome) -> Option<String> {
    match outcome {
        RevealOutcome::Continue { .. } | RevealOutcome::NoOp => None,
        RevealOutcome::Won { actor } => Some(verdict_text(&Verdict {
            state: SessionState::Won,
            actor: Some(actor.clone()),
        })),
        RevealOutcome::Lost { actor } => Some(verdict_text(&Verdict {
            state: SessionState::Lost,
            actor: Some(actor.clone()),
        })),
        RevealOutcome::Expired => Some(verdict_text(&Verdict {
            state: SessionState::Expired,
            actor: None,
        })),
        RevealOutcome::AlreadyOver { verdict } => {
            Some(format!("{GAME_INVALID}\n{}", verdict_text(verdict)))
        }
    }
}

pub fn rps_result_text(result: &RpsResult) -> String {
    let mut lines: Vec<String> = result
        .entries
        .iter()
        .map(|entry| format!("{} {}: {}", move_glyph(entry.choice), entry.name, entry.choice))
        .collect();
    lines.push(match &result.resolution {
        Resolution::Winner { name } => format!("🏆 WINNER: {name}"),
        Resolution::Draw => "🤝 It's a draw!".to_owned(),
    });
    lines.join("\n")
}

pub fn response_text(response: &Response) -> String {
    match response {
        Response::MinesStarted { grid } => format!("{MINES_STARTED}\n{}", grid_text(grid)),
        Response::Revealed { outcome, grid } => match outcome_text(outcome) {
            Some(status) => format!("{status}\n{}", grid_text(grid)),
            None => format!("{}\n{} safe boxes left", grid_text(grid), grid.remaining_safe),
        },
        Response::Grid { grid } => match &grid.verdict {
            Some(verdict) => format!("{}\n{}", verdict_text(verdict), grid_text(grid)),
            None => grid_text(grid),
        },
        Response::MinesDropped { session, existed: true } => format!("🗑️ Game {session} removed."),
        Response::MinesDropped { existed: false, .. } => GAME_INVALID.to_owned(),
        Response::RpsStarted { .. } => RPS_STARTED.to_owned(),
        Response::RpsWaiting { count, .. } => {
            format!("⏳ {count}/2 players have picked, waiting for an opponent…")
        }
        Response::RpsResolved { result, .. } => rps_result_text(result),
        Response::RpsCancelled { existed: true, .. } => "🚫 Game cancelled.".to_owned(),
        Response::RpsCancelled { existed: false, .. } => "❌ No active game to cancel.".to_owned(),
        Response::Error { message, .. } => format!("❌ {message}"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
