use core::num::Saturating;
use core::time::Duration;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Valid transitions:
/// - Open -> Won
/// - Open -> Lost
/// - Open -> Expired
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Open,
    Won,
    Lost,
    Expired,
}

impl SessionState {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub const fn is_finished(self) -> bool {
        !self.is_open()
    }
}

/// Stored terminal outcome, handed back to anyone acting on a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub state: SessionState,
    /// Winner or loser; nobody triggers an expiry.
    pub actor: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RevealOutcome {
    Continue { remaining: CellCount },
    NoOp,
    Won { actor: String },
    Lost { actor: String },
    Expired,
    AlreadyOver { verdict: Verdict },
}

impl RevealOutcome {
    /// Whether the board changed because of this reveal
    pub const fn has_update(&self) -> bool {
        use RevealOutcome::*;
        match self {
            Continue { .. } => true,
            NoOp => false,
            Won { .. } => true,
            Lost { .. } => true,
            Expired => true,
            AlreadyOver { .. } => false,
        }
    }
}

/// One shared mines board, from creation to its verdict.
#[derive(Clone, Debug)]
pub struct MinesSession {
    id: SessionId,
    mine_layout: MineLayout,
    board: Array2<Cell>,
    revealed_count: Saturating<CellCount>,
    state: SessionState,
    actor: Option<String>,
    triggered_mine: Option<Coord2>,
    created_at: Instant,
    time_budget: Duration,
}

impl MinesSession {
    pub fn new(
        id: SessionId,
        mine_layout: MineLayout,
        time_budget: Duration,
        created_at: Instant,
    ) -> Self {
        let size = mine_layout.size();
        Self {
            id,
            mine_layout,
            board: Array2::default((size, size).to_nd_index()),
            revealed_count: Saturating(0),
            state: Default::default(),
            actor: None,
            triggered_mine: None,
            created_at,
            time_budget,
        }
    }

    /// Generates a fresh layout from `seed` and opens the session at `now`.
    pub fn create(
        id: SessionId,
        config: GameConfig,
        time_budget: Duration,
        seed: u64,
        now: Instant,
    ) -> Result<Self> {
        let mine_layout = RandomMineLayoutGenerator::new(seed).generate(config)?;
        Ok(Self::new(id, mine_layout, time_budget, now))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn remaining_safe_cells(&self) -> CellCount {
        self.mine_layout.safe_cell_count() - self.revealed_count.0
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// `None` when the budget reaches past what an `Instant` can hold.
    pub fn deadline(&self) -> Option<Instant> {
        self.created_at.checked_add(self.time_budget)
    }

    /// Time elapsed beyond the budget, zero while the budget lasts.
    pub fn overdue_by(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
            .saturating_sub(self.time_budget)
    }

    pub fn is_overdue(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) > self.time_budget
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.state.is_finished().then(|| Verdict {
            state: self.state,
            actor: self.actor.clone(),
        })
    }

    /// Uncovers exactly one cell on behalf of `actor`.
    pub fn reveal(&mut self, coords: Coord2, actor: &str, now: Instant) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;

        if let Some(verdict) = self.verdict() {
            return Ok(AlreadyOver { verdict });
        }

        // a late click cannot save the session, even on an already revealed cell
        if self.expire_if_due(now) {
            return Ok(Expired);
        }

        let cell = self.board[coords.to_nd_index()];
        if !cell.is_hidden() {
            log::trace!("[{}] {:?} already revealed, ignoring", self.id, coords);
            return Ok(NoOp);
        }

        if self.mine_layout[coords] {
            self.board[coords.to_nd_index()] = Cell::Exploded;
            self.triggered_mine = Some(coords);
            self.end_game(SessionState::Lost, Some(actor));
            return Ok(Lost {
                actor: actor.to_owned(),
            });
        }

        self.board[coords.to_nd_index()] = Cell::Revealed;
        self.revealed_count += 1;
        log::trace!("[{}] {} revealed {:?}", self.id, actor, coords);

        if self.revealed_count == Saturating(self.mine_layout.safe_cell_count()) {
            self.end_game(SessionState::Won, Some(actor));
            Ok(Won {
                actor: actor.to_owned(),
            })
        } else {
            Ok(Continue {
                remaining: self.remaining_safe_cells(),
            })
        }
    }

    /// Moves an open session past its budget to `Expired`, returns whether it did.
    pub fn expire_if_due(&mut self, now: Instant) -> bool {
        if self.state.is_open() && self.is_overdue(now) {
            self.end_game(SessionState::Expired, None);
            true
        } else {
            false
        }
    }

    fn end_game(&mut self, state: SessionState, actor: Option<&str>) {
        if self.state.is_finished() {
            return;
        }

        self.state = state;
        self.actor = actor.map(str::to_owned);
        log::debug!("[{}] ended as {:?}, actor: {:?}", self.id, state, self.actor);
        self.show_mines();
    }

    fn show_mines(&mut self) {
        for coords in iter_coords(self.size()) {
            if self.mine_layout[coords] && self.board[coords.to_nd_index()].is_hidden() {
                self.board[coords.to_nd_index()] = Cell::Flagged;
            }
        }
    }
}
