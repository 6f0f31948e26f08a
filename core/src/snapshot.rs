use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a transport needs to draw a mines board, detached from the live session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub session: SessionId,
    pub size: Coord,
    /// Row-major, `size * size` entries.
    pub cells: Vec<Cell>,
    pub state: SessionState,
    pub revealed: CellCount,
    pub remaining_safe: CellCount,
    pub verdict: Option<Verdict>,
}

impl GridSnapshot {
    pub fn from_session(session: &MinesSession) -> Self {
        let cells = iter_coords(session.size())
            .map(|coords| session.cell_at(coords))
            .collect();

        Self {
            session: session.id().to_owned(),
            size: session.size(),
            cells,
            state: session.state(),
            revealed: session.revealed_count(),
            remaining_safe: session.remaining_safe_cells(),
            verdict: session.verdict(),
        }
    }

    pub fn cell(&self, (row, col): Coord2) -> Option<Cell> {
        if row >= self.size || col >= self.size {
            return None;
        }
        let index = usize::from(row) * usize::from(self.size) + usize::from(col);
        self.cells.get(index).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(usize::from(self.size.max(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use web_time::Instant;

    #[test]
    fn from_session_maps_cells_row_major() {
        let layout = MineLayout::from_mine_coords(2, &[(0, 0)]).unwrap();
        let now = Instant::now();
        let mut session = MinesSession::new("s1".into(), layout, Duration::from_secs(5), now);
        session.reveal((1, 0), "ann", now).unwrap();

        let snapshot = GridSnapshot::from_session(&session);

        assert_eq!(snapshot.session, "s1");
        assert_eq!(
            snapshot.cells,
            vec![Cell::Hidden, Cell::Hidden, Cell::Revealed, Cell::Hidden]
        );
        assert_eq!(snapshot.cell((1, 0)), Some(Cell::Revealed));
        assert_eq!(snapshot.cell((2, 0)), None);
        assert_eq!(snapshot.revealed, 1);
        assert_eq!(snapshot.remaining_safe, 2);
        assert_eq!(snapshot.verdict, None);
        assert_eq!(snapshot.rows().count(), 2);
    }

    #[test]
    fn snapshot_survives_json() {
        let layout = MineLayout::from_mine_coords(2, &[(1, 1)]).unwrap();
        let now = Instant::now();
        let mut session = MinesSession::new("s2".into(), layout, Duration::from_secs(5), now);
        session.reveal((1, 1), "zed", now).unwrap();

        let snapshot = GridSnapshot::from_session(&session);
        let json = serde_json::to_string(&snapshot).unwrap();

        assert!(json.contains("\"exploded\""));
        assert_eq!(serde_json::from_str::<GridSnapshot>(&json).unwrap(), snapshot);
    }
}
