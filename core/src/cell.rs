use serde::{Deserialize, Serialize};

/// Player-visible state of one grid cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Hidden,
    Revealed,
    /// A mine shown after the session ended without it exploding.
    Flagged,
    Exploded,
}

impl Cell {
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }
}
