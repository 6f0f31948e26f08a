use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Rock crushes scissors, scissors cut paper, paper covers rock.
    pub const fn beats(self, other: Move) -> bool {
        use Move::*;
        matches!(
            (self, other),
            (Rock, Scissors) | (Scissors, Paper) | (Paper, Rock)
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown move {0:?}, expected rock, paper or scissors")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Self::Rock),
            "paper" | "p" => Ok(Self::Paper),
            "scissors" | "s" => Ok(Self::Scissors),
            _ => Err(ParseMoveError(s.to_owned())),
        }
    }
}

/// A display name paired with the move it picked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    #[serde(rename = "move")]
    pub choice: Move,
}

impl Choice {
    pub fn new(name: impl Into<String>, choice: Move) -> Self {
        Self {
            name: name.into(),
            choice,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    Winner { name: String },
    Draw,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsResult {
    pub entries: Vec<Choice>,
    pub resolution: Resolution,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    Waiting { count: usize },
    Resolved { result: RpsResult },
}

/// Decides a round regardless of the order `choices` arrive in.
///
/// Exactly two distinct moves must be on the table, and the dominant one must
/// be held by a single participant; anything else is a draw.
pub fn resolve(choices: &[Choice]) -> Resolution {
    let distinct: SmallVec<[Move; 3]> = Move::ALL
        .into_iter()
        .filter(|&candidate| choices.iter().any(|entry| entry.choice == candidate))
        .collect();

    let &[a, b] = distinct.as_slice() else {
        return Resolution::Draw;
    };
    let dominant = if a.beats(b) { a } else { b };

    let mut holders = choices.iter().filter(|entry| entry.choice == dominant);
    match (holders.next(), holders.next()) {
        (Some(winner), None) => Resolution::Winner {
            name: winner.name.clone(),
        },
        _ => Resolution::Draw,
    }
}

/// Pending rock-paper-scissors round of one group.
#[derive(Clone, Debug)]
pub struct RpsMatch {
    group: GroupId,
    entries: SmallVec<[(ParticipantId, Choice); 2]>,
    closed: bool,
}

impl RpsMatch {
    pub const CAPACITY: usize = 2;

    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            entries: SmallVec::new(),
            closed: false,
        }
    }

    pub fn participant_count(&self) -> usize {
        self.entries.len()
    }

    /// Resolved or cancelled, no further picks are taken.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Records `participant`'s move, resolving the round once two people have picked.
    pub fn select_choice(
        &mut self,
        participant: ParticipantId,
        name: &str,
        choice: Move,
    ) -> Result<MatchStatus> {
        if self.closed {
            return Err(GameError::GroupStale);
        }

        match self.entries.iter_mut().find(|(id, _)| *id == participant) {
            Some((_, entry)) => {
                log::trace!("[group {}] {} changed pick to {}", self.group, name, choice);
                *entry = Choice::new(name, choice);
            }
            None => self.entries.push((participant, Choice::new(name, choice))),
        }

        if self.entries.len() < Self::CAPACITY {
            return Ok(MatchStatus::Waiting {
                count: self.entries.len(),
            });
        }

        self.closed = true;
        let entries: Vec<Choice> = self.entries.iter().map(|(_, entry)| entry.clone()).collect();
        let resolution = resolve(&entries);
        log::debug!("[group {}] resolved: {:?}", self.group, resolution);
        Ok(MatchStatus::Resolved {
            result: RpsResult {
                entries,
                resolution,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Move::*;

    fn winner(name: &str) -> Resolution {
        Resolution::Winner { name: name.into() }
    }

    #[test]
    fn dominance_is_cyclic() {
        assert!(Rock.beats(Scissors));
        assert!(Scissors.beats(Paper));
        assert!(Paper.beats(Rock));
        for m in Move::ALL {
            assert!(!m.beats(m));
        }
    }

    #[test]
    fn resolve_known_rounds() {
        assert_eq!(
            resolve(&[Choice::new("A", Rock), Choice::new("B", Paper)]),
            winner("B")
        );
        assert_eq!(
            resolve(&[Choice::new("A", Rock), Choice::new("B", Rock)]),
            Resolution::Draw
        );
        assert_eq!(
            resolve(&[Choice::new("A", Scissors), Choice::new("B", Paper)]),
            winner("A")
        );
    }

    #[test]
    fn resolve_ignores_order() {
        for a in Move::ALL {
            for b in Move::ALL {
                let forward = resolve(&[Choice::new("A", a), Choice::new("B", b)]);
                let backward = resolve(&[Choice::new("B", b), Choice::new("A", a)]);
                assert_eq!(forward, backward, "{a} vs {b}");
            }
        }
        assert_eq!(
            resolve(&[Choice::new("B", Scissors), Choice::new("A", Rock)]),
            winner("A")
        );
    }

    #[test]
    fn resolve_draws_on_three_moves_or_shared_win() {
        let all_three = [
            Choice::new("A", Rock),
            Choice::new("B", Paper),
            Choice::new("C", Scissors),
        ];
        assert_eq!(resolve(&all_three), Resolution::Draw);

        let shared = [
            Choice::new("A", Paper),
            Choice::new("B", Paper),
            Choice::new("C", Rock),
        ];
        assert_eq!(resolve(&shared), Resolution::Draw);
        assert_eq!(resolve(&[]), Resolution::Draw);
    }

    #[test]
    fn parse_moves() {
        assert_eq!("Rock".parse::<Move>(), Ok(Rock));
        assert_eq!(" p ".parse::<Move>(), Ok(Paper));
        assert_eq!("SCISSORS".parse::<Move>(), Ok(Scissors));
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn first_pick_waits() {
        let mut round = RpsMatch::new(-100);

        let status = round.select_choice(1, "ann", Rock).unwrap();

        assert_eq!(status, MatchStatus::Waiting { count: 1 });
        assert!(!round.is_closed());
    }

    #[test]
    fn repick_overwrites_instead_of_counting_twice() {
        let mut round = RpsMatch::new(-100);
        round.select_choice(1, "ann", Rock).unwrap();

        let status = round.select_choice(1, "ann", Paper).unwrap();

        assert_eq!(status, MatchStatus::Waiting { count: 1 });
        assert_eq!(round.participant_count(), 1);

        let MatchStatus::Resolved { result } = round.select_choice(2, "ben", Rock).unwrap() else {
            panic!("second participant should resolve the round");
        };
        assert_eq!(result.resolution, winner("ann"));
        assert_eq!(
            result.entries,
            vec![Choice::new("ann", Paper), Choice::new("ben", Rock)]
        );
    }

    #[test]
    fn resolved_round_rejects_more_picks() {
        let mut round = RpsMatch::new(7);
        round.select_choice(1, "ann", Rock).unwrap();
        round.select_choice(2, "ben", Rock).unwrap();

        assert!(round.is_closed());
        assert_eq!(
            round.select_choice(3, "cat", Paper),
            Err(GameError::GroupStale)
        );
    }

    #[test]
    fn result_serializes_with_move_field() {
        let result = RpsResult {
            entries: vec![Choice::new("ann", Rock)],
            resolution: Resolution::Draw,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(
            json,
            r#"{"entries":[{"name":"ann","move":"rock"}],"resolution":{"kind":"draw"}}"#
        );
    }
}
