use clap::Parser;
use clap::error::ErrorKind;
use core::str::FromStr;
use skirmish_core::{Coord, GroupId, ParticipantId};

use crate::{Callback, Presser, ProtocolError, Request};

/// Line-oriented spelling of a [`Request`], for terminals and tests.
///
/// ```text
/// mines
/// reveal <session> <row> <col> <actor...>
/// show <session>
/// drop <session>
/// rps <group>
/// pick <group> <participant> <name...> <move>
/// cancel <group>
/// press <group> <participant> <callback-data> <name...>
/// ```
#[derive(Parser, Debug)]
#[command(name = "skirmish", disable_help_flag = true, disable_help_subcommand = true)]
enum Command {
    /// Open a mines session
    Mines,
    /// Reveal one cell of a session
    Reveal {
        session: String,
        row: Coord,
        col: Coord,
        #[arg(required = true, num_args = 1..)]
        actor: Vec<String>,
    },
    /// Redraw a session's board
    Show { session: String },
    /// Remove a session
    Drop { session: String },
    /// Open a rock-paper-scissors match in a group
    Rps {
        #[arg(allow_negative_numbers = true)]
        group: GroupId,
    },
    /// Pick a move; the last word is the move, the rest the display name
    Pick {
        #[arg(allow_negative_numbers = true)]
        group: GroupId,
        #[arg(allow_negative_numbers = true)]
        participant: ParticipantId,
        #[arg(required = true, num_args = 1..)]
        words: Vec<String>,
    },
    /// Drop a group's pending match
    Cancel {
        #[arg(allow_negative_numbers = true)]
        group: GroupId,
    },
    /// Press an inline button with its callback data
    Press {
        #[arg(allow_negative_numbers = true)]
        group: GroupId,
        #[arg(allow_negative_numbers = true)]
        participant: ParticipantId,
        data: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
}

impl FromStr for Request {
    type Err = ProtocolError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let command = words.next().ok_or(ProtocolError::Empty)?.to_ascii_lowercase();

        let parsed = Command::try_parse_from(
            ["skirmish", command.as_str()].into_iter().chain(words),
        )
        .map_err(|err| match err.kind() {
            ErrorKind::InvalidSubcommand => ProtocolError::UnknownCommand(command.clone()),
            _ => ProtocolError::from(err),
        })?;

        Ok(match parsed {
            Command::Mines => Request::StartMines,
            Command::Reveal {
                session,
                row,
                col,
                actor,
            } => Request::Reveal {
                session,
                row,
                col,
                actor: actor.join(" "),
            },
            Command::Show { session } => Request::Show { session },
            Command::Drop { session } => Request::DropMines { session },
            Command::Rps { group } => Request::StartRps { group },
            Command::Pick {
                group,
                participant,
                mut words,
            } => {
                let choice = words.pop().ok_or(ProtocolError::MissingArgument("move"))?;
                if words.is_empty() {
                    return Err(ProtocolError::MissingArgument("name"));
                }
                Request::PickMove {
                    group,
                    participant,
                    name: words.join(" "),
                    choice: choice.parse()?,
                }
            }
            Command::Cancel { group } => Request::CancelRps { group },
            Command::Press {
                group,
                participant,
                data,
                name,
            } => data.parse::<Callback>()?.into_request(Presser {
                group,
                participant,
                name: name.join(" "),
            }),
        })
    }
}
