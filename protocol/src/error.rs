use clap::error::ErrorKind;
use skirmish_core::ParseMoveError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command {0:?}")]
    UnknownCommand(String),
    #[error("Missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("{message}")]
    Command { kind: ErrorKind, message: String },
    #[error(transparent)]
    Move(#[from] ParseMoveError),
    #[error("Malformed callback data {0:?}")]
    Callback(String),
    #[error("Malformed request: {0}")]
    Json(String),
}

impl ProtocolError {
    pub const fn code(&self) -> &'static str {
        "bad_request"
    }
}

impl From<clap::Error> for ProtocolError {
    fn from(err: clap::Error) -> Self {
        // first paragraph only, usage and help hints follow it
        let rendered = err.to_string();
        let summary = rendered.split("\n\n").next().unwrap_or_default();
        let words: Vec<&str> = summary.split_whitespace().collect();
        Self::Command {
            kind: err.kind(),
            message: words.join(" ").trim_start_matches("error: ").to_owned(),
        }
    }
}

pub type Result<T> = core::result::Result<T, ProtocolError>;
