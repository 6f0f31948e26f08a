use clap::ValueEnum;
use skirmish_core::{Clock, SessionRegistry};
use skirmish_protocol::{Request, Response, dispatch, render};
use std::io::{BufRead, Write};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `mines`, `reveal <session> <row> <col> <actor>`, ... answered with glyph boards
    #[default]
    Text,
    /// One JSON request per line, one JSON response per line
    Json,
}

/// Serves requests from `input` until it runs dry. Blank lines and `#` comments are skipped.
pub fn run<C: Clock>(
    registry: &SessionRegistry<C>,
    format: Format,
    input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let request = match format {
            Format::Text => line.parse::<Request>(),
            Format::Json => Request::from_json(line),
        };
        let response = match request {
            Ok(request) => dispatch(registry, request),
            Err(err) => {
                log::debug!("rejected {:?}: {}", line, err);
                Response::from(err)
            }
        };

        match format {
            Format::Text => {
                if let Some(session) = session_of(&response) {
                    writeln!(output, "[{session}]")?;
                }
                writeln!(output, "{}\n", render::response_text(&response))?;
            }
            Format::Json => writeln!(output, "{}", response.to_json())?,
        }
        output.flush()?;
    }
    Ok(())
}

fn session_of(response: &Response) -> Option<&str> {
    match response {
        Response::MinesStarted { grid }
        | Response::Revealed { grid, .. }
        | Response::Grid { grid } => Some(grid.session.as_str()),
        _ => None,
    }
}
