//! Textual script surface for the command line.
//!
//! A script is a whitespace-separated token list: `right`, `left`, `up` and
//! `down` step once, an optional `*N` suffix repeats the step, and
//! `display:<text>` replaces the robot's overlay text.

use anyhow::{bail, Context, Result};
use gridbot_core::Command;

/// Parses a script string into engine commands.
pub(crate) fn parse(text: &str) -> Result<Vec<Command>> {
    text.split_whitespace().map(parse_token).collect()
}

fn parse_token(token: &str) -> Result<Command> {
    if let Some(text) = token.strip_prefix("display:") {
        return Ok(Command::Display {
            text: text.to_owned(),
        });
    }

    let (name, steps) = match token.split_once('*') {
        Some((name, count)) => {
            let steps: u32 = count
                .parse()
                .with_context(|| format!("invalid repeat count in '{token}'"))?;
            (name, steps)
        }
        None => (token, 1),
    };

    let command = match name {
        "right" => Command::Right { steps },
        "left" => Command::Left { steps },
        "up" => Command::Up { steps },
        "down" => Command::Down { steps },
        other => bail!("unknown script token '{other}'"),
    };
    Ok(command)
}
