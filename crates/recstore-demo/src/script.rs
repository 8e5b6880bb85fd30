#![forbid(unsafe_code)]

//! Line-oriented demo scripts.
//!
//! ```text
//! # comment
//! name Alice        set the user's name (rest of line, may be empty)
//! age 30            set the user's age
//! set email a@b.c   set any user field
//! reset             restore the blank form
//! inc | dec         step the counter
//! show              print both snapshots
//! ```

use crate::error::{DemoError, Result};

/// Walkthrough used by the `demo` subcommand.
pub const DEMO_SCRIPT: &str = "\
# Typing into the name input re-renders NameInput and UserCard only.
name A
name Al
name Alice
# AgeInput re-renders; NameInput does not.
age 30
# Same content again: identity comparison still sees a new value.
age 30
# A field no input shows still re-renders the card.
set email alice@example.com
show
inc
inc
dec
reset
show
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetName(String),
    SetAge(String),
    Set { field: String, value: String },
    Reset,
    Increment,
    Decrement,
    Show,
}

impl Command {
    /// Parse one line. Blank lines and `#` comments yield `None`.
    /// `line_no` is 1-based and only used for error reporting.
    pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        let command = match word {
            "name" => Self::SetName(rest.to_owned()),
            "age" => Self::SetAge(rest.to_owned()),
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(DemoError::script(line_no, "`set` needs a field name"));
                }
                Self::Set {
                    field: field.to_owned(),
                    value: value.to_owned(),
                }
            }
            "reset" => Self::no_args(line_no, word, rest, Self::Reset)?,
            "inc" => Self::no_args(line_no, word, rest, Self::Increment)?,
            "dec" => Self::no_args(line_no, word, rest, Self::Decrement)?,
            "show" => Self::no_args(line_no, word, rest, Self::Show)?,
            other => {
                return Err(DemoError::script(
                    line_no,
                    format!("unknown command `{other}`"),
                ));
            }
        };
        Ok(Some(command))
    }

    fn no_args(line_no: usize, word: &str, rest: &str, command: Self) -> Result<Self> {
        if rest.trim().is_empty() {
            Ok(command)
        } else {
            Err(DemoError::script(
                line_no,
                format!("`{word}` takes no arguments"),
            ))
        }
    }
}

/// Parse a whole script.
pub fn parse(source: &str) -> Result<Vec<Command>> {
    let mut commands = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(command) = Command::parse_line(idx + 1, line)? {
            commands.push(command);
        }
    }
    Ok(commands)
}
