//! Line command parsing

use thiserror::Error;

use crate::state::StateError;

/// A user intent read from one input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Presets,
    Select(String),
    Custom(f64),
    Toggle,
    Reset,
    Notes(String),
    Status,
    Journal,
    Info,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum ShellError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    UnknownCommand(String),

    #[error("'{command}' needs a {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    #[error(transparent)]
    State(#[from] StateError),
}

impl Command {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim_start();
        if line.trim().is_empty() {
            return Ok(None);
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((keyword, rest)) => (keyword, rest),
            None => (line, ""),
        };

        let command = match keyword.to_lowercase().as_str() {
            "presets" | "ls" => Command::Presets,
            "select" | "use" => {
                let id = rest.trim();
                if id.is_empty() {
                    return Err(ShellError::MissingArgument {
                        command: "select",
                        argument: "preset id",
                    });
                }
                Command::Select(id.to_string())
            }
            "custom" => {
                let raw = rest.trim();
                if raw.is_empty() {
                    return Err(ShellError::MissingArgument {
                        command: "custom",
                        argument: "minute value",
                    });
                }
                let minutes = raw
                    .parse::<f64>()
                    .map_err(|_| ShellError::InvalidNumber(raw.to_string()))?;
                Command::Custom(minutes)
            }
            "toggle" | "start" | "pause" | "t" => Command::Toggle,
            "reset" | "r" => Command::Reset,
            "notes" => Command::Notes(rest.to_string()),
            "status" | "s" => Command::Status,
            "journal" | "j" => Command::Journal,
            "info" => Command::Info,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}
