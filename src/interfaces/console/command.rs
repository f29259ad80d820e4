use std::str::FromStr;
use thiserror::Error;

/// One operator action in the console session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Readers,
    SelectReader(String),
    Amount(String),
    Process,
    Simulate,
    Capture,
    Cancel,
    Status,
    Log,
    Help,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for the list")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
readers          list readers
reader <id>      select a reader
amount <value>   set the amount
process          send the amount to the selected reader
simulate         present a test card on a simulated reader
capture          capture the current payment
cancel           cancel the reader's current action
status           show the session status
log              show the whole transcript
quit             leave the session";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match word.to_ascii_lowercase().as_str() {
            "readers" => Ok(Command::Readers),
            "reader" | "select" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument("reader"))
                } else {
                    Ok(Command::SelectReader(rest.to_string()))
                }
            }
            // An empty amount is allowed: it clears the field to non-numeric text.
            "amount" => Ok(Command::Amount(rest.to_string())),
            "process" => Ok(Command::Process),
            "simulate" => Ok(Command::Simulate),
            "capture" => Ok(Command::Capture),
            "cancel" => Ok(Command::Cancel),
            "status" => Ok(Command::Status),
            "log" => Ok(Command::Log),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}
