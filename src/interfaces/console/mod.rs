//! Console front end: command parsing, rendering and the interactive session.

pub mod command;
pub mod render;
pub mod session;

pub use command::{Command, CommandError};
pub use session::ConsoleSession;
