use super::command::{Command, HELP};
use super::render::{render_messages, render_readers, render_status, render_transcript};
use crate::application::controller::SessionController;
use crate::domain::annotator::DashboardLinks;
use crate::error::Result;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Line-oriented front end over a [`SessionController`].
///
/// Controls that are disabled for the current state are refused without
/// calling the controller. After every command the transcript entries that
/// have not been shown yet are written out.
pub struct ConsoleSession<W: Write> {
    controller: SessionController,
    links: DashboardLinks,
    output: W,
    shown: usize,
}

impl<W: Write> ConsoleSession<W> {
    pub fn new(controller: SessionController, links: DashboardLinks, output: W) -> Self {
        Self {
            controller,
            links,
            output,
            shown: 0,
        }
    }

    /// Loads readers, then executes commands until `quit` or end of input.
    pub async fn run<R: AsyncBufRead + Unpin>(mut self, input: R) -> Result<SessionController> {
        self.controller.load_readers().await;
        self.output
            .write_all(render_readers(self.controller.state()).as_bytes())?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<Command>() {
                Ok(command) => {
                    debug!(?command, "Executing");
                    if !self.execute(command).await? {
                        break;
                    }
                }
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }

        self.output.flush()?;
        Ok(self.controller)
    }

    /// Runs one command. Returns `false` when the session should end.
    pub async fn execute(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Readers => {
                self.controller.load_readers().await;
                self.output
                    .write_all(render_readers(self.controller.state()).as_bytes())?;
            }
            Command::SelectReader(reader_id) => self.controller.select_reader(reader_id),
            Command::Amount(amount) => self.controller.set_amount(&amount),
            Command::Process => {
                if self.controller.is_processable() {
                    self.controller.process_payment().await;
                } else {
                    writeln!(self.output, "Process is disabled")?;
                }
            }
            Command::Simulate => {
                if self.controller.is_simulateable() {
                    self.controller.simulate_payment().await;
                } else {
                    writeln!(self.output, "Simulate Payment is disabled")?;
                }
            }
            Command::Capture => {
                if self.controller.is_capturable() {
                    self.controller.capture_payment().await;
                } else {
                    writeln!(self.output, "Capture is disabled")?;
                }
            }
            Command::Cancel => self.controller.cancel_action().await,
            Command::Status => {
                self.output
                    .write_all(render_status(self.controller.state()).as_bytes())?;
            }
            Command::Log => {
                let transcript = self.controller.state().transcript();
                self.output
                    .write_all(render_transcript(Some(transcript), &self.links).as_bytes())?;
                self.shown = transcript.len();
            }
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return Ok(false),
        }

        self.show_new_messages()?;
        Ok(true)
    }

    fn show_new_messages(&mut self) -> Result<()> {
        let messages = self.controller.messages();
        if let Some(fresh) = messages.get(self.shown..)
            && !fresh.is_empty()
        {
            self.output
                .write_all(render_messages(fresh, &self.links).as_bytes())?;
        }
        self.shown = messages.len();
        Ok(())
    }
}
