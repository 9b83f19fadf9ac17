//! Interactive line shell
//!
//! Reads commands from an input stream, forwards them to [`AppState`] and
//! renders the results. Completions and, when following, every tick are
//! written as they happen.

pub mod command;
pub mod render;

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::state::{catalog, AppState};
pub use command::{Command, ShellError};
pub use render::{ClockStyle, LocalClock, Renderer, TimeOfDayFormatter, HELP};

/// What the loop should do after a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Shell {
    state: Arc<AppState>,
    renderer: Renderer,
    follow: bool,
}

impl Shell {
    pub fn new(state: Arc<AppState>, renderer: Renderer, follow: bool) -> Self {
        Self {
            state,
            renderer,
            follow,
        }
    }

    /// Run one command against the shared state
    pub fn execute(&self, command: Command) -> Result<Reply, ShellError> {
        debug!("Executing {:?}", command);
        let snapshot = match command {
            Command::Quit => return Ok(Reply::Quit),
            Command::Help => return Ok(Reply::Text(HELP.to_string())),
            Command::Presets => return Ok(Reply::Text(self.renderer.presets(&catalog()))),
            Command::Journal => {
                let records = self.state.get_journal()?;
                return Ok(Reply::Text(self.renderer.journal(&records)));
            }
            Command::Info => {
                let (action, at) = self.state.get_last_action();
                let text = self.renderer.info(&self.state.get_uptime(), action.as_deref(), at);
                return Ok(Reply::Text(text));
            }
            Command::Status => self.state.get_snapshot()?,
            Command::Select(id) => self.state.select_preset(&id)?,
            Command::Custom(raw) => self.state.set_custom_minutes(raw)?,
            Command::Toggle => self.state.toggle_run()?,
            Command::Reset => self.state.reset()?,
            Command::Notes(text) => self.state.set_session_notes(&text)?,
        };
        Ok(Reply::Text(self.renderer.status(&snapshot)))
    }

    /// Parse and run one input line. Blank lines produce no reply.
    pub fn handle_line(&self, line: &str) -> Result<Option<Reply>, ShellError> {
        match Command::parse(line)? {
            Some(command) => self.execute(command).map(Some),
            None => Ok(None),
        }
    }

    /// Drive the shell until `quit` or end of input
    pub async fn run<R, W>(&self, input: R, output: &mut W) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut completions = self.state.subscribe_completions();
        let mut snapshots = self.state.subscribe_snapshots();

        let text = self.renderer.status(&self.state.get_snapshot()?);
        write_line(output, &text).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        break;
                    };
                    match self.handle_line(&line) {
                        Ok(Some(Reply::Quit)) => break,
                        Ok(Some(Reply::Text(text))) => write_line(output, &text).await?,
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Command failed: {}", e);
                            write_line(output, &format!("error: {}", e)).await?;
                        }
                    }
                }
                Ok(record) = completions.recv() => {
                    write_line(output, &self.renderer.completion(&record)).await?;
                }
                changed = snapshots.changed(), if self.follow => {
                    if changed.is_ok() {
                        let snapshot = snapshots.borrow_and_update().clone();
                        write_line(output, &self.renderer.status(&snapshot)).await?;
                    }
                }
            }
        }

        Ok(())
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await
}
