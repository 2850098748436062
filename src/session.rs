use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};

use crate::commands;
use crate::input::{LineSource, ReadError, command_names};
use crate::render;
use crate::state::AppState;
use crate::surface::Surface;

/// Session-level commands, matched before any field edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Exit,
    Quit,
    Dump,
    Help,
}

impl Command {
    pub const ALL: [Command; 4] = [Command::Exit, Command::Quit, Command::Dump, Command::Help];

    pub fn name(self) -> &'static str {
        match self {
            Command::Exit => "exit",
            Command::Quit => "quit",
            Command::Dump => "dump",
            Command::Help => "help",
        }
    }

    /// Case-insensitive prefix match of the whole line, so `e`, `Ex` and
    /// `exit` all exit. Lines carrying arguments never match.
    pub fn classify(line: &str) -> Option<Command> {
        if line.is_empty() {
            return None;
        }
        let text = line.to_lowercase();
        Command::ALL
            .into_iter()
            .find(|command| command.name().starts_with(&text))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Exiting,
    Dumping,
}

#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub colorize: bool,
    pub json: bool,
    pub history: PathBuf,
}

/// First letter of every command the prompt accepts, e.g. `eqdhpir>`.
pub fn prompt() -> String {
    let mut prompt: String = command_names().filter_map(|name| name.chars().next()).collect();
    prompt.push('>');
    prompt
}

pub struct Session<S: Surface, L: LineSource> {
    surface: S,
    lines: L,
    state: AppState,
    options: SessionOptions,
    status: SessionState,
}

impl<S: Surface, L: LineSource> Session<S, L> {
    pub fn new(surface: S, lines: L, state: AppState, options: SessionOptions) -> Self {
        Self {
            surface,
            lines,
            state,
            options,
            status: SessionState::Running,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn status(&self) -> SessionState {
        self.status
    }

    #[cfg(test)]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Runs until the user exits. A dump request prints the final values
    /// to `out` once the screen has been restored.
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.start()?;
        let prompt = prompt();
        while self.status == SessionState::Running {
            self.step(&prompt);
        }
        self.finish(out)
    }

    fn start(&mut self) -> Result<()> {
        let height = self.surface.height().context("probing terminal size")?;
        self.surface.save_screen().context("saving terminal screen")?;
        self.surface
            .print_at("", height, 0)
            .context("positioning cursor")?;
        self.refresh("");
        Ok(())
    }

    fn step(&mut self, prompt: &str) {
        match self.lines.read_line(prompt) {
            Ok(line) => {
                self.lines.add_history(&line);
                self.handle_line(&line);
            }
            Err(ReadError::Interrupted) => warn!("prompt was interrupted"),
            Err(ReadError::Eof) => {
                info!("end of input, leaving");
                self.status = SessionState::Exiting;
            }
            Err(err @ ReadError::Other(_)) => error!("{err}"),
        }

        if let Err(err) = self.lines.save_history(&self.options.history) {
            error!("could not save history: {err:#}");
        }
    }

    fn handle_line(&mut self, line: &str) {
        match Command::classify(line) {
            Some(Command::Exit | Command::Quit) => self.status = SessionState::Exiting,
            Some(Command::Dump) => {
                info!("dump requested");
                self.status = SessionState::Dumping;
            }
            Some(Command::Help) => {
                if let Err(err) = render::help(&mut self.surface) {
                    error!("could not show help: {err}");
                }
            }
            None => self.refresh(&lowercase_command(line)),
        }
    }

    fn refresh(&mut self, line: &str) {
        if let Err(err) = commands::process(&mut self.state, line) {
            error!("{err}");
        }
        match render::draw(&mut self.surface, &self.state, self.options.colorize) {
            Ok(layout) => debug!(?layout, "redrawn"),
            Err(err) => error!("could not redraw: {err}"),
        }
    }

    fn finish<W: Write>(&mut self, out: &mut W) -> Result<()> {
        self.surface
            .restore_screen()
            .context("restoring terminal screen")?;
        if self.status == SessionState::Dumping {
            if let Err(err) = commands::calculate(&mut self.state) {
                error!("{err}");
            }
            if self.options.json {
                self.state.dump_json(out)?;
            } else {
                self.state.dump(out)?;
            }
        }
        Ok(())
    }
}

/// Lower-cases the leading command token and leaves the value as typed.
fn lowercase_command(line: &str) -> String {
    match line.split_once(char::is_whitespace) {
        Some((command, _)) => {
            let value = &line[command.len()..];
            format!("{}{value}", command.to_lowercase())
        }
        None => line.to_lowercase(),
    }
}
