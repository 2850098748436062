use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::session::Command;
use crate::state::Field;

pub const HISTORY_FILE: &str = ".retool_history";

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("prompt was interrupted")]
    Interrupted,
    #[error("end of input")]
    Eof,
    #[error("failed to read line: {0}")]
    Other(String),
}

/// Where interactive lines come from.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError>;
    fn add_history(&mut self, line: &str);
    fn save_history(&mut self, path: &Path) -> Result<()>;
}

/// `~/.retool_history`, or the same name in the temp directory when no home
/// directory is known.
pub fn history_path() -> PathBuf {
    history_path_from(dirs::home_dir())
}

fn history_path_from(home: Option<PathBuf>) -> PathBuf {
    let dir = home.unwrap_or_else(|| {
        warn!("could not determine home directory, keeping history in the temp directory");
        env::temp_dir()
    });
    dir.join(HISTORY_FILE)
}

/// Every word the prompt understands, in prompt order.
pub fn command_names() -> impl Iterator<Item = &'static str> {
    Command::ALL
        .into_iter()
        .map(Command::name)
        .chain(Field::ALL.into_iter().map(Field::name))
}

fn completion_candidates(head: &str) -> Vec<String> {
    let head = head.to_lowercase();
    command_names()
        .filter(|name| name.starts_with(&head))
        .map(str::to_string)
        .collect()
}

struct CommandHelper;

impl Completer for CommandHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        let head = &line[..pos];
        if head.contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((0, completion_candidates(head)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {}

impl Validator for CommandHelper {}

impl Helper for CommandHelper {}

pub struct RustylineSource {
    editor: Editor<CommandHelper, DefaultHistory>,
}

impl RustylineSource {
    /// Builds the editor and loads any saved history from `history`.
    pub fn new(history: &Path) -> Result<Self> {
        let config = Config::builder()
            .completion_type(CompletionType::List)
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config).context("initializing line editor")?;
        editor.set_helper(Some(CommandHelper));

        if history.exists() {
            if let Err(err) = editor.load_history(history) {
                error!("could not read history file {}: {err}", history.display());
            }
        } else {
            debug!("no history file at {}", history.display());
        }

        Ok(Self { editor })
    }
}

impl LineSource for RustylineSource {
    fn read_line(&mut self, prompt: &str) -> Result<String, ReadError> {
        self.editor.readline(prompt).map_err(|err| match err {
            ReadlineError::Interrupted => ReadError::Interrupted,
            ReadlineError::Eof => ReadError::Eof,
            other => ReadError::Other(other.to_string()),
        })
    }

    fn add_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            warn!("could not add line to history: {err}");
        }
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        self.editor
            .save_history(path)
            .with_context(|| format!("writing history to {}", path.display()))
    }
}
