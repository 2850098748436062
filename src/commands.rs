use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::state::{AppState, Field};

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Applies one edit line such as `in The quick brown fox` and recomputes
/// the result.
///
/// The leading token selects a field by prefix (`p`, `pat`, `pattern`, ...)
/// and everything after the first run of whitespace replaces that field's
/// value. Lines without whitespace, and tokens that prefix no field, change
/// nothing. The result is recomputed in every case, so an empty line forces
/// a refresh.
pub fn process(state: &mut AppState, line: &str) -> Result<(), ProcessError> {
    if let Some((command, rest)) = split_command(line) {
        if let Some(field) = Field::resolve(command) {
            debug!(field = field.name(), value = rest, "updating field");
            *state.field_mut(field) = rest.to_string();
        } else {
            debug!(command, "no field matches command");
        }
    }

    calculate(state)
}

/// Recomputes `state.result`. A pattern that fails to compile clears the
/// result.
pub fn calculate(state: &mut AppState) -> Result<(), ProcessError> {
    match substitute(&state.pattern, &state.input, &state.replace) {
        Ok(result) => {
            state.result = result;
            Ok(())
        }
        Err(err) => {
            state.result.clear();
            Err(err)
        }
    }
}

/// Replaces every non-overlapping match of `pattern` in `input`, expanding
/// `$1` and `${name}` references in `replace`.
pub fn substitute(pattern: &str, input: &str, replace: &str) -> Result<String, ProcessError> {
    let regex = Regex::new(pattern).map_err(|source| ProcessError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })?;
    Ok(regex.replace_all(input, replace).into_owned())
}

fn split_command(line: &str) -> Option<(&str, &str)> {
    let (command, rest) = line.split_once(char::is_whitespace)?;
    Some((command, rest.trim_start()))
}
