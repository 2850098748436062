use std::io::Write;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// The editable fields, in the order used to break ties between
/// ambiguous command prefixes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Pattern,
    Input,
    Replace,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Pattern, Field::Input, Field::Replace];

    pub fn name(self) -> &'static str {
        match self {
            Field::Pattern => "pattern",
            Field::Input => "input",
            Field::Replace => "replace",
        }
    }

    /// First field whose name starts with `command`. Empty commands never
    /// match.
    pub fn resolve(command: &str) -> Option<Field> {
        if command.is_empty() {
            return None;
        }
        Field::ALL
            .into_iter()
            .find(|field| field.name().starts_with(command))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppState {
    pub pattern: String,
    pub input: String,
    pub replace: String,
    /// Output of the last recompute; only `commands::calculate` writes it.
    pub result: String,
}

impl AppState {
    pub fn new(
        pattern: impl Into<String>,
        input: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            input: input.into(),
            replace: replace.into(),
            result: String::new(),
        }
    }

    pub fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Pattern => &mut self.pattern,
            Field::Input => &mut self.input,
            Field::Replace => &mut self.replace,
        }
    }

    pub fn dump<W: Write>(&self, out: &mut W) -> Result<()> {
        for (label, value) in [
            ("Pattern", &self.pattern),
            ("Input", &self.input),
            ("Replace", &self.replace),
            ("Result", &self.result),
        ] {
            writeln!(out, "{label:>7}: \"{value}\"")?;
        }
        Ok(())
    }

    pub fn dump_json<W: Write>(&self, out: &mut W) -> Result<()> {
        serde_json::to_writer(&mut *out, self)?;
        writeln!(out)?;
        Ok(())
    }
}
