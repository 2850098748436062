use tracing::warn;

use crate::state::AppState;
use crate::style::Style;
use crate::surface::{Control, Surface, TerminalError};

/// How much of the state fit on the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layout {
    Labeled,
    Unlabeled,
    Compact,
    TooSmall,
}

impl Layout {
    pub fn for_height(height: u16) -> Self {
        match height {
            9.. => Layout::Labeled,
            5..=8 => Layout::Unlabeled,
            2..=4 => Layout::Compact,
            _ => Layout::TooSmall,
        }
    }
}

/// Redraws the whole screen using as much room as the terminal offers.
pub fn draw<S: Surface>(
    surface: &mut S,
    state: &AppState,
    colorize: bool,
) -> Result<Layout, TerminalError> {
    let height = surface.height()?;
    let layout = Layout::for_height(height);
    let space = height / 4;

    surface.control(Control::CursorOff)?;
    surface.control(Control::ClearScreen)?;
    match layout {
        Layout::Labeled => {
            let label = |text: &str| {
                let bold = Style::Bold.paint(text, colorize) + ":";
                Style::Green.paint(&bold, colorize)
            };
            for (row, (name, value)) in (0..).zip(blocks(state)) {
                surface.print_at(&label(name), space * row + 1, 0)?;
                surface.print_at(value, space * row + 2, 0)?;
            }
        }
        Layout::Unlabeled => {
            for (row, (_, value)) in (0..).zip(blocks(state)) {
                surface.print_at(value, space * row + 1, 0)?;
            }
        }
        Layout::Compact => {
            let marker = |text: &str| Style::Green.paint(text, colorize);
            let line = format!(
                "{}{} ; {}{} ; {}{} {} {}",
                marker("P:"),
                state.pattern,
                marker("I:"),
                state.input,
                marker("R:"),
                state.replace,
                marker("=="),
                state.result
            );
            surface.print_at(&line, 1, 0)?;
        }
        Layout::TooSmall => warn!(height, "not enough room for output"),
    }
    surface.print_at("", height, 0)?;
    surface.control(Control::CursorOn)?;
    surface.flush()?;
    Ok(layout)
}

/// Block k starts on row `space * k + 1`, so blocks never share a row and
/// the bottom row stays free for the prompt.
fn blocks(state: &AppState) -> [(&'static str, &str); 4] {
    [
        ("Pattern", state.pattern.as_str()),
        ("Input", state.input.as_str()),
        ("Replacement text", state.replace.as_str()),
        ("Result", state.result.as_str()),
    ]
}

const HELP_ROWS: [(&str, &str, &str); 10] = [
    ("command", "input", "Description"),
    ("-------", "-----", "-----------"),
    ("pattern", "text", "Update the regular expression pattern."),
    ("input", "text", "Update the input text."),
    ("replace", "text", "Update the replacement text, groups start at $1."),
    ("-------", "-----", "-----------"),
    ("exit", "", "Exit the application."),
    ("quit", "", "Same as exit."),
    ("dump", "", "Exit and print the final values."),
    ("help", "", "Print this help message."),
];

/// Shows the command table. Assumes the whole screen can be used.
pub fn help<S: Surface>(surface: &mut S) -> Result<(), TerminalError> {
    surface.control(Control::ClearScreen)?;
    surface.print_at("", 1, 0)?;
    for (command, input, description) in HELP_ROWS {
        surface.print(&format!("{command:>8} {input:>5} {description}\n"))?;
    }
    surface.print("Partial commands are accepted everywhere, p == pattern\n")?;
    let height = surface.height()?;
    surface.print_at("", height, 0)?;
    surface.flush()
}
