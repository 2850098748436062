use std::io::{self, Write};

use thiserror::Error;
use tracing::{debug, warn};

/// Screen and cursor control sequences understood by VT100-style terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    SaveScreen,
    RestoreScreen,
    SaveCursor,
    RestoreCursor,
    CursorOn,
    CursorOff,
    ClearScreen,
}

impl Control {
    pub fn code(self) -> &'static str {
        match self {
            Control::SaveScreen => "?47h",
            Control::RestoreScreen => "?47l",
            Control::SaveCursor => "s",
            Control::RestoreCursor => "u",
            Control::CursorOn => "?25h",
            Control::CursorOff => "?25l",
            Control::ClearScreen => "2J",
        }
    }
}

#[derive(Debug, Error)]
pub enum TerminalError {
    #[error("failed to query terminal size")]
    Size(#[source] io::Error),
    #[error("failed to write to terminal")]
    Write(#[from] io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenState {
    Saved,
    Restored,
}

/// Output side of the terminal: everything the renderer and the session
/// are allowed to do to the screen.
pub trait Surface {
    fn height(&self) -> Result<u16, TerminalError>;
    fn control(&mut self, control: Control) -> Result<(), TerminalError>;
    fn print(&mut self, text: &str) -> Result<(), TerminalError>;
    fn print_at(&mut self, text: &str, row: u16, col: u16) -> Result<(), TerminalError>;
    fn flush(&mut self) -> Result<(), TerminalError>;

    /// Saves the screen and cursor, then clears. Calling it while already
    /// saved does nothing.
    fn save_screen(&mut self) -> Result<(), TerminalError>;

    /// Undoes [`Surface::save_screen`]. Calling it while already restored
    /// does nothing.
    fn restore_screen(&mut self) -> Result<(), TerminalError>;
}

#[derive(Clone, Copy, Debug)]
enum HeightSource {
    Terminal,
    #[cfg_attr(not(test), allow(dead_code))]
    Fixed(u16),
}

pub struct AnsiSurface<W: Write> {
    out: W,
    height: HeightSource,
    screen: ScreenState,
}

impl AnsiSurface<io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            out: io::stdout(),
            height: HeightSource::Terminal,
            screen: ScreenState::Restored,
        }
    }
}

impl<W: Write> AnsiSurface<W> {
    /// A surface that reports a constant height instead of probing the tty.
    #[cfg(test)]
    pub fn with_height(out: W, rows: u16) -> Self {
        Self {
            out,
            height: HeightSource::Fixed(rows),
            screen: ScreenState::Restored,
        }
    }

    #[cfg(test)]
    pub fn screen_state(&self) -> ScreenState {
        self.screen
    }

    #[cfg(test)]
    pub fn writer(&self) -> &W {
        &self.out
    }
}

impl<W: Write> Surface for AnsiSurface<W> {
    fn height(&self) -> Result<u16, TerminalError> {
        match self.height {
            HeightSource::Fixed(rows) => Ok(rows),
            HeightSource::Terminal => {
                let (_cols, rows) = crossterm::terminal::size().map_err(TerminalError::Size)?;
                Ok(rows)
            }
        }
    }

    fn control(&mut self, control: Control) -> Result<(), TerminalError> {
        write!(self.out, "\x1b[{}", control.code())?;
        Ok(())
    }

    fn print(&mut self, text: &str) -> Result<(), TerminalError> {
        self.out.write_all(text.as_bytes())?;
        Ok(())
    }

    fn print_at(&mut self, text: &str, row: u16, col: u16) -> Result<(), TerminalError> {
        write!(self.out, "\x1b[{row};{col}H{text}")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TerminalError> {
        self.out.flush()?;
        Ok(())
    }

    fn save_screen(&mut self) -> Result<(), TerminalError> {
        if self.screen == ScreenState::Restored {
            self.control(Control::SaveScreen)?;
            self.control(Control::SaveCursor)?;
            self.control(Control::ClearScreen)?;
            self.flush()?;
            self.screen = ScreenState::Saved;
            debug!("screen saved");
        }
        Ok(())
    }

    fn restore_screen(&mut self) -> Result<(), TerminalError> {
        if self.screen == ScreenState::Saved {
            self.control(Control::RestoreCursor)?;
            self.control(Control::RestoreScreen)?;
            self.flush()?;
            self.screen = ScreenState::Restored;
            debug!("screen restored");
        }
        Ok(())
    }
}

impl<W: Write> Drop for AnsiSurface<W> {
    fn drop(&mut self) {
        if let Err(err) = self.restore_screen() {
            warn!("could not restore terminal on exit: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(surface: &AnsiSurface<Vec<u8>>) -> String {
        String::from_utf8(surface.writer().clone()).expect("utf8 output")
    }

    #[test]
    fn print_at_positions_cursor() {
        let mut surface = AnsiSurface::with_height(Vec::new(), 10);
        surface.print_at("hello", 3, 0).unwrap();
        assert_eq!(written(&surface), "\x1b[3;0Hhello");
    }

    #[test]
    fn fixed_height_is_reported() {
        let surface = AnsiSurface::with_height(Vec::new(), 7);
        assert_eq!(surface.height().unwrap(), 7);
    }

    #[test]
    fn save_is_idempotent() {
        let mut surface = AnsiSurface::with_height(Vec::new(), 10);
        surface.save_screen().unwrap();
        surface.save_screen().unwrap();
        assert_eq!(surface.screen_state(), ScreenState::Saved);
        assert_eq!(written(&surface), "\x1b[?47h\x1b[s\x1b[2J");
    }

    #[test]
    fn restore_only_after_save() {
        let mut surface = AnsiSurface::with_height(Vec::new(), 10);
        surface.restore_screen().unwrap();
        assert!(written(&surface).is_empty());

        surface.save_screen().unwrap();
        surface.restore_screen().unwrap();
        surface.restore_screen().unwrap();
        assert_eq!(surface.screen_state(), ScreenState::Restored);
        assert!(written(&surface).ends_with("\x1b[u\x1b[?47l"));
        assert_eq!(written(&surface).matches("?47l").count(), 1);
    }
}
