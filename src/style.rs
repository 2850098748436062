/// SGR text attributes with their matching reset codes.
///
/// Not every attribute shares a reset: bold and light both end with 22,
/// the underline variants with 24, and every foreground color with 39.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    #[allow(dead_code)]
    ClearAll,
    Bold,
    #[allow(dead_code)]
    Light,
    #[allow(dead_code)]
    Italic,
    #[allow(dead_code)]
    Underline,
    #[allow(dead_code)]
    Blink,
    #[allow(dead_code)]
    Reverse,
    #[allow(dead_code)]
    Invisible,
    #[allow(dead_code)]
    Strike,
    #[allow(dead_code)]
    DoubleUnderline,
    #[allow(dead_code)]
    Black,
    #[allow(dead_code)]
    Red,
    Green,
    #[allow(dead_code)]
    Yellow,
    #[allow(dead_code)]
    Blue,
    #[allow(dead_code)]
    Magenta,
    #[allow(dead_code)]
    Cyan,
    #[allow(dead_code)]
    Gray,
    #[allow(dead_code)]
    White,
    #[allow(dead_code)]
    Default,
}

impl Style {
    pub fn start(self) -> u8 {
        match self {
            Style::ClearAll => 0,
            Style::Bold => 1,
            Style::Light => 2,
            Style::Italic => 3,
            Style::Underline => 4,
            Style::Blink => 5,
            Style::Reverse => 7,
            Style::Invisible => 8,
            Style::Strike => 9,
            Style::DoubleUnderline => 21,
            Style::Black => 30,
            Style::Red => 31,
            Style::Green => 32,
            Style::Yellow => 33,
            Style::Blue => 34,
            Style::Magenta => 35,
            Style::Cyan => 36,
            Style::Gray => 37,
            Style::White => 97,
            Style::Default => 39,
        }
    }

    pub fn end(self) -> u8 {
        match self {
            Style::ClearAll => 0,
            Style::Bold | Style::Light => 22,
            Style::Italic => 23,
            Style::Underline | Style::DoubleUnderline => 24,
            Style::Blink => 25,
            Style::Reverse => 27,
            Style::Invisible => 28,
            Style::Strike => 29,
            Style::Black
            | Style::Red
            | Style::Green
            | Style::Yellow
            | Style::Blue
            | Style::Magenta
            | Style::Cyan
            | Style::Gray
            | Style::White
            | Style::Default => 39,
        }
    }

    pub fn wrap(self, text: &str) -> String {
        format!("\x1b[{}m{text}\x1b[{}m", self.start(), self.end())
    }

    /// Like [`Style::wrap`], but leaves the text alone when color is off.
    pub fn paint(self, text: &str, colorize: bool) -> String {
        if colorize {
            self.wrap(text)
        } else {
            text.to_string()
        }
    }
}
