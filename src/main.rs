use std::io::{self, Write};

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use is_terminal::IsTerminal;
use tracing::{debug, error};

mod commands;
mod input;
mod logging;
mod render;
mod session;
mod state;
mod style;
mod surface;
use input::RustylineSource;
use session::{Session, SessionOptions};
use state::AppState;
use surface::AnsiSurface;

const DEFAULT_INPUT: &str = "The quick brown fox jumps over the lazy dogs";

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq, Default)]
enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn should_color(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => io::stdout().is_terminal(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let mut stdout = io::stdout();
    if cli.version {
        print_version(&mut stdout)?;
    }

    let colorize = cli.color.should_color();
    let state = AppState::new(cli.pattern, cli.input, cli.replace);
    if cli.interactive {
        handle_interactive(state, colorize, cli.json, &mut stdout)
    } else {
        handle_work(state, cli.json, &mut stdout)
    }
}

fn print_version<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "Written by {}", env!("CARGO_PKG_AUTHORS"))?;
    writeln!(out, "retool {}", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

/// One pass: recompute once and print every field.
fn handle_work<W: Write>(mut state: AppState, json: bool, out: &mut W) -> Result<()> {
    if let Err(err) = commands::calculate(&mut state) {
        error!("{err}");
    }
    if json {
        state.dump_json(out)
    } else {
        state.dump(out)
    }
}

fn handle_interactive<W: Write>(
    state: AppState,
    colorize: bool,
    json: bool,
    out: &mut W,
) -> Result<()> {
    let history = input::history_path();
    debug!("history file {}", history.display());
    let lines = RustylineSource::new(&history)?;
    let options = SessionOptions {
        colorize,
        json,
        history,
    };
    let mut session = Session::new(AnsiSurface::stdout(), lines, state, options);
    session.run(out)?;
    debug!(status = ?session.status(), result = %session.state().result, "session finished");
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "retool",
    about = "Build regular expressions interactively by watching a find/replace live",
    disable_version_flag = true
)]
struct Cli {
    /// Regular expression pattern
    #[arg(long, value_name = "PATTERN", default_value = " [a-z]", allow_hyphen_values = true)]
    pattern: String,
    /// Input text to apply the pattern to
    #[arg(long, value_name = "TEXT", default_value = DEFAULT_INPUT, allow_hyphen_values = true)]
    input: String,
    /// Replacement text, capture groups start at $1
    #[arg(long, value_name = "TEXT", default_value = "*", allow_hyphen_values = true)]
    replace: String,
    /// Print the version and author, then carry on
    #[arg(long, action = ArgAction::SetTrue)]
    version: bool,
    /// Enter interactive mode. At the prompt: p <text>, i <text>, r <text>, exit, dump, help
    #[arg(long, action = ArgAction::SetTrue)]
    interactive: bool,
    /// Print dumps as JSON
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
    #[arg(long = "color", value_enum, default_value = "auto")]
    color: ColorChoice,
    /// More log output; repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, action = ArgAction::SetTrue)]
    quiet: bool,
}

#[cfg(test)]
mod cli_tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("retool").chain(args.iter().copied()))
            .expect("arguments parse")
    }

    #[test]
    fn defaults_match_sample_session() {
        let cli = parse(&[]);
        assert_eq!(cli.pattern, " [a-z]");
        assert_eq!(cli.input, DEFAULT_INPUT);
        assert_eq!(cli.replace, "*");
        assert!(!cli.interactive);
        assert!(!cli.version);
        assert_eq!(cli.color, ColorChoice::Auto);
    }

    #[test]
    fn version_flag_does_not_exit() {
        let cli = parse(&["--version", "--pattern", "-x"]);
        assert!(cli.version);
        assert_eq!(cli.pattern, "-x");
    }

    #[test]
    fn verbosity_counts() {
        let cli = parse(&["-vv", "--quiet"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.quiet);
    }

    #[test]
    fn color_choice_overrides_detection() {
        assert!(ColorChoice::Always.should_color());
        assert!(!ColorChoice::Never.should_color());
    }

    #[test]
    fn version_names_author() {
        let mut out = Vec::new();
        print_version(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.starts_with("Written by "));
    }

    #[test]
    fn one_shot_prints_all_fields() {
        let mut out = Vec::new();
        let state = AppState::new(" [a-z]", DEFAULT_INPUT, "*");
        handle_work(state, false, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            concat!(
                "Pattern: \" [a-z]\"\n",
                "  Input: \"The quick brown fox jumps over the lazy dogs\"\n",
                "Replace: \"*\"\n",
                " Result: \"The*uick*rown*ox*umps*ver*he*azy*ogs\"\n",
            )
        );
    }

    #[test]
    fn one_shot_survives_bad_pattern() {
        let mut out = Vec::new();
        let state = AppState::new("(", "abc", "*");
        handle_work(state, false, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with(" Result: \"\"\n"));
    }

    #[test]
    fn one_shot_json() {
        let mut out: Vec<u8> = Vec::new();
        let state = AppState::new("o", "foo", "0");
        handle_work(state, true, &mut out).unwrap();
        let dumped: AppState = serde_json::from_slice(&out).unwrap();
        assert_eq!(dumped.result, "f00");
    }
}
