//! # CLI entry point
//!
//! Parses argv, loads the configuration, and runs the editor. Kept thin on purpose: anything that
//! touches the terminal or the row store lives in the library crate.

use std::env;
use std::io::Write;
use std::process;

use rust_text_editor::{ansi_escape, Config, Editor, Error};

const USAGE: &str = "usage: rust-text-editor [-h | --help] [filename]";

enum Args {
    Help,
    Open(Option<String>),
}

/// Parse the arguments following the program name. `total_argc` is the full `argc` (program name
/// included), used only to build `Error::TooManyArguments`'s count.
fn parse_args(argv: Vec<String>, total_argc: usize) -> Result<Args, Error> {
    let mut filename = None;
    for arg in argv {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Args::Help),
            _ if arg.starts_with('-') => return Err(Error::UnrecognizedOption(arg)),
            _ if filename.is_some() => return Err(Error::TooManyArguments(total_argc)),
            _ => filename = Some(arg),
        }
    }
    Ok(Args::Open(filename))
}

fn run() -> Result<(), Error> {
    let full_argv: Vec<String> = env::args().collect();
    let argv = full_argv[1..].to_vec();
    let args = parse_args(argv, full_argv.len())?;
    let filename = match args {
        Args::Help => {
            println!("{}", USAGE);
            return Ok(());
        }
        Args::Open(filename) => filename,
    };

    let config = Config::load()?;
    let mut editor = Editor::new(config)?;
    if let Some(filename) = filename {
        editor.open(&filename)?;
    }
    editor.run()
}

fn main() {
    if let Err(err) = run() {
        // The editor's `TermGuard` has already restored the terminal by the time `run` returns an
        // `Err`, via `Drop`, so writing to stdout/stderr here is safe. Clear the screen and home
        // the cursor first so a fatal error doesn't leave stale editor content on the terminal.
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(ansi_escape::CLEAR_SCREEN.as_bytes());
        let _ = stdout.write_all(ansi_escape::MOVE_CURSOR_TO_START.as_bytes());
        let _ = stdout.flush();
        eprintln!("{}", err);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_opens_an_empty_buffer() {
        match parse_args(vec![], 1).unwrap() {
            Args::Open(None) => {}
            _ => panic!("expected Args::Open(None)"),
        }
    }

    #[test]
    fn one_positional_argument_is_the_filename() {
        match parse_args(vec!["file.txt".to_string()], 2).unwrap() {
            Args::Open(Some(name)) => assert_eq!(name, "file.txt"),
            _ => panic!("expected Args::Open(Some(..))"),
        }
    }

    #[test]
    fn help_flag_short_circuits() {
        assert!(matches!(parse_args(vec!["-h".to_string()], 2).unwrap(), Args::Help));
        assert!(matches!(parse_args(vec!["--help".to_string()], 2).unwrap(), Args::Help));
    }

    #[test]
    fn unrecognized_flag_is_an_error() {
        let err = parse_args(vec!["--bogus".to_string()], 2).unwrap_err();
        assert!(matches!(err, Error::UnrecognizedOption(opt) if opt == "--bogus"));
    }

    #[test]
    fn two_positional_arguments_is_an_error() {
        let err = parse_args(vec!["a.txt".to_string(), "b.txt".to_string()], 3).unwrap_err();
        assert!(matches!(err, Error::TooManyArguments(n) if n == 3));
    }
}
