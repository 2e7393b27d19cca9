//! # Errors

use std::fmt;

/// Error type.
#[derive(Debug)]
pub enum Error {
    /// Wrapper around `std::io::Error`.
    Io(std::io::Error),
    /// Error returned when the window size obtained through a system call is invalid.
    InvalidWindowSize,
    /// Error setting or retrieved the cursor position.
    CursorPosition,
    /// Configuration error. The tree attributes correspond the file path, the line number and the
    /// error message.
    Config(std::path::PathBuf, usize, String),
    /// Too many arguments given to Rust Text Editor. The attribute corresponds to the total number of command
    /// line arguments.
    TooManyArguments(usize),
    /// Unrecognized option given as a command line argument.
    UnrecognizedOption(String),
}

impl From<std::io::Error> for Error {
    /// Convert an IO Error into a Rust Text Editor.
    fn from(err: std::io::Error) -> Self { Self::Io(err) }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::InvalidWindowSize => write!(f, "Invalid window size"),
            Self::CursorPosition => write!(f, "Couldn't get the cursor position"),
            Self::Config(path, line, msg) => write!(f, "{}:{}: {}", path.display(), line, msg),
            Self::TooManyArguments(n) => {
                write!(f, "Too many arguments (expected 1, got {})", n.saturating_sub(1))
            }
            Self::UnrecognizedOption(opt) => write!(f, "Unrecognized option: {}", opt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_a_readable_message() {
        let err = Error::UnrecognizedOption("--bogus".to_string());
        assert_eq!(err.to_string(), "Unrecognized option: --bogus");
    }

    #[test]
    fn io_error_is_reachable_via_from_and_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let err: Error = io_err.into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
