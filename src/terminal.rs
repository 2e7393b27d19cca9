//! # Terminal probing helpers
//!
//! Platform-independent fallbacks built on top of whatever `sys` exposes for raw stdin/stdout: the
//! `ESC[6n` cursor-position report, used both to parse a DSR reply and, combined with the
//! `ESC[999C\x1b[999B` probe, to discover the window size when `TIOCGWINSZ`/`GetConsoleScreenBufferInfo`
//! is unavailable or returns a degenerate size.

use std::io::{Read, Write};

use crate::ansi_escape::{CURSOR_POSITION_REPORT, PROBE_WINDOW_SIZE};
use crate::{sys, Error};

/// Write `buffer` to stdout and flush. The only place in the editor allowed to write to stdout
/// outside of the main render loop's single per-frame write.
pub fn print_and_flush(buffer: &[u8]) -> Result<(), Error> {
    let mut stdout = std::io::stdout();
    stdout.write_all(buffer)?;
    stdout.flush()?;
    Ok(())
}

/// Parse a `ESC[<row>;<col>R` cursor position report read from `stdin`. Bytes are read one at a
/// time until `R` is seen or a non-digit, non-`;` byte breaks the sequence.
fn parse_cursor_position_report(mut stdin: impl Read) -> Result<(usize, usize), Error> {
    let mut buf = [0u8; 1];
    // Expect ESC [
    stdin.read_exact(&mut buf)?;
    if buf[0] != b'\x1b' {
        return Err(Error::CursorPosition);
    }
    stdin.read_exact(&mut buf)?;
    if buf[0] != b'[' {
        return Err(Error::CursorPosition);
    }
    let mut digits = String::new();
    loop {
        stdin.read_exact(&mut buf)?;
        match buf[0] {
            b'R' => break,
            b => digits.push(b as char),
        }
    }
    let mut parts = digits.splitn(2, ';');
    let row = parts.next().and_then(|s| s.parse().ok()).ok_or(Error::CursorPosition)?;
    let col = parts.next().and_then(|s| s.parse().ok()).ok_or(Error::CursorPosition)?;
    Ok((row, col))
}

/// Fallback window-size discovery: push the cursor to the bottom-right corner of the (possibly
/// much larger than the real) screen, then ask the terminal to report where it actually landed.
pub fn get_window_size_using_cursor() -> Result<(usize, usize), Error> {
    print_and_flush(PROBE_WINDOW_SIZE.as_bytes())?;
    print_and_flush(CURSOR_POSITION_REPORT.as_bytes())?;
    parse_cursor_position_report(sys::stdin()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_well_formed_report() {
        let report = b"\x1b[24;80R".to_vec();
        assert_eq!(parse_cursor_position_report(&report[..]).unwrap(), (24, 80));
    }

    #[test]
    fn rejects_a_malformed_report() {
        let report = b"not a report".to_vec();
        assert!(parse_cursor_position_report(&report[..]).is_err());
    }
}
