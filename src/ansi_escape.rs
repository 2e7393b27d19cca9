//! # ANSI / VT100 escape sequences
//!
//! Wire-format constants used by the renderer and terminal probing code. Kept as plain `&str`
//! constants rather than a crate dependency (e.g. `crossterm`) since the editor only ever needs to
//! emit a fixed, small set of sequences and parse a handful of responses.

/// Hide the cursor (`?25l`).
pub const HIDE_CURSOR: &str = "\x1b[?25l";
/// Show the cursor (`?25h`).
pub const SHOW_CURSOR: &str = "\x1b[?25h";
/// Move the cursor to the top-left corner of the screen.
pub const MOVE_CURSOR_TO_START: &str = "\x1b[H";
/// Erase the part of the current line to the right of the cursor.
pub const CLEAR_LINE_RIGHT_OF_CURSOR: &str = "\x1b[K";
/// Erase the entire screen.
pub const CLEAR_SCREEN: &str = "\x1b[2J";
/// Reset all SGR attributes (also used to reset the foreground/background colors).
pub const RESET_FMT: &str = "\x1b[m";
/// Turn on reverse video.
pub const REVERSE_VIDEO: &str = "\x1b[7m";
/// Reset the foreground color to the terminal default, leaving other SGR attributes untouched.
pub const RESET_FG: &str = "\x1b[39m";
/// Device Status Report: ask the terminal to report the cursor position as `ESC[row;colR`.
pub const CURSOR_POSITION_REPORT: &str = "\x1b[6n";
/// Move the cursor as far right and down as possible; used as a fallback window-size probe when
/// `TIOCGWINSZ` is unavailable or returns a degenerate size.
pub const PROBE_WINDOW_SIZE: &str = "\x1b[999C\x1b[999B";

/// Build the `ESC[<row>;<col>H` cursor positioning sequence (both 1-indexed).
pub fn move_cursor_to(row: usize, col: usize) -> String { format!("\x1b[{};{}H", row, col) }

/// Build the `ESC[<code>m` SGR sequence for a highlight color code.
pub fn set_color(code: u8) -> String { format!("\x1b[{}m", code) }
