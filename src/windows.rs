//! # sys (Windows)
//!
//! Windows-specific structs and functions, exposing the same surface as `unix.rs` so `editor.rs`
//! can stay platform-agnostic. Standard handle acquisition goes through `winapi-util` (which wraps
//! `GetStdHandle` without requiring the `processenv`/`winbase` features on our own `winapi`
//! dependency); console mode and screen-buffer queries use `winapi`'s `wincon` module directly,
//! which is the only feature this crate enables on `winapi`.

use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

use winapi::shared::minwindef::DWORD;
use winapi::um::wincon::{
    GetConsoleMode, GetConsoleScreenBufferInfo, SetConsoleMode, CONSOLE_SCREEN_BUFFER_INFO,
    ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT, ENABLE_PROCESSED_INPUT, ENABLE_PROCESSED_OUTPUT,
    ENABLE_VIRTUAL_TERMINAL_INPUT, ENABLE_VIRTUAL_TERMINAL_PROCESSING,
};
use winapi_util::HandleRef;

pub use crate::xdg::*;
use crate::Error;

/// The Windows console mode, saved/restored around a session the same way a `termios` struct is
/// on Unix.
#[derive(Clone, Copy)]
pub struct TermMode {
    input: DWORD,
    output: DWORD,
}

fn stdin_handle() -> HandleRef { HandleRef::stdin() }
fn stdout_handle() -> HandleRef { HandleRef::stdout() }

fn get_mode(handle: &HandleRef) -> Result<DWORD, Error> {
    let mut mode: DWORD = 0;
    let ok = unsafe { GetConsoleMode(handle.as_raw() as _, &mut mode) };
    if ok == 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(mode)
}

fn set_mode(handle: &HandleRef, mode: DWORD) -> Result<(), Error> {
    let ok = unsafe { SetConsoleMode(handle.as_raw() as _, mode) };
    if ok == 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

/// Switch the console into raw-ish mode: no line buffering, no echo, no Ctrl-C/Ctrl-Break signal
/// generation, and (best-effort) virtual terminal sequence processing so the ANSI escape codes
/// this editor emits are interpreted by the console host.
pub fn enable_raw_mode() -> Result<TermMode, Error> {
    let stdin = stdin_handle();
    let stdout = stdout_handle();
    let orig = TermMode { input: get_mode(&stdin)?, output: get_mode(&stdout)? };

    let input_mode = orig.input
        & !(ENABLE_ECHO_INPUT | ENABLE_LINE_INPUT | ENABLE_PROCESSED_INPUT)
        | ENABLE_VIRTUAL_TERMINAL_INPUT;
    set_mode(&stdin, input_mode)?;

    let output_mode = orig.output | ENABLE_VIRTUAL_TERMINAL_PROCESSING | ENABLE_PROCESSED_OUTPUT;
    set_mode(&stdout, output_mode)?;

    Ok(orig)
}

/// Restore a previously-saved console mode.
pub fn set_term_mode(term: &TermMode) -> Result<(), Error> {
    set_mode(&stdin_handle(), term.input)?;
    set_mode(&stdout_handle(), term.output)?;
    Ok(())
}

/// Remembers the last window size observed by [`get_window_size`], so [`has_window_size_changed`]
/// can detect resizes by polling instead of via a signal (Windows has no `SIGWINCH`).
static LAST_SIZE: AtomicUsize = AtomicUsize::new(0);

fn pack(rows: usize, cols: usize) -> usize { (rows << 32) | cols }

/// Query the window size via `GetConsoleScreenBufferInfo`. Returns `(rows, cols)`.
pub fn get_window_size() -> Result<(usize, usize), Error> {
    let mut info: CONSOLE_SCREEN_BUFFER_INFO = unsafe { std::mem::zeroed() };
    let ok = unsafe { GetConsoleScreenBufferInfo(stdout_handle().as_raw() as _, &mut info) };
    if ok == 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    let cols = (info.srWindow.Right - info.srWindow.Left + 1).max(0) as usize;
    let rows = (info.srWindow.Bottom - info.srWindow.Top + 1).max(0) as usize;
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidWindowSize);
    }
    LAST_SIZE.store(pack(rows, cols), Relaxed);
    Ok((rows, cols))
}

/// Polls for a resize by re-querying the console screen buffer and comparing against the last
/// observed size, since Windows has no equivalent of `SIGWINCH` to push the notification.
pub fn has_window_size_changed() -> bool {
    match get_window_size() {
        Ok((rows, cols)) => pack(rows, cols) != LAST_SIZE.swap(pack(rows, cols), Relaxed),
        Err(_) => false,
    }
}

/// No-op on Windows: there is no signal to register for, resize detection is poll-based (see
/// [`has_window_size_changed`]).
pub fn register_winsize_change_signal_handler() -> Result<(), Error> { Ok(()) }

/// A handle to read raw input bytes from.
pub fn stdin() -> Result<std::io::Stdin, Error> { Ok(std::io::stdin()) }

/// Write `bytes` to `path`, truncated to exactly `bytes.len()`. `std::fs::File` already gives us
/// `set_len`, so there's no need for the raw `CreateFile`/`SetEndOfFile` calls the Unix side makes
/// through `libc`.
pub fn save_file(path: &str, bytes: &[u8]) -> Result<(), Error> {
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new().write(true).create(true).open(path)?;
    file.set_len(bytes.len() as u64)?;
    file.write_all(bytes)?;
    Ok(())
}
