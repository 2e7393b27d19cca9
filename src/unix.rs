//! # sys (UNIX)
//!
//! UNIX-specific structs and functions. Will be imported as `sys` on UNIX systems.

use std::ffi::CString;
use std::io::Write;
use std::os::unix::io::FromRawFd;
use std::sync::atomic::{AtomicBool, Ordering::Relaxed};

// On UNIX systems, termios represents the terminal mode.
pub use libc::termios as TermMode;
use libc::{c_int, c_void, sigaction, sighandler_t, siginfo_t, winsize};
use libc::{O_CREAT, O_RDWR, SA_SIGINFO, STDIN_FILENO, STDOUT_FILENO, TCSADRAIN, TIOCGWINSZ, VMIN, VTIME};

pub use crate::xdg::*;
use crate::Error;

fn cerr(err: c_int) -> Result<(), Error> {
    match err {
        0..=c_int::MAX => Ok(()),
        _ => Err(std::io::Error::last_os_error().into()),
    }
}

/// Set by [`handle_sigwinch`] whenever a `SIGWINCH` is received; polled and cleared by
/// [`has_window_size_changed`].
static WINSIZE_CHANGED: AtomicBool = AtomicBool::new(false);

extern "C" fn handle_sigwinch(_signum: c_int, _info: *mut siginfo_t, _ctx: *mut c_void) {
    WINSIZE_CHANGED.store(true, Relaxed);
}

/// Register a `SIGWINCH` handler that records window-size-changed events for
/// [`has_window_size_changed`] to pick up from the main loop. Signal-safe: the handler only stores
/// a bool in an `AtomicBool`.
pub fn register_winsize_change_signal_handler() -> Result<(), Error> {
    let action = sigaction {
        sa_sigaction: handle_sigwinch as usize as sighandler_t,
        sa_mask: unsafe { std::mem::zeroed() },
        sa_flags: SA_SIGINFO,
        #[cfg(any(target_os = "linux", target_os = "android"))]
        sa_restorer: None,
    };
    cerr(unsafe { sigaction(libc::SIGWINCH, &action, std::ptr::null_mut()) })
}

/// Has a `SIGWINCH` been received since the last call? Clears the flag as a side effect.
pub fn has_window_size_changed() -> bool { WINSIZE_CHANGED.swap(false, Relaxed) }

/// Switch the terminal into raw mode (no echo, no line buffering, no signal generation from
/// control characters) and return the original mode so it can be restored later.
pub fn enable_raw_mode() -> Result<TermMode, Error> {
    let mut term: TermMode = unsafe { std::mem::zeroed() };
    cerr(unsafe { libc::tcgetattr(STDIN_FILENO, &mut term) })?;
    let orig_term = term;

    unsafe { libc::cfmakeraw(&mut term) };
    // VMIN = 0, VTIME = 1: read() returns after at most 100ms even if no byte is available, so
    // escape-sequence parsing is never stalled waiting on a lone ESC byte.
    term.c_cc[VMIN] = 0;
    term.c_cc[VTIME] = 1;

    cerr(unsafe { libc::tcsetattr(STDIN_FILENO, TCSADRAIN, &term) })?;
    Ok(orig_term)
}

/// Restore a previously-saved terminal mode (typically the one returned by [`enable_raw_mode`]).
pub fn set_term_mode(term: &TermMode) -> Result<(), Error> {
    cerr(unsafe { libc::tcsetattr(STDIN_FILENO, TCSADRAIN, term) })
}

/// Query the window size using `TIOCGWINSZ`. Returns `(rows, cols)`.
pub fn get_window_size() -> Result<(usize, usize), Error> {
    let mut ws: winsize = unsafe { std::mem::zeroed() };
    cerr(unsafe { libc::ioctl(STDOUT_FILENO, TIOCGWINSZ, &mut ws) })?;
    if ws.ws_row == 0 || ws.ws_col == 0 {
        return Err(Error::InvalidWindowSize);
    }
    Ok((ws.ws_row as usize, ws.ws_col as usize))
}

/// A handle to read raw input bytes from. On Unix this is just `std::io::stdin()`; kept as a
/// function (rather than a direct call in `editor.rs`) so the `windows` shim can do the
/// console-specific setup it needs behind the same signature.
pub fn stdin() -> Result<std::io::Stdin, Error> { Ok(std::io::stdin()) }

/// Write `bytes` to `path`, truncated to exactly `bytes.len()`. Opens with `O_RDWR | O_CREAT` at
/// mode `0644` and `ftruncate`s before writing, the same ordering `kilo.c` uses to minimise the
/// window during which a crash could leave the file shorter than either the old or new content.
pub fn save_file(path: &str, bytes: &[u8]) -> Result<(), Error> {
    let c_path = CString::new(path)
        .map_err(|_| std::io::Error::new(std::io::ErrorKind::InvalidInput, "path contains a NUL byte"))?;
    let fd = unsafe { libc::open(c_path.as_ptr(), O_RDWR | O_CREAT, 0o644) };
    if fd < 0 {
        return Err(std::io::Error::last_os_error().into());
    }
    // Take ownership immediately so the descriptor is closed on every return path, including the
    // `cerr` error below.
    let mut file = unsafe { std::fs::File::from_raw_fd(fd) };
    cerr(unsafe { libc::ftruncate(fd, bytes.len() as libc::off_t) })?;
    file.write_all(bytes)?;
    Ok(())
}
