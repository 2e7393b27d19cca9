//! # Editor
//!
//! The main loop, key dispatch, editing operations, and renderer. Everything here operates on
//! bytes: a row's content is whatever bytes were in the file, and one byte is always one screen
//! cell.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::time::Instant;

use crate::ansi_escape::{
    move_cursor_to, CLEAR_LINE_RIGHT_OF_CURSOR, CLEAR_SCREEN, HIDE_CURSOR, MOVE_CURSOR_TO_START,
    REVERSE_VIDEO, RESET_FMT, SHOW_CURSOR,
};
use crate::row::Row;
use crate::syntax::{Conf as SyntaxConf, HlType};
use crate::{sys, terminal, Config, Error};

const fn ctrl_key(key: u8) -> u8 { key & 0x1f }

const EXIT: u8 = ctrl_key(b'Q');
const SAVE: u8 = ctrl_key(b'S');
const FIND: u8 = ctrl_key(b'F');
const REFRESH_SCREEN: u8 = ctrl_key(b'L');
const DELETE_BIS: u8 = ctrl_key(b'H');
const BACKSPACE: u8 = 127;
const ESCAPE: u8 = 0x1b;
const CARRIAGE_RETURN: u8 = b'\r';

const VERSION: &str = env!("CARGO_PKG_VERSION");
const HELP_MESSAGE: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// A decoded key: either a raw byte (control character, printable byte, or an escape that wasn't
/// recognised as a longer sequence) or one of the wide codes the input decoder assembles from a
/// multi-byte ANSI sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Arrow(ArrowKey),
    Page(PageKey),
    Home,
    End,
    Delete,
    Escape,
    Byte(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrowKey {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageKey {
    Up,
    Down,
}

/// Read exactly one byte, retrying on the read timeout (`VMIN=0, VTIME=1` on Unix means a read can
/// return zero bytes after ~100ms with nothing typed) and on `EINTR`.
fn read_byte(stdin: &mut impl Read) -> Result<u8, Error> {
    let mut buf = [0u8; 1];
    loop {
        match stdin.read(&mut buf) {
            Ok(1) => return Ok(buf[0]),
            Ok(_) => continue,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
}

/// Try to read one byte without retrying past a single read timeout. Used while assembling an
/// escape sequence: if the next byte hasn't arrived yet, it's a bare `ESC`, not a sequence.
fn try_read_byte(stdin: &mut impl Read) -> Result<Option<u8>, Error> {
    let mut buf = [0u8; 1];
    match stdin.read(&mut buf) {
        Ok(1) => Ok(Some(buf[0])),
        Ok(_) => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_key(stdin: &mut impl Read) -> Result<Key, Error> {
    let c = read_byte(stdin)?;
    if c != ESCAPE {
        return Ok(Key::Byte(c));
    }
    let b1 = match try_read_byte(stdin)? {
        Some(b) => b,
        None => return Ok(Key::Escape),
    };
    let b2 = match try_read_byte(stdin)? {
        Some(b) => b,
        None => return Ok(Key::Escape),
    };
    if b1 == b'[' {
        if b2.is_ascii_digit() {
            let b3 = try_read_byte(stdin)?;
            if b3 != Some(b'~') {
                return Ok(Key::Escape);
            }
            return Ok(match b2 {
                b'1' | b'7' => Key::Home,
                b'3' => Key::Delete,
                b'4' | b'8' => Key::End,
                b'5' => Key::Page(PageKey::Up),
                b'6' => Key::Page(PageKey::Down),
                _ => Key::Escape,
            });
        }
        return Ok(match b2 {
            b'A' => Key::Arrow(ArrowKey::Up),
            b'B' => Key::Arrow(ArrowKey::Down),
            b'C' => Key::Arrow(ArrowKey::Right),
            b'D' => Key::Arrow(ArrowKey::Left),
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Escape,
        });
    }
    if b1 == b'O' {
        return Ok(match b2 {
            b'H' => Key::Home,
            b'F' => Key::End,
            _ => Key::Escape,
        });
    }
    Ok(Key::Escape)
}

/// Truncate `s` to at most `max` characters without risking a non-char-boundary panic (`s` may
/// hold a non-ASCII file name).
fn truncate_chars(s: &str, max: usize) -> String { s.chars().take(max).collect() }

fn find_substring(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Logical cursor plus the scroll offsets that derive the visible window from it. Saved and
/// restored wholesale around a cancelled search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CursorState {
    cx: usize,
    cy: usize,
    rowoff: usize,
    coloff: usize,
}

struct StatusMessage {
    text: String,
    time: Instant,
}

/// Per-search-session state for the incremental find callback: the row of the previous hit (if
/// any), the direction to step in next, and the highlight bytes to restore before the next match
/// is drawn (so a stale `MATCH` mark never lingers on screen).
struct FindState {
    last_match: Option<usize>,
    direction: i8,
    saved_hl: Option<(usize, Vec<HlType>)>,
}

impl Default for FindState {
    fn default() -> Self { Self { last_match: None, direction: 1, saved_hl: None } }
}

/// Restores the original terminal mode when dropped, so a panic unwinding out of the main loop
/// still leaves the terminal usable. `None` is used by the test-only constructor, which never
/// touches the real terminal.
struct TermGuard(Option<sys::TermMode>);

impl Drop for TermGuard {
    fn drop(&mut self) {
        if let Some(term) = &self.0 {
            let _ = sys::set_term_mode(term);
        }
    }
}

fn window_size() -> Result<(usize, usize), Error> {
    sys::get_window_size().or_else(|_| terminal::get_window_size_using_cursor())
}

/// The editor: owns the terminal for the duration of a session, the row store, the cursor and
/// scroll state, and the syntax definition currently in effect.
pub struct Editor {
    term_guard: TermGuard,
    config: Config,
    rows: Vec<Row>,
    cursor: CursorState,
    screen_rows: usize,
    screen_cols: usize,
    dirty: u64,
    file_name: Option<String>,
    status_msg: Option<StatusMessage>,
    syntax: Option<&'static SyntaxConf>,
    quit_times: usize,
}

impl Editor {
    /// Acquire the terminal (raw mode, window size, `SIGWINCH` handler) and build a new, empty
    /// editor session.
    pub fn new(config: Config) -> Result<Self, Error> {
        let orig_term = sys::enable_raw_mode()?;
        sys::register_winsize_change_signal_handler()?;
        let (rows, cols) = window_size()?;
        let quit_times = config.quit_times;
        Ok(Self {
            term_guard: TermGuard(Some(orig_term)),
            config,
            rows: Vec::new(),
            cursor: CursorState::default(),
            screen_rows: rows.saturating_sub(2),
            screen_cols: cols,
            dirty: 0,
            file_name: None,
            status_msg: Some(StatusMessage { text: HELP_MESSAGE.to_string(), time: Instant::now() }),
            syntax: None,
            quit_times,
        })
    }

    /// Load `filename` into the row store, replacing any existing content. Adopts the file name
    /// and the syntax definition matching it, and leaves the dirty counter at zero.
    pub fn open(&mut self, filename: &str) -> Result<(), Error> {
        self.file_name = Some(filename.to_string());
        self.syntax = SyntaxConf::for_filename(filename);
        let reader = BufReader::new(File::open(filename)?);
        self.rows.clear();
        for line in reader.split(b'\n') {
            let mut bytes = line?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            let at = self.rows.len();
            self.insert_row(at, bytes);
        }
        self.dirty = 0;
        Ok(())
    }

    /// Run the `refresh -> read key -> dispatch` loop until the user quits.
    pub fn run(&mut self) -> Result<(), Error> {
        loop {
            self.refresh_screen()?;
            if self.process_keypress()? {
                break;
            }
        }
        terminal::print_and_flush(format!("{}{}", CLEAR_SCREEN, MOVE_CURSOR_TO_START).as_bytes())
    }

    // -- Row store operations (4.2) -----------------------------------------------------------

    fn insert_row(&mut self, at: usize, chars: Vec<u8>) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(at, chars));
        for row in &mut self.rows[at + 1..] {
            row.idx += 1;
        }
        self.update_row(at);
    }

    fn del_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        for row in &mut self.rows[at..] {
            row.idx -= 1;
        }
        if at < self.rows.len() {
            self.update_row(at);
        }
    }

    /// Re-derive `render`/`hl` for the row at `at`, cascading to the next row whenever its
    /// `hl_open_comment` state flips (iteratively, so a long run of changed rows doesn't recurse).
    fn update_row(&mut self, at: usize) {
        let syntax = self.syntax.unwrap_or(&crate::syntax::DEFAULT_CONF);
        let mut idx = at;
        loop {
            if idx >= self.rows.len() {
                break;
            }
            let prev_open = if idx == 0 { false } else { self.rows[idx - 1].hl_open_comment };
            let old_open = self.rows[idx].hl_open_comment;
            let new_open = self.rows[idx].update(syntax, prev_open, self.config.tab_stop);
            if new_open == old_open {
                break;
            }
            idx += 1;
        }
    }

    // -- Editor operations (4.5) ---------------------------------------------------------------

    fn insert_char(&mut self, c: u8) {
        if self.cursor.cy == self.rows.len() {
            self.insert_row(self.rows.len(), Vec::new());
        }
        let at = self.cursor.cx.min(self.rows[self.cursor.cy].chars.len());
        self.rows[self.cursor.cy].chars.insert(at, c);
        self.update_row(self.cursor.cy);
        self.cursor.cx += 1;
        self.dirty += 1;
    }

    fn insert_newline(&mut self) {
        if self.cursor.cx == 0 {
            self.insert_row(self.cursor.cy, Vec::new());
        } else {
            let tail = self.rows[self.cursor.cy].chars[self.cursor.cx..].to_vec();
            self.rows[self.cursor.cy].chars.truncate(self.cursor.cx);
            self.update_row(self.cursor.cy);
            self.insert_row(self.cursor.cy + 1, tail);
        }
        self.cursor.cy += 1;
        self.cursor.cx = 0;
        self.dirty += 1;
    }

    fn delete_char(&mut self) {
        if self.cursor.cy == self.rows.len() || (self.cursor.cy == 0 && self.cursor.cx == 0) {
            return;
        }
        if self.cursor.cx > 0 {
            self.rows[self.cursor.cy].chars.remove(self.cursor.cx - 1);
            self.update_row(self.cursor.cy);
            self.cursor.cx -= 1;
        } else {
            let prev_len = self.rows[self.cursor.cy - 1].chars.len();
            let tail = self.rows[self.cursor.cy].chars.clone();
            self.rows[self.cursor.cy - 1].chars.extend_from_slice(&tail);
            self.update_row(self.cursor.cy - 1);
            self.del_row(self.cursor.cy);
            self.cursor.cy -= 1;
            self.cursor.cx = prev_len;
        }
        self.dirty += 1;
    }

    fn rows_to_string(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        for row in &self.rows {
            buf.extend_from_slice(&row.chars);
            buf.push(b'\n');
        }
        buf
    }

    fn save(&mut self) -> Result<(), Error> {
        if self.file_name.is_none() {
            match self.prompt("Save as: {} (ESC to cancel)", |_, _, _| Ok(()))? {
                Some(name) => {
                    self.syntax = SyntaxConf::for_filename(&name);
                    self.file_name = Some(name);
                }
                None => {
                    self.set_status_message("Save aborted");
                    return Ok(());
                }
            }
        }
        let bytes = self.rows_to_string();
        let name = self.file_name.clone().expect("file name set above");
        match sys::save_file(&name, &bytes) {
            Ok(()) => {
                self.dirty = 0;
                self.set_status_message(format!("{} bytes written to disk", bytes.len()));
            }
            Err(e) => self.set_status_message(format!("Can't save! I/O error: {}", e)),
        }
        Ok(())
    }

    // -- Cursor movement (4.9) ----------------------------------------------------------------

    fn move_cursor(&mut self, dir: ArrowKey) {
        let n = self.rows.len();
        match dir {
            ArrowKey::Left if self.cursor.cx > 0 => self.cursor.cx -= 1,
            ArrowKey::Left if self.cursor.cy > 0 => {
                self.cursor.cy -= 1;
                self.cursor.cx = self.rows[self.cursor.cy].chars.len();
            }
            ArrowKey::Right if self.cursor.cy < n && self.cursor.cx < self.rows[self.cursor.cy].chars.len() => {
                self.cursor.cx += 1;
            }
            ArrowKey::Right if self.cursor.cy < n => {
                self.cursor.cy += 1;
                self.cursor.cx = 0;
            }
            ArrowKey::Up if self.cursor.cy > 0 => self.cursor.cy -= 1,
            ArrowKey::Down if self.cursor.cy < n => self.cursor.cy += 1,
            _ => {}
        }
        let row_len = self.rows.get(self.cursor.cy).map_or(0, |r| r.chars.len());
        self.cursor.cx = self.cursor.cx.min(row_len);
    }

    fn page(&mut self, dir: PageKey) {
        self.cursor.cy = match dir {
            PageKey::Up => self.cursor.rowoff,
            PageKey::Down => (self.cursor.rowoff + self.screen_rows.saturating_sub(1)).min(self.rows.len()),
        };
        let arrow = match dir {
            PageKey::Up => ArrowKey::Up,
            PageKey::Down => ArrowKey::Down,
        };
        for _ in 0..self.screen_rows {
            self.move_cursor(arrow);
        }
    }

    // -- Main loop & dispatch (4.9) -------------------------------------------------------------

    /// Returns `true` once the user has confirmed they want to quit.
    fn process_keypress(&mut self) -> Result<bool, Error> {
        let key = read_key(&mut sys::stdin()?)?;
        let mut should_quit = false;
        match key {
            Key::Byte(CARRIAGE_RETURN) => self.insert_newline(),
            Key::Byte(EXIT) => {
                if self.dirty > 0 && self.quit_times > 0 {
                    self.quit_times -= 1;
                    self.set_status_message(format!(
                        "Press Ctrl-Q {} more time{} to quit.",
                        self.quit_times,
                        if self.quit_times == 1 { "" } else { "s" }
                    ));
                    return Ok(false);
                }
                should_quit = true;
            }
            Key::Byte(SAVE) => self.save()?,
            Key::Byte(FIND) => self.find()?,
            Key::Home => self.cursor.cx = 0,
            Key::End => {
                if self.cursor.cy < self.rows.len() {
                    self.cursor.cx = self.rows[self.cursor.cy].chars.len();
                }
            }
            Key::Delete => {
                self.move_cursor(ArrowKey::Right);
                self.delete_char();
            }
            Key::Byte(DELETE_BIS) | Key::Byte(BACKSPACE) => self.delete_char(),
            Key::Page(page_key) => self.page(page_key),
            Key::Arrow(arrow) => self.move_cursor(arrow),
            Key::Byte(REFRESH_SCREEN) | Key::Escape => {}
            Key::Byte(c) if !(c as char).is_ascii_control() => self.insert_char(c),
            Key::Byte(_) => {}
        }
        if !matches!(key, Key::Byte(EXIT)) {
            self.quit_times = self.config.quit_times;
        }
        Ok(should_quit)
    }

    // -- Prompt & incremental search (4.8) ------------------------------------------------------

    /// Display a status-bar-hosted line prompt. `prompt_fmt` must contain exactly one `{}`, which
    /// is replaced by the buffer built up so far. `callback` is invoked on every iteration with
    /// the editor, the buffer, and the key that was just processed.
    fn prompt<C>(&mut self, prompt_fmt: &str, mut callback: C) -> Result<Option<String>, Error>
    where C: FnMut(&mut Self, &str, Key) -> Result<(), Error> {
        let mut buffer = String::new();
        loop {
            self.set_status_message(prompt_fmt.replacen("{}", &buffer, 1));
            self.refresh_screen()?;
            let key = read_key(&mut sys::stdin()?)?;
            match key {
                Key::Delete | Key::Byte(DELETE_BIS) | Key::Byte(BACKSPACE) => {
                    buffer.pop();
                }
                Key::Escape => {
                    callback(self, &buffer, key)?;
                    self.set_status_message("");
                    return Ok(None);
                }
                Key::Byte(CARRIAGE_RETURN) if !buffer.is_empty() => {
                    callback(self, &buffer, key)?;
                    self.set_status_message("");
                    return Ok(Some(buffer));
                }
                Key::Byte(c) if c < 128 && !(c as char).is_ascii_control() => {
                    buffer.push(c as char);
                }
                _ => {}
            }
            callback(self, &buffer, key)?;
        }
    }

    fn find(&mut self) -> Result<(), Error> {
        let saved_cursor = self.cursor;
        let mut state = FindState::default();
        let result =
            self.prompt("Search: {} (Use ESC/Arrows/Enter)", |editor, query, key| {
                editor.find_callback(query, key, &mut state)
            })?;
        if result.is_none() {
            self.cursor = saved_cursor;
        }
        Ok(())
    }

    fn find_callback(&mut self, query: &str, key: Key, state: &mut FindState) -> Result<(), Error> {
        if let Some((row_idx, hl)) = state.saved_hl.take() {
            if let Some(row) = self.rows.get_mut(row_idx) {
                row.hl = hl;
            }
        }
        match key {
            Key::Byte(CARRIAGE_RETURN) | Key::Escape => {
                state.last_match = None;
                state.direction = 1;
                return Ok(());
            }
            Key::Arrow(ArrowKey::Right) | Key::Arrow(ArrowKey::Down) => state.direction = 1,
            Key::Arrow(ArrowKey::Left) | Key::Arrow(ArrowKey::Up) => state.direction = -1,
            _ => {
                state.last_match = None;
                state.direction = 1;
            }
        }
        if query.is_empty() || self.rows.is_empty() {
            return Ok(());
        }
        let n = self.rows.len();
        let mut current = state.last_match.unwrap_or(n - 1);
        for _ in 0..n {
            current = if state.direction > 0 { (current + 1) % n } else { (current + n - 1) % n };
            if let Some(offset) = find_substring(&self.rows[current].render, query.as_bytes()) {
                state.last_match = Some(current);
                self.cursor.cy = current;
                self.cursor.cx = self.rows[current].rx_to_cx(offset, self.config.tab_stop);
                self.cursor.rowoff = self.rows.len();
                state.saved_hl = Some((current, self.rows[current].hl.clone()));
                let end = (offset + query.len()).min(self.rows[current].hl.len());
                for h in &mut self.rows[current].hl[offset..end] {
                    *h = HlType::Match;
                }
                break;
            }
        }
        Ok(())
    }

    // -- Viewport & renderer (4.3, 4.4) ----------------------------------------------------------

    fn current_rx(&self) -> usize {
        self.rows.get(self.cursor.cy).map_or(0, |row| row.cx_to_rx(self.cursor.cx, self.config.tab_stop))
    }

    fn scroll(&mut self) {
        if self.cursor.cy < self.cursor.rowoff {
            self.cursor.rowoff = self.cursor.cy;
        }
        if self.cursor.cy >= self.cursor.rowoff + self.screen_rows {
            self.cursor.rowoff = self.cursor.cy + 1 - self.screen_rows;
        }
        let rx = self.current_rx();
        if rx < self.cursor.coloff {
            self.cursor.coloff = rx;
        }
        if rx >= self.cursor.coloff + self.screen_cols {
            self.cursor.coloff = rx + 1 - self.screen_cols;
        }
    }

    fn refresh_screen(&mut self) -> Result<(), Error> {
        if sys::has_window_size_changed() {
            let (rows, cols) = window_size()?;
            self.screen_rows = rows.saturating_sub(2);
            self.screen_cols = cols;
        }
        self.scroll();

        let mut buf = Vec::new();
        buf.extend_from_slice(HIDE_CURSOR.as_bytes());
        buf.extend_from_slice(MOVE_CURSOR_TO_START.as_bytes());
        self.draw_rows(&mut buf);
        self.draw_status_bar(&mut buf);
        self.draw_message_bar(&mut buf);
        let rx = self.current_rx();
        let cursor_pos =
            move_cursor_to(self.cursor.cy - self.cursor.rowoff + 1, rx - self.cursor.coloff + 1);
        buf.extend_from_slice(cursor_pos.as_bytes());
        buf.extend_from_slice(SHOW_CURSOR.as_bytes());
        terminal::print_and_flush(&buf)
    }

    fn draw_rows(&self, buf: &mut Vec<u8>) {
        for y in 0..self.screen_rows {
            let filerow = y + self.cursor.rowoff;
            if filerow >= self.rows.len() {
                if self.rows.is_empty() && y == self.screen_rows / 3 {
                    self.draw_welcome(buf);
                } else {
                    buf.push(b'~');
                }
            } else {
                self.rows[filerow].draw(self.cursor.coloff, self.screen_cols, buf);
            }
            buf.extend_from_slice(CLEAR_LINE_RIGHT_OF_CURSOR.as_bytes());
            buf.extend_from_slice(b"\r\n");
        }
    }

    fn draw_welcome(&self, buf: &mut Vec<u8>) {
        let welcome = truncate_chars(&format!("Kilo editor -- version {}", VERSION), self.screen_cols);
        let padding = self.screen_cols.saturating_sub(welcome.len()) / 2;
        if padding > 0 {
            buf.push(b'~');
            buf.extend(std::iter::repeat(b' ').take(padding - 1));
        }
        buf.extend_from_slice(welcome.as_bytes());
    }

    fn draw_status_bar(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(REVERSE_VIDEO.as_bytes());
        let name = self.file_name.as_deref().unwrap_or("[No Name]");
        let left = format!(
            "{} - {} lines{}",
            truncate_chars(name, 20),
            self.rows.len(),
            if self.dirty > 0 { " (modified)" } else { "" }
        );
        let filetype = self.syntax.map_or("no ft", |conf| conf.name);
        let right = format!("{} | {}/{}", filetype, self.cursor.cy + 1, self.rows.len());

        let mut line = truncate_chars(&left, self.screen_cols);
        let remaining = self.screen_cols.saturating_sub(line.chars().count());
        if remaining >= right.chars().count() {
            line.push_str(&" ".repeat(remaining - right.chars().count()));
            line.push_str(&right);
        } else {
            line.push_str(&" ".repeat(remaining));
        }
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(RESET_FMT.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    fn draw_message_bar(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(CLEAR_LINE_RIGHT_OF_CURSOR.as_bytes());
        if let Some(msg) = &self.status_msg {
            if msg.time.elapsed() < self.config.message_dur {
                buf.extend_from_slice(truncate_chars(&msg.text, self.screen_cols).as_bytes());
            }
        }
    }

    fn set_status_message(&mut self, text: impl Into<String>) {
        self.status_msg = Some(StatusMessage { text: text.into(), time: Instant::now() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Editor {
        /// Build an editor without touching the real terminal, for tests that only exercise the
        /// row store, cursor, and rendering math.
        fn new_for_test(screen_rows: usize, screen_cols: usize) -> Self {
            Self {
                term_guard: TermGuard(None),
                config: Config::default(),
                rows: Vec::new(),
                cursor: CursorState::default(),
                screen_rows,
                screen_cols,
                dirty: 0,
                file_name: None,
                status_msg: None,
                syntax: None,
                quit_times: 3,
            }
        }
    }

    #[test]
    fn insert_and_newline_match_scenario_one() {
        let mut editor = Editor::new_for_test(24, 80);
        for b in b"abcd" {
            editor.insert_char(*b);
        }
        editor.insert_newline();
        for b in b"ef" {
            editor.insert_char(*b);
        }
        assert_eq!(editor.rows_to_string(), b"abcd\nef\n");
        assert_eq!(editor.cursor, CursorState { cx: 2, cy: 1, rowoff: 0, coloff: 0 });
    }

    #[test]
    fn save_writes_expected_bytes_and_message() {
        let mut editor = Editor::new_for_test(24, 80);
        for b in b"abcd" {
            editor.insert_char(*b);
        }
        editor.insert_newline();
        for b in b"ef" {
            editor.insert_char(*b);
        }
        let file = tempfile::NamedTempFile::new().unwrap();
        editor.file_name = Some(file.path().to_str().unwrap().to_string());
        editor.save().unwrap();
        assert_eq!(std::fs::read(file.path()).unwrap(), b"abcd\nef\n");
        assert_eq!(editor.dirty, 0);
        assert_eq!(editor.status_msg.as_ref().unwrap().text, "8 bytes written to disk");
    }

    #[test]
    fn delete_char_joins_rows_at_the_seam() {
        let mut editor = Editor::new_for_test(24, 80);
        editor.insert_row(0, b"abc".to_vec());
        editor.insert_row(1, b"def".to_vec());
        editor.cursor = CursorState { cx: 0, cy: 1, rowoff: 0, coloff: 0 };
        editor.delete_char();
        assert_eq!(editor.rows.len(), 1);
        assert_eq!(editor.rows[0].chars, b"abcdef");
        assert_eq!(editor.cursor.cy, 0);
        assert_eq!(editor.cursor.cx, 3);
    }

    #[test]
    fn move_cursor_wraps_at_row_boundaries() {
        let mut editor = Editor::new_for_test(24, 80);
        editor.insert_row(0, b"ab".to_vec());
        editor.insert_row(1, b"cd".to_vec());
        editor.cursor = CursorState { cx: 0, cy: 1, rowoff: 0, coloff: 0 };
        editor.move_cursor(ArrowKey::Left);
        assert_eq!(editor.cursor.cy, 0);
        assert_eq!(editor.cursor.cx, 2);
        editor.move_cursor(ArrowKey::Right);
        assert_eq!(editor.cursor.cy, 1);
        assert_eq!(editor.cursor.cx, 0);
    }

    #[test]
    fn page_down_matches_scenario_five() {
        let mut editor = Editor::new_for_test(10, 80);
        for _ in 0..100 {
            let at = editor.rows.len();
            editor.insert_row(at, b"x".to_vec());
        }
        editor.cursor = CursorState::default();
        editor.page(PageKey::Down);
        assert_eq!(editor.cursor.cy, 19);
        editor.scroll();
        assert_eq!(editor.cursor.rowoff, 10);
    }

    #[test]
    fn find_callback_matches_scenario_six() {
        let mut editor = Editor::new_for_test(24, 80);
        editor.insert_row(0, b"alpha".to_vec());
        editor.insert_row(1, b"beta".to_vec());
        editor.insert_row(2, b"gamma".to_vec());

        let mut state = FindState::default();
        editor.find_callback("a", Key::Byte(b'a'), &mut state).unwrap();
        assert_eq!(editor.cursor.cy, 0);
        editor.find_callback("a", Key::Arrow(ArrowKey::Down), &mut state).unwrap();
        assert_eq!(editor.cursor.cy, 1);
        editor.find_callback("a", Key::Arrow(ArrowKey::Down), &mut state).unwrap();
        assert_eq!(editor.cursor.cy, 2);
    }

    #[test]
    fn find_callback_restores_saved_highlight_before_next_match() {
        let mut editor = Editor::new_for_test(24, 80);
        editor.insert_row(0, b"cat dog".to_vec());
        let mut state = FindState::default();
        editor.find_callback("dog", Key::Byte(b'd'), &mut state).unwrap();
        assert!(editor.rows[0].hl[4..7].iter().all(|h| *h == HlType::Match));
        editor.find_callback("dog", Key::Arrow(ArrowKey::Down), &mut state).unwrap();
        assert!(editor.rows[0].hl[4..7].iter().all(|h| *h == HlType::Match));
    }

    #[test]
    fn open_strips_trailing_cr_and_zeroes_dirty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"one\r\ntwo\n").unwrap();
        let mut editor = Editor::new_for_test(24, 80);
        editor.dirty = 7;
        editor.open(file.path().to_str().unwrap()).unwrap();
        assert_eq!(editor.rows.len(), 3);
        assert_eq!(editor.rows[0].chars, b"one");
        assert_eq!(editor.rows[1].chars, b"two");
        assert_eq!(editor.rows[2].chars, b"");
        assert_eq!(editor.dirty, 0);
    }

    #[test]
    fn read_key_decodes_arrow_escape_sequence() {
        let input = b"\x1b[A".to_vec();
        let key = read_key(&mut &input[..]).unwrap();
        assert_eq!(key, Key::Arrow(ArrowKey::Up));
    }

    #[test]
    fn read_key_decodes_delete_tilde_sequence() {
        let input = b"\x1b[3~".to_vec();
        let key = read_key(&mut &input[..]).unwrap();
        assert_eq!(key, Key::Delete);
    }

    #[test]
    fn read_key_falls_back_to_bare_escape_on_timeout() {
        let input: Vec<u8> = vec![ESCAPE];
        let key = read_key(&mut &input[..]).unwrap();
        assert_eq!(key, Key::Escape);
    }
}
