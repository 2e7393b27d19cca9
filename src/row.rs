//! # Row Store
//!
//! A [`Row`] owns one logical line: its raw bytes (`chars`), the tab-expanded display form
//! (`render`), and a highlight class per render byte (`hl`). Rows never outlive the store that
//! owns them; mutating helpers always re-derive `render` and `hl` before returning.

use crate::ansi_escape::{set_color, RESET_FG, RESET_FMT, REVERSE_VIDEO};
use crate::syntax::{is_separator, Conf, HlType};

/// One logical line of text, plus its derived display form and syntax highlighting.
#[derive(Debug, Clone)]
pub struct Row {
    /// This row's current index in the row store.
    pub idx: usize,
    /// Raw source bytes. No trailing newline.
    pub chars: Vec<u8>,
    /// Tab-expanded display bytes. `render.len() == hl.len()` always holds.
    pub render: Vec<u8>,
    /// Highlight class per byte of `render`.
    pub hl: Vec<HlType>,
    /// Does this row end inside an unterminated multi-line comment?
    pub hl_open_comment: bool,
}

impl Row {
    /// Create a new row from raw bytes. `render`/`hl` are empty until [`Row::update`] is called.
    pub fn new(idx: usize, chars: Vec<u8>) -> Self {
        Self { idx, chars, render: Vec::new(), hl: Vec::new(), hl_open_comment: false }
    }

    /// Re-derive `render` from `chars`, expanding tabs to the next `tab_stop` boundary.
    fn render_chars(chars: &[u8], tab_stop: usize) -> Vec<u8> {
        let mut render = Vec::with_capacity(chars.len());
        for &c in chars {
            if c == b'\t' {
                render.push(b' ');
                while render.len() % tab_stop != 0 {
                    render.push(b' ');
                }
            } else {
                render.push(c);
            }
        }
        render
    }

    /// Re-derive `render` and re-run the highlighter for this row, given the predecessor row's
    /// `hl_open_comment` state (as the entry multi-line-comment state). Returns this row's own
    /// resulting `hl_open_comment`, for the caller to compare against the previous value and decide
    /// whether to cascade.
    pub fn update(&mut self, syntax: &Conf, prev_hl_open_comment: bool, tab_stop: usize) -> bool {
        self.render = Self::render_chars(&self.chars, tab_stop);
        self.hl = highlight(&self.render, syntax, prev_hl_open_comment);
        self.hl_open_comment = ends_in_open_comment(&self.render, syntax, prev_hl_open_comment);
        self.hl_open_comment
    }

    /// Convert a byte offset into `chars` to a render-space column, per the tab-expansion formula
    /// in the specification: one column per non-tab byte, and jump to the next `tab_stop` boundary
    /// for each tab.
    pub fn cx_to_rx(&self, cx: usize, tab_stop: usize) -> usize { cx_to_rx(&self.chars, cx, tab_stop) }

    /// Inverse of [`Row::cx_to_rx`]: the first `cx` whose running `rx` exceeds `rx`, or
    /// `chars.len()` if the render column is never exceeded.
    pub fn rx_to_cx(&self, rx: usize, tab_stop: usize) -> usize { rx_to_cx(&self.chars, rx, tab_stop) }

    /// Append the visible slice `render[coloff..coloff+screencols]` to `buf`, switching SGR colors
    /// as the highlight class changes and rendering control bytes in reverse video (`@`+byte for
    /// 0..26, `?` otherwise).
    pub fn draw(&self, coloff: usize, screencols: usize, buf: &mut Vec<u8>) {
        let start = coloff.min(self.render.len());
        let end = (coloff + screencols).min(self.render.len());
        let mut current_color: Option<u8> = None;
        for (&c, &hl) in self.render[start..end].iter().zip(&self.hl[start..end]) {
            if c.is_ascii_control() {
                let sym = if c <= 26 { b'@' + c } else { b'?' };
                buf.extend_from_slice(REVERSE_VIDEO.as_bytes());
                buf.push(sym);
                buf.extend_from_slice(RESET_FMT.as_bytes());
                if let Some(color) = current_color {
                    buf.extend_from_slice(set_color(color).as_bytes());
                }
            } else if hl == HlType::Normal {
                if current_color.is_some() {
                    buf.extend_from_slice(RESET_FG.as_bytes());
                    current_color = None;
                }
                buf.push(c);
            } else {
                let color = hl.color();
                if current_color != Some(color) {
                    buf.extend_from_slice(set_color(color).as_bytes());
                    current_color = Some(color);
                }
                buf.push(c);
            }
        }
        buf.extend_from_slice(RESET_FG.as_bytes());
    }
}

/// Free-standing form of [`Row::cx_to_rx`], usable without a constructed `Row`.
pub fn cx_to_rx(chars: &[u8], cx: usize, tab_stop: usize) -> usize {
    let mut rx = 0;
    for &c in &chars[..cx.min(chars.len())] {
        if c == b'\t' {
            rx += (tab_stop - 1) - (rx % tab_stop);
        }
        rx += 1;
    }
    rx
}

/// Free-standing form of [`Row::rx_to_cx`].
pub fn rx_to_cx(chars: &[u8], rx: usize, tab_stop: usize) -> usize {
    let mut cur_rx = 0;
    for (cx, &c) in chars.iter().enumerate() {
        if c == b'\t' {
            cur_rx += (tab_stop - 1) - (cur_rx % tab_stop);
        }
        cur_rx += 1;
        if cur_rx > rx {
            return cx;
        }
    }
    chars.len()
}

/// Does `render` end inside an unterminated multi-line comment, given the entry state? This
/// mirrors the final state of the [`highlight`] pass without re-allocating the highlight array, so
/// it can be used by callers that only need the boolean (none currently; kept for symmetry with
/// [`highlight`] and tested directly).
fn ends_in_open_comment(render: &[u8], syntax: &Conf, prev_hl_open_comment: bool) -> bool {
    highlight_with_state(render, syntax, prev_hl_open_comment).1
}

/// Run the classification pass described in the specification, returning the highlight class of
/// every render byte.
pub fn highlight(render: &[u8], syntax: &Conf, prev_hl_open_comment: bool) -> Vec<HlType> {
    highlight_with_state(render, syntax, prev_hl_open_comment).0
}

/// Shared implementation behind [`highlight`] and [`ends_in_open_comment`]: classify every byte of
/// `render` and report whether the row ends inside an open multi-line comment.
fn highlight_with_state(render: &[u8], syntax: &Conf, prev_hl_open_comment: bool) -> (Vec<HlType>, bool) {
    let mut hl = vec![HlType::Normal; render.len()];
    let mut in_comment = prev_hl_open_comment;
    let mut in_string: Option<u8> = None;
    let mut prev_sep = true;
    let mut escaped = false;

    let sl_comment = syntax.singleline_comment_start.as_bytes();
    let ml_start = syntax.multiline_comment_start.as_bytes();
    let ml_end = syntax.multiline_comment_end.as_bytes();

    let mut i = 0;
    while i < render.len() {
        let c = render[i];

        // 1. Single-line comment.
        if in_string.is_none()
            && !in_comment
            && !sl_comment.is_empty()
            && render[i..].starts_with(sl_comment)
        {
            for h in &mut hl[i..] {
                *h = HlType::Comment;
            }
            break;
        }

        // 2. Multi-line comment.
        if in_string.is_none() && !ml_start.is_empty() {
            if in_comment {
                hl[i] = HlType::MlComment;
                if render[i..].starts_with(ml_end) {
                    for h in &mut hl[i..(i + ml_end.len()).min(render.len())] {
                        *h = HlType::MlComment;
                    }
                    i += ml_end.len();
                    in_comment = false;
                    prev_sep = true;
                    continue;
                }
                i += 1;
                prev_sep = false;
                continue;
            } else if render[i..].starts_with(ml_start) {
                for h in &mut hl[i..(i + ml_start.len()).min(render.len())] {
                    *h = HlType::MlComment;
                }
                i += ml_start.len();
                in_comment = true;
                continue;
            }
        }

        // 3. Strings.
        if syntax.flags.strings {
            if let Some(opener) = in_string {
                hl[i] = HlType::String;
                if escaped {
                    escaped = false;
                } else if c == b'\\' {
                    escaped = true;
                } else if c == opener {
                    in_string = None;
                    prev_sep = true;
                }
                i += 1;
                continue;
            } else if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = HlType::String;
                i += 1;
                continue;
            }
        }

        // 4. Numbers.
        if syntax.flags.numbers {
            let is_num = (c.is_ascii_digit() && (prev_sep || (i > 0 && hl[i - 1] == HlType::Number)))
                || (c == b'.' && i > 0 && hl[i - 1] == HlType::Number);
            if is_num {
                hl[i] = HlType::Number;
                prev_sep = false;
                i += 1;
                continue;
            }
        }

        // 5. Keywords (only at a separator boundary).
        if prev_sep {
            if let Some(kw) = syntax.keywords.iter().find(|kw| {
                render[i..].starts_with(kw.word.as_bytes())
                    && render
                        .get(i + kw.word.len())
                        .map_or(true, |&b| is_separator(b))
            }) {
                let class = if kw.secondary { HlType::Keyword2 } else { HlType::Keyword1 };
                let end = (i + kw.word.len()).min(render.len());
                for h in &mut hl[i..end] {
                    *h = class;
                }
                i = end;
                prev_sep = false;
                continue;
            }
        }

        // 6. Default.
        prev_sep = is_separator(c);
        i += 1;
    }

    (hl, in_comment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::HLDB;

    fn c_conf() -> &'static Conf { &HLDB[0] }

    #[test]
    fn tab_expansion_matches_stop_boundaries() {
        let rendered = Row::render_chars(b"int\tx = 42;", 8);
        assert_eq!(rendered, b"int     x = 42;");
    }

    #[test]
    fn cx_rx_are_mutual_inverses() {
        let chars = b"abc\tdef";
        for cx in 0..=chars.len() {
            let rx = cx_to_rx(chars, cx, 8);
            assert_eq!(rx_to_cx(chars, rx, 8), cx);
        }
    }

    #[test]
    fn keyword_and_number_highlighting() {
        let mut row = Row::new(0, b"int\tx = 42;".to_vec());
        row.update(c_conf(), false, 8);
        assert_eq!(row.render, b"int     x = 42;");
        assert_eq!(row.hl[0], HlType::Keyword2);
        assert_eq!(row.hl[1], HlType::Keyword2);
        assert_eq!(row.hl[2], HlType::Keyword2);
        assert_eq!(row.hl[12], HlType::Number);
        assert_eq!(row.hl[13], HlType::Number);
    }

    #[test]
    fn single_line_comment_closes_without_crossing_rows() {
        let mut row0 = Row::new(0, b"/* a */".to_vec());
        let end0 = row0.update(c_conf(), false, 8);
        assert!(!end0);
        let mut row1 = Row::new(1, b"code".to_vec());
        let end1 = row1.update(c_conf(), end0, 8);
        assert!(!end1);
        assert!(row1.hl.iter().all(|h| *h == HlType::Normal));
        let mut row2 = Row::new(2, b"/* still */".to_vec());
        let end2 = row2.update(c_conf(), end1, 8);
        assert!(!end2);
    }

    #[test]
    fn multiline_comment_cascades_open_state() {
        let mut row0 = Row::new(0, b"/* a".to_vec());
        let end0 = row0.update(c_conf(), false, 8);
        assert!(end0);
        let mut row1 = Row::new(1, b"b".to_vec());
        let end1 = row1.update(c_conf(), end0, 8);
        assert!(end1);
        assert!(row1.hl.iter().all(|h| *h == HlType::MlComment));
        let mut row2 = Row::new(2, b"*/".to_vec());
        let end2 = row2.update(c_conf(), end1, 8);
        assert!(!end2);
        assert!(row2.hl.iter().all(|h| *h == HlType::MlComment));
    }

    #[test]
    fn highlight_is_idempotent() {
        let mut row = Row::new(0, b"if (x == \"foo\") { 42 }".to_vec());
        row.update(c_conf(), false, 8);
        let first = row.hl.clone();
        row.update(c_conf(), false, 8);
        assert_eq!(first, row.hl);
    }

    #[test]
    fn draw_escapes_control_bytes_and_switches_colors() {
        let mut row = Row::new(0, vec![1, b'x']);
        row.update(&Conf::default(), false, 8);
        let mut buf = Vec::new();
        row.draw(0, 80, &mut buf);
        let rendered = String::from_utf8(buf).unwrap();
        assert!(rendered.contains("\x1b[7m"));
        assert!(rendered.contains('A'));
        assert!(rendered.ends_with("\x1b[39m"));
    }
}
