//! The shared streaming cursor every `StyleContext`-based lexer is built on.
//!
//! A [`StyleContext`] walks a line-aligned range one character at a time with
//! one character of lookahead. Styling is only written when the lexer commits
//! the current token with [`StyleContext::set_state`],
//! [`StyleContext::forward_set_state`] or [`StyleContext::complete`].

use crate::char_class::make_lower_case;
use crate::lex_accessor::LexAccessor;

/// Cursor over a range of the document.
pub struct StyleContext<'a> {
    /// Underlying accessor, for line states, levels, properties and raw bytes.
    pub styler: LexAccessor<'a>,
    end_pos: usize,
    length_document: usize,
    line_doc_end: usize,
    line_start_next: usize,
    width: usize,
    width_next: usize,
    /// Byte offset of `ch`.
    pub current_pos: usize,
    /// Line containing `current_pos`.
    pub current_line: usize,
    /// `true` while `ch` is the first character of a line.
    pub at_line_start: bool,
    /// `true` while `ch` is the last character of a line (its terminator).
    pub at_line_end: bool,
    /// Style that the open token will receive when committed.
    pub state: u8,
    /// Previous character.
    pub ch_prev: u32,
    /// Current character.
    pub ch: u32,
    /// Next character.
    pub ch_next: u32,
}

impl<'a> StyleContext<'a> {
    /// Start a pass over `start..start + length`.
    ///
    /// The range is snapped to whole lines first; see
    /// [`LexAccessor::snap_range`]. At the true end of the document the end
    /// is pushed one past the last byte so the final character is still
    /// visited. `ch_prev` starts as the terminator of the previous line, or 0
    /// at the start of the document.
    pub fn new(start: usize, length: usize, init_style: u8, mut styler: LexAccessor<'a>) -> Self {
        let (start, length, init_style) = styler.snap_range(start, length, init_style);
        styler.start_segment(start);
        let length_document = styler.len();
        let mut end_pos = start + length;
        if end_pos == length_document {
            end_pos += 1;
        }
        let current_line = styler.line_of(start);
        let line_start_next = styler.line_start(current_line + 1);
        let line_doc_end = styler.line_of(length_document);
        let at_line_start = styler.line_start(current_line) == start;
        let ch_prev = if start > 0 { u32::from(styler.safe_char_at(start - 1, 0)) } else { 0 };

        let mut sc = Self {
            styler,
            end_pos,
            length_document,
            line_doc_end,
            line_start_next,
            width: 0,
            width_next: 1,
            current_pos: start,
            current_line,
            at_line_start,
            at_line_end: false,
            state: init_style,
            ch_prev,
            ch: 0,
            ch_next: 0,
        };
        sc.get_next_char();
        sc.ch = sc.ch_next;
        sc.width = sc.width_next;
        sc.get_next_char();
        sc
    }

    fn get_next_char(&mut self) {
        let pos = self.current_pos + self.width;
        let (ch, width) = self.styler.decode_at(pos);
        self.ch_next = ch;
        self.width_next = width;
        let last_byte = (self.current_pos + self.width).saturating_sub(1);
        self.at_line_end = if self.current_line < self.line_doc_end {
            last_byte + 1 >= self.line_start_next
        } else {
            last_byte >= self.line_start_next
        };
    }

    /// `true` while the cursor is inside the range.
    pub fn more(&self) -> bool {
        self.current_pos < self.end_pos
    }

    /// Advance one character.
    ///
    /// Past the end of the range the cursor stays put and reports spaces with
    /// `at_line_end` set.
    pub fn forward(&mut self) {
        if self.current_pos < self.end_pos {
            self.at_line_start = self.at_line_end;
            if self.at_line_start {
                self.current_line += 1;
                self.line_start_next = self.styler.line_start(self.current_line + 1);
            }
            self.ch_prev = self.ch;
            self.current_pos += self.width;
            self.ch = self.ch_next;
            self.width = self.width_next;
            self.get_next_char();
        } else {
            self.at_line_start = false;
            self.ch_prev = u32::from(b' ');
            self.ch = u32::from(b' ');
            self.ch_next = u32::from(b' ');
            self.at_line_end = true;
        }
    }

    /// Advance `n` characters.
    pub fn forward_n(&mut self, n: usize) {
        for _ in 0..n {
            self.forward();
        }
    }

    /// Relabel the open token without committing it.
    pub fn change_state(&mut self, state: u8) {
        self.state = state;
    }

    /// Commit the open token (up to, not including, `ch`) and switch to `state`.
    pub fn set_state(&mut self, state: u8) {
        let end = self.commit_end();
        self.styler.colour_to(end, self.state);
        self.state = state;
    }

    /// Advance once, then [`set_state`](Self::set_state).
    pub fn forward_set_state(&mut self, state: u8) {
        self.forward();
        self.set_state(state);
    }

    /// Commit the trailing open token. Consumes the cursor.
    pub fn complete(mut self) {
        let end = self.commit_end();
        self.styler.colour_to(end, self.state);
    }

    fn commit_end(&self) -> usize {
        self.current_pos.min(self.length_document)
    }

    /// Bytes in the open token.
    pub fn length_current(&self) -> usize {
        self.current_pos.saturating_sub(self.styler.start_seg())
    }

    /// Raw byte `n` positions ahead of `current_pos` (0 past the end).
    pub fn get_relative(&self, n: usize) -> u32 {
        u32::from(self.styler.safe_char_at(self.current_pos + n, 0))
    }

    /// `ch == c`.
    pub fn match_char(&self, c: u8) -> bool {
        self.ch == u32::from(c)
    }

    /// `ch == c0 && ch_next == c1`.
    pub fn match_pair(&self, c0: u8, c1: u8) -> bool {
        self.ch == u32::from(c0) && self.ch_next == u32::from(c1)
    }

    /// Lookahead comparison against `s` starting at `ch`.
    pub fn match_str(&self, s: &str) -> bool {
        let bytes = s.as_bytes();
        let Some(&first) = bytes.first() else {
            return true;
        };
        if self.ch != u32::from(first) {
            return false;
        }
        let Some(&second) = bytes.get(1) else {
            return true;
        };
        if self.ch_next != u32::from(second) {
            return false;
        }
        bytes
            .iter()
            .enumerate()
            .skip(2)
            .all(|(n, &b)| self.styler.safe_char_at(self.current_pos + n, 0) == b)
    }

    /// Case-insensitive [`match_str`](Self::match_str); `s` must be lower case.
    pub fn match_ignore_case(&self, s: &str) -> bool {
        let bytes = s.as_bytes();
        if bytes.is_empty() {
            return true;
        }
        if make_lower_case(self.ch) != u32::from(bytes[0]) {
            return false;
        }
        if bytes.len() > 1 && make_lower_case(self.ch_next) != u32::from(bytes[1]) {
            return false;
        }
        bytes.iter().enumerate().skip(2).all(|(n, &b)| {
            make_lower_case(u32::from(self.styler.safe_char_at(self.current_pos + n, 0)))
                == u32::from(b)
        })
    }

    /// `true` when `ch` is the first byte of the current line's terminator.
    pub fn match_line_end(&self) -> bool {
        self.current_pos == self.styler.line_end(self.current_line)
    }

    /// Text of the open token, truncated to `max_len` bytes.
    pub fn get_current(&self, max_len: usize) -> String {
        let start = self.styler.start_seg();
        let end = self.current_pos.min(start + max_len);
        String::from_utf8_lossy(&self.styler.range_bytes(start, end)).into_owned()
    }

    /// Lower-cased [`get_current`](Self::get_current).
    pub fn get_current_lowered(&self, max_len: usize) -> String {
        let mut s = self.get_current(max_len);
        s.make_ascii_lowercase();
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{CodePage, Encoding, TextAccessor};
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn collect(doc: &mut Document, start: usize, len: usize) -> Vec<(usize, u32, bool, bool)> {
        let mut sc = StyleContext::new(start, len, 0, LexAccessor::new(doc));
        let mut seen = Vec::new();
        while sc.more() {
            seen.push((sc.current_pos, sc.ch, sc.at_line_start, sc.at_line_end));
            sc.forward();
        }
        seen
    }

    #[test]
    fn test_line_flags() {
        let mut doc = Document::new("ab\ncd");
        let seen = collect(&mut doc, 0, 5);
        assert_eq!(
            seen,
            vec![
                (0, 'a' as u32, true, false),
                (1, 'b' as u32, false, false),
                (2, '\n' as u32, false, true),
                (3, 'c' as u32, true, false),
                (4, 'd' as u32, false, false),
                (5, 0, false, true),
            ]
        );
    }

    #[test]
    fn test_crlf_line_end_on_lf_only() {
        let mut doc = Document::new("a\r\nb");
        let seen = collect(&mut doc, 0, 4);
        assert!(!seen[1].3, "CR is not the line end");
        assert!(seen[2].3, "LF is the line end");
        assert!(seen[3].2);
    }

    #[test]
    fn test_utf8_characters_are_whole() {
        let mut doc = Document::new("é€x").with_encoding(Encoding::Utf8);
        let seen: Vec<_> = collect(&mut doc, 0, 6).into_iter().map(|s| (s.0, s.1)).collect();
        assert_eq!(seen, vec![(0, 0xE9), (2, 0x20AC), (5, 'x' as u32), (6, 0)]);
    }

    #[test]
    fn test_dbcs_pairs() {
        let mut doc = Document::new([0x82, 0xA0, b'a']).with_encoding(Encoding::Dbcs(CodePage::ShiftJis));
        let seen: Vec<_> = collect(&mut doc, 0, 3).into_iter().map(|s| (s.0, s.1)).collect();
        assert_eq!(seen, vec![(0, 0x82A0), (2, 'a' as u32), (3, 0)]);
    }

    #[test]
    fn test_set_state_commits_previous_style() {
        let mut doc = Document::new("ab cd");
        {
            let mut sc = StyleContext::new(0, 5, 1, LexAccessor::new(&mut doc));
            sc.forward_n(2);
            sc.set_state(0);
            sc.forward();
            sc.set_state(2);
            assert_eq!(sc.length_current(), 0);
            sc.forward();
            assert_eq!(sc.length_current(), 1);
            assert_eq!(sc.get_current(10), "c");
            sc.forward();
            sc.complete();
        }
        assert_eq!(doc.styles(), &[1, 1, 0, 2, 2]);
    }

    #[test]
    fn test_change_state_relabels_open_token() {
        let mut doc = Document::new("word");
        {
            let mut sc = StyleContext::new(0, 4, 3, LexAccessor::new(&mut doc));
            sc.forward_n(4);
            assert_eq!(sc.get_current_lowered(100), "word");
            sc.change_state(7);
            sc.set_state(0);
            sc.complete();
        }
        assert_eq!(doc.styles(), &[7, 7, 7, 7]);
    }

    #[test]
    fn test_get_current_truncates() {
        let mut doc = Document::new("ABCDEFGH");
        let mut sc = StyleContext::new(0, 8, 0, LexAccessor::new(&mut doc));
        sc.forward_n(8);
        assert_eq!(sc.get_current(3), "ABC");
        assert_eq!(sc.get_current_lowered(100), "abcdefgh");
    }

    #[test]
    fn test_matching() {
        let mut doc = Document::new("/*Ab*/\nx");
        let mut sc = StyleContext::new(0, 8, 0, LexAccessor::new(&mut doc));
        assert!(sc.match_char(b'/'));
        assert!(sc.match_pair(b'/', b'*'));
        assert!(sc.match_str("/*Ab"));
        assert!(!sc.match_str("/*ab"));
        assert!(sc.match_ignore_case("/*ab"));
        assert_eq!(sc.get_relative(2), 'A' as u32);
        sc.forward_n(6);
        assert!(sc.match_line_end());
        assert!(sc.at_line_end);
    }

    #[test]
    fn test_mid_line_start_is_snapped() {
        let mut doc = Document::new("abc\ndef");
        doc.set_styles(0..4, 5);
        let sc = StyleContext::new(5, 1, 0, LexAccessor::new(&mut doc));
        assert_eq!(sc.current_pos, 4);
        assert_eq!(sc.current_line, 1);
        assert!(sc.at_line_start);
        assert_eq!(sc.state, 5);
    }

    #[test]
    fn test_previous_terminator_is_ch_prev() {
        let mut doc = Document::new("ab\r\ncd");
        let sc = StyleContext::new(0, 6, 0, LexAccessor::new(&mut doc));
        assert_eq!(sc.ch_prev, 0);
        drop(sc);
        let sc = StyleContext::new(4, 2, 0, LexAccessor::new(&mut doc));
        assert_eq!(sc.current_pos, 4);
        assert_eq!(sc.ch_prev, '\n' as u32);
        drop(sc);
        let mut doc = Document::new("ab\rcd");
        let sc = StyleContext::new(3, 2, 0, LexAccessor::new(&mut doc));
        assert_eq!(sc.ch_prev, '\r' as u32);
    }

    #[test]
    fn test_past_end_reports_spaces() {
        let mut doc = Document::new("a");
        let mut sc = StyleContext::new(0, 1, 0, LexAccessor::new(&mut doc));
        sc.forward();
        sc.forward();
        assert!(!sc.more());
        sc.forward();
        assert_eq!(sc.ch, ' ' as u32);
        assert!(sc.at_line_end);
    }
}
