//! Lexer-side view of a [`TextAccessor`] with segment-based styling.

use crate::accessor::{Encoding, TextAccessor};
use crate::properties::parse_property_int;

/// Wraps a host accessor for the duration of one pass.
///
/// Styling is segment based: [`LexAccessor::colour_to`] styles everything from
/// the current segment start up to an end position and moves the segment
/// start there.
pub struct LexAccessor<'a> {
    doc: &'a mut dyn TextAccessor,
    start_seg: usize,
    len: usize,
    encoding: Encoding,
}

impl<'a> LexAccessor<'a> {
    /// Borrow `doc` for a pass.
    pub fn new(doc: &'a mut dyn TextAccessor) -> Self {
        let len = doc.len();
        let encoding = doc.encoding();
        Self {
            doc,
            start_seg: 0,
            len,
            encoding,
        }
    }

    /// Document length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for an empty document.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Decoding strategy for this pass.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Byte at `pos`, or 0 past the end.
    pub fn char_at(&self, pos: usize) -> u8 {
        self.doc.byte_at(pos).unwrap_or(0)
    }

    /// Byte at `pos`, or `default` past the end.
    pub fn safe_char_at(&self, pos: usize, default: u8) -> u8 {
        self.doc.byte_at(pos).unwrap_or(default)
    }

    /// Decode the character at `pos` as `(character, width)`.
    pub fn decode_at(&self, pos: usize) -> (u32, usize) {
        self.encoding.decode_at(|p| self.doc.byte_at(p), pos)
    }

    /// Returns `true` if `byte` is a DBCS lead byte in the current encoding.
    pub fn is_lead_byte(&self, byte: u8) -> bool {
        match self.encoding {
            Encoding::Dbcs(page) => page.is_lead_byte(byte),
            _ => false,
        }
    }

    /// Returns `true` if the bytes at `pos` equal `s`.
    pub fn match_at(&self, pos: usize, s: &str) -> bool {
        s.bytes()
            .enumerate()
            .all(|(i, b)| self.doc.byte_at(pos + i) == Some(b))
    }

    /// Bytes in `start..end`, clamped to the document.
    pub fn range_bytes(&self, start: usize, end: usize) -> Vec<u8> {
        let end = end.min(self.len);
        (start.min(end)..end)
            .map(|pos| self.char_at(pos))
            .collect()
    }

    /// Stored style at `pos`.
    pub fn style_at(&self, pos: usize) -> u8 {
        self.doc.style_at(pos)
    }

    /// Line containing `pos`.
    pub fn line_of(&self, pos: usize) -> usize {
        self.doc.line_of(pos)
    }

    /// First byte of `line`.
    pub fn line_start(&self, line: usize) -> usize {
        self.doc.line_start(line)
    }

    /// Position of the terminator of `line` (or its end when unterminated).
    pub fn line_end(&self, line: usize) -> usize {
        let start = self.doc.line_start(line);
        let mut end = self.doc.line_start(line + 1);
        if end > start && self.doc.byte_at(end - 1) == Some(b'\n') {
            end -= 1;
        }
        if end > start && self.doc.byte_at(end - 1) == Some(b'\r') {
            end -= 1;
        }
        end
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.doc.line_count()
    }

    /// Persisted state of `line`.
    pub fn line_state(&self, line: usize) -> i32 {
        self.doc.line_state(line)
    }

    /// Persist state for `line`.
    pub fn set_line_state(&mut self, line: usize, state: i32) {
        self.doc.set_line_state(line, state);
    }

    /// Fold level of `line`.
    pub fn level(&self, line: usize) -> i32 {
        self.doc.level(line)
    }

    /// Store a fold level, skipping the write when it is unchanged.
    pub fn set_level(&mut self, line: usize, level: i32) {
        if self.doc.level(line) != level {
            self.doc.set_level(line, level);
        }
    }

    /// Raw property value.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.doc.property(key)
    }

    /// Integer property with the host's default rules.
    pub fn property_int(&self, key: &str, default: i32) -> i32 {
        parse_property_int(self.doc.property(key), default)
    }

    /// Boolean view of an integer property (non-zero is `true`).
    pub fn property_flag(&self, key: &str, default: bool) -> bool {
        self.property_int(key, i32::from(default)) != 0
    }

    /// Begin a new styling segment at `pos`.
    pub fn start_segment(&mut self, pos: usize) {
        self.start_seg = pos;
    }

    /// Start of the current styling segment.
    pub fn start_seg(&self) -> usize {
        self.start_seg
    }

    /// Style `start_seg..end` with `style` and start the next segment at `end`.
    ///
    /// `end` is clamped to the document length; an empty segment is a no-op.
    pub fn colour_to(&mut self, end: usize, style: u8) {
        let end = end.min(self.len);
        if end > self.start_seg {
            self.doc.set_styles(self.start_seg..end, style);
            self.start_seg = end;
        }
    }

    /// Snap a requested range to whole lines.
    ///
    /// The start moves back to its line start (re-reading the initial style
    /// from the byte before it) and a non-empty range is extended to the next
    /// line start.
    pub fn snap_range(&self, start: usize, length: usize, init_style: u8) -> (usize, usize, u8) {
        let start = start.min(self.len);
        let mut end = start.saturating_add(length).min(self.len);
        let line_start = self.doc.line_start(self.doc.line_of(start));
        let init_style = if line_start == start {
            init_style
        } else if line_start > 0 {
            self.doc.style_at(line_start - 1)
        } else {
            0
        };
        if end > line_start {
            let end_line_start = self.doc.line_start(self.doc.line_of(end));
            if end_line_start != end {
                end = self.doc.line_start(self.doc.line_of(end) + 1);
            }
        }
        (line_start, end.max(line_start) - line_start, init_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_colour_to_segments() {
        let mut doc = Document::new("abcdef");
        let mut styler = LexAccessor::new(&mut doc);
        styler.start_segment(0);
        styler.colour_to(2, 1);
        styler.colour_to(2, 9);
        styler.colour_to(10, 3);
        assert_eq!(styler.start_seg(), 6);
        drop(styler);
        assert_eq!(doc.styles(), &[1, 1, 3, 3, 3, 3]);
    }

    #[test]
    fn test_snap_range_to_lines() {
        let mut doc = Document::new("one\ntwo\nthree");
        doc.set_styles(0..4, 7);
        let styler = LexAccessor::new(&mut doc);
        assert_eq!(styler.snap_range(5, 1, 0), (4, 4, 7));
        assert_eq!(styler.snap_range(4, 4, 2), (4, 4, 2));
        assert_eq!(styler.snap_range(9, 100, 0), (8, 5, 0));
        assert_eq!(styler.snap_range(2, 0, 5), (0, 4, 0));
    }

    #[test]
    fn test_property_int_defaults() {
        let mut doc = Document::new("").with_property("fold", "1").with_property("empty", "");
        let styler = LexAccessor::new(&mut doc);
        assert_eq!(styler.property_int("fold", 0), 1);
        assert_eq!(styler.property_int("empty", 4), 4);
        assert!(styler.property_flag("missing", true));
        assert!(!styler.property_flag("missing", false));
    }

    #[test]
    fn test_line_end_and_match() {
        let mut doc = Document::new("ab\r\ncd");
        let styler = LexAccessor::new(&mut doc);
        assert_eq!(styler.line_end(0), 2);
        assert_eq!(styler.line_end(1), 6);
        assert!(styler.match_at(4, "cd"));
        assert!(!styler.match_at(5, "dx"));
        assert_eq!(styler.safe_char_at(10, b' '), b' ');
        assert_eq!(styler.range_bytes(1, 99), b"b\r\ncd".to_vec());
    }
}
