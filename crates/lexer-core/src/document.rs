//! In-memory host document implementing [`TextAccessor`].

use crate::accessor::{Encoding, TextAccessor};
use crate::fold::{FOLD_LEVEL_BASE, FoldRegion, fold_regions};
use crate::intervals::{StyleRun, style_runs};
use crate::line_index::LineIndex;
use crate::properties::PropertySet;
use std::ops::Range;

/// A byte buffer with per-byte styles and per-line states and fold levels.
///
/// `end_styled` tracks how far styling is known to be valid. Edits pull it
/// back to the start of the edited line so an incremental driver can resume
/// from there.
#[derive(Debug, Clone)]
pub struct Document {
    text: Vec<u8>,
    styles: Vec<u8>,
    lines: LineIndex,
    line_states: Vec<i32>,
    levels: Vec<i32>,
    properties: PropertySet,
    encoding: Encoding,
    end_styled: usize,
}

impl Document {
    /// Create a document holding `text`.
    pub fn new(text: impl AsRef<[u8]>) -> Self {
        let text = text.as_ref().to_vec();
        let lines = LineIndex::from_bytes(&text);
        let line_count = lines.line_count();
        Self {
            styles: vec![0; text.len()],
            text,
            lines,
            line_states: vec![0; line_count],
            levels: vec![FOLD_LEVEL_BASE; line_count],
            properties: PropertySet::new(),
            encoding: Encoding::SingleByte,
            end_styled: 0,
        }
    }

    /// Builder-style encoding selection.
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Builder-style property assignment.
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.set(key, value);
        self
    }

    /// Document bytes.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Bytes of `line` without its terminator.
    pub fn line_text(&self, line: usize) -> &[u8] {
        let start = self.lines.line_start(line);
        let end = self.lines.line_end(line, &self.text);
        &self.text[start..end.max(start)]
    }

    /// Per-byte styles.
    pub fn styles(&self) -> &[u8] {
        &self.styles
    }

    /// Per-line states.
    pub fn line_states(&self) -> &[i32] {
        &self.line_states
    }

    /// Per-line fold levels.
    pub fn levels(&self) -> &[i32] {
        &self.levels
    }

    /// The line index.
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Lexer options.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Mutable lexer options.
    pub fn properties_mut(&mut self) -> &mut PropertySet {
        &mut self.properties
    }

    /// Set a lexer option.
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties.set(key, value);
    }

    /// Change the decoding strategy.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.encoding = encoding;
    }

    /// Position up to which styles are valid.
    pub fn end_styled(&self) -> usize {
        self.end_styled
    }

    /// Record that styles are valid up to `pos`.
    pub fn set_end_styled(&mut self, pos: usize) {
        self.end_styled = pos.min(self.text.len());
    }

    /// Merged runs of equal style.
    pub fn style_runs(&self) -> Vec<StyleRun> {
        style_runs(&self.styles)
    }

    /// Foldable regions derived from the stored fold levels.
    pub fn fold_regions(&self) -> Vec<FoldRegion> {
        fold_regions(&self.levels)
    }

    /// Insert `bytes` at `pos` (clamped to the document length).
    pub fn insert(&mut self, pos: usize, bytes: &[u8]) {
        let pos = pos.min(self.text.len());
        let line = self.lines.line_of(pos);
        let old_lines = self.lines.line_count();

        self.text.splice(pos..pos, bytes.iter().copied());
        self.styles.splice(pos..pos, std::iter::repeat_n(0, bytes.len()));
        self.lines = LineIndex::from_bytes(&self.text);

        let added = self.lines.line_count().saturating_sub(old_lines);
        let level = self.levels.get(line).copied().unwrap_or(FOLD_LEVEL_BASE);
        let at = (line + 1).min(self.line_states.len());
        self.line_states
            .splice(at..at, std::iter::repeat_n(0, added));
        self.levels.splice(at..at, std::iter::repeat_n(level, added));

        self.invalidate_from(line);
        tracing::trace!(pos, len = bytes.len(), added_lines = added, "document insert");
    }

    /// Delete `range` (clamped to the document length).
    pub fn delete(&mut self, range: Range<usize>) {
        let end = range.end.min(self.text.len());
        let start = range.start.min(end);
        if start == end {
            return;
        }
        let line = self.lines.line_of(start);
        let old_lines = self.lines.line_count();

        self.text.drain(start..end);
        self.styles.drain(start..end);
        self.lines = LineIndex::from_bytes(&self.text);

        let removed = old_lines.saturating_sub(self.lines.line_count());
        let from = (line + 1).min(self.line_states.len());
        let to = (from + removed).min(self.line_states.len());
        self.line_states.drain(from..to);
        self.levels.drain(from..to);

        self.invalidate_from(line);
        tracing::trace!(start, end, removed_lines = removed, "document delete");
    }

    /// Replace the whole content, discarding all styling.
    pub fn set_text(&mut self, text: impl AsRef<[u8]>) {
        let fresh = Document::new(text);
        self.text = fresh.text;
        self.styles = fresh.styles;
        self.lines = fresh.lines;
        self.line_states = fresh.line_states;
        self.levels = fresh.levels;
        self.end_styled = 0;
    }

    fn invalidate_from(&mut self, line: usize) {
        let line_start = self.lines.line_start(line);
        if self.end_styled > line_start {
            tracing::trace!(from = self.end_styled, to = line_start, "end_styled pulled back");
            self.end_styled = line_start;
        }
    }
}

impl TextAccessor for Document {
    fn len(&self) -> usize {
        self.text.len()
    }

    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.text.get(pos).copied()
    }

    fn style_at(&self, pos: usize) -> u8 {
        self.styles.get(pos).copied().unwrap_or(0)
    }

    fn set_styles(&mut self, range: Range<usize>, style: u8) {
        let end = range.end.min(self.styles.len());
        let start = range.start.min(end);
        self.styles[start..end].fill(style);
    }

    fn line_of(&self, pos: usize) -> usize {
        self.lines.line_of(pos)
    }

    fn line_start(&self, line: usize) -> usize {
        self.lines.line_start(line)
    }

    fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    fn line_state(&self, line: usize) -> i32 {
        self.line_states.get(line).copied().unwrap_or(0)
    }

    fn set_line_state(&mut self, line: usize, state: i32) {
        if let Some(slot) = self.line_states.get_mut(line) {
            *slot = state;
        }
    }

    fn level(&self, line: usize) -> i32 {
        self.levels.get(line).copied().unwrap_or(FOLD_LEVEL_BASE)
    }

    fn set_level(&mut self, line: usize, level: i32) {
        if let Some(slot) = self.levels.get_mut(line) {
            *slot = level;
        }
    }

    fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key)
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_line_storage_tracks_line_count() {
        let mut doc = Document::new("a\nb\nc");
        assert_eq!(doc.line_count(), 3);
        doc.set_line_state(1, 5);
        doc.set_line_state(2, 9);
        doc.set_line_state(10, 1);

        doc.insert(1, b"\nx");
        assert_eq!(doc.line_count(), 4);
        assert_eq!(doc.line_states(), &[0, 0, 5, 9]);

        doc.delete(0..3);
        assert_eq!(doc.text(), b"\nb\nc");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.line_states(), &[0, 5, 9]);
    }

    #[test]
    fn test_edits_pull_back_end_styled() {
        let mut doc = Document::new("line one\nline two\nline three\n");
        doc.set_end_styled(doc.len());
        doc.insert(12, b"X");
        assert_eq!(doc.end_styled(), 9);
        doc.delete(2..3);
        assert_eq!(doc.end_styled(), 0);
    }

    #[test]
    fn test_set_styles_clamps() {
        let mut doc = Document::new("abc");
        doc.set_styles(1..10, 4);
        assert_eq!(doc.styles(), &[0, 4, 4]);
        assert_eq!(doc.style_at(99), 0);
    }

    #[test]
    fn test_line_text() {
        let doc = Document::new("one\r\ntwo\n");
        assert_eq!(doc.line_text(0), b"one");
        assert_eq!(doc.line_text(1), b"two");
        assert_eq!(doc.line_text(2), b"");
    }
}
