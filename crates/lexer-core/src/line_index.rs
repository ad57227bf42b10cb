//! Byte-offset line index.
//!
//! Recognises `\n`, `\r\n` and lone `\r` terminators. A terminator belongs to
//! the line it ends, so a document ending in a newline has an empty last line.

use memchr::memchr2_iter;

/// Line start offsets for a byte buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    starts: Vec<usize>,
    len: usize,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndex {
    /// Index for an empty document (one empty line).
    pub fn new() -> Self {
        Self {
            starts: vec![0],
            len: 0,
        }
    }

    /// Build the index for `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut starts = vec![0];
        for pos in memchr2_iter(b'\n', b'\r', bytes) {
            if bytes[pos] == b'\r' && bytes.get(pos + 1) == Some(&b'\n') {
                continue;
            }
            starts.push(pos + 1);
        }
        Self {
            starts,
            len: bytes.len(),
        }
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// Total indexed length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the indexed buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// First byte of `line`; the buffer length for lines past the end.
    pub fn line_start(&self, line: usize) -> usize {
        self.starts.get(line).copied().unwrap_or(self.len)
    }

    /// Line containing `pos`; positions past the end map to the last line.
    pub fn line_of(&self, pos: usize) -> usize {
        self.starts.partition_point(|&start| start <= pos).saturating_sub(1)
    }

    /// End of the content of `line`, excluding its terminator.
    pub fn line_end(&self, line: usize, bytes: &[u8]) -> usize {
        let mut end = self.line_start(line + 1);
        let start = self.line_start(line);
        if end > start && bytes.get(end - 1) == Some(&b'\n') {
            end -= 1;
        }
        if end > start && bytes.get(end - 1) == Some(&b'\r') {
            end -= 1;
        }
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_line_endings() {
        let text = b"a\nbb\r\nccc\rd";
        let index = LineIndex::from_bytes(text);
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_start(1), 2);
        assert_eq!(index.line_start(2), 6);
        assert_eq!(index.line_start(3), 10);
        assert_eq!(index.line_start(9), text.len());
        assert_eq!(index.line_end(1, text), 4);
        assert_eq!(index.line_end(3, text), 11);
    }

    #[test]
    fn test_line_of() {
        let index = LineIndex::from_bytes(b"ab\ncd\n");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(2), 0);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(6), 2);
        assert_eq!(index.line_of(100), 2);
    }

    #[test]
    fn test_empty() {
        let index = LineIndex::from_bytes(b"");
        assert_eq!(index.line_count(), 1);
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_start(1), 0);
    }
}
