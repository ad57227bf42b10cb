//! Host storage capability consumed by lexers and folders.
//!
//! The engine never owns document storage. Every colourise/fold pass reads
//! bytes and writes styles, line states and fold levels through a
//! [`TextAccessor`] supplied by the host.

use std::ops::Range;

/// Double-byte code pages recognised by the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodePage {
    /// Shift-JIS (cp932).
    ShiftJis,
    /// Simplified Chinese GBK (cp936).
    Gbk,
    /// Korean Unified Hangul (cp949).
    Korean,
    /// Traditional Chinese Big5 (cp950).
    Big5,
    /// Korean Johab (cp1361).
    Johab,
}

impl CodePage {
    /// Returns `true` when `byte` starts a two-byte character in this code page.
    pub fn is_lead_byte(self, byte: u8) -> bool {
        match self {
            CodePage::ShiftJis => matches!(byte, 0x81..=0x9F | 0xE0..=0xFC),
            CodePage::Gbk | CodePage::Korean | CodePage::Big5 => matches!(byte, 0x81..=0xFE),
            CodePage::Johab => matches!(byte, 0x84..=0xD3 | 0xD8..=0xDE | 0xE0..=0xF9),
        }
    }

    /// Windows code page number.
    pub fn number(self) -> u32 {
        match self {
            CodePage::ShiftJis => 932,
            CodePage::Gbk => 936,
            CodePage::Korean => 949,
            CodePage::Big5 => 950,
            CodePage::Johab => 1361,
        }
    }

    /// Look up a code page by its Windows number.
    pub fn from_number(number: u32) -> Option<Self> {
        match number {
            932 => Some(CodePage::ShiftJis),
            936 => Some(CodePage::Gbk),
            949 => Some(CodePage::Korean),
            950 => Some(CodePage::Big5),
            1361 => Some(CodePage::Johab),
            _ => None,
        }
    }
}

/// Byte-to-character decoding strategy selected once per pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Every byte is one character.
    #[default]
    SingleByte,
    /// UTF-8; malformed sequences decode as single bytes.
    Utf8,
    /// A double-byte character set with lead bytes.
    Dbcs(CodePage),
}

impl Encoding {
    /// Decode the character starting at `pos`, returning `(character, width_in_bytes)`.
    ///
    /// Positions past the end of `bytes` decode as `(0, 1)`.
    pub fn decode_at(self, bytes: impl Fn(usize) -> Option<u8>, pos: usize) -> (u32, usize) {
        let Some(lead) = bytes(pos) else {
            return (0, 1);
        };
        match self {
            Encoding::SingleByte => (u32::from(lead), 1),
            Encoding::Dbcs(page) => {
                if page.is_lead_byte(lead)
                    && let Some(trail) = bytes(pos + 1)
                {
                    return ((u32::from(lead) << 8) | u32::from(trail), 2);
                }
                (u32::from(lead), 1)
            }
            Encoding::Utf8 => decode_utf8(&bytes, pos, lead),
        }
    }
}

fn decode_utf8(bytes: &impl Fn(usize) -> Option<u8>, pos: usize, lead: u8) -> (u32, usize) {
    let (width, initial, min) = match lead {
        0x00..=0x7F => return (u32::from(lead), 1),
        0xC2..=0xDF => (2, u32::from(lead & 0x1F), 0x80),
        0xE0..=0xEF => (3, u32::from(lead & 0x0F), 0x800),
        0xF0..=0xF4 => (4, u32::from(lead & 0x07), 0x1_0000),
        _ => return (u32::from(lead), 1),
    };
    let mut value = initial;
    for offset in 1..width {
        match bytes(pos + offset) {
            Some(b) if b & 0xC0 == 0x80 => value = (value << 6) | u32::from(b & 0x3F),
            _ => return (u32::from(lead), 1),
        }
    }
    if value < min || value > 0x10_FFFF || (0xD800..=0xDFFF).contains(&value) {
        return (u32::from(lead), 1);
    }
    (value, width)
}

/// Read/write access to a host document.
///
/// Lines are addressed by zero-based index. `line_start(line)` for any
/// `line >= line_count()` returns `len()`. Writes to lines past the end are
/// ignored by well-behaved hosts.
pub trait TextAccessor {
    /// Total length in bytes.
    fn len(&self) -> usize;

    /// Returns `true` for an empty document.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The byte at `pos`, if any.
    fn byte_at(&self, pos: usize) -> Option<u8>;

    /// Stored style at `pos` (0 when out of range).
    fn style_at(&self, pos: usize) -> u8;

    /// Assign `style` to every position in `range`.
    fn set_styles(&mut self, range: Range<usize>, style: u8);

    /// Line containing `pos`.
    fn line_of(&self, pos: usize) -> usize;

    /// First byte of `line`.
    fn line_start(&self, line: usize) -> usize;

    /// Number of lines (a trailing line terminator starts an empty last line).
    fn line_count(&self) -> usize;

    /// Persisted lexer state for `line`.
    fn line_state(&self, line: usize) -> i32;

    /// Persist lexer state for `line`.
    fn set_line_state(&mut self, line: usize, state: i32);

    /// Fold level for `line`.
    fn level(&self, line: usize) -> i32;

    /// Store the fold level for `line`.
    fn set_level(&mut self, line: usize, level: i32);

    /// Raw property value, if set.
    fn property(&self, key: &str) -> Option<&str>;

    /// Encoding used to decode characters.
    fn encoding(&self) -> Encoding;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], enc: Encoding, pos: usize) -> (u32, usize) {
        enc.decode_at(|p| bytes.get(p).copied(), pos)
    }

    #[test]
    fn test_utf8_decoding() {
        let text = "aé€😀".as_bytes();
        assert_eq!(decode(text, Encoding::Utf8, 0), ('a' as u32, 1));
        assert_eq!(decode(text, Encoding::Utf8, 1), ('é' as u32, 2));
        assert_eq!(decode(text, Encoding::Utf8, 3), ('€' as u32, 3));
        assert_eq!(decode(text, Encoding::Utf8, 6), ('😀' as u32, 4));
        assert_eq!(decode(text, Encoding::Utf8, 10), (0, 1));
    }

    #[test]
    fn test_malformed_utf8_degrades_to_single_byte() {
        // Truncated three-byte sequence, lone continuation byte, overlong form.
        let text = [0xE2, 0x82, b'x', 0x80, 0xC0, 0xAF];
        assert_eq!(decode(&text, Encoding::Utf8, 0), (0xE2, 1));
        assert_eq!(decode(&text, Encoding::Utf8, 3), (0x80, 1));
        assert_eq!(decode(&text, Encoding::Utf8, 4), (0xC0, 1));
    }

    #[test]
    fn test_dbcs_lead_bytes() {
        let sjis = Encoding::Dbcs(CodePage::ShiftJis);
        let text = [0x82, 0xA0, b'a', 0x82];
        assert_eq!(decode(&text, sjis, 0), (0x82A0, 2));
        assert_eq!(decode(&text, sjis, 2), (u32::from(b'a'), 1));
        // Lead byte at the very end has no trail byte.
        assert_eq!(decode(&text, sjis, 3), (0x82, 1));
        assert!(!CodePage::ShiftJis.is_lead_byte(0xA0));
        assert!(CodePage::Gbk.is_lead_byte(0xA0));
        assert_eq!(CodePage::from_number(950), Some(CodePage::Big5));
    }
}
