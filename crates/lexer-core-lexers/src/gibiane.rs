//! GIBIANE lexer and folder.
//!
//! Lines starting with `*` are comments. Keywords may be written bare or
//! quoted (`'ET'`), and a digit is only a number when its neighbours are
//! separators. Folding is keyword driven and relies on keywords having been
//! styled, so run the lexer over a range before folding it.

use lexer_core::char_class::{is_a_digit, is_a_space};
use lexer_core::fold::{FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK, FOLD_LEVEL_WHITE_FLAG};
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const NUMBER: u8 = 2;
    pub const WORD: u8 = 3;
    pub const WORD2: u8 = 4;
    pub const WORD3: u8 = 5;
    pub const WORD4: u8 = 6;
    pub const WORD5: u8 = 7;
    pub const WORD6: u8 = 8;
    pub const WORD7: u8 = 9;
    pub const WORD8: u8 = 10;
    pub const STRING: u8 = 11;
    pub const TABLE: u8 = 12;
}

/// Styles for keyword sets 0..8, in priority order.
const WORD_STYLES: [u8; 8] = [
    style::WORD,
    style::WORD2,
    style::WORD3,
    style::WORD4,
    style::WORD5,
    style::WORD6,
    style::WORD7,
    style::WORD8,
];

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 8] = [
    WordListSpec {
        key: "conditional",
        description: "conditional",
    },
    WordListSpec {
        key: "test",
        description: "test1",
    },
    WordListSpec {
        key: "loop",
        description: "loop",
    },
    WordListSpec {
        key: "task",
        description: "task",
    },
    WordListSpec {
        key: "element",
        description: "element",
    },
    WordListSpec {
        key: "function1",
        description: "function1",
    },
    WordListSpec {
        key: "function2",
        description: "function2",
    },
    WordListSpec {
        key: "operator",
        description: "operator",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 201,
    name: "gibiane",
    lexer: colourise,
    folder: Some(fold),
    word_lists: &WORD_LISTS,
};

fn is_blank(ch: u32) -> bool {
    ch == ' ' as u32 || ch == 0x09 || ch == 0x0b
}

fn is_line_end(ch: u32) -> bool {
    ch == '\n' as u32 || ch == '\r' as u32
}

fn is_quote(ch: u32) -> bool {
    ch == '\'' as u32
}

/// Characters that end a word.
fn is_special(ch: u32) -> bool {
    is_blank(ch)
        || is_line_end(ch)
        || ch == ';' as u32
        || ch == '(' as u32
        || ch == ')' as u32
        || ch == '=' as u32
}

/// Number recogniser. A digit continues a number only when the previous
/// digit was itself accepted.
#[derive(Debug, Default)]
struct NumberFlank {
    previous_was_number: bool,
}

impl NumberFlank {
    fn accepts(&mut self, ch: u32, prev: u32, next: u32) -> bool {
        let starts = is_a_digit(ch) || (ch == '.' as u32 && is_a_digit(next));
        let left = prev == '.' as u32 || (is_a_digit(prev) && self.previous_was_number) || is_special(prev);
        let right = next == '.' as u32 || is_a_digit(next) || is_special(next);
        self.previous_was_number = starts && left && right;
        self.previous_was_number
    }
}

fn keyword_style(keywords: &[WordList], word: &str) -> Option<u8> {
    WORD_STYLES
        .iter()
        .enumerate()
        .find(|(index, _)| keyword_set(keywords, *index).in_list(word))
        .map(|(_, &word_style)| word_style)
}

/// Colourise a range of GIBIANE source.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    let start = sc.current_pos;
    let mut numbers = NumberFlank::default();

    while sc.more() {
        let s = sc.get_current_lowered(99);
        let first = s.bytes().next().map_or(0, u32::from);

        match sc.state {
            style::COMMENT => {
                if sc.at_line_end {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::STRING => {
                if is_quote(sc.ch) {
                    // A quoted word may be an operator such as `'ET'`; a string
                    // continued from an earlier line never is.
                    let quoted = s.strip_prefix('\'').and_then(|word| keyword_style(keywords, word));
                    match quoted {
                        Some(word_style) => {
                            sc.forward();
                            sc.change_state(word_style);
                            sc.set_state(style::DEFAULT);
                        }
                        None => sc.forward_set_state(style::DEFAULT),
                    }
                }
            }
            style::NUMBER => sc.set_state(style::DEFAULT),
            _ => {
                if is_special(first) {
                    sc.set_state(style::DEFAULT);
                }
            }
        }

        if sc.state == style::DEFAULT {
            if sc.match_char(b'*') && (is_line_end(sc.ch_prev) || sc.current_pos == start) {
                sc.set_state(style::COMMENT);
            } else if is_quote(sc.ch) {
                sc.set_state(style::STRING);
            } else if numbers.accepts(sc.ch, sc.ch_prev, sc.ch_next) {
                sc.set_state(style::NUMBER);
            } else if is_special(sc.ch) {
                sc.change_state(keyword_style(keywords, &s).unwrap_or(style::DEFAULT));
                sc.set_state(style::DEFAULT);
            } else if sc.match_char(b'.') {
                sc.change_state(style::TABLE);
                sc.set_state(style::DEFAULT);
            }
        }

        sc.forward();
    }
    sc.complete();
}

// `SI` and these open a block; `FIN <name>` and these close it. `SINON`
// closes and reopens.
const OPENERS: &[&[u8]] = &[b"repeter", b"debproc", b"debmeth"];
const CLOSERS: &[&[u8]] = &[b"finsi", b"finproc", b"finmeth"];

/// Keyword comparison over the first `max(len, 4)` bytes: words of four or
/// more letters match any keyword they abbreviate, shorter words must match
/// exactly.
pub fn abbreviates(word: &[u8], keyword: &[u8]) -> bool {
    keyword.starts_with(word) && (word.len() >= 4 || word.len() == keyword.len())
}

/// Scan state that must survive from one byte to the next within a pass.
struct FoldScan {
    at_eol: bool,
    at_eol_past: bool,
    line_comment: bool,
}

/// Compute fold levels for a range of GIBIANE source.
///
/// The scan restarts one line early so a `SINON` on the line before the
/// range still contributes its reopening delta.
pub fn fold(
    start: usize,
    length: usize,
    init_style: u8,
    _keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let (start, length, init_style) = styler.snap_range(start, length, init_style);
    let end_pos = start + length;
    let fold_compact = styler.property_int("fold.compact", 1) != 0;

    let mut line_current = styler.line_of(start);
    let mut is_prev_line = line_current > 0;
    let (start, mut style) = if is_prev_line {
        line_current -= 1;
        let prev_start = styler.line_start(line_current);
        let (_, _, style) = styler.snap_range(prev_start, end_pos - prev_start, init_style);
        (prev_start, style)
    } else {
        (start, init_style)
    };

    let mut scan = FoldScan {
        at_eol: true,
        at_eol_past: true,
        line_comment: false,
    };
    let mut level_delta_next = 0;
    let mut level_current = styler.level(line_current) & FOLD_LEVEL_NUMBER_MASK;
    let mut visible_chars = 0;
    let mut last_start = 0;
    let mut ch_next = u32::from(styler.safe_char_at(start, b' '));
    let mut style_next = styler.style_at(start);

    for i in start..end_pos {
        let ch = ch_next;
        ch_next = u32::from(styler.safe_char_at(i + 1, b' '));
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(i + 1);

        if style_prev == style::DEFAULT {
            last_start = i;
        }
        if is_blank(ch) || is_line_end(ch) || is_quote(ch) {
            last_start = i + 1;
        }

        if (ch == '*' as u32 && (scan.at_eol_past || scan.at_eol)) || scan.line_comment {
            scan.line_comment = true;
            last_start = i + 1;
            visible_chars = 0;
        }

        if (is_special(ch_next) || is_quote(ch_next)) && !scan.line_comment && style != style::STRING {
            let len = (i + 1).saturating_sub(last_start).min(31);
            let word: Vec<u8> = styler
                .range_bytes(last_start, last_start + len)
                .iter()
                .map(u8::to_ascii_lowercase)
                .collect();

            if word == b"si" || OPENERS.iter().any(|kw| abbreviates(&word, kw)) {
                level_delta_next += 1;
            } else if word == b"fin" {
                // `FIN;` alone is not a block end, `FIN I;` is.
                for p in last_start + word.len()..end_pos {
                    let c = u32::from(styler.char_at(p));
                    if !is_blank(c) && c != ';' as u32 && !is_quote(c) {
                        level_delta_next -= 1;
                        break;
                    } else if c == ';' as u32 {
                        break;
                    }
                }
            } else if CLOSERS.iter().any(|kw| abbreviates(&word, kw)) {
                level_delta_next -= 1;
            } else if abbreviates(&word, b"sinon") {
                if !is_prev_line {
                    level_current -= 1;
                }
                level_delta_next += 1;
            }
        }

        scan.at_eol_past = scan.at_eol;
        scan.at_eol = (ch == '\r' as u32 && ch_next != '\n' as u32) || ch == '\n' as u32;
        if scan.at_eol {
            let mut level = level_current;
            if visible_chars == 0 && fold_compact {
                level |= FOLD_LEVEL_WHITE_FLAG;
            }
            if level_delta_next > 0 && visible_chars > 0 {
                level |= FOLD_LEVEL_HEADER_FLAG;
            }
            styler.set_level(line_current, level);

            line_current += 1;
            level_current += level_delta_next;
            level_delta_next = 0;
            visible_chars = 0;
            is_prev_line = false;
            scan.line_comment = false;
        }

        if !is_a_space(ch) {
            visible_chars += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_flanks() {
        let mut numbers = NumberFlank::default();
        assert!(numbers.accepts('1' as u32, ' ' as u32, '2' as u32));
        assert!(numbers.accepts('2' as u32, '1' as u32, ';' as u32));
        let mut numbers = NumberFlank::default();
        assert!(!numbers.accepts('1' as u32, 'a' as u32, ' ' as u32));
        assert!(!numbers.accepts('2' as u32, '1' as u32, ' ' as u32));
    }

    #[test]
    fn test_abbreviation_rule() {
        assert!(abbreviates(b"repeter", b"repeter"));
        assert!(abbreviates(b"repe", b"repeter"));
        assert!(!abbreviates(b"rep", b"repeter"));
        assert!(!abbreviates(b"repeterx", b"repeter"));
        assert!(!abbreviates(b"", b"finsi"));
    }

    // Documents existing behaviour: any four-letter prefix is accepted, so
    // `fins` closes a block the same way `finsi` does.
    #[test]
    fn test_abbreviation_collisions_are_accepted() {
        assert!(abbreviates(b"fins", b"finsi"));
        assert!(abbreviates(b"sino", b"sinon"));
    }
}
