//! R lexer and folder.

use lexer_core::char_class::{is_a_digit, is_a_space};
use lexer_core::fold::{FOLD_LEVEL_BASE, compose_level, packed_next_level};
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const KWORD: u8 = 2;
    pub const BASEKWORD: u8 = 3;
    pub const OTHERKWORD: u8 = 4;
    pub const NUMBER: u8 = 5;
    pub const STRING: u8 = 6;
    pub const STRING2: u8 = 7;
    pub const OPERATOR: u8 = 8;
    pub const IDENTIFIER: u8 = 9;
    pub const INFIX: u8 = 10;
    pub const INFIXEOL: u8 = 11;
}

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 5] = [
    WordListSpec {
        key: "keywords",
        description: "Language Keywords",
    },
    WordListSpec {
        key: "base",
        description: "Base / Default package function",
    },
    WordListSpec {
        key: "other",
        description: "Other Package Functions",
    },
    WordListSpec {
        key: "unused1",
        description: "Unused",
    },
    WordListSpec {
        key: "unused2",
        description: "Unused",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 86,
    name: "r",
    lexer: colourise,
    folder: Some(fold),
    word_lists: &WORD_LISTS,
};

const KEYWORD_STYLES: [u8; 3] = [style::KWORD, style::BASEKWORD, style::OTHERKWORD];

fn is_word(ch: u32) -> bool {
    ch < 0x80 && (is_a_digit(ch) || char::from_u32(ch).is_some_and(|c| c.is_ascii_alphabetic() || c == '.' || c == '_'))
}

fn is_word_start(ch: u32) -> bool {
    is_word(ch) && ch != '.' as u32
}

// `.` is left out: it is part of numbers and identifiers.
fn is_r_operator(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| "-+!~?:*/^<>=&|$(){}[]".contains(c))
}

fn starts_number(sc: &StyleContext<'_>) -> bool {
    is_a_digit(sc.ch) || (sc.match_char(b'.') && is_a_digit(sc.ch_next))
}

/// Colourise a range of R source.
///
/// An `%infix%` operator left open at the end of a line is styled
/// [`style::INFIXEOL`] and does not carry over to the next line.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    if sc.state == style::INFIXEOL {
        sc.change_state(style::DEFAULT);
    }

    while sc.more() {
        match sc.state {
            style::OPERATOR => sc.set_state(style::DEFAULT),
            style::NUMBER => {
                if !starts_number(&sc) {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::IDENTIFIER => {
                if !is_word(sc.ch) {
                    let s = sc.get_current(99);
                    if let Some(index) = (0..KEYWORD_STYLES.len()).find(|&i| keyword_set(keywords, i).in_list(&s)) {
                        sc.change_state(KEYWORD_STYLES[index]);
                    }
                    sc.set_state(style::DEFAULT);
                }
            }
            style::COMMENT => {
                if sc.match_line_end() {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::STRING | style::STRING2 => {
                let quote = if sc.state == style::STRING { b'"' } else { b'\'' };
                if sc.match_char(b'\\') {
                    if sc.ch_next == '"' as u32 || sc.ch_next == '\'' as u32 || sc.ch_next == '\\' as u32 {
                        sc.forward();
                    }
                } else if sc.match_char(quote) {
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            style::INFIX => {
                if sc.match_char(b'%') {
                    sc.forward_set_state(style::DEFAULT);
                } else if sc.at_line_end {
                    sc.change_state(style::INFIXEOL);
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            _ => {}
        }

        if sc.state == style::DEFAULT {
            if starts_number(&sc) {
                sc.set_state(style::NUMBER);
            } else if is_word_start(sc.ch) {
                sc.set_state(style::IDENTIFIER);
            } else if sc.match_char(b'#') {
                sc.set_state(style::COMMENT);
            } else if sc.match_char(b'"') {
                sc.set_state(style::STRING);
            } else if sc.match_char(b'%') {
                sc.set_state(style::INFIX);
            } else if sc.match_char(b'\'') {
                sc.set_state(style::STRING2);
            } else if is_r_operator(sc.ch) {
                sc.set_state(style::OPERATOR);
            }
        }
        sc.forward();
    }
    sc.complete();
}

/// Fold R source by braces.
///
/// Options: `fold.compact` (default on) and `fold.at.else`, which lets a
/// `} else {` line start a new fold.
pub fn fold(
    start: usize,
    length: usize,
    init_style: u8,
    _keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let (start, length, _) = styler.snap_range(start, length, init_style);
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let fold_at_else = styler.property_int("fold.at.else", 0) != 0;
    let end_pos = start + length;

    let mut visible_chars = 0;
    let mut line_current = styler.line_of(start);
    let mut level_current = if line_current > 0 {
        packed_next_level(styler.level(line_current - 1))
    } else {
        FOLD_LEVEL_BASE
    };
    let mut level_min_current = level_current;
    let mut level_next = level_current;
    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut style_next = styler.style_at(start);

    for i in start..end_pos {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style = style_next;
        style_next = styler.style_at(i + 1);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';

        if style == style::OPERATOR {
            if ch == b'{' {
                level_min_current = level_min_current.min(level_next);
                level_next += 1;
            } else if ch == b'}' {
                level_next -= 1;
            }
        }
        if at_eol {
            let level_use = if fold_at_else { level_min_current } else { level_current };
            styler.set_level(
                line_current,
                compose_level(level_use, level_next, visible_chars, fold_compact),
            );
            line_current += 1;
            level_current = level_next;
            level_min_current = level_current;
            visible_chars = 0;
        }
        if !is_a_space(u32::from(ch)) {
            visible_chars += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_chars() {
        assert!(is_word('.' as u32));
        assert!(!is_word_start('.' as u32));
        assert!(is_word_start('7' as u32));
        assert!(!is_word(0xE9));
        assert!(is_r_operator('$' as u32));
        assert!(!is_r_operator('.' as u32));
        assert!(!is_r_operator('%' as u32));
    }
}
