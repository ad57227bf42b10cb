//! SQL lexer and folder.
//!
//! Unlike the other lexers this one drives a [`LexAccessor`] byte by byte
//! instead of using a [`StyleContext`](lexer_core::StyleContext): doubled
//! quotes and DBCS lead bytes make it skip ahead within a token.

use lexer_core::char_class::{is_a_space, is_operator};
use lexer_core::fold::{FOLD_LEVEL_BASE, compose_level, packed_next_level};
use lexer_core::{LexAccessor, LexerModule, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTLINE: u8 = 2;
    pub const COMMENTDOC: u8 = 3;
    pub const NUMBER: u8 = 4;
    pub const WORD: u8 = 5;
    pub const STRING: u8 = 6;
    pub const CHARACTER: u8 = 7;
    pub const SQLPLUS: u8 = 8;
    pub const SQLPLUS_PROMPT: u8 = 9;
    pub const OPERATOR: u8 = 10;
    pub const IDENTIFIER: u8 = 11;
    pub const SQLPLUS_COMMENT: u8 = 13;
    pub const COMMENTLINEDOC: u8 = 15;
    pub const WORD2: u8 = 16;
    pub const COMMENTDOCKEYWORD: u8 = 17;
    pub const COMMENTDOCKEYWORDERROR: u8 = 18;
    pub const USER1: u8 = 19;
    pub const USER2: u8 = 20;
    pub const USER3: u8 = 21;
    pub const USER4: u8 = 22;
}

const KEYWORDS: usize = 0;
const DATABASE_OBJECTS: usize = 1;
const PLDOC: usize = 2;
const SQLPLUS: usize = 3;
const USER1: usize = 4;

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 8] = [
    WordListSpec {
        key: "keywords",
        description: "Keywords",
    },
    WordListSpec {
        key: "database_objects",
        description: "Database Objects",
    },
    WordListSpec {
        key: "pldoc",
        description: "PLDoc",
    },
    WordListSpec {
        key: "sqlplus",
        description: "SQL*Plus",
    },
    WordListSpec {
        key: "user1",
        description: "User Keywords 1",
    },
    WordListSpec {
        key: "user2",
        description: "User Keywords 2",
    },
    WordListSpec {
        key: "user3",
        description: "User Keywords 3",
    },
    WordListSpec {
        key: "user4",
        description: "User Keywords 4",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 7,
    name: "sql",
    lexer: colourise,
    folder: Some(fold),
    word_lists: &WORD_LISTS,
};

fn is_word_start(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'_'
}

fn is_word(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'.' || ch == b'_'
}

fn is_space(ch: u8) -> bool {
    is_a_space(u32::from(ch))
}

/// Case-insensitive match of `pattern` at `pos`, followed by a space or `;`.
///
/// A `~` in the pattern marks where an abbreviation may stop: `rem~ark`
/// matches `rem`, `rema`, ... `remark`.
pub fn match_abbreviated(styler: &LexAccessor<'_>, pos: usize, pattern: &str) -> bool {
    let pattern = pattern.as_bytes();
    let lower = |p: usize| styler.safe_char_at(p, b' ').to_ascii_lowercase();
    let Some(&first) = pattern.first() else {
        return false;
    };
    if lower(pos) != first {
        return false;
    }
    let mut s = 1;
    let mut subword = false;
    if pattern.get(s) == Some(&b'~') {
        subword = true;
        s += 1;
    }
    let mut n = 1;
    while s < pattern.len() {
        if pattern[s] == b'~' {
            subword = true;
            s += 1;
        }
        if subword && is_space(styler.safe_char_at(pos + n, b' ')) {
            return true;
        }
        if pattern.get(s) != Some(&lower(pos + n)) {
            return false;
        }
        s += 1;
        n += 1;
    }
    let after = styler.safe_char_at(pos + n, b' ');
    is_space(after) || after == b';'
}

/// Style the word `start..end`.
fn classify_word(styler: &mut LexAccessor<'_>, start: usize, end: usize, keywords: &[WordList]) {
    let first = styler.safe_char_at(start, b' ');
    let is_number = first.is_ascii_digit() || first == b'.';
    let bytes = styler.range_bytes(start, end.min(start + 80));
    let word = String::from_utf8_lossy(&bytes).to_ascii_lowercase();
    let list = |index: usize| keyword_set(keywords, index);

    let word_style = if is_number {
        style::NUMBER
    } else if list(KEYWORDS).in_list(&word) {
        style::WORD
    } else if list(DATABASE_OBJECTS).in_list(&word) {
        style::WORD2
    } else if list(SQLPLUS).in_list_abbreviated(&word, '~') {
        style::SQLPLUS
    } else if list(USER1).in_list(&word) {
        style::USER1
    } else if list(USER1 + 1).in_list(&word) {
        style::USER2
    } else if list(USER1 + 2).in_list(&word) {
        style::USER3
    } else if list(USER1 + 3).in_list(&word) {
        style::USER4
    } else {
        style::IDENTIFIER
    };
    styler.colour_to(end, word_style);
}

/// State entered by `ch` at `i`, if it starts a token. Operators are
/// coloured immediately and leave the state at default.
fn token_start(styler: &mut LexAccessor<'_>, i: usize, ch: u8, ch_next: u8, sqlplus_first: bool) -> u8 {
    if sqlplus_first {
        if match_abbreviated(styler, i, "rem~ark") {
            return style::SQLPLUS_COMMENT;
        } else if match_abbreviated(styler, i, "pro~mpt") {
            return style::SQLPLUS_PROMPT;
        } else if is_word_start(ch) {
            return style::WORD;
        }
    }
    if ch == b'/' && ch_next == b'*' {
        // `/**` opens a doc comment.
        if styler.safe_char_at(i + 2, b' ') == b'*' {
            style::COMMENTDOC
        } else {
            style::COMMENT
        }
    } else if ch == b'-' && ch_next == b'-' {
        style::COMMENTLINE
    } else if ch == b'#' {
        style::COMMENTLINEDOC
    } else if !sqlplus_first && match_abbreviated(styler, i, "rem~ark") {
        style::SQLPLUS_COMMENT
    } else if !sqlplus_first && match_abbreviated(styler, i, "pro~mpt") {
        style::SQLPLUS_PROMPT
    } else if ch == b'\'' {
        style::CHARACTER
    } else if ch == b'"' {
        style::STRING
    } else if !sqlplus_first && is_word_start(ch) {
        style::WORD
    } else {
        if is_operator(u32::from(ch)) {
            styler.colour_to(i, style::DEFAULT);
            styler.colour_to(i + 1, style::OPERATOR);
        }
        style::DEFAULT
    }
}

/// Colourise a range of SQL.
///
/// Options: `sql.backslash.escapes` makes `\` escape the next character
/// inside single-quoted strings.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let (start, length, init_style) = styler.snap_range(start, length, init_style);
    let backslash_escapes = styler.property_int("sql.backslash.escapes", 0) != 0;
    let pldoc = keyword_set(keywords, PLDOC);
    let end = start + length;
    styler.start_segment(start);

    let mut state = init_style;
    let mut ch_prev = b' ';
    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut i = start;
    while i < end {
        let mut ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');

        if styler.is_lead_byte(ch) {
            ch_next = styler.safe_char_at(i + 2, b' ');
            ch_prev = b' ';
            i += 2;
            continue;
        }

        if state == style::DEFAULT {
            let next = token_start(&mut styler, i, ch, ch_next, true);
            if next != style::DEFAULT {
                styler.colour_to(i, state);
                state = next;
            }
        } else if state == style::WORD {
            if !is_word(ch) {
                let word_start = styler.start_seg();
                classify_word(&mut styler, word_start, i, keywords);
                state = token_start(&mut styler, i, ch, ch_next, false);
            }
        } else {
            match state {
                style::COMMENT | style::COMMENTDOC if ch == b'/' && ch_prev == b'*' => {
                    let seg = styler.start_seg();
                    if i > seg + 2 || (init_style == state && seg == start) {
                        styler.colour_to(i + 1, state);
                        state = style::DEFAULT;
                    }
                }
                style::COMMENTDOC if ch == b'@' => {
                    if (is_space(ch_prev) || ch_prev == b'*') && !is_space(ch_next) {
                        styler.colour_to(i, state);
                        state = style::COMMENTDOCKEYWORD;
                    }
                }
                style::COMMENTLINE | style::COMMENTLINEDOC | style::SQLPLUS_COMMENT | style::SQLPLUS_PROMPT
                    if ch == b'\r' || ch == b'\n' =>
                {
                    styler.colour_to(i, state);
                    state = style::DEFAULT;
                }
                style::COMMENTDOCKEYWORD => {
                    if ch == b'/' && ch_prev == b'*' {
                        styler.colour_to(i, style::COMMENTDOCKEYWORDERROR);
                        state = style::DEFAULT;
                    } else if !is_word(ch) {
                        let seg = styler.start_seg();
                        let bytes = styler.range_bytes(seg, i.min(seg + 30));
                        let word = String::from_utf8_lossy(&bytes).to_ascii_lowercase();
                        if !pldoc.in_list(word.get(1..).unwrap_or("")) {
                            state = style::COMMENTDOCKEYWORDERROR;
                        }
                        styler.colour_to(i, state);
                        state = style::COMMENTDOC;
                    }
                }
                style::CHARACTER if backslash_escapes && ch == b'\\' => {
                    i += 1;
                    ch = ch_next;
                    ch_next = styler.safe_char_at(i + 1, b' ');
                }
                style::CHARACTER | style::STRING => {
                    let quote = if state == style::CHARACTER { b'\'' } else { b'"' };
                    if ch == quote {
                        if ch_next == quote {
                            // Doubled quote is an escaped quote.
                            i += 1;
                        } else {
                            styler.colour_to(i + 1, state);
                            state = style::DEFAULT;
                            i += 1;
                        }
                        ch = ch_next;
                        ch_next = styler.safe_char_at(i + 1, b' ');
                    }
                }
                _ => {}
            }
            if state == style::DEFAULT {
                state = token_start(&mut styler, i, ch, ch_next, false);
            }
        }
        ch_prev = ch;
        i += 1;
    }
    styler.colour_to(end, state);
}

fn is_stream_comment_style(style: u8) -> bool {
    matches!(
        style,
        style::COMMENT | style::COMMENTDOC | style::COMMENTDOCKEYWORD | style::COMMENTDOCKEYWORDERROR
    )
}

/// Compute fold levels for a range of SQL.
///
/// `if`, `loop` and `begin` open a block and `end` closes it, never below
/// the base level; the `if`/`loop` of `end if`/`end loop` is ignored, as is
/// `elsif`. With `fold.comment`, stream comments and `--{` / `--}` markers
/// fold too.
pub fn fold(
    start: usize,
    length: usize,
    init_style: u8,
    _keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let (start, length, init_style) = styler.snap_range(start, length, init_style);
    let fold_comment = styler.property_int("fold.comment", 0) != 0;
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let end_pos = start + length;

    let mut visible_chars = 0;
    let mut line_current = styler.line_of(start);
    let mut level_current = if line_current > 0 {
        packed_next_level(styler.level(line_current - 1))
    } else {
        FOLD_LEVEL_BASE
    };
    let mut level_next = level_current;
    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut style_next = styler.style_at(start);
    let mut style = init_style;
    let mut end_found = false;

    let mut i = start;
    while i < end_pos {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(i + 1);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';

        if fold_comment && is_stream_comment_style(style) {
            if !is_stream_comment_style(style_prev) {
                level_next += 1;
            } else if !is_stream_comment_style(style_next) && !at_eol {
                // The byte after a comment may not be styled yet.
                level_next -= 1;
            }
        }
        if fold_comment && style == style::COMMENTLINE && ch == b'-' && ch_next == b'-' {
            match styler.safe_char_at(i + 2, b' ') {
                b'{' => level_next += 1,
                b'}' => level_next -= 1,
                _ => {}
            }
        }
        if style == style::WORD {
            if match_abbreviated(&styler, i, "elsif") {
                i += 4;
                ch_next = styler.safe_char_at(i + 1, b' ');
                style_next = styler.style_at(i + 1);
            } else if match_abbreviated(&styler, i, "if") || match_abbreviated(&styler, i, "loop") {
                if end_found {
                    end_found = false;
                } else {
                    level_next += 1;
                }
            } else if match_abbreviated(&styler, i, "begin") {
                level_next += 1;
            } else if match_abbreviated(&styler, i, "end") {
                end_found = true;
                level_next = (level_next - 1).max(FOLD_LEVEL_BASE);
            }
        }
        if at_eol {
            styler.set_level(
                line_current,
                compose_level(level_current, level_next, visible_chars, fold_compact),
            );
            line_current += 1;
            level_current = level_next;
            visible_chars = 0;
            end_found = false;
        }
        if !is_space(ch) {
            visible_chars += 1;
        }
        i += 1;
    }
}
