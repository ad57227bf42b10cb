//! Rust lexer and folder.
//!
//! Derived from the D lexer: nested `/+ +/` comments are still recognised and
//! their depth is carried across lines in the line state.

use lexer_core::char_class::{
    is_a_digit, is_a_space, is_alpha, is_alphanumeric, is_lower_case, is_operator,
};
use lexer_core::fold::{FOLD_LEVEL_BASE, compose_level, packed_next_level};
use lexer_core::line_state::{LineState, fit_bits};
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTLINE: u8 = 2;
    pub const COMMENTDOC: u8 = 3;
    pub const COMMENTNESTED: u8 = 4;
    pub const NUMBER: u8 = 5;
    pub const WORD: u8 = 6;
    pub const WORD2: u8 = 7;
    pub const WORD3: u8 = 8;
    pub const TYPEDEF: u8 = 9;
    pub const STRING: u8 = 10;
    pub const STRINGEOL: u8 = 11;
    pub const CHARACTER: u8 = 12;
    pub const OPERATOR: u8 = 13;
    pub const IDENTIFIER: u8 = 14;
    pub const COMMENTLINEDOC: u8 = 15;
    pub const COMMENTDOCKEYWORD: u8 = 16;
    pub const COMMENTDOCKEYWORDERROR: u8 = 17;
    pub const STRINGB: u8 = 18;
    pub const STRINGR: u8 = 19;
    pub const WORD5: u8 = 20;
    pub const WORD6: u8 = 21;
    pub const WORD7: u8 = 22;
}

const PRIMARY: usize = 0;
const SECONDARY: usize = 1;
const DOC_KEYWORDS: usize = 2;
const TYPES: usize = 3;

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 7] = [
    WordListSpec {
        key: "primary",
        description: "Primary keywords and identifiers",
    },
    WordListSpec {
        key: "secondary",
        description: "Secondary keywords and identifiers",
    },
    WordListSpec {
        key: "doc",
        description: "Documentation comment keywords",
    },
    WordListSpec {
        key: "types",
        description: "Type definitions and aliases",
    },
    WordListSpec {
        key: "keywords5",
        description: "Keywords 5",
    },
    WordListSpec {
        key: "keywords6",
        description: "Keywords 6",
    },
    WordListSpec {
        key: "keywords7",
        description: "Keywords 7",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 111,
    name: "rust",
    lexer: colourise,
    folder: Some(fold),
    word_lists: &WORD_LISTS,
};

/// Depth of `/+ +/` nesting at the end of a line.
///
/// Occupies the whole non-negative range of the line-state word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NestingDepth(pub u32);

impl NestingDepth {
    /// Deepest nesting the line state can hold.
    pub const MAX: u32 = i32::MAX as u32;
}

impl LineState for NestingDepth {
    fn pack(&self) -> i32 {
        fit_bits(self.0, 31, "nesting depth") as i32
    }

    fn unpack(raw: i32) -> Self {
        NestingDepth(raw.max(0) as u32)
    }
}

fn is_word_start(ch: u32) -> bool {
    ch >= 0x80 || is_alpha(ch) || ch == '_' as u32
}

fn is_word(ch: u32) -> bool {
    ch >= 0x80 || is_alphanumeric(ch) || ch == '_' as u32
}

fn is_doxygen(ch: u32) -> bool {
    is_lower_case(ch)
        || char::from_u32(ch).is_some_and(|c| "$@\\&#<>{}[]".contains(c))
}

fn is_string_suffix(ch: u32) -> bool {
    ch == 'c' as u32 || ch == 'w' as u32 || ch == 'd' as u32
}

fn is_stream_comment_style(style: u8) -> bool {
    matches!(
        style,
        style::COMMENT | style::COMMENTDOC | style::COMMENTDOCKEYWORD | style::COMMENTDOCKEYWORDERROR
    )
}

struct RustLexer<'k> {
    keywords: &'k [WordList],
    style_before_doc_keyword: u8,
    nesting: u32,
    num_float: bool,
    num_hex: bool,
}

impl RustLexer<'_> {
    fn store_nesting(&self, sc: &mut StyleContext<'_>) {
        let line = sc.current_line;
        sc.styler.set_line_state(line, NestingDepth(self.nesting).pack());
    }

    fn step(&mut self, sc: &mut StyleContext<'_>) {
        if sc.at_line_start {
            self.store_nesting(sc);
        }

        match sc.state {
            style::OPERATOR => sc.set_state(style::DEFAULT),
            style::NUMBER => {
                // Almost anything goes because of hex digits and suffixes.
                if is_alphanumeric(sc.ch) || sc.ch == '_' as u32 {
                    return;
                } else if sc.match_char(b'.') && sc.ch_next != '.' as u32 && !self.num_float {
                    // `0..2` is a range, not a float.
                    self.num_float = true;
                    return;
                } else if (sc.match_char(b'-') || sc.match_char(b'+'))
                    && ((!self.num_hex && (sc.ch_prev == 'e' as u32 || sc.ch_prev == 'E' as u32))
                        || sc.ch_prev == 'p' as u32
                        || sc.ch_prev == 'P' as u32)
                {
                    return;
                } else {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::IDENTIFIER => {
                if !is_word(sc.ch) {
                    let s = sc.get_current(1000);
                    if keyword_set(self.keywords, PRIMARY).in_list(&s) {
                        sc.change_state(style::WORD);
                    } else if keyword_set(self.keywords, SECONDARY).in_list(&s) {
                        sc.change_state(style::WORD2);
                    } else if keyword_set(self.keywords, TYPES).in_list(&s) {
                        sc.change_state(style::TYPEDEF);
                    }
                    sc.set_state(style::DEFAULT);
                }
            }
            style::COMMENT => {
                if sc.match_pair(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            style::COMMENTDOC => {
                if sc.match_pair(b'*', b'/') {
                    sc.forward();
                    sc.forward_set_state(style::DEFAULT);
                } else if (sc.match_char(b'@') || sc.match_char(b'\\'))
                    && (is_a_space(sc.ch_prev) || sc.ch_prev == '*' as u32)
                    && !is_a_space(sc.ch_next)
                {
                    self.style_before_doc_keyword = style::COMMENTDOC;
                    sc.set_state(style::COMMENTDOCKEYWORD);
                }
            }
            style::COMMENTLINE => {
                if sc.at_line_start {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::COMMENTLINEDOC => {
                if sc.at_line_start {
                    sc.set_state(style::DEFAULT);
                } else if (sc.match_char(b'@') || sc.match_char(b'\\'))
                    && (is_a_space(sc.ch_prev) || sc.ch_prev == '/' as u32 || sc.ch_prev == '!' as u32)
                    && !is_a_space(sc.ch_next)
                {
                    self.style_before_doc_keyword = style::COMMENTLINEDOC;
                    sc.set_state(style::COMMENTDOCKEYWORD);
                }
            }
            style::COMMENTDOCKEYWORD => {
                if self.style_before_doc_keyword == style::COMMENTDOC && sc.match_pair(b'*', b'/') {
                    sc.change_state(style::COMMENTDOCKEYWORDERROR);
                    sc.forward();
                    sc.forward_set_state(style::DEFAULT);
                } else if !is_doxygen(sc.ch) {
                    let s = sc.get_current(100);
                    let word = s.get(1..).unwrap_or("");
                    if !is_a_space(sc.ch) || !keyword_set(self.keywords, DOC_KEYWORDS).in_list(word) {
                        sc.change_state(style::COMMENTDOCKEYWORDERROR);
                    }
                    sc.set_state(self.style_before_doc_keyword);
                }
            }
            style::COMMENTNESTED => {
                if sc.match_pair(b'+', b'/') {
                    self.nesting = self.nesting.saturating_sub(1);
                    self.store_nesting(sc);
                    sc.forward();
                    if self.nesting == 0 {
                        sc.forward_set_state(style::DEFAULT);
                    }
                } else if sc.match_pair(b'/', b'+') {
                    self.nesting += 1;
                    self.store_nesting(sc);
                    sc.forward();
                }
            }
            style::STRING => {
                if sc.match_char(b'\\') {
                    if sc.ch_next == '"' as u32 || sc.ch_next == '\\' as u32 {
                        sc.forward();
                    }
                } else if sc.match_char(b'"') {
                    if is_string_suffix(sc.ch_next) {
                        sc.forward();
                    }
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            style::CHARACTER => {
                if sc.at_line_end {
                    sc.change_state(style::STRINGEOL);
                } else if sc.match_char(b'\\') {
                    if sc.ch_next == '\'' as u32 || sc.ch_next == '\\' as u32 {
                        sc.forward();
                    }
                } else if sc.match_char(b'\'') {
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            style::STRINGEOL => {
                if sc.at_line_start {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::STRINGB => {
                if sc.match_char(b'`') {
                    if is_string_suffix(sc.ch_next) {
                        sc.forward();
                    }
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            style::STRINGR => {
                if sc.match_char(b'"') {
                    if is_string_suffix(sc.ch_next) {
                        sc.forward();
                    }
                    sc.forward_set_state(style::DEFAULT);
                }
            }
            _ => {}
        }

        if sc.state == style::DEFAULT {
            self.enter_state(sc);
        }
    }

    fn enter_state(&mut self, sc: &mut StyleContext<'_>) {
        if is_a_digit(sc.ch) || (sc.match_char(b'.') && is_a_digit(sc.ch_next)) {
            sc.set_state(style::NUMBER);
            self.num_float = sc.match_char(b'.');
            self.num_hex = sc.match_char(b'0') && (sc.ch_next == 'x' as u32 || sc.ch_next == 'X' as u32);
        } else if (sc.match_char(b'r') || sc.match_char(b'x') || sc.match_char(b'q'))
            && sc.ch_next == '"' as u32
        {
            sc.set_state(style::STRINGR);
            sc.forward();
        } else if is_word_start(sc.ch) || sc.match_char(b'$') {
            sc.set_state(style::IDENTIFIER);
        } else if sc.match_pair(b'/', b'+') {
            self.nesting += 1;
            self.store_nesting(sc);
            sc.set_state(style::COMMENTNESTED);
            sc.forward();
        } else if sc.match_pair(b'/', b'*') {
            if sc.match_str("/**") || sc.match_str("/*!") {
                sc.set_state(style::COMMENTDOC);
            } else {
                sc.set_state(style::COMMENT);
            }
            // Eat the `*` so it cannot close the comment.
            sc.forward();
        } else if sc.match_pair(b'/', b'/') {
            if (sc.match_str("///") && !sc.match_str("////")) || sc.match_str("//!") {
                sc.set_state(style::COMMENTLINEDOC);
            } else {
                sc.set_state(style::COMMENTLINE);
            }
        } else if sc.match_char(b'"') {
            sc.set_state(style::STRING);
        } else if sc.match_char(b'\'') {
            sc.set_state(style::CHARACTER);
        } else if sc.match_char(b'`') {
            sc.set_state(style::STRINGB);
        } else if is_operator(sc.ch) {
            sc.set_state(style::OPERATOR);
            if sc.match_pair(b'.', b'.') {
                sc.forward();
            }
        }
    }
}

/// Colourise a range of Rust source.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    let line = sc.current_line;
    let nesting = if line > 0 {
        NestingDepth::unpack(sc.styler.line_state(line - 1)).0
    } else {
        0
    };
    let mut lexer = RustLexer {
        keywords,
        style_before_doc_keyword: style::DEFAULT,
        nesting,
        num_float: false,
        num_hex: false,
    };
    while sc.more() {
        lexer.step(&mut sc);
        sc.forward();
    }
    sc.complete();
}

struct FoldOptions {
    fold: bool,
    syntax_based: bool,
    comment: bool,
    comment_multiline: bool,
    comment_explicit: bool,
    explicit_start: String,
    explicit_end: String,
    explicit_anywhere: bool,
    compact: bool,
    at_else: bool,
}

impl FoldOptions {
    fn read(styler: &LexAccessor<'_>) -> Self {
        let at_else_override = styler.property_int("lexer.rust.fold.at.else", -1);
        Self {
            fold: styler.property_flag("fold", false),
            syntax_based: styler.property_flag("fold.rust.syntax.based", true),
            comment: styler.property_flag("fold.comment", false),
            comment_multiline: styler.property_flag("fold.rust.comment.multiline", true),
            comment_explicit: styler.property_flag("fold.rust.comment.explicit", true),
            explicit_start: styler
                .property("fold.rust.explicit.start")
                .unwrap_or_default()
                .to_owned(),
            explicit_end: styler
                .property("fold.rust.explicit.end")
                .unwrap_or_default()
                .to_owned(),
            explicit_anywhere: styler.property_flag("fold.rust.explicit.anywhere", false),
            compact: styler.property_flag("fold.compact", true),
            at_else: if at_else_override >= 0 {
                at_else_override != 0
            } else {
                styler.property_flag("fold.at.else", false)
            },
        }
    }
}

/// Compute fold levels for a range of Rust source.
///
/// Braces styled as operators open and close blocks; with `fold.comment`,
/// stream comments, nested-comment depth and `//{` / `//}` markers (or the
/// configured explicit markers) fold too.
pub fn fold(
    start: usize,
    length: usize,
    init_style: u8,
    _keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let options = FoldOptions::read(&styler);
    if !options.fold {
        return;
    }
    let (start, length, init_style) = styler.snap_range(start, length, init_style);
    let end_pos = start + length;
    let user_markers = !options.explicit_start.is_empty() && !options.explicit_end.is_empty();

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
    let mut style = init_style;

    for i in start..end_pos {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style_prev = style;
        style = style_next;
        style_next = styler.style_at(i + 1);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';

        if options.comment && options.comment_multiline && is_stream_comment_style(style) {
            if !is_stream_comment_style(style_prev) {
                level_next += 1;
            } else if !is_stream_comment_style(style_next) && !at_eol {
                // The byte after a comment may not be styled yet.
                level_next -= 1;
            }
        }
        if options.comment
            && options.comment_explicit
            && (style == style::COMMENTLINE || options.explicit_anywhere)
        {
            if user_markers {
                if styler.match_at(i, &options.explicit_start) {
                    level_next += 1;
                } else if styler.match_at(i, &options.explicit_end) {
                    level_next -= 1;
                }
            } else if ch == b'/' && ch_next == b'/' {
                match styler.safe_char_at(i + 2, b' ') {
                    b'{' => level_next += 1,
                    b'}' => level_next -= 1,
                    _ => {}
                }
            }
        }
        if options.syntax_based && style == style::OPERATOR {
            if ch == b'{' {
                // Minimum before a `{` lets "} else {" fold.
                level_min_current = level_min_current.min(level_next);
                level_next += 1;
            } else if ch == b'}' {
                level_next -= 1;
            }
        }
        if at_eol || i + 1 == end_pos {
            if options.comment && options.comment_multiline {
                let here = NestingDepth::unpack(styler.line_state(line_current)).0 as i32;
                let before = if line_current > 0 {
                    NestingDepth::unpack(styler.line_state(line_current - 1)).0 as i32
                } else {
                    0
                };
                level_next += here - before;
            }
            let level_use = if options.syntax_based && options.at_else {
                level_min_current
            } else {
                level_current
            };
            styler.set_level(
                line_current,
                compose_level(level_use, level_next, visible_chars, options.compact),
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
