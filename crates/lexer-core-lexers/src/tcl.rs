//! TCL lexer.
//!
//! Folding is computed while colourising: braces and runs of leading `#`
//! comment lines (with `fold.comment`) adjust the level, which is written at
//! every line end. The registry entry therefore has no separate folder.
//!
//! Level word layout: bits 0-11 hold the level of the line itself (plus
//! [`FOLD_LEVEL_BASE`]), bit 16 the comment-fold flag and bits 17 and up the
//! brace depth at the end of the line.

use lexer_core::char_class::{is_a_digit, is_a_space, is_alpha, is_alphanumeric};
use lexer_core::fold::{FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_WHITE_FLAG};
use lexer_core::line_state::LineState;
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const COMMENT: u8 = 1;
    pub const COMMENTLINE: u8 = 2;
    pub const NUMBER: u8 = 3;
    pub const WORD_IN_QUOTE: u8 = 4;
    pub const IN_QUOTE: u8 = 5;
    pub const OPERATOR: u8 = 6;
    pub const IDENTIFIER: u8 = 7;
    pub const SUBSTITUTION: u8 = 8;
    pub const SUB_BRACE: u8 = 9;
    pub const MODIFIER: u8 = 10;
    pub const EXPAND: u8 = 11;
    pub const WORD: u8 = 12;
    pub const WORD2: u8 = 13;
    pub const WORD3: u8 = 14;
    pub const WORD4: u8 = 15;
    pub const WORD5: u8 = 16;
    pub const WORD6: u8 = 17;
    pub const WORD7: u8 = 18;
    pub const WORD8: u8 = 19;
    pub const COMMENT_BOX: u8 = 20;
    pub const BLOCK_COMMENT: u8 = 21;
}

const EXPAND_LIST: usize = 4;

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 9] = [
    WordListSpec {
        key: "tcl",
        description: "TCL Keywords",
    },
    WordListSpec {
        key: "tk",
        description: "TK Keywords",
    },
    WordListSpec {
        key: "itcl",
        description: "iTCL Keywords",
    },
    WordListSpec {
        key: "tkcommands",
        description: "tkCommands",
    },
    WordListSpec {
        key: "expand",
        description: "expand",
    },
    WordListSpec {
        key: "user1",
        description: "user1",
    },
    WordListSpec {
        key: "user2",
        description: "user2",
    },
    WordListSpec {
        key: "user3",
        description: "user3",
    },
    WordListSpec {
        key: "user4",
        description: "user4",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 25,
    name: "tcl",
    lexer: colourise,
    folder: None,
    word_lists: &WORD_LISTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Construct left open at the end of a line.
pub enum LineMode {
    /// Nothing open.
    #[default]
    Default = 0,
    /// A comment continued with a trailing backslash.
    OpenComment = 1,
    /// A double-quoted word spanning lines.
    OpenDoubleQuote = 2,
}

/// Line state: the open construct in bits 0-3 plus two flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TclState {
    /// Construct left open at the line end.
    pub mode: LineMode,
    /// The next word may start a command.
    pub command_expected: bool,
    /// Inside a `${...}` substitution.
    pub brace_only: bool,
}

impl TclState {
    const MODE_MASK: i32 = 0xF;
    const COMMAND_EXPECTED: i32 = 16;
    const BRACE_ONLY: i32 = 32;
}

impl LineState for TclState {
    fn pack(&self) -> i32 {
        let mut packed = self.mode as i32;
        if self.command_expected {
            packed |= Self::COMMAND_EXPECTED;
        }
        if self.brace_only {
            packed |= Self::BRACE_ONLY;
        }
        packed
    }

    fn unpack(raw: i32) -> Self {
        let mode = match raw & Self::MODE_MASK {
            1 => LineMode::OpenComment,
            2 => LineMode::OpenDoubleQuote,
            _ => LineMode::Default,
        };
        TclState {
            mode,
            command_expected: raw & Self::COMMAND_EXPECTED != 0,
            brace_only: raw & Self::BRACE_ONLY != 0,
        }
    }
}

/// Fold level word for one line.
pub fn pack_level(previous: i32, current: i32, comment: bool, visible_chars: bool) -> i32 {
    let flag = if current > previous {
        FOLD_LEVEL_HEADER_FLAG
    } else if !visible_chars {
        FOLD_LEVEL_WHITE_FLAG
    } else {
        0
    };
    flag + previous + FOLD_LEVEL_BASE + (current << 17) + (i32::from(comment) << 16)
}

fn is_word(ch: u32) -> bool {
    ch >= 0x80 || is_alphanumeric(ch) || ch == '_' as u32 || ch == ':' as u32
}

fn is_word_start(ch: u32) -> bool {
    ch >= 0x80 || is_alpha(ch) || ch == '_' as u32
}

// Loose on purpose: several dots or signs are accepted.
fn is_number_char(ch: u32) -> bool {
    ch < 0x80
        && (is_a_digit(ch)
            || ch == 'e' as u32
            || ch == 'E' as u32
            || ch == '.' as u32
            || ch == '-' as u32
            || ch == '+' as u32)
}

fn is_comment(state: u8) -> bool {
    state == style::COMMENT || state == style::COMMENTLINE
}

/// What the driver loop does after one step.
enum Flow {
    /// Advance the cursor and step again.
    Forward,
    /// Step again on the current character.
    Again,
    Stop,
}

struct TclLexer<'k> {
    keywords: &'k [WordList],
    fold_comment: bool,
    comment_level: bool,
    sub_brace: bool,
    line_mode: LineMode,
    prev_slash: bool,
    current_level: i32,
    previous_level: i32,
    expected: bool,
    sub_paren: u32,
    visible_chars: bool,
}

impl TclLexer<'_> {
    fn step(&mut self, sc: &mut StyleContext<'_>, at_end: bool) -> Flow {
        if self.sub_brace {
            if sc.match_char(b'}') {
                self.sub_brace = false;
                sc.set_state(style::OPERATOR);
                sc.forward_set_state(style::DEFAULT);
            } else {
                sc.set_state(style::SUB_BRACE);
            }
            if !sc.at_line_end {
                return Flow::Forward;
            }
        } else if sc.state == style::DEFAULT || sc.state == style::OPERATOR {
            self.expected &= is_a_space(sc.ch) || is_word_start(sc.ch);
        } else if sc.state == style::SUBSTITUTION {
            if sc.match_char(b'(') {
                self.sub_paren += 1;
            } else if sc.match_char(b')') {
                if self.sub_paren > 0 {
                    self.sub_paren -= 1;
                } else {
                    sc.set_state(style::DEFAULT);
                }
            } else if !is_word(sc.ch) {
                sc.set_state(style::DEFAULT);
                self.sub_paren = 0;
            }
        } else if !is_word(sc.ch)
            && (sc.state == style::IDENTIFIER || sc.state == style::MODIFIER || self.expected)
        {
            self.classify_word(sc);
        }

        if at_end {
            return Flow::Stop;
        }
        if sc.at_line_end {
            self.end_line(sc);
            return Flow::Forward;
        }
        if self.prev_slash {
            self.prev_slash = is_comment(sc.state) && is_a_space(sc.ch);
            return Flow::Forward;
        }

        if sc.at_line_start {
            match std::mem::take(&mut self.line_mode) {
                LineMode::OpenComment => {
                    sc.set_state(style::COMMENT);
                    return Flow::Forward;
                }
                LineMode::OpenDoubleQuote => sc.set_state(style::IN_QUOTE),
                LineMode::Default => {
                    sc.set_state(style::DEFAULT);
                    self.expected = is_word_start(sc.ch) || is_a_space(sc.ch);
                }
            }
        }

        match sc.state {
            style::NUMBER => {
                if !is_number_char(sc.ch) {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::IN_QUOTE => {
                if sc.match_char(b'"') {
                    sc.forward_set_state(style::DEFAULT);
                    // A lone `"` on a line still counts as visible.
                    self.visible_chars = true;
                    return Flow::Again;
                } else if sc.match_char(b'[') || sc.match_char(b']') || sc.match_char(b'$') {
                    sc.set_state(style::OPERATOR);
                    self.expected = sc.match_char(b'[');
                    sc.forward_set_state(style::IN_QUOTE);
                    return Flow::Again;
                }
                self.prev_slash = sc.match_char(b'\\');
                return Flow::Forward;
            }
            style::OPERATOR => sc.set_state(style::DEFAULT),
            _ => {}
        }

        if sc.match_char(b'#') {
            if !self.visible_chars {
                sc.set_state(style::COMMENTLINE);
            } else if sc.state != style::IN_QUOTE && self.expected {
                sc.set_state(style::COMMENT);
                self.expected = false;
            }
        }

        if !is_a_space(sc.ch) {
            self.visible_chars = true;
        }

        if sc.match_char(b'\\') {
            self.prev_slash = true;
            return Flow::Forward;
        }

        if sc.state == style::DEFAULT {
            return self.enter_state(sc);
        }
        Flow::Forward
    }

    fn classify_word(&mut self, sc: &mut StyleContext<'_>) {
        let s = sc.get_current(99);
        let quote = sc.state == style::IN_QUOTE;
        if self.comment_level || self.expected {
            let word = |index: usize| keyword_set(self.keywords, index).in_list(&s);
            let in_quote_or = |word_style: u8| if quote { style::WORD_IN_QUOTE } else { word_style };
            if word(0) {
                sc.change_state(in_quote_or(style::WORD));
            } else if word(1) {
                sc.change_state(in_quote_or(style::WORD2));
            } else if word(2) {
                sc.change_state(in_quote_or(style::WORD3));
            } else if word(3) {
                sc.change_state(in_quote_or(style::WORD4));
            } else if self.braced_exactly(sc, s.len()) && word(EXPAND_LIST) && sc.match_char(b'}') {
                // `{*}` style expansion: the word touches both braces.
                sc.change_state(style::EXPAND);
            }
            if word(5) {
                sc.change_state(style::WORD5);
            } else if word(6) {
                sc.change_state(style::WORD6);
            } else if word(7) {
                sc.change_state(style::WORD7);
            } else if word(8) {
                sc.change_state(style::WORD8);
            }
        }
        self.expected = false;
        sc.set_state(if quote { style::IN_QUOTE } else { style::DEFAULT });
    }

    fn braced_exactly(&self, sc: &StyleContext<'_>, word_len: usize) -> bool {
        sc.current_pos
            .checked_sub(word_len + 1)
            .is_some_and(|pos| sc.styler.safe_char_at(pos, 0) == b'{')
    }

    fn end_line(&mut self, sc: &mut StyleContext<'_>) {
        let line = sc.current_line;
        if self.fold_comment && sc.state == style::COMMENTLINE {
            if self.current_level == 0 {
                self.current_level += 1;
                self.comment_level = true;
            }
        } else if self.visible_chars && self.comment_level {
            self.current_level -= 1;
            self.previous_level -= 1;
            self.comment_level = false;
        }
        sc.styler.set_level(
            line,
            pack_level(self.previous_level, self.current_level, self.comment_level, self.visible_chars),
        );

        if sc.state == style::IN_QUOTE {
            self.line_mode = LineMode::OpenDoubleQuote;
        } else if self.prev_slash && is_comment(sc.state) {
            self.line_mode = LineMode::OpenComment;
        }
        let state = TclState {
            mode: self.line_mode,
            command_expected: self.expected,
            brace_only: self.sub_brace,
        };
        sc.styler.set_line_state(line, state.pack());
        sc.set_state(style::DEFAULT);
        self.prev_slash = false;
        self.visible_chars = false;
        self.previous_level = self.current_level;
    }

    fn enter_state(&mut self, sc: &mut StyleContext<'_>) -> Flow {
        if is_a_digit(sc.ch) || (sc.match_char(b'.') && is_a_digit(sc.ch_next)) {
            sc.set_state(style::NUMBER);
            return Flow::Forward;
        }
        if is_word_start(sc.ch) && self.expected {
            sc.set_state(style::IDENTIFIER);
            return Flow::Forward;
        }
        match char::from_u32(sc.ch) {
            Some('"') => sc.set_state(style::IN_QUOTE),
            Some('{') => {
                sc.set_state(style::OPERATOR);
                self.expected = true;
                self.current_level += 1;
            }
            Some('}') => {
                sc.set_state(style::OPERATOR);
                self.current_level -= 1;
            }
            Some('[' | ']') => {
                sc.set_state(style::OPERATOR);
                self.expected = true;
            }
            Some('(' | ')') => sc.set_state(style::OPERATOR),
            Some(';') => self.expected = true,
            Some('$') => {
                self.sub_paren = 0;
                if sc.ch_next != '{' as u32 {
                    sc.set_state(style::SUBSTITUTION);
                } else {
                    sc.forward_set_state(style::OPERATOR);
                    sc.forward_set_state(style::SUB_BRACE);
                    self.sub_brace = true;
                    // The cursor already sits on the first character inside the braces.
                    return Flow::Again;
                }
            }
            Some('-') => {
                if !is_a_digit(sc.ch_next) {
                    sc.set_state(style::MODIFIER);
                }
            }
            _ => {}
        }
        Flow::Forward
    }
}

/// Colourise and fold a range of TCL source.
///
/// With `fold.comment`, a run of `#` lines at the top level folds as a block.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    let fold_comment = sc.styler.property_int("fold.comment", 0) != 0;
    let line = sc.current_line;

    let mut lexer = TclLexer {
        keywords,
        fold_comment,
        comment_level: false,
        sub_brace: false,
        line_mode: LineMode::Default,
        prev_slash: false,
        current_level: 0,
        previous_level: 0,
        expected: false,
        sub_paren: 0,
        visible_chars: false,
    };
    if line > 0 {
        let restored = TclState::unpack(sc.styler.line_state(line - 1));
        let level = sc.styler.level(line - 1);
        lexer.line_mode = restored.mode;
        lexer.expected = restored.command_expected;
        lexer.sub_brace = restored.brace_only;
        lexer.current_level = level >> 17;
        lexer.comment_level = (level >> 16) & 1 != 0;
    } else {
        sc.styler.set_level(0, FOLD_LEVEL_BASE | FOLD_LEVEL_HEADER_FLAG);
    }
    lexer.previous_level = lexer.current_level;

    'scan: loop {
        let at_end = !sc.more();
        loop {
            match lexer.step(&mut sc, at_end) {
                Flow::Forward => break,
                Flow::Again => continue,
                Flow::Stop => break 'scan,
            }
        }
        sc.forward();
    }
    sc.complete();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_round_trip() {
        for mode in [LineMode::Default, LineMode::OpenComment, LineMode::OpenDoubleQuote] {
            for command_expected in [false, true] {
                for brace_only in [false, true] {
                    let state = TclState {
                        mode,
                        command_expected,
                        brace_only,
                    };
                    assert_eq!(TclState::unpack(state.pack()), state);
                }
            }
        }
    }

    #[test]
    fn test_state_bits() {
        let state = TclState {
            mode: LineMode::OpenDoubleQuote,
            command_expected: true,
            brace_only: true,
        };
        assert_eq!(state.pack(), 2 | 16 | 32);
    }

    #[test]
    fn test_pack_level() {
        assert_eq!(pack_level(0, 1, false, true), FOLD_LEVEL_HEADER_FLAG + FOLD_LEVEL_BASE + (1 << 17));
        assert_eq!(pack_level(1, 1, false, false), FOLD_LEVEL_WHITE_FLAG + 1 + FOLD_LEVEL_BASE + (1 << 17));
        assert_eq!(pack_level(0, 1, true, true) >> 17, 1);
        assert_eq!((pack_level(0, 1, true, true) >> 16) & 1, 1);
    }

    #[test]
    fn test_word_chars() {
        assert!(is_word(':' as u32));
        assert!(!is_word_start(':' as u32));
        assert!(is_number_char('e' as u32));
        assert!(!is_number_char('x' as u32));
    }
}
