//! Haskell lexer.
//!
//! Tracks a small syntactic mode (after `import`, `module`, `foreign`, `type`)
//! so module names and contextual keywords such as `qualified`, `as` and
//! `hiding` are styled correctly. Haskell has no folder.

use lexer_core::char_class::{is_a_digit, is_a_digit_base, is_alphanumeric, is_lower_case, is_upper_case};
use lexer_core::line_state::{LineState, fit_bits};
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const IDENTIFIER: u8 = 1;
    pub const KEYWORD: u8 = 2;
    pub const NUMBER: u8 = 3;
    pub const STRING: u8 = 4;
    pub const CHARACTER: u8 = 5;
    pub const CLASS: u8 = 6;
    pub const MODULE: u8 = 7;
    pub const CAPITAL: u8 = 8;
    pub const DATA: u8 = 9;
    pub const IMPORT: u8 = 10;
    pub const OPERATOR: u8 = 11;
    pub const INSTANCE: u8 = 12;
    pub const COMMENTLINE: u8 = 13;
    pub const COMMENTBLOCK: u8 = 14;
    pub const COMMENTBLOCK2: u8 = 15;
    pub const COMMENTBLOCK3: u8 = 16;
    pub const PRAGMA: u8 = 17;
    pub const PREPROCESSOR: u8 = 18;
    pub const STRINGEOL: u8 = 19;
}

const KEYWORDS: usize = 0;
const FFI: usize = 1;

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 2] = [
    WordListSpec {
        key: "keywords",
        description: "Keywords",
    },
    WordListSpec {
        key: "ffi",
        description: "FFI",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 68,
    name: "haskell",
    lexer: colourise,
    folder: None,
    word_lists: &WORD_LISTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// What the last significant word put the lexer into.
pub enum Mode {
    /// No pending context.
    #[default]
    Default = 0,
    /// After `import` (and `qualified`).
    Import1 = 1,
    /// After the imported module name.
    Import2 = 2,
    /// After `as`.
    Import3 = 3,
    /// After `module`.
    Module = 4,
    /// After `foreign`.
    Ffi = 5,
    /// After `type` or `data`.
    Type = 6,
}

impl Mode {
    fn from_bits(bits: i32) -> Self {
        match bits {
            1 => Mode::Import1,
            2 => Mode::Import2,
            3 => Mode::Import3,
            4 => Mode::Module,
            5 => Mode::Ffi,
            6 => Mode::Type,
            _ => Mode::Default,
        }
    }

    fn is_import(self) -> bool {
        matches!(self, Mode::Import1 | Mode::Import2 | Mode::Import3)
    }
}

/// Line state: `mode` in bits 0-3, `xmode` above.
///
/// `xmode` means different things in different states: the comment nesting
/// depth inside `{- -}`, the radix of a number, the pending style of a
/// qualified name, or the `--` run flag of a line comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HaskellState {
    /// Mode set by the last significant word.
    pub mode: Mode,
    /// Mode-dependent extra value.
    pub xmode: u32,
}

impl HaskellState {
    /// Width of the `xmode` field.
    pub const XMODE_BITS: u32 = 27;
    /// Largest storable `xmode`.
    pub const MAX_XMODE: u32 = (1 << Self::XMODE_BITS) - 1;
}

impl LineState for HaskellState {
    fn pack(&self) -> i32 {
        let xmode = fit_bits(self.xmode, Self::XMODE_BITS, "haskell xmode");
        ((xmode << 4) | self.mode as u32) as i32
    }

    fn unpack(raw: i32) -> Self {
        HaskellState {
            mode: Mode::from_bits(raw & 0xF),
            xmode: (raw.max(0) as u32) >> 4,
        }
    }
}

fn is_word_start(ch: u32) -> bool {
    is_lower_case(ch) || is_upper_case(ch) || ch == '_' as u32
}

fn is_word(ch: u32, magic_hash: bool) -> bool {
    is_alphanumeric(ch) || ch == '_' as u32 || ch == '\'' as u32 || (magic_hash && ch == '#' as u32)
}

fn is_operator_char(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| "!#$%&*+-./:<=>?@\\^|~".contains(c))
}

fn is_punctuation(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| ",;()[]{}".contains(c))
}

struct HaskellLexer<'k> {
    keywords: &'k WordList,
    ffi: &'k WordList,
    magic_hash: bool,
    within_preprocessor: bool,
    mode: Mode,
    xmode: u32,
    /// First line whose end state has not been stored yet.
    pending_line: usize,
}

impl HaskellLexer<'_> {
    fn state(&self) -> HaskellState {
        HaskellState {
            mode: self.mode,
            xmode: self.xmode,
        }
    }

    /// Store the state at the end of every line the cursor has left.
    fn store_finished_lines(&mut self, sc: &mut StyleContext<'_>) {
        let packed = self.state().pack();
        while self.pending_line < sc.current_line {
            sc.styler.set_line_state(self.pending_line, packed);
            self.pending_line += 1;
        }
    }

    fn step(&mut self, sc: &mut StyleContext<'_>) {
        self.store_finished_lines(sc);

        match sc.state {
            style::OPERATOR => {
                let mut op_style = style::OPERATOR;
                // `:` starts a constructor operator, `::` alone is a type annotation.
                if sc.match_char(b':') && !(sc.ch_next == ':' as u32 && !is_operator_char(sc.get_relative(2))) {
                    op_style = style::CAPITAL;
                }
                while is_operator_char(sc.ch) {
                    sc.forward();
                }
                let end = sc.current_pos;
                sc.styler.colour_to(end, op_style);
                sc.change_state(style::DEFAULT);
            }
            style::STRING => self.quoted(sc, b'"'),
            style::CHARACTER => self.quoted(sc, b'\''),
            style::NUMBER => {
                if is_a_digit_base(sc.ch, self.xmode) || (sc.match_char(b'.') && is_a_digit_base(sc.ch_next, self.xmode)) {
                    sc.forward();
                } else if self.xmode == 10
                    && (sc.match_char(b'e') || sc.match_char(b'E'))
                    && (is_a_digit(sc.ch_next) || sc.ch_next == '+' as u32 || sc.ch_next == '-' as u32)
                {
                    sc.forward();
                    if sc.match_char(b'+') || sc.match_char(b'-') {
                        sc.forward();
                    }
                } else {
                    sc.set_state(style::DEFAULT);
                }
            }
            style::IDENTIFIER => self.identifier(sc),
            style::COMMENTLINE => {
                if self.xmode == 1 && !sc.match_char(b'-') {
                    // `-->` is an operator, not a comment.
                    self.xmode = 0;
                    if is_operator_char(sc.ch) {
                        sc.change_state(style::OPERATOR);
                    }
                } else if sc.at_line_end {
                    sc.set_state(style::DEFAULT);
                } else {
                    sc.forward();
                }
            }
            style::COMMENTBLOCK => {
                if sc.match_pair(b'{', b'-') {
                    sc.forward_n(2);
                    self.xmode += 1;
                } else if sc.match_pair(b'-', b'}') {
                    sc.forward_n(2);
                    self.xmode = self.xmode.saturating_sub(1);
                    if self.xmode == 0 {
                        sc.set_state(style::DEFAULT);
                    }
                } else {
                    sc.forward();
                }
            }
            style::PRAGMA => {
                if sc.match_str("#-}") {
                    sc.forward_n(3);
                    sc.set_state(style::DEFAULT);
                } else {
                    sc.forward();
                }
            }
            style::PREPROCESSOR => {
                if self.within_preprocessor && !is_word_start(sc.ch) {
                    sc.set_state(style::DEFAULT);
                } else if sc.match_char(b'\\') && !self.within_preprocessor {
                    sc.forward_n(2);
                } else if sc.at_line_end {
                    sc.set_state(style::DEFAULT);
                } else {
                    sc.forward();
                }
            }
            _ => {}
        }

        if sc.state == style::DEFAULT {
            self.enter_state(sc);
        }
    }

    fn quoted(&mut self, sc: &mut StyleContext<'_>, quote: u8) {
        if sc.match_char(quote) {
            sc.forward();
            sc.set_state(style::DEFAULT);
        } else if sc.match_char(b'\\') {
            sc.forward_n(2);
        } else if sc.at_line_end {
            sc.set_state(style::DEFAULT);
        } else {
            sc.forward();
        }
    }

    fn identifier(&mut self, sc: &mut StyleContext<'_>) {
        while sc.more() {
            if is_word(sc.ch, self.magic_hash) {
                sc.forward();
            } else if self.xmode == u32::from(style::CAPITAL) && sc.match_char(b'.') {
                // Qualified name: `Data.Map.lookup`, `Prelude.+`.
                if is_upper_case(sc.ch_next) {
                    self.xmode = u32::from(style::CAPITAL);
                } else if is_word_start(sc.ch_next) {
                    self.xmode = u32::from(style::IDENTIFIER);
                } else if is_operator_char(sc.ch_next) {
                    self.xmode = u32::from(style::OPERATOR);
                } else {
                    break;
                }
                sc.forward();
            } else if self.xmode == u32::from(style::OPERATOR) && is_operator_char(sc.ch) {
                sc.forward();
            } else {
                break;
            }
        }

        let s = sc.get_current(99);
        let capitalised = s.bytes().next().is_some_and(|b| b.is_ascii_uppercase());
        let mut word_style = u8::try_from(self.xmode).unwrap_or(style::IDENTIFIER);
        let mut new_mode = Mode::Default;

        if self.keywords.in_list(&s) {
            word_style = style::KEYWORD;
        } else if capitalised {
            if self.mode.is_import() {
                word_style = style::MODULE;
                new_mode = Mode::Import2;
            } else if self.mode == Mode::Module {
                word_style = style::MODULE;
            }
        } else if self.mode == Mode::Import1 && s == "qualified" {
            word_style = style::KEYWORD;
            new_mode = Mode::Import1;
        } else if self.mode == Mode::Import2 {
            if s == "as" {
                word_style = style::KEYWORD;
                new_mode = Mode::Import3;
            } else if s == "hiding" {
                word_style = style::KEYWORD;
            }
        } else if self.mode == Mode::Type && s == "family" {
            word_style = style::KEYWORD;
        }

        if self.mode == Mode::Ffi && self.ffi.in_list(&s) {
            word_style = style::KEYWORD;
            new_mode = Mode::Ffi;
        }

        let end = sc.current_pos;
        sc.styler.colour_to(end, word_style);

        match s.as_str() {
            "import" if self.mode != Mode::Ffi => new_mode = Mode::Import1,
            "module" => new_mode = Mode::Module,
            "foreign" => new_mode = Mode::Ffi,
            "type" | "data" => new_mode = Mode::Type,
            _ => {}
        }

        self.xmode = 0;
        sc.change_state(style::DEFAULT);
        self.mode = new_mode;
    }

    fn enter_state(&mut self, sc: &mut StyleContext<'_>) {
        if is_a_digit(sc.ch) {
            sc.set_state(style::NUMBER);
            if sc.match_char(b'0') && (sc.ch_next == 'x' as u32 || sc.ch_next == 'X' as u32) {
                sc.forward_n(2);
                self.xmode = 16;
            } else if sc.match_char(b'0') && (sc.ch_next == 'o' as u32 || sc.ch_next == 'O' as u32) {
                sc.forward_n(2);
                self.xmode = 8;
            } else {
                sc.forward();
                self.xmode = 10;
            }
            self.mode = Mode::Default;
        } else if sc.match_str("{-#") {
            sc.set_state(style::PRAGMA);
            sc.forward_n(3);
        } else if sc.match_pair(b'-', b'-') {
            sc.set_state(style::COMMENTLINE);
            sc.forward_n(2);
            self.xmode = 1;
        } else if sc.match_pair(b'{', b'-') {
            sc.set_state(style::COMMENTBLOCK);
            sc.forward_n(2);
            self.xmode = 1;
        } else if sc.match_char(b'"') {
            sc.set_state(style::STRING);
            sc.forward();
        } else if sc.match_char(b'\'') {
            sc.set_state(style::CHARACTER);
            sc.forward();
        } else if sc.at_line_start && sc.match_char(b'#') {
            self.mode = Mode::Default;
            sc.set_state(style::PREPROCESSOR);
            sc.forward();
        } else if is_operator_char(sc.ch) {
            self.mode = Mode::Default;
            sc.set_state(style::OPERATOR);
        } else if is_punctuation(sc.ch) {
            sc.set_state(style::OPERATOR);
            sc.forward();
            sc.set_state(style::DEFAULT);
        } else if is_word_start(sc.ch) {
            self.xmode = u32::from(if is_upper_case(sc.ch) {
                style::CAPITAL
            } else {
                style::IDENTIFIER
            });
            sc.set_state(style::IDENTIFIER);
            sc.forward();
        } else {
            sc.forward();
        }
    }
}

/// Colourise a range of Haskell source.
///
/// Options: `lexer.haskell.allow.hash` (GHC `MagicHash` identifiers) and
/// `styling.within.preprocessor`.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    let line = sc.current_line;
    let restored = if line > 0 {
        HaskellState::unpack(sc.styler.line_state(line - 1))
    } else {
        HaskellState::default()
    };
    let mut lexer = HaskellLexer {
        keywords: keyword_set(keywords, KEYWORDS),
        ffi: keyword_set(keywords, FFI),
        magic_hash: sc.styler.property_int("lexer.haskell.allow.hash", 0) != 0,
        within_preprocessor: sc.styler.property_int("styling.within.preprocessor", 0) != 0,
        mode: restored.mode,
        xmode: restored.xmode,
        pending_line: line,
    };
    while sc.more() {
        lexer.step(&mut sc);
    }
    lexer.store_finished_lines(&mut sc);
    sc.complete();
}
