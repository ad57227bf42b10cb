//! SCSS lexer and folder.
//!
//! No SCSS token spans a line end, so the open token is committed at every
//! line start. The context the next line needs (the last operator and the
//! styles that preceded it) is kept in the line state as [`ScssState`].

use lexer_core::char_class::{is_a_space, is_alphanumeric};
use lexer_core::fold::{FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK, FOLD_LEVEL_WHITE_FLAG};
use lexer_core::line_state::{LineState, fit_bits};
use lexer_core::{LexAccessor, LexerModule, StyleContext, TextAccessor, WordList, WordListSpec, keyword_set};

/// Style ids.
#[allow(missing_docs)]
pub mod style {
    pub const DEFAULT: u8 = 0;
    pub const TAG: u8 = 1;
    pub const CLASS: u8 = 2;
    pub const PSEUDOCLASS: u8 = 3;
    pub const UNKNOWN_PSEUDOCLASS: u8 = 4;
    pub const OPERATOR: u8 = 5;
    pub const IDENTIFIER: u8 = 6;
    pub const UNKNOWN_IDENTIFIER: u8 = 7;
    pub const VALUE: u8 = 8;
    pub const COMMENT: u8 = 9;
    pub const ID: u8 = 10;
    pub const IMPORTANT: u8 = 11;
    pub const DIRECTIVE: u8 = 12;
    pub const DOUBLESTRING: u8 = 13;
    pub const SINGLESTRING: u8 = 14;
    pub const IDENTIFIER2: u8 = 15;
    pub const ATTRIBUTE: u8 = 16;
    pub const IDENTIFIER3: u8 = 17;
    pub const PSEUDOELEMENT: u8 = 18;
    pub const EXTENDED_IDENTIFIER: u8 = 19;
    pub const EXTENDED_PSEUDOCLASS: u8 = 20;
    pub const EXTENDED_PSEUDOELEMENT: u8 = 21;
    pub const MEDIA: u8 = 22;
    pub const VARIABLE: u8 = 23;
    pub const COMMENTLINE: u8 = 24;
}

const CSS1_PROPERTIES: usize = 0;
const PSEUDO_CLASSES: usize = 1;
const CSS2_PROPERTIES: usize = 2;
const CSS3_PROPERTIES: usize = 3;
const PSEUDO_ELEMENTS: usize = 4;
const BROWSER_PROPERTIES: usize = 5;
const BROWSER_PSEUDO_CLASSES: usize = 6;
const BROWSER_PSEUDO_ELEMENTS: usize = 7;

/// Keyword sets, in the order hosts pass them.
pub static WORD_LISTS: [WordListSpec; 8] = [
    WordListSpec {
        key: "css1",
        description: "CSS1 Properties",
    },
    WordListSpec {
        key: "pseudo_classes",
        description: "Pseudo-classes",
    },
    WordListSpec {
        key: "css2",
        description: "CSS2 Properties",
    },
    WordListSpec {
        key: "css3",
        description: "CSS3 Properties",
    },
    WordListSpec {
        key: "pseudo_elements",
        description: "Pseudo-elements",
    },
    WordListSpec {
        key: "browser_properties",
        description: "Browser-Specific CSS Properties",
    },
    WordListSpec {
        key: "browser_pseudo_classes",
        description: "Browser-Specific Pseudo-classes",
    },
    WordListSpec {
        key: "browser_pseudo_elements",
        description: "Browser-Specific Pseudo-elements",
    },
];

/// Registry entry.
pub static LEXER: LexerModule = LexerModule {
    id: 200,
    name: "scss",
    lexer: colourise,
    folder: Some(fold),
    word_lists: &WORD_LISTS,
};

// Selector-ish states after which `.`, `#`, `[`, `:` and `$` start something new.
const SELECTOR_STATES: &[u8] = &[
    style::TAG,
    style::DEFAULT,
    style::CLASS,
    style::ID,
    style::PSEUDOCLASS,
    style::EXTENDED_PSEUDOCLASS,
    style::UNKNOWN_PSEUDOCLASS,
];

const PSEUDO_STATES: &[u8] = &[
    style::PSEUDOCLASS,
    style::PSEUDOELEMENT,
    style::EXTENDED_PSEUDOCLASS,
    style::EXTENDED_PSEUDOELEMENT,
    style::UNKNOWN_PSEUDOCLASS,
];

const IDENTIFIER_STATES: &[u8] = &[
    style::IDENTIFIER,
    style::IDENTIFIER2,
    style::IDENTIFIER3,
    style::EXTENDED_IDENTIFIER,
    style::UNKNOWN_IDENTIFIER,
];

// Non-ASCII bytes count as word characters: the lexer cannot tell U+0080..U+00A0 apart.
fn is_word(ch: u32) -> bool {
    ch >= 0x80 || is_alphanumeric(ch) || ch == '-' as u32 || ch == '_' as u32 || ch == '&' as u32
}

const OPERATORS: &str = "{}:,;.#!@*>+=~|[]()$&";

fn is_scss_operator(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| OPERATORS.contains(c))
}

/// The last operator seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    /// One of the SCSS operator characters.
    pub ch: u8,
    /// The operator directly followed a `:`, as in `::before`.
    pub after_colon: bool,
}

/// Line state.
///
/// Three 5-bit style fields (bits 0-4, 5-9, 10-14) store the style plus one
/// so 0 means unset. Bits 15-19 hold the operator's index in the operator set
/// plus one, and bit 20 its `after_colon` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScssState {
    /// Style before the current run of operators.
    pub last_state: Option<u8>,
    /// Style before the current comment.
    pub last_state_comment: Option<u8>,
    /// Style before the current string.
    pub last_state_string: Option<u8>,
    /// Last operator; `None` until one is seen.
    pub op: Option<Operator>,
}

impl ScssState {
    const FIELD_BITS: u32 = 5;
    const FIELD_MASK: u32 = (1 << Self::FIELD_BITS) - 1;
    const AFTER_COLON: u32 = 1 << 20;

    fn pack_style(style: Option<u8>) -> u32 {
        style.map_or(0, |s| fit_bits(u32::from(s) + 1, Self::FIELD_BITS, "scss style"))
    }

    fn unpack_style(raw: u32, shift: u32) -> Option<u8> {
        ((raw >> shift) & Self::FIELD_MASK).checked_sub(1).map(|s| s as u8)
    }
}

impl LineState for ScssState {
    fn pack(&self) -> i32 {
        let op = self.op.map_or(0, |op| {
            let index = OPERATORS.bytes().position(|b| b == op.ch).map_or(0, |i| i as u32 + 1);
            let after_colon = if op.after_colon { Self::AFTER_COLON } else { 0 };
            (index << 15) | after_colon
        });
        (Self::pack_style(self.last_state)
            | (Self::pack_style(self.last_state_comment) << 5)
            | (Self::pack_style(self.last_state_string) << 10)
            | op) as i32
    }

    fn unpack(raw: i32) -> Self {
        let raw = raw.max(0) as u32;
        let index = ((raw >> 15) & Self::FIELD_MASK) as usize;
        let op = index.checked_sub(1).and_then(|i| OPERATORS.as_bytes().get(i)).map(|&ch| Operator {
            ch,
            after_colon: raw & Self::AFTER_COLON != 0,
        });
        ScssState {
            last_state: Self::unpack_style(raw, 0),
            last_state_comment: Self::unpack_style(raw, 5),
            last_state_string: Self::unpack_style(raw, 10),
            op,
        }
    }
}

struct ScssLexer<'k> {
    keywords: &'k [WordList],
    context: ScssState,
}

impl ScssLexer<'_> {
    fn last_is(&self, states: &[u8]) -> bool {
        self.context.last_state.is_some_and(|s| states.contains(&s))
    }

    fn op(&self) -> u32 {
        self.context.op.map_or(' ' as u32, |op| u32::from(op.ch))
    }

    fn op_after_colon(&self) -> bool {
        self.context.op.is_some_and(|op| op.after_colon)
    }

    fn step(&mut self, sc: &mut StyleContext<'_>) {
        let comment_ends = (sc.state == style::COMMENT && sc.match_pair(b'*', b'/'))
            || (sc.state == style::COMMENTLINE && sc.at_line_end);
        if comment_ends {
            // Comments are whitespace: resume the state they interrupted.
            let resume = self.context.last_state_comment.unwrap_or(style::DEFAULT);
            if sc.state == style::COMMENT {
                sc.forward();
                sc.forward_set_state(resume);
            } else {
                sc.set_state(resume);
            }
        }

        if sc.state == style::COMMENT || sc.state == style::COMMENTLINE {
            return;
        }

        if sc.state == style::DOUBLESTRING || sc.state == style::SINGLESTRING {
            let quote = if sc.state == style::DOUBLESTRING { b'"' } else { b'\'' };
            if !sc.match_char(quote) {
                return;
            }
            let mut i = sc.current_pos;
            while i > 0 && sc.styler.char_at(i - 1) == b'\\' {
                i -= 1;
            }
            if (sc.current_pos - i) % 2 == 1 {
                return;
            }
            sc.forward_set_state(self.context.last_state_string.unwrap_or(style::VALUE));
        }

        if sc.state == style::OPERATOR {
            self.after_operator(sc);
        }

        if is_word(sc.ch) {
            if sc.state == style::DEFAULT {
                sc.set_state(style::TAG);
            }
            return;
        }

        if sc.match_char(b'*') && sc.state == style::DEFAULT {
            sc.set_state(style::TAG);
            return;
        }

        if is_word(sc.ch_prev)
            && (IDENTIFIER_STATES.contains(&sc.state)
                || PSEUDO_STATES.contains(&sc.state)
                || sc.state == style::IMPORTANT
                || sc.state == style::DIRECTIVE)
        {
            self.classify_word(sc);
        }

        let ends_selector_part = !sc.match_char(b'.')
            && !sc.match_char(b':')
            && !sc.match_char(b'#')
            && (sc.state == style::CLASS
                || sc.state == style::ID
                // Parentheses extend pseudo-classes: `:not(...)`.
                || (!sc.match_char(b'(') && !sc.match_char(b')') && PSEUDO_STATES.contains(&sc.state)));
        if ends_selector_part {
            sc.set_state(style::TAG);
        }

        if sc.match_pair(b'/', b'*') {
            self.context.last_state_comment = Some(sc.state);
            sc.set_state(style::COMMENT);
            sc.forward();
        } else if sc.match_pair(b'/', b'/') {
            self.context.last_state_comment = Some(sc.state);
            sc.set_state(style::COMMENTLINE);
            sc.forward();
        } else if (sc.state == style::VALUE || sc.state == style::ATTRIBUTE)
            && (sc.match_char(b'"') || sc.match_char(b'\''))
        {
            self.context.last_state_string = Some(sc.state);
            sc.set_state(if sc.match_char(b'"') {
                style::DOUBLESTRING
            } else {
                style::SINGLESTRING
            });
        } else if is_scss_operator(sc.ch)
            && (sc.state != style::ATTRIBUTE || sc.match_char(b']'))
            && (sc.state != style::VALUE || sc.match_char(b';') || sc.match_char(b'}') || sc.match_char(b'!'))
            && ((sc.state != style::DIRECTIVE && sc.state != style::MEDIA)
                || sc.match_char(b';')
                || sc.match_char(b'{'))
        {
            if sc.state != style::OPERATOR {
                self.context.last_state = Some(sc.state);
            }
            sc.set_state(style::OPERATOR);
            self.context.op = u8::try_from(sc.ch).ok().map(|ch| Operator {
                ch,
                after_colon: sc.ch_prev == ':' as u32,
            });
        }
    }

    fn after_operator(&mut self, sc: &mut StyleContext<'_>) {
        let next = match char::from_u32(self.op()) {
            Some('@') if self.last_is(&[style::DEFAULT]) => Some(style::DIRECTIVE),
            Some('>' | '+')
                if self.last_is(SELECTOR_STATES) && self.context.last_state != Some(style::DEFAULT) =>
            {
                Some(style::DEFAULT)
            }
            Some('[') if self.last_is(SELECTOR_STATES) => Some(style::ATTRIBUTE),
            Some(']') if self.last_is(&[style::ATTRIBUTE]) => Some(style::TAG),
            Some('{') if self.last_is(&[style::MEDIA]) => Some(style::DEFAULT),
            Some('{') if self.last_is(&[style::TAG, style::DIRECTIVE, style::IDENTIFIER]) => {
                Some(style::IDENTIFIER)
            }
            Some('}')
                if self.last_is(&[
                    style::DEFAULT,
                    style::VALUE,
                    style::IMPORTANT,
                    style::IDENTIFIER,
                    style::IDENTIFIER2,
                    style::IDENTIFIER3,
                ]) =>
            {
                Some(style::DEFAULT)
            }
            Some('(') if self.last_is(&[style::PSEUDOCLASS]) => Some(style::TAG),
            Some('(') if self.last_is(&[style::EXTENDED_PSEUDOCLASS]) => Some(style::EXTENDED_PSEUDOCLASS),
            Some(')')
                if self.last_is(SELECTOR_STATES)
                    || self.last_is(&[style::PSEUDOELEMENT, style::EXTENDED_PSEUDOELEMENT]) =>
            {
                Some(style::TAG)
            }
            Some(':')
                if self.last_is(SELECTOR_STATES)
                    || self.last_is(&[style::PSEUDOELEMENT, style::EXTENDED_PSEUDOELEMENT]) =>
            {
                Some(style::PSEUDOCLASS)
            }
            Some(':') if self.last_is(IDENTIFIER_STATES) => Some(style::VALUE),
            Some('.') if self.last_is(SELECTOR_STATES) => Some(style::CLASS),
            Some('#') if self.last_is(SELECTOR_STATES) => Some(style::ID),
            Some(',' | '|' | '~') if self.last_is(&[style::TAG]) => Some(style::DEFAULT),
            Some(';') if self.last_is(&[style::DIRECTIVE, style::VARIABLE]) => Some(style::DEFAULT),
            Some(';') if self.last_is(&[style::VALUE, style::IMPORTANT]) => Some(style::IDENTIFIER),
            Some('!') if self.last_is(&[style::VALUE]) => Some(style::IMPORTANT),
            Some('$') if self.last_is(SELECTOR_STATES) || self.last_is(&[style::VARIABLE, style::IDENTIFIER]) => {
                Some(style::VARIABLE)
            }
            Some('&') => Some(style::IDENTIFIER),
            _ => None,
        };
        if let Some(next) = next {
            sc.set_state(next);
        }
    }

    fn classify_word(&mut self, sc: &mut StyleContext<'_>) {
        let lowered = sc.get_current_lowered(99);
        let s = lowered.trim_start_matches(|c: char| !is_word(c as u32));
        let in_list = |index: usize| keyword_set(self.keywords, index).in_list(s);
        let (op, after_colon) = (self.op(), self.op_after_colon());
        let colon = ':' as u32;

        if IDENTIFIER_STATES.contains(&sc.state) {
            let state = if in_list(CSS1_PROPERTIES) {
                style::IDENTIFIER
            } else if in_list(CSS2_PROPERTIES) {
                style::IDENTIFIER2
            } else if in_list(CSS3_PROPERTIES) {
                style::IDENTIFIER3
            } else if in_list(BROWSER_PROPERTIES) {
                style::EXTENDED_IDENTIFIER
            } else {
                style::UNKNOWN_IDENTIFIER
            };
            sc.change_state(state);
        } else if PSEUDO_STATES.contains(&sc.state) {
            let extended_context = op == colon
                || (op == '(' as u32 && self.context.last_state == Some(style::EXTENDED_PSEUDOCLASS));
            let state = if op == colon && !after_colon && in_list(PSEUDO_CLASSES) {
                style::PSEUDOCLASS
            } else if after_colon && in_list(PSEUDO_ELEMENTS) {
                style::PSEUDOELEMENT
            } else if extended_context && !after_colon && in_list(BROWSER_PSEUDO_CLASSES) {
                style::EXTENDED_PSEUDOCLASS
            } else if after_colon && in_list(BROWSER_PSEUDO_ELEMENTS) {
                style::EXTENDED_PSEUDOELEMENT
            } else {
                style::UNKNOWN_PSEUDOCLASS
            };
            sc.change_state(state);
        } else if sc.state == style::IMPORTANT {
            if s != "important" {
                sc.change_state(style::VALUE);
            }
        } else if sc.state == style::DIRECTIVE && op == '@' as u32 && s == "media" {
            sc.change_state(style::MEDIA);
        }
    }
}

/// Colourise a range of SCSS.
pub fn colourise(
    start: usize,
    length: usize,
    init_style: u8,
    keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut sc = StyleContext::new(start, length, init_style, LexAccessor::new(accessor));
    let line = sc.current_line;
    let context = if line > 0 {
        ScssState::unpack(sc.styler.line_state(line - 1))
    } else {
        ScssState::default()
    };
    let mut lexer = ScssLexer { keywords, context };
    while sc.more() {
        if sc.at_line_start {
            let state = sc.state;
            sc.set_state(state);
        }
        lexer.step(&mut sc);
        if sc.at_line_end {
            let line = sc.current_line;
            sc.styler.set_line_state(line, lexer.context.pack());
        }
        sc.forward();
    }
    sc.complete();
}

/// Fold SCSS by braces and, with `fold.comment`, by comment blocks.
///
/// Each line's own level is read from the level store; the pass finishes by
/// writing the real level of the line after the range, keeping its flags.
pub fn fold(
    start: usize,
    length: usize,
    init_style: u8,
    _keywords: &[WordList],
    accessor: &mut dyn TextAccessor,
) {
    let mut styler = LexAccessor::new(accessor);
    let (start, length, _) = styler.snap_range(start, length, init_style);
    let fold_comment = styler.property_int("fold.comment", 0) != 0;
    let fold_compact = styler.property_int("fold.compact", 1) != 0;
    let end_pos = start + length;

    let mut visible_chars = 0;
    let mut line_current = styler.line_of(start);
    let mut level_prev = styler.level(line_current) & FOLD_LEVEL_NUMBER_MASK;
    let mut level_current = level_prev;
    let mut ch_next = styler.safe_char_at(start, b' ');
    let mut in_comment = start > 0 && styler.style_at(start - 1) == style::COMMENT;

    for i in start..end_pos {
        let ch = ch_next;
        ch_next = styler.safe_char_at(i + 1, b' ');
        let style = styler.style_at(i);
        let at_eol = (ch == b'\r' && ch_next != b'\n') || ch == b'\n';
        if fold_comment {
            if !in_comment && style == style::COMMENT {
                level_current += 1;
            } else if in_comment && style != style::COMMENT {
                level_current -= 1;
            }
            in_comment = style == style::COMMENT;
        }
        if style == style::OPERATOR {
            match ch {
                b'{' => level_current += 1,
                b'}' => level_current -= 1,
                _ => {}
            }
        }
        if at_eol {
            let mut level = level_prev;
            if visible_chars == 0 && fold_compact {
                level |= FOLD_LEVEL_WHITE_FLAG;
            }
            if level_current > level_prev && visible_chars > 0 {
                level |= FOLD_LEVEL_HEADER_FLAG;
            }
            styler.set_level(line_current, level);
            line_current += 1;
            level_prev = level_current;
            visible_chars = 0;
        }
        if !is_a_space(u32::from(ch)) {
            visible_chars += 1;
        }
    }
    let flags_next = styler.level(line_current) & !FOLD_LEVEL_NUMBER_MASK;
    styler.set_level(line_current, level_prev | flags_next);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators() {
        for ch in "{}:;.#!@$&[]()".chars() {
            assert!(is_scss_operator(ch as u32), "{ch}");
        }
        assert!(!is_scss_operator('a' as u32));
        assert!(!is_scss_operator('/' as u32));
    }

    #[test]
    fn test_line_state_keeps_every_field() {
        let state = ScssState {
            last_state: Some(style::COMMENTLINE),
            last_state_comment: Some(style::DEFAULT),
            last_state_string: None,
            op: Some(Operator {
                ch: b'&',
                after_colon: true,
            }),
        };
        assert_eq!(ScssState::unpack(state.pack()), state);
        assert_eq!(ScssState::unpack(0), ScssState::default());
    }

    #[test]
    fn test_word_chars() {
        assert!(is_word('-' as u32));
        assert!(is_word('&' as u32));
        assert!(is_word(0xC3));
        assert!(!is_word(':' as u32));
    }
}
