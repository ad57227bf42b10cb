//! Character predicates shared by lexers.
//!
//! Characters are decoded code points (or DBCS pairs) as produced by the
//! style cursor, so every predicate takes a `u32`. Values above 0x7F never
//! satisfy the ASCII classes.

/// Space, tab, or any of `\n \x0b \x0c \r`.
pub fn is_a_space(ch: u32) -> bool {
    ch == 0x20 || (0x09..=0x0D).contains(&ch)
}

/// Space or tab.
pub fn is_space_or_tab(ch: u32) -> bool {
    ch == 0x20 || ch == 0x09
}

/// `\r` or `\n`.
pub fn is_a_line_end(ch: u32) -> bool {
    ch == 0x0D || ch == 0x0A
}

/// Decimal digit.
pub fn is_a_digit(ch: u32) -> bool {
    (u32::from(b'0')..=u32::from(b'9')).contains(&ch)
}

/// Digit in `base` (2..=36), letters in either case.
pub fn is_a_digit_base(ch: u32, base: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| c.is_ascii() && c.is_digit(base))
}

/// ASCII hexadecimal digit.
pub fn is_a_hex_digit(ch: u32) -> bool {
    is_a_digit_base(ch, 16)
}

/// ASCII letter.
pub fn is_alpha(ch: u32) -> bool {
    is_upper_case(ch) || is_lower_case(ch)
}

/// ASCII letter or digit.
pub fn is_alphanumeric(ch: u32) -> bool {
    is_alpha(ch) || is_a_digit(ch)
}

/// ASCII upper-case letter.
pub fn is_upper_case(ch: u32) -> bool {
    (u32::from(b'A')..=u32::from(b'Z')).contains(&ch)
}

/// ASCII lower-case letter.
pub fn is_lower_case(ch: u32) -> bool {
    (u32::from(b'a')..=u32::from(b'z')).contains(&ch)
}

/// ASCII punctuation (printable, not alphanumeric, not space).
pub fn is_a_punctuation(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| c.is_ascii_punctuation())
}

/// One of ``%^&*()-+=|{}[]:;<>,/?!.~``.
pub fn is_operator(ch: u32) -> bool {
    char::from_u32(ch).is_some_and(|c| "%^&*()-+=|{}[]:;<>,/?!.~".contains(c))
}

/// Returns `true` if `ch` equals the ASCII byte `b`.
pub fn is(ch: u32, b: u8) -> bool {
    ch == u32::from(b)
}

/// Lower-case an ASCII letter, leaving everything else unchanged.
pub fn make_lower_case(ch: u32) -> u32 {
    if is_upper_case(ch) { ch + 32 } else { ch }
}

/// A 128-entry ASCII membership table with an optional "any non-ASCII" rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharacterSet {
    table: [bool; 128],
    value_after: bool,
}

/// Base classes a [`CharacterSet`] can start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterBase {
    /// No characters.
    None,
    /// ASCII letters.
    Alpha,
    /// Decimal digits.
    Digits,
    /// Letters and digits.
    AlphaNum,
}

impl CharacterSet {
    /// Build a set from a base class plus `extra` ASCII characters.
    ///
    /// When `value_after` is set, every character above 0x7F is a member.
    pub fn new(base: CharacterBase, extra: &str, value_after: bool) -> Self {
        let mut table = [false; 128];
        for (i, slot) in table.iter_mut().enumerate() {
            let ch = i as u32;
            *slot = match base {
                CharacterBase::None => false,
                CharacterBase::Alpha => is_alpha(ch),
                CharacterBase::Digits => is_a_digit(ch),
                CharacterBase::AlphaNum => is_alphanumeric(ch),
            };
        }
        for b in extra.bytes().filter(u8::is_ascii) {
            table[usize::from(b)] = true;
        }
        Self { table, value_after }
    }

    /// Membership test.
    pub fn contains(&self, ch: u32) -> bool {
        match usize::try_from(ch) {
            Ok(i) if i < 128 => self.table[i],
            _ => self.value_after,
        }
    }
}
