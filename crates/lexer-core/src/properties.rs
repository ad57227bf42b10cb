//! String-keyed lexer options (`fold`, `fold.compact`, `lexer.<lang>.*`, ...).

use std::collections::BTreeMap;

/// A set of `key=value` options read by lexers and folders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySet {
    values: BTreeMap<String, String>,
}

impl PropertySet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` lines. Blank lines, `#` comments and lines without `=` are skipped.
    pub fn parse(text: &str) -> Self {
        let mut set = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                set.set(key.trim(), value.trim());
            }
        }
        set
    }

    /// Set a value, replacing any previous one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Remove a value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Integer value for `key`; see [`parse_property_int`].
    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        parse_property_int(self.get(key), default)
    }

    /// Copy every entry of `other` into this set.
    pub fn extend(&mut self, other: &PropertySet) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Iterate `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when no option is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Interpret a property value as an integer.
///
/// Missing or empty values yield `default`. Otherwise the leading
/// (optionally signed) decimal digits are parsed, and a value with no leading
/// digits yields 0.
pub fn parse_property_int(value: Option<&str>, default: i32) -> i32 {
    let Some(value) = value else {
        return default;
    };
    if value.is_empty() {
        return default;
    }
    let trimmed = value.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let mut result: i32 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        result = result.wrapping_mul(10).wrapping_add(i32::from(b - b'0'));
    }
    if negative { result.wrapping_neg() } else { result }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_int_rules() {
        assert_eq!(parse_property_int(None, 7), 7);
        assert_eq!(parse_property_int(Some(""), 7), 7);
        assert_eq!(parse_property_int(Some("1"), 7), 1);
        assert_eq!(parse_property_int(Some("  -3x"), 7), -3);
        assert_eq!(parse_property_int(Some("yes"), 7), 0);
    }

    #[test]
    fn test_parse_lines() {
        let props = PropertySet::parse("# folding\nfold=1\n\nfold.compact = 0\nbogus\n");
        assert_eq!(props.len(), 2);
        assert_eq!(props.get_int("fold", 0), 1);
        assert_eq!(props.get_int("fold.compact", 1), 0);
        assert_eq!(props.get("bogus"), None);
    }
}
