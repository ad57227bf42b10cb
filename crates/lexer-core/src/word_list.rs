//! Keyword sets queried by lexers.

/// A sorted set of keywords.
///
/// Lexers query membership only; hosts rebuild the list when configuration changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordList {
    words: Vec<String>,
}

static EMPTY: WordList = WordList { words: Vec::new() };

impl WordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from whitespace-separated words.
    pub fn from_words(text: &str) -> Self {
        let mut list = Self::new();
        list.set(text);
        list
    }

    /// Replace the contents with the whitespace-separated words of `text`.
    ///
    /// Returns `true` if the contents changed.
    pub fn set(&mut self, text: &str) -> bool {
        let mut words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
        words.sort_unstable();
        words.dedup();
        if words == self.words {
            return false;
        }
        self.words = words;
        true
    }

    /// Remove every word.
    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` when the list holds no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Words in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Exact membership test.
    pub fn in_list(&self, word: &str) -> bool {
        self.words
            .binary_search_by(|entry| entry.as_str().cmp(word))
            .is_ok()
    }

    /// Membership test allowing abbreviations.
    ///
    /// A listed word may contain `marker` to denote the shortest accepted
    /// abbreviation: with `rem~ark`, the inputs `rem`, `rema` and `remark` match
    /// but `re` and `remarks` do not.
    pub fn in_list_abbreviated(&self, word: &str, marker: char) -> bool {
        let Some(first) = word.chars().next() else {
            return false;
        };
        let start = self
            .words
            .partition_point(|entry| entry.chars().next().is_some_and(|c| c < first));
        self.words[start..]
            .iter()
            .take_while(|entry| entry.starts_with(first))
            .any(|entry| matches_abbreviation(entry, word, marker))
    }
}

fn matches_abbreviation(listed: &str, word: &str, marker: char) -> bool {
    let mut listed = listed.chars().peekable();
    let mut word = word.chars();
    let mut past_marker = false;
    for c in word.by_ref() {
        match listed.next() {
            Some(l) if l == c => {
                if listed.peek() == Some(&marker) {
                    past_marker = true;
                    listed.next();
                }
            }
            _ => return false,
        }
    }
    past_marker || listed.peek().is_none()
}

/// The list at `index`, or an empty list when the host supplied fewer sets.
pub fn keyword_set(keywords: &[WordList], index: usize) -> &WordList {
    keywords.get(index).unwrap_or(&EMPTY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_list() {
        let list = WordList::from_words("while fn  let\nfn if");
        assert_eq!(list.len(), 4);
        assert!(list.in_list("fn"));
        assert!(list.in_list("while"));
        assert!(!list.in_list("f"));
        assert!(!list.in_list("While"));
        assert!(!list.in_list(""));
    }

    #[test]
    fn test_set_reports_changes() {
        let mut list = WordList::new();
        assert!(list.set("b a"));
        assert!(!list.set("a b"));
        assert!(list.set("a"));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_in_list_abbreviated() {
        let list = WordList::from_words("rem~ark pro~mpt select");
        assert!(list.in_list_abbreviated("rem", '~'));
        assert!(list.in_list_abbreviated("rema", '~'));
        assert!(list.in_list_abbreviated("remark", '~'));
        assert!(!list.in_list_abbreviated("re", '~'));
        assert!(!list.in_list_abbreviated("remarks", '~'));
        assert!(list.in_list_abbreviated("pro", '~'));
        assert!(list.in_list_abbreviated("select", '~'));
        assert!(!list.in_list_abbreviated("sel", '~'));
        assert!(!list.in_list_abbreviated("", '~'));
    }

    #[test]
    fn test_keyword_set_out_of_range() {
        let sets = vec![WordList::from_words("a")];
        assert!(keyword_set(&sets, 0).in_list("a"));
        assert!(keyword_set(&sets, 5).is_empty());
    }
}
