use lexer_core::{PropertySet, WordList};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// A keyword set written either as one whitespace-separated string or as a YAML list.
pub enum KeywordSource {
    /// `primary: "fn let match"`
    Text(String),
    /// `primary: [fn, let, match]`
    Words(Vec<String>),
}

impl KeywordSource {
    /// The words as one whitespace-separated string.
    pub fn to_text(&self) -> String {
        match self {
            KeywordSource::Text(text) => text.clone(),
            KeywordSource::Words(words) => words.join(" "),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
/// A lexer option value.
pub enum PropertyValue {
    /// `true`/`false`, stored as `1`/`0`.
    Bool(bool),
    /// Integer option.
    Int(i64),
    /// Free-form string option (e.g. explicit fold markers).
    Text(String),
}

impl PropertyValue {
    /// Render the value the way lexers read it.
    pub fn to_property_string(&self) -> String {
        match self {
            PropertyValue::Bool(true) => "1".to_string(),
            PropertyValue::Bool(false) => "0".to_string(),
            PropertyValue::Int(n) => n.to_string(),
            PropertyValue::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
/// Raw YAML language definition.
pub struct LanguageDefinition {
    /// Language name (e.g. `rust`).
    pub name: String,

    #[serde(default)]
    /// Lexer name; defaults to `name`.
    pub lexer: Option<String>,

    #[serde(default)]
    /// File extensions, without the leading dot.
    pub file_extensions: Vec<String>,

    #[serde(default)]
    /// Keyword sets keyed by the lexer's word-list key.
    pub keywords: BTreeMap<String, KeywordSource>,

    #[serde(default)]
    /// Lexer options.
    pub properties: BTreeMap<String, PropertyValue>,
}

impl LanguageDefinition {
    /// Lexer this definition configures.
    pub fn lexer_name(&self) -> &str {
        self.lexer.as_deref().unwrap_or(&self.name)
    }

    /// Keyword set `key` as a [`WordList`], if defined.
    pub fn word_list(&self, key: &str) -> Option<WordList> {
        self.keywords
            .get(key)
            .map(|source| WordList::from_words(&source.to_text()))
    }

    /// Lexer options as a [`PropertySet`].
    pub fn property_set(&self) -> PropertySet {
        let mut set = PropertySet::new();
        for (key, value) in &self.properties {
            set.set(key.as_str(), value.to_property_string());
        }
        set
    }

    /// Returns `true` if `extension` (with or without a leading dot) belongs to this language.
    pub fn matches_extension(&self, extension: &str) -> bool {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        self.file_extensions
            .iter()
            .any(|ext| ext.strip_prefix('.').unwrap_or(ext).eq_ignore_ascii_case(extension))
    }
}
