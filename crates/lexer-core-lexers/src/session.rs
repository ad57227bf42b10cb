//! Incremental styling driver.

use crate::LexerError;
use crate::Language;
use lexer_core::{Document, LexerModule, PropertySet, TextAccessor, WordList};
use lexer_core_lang::{LanguageDefinition, LanguageSet};
use std::ops::Range;

/// A lexer bound to its keyword sets and lexer options.
///
/// The session owns no document; every pass takes the document it styles.
/// Ranges are widened to whole lines and the style before the first line is
/// used as the initial state, so any line boundary is a valid restart point.
#[derive(Debug, Clone)]
pub struct LexerSession {
    module: &'static LexerModule,
    keywords: Vec<WordList>,
    properties: PropertySet,
}

impl LexerSession {
    /// Create a session with empty keyword sets.
    pub fn new(module: &'static LexerModule) -> Self {
        Self {
            module,
            keywords: vec![WordList::new(); module.word_list_count()],
            properties: PropertySet::new(),
        }
    }

    /// Create a session for a built-in lexer by name.
    pub fn for_language(name: &str) -> Result<Self, LexerError> {
        Language::from_name(name)
            .map(|language| Self::new(language.module()))
            .ok_or_else(|| LexerError::UnknownLexer(name.to_string()))
    }

    /// Create a session for a built-in lexer by numeric id.
    pub fn for_id(id: i32) -> Result<Self, LexerError> {
        Language::ALL
            .into_iter()
            .find(|language| language.module().id == id)
            .map(|language| Self::new(language.module()))
            .ok_or(LexerError::UnknownLexerId(id))
    }

    /// Create a session from a language definition.
    ///
    /// Every keyword key in the definition must name one of the lexer's
    /// keyword sets. The definition's options are kept and copied into a
    /// document by [`LexerSession::apply_properties`].
    pub fn from_definition(definition: &LanguageDefinition) -> Result<Self, LexerError> {
        let mut session = Self::for_language(definition.lexer_name())?;
        for (key, source) in &definition.keywords {
            session.set_keywords_by_key(key, &source.to_text())?;
        }
        session.properties = definition.property_set();
        Ok(session)
    }

    /// Create a session from the bundled definition for `name`, or with
    /// empty keyword sets when no definition ships for it.
    pub fn bundled(name: &str) -> Result<Self, LexerError> {
        let languages = LanguageSet::bundled()?;
        match languages.get(name) {
            Some(definition) => Self::from_definition(&definition),
            None => Self::for_language(name),
        }
    }

    /// The bound lexer.
    pub fn module(&self) -> &'static LexerModule {
        self.module
    }

    /// Keyword sets, indexed as the lexer's `WORD_LISTS`.
    pub fn keywords(&self) -> &[WordList] {
        &self.keywords
    }

    /// Lexer options carried from a definition.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// Replace keyword set `index` with the whitespace-separated `words`.
    ///
    /// Returns `true` if the set changed; out-of-range indices are ignored.
    pub fn set_keywords(&mut self, index: usize, words: &str) -> bool {
        match self.keywords.get_mut(index) {
            Some(list) => list.set(words),
            None => false,
        }
    }

    /// Replace the keyword set registered under `key`.
    pub fn set_keywords_by_key(&mut self, key: &str, words: &str) -> Result<bool, LexerError> {
        let index = self
            .module
            .word_list_index(key)
            .ok_or_else(|| LexerError::UnknownKeywordSet {
                lexer: self.module.name,
                key: key.to_string(),
            })?;
        Ok(self.set_keywords(index, words))
    }

    /// Copy the session's lexer options into `doc`.
    pub fn apply_properties(&self, doc: &mut Document) {
        doc.properties_mut().extend(&self.properties);
    }

    /// Colourise the lines covering `range`.
    pub fn colourise(&self, doc: &mut dyn TextAccessor, range: Range<usize>) {
        if let Some((start, length, init_style)) = line_span(doc, range) {
            self.module.lex(start, length, init_style, &self.keywords, doc);
        }
    }

    /// Recompute fold levels for the lines covering `range`.
    pub fn fold(&self, doc: &mut dyn TextAccessor, range: Range<usize>) {
        if let Some((start, length, init_style)) = line_span(doc, range) {
            self.module.fold(start, length, init_style, &self.keywords, doc);
        }
    }

    /// Colourise then fold the lines covering `range`.
    pub fn style_range(&self, doc: &mut dyn TextAccessor, range: Range<usize>) {
        self.colourise(doc, range.clone());
        self.fold(doc, range);
    }

    /// Style from the first invalid line through the line containing `end`.
    pub fn ensure_styled(&self, doc: &mut Document, end: usize) {
        let len = doc.len();
        let end = end.min(len);
        let styled = doc.end_styled();
        if styled >= end {
            return;
        }
        let start = doc.line_start(doc.line_of(styled));
        let end_line = doc.line_of(end);
        let stop = if end_line + 1 < doc.line_count() {
            doc.line_start(end_line + 1)
        } else {
            len
        };
        tracing::trace!(lexer = self.module.name, start, stop, "ensure styled");
        self.style_range(doc, start..stop);
        doc.set_end_styled(stop);
    }
}

/// Line-aligned `(start, length, init_style)` for `range`, or `None` when
/// there is nothing to style.
fn line_span(doc: &dyn TextAccessor, range: Range<usize>) -> Option<(usize, usize, u8)> {
    let end = range.end.min(doc.len());
    if range.start >= end {
        return None;
    }
    let start = doc.line_start(doc.line_of(range.start));
    let init_style = match start {
        0 => 0,
        _ => doc.style_at(start - 1),
    };
    Some((start, end - start, init_style))
}
