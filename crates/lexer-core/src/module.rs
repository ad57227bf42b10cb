//! The lexer registry: one static entry per language.

use crate::accessor::TextAccessor;
use crate::word_list::WordList;

/// Signature shared by colourise and fold entry points.
///
/// Arguments are `(start, length, init_style, keyword_sets, accessor)`.
pub type LexFn = fn(usize, usize, u8, &[WordList], &mut dyn TextAccessor);

/// Metadata describing one keyword set a lexer consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordListSpec {
    /// Stable key used by configuration files (e.g. `"keywords"`, `"types"`).
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// Registration record tying a language id to its entry points.
#[derive(Debug)]
pub struct LexerModule {
    /// Stable numeric language id.
    pub id: i32,
    /// Stable lower-case language name.
    pub name: &'static str,
    /// Colourise entry point.
    pub lexer: LexFn,
    /// Fold entry point, if the language folds in a separate pass.
    pub folder: Option<LexFn>,
    /// Ordered keyword sets.
    pub word_lists: &'static [WordListSpec],
}

impl LexerModule {
    /// Number of keyword sets.
    pub fn word_list_count(&self) -> usize {
        self.word_lists.len()
    }

    /// Index of the keyword set registered under `key`.
    pub fn word_list_index(&self, key: &str) -> Option<usize> {
        self.word_lists.iter().position(|spec| spec.key == key)
    }

    /// Returns `true` if the language has a separate fold pass.
    pub fn has_folder(&self) -> bool {
        self.folder.is_some()
    }

    /// Colourise `start..start + length`.
    pub fn lex(
        &self,
        start: usize,
        length: usize,
        init_style: u8,
        keywords: &[WordList],
        accessor: &mut dyn TextAccessor,
    ) {
        tracing::debug!(lexer = self.name, start, length, init_style, "colourise");
        (self.lexer)(start, length, init_style, keywords, accessor);
    }

    /// Fold `start..start + length`; a no-op for languages without a folder.
    pub fn fold(
        &self,
        start: usize,
        length: usize,
        init_style: u8,
        keywords: &[WordList],
        accessor: &mut dyn TextAccessor,
    ) {
        if let Some(folder) = self.folder {
            tracing::debug!(lexer = self.name, start, length, "fold");
            folder(start, length, init_style, keywords, accessor);
        }
    }
}

/// A lookup table of registered modules.
#[derive(Debug, Default, Clone)]
pub struct Catalogue {
    modules: Vec<&'static LexerModule>,
}

impl Catalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A module with the same id replaces the earlier one.
    pub fn add(&mut self, module: &'static LexerModule) {
        if let Some(slot) = self.modules.iter_mut().find(|m| m.id == module.id) {
            *slot = module;
        } else {
            self.modules.push(module);
        }
    }

    /// Find a module by numeric id.
    pub fn find_by_id(&self, id: i32) -> Option<&'static LexerModule> {
        self.modules.iter().copied().find(|m| m.id == id)
    }

    /// Find a module by name, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<&'static LexerModule> {
        self.modules
            .iter()
            .copied()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Registered modules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &'static LexerModule> + '_ {
        self.modules.iter().copied()
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
