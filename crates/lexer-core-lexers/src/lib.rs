#![warn(missing_docs)]
//! `lexer-core-lexers` - the built-in lexers for `lexer-core`.
//!
//! Each language lives in its own module and exposes a `style` module of
//! style ids, its keyword-set layout (`WORD_LISTS`) and a static registry
//! entry (`LEXER`). [`catalogue`] collects every entry; [`LexerSession`]
//! binds one to its keyword sets and drives incremental styling of a
//! [`lexer_core::Document`].
//!
//! ```
//! use lexer_core::Document;
//! use lexer_core_lexers::{LexerSession, r};
//!
//! let mut session = LexerSession::new(&r::LEXER);
//! session.set_keywords(0, "function if else");
//! let mut doc = Document::new("f <- function(x) x + 1\n");
//! let len = doc.text().len();
//! session.ensure_styled(&mut doc, len);
//! assert_eq!(doc.styles()[5], r::style::KWORD);
//! ```

pub mod gibiane;
pub mod haskell;
pub mod r;
pub mod rust;
pub mod scss;
pub mod sql;
pub mod tcl;

mod error;
mod session;

use lexer_core::{Catalogue, LexerModule};

pub use error::LexerError;
pub use session::LexerSession;

/// The built-in languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// Rust.
    Rust,
    /// Haskell.
    Haskell,
    /// TCL, with Tk and itcl keyword sets.
    Tcl,
    /// SCSS.
    Scss,
    /// GIBIANE, the Cast3M command language.
    Gibiane,
    /// R.
    R,
    /// SQL, with SQL*Plus commands and PLDoc keywords.
    Sql,
}

impl Language {
    /// Every built-in language.
    pub const ALL: [Language; 7] = [
        Language::Rust,
        Language::Haskell,
        Language::Tcl,
        Language::Scss,
        Language::Gibiane,
        Language::R,
        Language::Sql,
    ];

    /// Registry entry for this language.
    pub fn module(self) -> &'static LexerModule {
        match self {
            Language::Rust => &rust::LEXER,
            Language::Haskell => &haskell::LEXER,
            Language::Tcl => &tcl::LEXER,
            Language::Scss => &scss::LEXER,
            Language::Gibiane => &gibiane::LEXER,
            Language::R => &r::LEXER,
            Language::Sql => &sql::LEXER,
        }
    }

    /// Look a language up by its lexer name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|language| language.module().name.eq_ignore_ascii_case(name))
    }
}

/// A catalogue holding every built-in lexer.
pub fn catalogue() -> Catalogue {
    let mut catalogue = Catalogue::new();
    for language in Language::ALL {
        catalogue.add(language.module());
    }
    catalogue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_unique_ids() {
        let catalogue = catalogue();
        assert_eq!(catalogue.len(), Language::ALL.len());
        assert_eq!(catalogue.find_by_id(86).map(|m| m.name), Some("r"));
        assert_eq!(catalogue.find_by_name("SCSS").map(|m| m.id), Some(200));
    }

    #[test]
    fn test_language_names() {
        for language in Language::ALL {
            assert_eq!(Language::from_name(language.module().name), Some(language));
        }
        assert_eq!(Language::from_name("cobol"), None);
    }

    #[test]
    fn test_fold_entries() {
        assert!(!Language::Haskell.module().has_folder());
        assert!(!Language::Tcl.module().has_folder());
        assert!(Language::Gibiane.module().has_folder());
    }
}
