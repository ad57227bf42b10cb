#![warn(missing_docs)]
//! `lexer-core-lang` - data-driven language definitions for `lexer-core`.
//!
//! A definition names the lexer it configures, the file extensions it claims,
//! its keyword sets (keyed by the lexer's word-list keys) and its lexer
//! options. Definitions are YAML documents:
//!
//! ```yaml
//! name: rust
//! file_extensions: [rs]
//! keywords:
//!   primary: fn let match
//! properties:
//!   fold: true
//! ```
//!
//! A bundled set covering every built-in lexer is available through
//! [`LanguageSet::bundled`].

mod definition;
mod error;
mod set;

pub use definition::{KeywordSource, LanguageDefinition, PropertyValue};
pub use error::LanguageConfigError;
pub use set::LanguageSet;
