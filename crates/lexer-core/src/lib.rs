#![warn(missing_docs)]
//! `lexer-core` - the incremental styling and folding engine.
//!
//! Lexers are plain functions over a host-owned document. A colourise pass
//! walks a line-aligned range with a [`StyleContext`], classifies identifiers
//! against [`WordList`]s and commits `(range, style)` spans plus a packed
//! per-line state. A separate fold pass computes per-line fold levels from
//! the committed styles.
//!
//! ```text
//!  host document ──► TextAccessor ──► LexAccessor ──► StyleContext
//!       ▲                                                  │
//!       │            styles / line states / levels         ▼
//!       └────────────────────────────────────────── lexer (LexFn)
//!                                                          │
//!                            WordList[] ───────────────────┘
//! ```
//!
//! Modules:
//! - [`accessor`]: the host capability trait and character encodings
//! - [`document`]: an in-memory [`TextAccessor`] with edit support
//! - [`style_context`]: the streaming cursor
//! - [`word_list`], [`char_class`]: keyword sets and character predicates
//! - [`fold`], [`line_state`]: fold-level and line-state encodings
//! - [`module`]: the static registry of lexers

pub mod accessor;
pub mod char_class;
pub mod document;
pub mod fold;
pub mod intervals;
pub mod lex_accessor;
pub mod line_index;
pub mod line_state;
pub mod module;
pub mod properties;
pub mod style_context;
pub mod word_list;

pub use accessor::{CodePage, Encoding, TextAccessor};
pub use document::Document;
pub use fold::{
    FOLD_LEVEL_BASE, FOLD_LEVEL_HEADER_FLAG, FOLD_LEVEL_NUMBER_MASK, FOLD_LEVEL_WHITE_FLAG,
    FoldRegion,
};
pub use intervals::StyleRun;
pub use lex_accessor::LexAccessor;
pub use line_index::LineIndex;
pub use line_state::LineState;
pub use module::{Catalogue, LexFn, LexerModule, WordListSpec};
pub use properties::PropertySet;
pub use style_context::StyleContext;
pub use word_list::{WordList, keyword_set};
