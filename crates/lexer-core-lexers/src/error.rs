use lexer_core_lang::LanguageConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while selecting or configuring a lexer.
pub enum LexerError {
    #[error("unknown lexer '{0}'")]
    /// No built-in lexer has this name.
    UnknownLexer(String),

    #[error("unknown lexer id {0}")]
    /// No built-in lexer has this numeric id.
    UnknownLexerId(i32),

    #[error("lexer '{lexer}' has no keyword set '{key}'")]
    /// A definition names a keyword set the lexer does not consume.
    UnknownKeywordSet {
        /// Lexer name.
        lexer: &'static str,
        /// Offending key.
        key: String,
    },

    #[error("language configuration error: {0}")]
    /// Loading a language definition failed.
    Config(#[from] LanguageConfigError),
}
