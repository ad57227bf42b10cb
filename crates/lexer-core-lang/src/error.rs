use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading language definitions.
pub enum LanguageConfigError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("missing required field: {0}")]
    /// A required field was empty.
    MissingField(&'static str),

    #[error("duplicate language '{0}'")]
    /// Two definitions share a name.
    DuplicateLanguage(String),
}
