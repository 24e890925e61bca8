use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single config line. Always line-local: the loader logs it,
/// skips the line and keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("invalid key near '{0}'")]
    BadKey(String),

    #[error("invalid value near '{0}'")]
    BadValue(String),

    #[error("missing '=' after key '{0}'")]
    MissingEqSign(String),

    #[error("line ended before the value was complete: '{0}'")]
    UndefinedValue(String),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("cannot open config file '{path}': {source}")]
    CannotOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("variable '{0}' is already defined")]
    AlreadyDefined(String),
}
