use thiserror::Error;

/// Why a pattern could not be compiled. Positions are character indices
/// into the pattern as typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("pattern is empty")]
    EmptyPattern,

    #[error("character set opened at position {0} is never closed")]
    UnterminatedSet(usize),

    #[error("character set at position {0} has no members")]
    EmptySet(usize),

    #[error("invalid range `{start}-{end}` in character set")]
    InvalidRange { start: char, end: char },

    #[error("pattern ends with an unfinished escape")]
    TrailingEscape,

    #[error("`*` at position {0} does not follow a character or set")]
    NothingToRepeat(usize),

    #[error("a pattern cannot start or end with a repetition")]
    EdgeRepetition,
}

/// Failure to load or save a [`TextDocument`](crate::TextDocument).
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to access document: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid document JSON: {0}")]
    Json(#[from] serde_json::Error),
}
