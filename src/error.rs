//! Error types for corpus loading, configuration and session start-up.

use std::io;
use thiserror::Error;

/// Which configured corpus a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum CorpusKind {
    #[strum(serialize = "word list")]
    Words,
    #[strum(serialize = "practice texts")]
    PracticeTexts,
}

#[derive(Error, Debug)]
pub enum ArcadeError {
    #[error("No entries in the {0}; nothing can be spawned")]
    EmptyCorpus(CorpusKind),

    #[error("Custom text is empty after normalisation")]
    EmptyText,

    #[error("Embedded corpus file not found: {0}")]
    MissingEmbeddedCorpus(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArcadeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_corpus_message() {
        let err = ArcadeError::EmptyCorpus(CorpusKind::Words);
        assert_eq!(err.to_string(), "No entries in the word list; nothing can be spawned");

        let err = ArcadeError::EmptyCorpus(CorpusKind::PracticeTexts);
        assert_eq!(
            err.to_string(),
            "No entries in the practice texts; nothing can be spawned"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let err: ArcadeError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, ArcadeError::Io(_)));
    }
}
