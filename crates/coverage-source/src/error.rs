//! Error types for building a coverage source.

use thiserror::Error;

/// An error raised while indexing a source file.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// The parser rejected the source text.
    #[error("failed to parse source at byte {offset}: {message}")]
    Parse {
        /// The parser's description of the problem.
        message: String,
        /// The byte offset the parser reported.
        offset: u32,
    },

    /// Options could not be decoded.
    #[error("invalid source options: {message}")]
    InvalidOptions {
        /// A description of the problem.
        message: String,
    },
}
