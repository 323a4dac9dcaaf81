//! Source map decoding errors.

use thiserror::Error;

/// An error raised while decoding a source map.
#[derive(Debug, Error)]
pub enum SourceMapError {
    /// The source map JSON could not be parsed.
    #[error("invalid source map: {0}")]
    Invalid(#[from] sourcemap::Error),
}
