//! Source positions and source map lookups for coverage remapping.
//!
//! This crate provides byte spans over generated text and a decoded source map
//! that can be queried in either direction with an explicit search [`Bias`].

mod decoded;
mod error;
mod span;

pub use decoded::{Bias, DecodedSourceMap, GeneratedPosition, OriginalPosition, SourceMapConsumer};
pub use error::SourceMapError;
pub use span::{ByteOffset, Span};
