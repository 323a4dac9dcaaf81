//! Coverage source indexing and remapping.
//!
//! This crate turns the executed text of one file into the structures a
//! coverage converter needs:
//! - Line records with byte spans and `c8 ignore next` state
//! - Ignored byte ranges from `t8 ignore next` / `t8 ignore rest` comments,
//!   resolved against the syntax tree
//! - Remapping of generated byte ranges onto original line/column ranges
//!   through a source map
//!
//! # Example
//!
//! ```
//! use coverage_source::{CoverageSource, ParserKind, SourceOptions};
//!
//! let text = "setup();\n// t8 ignore next\ndebugOnly();\nrun();\n";
//! let options = SourceOptions::new(0).with_parser(ParserKind::EcmaScript);
//! let source = CoverageSource::with_options(text, &options).unwrap();
//!
//! assert_eq!(source.lines().len(), 4);
//! assert_eq!(source.ignore_segments().len(), 1);
//! ```

mod directive;
mod error;
mod function;
mod ignore;
mod line_index;
mod mapper;
mod options;
mod report;
mod source;

pub use directive::{LineDirective, RangeDirective};
pub use error::SourceError;
pub use function::FunctionRecord;
pub use ignore::resolve_ignore_segments;
pub use line_index::{Line, LineIndex};
pub use mapper::{offset_to_original_relative, original_position_try_both, EndColumn, OriginalRange};
pub use options::{ParserKind, SourceOptions};
pub use report::{FunctionNode, Location, Position};
pub use source::CoverageSource;
pub use source_map::{ByteOffset, Span};
