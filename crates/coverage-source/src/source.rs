//! The indexed view of one executed source file.

use crate::ignore::resolve_ignore_segments;
use crate::line_index::{Line, LineIndex};
use crate::mapper::{offset_to_original_relative, OriginalRange};
use crate::{SourceError, SourceOptions};
use source_map::{ByteOffset, SourceMapConsumer, Span};
use tracing::debug;

/// Lines, ignore state and offset bookkeeping for one source file.
#[derive(Debug, Clone)]
pub struct CoverageSource {
    index: LineIndex,
    ignore_segments: Vec<Span>,
    shebang_length: u32,
    wrapper_length: i64,
}

impl CoverageSource {
    /// Indexes `raw` with line directives only.
    pub fn new(raw: &str, wrapper_length: u32) -> Self {
        Self::index(raw, wrapper_length, Vec::new())
    }

    /// Indexes `raw`, resolving syntax-level directives when a parser is set.
    ///
    /// Fails only when the parser rejects the source.
    pub fn with_options(raw: &str, options: &SourceOptions) -> Result<Self, SourceError> {
        let text = raw.trim_end();
        let segments = match options.parser {
            Some(parser) => resolve_ignore_segments(text, parser)?,
            None => Vec::new(),
        };
        Ok(Self::index(raw, options.wrapper_length, segments))
    }

    fn index(raw: &str, wrapper_length: u32, ignore_segments: Vec<Span>) -> Self {
        let text = raw.trim_end();
        let shebang_length = shebang_length(text);
        let index = LineIndex::new(text);
        debug!(
            lines = index.line_count(),
            ignore_segments = ignore_segments.len(),
            shebang_length,
            "indexed coverage source"
        );
        Self {
            index,
            ignore_segments,
            shebang_length,
            wrapper_length: i64::from(wrapper_length) - i64::from(shebang_length),
        }
    }

    /// The line index.
    #[inline]
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// All lines in order.
    #[inline]
    pub fn lines(&self) -> &[Line] {
        self.index.lines()
    }

    /// The end-of-file offset, after trailing whitespace was trimmed.
    #[inline]
    pub fn eof(&self) -> ByteOffset {
        self.index.eof()
    }

    /// Length of the leading `#!` line, 0 when there is none.
    #[inline]
    pub fn shebang_length(&self) -> u32 {
        self.shebang_length
    }

    /// The wrapper length with the shebang length taken off.
    ///
    /// Negative when the shebang is longer than the wrapper.
    #[inline]
    pub fn wrapper_length(&self) -> i64 {
        self.wrapper_length
    }

    /// Byte ranges excluded by `t8 ignore` directives.
    #[inline]
    pub fn ignore_segments(&self) -> &[Span] {
        &self.ignore_segments
    }

    /// Returns the line containing `offset`.
    pub fn line_at(&self, offset: ByteOffset) -> Option<&Line> {
        self.index.line_at(offset)
    }

    /// Returns true if a line directive excludes the given line.
    pub fn is_ignored(&self, line: u32) -> bool {
        self.index.is_ignored(line)
    }

    /// Returns true if `offset` falls inside an ignore segment.
    pub fn is_offset_ignored(&self, offset: ByteOffset) -> bool {
        self.ignore_segments
            .iter()
            .any(|segment| segment.contains(offset))
    }

    /// Returns true if `range` lies entirely inside one ignore segment.
    pub fn is_range_ignored(&self, range: Span) -> bool {
        self.ignore_segments
            .iter()
            .any(|segment| segment.contains_span(range))
    }

    /// See [`LineIndex::relative_to_offset`].
    pub fn relative_to_offset(&self, line: u32, column: u32) -> ByteOffset {
        self.index.relative_to_offset(line, column)
    }

    /// Maps the generated range `[start, end)` onto the original source.
    ///
    /// `None` means the range should be kept in generated coordinates.
    pub fn offset_to_original_relative<M>(
        &self,
        map: &M,
        start: ByteOffset,
        end: ByteOffset,
    ) -> Option<OriginalRange>
    where
        M: SourceMapConsumer + ?Sized,
    {
        offset_to_original_relative(&self.index, map, start, end)
    }
}

fn shebang_length(text: &str) -> u32 {
    if !text.starts_with("#!") {
        return 0;
    }
    let end = text
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .unwrap_or(text.len());
    end as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ParserKind;
    use pretty_assertions::assert_eq;
    use text_size::TextSize;

    #[test]
    fn test_trailing_whitespace_is_trimmed() {
        let source = CoverageSource::new("a();\nb();\n\n   \n", 0);
        assert_eq!(source.lines().len(), 2);
        assert_eq!(source.eof(), TextSize::from(9));
        assert_eq!(source.lines()[1].end(), source.eof());
    }

    #[test]
    fn test_shebang_reduces_wrapper_length() {
        let source = CoverageSource::new("#!/usr/bin/env node\nmain();", 62);
        assert_eq!(source.shebang_length(), 19);
        assert_eq!(source.wrapper_length(), 43);

        let source = CoverageSource::new("#!/usr/bin/env node\nmain();", 0);
        assert_eq!(source.wrapper_length(), -19);
    }

    #[test]
    fn test_no_shebang() {
        let source = CoverageSource::new("main(); // #!", 10);
        assert_eq!(source.shebang_length(), 0);
        assert_eq!(source.wrapper_length(), 10);
    }

    #[test]
    fn test_without_parser_range_directives_are_plain_comments() {
        let text = "a();\n// t8 ignore next\nb();";
        let source = CoverageSource::with_options(text, &SourceOptions::new(0)).unwrap();
        assert!(source.ignore_segments().is_empty());
    }

    #[test]
    fn test_with_parser_collects_segments() {
        let text = "a();\n// t8 ignore next\nb();\nc();\n";
        let options = SourceOptions::new(0).with_parser(ParserKind::EcmaScript);
        let source = CoverageSource::with_options(text, &options).unwrap();
        assert_eq!(source.ignore_segments(), &[Span::new(4u32, 28u32)]);
        assert!(source.is_offset_ignored(TextSize::from(23)));
        assert!(!source.is_offset_ignored(TextSize::from(28)));
        assert!(source.is_range_ignored(Span::new(23u32, 27u32)));
        assert!(!source.is_range_ignored(Span::new(23u32, 30u32)));
    }

    #[test]
    fn test_parse_failure_is_fatal() {
        let options = SourceOptions::new(0).with_parser(ParserKind::TypeScript);
        let err = CoverageSource::with_options("let = ;;{", &options).unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
    }

    #[test]
    fn test_line_and_segment_directives_are_independent() {
        let text = "/* c8 ignore next */\na();\n// t8 ignore next\nb();";
        let options = SourceOptions::new(0).with_parser(ParserKind::EcmaScript);
        let source = CoverageSource::with_options(text, &options).unwrap();
        assert!(source.is_ignored(1));
        assert!(source.is_ignored(2));
        assert!(!source.is_ignored(4));
        assert_eq!(source.ignore_segments().len(), 1);
    }
}
