//! Line records over generated source text.

use crate::directive::LineDirective;
use crate::report::{Location, Position};
use source_map::{ByteOffset, Span};
use text_size::TextSize;

/// One physical line of source text.
///
/// The span includes the line terminator, so consecutive lines are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    /// 1-indexed line number.
    pub number: u32,
    /// Absolute byte range of the line, terminator included.
    pub span: Span,
    /// Whether a line directive excludes this line from coverage.
    pub ignored: bool,
    /// Length of the line without its `\n` or `\r\n`.
    content_len: u32,
}

impl Line {
    fn new(number: u32, start: usize, raw: &str) -> Self {
        let content = raw
            .strip_suffix('\n')
            .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
            .unwrap_or(raw);
        Self {
            number,
            span: Span::from_usize(start, start + raw.len()),
            ignored: false,
            content_len: content.len() as u32,
        }
    }

    /// The absolute offset where the line starts.
    #[inline]
    pub fn start(&self) -> ByteOffset {
        self.span.start
    }

    /// The absolute offset just past the line terminator.
    #[inline]
    pub fn end(&self) -> ByteOffset {
        self.span.end
    }

    /// The report location of the line, terminator excluded.
    pub fn to_location(&self) -> Location {
        Location {
            start: Position {
                line: self.number,
                column: 0,
            },
            end: Position {
                line: self.number,
                column: self.content_len,
            },
        }
    }
}

/// Random-access line records for one source file.
#[derive(Debug, Clone)]
pub struct LineIndex {
    lines: Vec<Line>,
    eof: ByteOffset,
}

impl LineIndex {
    /// Splits `text` into lines and applies `c8 ignore next` directives.
    ///
    /// Empty text still has one (empty) line.
    pub fn new(text: &str) -> Self {
        let mut lines = Vec::new();
        let mut position = 0;
        let mut pending_ignores = 0u32;

        for (i, raw) in text.split_inclusive('\n').enumerate() {
            let mut line = Line::new(i as u32 + 1, position, raw);
            if pending_ignores > 0 {
                line.ignored = true;
                pending_ignores -= 1;
            } else if let Some(directive) = LineDirective::parse(raw) {
                line.ignored = true;
                pending_ignores = directive.following_lines();
            }
            lines.push(line);
            position += raw.len();
        }

        if lines.is_empty() {
            lines.push(Line::new(1, 0, ""));
        }

        Self {
            lines,
            eof: TextSize::from(text.len() as u32),
        }
    }

    /// Returns the number of lines.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns all lines in order.
    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Returns the end-of-file offset.
    #[inline]
    pub fn eof(&self) -> ByteOffset {
        self.eof
    }

    /// Returns the line with the given 1-indexed number.
    pub fn line(&self, number: u32) -> Option<&Line> {
        let idx = (number as usize).checked_sub(1)?;
        self.lines.get(idx)
    }

    /// Returns the line containing `offset`.
    ///
    /// The end-of-file offset belongs to the last line.
    pub fn line_at(&self, offset: ByteOffset) -> Option<&Line> {
        if offset == self.eof {
            return self.lines.last();
        }
        let idx = self.lines.partition_point(|line| line.end() <= offset);
        self.lines.get(idx).filter(|line| line.span.contains(offset))
    }

    /// Returns true if a line directive excludes the given line.
    pub fn is_ignored(&self, number: u32) -> bool {
        self.line(number).is_some_and(|line| line.ignored)
    }

    /// Returns the offset where a line starts.
    pub fn line_start(&self, number: u32) -> Option<ByteOffset> {
        self.line(number).map(Line::start)
    }

    /// Returns the offset where a line ends (after its terminator).
    pub fn line_end(&self, number: u32) -> Option<ByteOffset> {
        self.line(number).map(Line::end)
    }

    /// Returns the contiguous run of lines sharing bytes with `range`.
    ///
    /// A range starting at the end of file touches the last line, as
    /// [`LineIndex::line_at`] does.
    pub fn overlapping(&self, range: Span) -> &[Line] {
        if range.start == self.eof {
            let last = self.lines.len().saturating_sub(1);
            return &self.lines[last..];
        }
        let first = self.lines.partition_point(|line| line.end() <= range.start);
        let count = self.lines[first..]
            .iter()
            .take_while(|line| line.span.overlaps(range))
            .count();
        &self.lines[first..first + count]
    }

    /// Converts a line number and relative column into an absolute offset.
    ///
    /// Line 0 is treated as line 1, a missing line yields the end of file,
    /// and columns past the line are clamped to its end.
    pub fn relative_to_offset(&self, line: u32, column: u32) -> ByteOffset {
        let Some(line) = self.line(line.max(1)) else {
            return self.eof;
        };
        let offset = u32::from(line.start()).saturating_add(column);
        TextSize::from(offset).min(line.end())
    }
}
