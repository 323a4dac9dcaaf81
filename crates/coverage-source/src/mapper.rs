//! Remapping of generated byte ranges onto original line/column ranges.
//!
//! Ranges are end-exclusive while source maps only store points. The start of
//! a range maps directly. The end is found by stepping back one column into
//! the range, mapping that point, and then asking the map which generated
//! point follows the original position found. That following point is the
//! exclusive boundary of the original range.

use crate::line_index::LineIndex;
use source_map::{Bias, ByteOffset, OriginalPosition, SourceMapConsumer, Span};
use tracing::trace;

/// The end column of a remapped range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndColumn {
    /// A concrete 0-based column.
    At(u32),
    /// The range runs to the end of the line.
    Unbounded,
}

impl EndColumn {
    /// The column as a number, with `Unbounded` saturating to `u32::MAX`.
    ///
    /// Suitable for [`LineIndex::relative_to_offset`], which clamps to the line end.
    pub fn as_column(self) -> u32 {
        match self {
            EndColumn::At(column) => column,
            EndColumn::Unbounded => u32::MAX,
        }
    }
}

/// A generated range expressed in original coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalRange {
    /// The original source both ends map into.
    pub source: String,
    /// 1-based original start line.
    pub start_line: u32,
    /// 0-based start column relative to `start_line`.
    pub rel_start_col: u32,
    /// 1-based original end line.
    pub end_line: u32,
    /// End column relative to `end_line`.
    pub rel_end_col: EndColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EndPosition<'a> {
    source: &'a str,
    line: u32,
    column: EndColumn,
}

/// Maps the generated range `[start, end)` onto the original source.
///
/// Returns `None` when the range touches no line, when either end has no
/// mapping, or when the ends map into different original sources.
pub fn offset_to_original_relative<M>(
    index: &LineIndex,
    map: &M,
    start: ByteOffset,
    end: ByteOffset,
) -> Option<OriginalRange>
where
    M: SourceMapConsumer + ?Sized,
{
    let lines = index.overlapping(Span::new(start, end));
    let (first, last) = (lines.first()?, lines.last()?);

    let start_column = u32::from(start).saturating_sub(first.start().into());
    let Some(start_pos) = original_position_try_both(map, first.number, start_column) else {
        trace!(line = first.number, column = start_column, "range start has no mapping");
        return None;
    };

    let end_column = u32::from(end).saturating_sub(last.start().into());
    let Some(mut end_pos) = original_end_position_for(map, last.number, end_column) else {
        trace!(line = last.number, column = end_column, "range end has no mapping");
        return None;
    };

    if start_pos.line == end_pos.line && end_pos.column == EndColumn::At(start_pos.column) {
        // A zero-width result: take the next mapping after the generated end
        // and stop one column before it.
        let upper = map.original_position_for(last.number, end_column, Bias::LeastUpperBound)?;
        end_pos = EndPosition {
            source: upper.source,
            line: upper.line,
            column: EndColumn::At(upper.column.saturating_sub(1)),
        };
    }

    if start_pos.source != end_pos.source {
        trace!(
            start = start_pos.source,
            end = end_pos.source,
            "range spans two original sources"
        );
        return None;
    }

    Some(OriginalRange {
        source: start_pos.source.to_owned(),
        start_line: start_pos.line,
        rel_start_col: start_pos.column,
        end_line: end_pos.line,
        rel_end_col: end_pos.column,
    })
}

/// Looks up a generated point with a lower-bound bias, then an upper-bound one.
pub fn original_position_try_both<M>(
    map: &M,
    line: u32,
    column: u32,
) -> Option<OriginalPosition<'_>>
where
    M: SourceMapConsumer + ?Sized,
{
    map.original_position_for(line, column, Bias::GreatestLowerBound)
        .or_else(|| map.original_position_for(line, column, Bias::LeastUpperBound))
}

/// Finds the original end of the range that ends, exclusively, at the given
/// generated point.
fn original_end_position_for<M>(map: &M, line: u32, column: u32) -> Option<EndPosition<'_>>
where
    M: SourceMapConsumer + ?Sized,
{
    let before_end = original_position_try_both(map, line, column.saturating_sub(1).max(1))?;

    let after_end = map
        .generated_position_for(
            before_end.source,
            before_end.line,
            before_end.column.saturating_add(1),
            Bias::LeastUpperBound,
        )
        .and_then(|generated| {
            map.original_position_for(generated.line, generated.column, Bias::GreatestLowerBound)
        });

    match after_end {
        Some(after) if after.line == before_end.line => Some(EndPosition {
            source: after.source,
            line: after.line,
            column: EndColumn::At(after.column),
        }),
        // Either the map ran out of mappings or the next one sits on another
        // original line: the range extends to the end of the line.
        _ => Some(EndPosition {
            source: before_end.source,
            line: before_end.line,
            column: EndColumn::Unbounded,
        }),
    }
}
