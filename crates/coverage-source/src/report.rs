//! Report node shapes consumed by the coverage report renderer.

use serde::Serialize;
use smol_str::SmolStr;

/// A line/column position in a report (1-indexed line, 0-indexed column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Position {
    /// 1-indexed line.
    pub line: u32,
    /// 0-indexed column.
    pub column: u32,
}

/// A start/end pair of report positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Location {
    /// Where the span starts.
    pub start: Position,
    /// Where the span ends.
    pub end: Position,
}

/// The report entry for one function.
///
/// `decl` and `loc` carry the same span; the report format expects both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionNode {
    /// The function name reported by the profiler.
    pub name: SmolStr,
    /// The declaration span.
    pub decl: Location,
    /// The body span, equal to `decl`.
    pub loc: Location,
    /// The line the function starts on.
    pub line: u32,
}
