//! Function coverage records.

use crate::report::{FunctionNode, Location, Position};
use smol_str::SmolStr;

/// One executable function as reported by the profiler.
///
/// Fields are taken as given: ordering of start and end and the execution
/// count are the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    /// The function name, or a synthesized one for anonymous functions.
    pub name: SmolStr,
    /// 1-indexed start line.
    pub start_line: u32,
    /// 0-indexed start column, relative to `start_line`.
    pub start_col: u32,
    /// 1-indexed end line.
    pub end_line: u32,
    /// 0-indexed end column, relative to `end_line`.
    pub end_col: u32,
    /// How many times the function ran.
    pub count: u64,
    /// Start as a byte offset into the file.
    pub absolute_start_col: u32,
    /// End as a byte offset into the file.
    pub absolute_end_col: u32,
}

impl FunctionRecord {
    /// Creates a record from the profiler's values, unchecked.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<SmolStr>,
        start_line: u32,
        start_col: u32,
        end_line: u32,
        end_col: u32,
        count: u64,
        absolute_start_col: u32,
        absolute_end_col: u32,
    ) -> Self {
        Self {
            name: name.into(),
            start_line,
            start_col,
            end_line,
            end_col,
            count,
            absolute_start_col,
            absolute_end_col,
        }
    }

    /// The function's extent as a report location.
    pub fn location(&self) -> Location {
        Location {
            start: Position {
                line: self.start_line,
                column: self.start_col,
            },
            end: Position {
                line: self.end_line,
                column: self.end_col,
            },
        }
    }

    /// Converts the record into its report node.
    pub fn to_report_node(&self) -> FunctionNode {
        let loc = self.location();
        FunctionNode {
            name: self.name.clone(),
            decl: loc,
            loc,
            line: self.start_line,
        }
    }
}
