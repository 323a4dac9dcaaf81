//! Bias-aware lookups over a decoded source map.
//!
//! Source maps store discrete point correspondences. A lookup for a point that
//! has no exact mapping has to pick a direction: the nearest mapping at or
//! before the point, or the nearest at or after it. [`Bias`] names that
//! direction and [`SourceMapConsumer`] exposes both directions for generated
//! and original coordinates.
//!
//! Lines are 1-based and columns are 0-based on this interface.

use crate::SourceMapError;
use rustc_hash::FxHashMap;

/// Direction of search when a point has no exact mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Bias {
    /// The nearest mapping at or before the point.
    #[default]
    GreatestLowerBound,
    /// The nearest mapping at or after the point.
    LeastUpperBound,
}

/// A position in original (authored) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OriginalPosition<'a> {
    /// The original source file the mapping points into.
    pub source: &'a str,
    /// 1-based original line.
    pub line: u32,
    /// 0-based original column.
    pub column: u32,
}

/// A position in generated (executed) text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GeneratedPosition {
    /// 1-based generated line.
    pub line: u32,
    /// 0-based generated column.
    pub column: u32,
}

/// Point lookups in both directions of a source map.
pub trait SourceMapConsumer {
    /// Finds the original position for a generated point.
    ///
    /// Returns `None` when no mapping on the requested generated line
    /// satisfies the bias, or when the mapping found has no original source.
    fn original_position_for(
        &self,
        line: u32,
        column: u32,
        bias: Bias,
    ) -> Option<OriginalPosition<'_>>;

    /// Finds the generated position for an original point in `source`.
    ///
    /// Only the source has to match: the mapping found may sit on a later
    /// (or earlier) original line than the one requested.
    fn generated_position_for(
        &self,
        source: &str,
        line: u32,
        column: u32,
        bias: Bias,
    ) -> Option<GeneratedPosition>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Mapping {
    generated_line: u32,
    generated_column: u32,
    source: Option<u32>,
    original_line: u32,
    original_column: u32,
}

impl Mapping {
    fn generated_key(&self) -> (u32, u32) {
        (self.generated_line, self.generated_column)
    }

    fn original_key(&self) -> (u32, u32, u32) {
        (
            self.source.unwrap_or(u32::MAX),
            self.original_line,
            self.original_column,
        )
    }
}

/// A source map decoded into two sorted mapping tables.
#[derive(Debug, Clone, Default)]
pub struct DecodedSourceMap {
    sources: Vec<String>,
    source_ids: FxHashMap<String, u32>,
    /// All mappings, sorted by generated position.
    by_generated: Vec<Mapping>,
    /// Mappings with an original source, sorted by original position.
    by_original: Vec<Mapping>,
}

impl DecodedSourceMap {
    /// Parses a JSON source map.
    pub fn from_slice(json: &[u8]) -> Result<Self, SourceMapError> {
        let map = sourcemap::SourceMap::from_slice(json)?;
        Ok(Self::from(&map))
    }

    /// Returns the number of mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.by_generated.len()
    }

    /// Returns true if the map holds no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_generated.is_empty()
    }

    /// Returns the original source names in table order.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(String::as_str)
    }

    fn source_name(&self, id: u32) -> Option<&str> {
        self.sources.get(id as usize).map(String::as_str)
    }

    /// Picks the mapping for `key` in `table` according to `bias`.
    ///
    /// Among mappings with an equal key the first one in table order wins.
    fn search<K: Ord + Copy>(
        table: &[Mapping],
        key: K,
        key_of: impl Fn(&Mapping) -> K,
        bias: Bias,
    ) -> Option<&Mapping> {
        let found = match bias {
            Bias::GreatestLowerBound => {
                let idx = table.partition_point(|m| key_of(m) <= key);
                idx.checked_sub(1)?
            }
            Bias::LeastUpperBound => {
                let idx = table.partition_point(|m| key_of(m) < key);
                if idx == table.len() {
                    return None;
                }
                idx
            }
        };
        let found_key = key_of(&table[found]);
        let first = table[..found].partition_point(|m| key_of(m) < found_key);
        table.get(first)
    }
}

impl From<&sourcemap::SourceMap> for DecodedSourceMap {
    fn from(map: &sourcemap::SourceMap) -> Self {
        let sources: Vec<String> = map.sources().map(str::to_owned).collect();
        let mut source_ids = FxHashMap::default();
        for (id, name) in sources.iter().enumerate() {
            source_ids.entry(name.clone()).or_insert(id as u32);
        }

        let mut by_generated: Vec<Mapping> = map
            .tokens()
            .map(|token| {
                let source = token.get_source().map(|_| token.get_src_id());
                Mapping {
                    generated_line: token.get_dst_line() + 1,
                    generated_column: token.get_dst_col(),
                    source,
                    original_line: if source.is_some() {
                        token.get_src_line().saturating_add(1)
                    } else {
                        0
                    },
                    original_column: if source.is_some() {
                        token.get_src_col()
                    } else {
                        0
                    },
                }
            })
            .collect();
        by_generated.sort_by_key(|m| (m.generated_key(), m.original_key()));

        let mut by_original: Vec<Mapping> = by_generated
            .iter()
            .filter(|m| m.source.is_some())
            .copied()
            .collect();
        by_original.sort_by_key(|m| (m.original_key(), m.generated_key()));

        Self {
            sources,
            source_ids,
            by_generated,
            by_original,
        }
    }
}

impl SourceMapConsumer for DecodedSourceMap {
    fn original_position_for(
        &self,
        line: u32,
        column: u32,
        bias: Bias,
    ) -> Option<OriginalPosition<'_>> {
        if line == 0 {
            return None;
        }
        let mapping = Self::search(
            &self.by_generated,
            (line, column),
            Mapping::generated_key,
            bias,
        )?;
        if mapping.generated_line != line {
            return None;
        }
        let source = self.source_name(mapping.source?)?;
        Some(OriginalPosition {
            source,
            line: mapping.original_line,
            column: mapping.original_column,
        })
    }

    fn generated_position_for(
        &self,
        source: &str,
        line: u32,
        column: u32,
        bias: Bias,
    ) -> Option<GeneratedPosition> {
        let id = *self.source_ids.get(source)?;
        let mapping = Self::search(
            &self.by_original,
            (id, line, column),
            Mapping::original_key,
            bias,
        )?;
        if mapping.source != Some(id) {
            return None;
        }
        Some(GeneratedPosition {
            line: mapping.generated_line,
            column: mapping.generated_column,
        })
    }
}
