//! Byte offsets and half-open spans over source text.

use text_size::TextSize;

/// A byte offset into a source string.
pub type ByteOffset = TextSize;

/// A half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// The start byte offset (inclusive).
    pub start: ByteOffset,
    /// The end byte offset (exclusive).
    pub end: ByteOffset,
}

impl Span {
    /// Creates a new span from start and end byte offsets.
    #[inline]
    pub fn new(start: impl Into<ByteOffset>, end: impl Into<ByteOffset>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Creates a span from `usize` offsets, as produced by `str` indexing.
    ///
    /// Offsets past `u32::MAX` saturate.
    #[inline]
    pub fn from_usize(start: usize, end: usize) -> Self {
        let clamp = |offset: usize| u32::try_from(offset).unwrap_or(u32::MAX);
        Self::new(clamp(start), clamp(end))
    }

    /// Creates an empty span at the given offset.
    #[inline]
    pub fn empty(offset: impl Into<ByteOffset>) -> Self {
        let offset = offset.into();
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns the length of this span in bytes.
    ///
    /// Spans whose end precedes their start have length zero.
    #[inline]
    pub fn len(&self) -> TextSize {
        if self.end > self.start {
            self.end - self.start
        } else {
            TextSize::from(0)
        }
    }

    /// Returns true if this span covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Returns true if this span contains the given offset.
    #[inline]
    pub fn contains(&self, offset: ByteOffset) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Returns true if this span contains the given span entirely.
    #[inline]
    pub fn contains_span(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Returns true if the two spans share at least one byte.
    ///
    /// An empty `other` overlaps when its offset falls inside this span.
    #[inline]
    pub fn overlaps(&self, other: Span) -> bool {
        let other_end = if other.is_empty() {
            other.start + TextSize::from(1)
        } else {
            other.end
        };
        self.start < other_end && other.start < self.end
    }

    /// Returns the span with the end moved forward by `by` bytes.
    #[inline]
    pub fn widen_end(self, by: u32) -> Span {
        Span {
            start: self.start,
            end: self.end + TextSize::from(by),
        }
    }

    /// Returns the start and end as `usize`, for slicing.
    #[inline]
    pub fn to_usize_range(self) -> std::ops::Range<usize> {
        u32::from(self.start) as usize..u32::from(self.end) as usize
    }
}
