//! Half-open character spans.

use crate::range::{CharIdx, CharLen, Range};

/// A non-empty, half-open range `[start, end)` of character offsets.
///
/// A span describes text at one document revision only. Once the document
/// changes it is stale and must be mapped or re-resolved before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
	start: CharIdx,
	end: CharIdx,
}

impl Span {
	/// Creates a span, returning `None` unless `start < end`.
	pub fn new(start: CharIdx, end: CharIdx) -> Option<Self> {
		(start < end).then_some(Self { start, end })
	}

	/// Returns the first covered offset.
	#[inline]
	pub fn start(&self) -> CharIdx {
		self.start
	}

	/// Returns the offset one past the last covered character.
	#[inline]
	pub fn end(&self) -> CharIdx {
		self.end
	}

	/// Returns the number of covered characters (always at least 1).
	#[inline]
	pub fn len(&self) -> CharLen {
		self.end - self.start
	}

	/// Returns true if `pos` is a covered character.
	#[inline]
	pub fn contains(&self, pos: CharIdx) -> bool {
		self.start <= pos && pos < self.end
	}

	/// Returns true if the selection range covers or sits strictly inside this span.
	///
	/// Equivalent to `!(range.to <= start || range.from >= end)`: a cursor
	/// resting exactly on either boundary does not overlap.
	#[inline]
	pub fn overlaps(&self, range: &Range) -> bool {
		!(range.to() <= self.start || range.from() >= self.end)
	}

	/// Returns true if the two spans share at least one character.
	#[inline]
	pub fn intersects(&self, other: &Span) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Returns true if the span fits inside a document of `len` characters.
	#[inline]
	pub fn is_within(&self, len: CharLen) -> bool {
		self.end <= len
	}

	/// Returns the span as a standard range, for slicing ropes.
	#[inline]
	pub fn as_range(&self) -> std::ops::Range<CharIdx> {
		self.start..self.end
	}
}
