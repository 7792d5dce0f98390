use smallvec::{SmallVec, smallvec};

use crate::range::{CharIdx, Range};
use crate::span::Span;


/// The user's cursors and selected ranges.
///
/// Ranges are kept sorted and disjoint; overlapping ranges and duplicate
/// cursors collapse into one. Ranges that merely touch stay separate. A
/// selection is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	ranges: SmallVec<[Range; 1]>,
	primary: usize,
}

impl Selection {
	/// Creates a selection from a primary range plus any others.
	pub fn new(primary: Range, others: impl IntoIterator<Item = Range>) -> Self {
		let mut ranges: SmallVec<[Range; 1]> = smallvec![primary];
		ranges.extend(others);
		let mut selection = Self { ranges, primary: 0 };
		selection.normalize(primary);
		selection
	}

	/// Creates a single-range selection.
	pub fn single(anchor: CharIdx, head: CharIdx) -> Self {
		Range::new(anchor, head).into()
	}

	/// Creates a bare cursor.
	pub fn point(pos: CharIdx) -> Self {
		Self::single(pos, pos)
	}

	/// The range the cursor follows. After a merge this is the merged range.
	pub fn primary(&self) -> Range {
		self.ranges[self.primary]
	}

	/// All ranges in document order.
	pub fn ranges(&self) -> &[Range] {
		&self.ranges
	}

	/// Number of ranges; at least 1.
	#[allow(clippy::len_without_is_empty, reason = "a selection always holds a range")]
	pub fn len(&self) -> usize {
		self.ranges.len()
	}

	/// Iterates over ranges in document order.
	pub fn iter(&self) -> impl Iterator<Item = &Range> {
		self.ranges.iter()
	}

	/// Adds a range.
	pub fn push(&mut self, range: Range) {
		let primary = self.primary();
		self.ranges.push(range);
		self.normalize(primary);
	}

	/// Maps every range through `f`, keeping track of the primary.
	pub fn transform(&self, mut f: impl FnMut(&Range) -> Range) -> Self {
		let primary = f(&self.primary());
		let others = self
			.ranges
			.iter()
			.enumerate()
			.filter(|&(i, _)| i != self.primary)
			.map(|(_, r)| f(r));
		Self::new(primary, others)
	}

	/// Returns true if any range overlaps the span (see [`Span::overlaps`]).
	pub fn overlaps_span(&self, span: &Span) -> bool {
		self.ranges.iter().any(|r| span.overlaps(r))
	}

	/// Clamps every range to `max_char`.
	pub fn clamp(&mut self, max_char: CharIdx) {
		let primary = self.primary().clamp(max_char);
		for range in &mut self.ranges {
			*range = range.clamp(max_char);
		}
		self.normalize(primary);
	}

	fn normalize(&mut self, primary: Range) {
		if self.ranges.len() > 1 {
			self.ranges.sort_by_key(|r| (r.from(), r.to()));
			self.ranges.dedup_by(|next, kept| {
				let merge = kept.overlaps(next);
				if merge {
					*kept = kept.union(next);
				}
				merge
			});
		}
		self.primary = self
			.ranges
			.iter()
			.position(|r| *r == primary)
			.or_else(|| {
				self.ranges
					.iter()
					.position(|r| r.from() <= primary.from() && primary.to() <= r.to())
			})
			.unwrap_or(0);
	}
}

impl Default for Selection {
	fn default() -> Self {
		Self::point(0)
	}
}

impl From<Range> for Selection {
	fn from(range: Range) -> Self {
		Self {
			ranges: smallvec![range],
			primary: 0,
		}
	}
}
