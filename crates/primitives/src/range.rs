/// A position in the text, measured in characters (not bytes).
///
/// Every offset exchanged between the engine and its host uses this unit.
pub type CharIdx = usize;

/// A length or count in the text, measured in characters (not bytes).
pub type CharLen = usize;

/// One selected range or cursor, as `anchor` and `head` offsets.
///
/// The covered text is `[from, to)` whichever way round the ends are; a
/// range with `anchor == head` is a bare cursor covering nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Range {
	/// The end that stays put while extending.
	pub anchor: CharIdx,
	/// The end that moves, where the cursor is drawn.
	pub head: CharIdx,
}

impl Range {
	/// Creates a range from anchor to head.
	pub fn new(anchor: CharIdx, head: CharIdx) -> Self {
		Self { anchor, head }
	}

	/// Creates a bare cursor at `pos`.
	pub fn point(pos: CharIdx) -> Self {
		Self::new(pos, pos)
	}

	/// Start of the covered text.
	#[inline]
	pub fn from(&self) -> CharIdx {
		self.anchor.min(self.head)
	}

	/// End of the covered text (exclusive).
	#[inline]
	pub fn to(&self) -> CharIdx {
		self.anchor.max(self.head)
	}

	/// Number of covered characters.
	#[inline]
	pub fn len(&self) -> CharLen {
		self.to() - self.from()
	}

	/// Returns true for a bare cursor.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.anchor == self.head
	}

	/// Applies `f` to both ends.
	pub fn map(self, mut f: impl FnMut(CharIdx) -> CharIdx) -> Self {
		Self {
			anchor: f(self.anchor),
			head: f(self.head),
		}
	}

	/// Returns true if the two ranges share text, or are cursors at the
	/// same offset.
	pub fn overlaps(&self, other: &Range) -> bool {
		(self.from() < other.to() && other.from() < self.to())
			|| (self.is_empty() && other.is_empty() && self.anchor == other.anchor)
	}

	/// The smallest forward range covering both.
	pub fn union(&self, other: &Range) -> Self {
		Self::new(self.from().min(other.from()), self.to().max(other.to()))
	}

	/// Clamps both ends to `max_char`.
	pub fn clamp(&self, max_char: CharIdx) -> Self {
		self.map(|pos| pos.min(max_char))
	}
}
