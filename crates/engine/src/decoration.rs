//! The ordered set of active chips.

use chipmark_primitives::{CharIdx, ChangeSet};

use crate::error::{EngineError, Result};
use crate::widget::DateChip;

/// Non-overlapping chips ordered by start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecorationSet {
	chips: Vec<DateChip>,
}

impl DecorationSet {
	/// An empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a set from chips in any order.
	///
	/// # Errors
	///
	/// Returns [`EngineError::Overlap`] if two chips share text.
	pub fn from_chips(mut chips: Vec<DateChip>) -> Result<Self> {
		chips.sort_by_key(|chip| chip.span().start());
		ensure_disjoint(&chips)?;
		Ok(Self { chips })
	}

	/// Number of chips.
	pub fn len(&self) -> usize {
		self.chips.len()
	}

	/// Returns true if the set holds no chips.
	pub fn is_empty(&self) -> bool {
		self.chips.is_empty()
	}

	/// Iterates over chips in document order.
	pub fn iter(&self) -> impl Iterator<Item = &DateChip> {
		self.chips.iter()
	}

	/// The chip covering `pos`, if any.
	pub fn chip_at(&self, pos: CharIdx) -> Option<&DateChip> {
		let idx = self.chips.partition_point(|chip| chip.span().end() <= pos);
		self.chips.get(idx).filter(|chip| chip.span().contains(pos))
	}

	/// Removes every chip.
	pub fn clear(&mut self) {
		self.chips.clear();
	}

	/// Maps every chip through `changes`, now at `revision`.
	///
	/// Chips whose text was touched are dropped; the rest shift with the
	/// surrounding text.
	pub fn map(&mut self, changes: &ChangeSet, revision: u64) {
		self.chips = self
			.chips
			.iter()
			.filter_map(|chip| {
				let span = changes.map_span(chip.span())?;
				Some(chip.remapped(span, revision))
			})
			.collect();
	}

	/// Replaces the chips starting inside `[from, to]` with `fresh`.
	///
	/// # Errors
	///
	/// Returns [`EngineError::Overlap`] if the result would overlap; the set
	/// is unchanged in that case.
	pub fn splice(&mut self, from: CharIdx, to: CharIdx, fresh: Vec<DateChip>) -> Result<()> {
		let mut chips: Vec<DateChip> = self
			.chips
			.iter()
			.filter(|chip| !(from..=to).contains(&chip.span().start()))
			.cloned()
			.chain(fresh)
			.collect();
		chips.sort_by_key(|chip| chip.span().start());
		ensure_disjoint(&chips)?;
		self.chips = chips;
		Ok(())
	}
}

fn ensure_disjoint(chips: &[DateChip]) -> Result<()> {
	match chips.windows(2).find(|pair| pair[0].span().intersects(&pair[1].span())) {
		Some(pair) => Err(EngineError::Overlap {
			at: pair[1].span().start(),
		}),
		None => Ok(()),
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Weak;

	use chipmark_primitives::{Change, Rope, Span, Transaction};

	use super::*;
	use crate::{MarkdownView, PatternMatcher, SurfaceFormat};

	fn chip_at(start: usize, text: &'static str) -> DateChip {
		let matcher = PatternMatcher::new(SurfaceFormat::Marked);
		let token = matcher.matches_at(text, start).next().unwrap();
		DateChip::new(&token, SurfaceFormat::Marked, 0, Weak::<RefCell<MarkdownView>>::new())
	}

	#[test]
	fn chips_are_sorted_and_disjoint() {
		let set = DecorationSet::from_chips(vec![chip_at(40, "📅 2024-01-02"), chip_at(0, "📅 2024-01-01")]).unwrap();
		let starts: Vec<_> = set.iter().map(|c| c.span().start()).collect();
		assert_eq!(starts, vec![0, 40]);

		let overlap = DecorationSet::from_chips(vec![chip_at(0, "📅 2024-01-01"), chip_at(5, "📅 2024-01-02")]);
		assert_eq!(overlap, Err(EngineError::Overlap { at: 5 }));
	}

	#[test]
	fn hit_testing() {
		let set = DecorationSet::from_chips(vec![chip_at(10, "📅 2024-01-01"), chip_at(30, "📅 2024-01-02")]).unwrap();
		assert_eq!(set.chip_at(10).map(|c| c.value()), Some("2024-01-01"));
		assert_eq!(set.chip_at(21).map(|c| c.value()), Some("2024-01-01"));
		assert!(set.chip_at(22).is_none());
		assert!(set.chip_at(9).is_none());
		assert_eq!(set.chip_at(41).map(|c| c.value()), Some("2024-01-02"));
	}

	#[test]
	fn mapping_shifts_untouched_and_drops_touched() {
		let doc = Rope::from("📅 2024-01-01\n📅 2024-01-02");
		let mut set = DecorationSet::from_chips(vec![chip_at(0, "📅 2024-01-01"), chip_at(13, "📅 2024-01-02")]).unwrap();
		let tx = Transaction::change(
			doc.slice(..),
			[
				Change {
					start: 0,
					end: 0,
					replacement: Some("- ".into()),
				},
				Change {
					start: 16,
					end: 17,
					replacement: Some("9".into()),
				},
			],
		);
		set.map(tx.changes(), 1);
		assert_eq!(set.len(), 1);
		let first = set.iter().next().unwrap();
		assert_eq!(first.span(), Span::new(2, 14).unwrap());
		assert_eq!(first.revision(), 1);
	}

	#[test]
	fn splice_replaces_one_region() {
		let mut set = DecorationSet::from_chips(vec![chip_at(0, "📅 2024-01-01"), chip_at(20, "📅 2024-01-02")]).unwrap();
		set.splice(15, 40, vec![chip_at(25, "📅 2024-03-03")]).unwrap();
		let values: Vec<_> = set.iter().map(|c| c.value().to_string()).collect();
		assert_eq!(values, vec!["2024-01-01", "2024-03-03"]);

		let err = set.splice(15, 40, vec![chip_at(5, "📅 2024-04-04")]);
		assert!(err.is_err());
		assert_eq!(set.len(), 2);
	}
}
