use super::types::{Bias, ChangedRange, Insertion, Operation, Tendril};
use crate::Rope;
use crate::range::{CharIdx, CharLen};
use crate::span::Span;

/// A sequence of operations representing a set of changes to a document.
///
/// Changes are stored as retain, delete and insert operations walking the
/// source document left to right, which makes applying them and mapping
/// positions through them a single linear pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChangeSet {
	/// Sequence of retain/delete/insert operations.
	pub(super) changes: Vec<Operation>,
	/// Length of the source document before changes.
	pub(super) len: usize,
	/// Length of the document after applying changes.
	pub(super) len_after: usize,
}

impl ChangeSet {
	/// Returns the length of the source document (before changes).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns the length of the document after applying changes.
	pub fn len_after(&self) -> usize {
		self.len_after
	}

	/// Returns true if this changeset contains no operations.
	pub fn is_empty(&self) -> bool {
		self.changes.is_empty()
	}

	/// Returns true if applying this changeset leaves the text unchanged.
	pub fn is_identity(&self) -> bool {
		self.changes.iter().all(|op| matches!(op, Operation::Retain(_)))
	}

	/// Returns a slice of all operations in this changeset.
	pub fn changes(&self) -> &[Operation] {
		&self.changes
	}

	/// Adds a retain operation, preserving N characters from the source.
	///
	/// Consecutive retain operations are merged.
	pub(crate) fn retain(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;
		self.len_after += n;

		if let Some(Operation::Retain(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Retain(n));
		}
	}

	/// Adds a delete operation, removing N characters from the source.
	///
	/// Consecutive delete operations are merged.
	pub(crate) fn delete(&mut self, n: CharLen) {
		if n == 0 {
			return;
		}

		self.len += n;

		if let Some(Operation::Delete(count)) = self.changes.last_mut() {
			*count += n;
		} else {
			self.changes.push(Operation::Delete(n));
		}
	}

	/// Adds an insert operation at the current position.
	///
	/// Inserts are kept ahead of an adjacent delete so that replacements
	/// always read as `Insert, Delete`.
	pub(crate) fn insert(&mut self, text: Tendril) {
		if text.is_empty() {
			return;
		}

		let ins = Insertion::new(text);
		self.len_after += ins.char_len;

		match self.changes.as_mut_slice() {
			[.., Operation::Insert(prev)] | [.., Operation::Insert(prev), Operation::Delete(_)] => {
				prev.text.push_str(&ins.text);
				prev.char_len += ins.char_len;
			}
			[.., last @ Operation::Delete(_)] => {
				let del = std::mem::replace(last, Operation::Insert(ins));
				self.changes.push(del);
			}
			_ => {
				self.changes.push(Operation::Insert(ins));
			}
		}
	}

	/// Applies this changeset to a document, modifying it in place.
	pub fn apply(&self, doc: &mut Rope) {
		if self.changes.is_empty() {
			return;
		}

		let mut pos = 0;
		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					pos += n;
				}
				Operation::Delete(n) => {
					doc.remove(pos..pos + n);
				}
				Operation::Insert(ins) => {
					doc.insert(pos, &ins.text);
					pos += ins.char_len;
				}
			}
		}
	}

	/// Maps a position through this changeset using the specified bias.
	///
	/// Positions inside a deleted region collapse to the start of the deletion.
	pub fn map_pos(&self, pos: CharIdx, bias: Bias) -> CharIdx {
		let mut old_pos = 0;
		let mut new_pos = 0;

		for op in &self.changes {
			if old_pos > pos {
				break;
			}

			match op {
				Operation::Retain(n) => {
					if old_pos + n > pos {
						return new_pos + (pos - old_pos);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					if old_pos + n > pos {
						return new_pos;
					}
					old_pos += n;
				}
				Operation::Insert(ins) => {
					if old_pos == pos && bias == Bias::Left {
						// Position is exactly at insert point, stay before
					} else {
						new_pos += ins.char_len;
					}
				}
			}
		}

		new_pos + (pos - old_pos)
	}

	/// Returns the regions touched by this changeset, in document order.
	///
	/// Adjacent delete/insert operations are reported as one replacement.
	pub fn changed_ranges(&self) -> Vec<ChangedRange> {
		let mut out = Vec::new();
		let mut old_pos = 0;
		let mut new_pos = 0;
		let mut open: Option<ChangedRange> = None;

		for op in &self.changes {
			match op {
				Operation::Retain(n) => {
					if let Some(range) = open.take() {
						out.push(range);
					}
					old_pos += n;
					new_pos += n;
				}
				Operation::Delete(n) => {
					let range = open.get_or_insert(ChangedRange {
						from_a: old_pos,
						to_a: old_pos,
						from_b: new_pos,
						to_b: new_pos,
					});
					old_pos += n;
					range.to_a = old_pos;
				}
				Operation::Insert(ins) => {
					let range = open.get_or_insert(ChangedRange {
						from_a: old_pos,
						to_a: old_pos,
						from_b: new_pos,
						to_b: new_pos,
					});
					new_pos += ins.char_len;
					range.to_b = new_pos;
				}
			}
		}

		if let Some(range) = open {
			out.push(range);
		}
		out
	}

	/// Maps a span through this changeset if none of its text was touched.
	///
	/// Returns `None` when a deletion overlaps the span or an insertion lands
	/// strictly inside it. Insertions on either boundary leave the span's
	/// text intact and only shift it.
	pub fn map_span(&self, span: Span) -> Option<Span> {
		let touched = self.changed_ranges().into_iter().any(|r| {
			if r.from_a == r.to_a {
				span.start() < r.from_a && r.from_a < span.end()
			} else {
				r.from_a < span.end() && r.to_a > span.start()
			}
		});
		if touched {
			return None;
		}

		Span::new(
			self.map_pos(span.start(), Bias::Right),
			self.map_pos(span.end(), Bias::Left),
		)
	}
}
