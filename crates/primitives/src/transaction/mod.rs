//! Change sets and the transactions that carry them.

mod changeset;
mod types;


pub use changeset::ChangeSet;
use smallvec::SmallVec;
pub use types::{Bias, Change, ChangedRange, Insertion, Operation, Tendril};

use crate::edit::{Annotation, EditError};
use crate::{Rope, RopeSlice, Selection};

/// A set of changes plus the annotations describing where they came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
	changes: ChangeSet,
	annotations: SmallVec<[Annotation; 1]>,
}

impl Transaction {
	/// Builds a transaction from sorted, non-overlapping changes.
	///
	/// Callers must pass changes in document order that fit inside `doc`;
	/// use [`Transaction::try_change`] for untrusted input.
	pub fn change<I>(doc: RopeSlice, changes: I) -> Self
	where
		I: IntoIterator<Item = Change>,
	{
		let len = doc.len_chars();
		let mut cs = ChangeSet::default();
		let mut last = 0;

		for change in changes {
			debug_assert!(change.start >= last && change.start <= change.end && change.end <= len);
			cs.retain(change.start - last);
			cs.delete(change.end - change.start);
			if let Some(text) = change.replacement {
				cs.insert(text);
			}
			last = change.end;
		}
		cs.retain(len - last);

		Self {
			changes: cs,
			annotations: SmallVec::new(),
		}
	}

	/// Validates the changes against `doc` before building the transaction.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if a change is inverted, reaches past the end of
	/// the document, or overlaps/precedes the previous change.
	pub fn try_change<I>(doc: RopeSlice, changes: I) -> Result<Self, EditError>
	where
		I: IntoIterator<Item = Change>,
	{
		let len = doc.len_chars();
		let mut last = 0;
		let mut checked = Vec::new();

		for change in changes {
			if change.start > change.end {
				return Err(EditError::InvalidRange {
					from: change.start,
					to: change.end,
				});
			}
			if change.end > len {
				return Err(EditError::OutOfBounds {
					from: change.start,
					to: change.end,
					len,
				});
			}
			if change.start < last {
				return Err(EditError::Unordered { at: change.start });
			}
			last = change.end;
			checked.push(change);
		}

		Ok(Self::change(doc, checked))
	}

	/// Replaces every selection range with `text`.
	///
	/// Bare cursors receive a plain insertion.
	pub fn insert(doc: RopeSlice, selection: &Selection, text: Tendril) -> Self {
		let changes = selection.iter().map(|r| Change {
			start: r.from(),
			end: r.to(),
			replacement: Some(text.clone()),
		});
		Self::change(doc, changes)
	}

	/// Deletes the text covered by every non-empty selection range.
	pub fn delete(doc: RopeSlice, selection: &Selection) -> Self {
		let changes = selection.iter().filter(|r| !r.is_empty()).map(|r| Change {
			start: r.from(),
			end: r.to(),
			replacement: None,
		});
		Self::change(doc, changes)
	}

	/// Attaches an annotation.
	pub fn with_annotation(mut self, annotation: Annotation) -> Self {
		if !self.annotations.contains(&annotation) {
			self.annotations.push(annotation);
		}
		self
	}

	/// Returns the attached annotations.
	pub fn annotations(&self) -> &[Annotation] {
		&self.annotations
	}

	/// Returns true if `annotation` is attached.
	pub fn has_annotation(&self, annotation: Annotation) -> bool {
		self.annotations.contains(&annotation)
	}

	/// Returns the underlying change set.
	pub fn changes(&self) -> &ChangeSet {
		&self.changes
	}

	/// Splits the transaction into its change set and annotations.
	pub fn into_parts(self) -> (ChangeSet, SmallVec<[Annotation; 1]>) {
		(self.changes, self.annotations)
	}

	/// Applies the changes to `doc`.
	pub fn apply(&self, doc: &mut Rope) {
		self.changes.apply(doc);
	}

	/// Maps every selection endpoint through the changes.
	///
	/// Endpoints sitting on an insertion point move past the inserted text,
	/// so cursors follow what is typed at them.
	pub fn map_selection(&self, selection: &Selection) -> Selection {
		selection.transform(|r| r.map(|pos| self.changes.map_pos(pos, Bias::Right)))
	}
}
