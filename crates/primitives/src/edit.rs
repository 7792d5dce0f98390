use thiserror::Error;

use crate::range::CharIdx;

/// Reasons an edit can be refused before touching the document.
///
/// Every variant is produced before any text is modified: an edit either
/// applies completely or not at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
	/// The edit range reaches past the end of the document.
	#[error("edit range {from}..{to} is out of bounds for a document of {len} chars")]
	OutOfBounds {
		/// Start of the requested range.
		from: CharIdx,
		/// End of the requested range.
		to: CharIdx,
		/// Document length at the time of the request.
		len: CharIdx,
	},
	/// The edit range ends before it starts.
	#[error("edit range {from}..{to} is inverted")]
	InvalidRange {
		/// Start of the requested range.
		from: CharIdx,
		/// End of the requested range.
		to: CharIdx,
	},
	/// Changes within one transaction overlap or are not sorted.
	#[error("changes overlap or are out of order at {at}")]
	Unordered {
		/// Position of the first offending change.
		at: CharIdx,
	},
	/// The document refuses modifications.
	#[error("document is read-only")]
	ReadOnly,
}

/// A static tag attached to a transaction.
///
/// Listeners use annotations to tell where an edit came from without
/// inspecting its contents (e.g. an extension recognising its own writes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Annotation(&'static str);

impl Annotation {
	/// Creates an annotation with the given name.
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	/// Returns the annotation name.
	pub fn name(&self) -> &'static str {
		self.0
	}
}
