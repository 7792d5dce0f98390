//! The editor surface the engine decorates.

use std::cell::RefCell;
use std::ops;
use std::rc::{Rc, Weak};

use chipmark_primitives::{Annotation, CharIdx, ChangeSet, EditError, Selection};
use smallvec::SmallVec;

/// Shared ownership of a view, held by whoever drives the editor.
pub type SharedView = Rc<RefCell<dyn EditorHost>>;

/// Non-owning view handle held by chips and the edit protocol.
///
/// A handle that no longer upgrades means the view was torn down.
pub type ViewHandle = Weak<RefCell<dyn EditorHost>>;

bitflags::bitflags! {
	/// Structural zones a position can fall into.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct ZoneTags: u8 {
		/// Inside a fenced code block, fence lines included.
		const CODE_BLOCK = 1 << 0;
		/// Inside the leading frontmatter block, delimiters included.
		const FRONTMATTER = 1 << 1;
	}
}

impl ZoneTags {
	/// Zones in which chips are never shown.
	pub const SUPPRESSED: Self = Self::CODE_BLOCK.union(Self::FRONTMATTER);
}

/// One line of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
	/// Zero-based line number.
	pub number: usize,
	/// Char offset of the first character.
	pub start: CharIdx,
	/// Char offset just before the line break.
	pub end: CharIdx,
	/// Line text without the line break.
	pub text: String,
}

/// A single replace-range edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRequest {
	/// Start of the replaced range.
	pub from: CharIdx,
	/// End of the replaced range (exclusive).
	pub to: CharIdx,
	/// Replacement text; empty deletes.
	pub insert: String,
}

/// A change notification from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewUpdate {
	/// Document revision after the update.
	pub revision: u64,
	/// Text changes, present iff the document text changed.
	pub changes: Option<ChangeSet>,
	/// The visible range moved or the view mode changed.
	pub viewport_changed: bool,
	/// The selection was set explicitly.
	pub selection_set: bool,
	/// Annotations of the transaction that produced the update.
	pub annotations: SmallVec<[Annotation; 1]>,
}

impl ViewUpdate {
	/// Returns true if the update carries `annotation`.
	pub fn has_annotation(&self, annotation: Annotation) -> bool {
		self.annotations.contains(&annotation)
	}

	/// Returns true if the document text changed.
	pub fn doc_changed(&self) -> bool {
		self.changes.as_ref().is_some_and(|cs| !cs.is_identity())
	}
}

/// The text surface chips are drawn on.
///
/// Positions are char offsets into the current revision. Implementations
/// must apply [`EditorHost::apply_edit`] atomically: a refused edit leaves
/// the document untouched.
pub trait EditorHost {
	/// Current length in chars.
	fn len_chars(&self) -> usize;

	/// Number of lines; an empty document has one line.
	fn line_count(&self) -> usize;

	/// The line with the given number.
	fn line(&self, number: usize) -> Option<Line>;

	/// The line containing `pos`, clamped to the document.
	fn line_at(&self, pos: CharIdx) -> Line;

	/// Structural zones at `pos`.
	fn classify(&self, pos: CharIdx) -> ZoneTags;

	/// Current selection.
	fn selection(&self) -> &Selection;

	/// Visible char range.
	fn viewport(&self) -> ops::Range<CharIdx>;

	/// Whether the view renders decorations (live preview) or raw source.
	fn is_live_preview(&self) -> bool;

	/// Current document revision.
	fn revision(&self) -> u64;

	/// Maps a position taken at `since` to the current revision.
	///
	/// Returns `None` if the host no longer remembers that revision.
	fn map_pos(&self, since: u64, pos: CharIdx) -> Option<CharIdx>;

	/// Applies one replace-range edit, returning the new revision.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if the range is invalid or the document is
	/// read-only; the document is unchanged in that case.
	fn apply_edit(&mut self, request: EditRequest, annotation: Option<Annotation>) -> Result<u64, EditError>;

	/// Drains pending change notifications, oldest first.
	fn take_updates(&mut self) -> Vec<ViewUpdate>;
}

/// Returns a weak handle to `view`.
pub fn handle(view: &SharedView) -> ViewHandle {
	Rc::downgrade(view)
}

/// Returns the line numbers touched by `changes` in the new document.
///
/// Overlapping line ranges of neighbouring changes are merged.
pub fn touched_lines(host: &dyn EditorHost, changes: &ChangeSet) -> Vec<ops::Range<usize>> {
	let mut out: Vec<ops::Range<usize>> = Vec::new();
	for range in changes.changed_ranges() {
		let first = host.line_at(range.from_b).number;
		let last = host.line_at(range.to_b).number;
		match out.last_mut() {
			Some(prev) if prev.end >= first => prev.end = prev.end.max(last + 1),
			_ => out.push(first..last + 1),
		}
	}
	out
}
