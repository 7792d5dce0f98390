//! In-memory markdown view implementing [`EditorHost`].

use std::collections::VecDeque;
use std::ops;

use chipmark_primitives::transaction::Change;
use chipmark_primitives::{Annotation, Bias, CharIdx, ChangeSet, EditError, Selection, Transaction, line_bounds};
use ropey::Rope;

use crate::host::{EditRequest, EditorHost, Line, ViewUpdate, ZoneTags};


/// Number of change sets kept for [`EditorHost::map_pos`].
const HISTORY_LIMIT: usize = 256;

/// A markdown document with a selection, a viewport and a change log.
///
/// Every committed transaction bumps the revision, maps the selection and
/// viewport, records its change set and queues a [`ViewUpdate`]. Selection
/// and viewport changes queue updates without bumping the revision.
#[derive(Debug)]
pub struct MarkdownView {
	text: Rope,
	selection: Selection,
	viewport: ops::Range<CharIdx>,
	live_preview: bool,
	readonly: bool,
	revision: u64,
	/// `(revision_after, changes)`, oldest first.
	history: VecDeque<(u64, ChangeSet)>,
	/// Zone tags per line.
	zones: Vec<ZoneTags>,
	outbox: Vec<ViewUpdate>,
}

impl MarkdownView {
	/// Creates a view showing the whole of `text` in live preview.
	pub fn new(text: &str) -> Self {
		let text = Rope::from(text);
		let len = text.len_chars();
		let zones = classify_lines(&text);
		Self {
			text,
			selection: Selection::point(0),
			viewport: 0..len,
			live_preview: true,
			readonly: false,
			revision: 0,
			history: VecDeque::new(),
			zones,
			outbox: Vec::new(),
		}
	}

	/// Returns the document text.
	pub fn content(&self) -> &Rope {
		&self.text
	}

	/// Returns the document as a string.
	pub fn text(&self) -> String {
		self.text.to_string()
	}

	/// Applies a user transaction made of sorted, non-overlapping changes.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if the changes are out of bounds or unordered,
	/// or the view is read-only.
	pub fn edit<I>(&mut self, changes: I) -> Result<u64, EditError>
	where
		I: IntoIterator<Item = Change>,
	{
		self.ensure_writable()?;
		let tx = Transaction::try_change(self.text.slice(..), changes)?;
		Ok(self.commit(tx))
	}

	/// Inserts `text` at `pos` as a user edit.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if `pos` is past the end or the view is read-only.
	pub fn insert(&mut self, pos: CharIdx, text: &str) -> Result<u64, EditError> {
		self.edit([Change {
			start: pos,
			end: pos,
			replacement: Some(text.to_string()),
		}])
	}

	/// Deletes `[from, to)` as a user edit.
	///
	/// # Errors
	///
	/// Returns [`EditError`] if the range is invalid or the view is read-only.
	pub fn delete(&mut self, from: CharIdx, to: CharIdx) -> Result<u64, EditError> {
		self.edit([Change {
			start: from,
			end: to,
			replacement: None,
		}])
	}

	/// Replaces the selection.
	pub fn set_selection(&mut self, mut selection: Selection) {
		selection.clamp(self.text.len_chars());
		self.selection = selection;
		self.outbox.push(ViewUpdate {
			revision: self.revision,
			selection_set: true,
			..ViewUpdate::default()
		});
	}

	/// Moves the viewport to `range`, clamped to the document.
	pub fn scroll_to(&mut self, range: ops::Range<CharIdx>) {
		let len = self.text.len_chars();
		let start = range.start.min(len);
		self.viewport = start..range.end.clamp(start, len);
		self.outbox.push(ViewUpdate {
			revision: self.revision,
			viewport_changed: true,
			..ViewUpdate::default()
		});
	}

	/// Switches between live preview and source mode.
	pub fn set_live_preview(&mut self, live_preview: bool) {
		if self.live_preview == live_preview {
			return;
		}
		self.live_preview = live_preview;
		self.outbox.push(ViewUpdate {
			revision: self.revision,
			viewport_changed: true,
			..ViewUpdate::default()
		});
	}

	/// Marks the view read-only.
	pub fn set_readonly(&mut self, readonly: bool) {
		self.readonly = readonly;
	}

	/// Returns true if the view refuses edits.
	pub fn is_readonly(&self) -> bool {
		self.readonly
	}

	fn ensure_writable(&self) -> Result<(), EditError> {
		if self.readonly {
			return Err(EditError::ReadOnly);
		}
		Ok(())
	}

	fn commit(&mut self, tx: Transaction) -> u64 {
		tx.apply(&mut self.text);
		let selection = tx.map_selection(&self.selection);
		let (changes, annotations) = tx.into_parts();

		self.selection = selection;
		self.viewport = changes.map_pos(self.viewport.start, Bias::Left)..changes.map_pos(self.viewport.end, Bias::Right);
		self.revision = self.revision.wrapping_add(1);
		self.zones = classify_lines(&self.text);

		if self.history.len() == HISTORY_LIMIT {
			self.history.pop_front();
		}
		self.history.push_back((self.revision, changes.clone()));

		self.outbox.push(ViewUpdate {
			revision: self.revision,
			changes: Some(changes),
			viewport_changed: false,
			selection_set: false,
			annotations,
		});
		self.revision
	}

	fn make_line(&self, number: usize) -> Line {
		let start = self.text.line_to_char(number);
		let bounds = line_bounds(self.text.slice(..), start);
		Line {
			number: bounds.index,
			start: bounds.start,
			end: bounds.end,
			text: self.text.slice(bounds.start..bounds.end).to_string(),
		}
	}
}

impl EditorHost for MarkdownView {
	fn len_chars(&self) -> usize {
		self.text.len_chars()
	}

	fn line_count(&self) -> usize {
		self.text.len_lines()
	}

	fn line(&self, number: usize) -> Option<Line> {
		(number < self.text.len_lines()).then(|| self.make_line(number))
	}

	fn line_at(&self, pos: CharIdx) -> Line {
		let pos = pos.min(self.text.len_chars());
		self.make_line(self.text.char_to_line(pos))
	}

	fn classify(&self, pos: CharIdx) -> ZoneTags {
		let pos = pos.min(self.text.len_chars());
		let line = self.text.char_to_line(pos);
		self.zones.get(line).copied().unwrap_or_default()
	}

	fn selection(&self) -> &Selection {
		&self.selection
	}

	fn viewport(&self) -> ops::Range<CharIdx> {
		self.viewport.clone()
	}

	fn is_live_preview(&self) -> bool {
		self.live_preview
	}

	fn revision(&self) -> u64 {
		self.revision
	}

	fn map_pos(&self, since: u64, pos: CharIdx) -> Option<CharIdx> {
		if since == self.revision {
			return Some(pos);
		}
		let oldest = self.history.front().map(|(rev, _)| rev.wrapping_sub(1))?;
		if since < oldest || since > self.revision {
			return None;
		}
		let mapped = self
			.history
			.iter()
			.filter(|(rev, _)| *rev > since)
			.fold(pos, |pos, (_, changes)| changes.map_pos(pos.min(changes.len()), Bias::Right));
		Some(mapped)
	}

	fn apply_edit(&mut self, request: EditRequest, annotation: Option<Annotation>) -> Result<u64, EditError> {
		self.ensure_writable()?;
		let replacement = (!request.insert.is_empty()).then_some(request.insert);
		let mut tx = Transaction::try_change(
			self.text.slice(..),
			[Change {
				start: request.from,
				end: request.to,
				replacement,
			}],
		)?;
		if let Some(annotation) = annotation {
			tx = tx.with_annotation(annotation);
		}
		Ok(self.commit(tx))
	}

	fn take_updates(&mut self) -> Vec<ViewUpdate> {
		std::mem::take(&mut self.outbox)
	}
}

#[derive(Clone, Copy)]
enum Fence {
	Backtick,
	Tilde,
}

fn fence_of(line: &str) -> Option<Fence> {
	let trimmed = line.trim_start();
	if trimmed.starts_with("```") {
		Some(Fence::Backtick)
	} else if trimmed.starts_with("~~~") {
		Some(Fence::Tilde)
	} else {
		None
	}
}

/// Tags every line with the zones it belongs to.
///
/// Frontmatter must open on the first line with `---` and closes at the next
/// `---` or `...` line. Fenced code opens at a line starting with three
/// backticks or tildes and closes at the next fence of the same kind; an
/// unclosed fence runs to the end of the document.
fn classify_lines(text: &Rope) -> Vec<ZoneTags> {
	let mut zones = Vec::with_capacity(text.len_lines());
	let mut in_frontmatter = false;
	let mut fence: Option<Fence> = None;

	for (number, line) in text.lines().enumerate() {
		let line = line.to_string();
		let content = line.trim_end_matches(['\n', '\r']);

		if number == 0 && content.trim_end() == "---" {
			in_frontmatter = true;
			zones.push(ZoneTags::FRONTMATTER);
			continue;
		}
		if in_frontmatter {
			zones.push(ZoneTags::FRONTMATTER);
			if matches!(content.trim_end(), "---" | "...") {
				in_frontmatter = false;
			}
			continue;
		}

		match (fence, fence_of(content)) {
			(None, Some(opened)) => {
				fence = Some(opened);
				zones.push(ZoneTags::CODE_BLOCK);
			}
			(Some(Fence::Backtick), Some(Fence::Backtick)) | (Some(Fence::Tilde), Some(Fence::Tilde)) => {
				fence = None;
				zones.push(ZoneTags::CODE_BLOCK);
			}
			(Some(_), _) => zones.push(ZoneTags::CODE_BLOCK),
			(None, None) => zones.push(ZoneTags::empty()),
		}
	}

	zones
}
