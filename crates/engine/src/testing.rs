//! Shared helpers for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::host::{EditorHost, SharedView, ViewHandle};
use crate::{DateChip, MarkdownView, PatternMatcher, SurfaceFormat};

/// A view plus the weak handle chips hold to it.
pub(crate) fn view(text: &str) -> (Rc<RefCell<MarkdownView>>, ViewHandle) {
	let view = Rc::new(RefCell::new(MarkdownView::new(text)));
	let shared: SharedView = view.clone();
	let handle = Rc::downgrade(&shared);
	(view, handle)
}

/// Every chip in the document, scanned line by line.
pub(crate) fn chips(view: &MarkdownView, format: SurfaceFormat, handle: &ViewHandle) -> Vec<DateChip> {
	let matcher = PatternMatcher::new(format);
	(0..view.line_count())
		.filter_map(|n| view.line(n))
		.flat_map(|line| {
			matcher
				.matches_at(&line.text, line.start)
				.map(|token| DateChip::new(&token, format, view.revision(), handle.clone()))
				.collect::<Vec<_>>()
		})
		.collect()
}

/// The text under `span`.
pub(crate) fn text_at(view: &MarkdownView, span: chipmark_primitives::Span) -> String {
	view.content().slice(span.as_range()).to_string()
}
