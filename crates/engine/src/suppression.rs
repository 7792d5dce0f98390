//! Render-time visibility rules for chips.

use chipmark_primitives::{Selection, Span};

use crate::host::{EditorHost, ZoneTags};

/// Decides whether a chip is drawn in the current view state.
///
/// A chip is hidden while any selection range covers or sits strictly
/// inside it, so the user edits the raw token text instead of fighting the
/// widget. Chips in code blocks or frontmatter, and chips whose span no
/// longer fits the document, are never drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressionFilter;

impl SuppressionFilter {
	/// Applies every rule against the live host.
	pub fn should_show(&self, host: &dyn EditorHost, span: Span) -> bool {
		span.is_within(host.len_chars()) && self.zone_allows(host, span) && self.selection_allows(host.selection(), span)
	}

	/// The zone rule.
	pub fn zone_allows(&self, host: &dyn EditorHost, span: Span) -> bool {
		!host.classify(span.start()).intersects(ZoneTags::SUPPRESSED)
	}

	/// The selection rule.
	pub fn selection_allows(&self, selection: &Selection, span: Span) -> bool {
		!selection.overlaps_span(&span)
	}
}
