//! Date chip widgets.

use std::fmt;

use chipmark_primitives::Span;

use crate::error::{EngineError, Result};
use crate::format::SurfaceFormat;
use crate::host::ViewHandle;
use crate::matcher::TokenMatch;
use crate::picker::PickerRequest;

/// CSS class of a rendered chip.
pub const CHIP_CLASS: &str = "date-picker-widget";
/// CSS class of the placeholder shown when a chip cannot render.
pub const CHIP_ERROR_CLASS: &str = "date-picker-widget-error";
/// Accessible label of a rendered chip.
pub const CHIP_LABEL: &str = "Task Date";

/// One decoration replacing a date token.
///
/// Chips are immutable snapshots of the token at the revision they were
/// created at. Their span goes stale as soon as the document changes; use
/// [`RangeResolver`](crate::RangeResolver) to find the token again before
/// writing to it.
#[derive(Clone)]
pub struct DateChip {
	span: Span,
	display: String,
	value: String,
	marker: String,
	format: SurfaceFormat,
	revision: u64,
	view: ViewHandle,
}

impl DateChip {
	/// Creates a chip for a token matched at `revision`.
	pub fn new(token: &TokenMatch<'_>, format: SurfaceFormat, revision: u64, view: ViewHandle) -> Self {
		Self {
			span: token.span,
			display: token.text.to_string(),
			value: token.value.to_string(),
			marker: token.marker.to_string(),
			format,
			revision,
			view,
		}
	}

	/// Span at the creation revision.
	pub fn span(&self) -> Span {
		self.span
	}

	/// The token text as it appeared when the chip was created.
	pub fn display(&self) -> &str {
		&self.display
	}

	/// The date text.
	pub fn value(&self) -> &str {
		&self.value
	}

	/// The marker used to re-anchor the token.
	pub fn marker(&self) -> &str {
		&self.marker
	}

	/// The surface format the token was written in.
	pub fn format(&self) -> SurfaceFormat {
		self.format
	}

	/// Revision the span refers to.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Handle to the owning view.
	pub fn view(&self) -> &ViewHandle {
		&self.view
	}

	/// Returns a copy moved to `span` at `revision`, keeping everything else.
	pub(crate) fn remapped(&self, span: Span, revision: u64) -> Self {
		Self {
			span,
			revision,
			..self.clone()
		}
	}

	/// Builds the interactive view of this chip.
	///
	/// # Errors
	///
	/// Returns [`EngineError::Render`] if the chip's captured text is
	/// inconsistent (no date, or a date that is not part of the token).
	pub fn try_render(&self) -> Result<ChipView> {
		if self.value.is_empty() {
			return Err(EngineError::Render {
				start: self.span.start(),
				reason: "empty date",
			});
		}
		if !self.display.contains(&self.value) {
			return Err(EngineError::Render {
				start: self.span.start(),
				reason: "date is not part of the token",
			});
		}
		Ok(ChipView::Interactive {
			class: CHIP_CLASS,
			label: CHIP_LABEL,
			marker: self.marker.clone(),
			date: self.value.clone(),
		})
	}

	/// Builds the chip's view, falling back to a raw-text placeholder.
	pub fn render(&self) -> ChipView {
		self.try_render().unwrap_or_else(|error| {
			tracing::warn!(start = self.span.start(), %error, "date chip failed to render");
			ChipView::Fallback {
				class: CHIP_ERROR_CLASS,
				raw: self.display.clone(),
			}
		})
	}

	/// The request sent to a date picker opened from this chip.
	pub fn picker_request(&self) -> PickerRequest {
		PickerRequest {
			current: Some(self.value.clone()),
			marker: self.marker.clone(),
		}
	}
}

/// Chips are equal when they cover the same text with the same content.
///
/// Views and revisions are ignored, so a rescan producing an unchanged chip
/// lets the host keep its existing widget.
impl PartialEq for DateChip {
	fn eq(&self, other: &Self) -> bool {
		self.span == other.span && self.display == other.display
	}
}

impl Eq for DateChip {}

impl fmt::Debug for DateChip {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DateChip")
			.field("span", &self.span)
			.field("display", &self.display)
			.field("revision", &self.revision)
			.finish_non_exhaustive()
	}
}

/// What the host draws in place of a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipView {
	/// A clickable chip showing the date.
	Interactive {
		/// CSS class.
		class: &'static str,
		/// Accessible label.
		label: &'static str,
		/// Marker text.
		marker: String,
		/// Date text.
		date: String,
	},
	/// Inert placeholder showing the raw token text.
	Fallback {
		/// CSS class.
		class: &'static str,
		/// The token text as written.
		raw: String,
	},
}

impl ChipView {
	/// Returns true for the clickable variant.
	pub fn is_interactive(&self) -> bool {
		matches!(self, Self::Interactive { .. })
	}
}
