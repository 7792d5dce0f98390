//! Writing a new date back into a chip's token.

use chipmark_primitives::{Annotation, Span};

use crate::error::{EngineError, Result};
use crate::format::SurfaceFormat;
use crate::host::{EditRequest, ViewHandle};
use crate::matcher::PatternMatcher;
use crate::resolver::RangeResolver;
use crate::widget::DateChip;


/// Tags edits made by the edit protocol.
///
/// The decoration manager sees this on the resulting update and patches only
/// the affected line instead of scheduling a full rescan.
pub const DATE_CHANGE: Annotation = Annotation::new("chipmark.date-change");

/// Result of [`EditProtocol::write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
	/// The token at `span` was replaced, producing `revision`.
	Applied {
		/// Span of the replaced token before the edit.
		span: Span,
		/// Document revision after the edit.
		revision: u64,
	},
	/// Nothing was written; the document is unchanged.
	Skipped(EngineError),
}

impl EditOutcome {
	/// Returns true if the document was edited.
	pub fn is_applied(&self) -> bool {
		matches!(self, Self::Applied { .. })
	}
}

/// The resolve-then-replace write path.
///
/// Every write re-locates the chip's token in the live document first; a
/// chip's creation span is never trusted. A write issues at most one edit.
#[derive(Debug, Clone)]
pub struct EditProtocol {
	view: ViewHandle,
	format: SurfaceFormat,
	resolver: RangeResolver,
}

impl EditProtocol {
	/// Creates a protocol writing `format` tokens into `view`.
	pub fn new(view: ViewHandle, format: SurfaceFormat) -> Self {
		Self {
			view,
			format,
			resolver: RangeResolver::new(PatternMatcher::new(format)),
		}
	}

	/// The surface format replacements are written in.
	pub fn format(&self) -> SurfaceFormat {
		self.format
	}

	/// Replaces the chip's date with `value`.
	pub fn set_value(&self, chip: &DateChip, value: &str) -> EditOutcome {
		self.write(chip, Some(value))
	}

	/// Removes the chip's token.
	pub fn clear(&self, chip: &DateChip) -> EditOutcome {
		self.write(chip, None)
	}

	/// Writes `value` into the chip's token, or removes it for `None`.
	///
	/// An empty value clears. Failures are logged and reported as
	/// [`EditOutcome::Skipped`]; they never leave a partial edit behind.
	pub fn write(&self, chip: &DateChip, value: Option<&str>) -> EditOutcome {
		let value = value.filter(|v| !v.is_empty());
		match self.try_write(chip, value) {
			Ok((span, revision)) => {
				tracing::debug!(start = span.start(), end = span.end(), revision, cleared = value.is_none(), "date chip written");
				EditOutcome::Applied { span, revision }
			}
			Err(error @ EngineError::Unresolved { .. }) => {
				tracing::debug!(%error, "date chip write skipped");
				EditOutcome::Skipped(error)
			}
			Err(error) => {
				tracing::warn!(start = chip.span().start(), %error, "date chip write refused");
				EditOutcome::Skipped(error)
			}
		}
	}

	fn try_write(&self, chip: &DateChip, value: Option<&str>) -> Result<(Span, u64)> {
		if let Some(value) = value
			&& value.contains(['\n', '\r'])
		{
			return Err(EngineError::InvalidValue(value.to_string()));
		}

		let view = self.view.upgrade().ok_or(EngineError::ViewClosed)?;
		let mut host = view.try_borrow_mut().map_err(|_| EngineError::ViewBusy)?;

		let span = self.resolver.resolve(&*host, chip).ok_or_else(|| EngineError::Unresolved {
			start: chip.span().start(),
			marker: chip.marker().to_string(),
		})?;

		let line = host.line_at(span.start());
		if span.end() > line.end {
			return Err(EngineError::MultiLine {
				from: span.start(),
				to: span.end(),
			});
		}

		let request = EditRequest {
			from: span.start(),
			to: span.end(),
			insert: self.format.replacement(chip.marker(), value),
		};
		let revision = host.apply_edit(request, Some(DATE_CHANGE))?;
		Ok((span, revision))
	}
}
