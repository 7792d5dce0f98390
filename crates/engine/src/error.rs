//! Error types for the decoration engine.

use chipmark_primitives::{CharIdx, EditError};
use thiserror::Error;

/// Errors raised while computing decorations or writing a chip back.
///
/// None of these cross into the host's update cycle: the manager turns them
/// into an empty decoration pass and the edit protocol into a skipped
/// [`EditOutcome`](crate::EditOutcome).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
	/// The view behind a chip was torn down.
	#[error("view has been closed")]
	ViewClosed,

	/// The view is already borrowed for another update.
	#[error("view is busy with another update")]
	ViewBusy,

	/// No token could be re-located for the chip in the live document.
	#[error("no token for marker {marker:?} near offset {start}")]
	Unresolved {
		/// Chip start at the revision it was created.
		start: CharIdx,
		/// Marker used to anchor the search.
		marker: String,
	},

	/// The resolved token crosses a line break.
	#[error("resolved token {from}..{to} spans more than one line")]
	MultiLine {
		/// Start of the resolved span.
		from: CharIdx,
		/// End of the resolved span.
		to: CharIdx,
	},

	/// The replacement value cannot be written inline.
	#[error("invalid replacement value {0:?}")]
	InvalidValue(String),

	/// The host refused the edit.
	#[error(transparent)]
	Edit(#[from] EditError),

	/// Two decorations claim overlapping text.
	#[error("decorations overlap at offset {at}")]
	Overlap {
		/// Start of the second decoration.
		at: CharIdx,
	},

	/// A chip could not produce its interactive view.
	#[error("chip at {start} cannot render: {reason}")]
	Render {
		/// Chip start.
		start: CharIdx,
		/// What was wrong with the chip.
		reason: &'static str,
	},
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
