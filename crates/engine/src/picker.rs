//! The asynchronous date picker boundary.

use chipmark_primitives::BoxFutureLocal;

use crate::edit::{EditOutcome, EditProtocol};
use crate::widget::DateChip;

/// What a picker is opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRequest {
	/// The chip's current date, if any.
	pub current: Option<String>,
	/// The chip's marker, shown alongside the calendar.
	pub marker: String,
}

/// How the user closed the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
	/// A date was chosen.
	Picked(String),
	/// The user asked to remove the date.
	Cleared,
	/// The picker was dismissed.
	Cancelled,
}

/// A date picker UI.
///
/// The returned future may stay pending across any number of document
/// edits; the chip is re-resolved when it completes.
pub trait DatePicker {
	/// Opens the picker.
	fn open(&self, request: PickerRequest) -> BoxFutureLocal<'static, PickerOutcome>;
}

/// Opens `picker` for `chip` and writes the result back.
///
/// Returns `None` if the picker was cancelled.
pub async fn pick_and_apply(picker: &dyn DatePicker, protocol: &EditProtocol, chip: &DateChip) -> Option<EditOutcome> {
	let outcome = picker.open(chip.picker_request()).await;
	match outcome {
		PickerOutcome::Picked(value) => Some(protocol.set_value(chip, &value)),
		PickerOutcome::Cleared => Some(protocol.clear(chip)),
		PickerOutcome::Cancelled => {
			tracing::debug!(start = chip.span().start(), "date picker cancelled");
			None
		}
	}
}
