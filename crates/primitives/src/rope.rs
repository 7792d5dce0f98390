//! Rope line utilities.

use ropey::RopeSlice;

use crate::range::CharIdx;

/// Characters ropey treats as line terminators.
const LINE_BREAKS: [char; 7] = [
	'\n', '\r', '\u{000B}', '\u{000C}', '\u{0085}', '\u{2028}', '\u{2029}',
];

/// Location of one line, excluding its terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
	/// Zero-based line index.
	pub index: usize,
	/// Char offset of the first character of the line.
	pub start: CharIdx,
	/// Char offset just before the line terminator (or end of text).
	pub end: CharIdx,
}

/// Returns the bounds of the line containing `pos`.
///
/// `pos` is clamped to the text length, so the position just past the last
/// character resolves to the final line.
pub fn line_bounds(text: RopeSlice, pos: CharIdx) -> LineBounds {
	let pos = pos.min(text.len_chars());
	let index = text.char_to_line(pos);
	let start = text.line_to_char(index);
	let line = text.line(index);

	let mut end = start + line.len_chars();
	if end > start && LINE_BREAKS.contains(&text.char(end - 1)) {
		end -= 1;
		if end > start && text.char(end) == '\n' && text.char(end - 1) == '\r' {
			end -= 1;
		}
	}

	LineBounds { index, start, end }
}
