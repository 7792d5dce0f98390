//! Re-locating a chip's token in the live document.

use chipmark_primitives::Span;

use crate::format::SurfaceFormat;
use crate::host::EditorHost;
use crate::matcher::PatternMatcher;
use crate::widget::DateChip;


/// Finds the current span of a chip's token.
///
/// The chip's creation start is carried to the current revision through the
/// host's change log, then only the line containing it is scanned. Among
/// the tokens on that line, one carrying the chip's marker wins over one
/// that merely contains the start; a token doing both wins over either.
/// Marked tokens must carry the chip's own marker, so a different marker
/// next to a deleted one is never picked up.
#[derive(Debug, Clone, Copy)]
pub struct RangeResolver {
	matcher: PatternMatcher,
}

impl RangeResolver {
	/// Creates a resolver using `matcher`'s grammar.
	pub fn new(matcher: PatternMatcher) -> Self {
		Self { matcher }
	}

	/// Returns the live span of `chip`'s token, or `None` if it is gone.
	pub fn resolve(&self, host: &dyn EditorHost, chip: &DateChip) -> Option<Span> {
		let format = self.matcher.format()?;

		let start = host
			.map_pos(chip.revision(), chip.span().start())
			.unwrap_or(chip.span().start())
			.min(host.len_chars());
		let line = host.line_at(start);

		let mut best: Option<(u8, Span)> = None;
		for token in self.matcher.matches_at(&line.text, line.start) {
			let marked = format.carries_marker(&token, chip.marker());
			let covers = token.span.contains(start);
			let rank = match (marked, covers) {
				(true, true) => 0,
				(true, false) => 1,
				(false, true) if format == SurfaceFormat::Bracketed => 2,
				_ => continue,
			};
			if best.is_none_or(|(current, _)| rank < current) {
				best = Some((rank, token.span));
			}
		}

		if best.is_none() {
			tracing::debug!(start, marker = chip.marker(), line = line.number, "date token not found");
		}
		best.map(|(_, span)| span)
	}
}
