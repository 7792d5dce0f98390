//! Regex-based token detection.

use std::sync::LazyLock;

use chipmark_primitives::{CharIdx, Span};
use regex::{CaptureMatches, Regex};

use crate::format::SurfaceFormat;


/// Emoji marker (ASCII digits, `#` and `*` carry the emoji property but are
/// never markers), an optional presentation selector, then the date.
const MARKED_PATTERN: &str = r"([[\p{Emoji}\p{Emoji_Modifier}\p{Emoji_Component}\p{Emoji_Modifier_Base}\p{Emoji_Presentation}]--[\x00-\x7F]]\x{FE0F}?)\s*([0-9]{4}-[0-9]{2}-[0-9]{2})";

/// `[key::` plus optional whitespace, the date, and the closing bracket.
const BRACKETED_PATTERN: &str = r"(\[[^\]\n]+::\s*)([0-9]{4}-[0-9]{2}-[0-9]{2})\]";

static MARKED: LazyLock<Option<Regex>> = LazyLock::new(|| compile(SurfaceFormat::Marked, MARKED_PATTERN));
static BRACKETED: LazyLock<Option<Regex>> =
	LazyLock::new(|| compile(SurfaceFormat::Bracketed, BRACKETED_PATTERN));

fn compile(format: SurfaceFormat, pattern: &str) -> Option<Regex> {
	Regex::new(pattern)
		.map_err(|error| tracing::error!(?format, %error, "date token grammar failed to build"))
		.ok()
}

/// One token found in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenMatch<'t> {
	/// Char span of the whole token, offset by the scan base.
	pub span: Span,
	/// The whole matched text.
	pub text: &'t str,
	/// The anchor: an emoji, or a field prefix such as `[due:: `.
	pub marker: &'t str,
	/// The date text.
	pub value: &'t str,
}

/// Finds date tokens of one surface format.
///
/// A matcher built from an unknown format setting, or whose grammar failed
/// to compile, matches nothing.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatcher {
	format: Option<SurfaceFormat>,
	regex: Option<&'static Regex>,
}

impl PatternMatcher {
	/// Creates a matcher for `format`.
	pub fn new(format: SurfaceFormat) -> Self {
		let regex = match format {
			SurfaceFormat::Marked => MARKED.as_ref(),
			SurfaceFormat::Bracketed => BRACKETED.as_ref(),
		};
		Self {
			format: Some(format),
			regex,
		}
	}

	/// Creates a matcher from a format setting string.
	pub fn from_setting(setting: &str) -> Self {
		match SurfaceFormat::from_setting(setting) {
			Some(format) => Self::new(format),
			None => {
				tracing::debug!(setting, "unknown date format setting; matching nothing");
				Self::empty()
			}
		}
	}

	/// A matcher that never matches.
	pub fn empty() -> Self {
		Self {
			format: None,
			regex: None,
		}
	}

	/// Returns the format this matcher recognises.
	pub fn format(&self) -> Option<SurfaceFormat> {
		self.format
	}

	/// Iterates over tokens in `text`, left to right.
	pub fn matches<'m, 't>(&'m self, text: &'t str) -> Matches<'m, 't> {
		self.matches_at(text, 0)
	}

	/// Iterates over tokens in `text`, reporting spans offset by `base`.
	///
	/// Used to scan one line of a document while producing document offsets.
	pub fn matches_at<'m, 't>(&'m self, text: &'t str, base: CharIdx) -> Matches<'m, 't> {
		Matches {
			inner: self.regex.map(|re| re.captures_iter(text)),
			text,
			base,
			byte_cursor: 0,
			char_cursor: 0,
		}
	}
}

/// Lazy iterator over [`TokenMatch`]es.
///
/// Byte offsets reported by the regex are converted to char offsets as the
/// iterator advances, so each text byte is counted at most once.
pub struct Matches<'m, 't> {
	inner: Option<CaptureMatches<'m, 't>>,
	text: &'t str,
	base: CharIdx,
	byte_cursor: usize,
	char_cursor: usize,
}

impl<'t> Matches<'_, 't> {
	fn char_offset(&mut self, byte: usize) -> CharIdx {
		self.char_cursor += self.text[self.byte_cursor..byte].chars().count();
		self.byte_cursor = byte;
		self.base + self.char_cursor
	}
}

impl<'t> Iterator for Matches<'_, 't> {
	type Item = TokenMatch<'t>;

	fn next(&mut self) -> Option<Self::Item> {
		loop {
			let caps = self.inner.as_mut()?.next()?;
			let (Some(whole), Some(marker), Some(value)) = (caps.get(0), caps.get(1), caps.get(2)) else {
				continue;
			};
			let start = self.char_offset(whole.start());
			let end = self.char_offset(whole.end());
			let Some(span) = Span::new(start, end) else {
				continue;
			};
			return Some(TokenMatch {
				span,
				text: whole.as_str(),
				marker: marker.as_str(),
				value: value.as_str(),
			});
		}
	}
}
