//! Surface syntaxes a date token can be written in.

use crate::matcher::TokenMatch;

/// How date tokens are written in the document.
///
/// Exactly one format is active per document; tokens of the other format
/// are plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceFormat {
	/// An emoji marker followed by a date: `📅 2024-01-15`.
	#[default]
	Marked,
	/// An inline field: `[due:: 2024-01-15]`.
	Bracketed,
}

impl SurfaceFormat {
	/// Parses a format setting.
	///
	/// Accepts the plugin names (`tasks`, `dataview`) as well as the format
	/// names themselves, case-insensitively.
	pub fn from_setting(setting: &str) -> Option<Self> {
		match setting.trim().to_ascii_lowercase().as_str() {
			"tasks" | "marked" => Some(Self::Marked),
			"dataview" | "bracketed" => Some(Self::Bracketed),
			_ => None,
		}
	}

	/// Returns the canonical setting name.
	pub fn setting_name(self) -> &'static str {
		match self {
			Self::Marked => "tasks",
			Self::Bracketed => "dataview",
		}
	}

	/// Builds the text that replaces a token.
	///
	/// `None` clears the token, which removes it entirely including its
	/// marker or field wrapper.
	pub fn replacement(self, marker: &str, value: Option<&str>) -> String {
		match (self, value) {
			(_, None) => String::new(),
			(Self::Marked, Some(value)) => format!("{marker} {value}"),
			(Self::Bracketed, Some(value)) => format!("{marker}{value}]"),
		}
	}

	/// Returns true if `candidate` carries `marker`.
	///
	/// Emoji markers must match exactly. Field prefixes only need to lead
	/// the match up to trailing whitespace, so `[due::2024-01-15]` still
	/// carries the marker `[due:: `.
	pub fn carries_marker(self, candidate: &TokenMatch<'_>, marker: &str) -> bool {
		match self {
			Self::Marked => candidate.marker == marker,
			Self::Bracketed => {
				candidate.text.starts_with(marker)
					|| candidate.marker.trim_end() == marker.trim_end()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;
	use crate::PatternMatcher;

	#[rstest]
	#[case("tasks", Some(SurfaceFormat::Marked))]
	#[case("Marked", Some(SurfaceFormat::Marked))]
	#[case(" dataview ", Some(SurfaceFormat::Bracketed))]
	#[case("bracketed", Some(SurfaceFormat::Bracketed))]
	#[case("org", None)]
	#[case("", None)]
	fn setting_names(#[case] setting: &str, #[case] expected: Option<SurfaceFormat>) {
		assert_eq!(SurfaceFormat::from_setting(setting), expected);
	}

	#[test]
	fn replacement_text() {
		assert_eq!(SurfaceFormat::Marked.replacement("📅", Some("2024-01-20")), "📅 2024-01-20");
		assert_eq!(
			SurfaceFormat::Bracketed.replacement("[due:: ", Some("2024-01-20")),
			"[due:: 2024-01-20]"
		);
		assert_eq!(SurfaceFormat::Marked.replacement("📅", None), "");
		assert_eq!(SurfaceFormat::Bracketed.replacement("[due:: ", None), "");
	}

	#[rstest]
	#[case(SurfaceFormat::Marked, "📅 2024-01-15", "📅")]
	#[case(SurfaceFormat::Bracketed, "[due:: 2024-01-15]", "[due:: ")]
	fn replacement_matches_again(#[case] format: SurfaceFormat, #[case] token: &str, #[case] marker: &str) {
		let matcher = PatternMatcher::new(format);
		let rebuilt = format.replacement(marker, Some("1999-12-31"));
		let found: Vec<_> = matcher.matches(&rebuilt).collect();
		assert_eq!(found.len(), 1);
		assert_eq!(found[0].marker, marker);
		assert_eq!(found[0].value, "1999-12-31");
		assert_eq!(found[0].text, rebuilt);
		assert!(matcher.matches(token).next().is_some());
	}

	#[test]
	fn bracketed_marker_tolerates_whitespace_edits() {
		let matcher = PatternMatcher::new(SurfaceFormat::Bracketed);
		let tight = matcher.matches("[due::2024-01-15]").next().unwrap();
		assert!(SurfaceFormat::Bracketed.carries_marker(&tight, "[due:: "));
		assert!(!SurfaceFormat::Bracketed.carries_marker(&tight, "[start:: "));
	}

	#[test]
	fn marked_marker_is_exact() {
		let matcher = PatternMatcher::new(SurfaceFormat::Marked);
		let due = matcher.matches("⏳ 2024-01-15").next().unwrap();
		assert!(SurfaceFormat::Marked.carries_marker(&due, "⏳"));
		assert!(!SurfaceFormat::Marked.carries_marker(&due, "📅"));
	}
}
