//! Date chip settings.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::format::SurfaceFormat;

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The settings are not valid TOML or have the wrong shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The format setting names no known surface format.
	#[error("unknown date format: {0} (expected 'tasks' or 'dataview')")]
	UnknownFormat(String),

	/// The throttle interval is zero.
	#[error("throttle-ms must be greater than zero")]
	InvalidThrottle,
}

/// Settings as written in TOML.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct RawChipConfig {
	/// Install the extension at all.
	#[serde(default = "default_enabled")]
	enabled: bool,
	/// `tasks` or `dataview`.
	#[serde(default = "default_format")]
	format: String,
	/// Minimum interval between full rescans, in milliseconds.
	#[serde(default = "default_throttle_ms")]
	throttle_ms: u64,
	/// Edits touching at most this many lines are patched in place.
	#[serde(default = "default_incremental_line_limit")]
	incremental_line_limit: usize,
}

fn default_enabled() -> bool {
	true
}

fn default_format() -> String {
	SurfaceFormat::Marked.setting_name().to_string()
}

fn default_throttle_ms() -> u64 {
	50
}

fn default_incremental_line_limit() -> usize {
	8
}

/// Validated settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipConfig {
	/// Whether the extension is installed.
	pub enabled: bool,
	/// Surface format of date tokens.
	pub format: SurfaceFormat,
	/// Minimum interval between full rescans.
	pub throttle: Duration,
	/// Largest edit, in touched lines, handled by an incremental patch.
	pub incremental_line_limit: usize,
}

impl Default for ChipConfig {
	fn default() -> Self {
		Self {
			enabled: default_enabled(),
			format: SurfaceFormat::default(),
			throttle: Duration::from_millis(default_throttle_ms()),
			incremental_line_limit: default_incremental_line_limit(),
		}
	}
}

impl ChipConfig {
	/// Parses settings from TOML; missing keys take their defaults.
	///
	/// # Errors
	///
	/// Returns [`ConfigError`] for malformed TOML, unknown keys, an unknown
	/// format or a zero throttle.
	pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
		let raw: RawChipConfig = toml::from_str(input)?;
		Self::try_from(raw)
	}
}

impl TryFrom<RawChipConfig> for ChipConfig {
	type Error = ConfigError;

	fn try_from(raw: RawChipConfig) -> Result<Self, Self::Error> {
		let format = SurfaceFormat::from_setting(&raw.format).ok_or(ConfigError::UnknownFormat(raw.format))?;
		if raw.throttle_ms == 0 {
			return Err(ConfigError::InvalidThrottle);
		}
		Ok(Self {
			enabled: raw.enabled,
			format,
			throttle: Duration::from_millis(raw.throttle_ms),
			incremental_line_limit: raw.incremental_line_limit,
		})
	}
}
