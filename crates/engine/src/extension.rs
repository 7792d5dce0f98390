//! Installing date chips on a view.

use crate::config::ChipConfig;
use crate::host::SharedView;
use crate::manager::DecorationManager;

/// Installs date chips on `view`, or nothing when disabled in `config`.
pub fn date_chip_extension(view: &SharedView, config: &ChipConfig) -> Option<DecorationManager> {
	if !config.enabled {
		tracing::debug!("date chips disabled");
		return None;
	}
	tracing::debug!(format = config.format.setting_name(), throttle = ?config.throttle, "installing date chips");
	Some(DecorationManager::new(view, config))
}
