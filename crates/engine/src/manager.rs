//! Decoration lifecycle for one view.
//!
//! The manager owns the [`DecorationSet`] for the visible part of a document
//! and keeps it coherent with the text:
//! - self-edits and small edits patch only the touched lines, immediately
//! - larger edits, scrolling and selection changes schedule a full rescan
//! - full rescans closer together than the throttle interval are parked in a
//!   single latest-wins slot; until it runs, the set is mapped through every
//!   intervening change
//! - outside live preview the set is empty
//! - any failure while computing clears the set for that pass

use std::ops;
use std::time::Instant;

use chipmark_primitives::CharIdx;

use crate::config::ChipConfig;
use crate::decoration::DecorationSet;
use crate::edit::{DATE_CHANGE, EditProtocol};
use crate::error::{EngineError, Result};
use crate::format::SurfaceFormat;
use crate::host::{self, EditorHost, SharedView, ViewHandle, ViewUpdate};
use crate::matcher::PatternMatcher;
use crate::suppression::SuppressionFilter;
use crate::throttle::{Throttle, ThrottleOutcome};
use crate::widget::{ChipView, DateChip};


/// Manager state. `Destroyed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
	/// Tracking the view.
	Active,
	/// The view was torn down; every operation is a no-op.
	Destroyed,
}

/// Why a full rescan was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RescanReason {
	/// First build after construction.
	Initial,
	/// An edit too large to patch.
	Edit,
	/// The viewport or view mode changed.
	Viewport,
	/// The selection was set.
	Selection,
}

/// Counters describing what the manager has done.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManagerStats {
	/// Full viewport rescans run.
	pub full_rescans: usize,
	/// Incremental line patches applied.
	pub incremental_patches: usize,
	/// Updates ignored for arriving out of revision order.
	pub dropped_updates: usize,
	/// Passes that failed and cleared the set.
	pub failed_passes: usize,
}

/// A chip as drawn by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChip {
	/// The decoration.
	pub chip: DateChip,
	/// What to draw in place of its text.
	pub view: ChipView,
}

/// Owns and maintains the date chips of one view.
#[derive(Debug)]
pub struct DecorationManager {
	lifecycle: Lifecycle,
	view: ViewHandle,
	format: SurfaceFormat,
	matcher: PatternMatcher,
	filter: SuppressionFilter,
	set: DecorationSet,
	throttle: Throttle<RescanReason>,
	incremental_line_limit: usize,
	last_revision: u64,
	set_revision: u64,
	stats: ManagerStats,
}

impl DecorationManager {
	/// Creates a manager for `view` and builds the initial set.
	pub fn new(view: &SharedView, config: &ChipConfig) -> Self {
		let last_revision = view.try_borrow().map(|host| host.revision()).unwrap_or_default();
		let mut manager = Self {
			lifecycle: Lifecycle::Active,
			view: host::handle(view),
			format: config.format,
			matcher: PatternMatcher::new(config.format),
			filter: SuppressionFilter,
			set: DecorationSet::new(),
			throttle: Throttle::new(config.throttle),
			incremental_line_limit: config.incremental_line_limit,
			last_revision,
			set_revision: last_revision,
			stats: ManagerStats::default(),
		};
		let result = manager.run_rescan(RescanReason::Initial);
		manager.settle(result);
		manager
	}

	/// Current state.
	pub fn lifecycle(&self) -> Lifecycle {
		self.lifecycle
	}

	/// Returns true until the manager is destroyed.
	pub fn is_active(&self) -> bool {
		self.lifecycle == Lifecycle::Active
	}

	/// The active set, before render-time suppression.
	pub fn decorations(&self) -> &DecorationSet {
		&self.set
	}

	/// Counters for diagnostics.
	pub fn stats(&self) -> ManagerStats {
		self.stats
	}

	/// Last processed document revision.
	pub fn last_revision(&self) -> u64 {
		self.last_revision
	}

	/// When the parked full rescan becomes due.
	pub fn next_deadline(&self) -> Option<Instant> {
		self.throttle.deadline()
	}

	/// An edit protocol writing into the same view and format.
	pub fn edit_protocol(&self) -> EditProtocol {
		EditProtocol::new(self.view.clone(), self.format)
	}

	/// Tears the manager down. Idempotent.
	pub fn destroy(&mut self) {
		if self.lifecycle == Lifecycle::Destroyed {
			return;
		}
		tracing::debug!(chips = self.set.len(), "date chip manager destroyed");
		self.lifecycle = Lifecycle::Destroyed;
		self.set.clear();
		self.throttle.cancel();
	}

	/// Drains the view's pending updates, processes them, then polls.
	pub fn sync(&mut self, now: Instant) {
		if !self.is_active() {
			return;
		}
		let Some(view) = self.view.upgrade() else {
			self.destroy();
			return;
		};
		let updates = match view.try_borrow_mut() {
			Ok(mut host) => host.take_updates(),
			Err(_) => {
				tracing::debug!("view busy; deferring date chip sync");
				return;
			}
		};
		drop(view);

		for update in &updates {
			self.handle_update(update, now);
		}
		self.poll(now);
	}

	/// Processes one change notification.
	pub fn handle_update(&mut self, update: &ViewUpdate, now: Instant) {
		if !self.is_active() {
			return;
		}
		if update.revision < self.last_revision {
			tracing::debug!(revision = update.revision, last = self.last_revision, "dropping out-of-order view update");
			self.stats.dropped_updates += 1;
			return;
		}
		self.last_revision = update.revision;
		let result = self.apply_update(update, now);
		self.settle(result);
	}

	/// Runs the parked full rescan if it is due.
	pub fn poll(&mut self, now: Instant) {
		if !self.is_active() {
			return;
		}
		let Some(reason) = self.throttle.poll(now) else {
			return;
		};
		let result = self.run_rescan(reason);
		self.settle(result);
	}

	/// Chips to draw right now, after suppression.
	pub fn render(&self) -> Vec<RenderedChip> {
		self.visible(|chip| RenderedChip {
			chip: chip.clone(),
			view: chip.render(),
		})
	}

	/// The drawn chip under `pos`, for click dispatch.
	pub fn chip_at(&self, pos: CharIdx) -> Option<DateChip> {
		let chip = self.set.chip_at(pos)?;
		self.visible(|visible| visible.clone())
			.into_iter()
			.find(|visible| visible.span() == chip.span())
	}

	fn visible<T>(&self, f: impl Fn(&DateChip) -> T) -> Vec<T> {
		if !self.is_active() {
			return Vec::new();
		}
		let Some(view) = self.view.upgrade() else {
			return Vec::new();
		};
		let Ok(host) = view.try_borrow() else {
			tracing::debug!("view busy; rendering no date chips");
			return Vec::new();
		};
		if !host.is_live_preview() {
			return Vec::new();
		}
		self.set
			.iter()
			.filter(|chip| self.filter.should_show(&*host, chip.span()))
			.map(f)
			.collect()
	}

	fn apply_update(&mut self, update: &ViewUpdate, now: Instant) -> Result<()> {
		let view = self.view.upgrade().ok_or(EngineError::ViewClosed)?;
		let host = view.try_borrow().map_err(|_| EngineError::ViewBusy)?;

		if !host.is_live_preview() {
			self.set.clear();
			self.throttle.cancel();
			return Ok(());
		}

		let mut rescan = None;
		// The set already reflects every change up to `set_revision`.
		if let Some(changes) = update
			.changes
			.as_ref()
			.filter(|cs| !cs.is_identity() && update.revision > self.set_revision)
		{
			self.set.map(changes, update.revision);
			self.set_revision = update.revision;

			let lines = host::touched_lines(&*host, changes);
			let touched: usize = lines.iter().map(|range| range.len()).sum();
			if update.has_annotation(DATE_CHANGE) || touched <= self.incremental_line_limit {
				self.patch_lines(&*host, &lines, update.revision)?;
			} else {
				rescan = Some(RescanReason::Edit);
			}
		}
		if update.viewport_changed {
			rescan = Some(RescanReason::Viewport);
		} else if update.selection_set && rescan.is_none() {
			rescan = Some(RescanReason::Selection);
		}

		let Some(reason) = rescan else {
			return Ok(());
		};
		match self.throttle.request(reason, now) {
			ThrottleOutcome::Run(reason) => self.rescan(&*host, reason),
			ThrottleOutcome::Deferred { deadline, replaced } => {
				tracing::trace!(?reason, ?deadline, replaced, "full rescan deferred");
				Ok(())
			}
		}
	}

	fn run_rescan(&mut self, reason: RescanReason) -> Result<()> {
		let view = self.view.upgrade().ok_or(EngineError::ViewClosed)?;
		let host = view.try_borrow().map_err(|_| EngineError::ViewBusy)?;
		if !host.is_live_preview() {
			self.set.clear();
			return Ok(());
		}
		self.rescan(&*host, reason)
	}

	fn rescan(&mut self, host: &dyn EditorHost, reason: RescanReason) -> Result<()> {
		let revision = host.revision();
		let lines = self.viewport_lines(host);
		let chips = self.scan_lines(host, lines, revision);
		self.set = DecorationSet::from_chips(chips)?;
		self.set_revision = revision;
		self.stats.full_rescans += 1;
		tracing::trace!(?reason, revision, chips = self.set.len(), "date chips rescanned");
		Ok(())
	}

	fn patch_lines(&mut self, host: &dyn EditorHost, lines: &[ops::Range<usize>], revision: u64) -> Result<()> {
		let visible = self.viewport_lines(host);
		for range in lines {
			let first = range.start.max(visible.start);
			let end = range.end.min(visible.end);
			if first >= end {
				continue;
			}
			let (Some(first_line), Some(last_line)) = (host.line(first), host.line(end - 1)) else {
				continue;
			};
			let fresh = self.scan_lines(host, first..end, revision);
			self.set.splice(first_line.start, last_line.end, fresh)?;
		}
		self.stats.incremental_patches += 1;
		Ok(())
	}

	fn viewport_lines(&self, host: &dyn EditorHost) -> ops::Range<usize> {
		let viewport = host.viewport();
		let first = host.line_at(viewport.start).number;
		let last = host.line_at(viewport.end).number;
		first..last + 1
	}

	fn scan_lines(&self, host: &dyn EditorHost, lines: ops::Range<usize>, revision: u64) -> Vec<DateChip> {
		let mut chips = Vec::new();
		for number in lines {
			let Some(line) = host.line(number) else {
				break;
			};
			chips.extend(
				self.matcher
					.matches_at(&line.text, line.start)
					.map(|token| DateChip::new(&token, self.format, revision, self.view.clone())),
			);
		}
		chips
	}

	fn settle(&mut self, result: Result<()>) {
		match result {
			Ok(()) => {}
			Err(EngineError::ViewClosed) => self.destroy(),
			Err(error) => {
				tracing::warn!(%error, "date chip pass failed; clearing decorations");
				self.stats.failed_passes += 1;
				self.set.clear();
			}
		}
	}
}
