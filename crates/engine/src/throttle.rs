//! Minimum-interval gate with a single latest-wins deferred slot.

use std::time::{Duration, Instant};

/// Result of [`Throttle::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThrottleOutcome<T> {
	/// The interval has elapsed; run `T` now.
	Run(T),
	/// The request was parked until `deadline`.
	Deferred {
		/// When the parked request becomes due.
		deadline: Instant,
		/// Whether an earlier parked request was discarded.
		replaced: bool,
	},
}

/// Rate-limits work to one run per interval.
///
/// Requests arriving too soon after the last run are parked in a single
/// slot; a newer request replaces the parked one and pushes its deadline
/// out. Time is always passed in, so callers decide what "now" is.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
	interval: Duration,
	last_run: Option<Instant>,
	pending: Option<(Instant, T)>,
}

impl<T> Throttle<T> {
	/// Creates a throttle allowing one run per `interval`.
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			last_run: None,
			pending: None,
		}
	}

	/// Asks to run `item` at `now`.
	pub fn request(&mut self, item: T, now: Instant) -> ThrottleOutcome<T> {
		let ready = self
			.last_run
			.is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
		if ready {
			self.last_run = Some(now);
			self.pending = None;
			return ThrottleOutcome::Run(item);
		}

		let deadline = now + self.interval;
		let replaced = self.pending.replace((deadline, item)).is_some();
		ThrottleOutcome::Deferred { deadline, replaced }
	}

	/// Takes the parked request if its deadline has passed.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		let (deadline, _) = self.pending.as_ref()?;
		if now < *deadline {
			return None;
		}
		let (_, item) = self.pending.take()?;
		self.last_run = Some(now);
		Some(item)
	}

	/// Deadline of the parked request, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|(deadline, _)| *deadline)
	}

	/// Drops the parked request.
	pub fn cancel(&mut self) -> Option<T> {
		self.pending.take().map(|(_, item)| item)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const INTERVAL: Duration = Duration::from_millis(50);

	#[test]
	fn first_request_runs_immediately() {
		let mut throttle = Throttle::new(INTERVAL);
		assert_eq!(throttle.request(1, Instant::now()), ThrottleOutcome::Run(1));
		assert_eq!(throttle.deadline(), None);
	}

	#[test]
	fn requests_inside_interval_are_deferred_latest_wins() {
		let t0 = Instant::now();
		let mut throttle = Throttle::new(INTERVAL);
		assert_eq!(throttle.request("a", t0), ThrottleOutcome::Run("a"));

		let t1 = t0 + Duration::from_millis(10);
		assert_eq!(
			throttle.request("b", t1),
			ThrottleOutcome::Deferred {
				deadline: t1 + INTERVAL,
				replaced: false
			}
		);
		let t2 = t0 + Duration::from_millis(20);
		assert_eq!(
			throttle.request("c", t2),
			ThrottleOutcome::Deferred {
				deadline: t2 + INTERVAL,
				replaced: true
			}
		);
		assert_eq!(throttle.deadline(), Some(t2 + INTERVAL));

		assert_eq!(throttle.poll(t1 + INTERVAL), None);
		assert_eq!(throttle.poll(t2 + INTERVAL), Some("c"));
		assert_eq!(throttle.poll(t2 + INTERVAL * 4), None);
	}

	#[test]
	fn request_after_interval_clears_parked_item() {
		let t0 = Instant::now();
		let mut throttle = Throttle::new(INTERVAL);
		throttle.request(1, t0);
		throttle.request(2, t0 + Duration::from_millis(1));
		assert_eq!(throttle.request(3, t0 + INTERVAL), ThrottleOutcome::Run(3));
		assert_eq!(throttle.deadline(), None);
	}

	#[test]
	fn cancel_drops_the_parked_item() {
		let t0 = Instant::now();
		let mut throttle = Throttle::new(INTERVAL);
		throttle.request(0, t0);
		assert!(matches!(throttle.request(1, t0), ThrottleOutcome::Deferred { .. }));
		assert_eq!(throttle.cancel(), Some(1));
		assert_eq!(throttle.poll(t0 + INTERVAL), None);
	}
}
