//! Frame throttling.
//!
//! The browser may call back at 30, 60, 144 Hz or anything in between. The
//! clock turns those callbacks into a whole number of fixed steps at the
//! target rate, carrying the remainder forward, so the effect moves at the
//! same speed on every display.

/// Converts frame-callback timestamps into fixed simulation steps.
#[derive(Clone, Debug)]
pub struct FrameClock {
	interval_ms: f64,
	max_catch_up: u32,
	last: Option<f64>,
	accumulator: f64,
}

impl FrameClock {
	/// Clock stepping at `target_fps`, running at most `max_catch_up` steps per callback.
	pub fn new(target_fps: f64, max_catch_up: u32) -> Self {
		Self {
			interval_ms: 1000.0 / target_fps,
			max_catch_up: max_catch_up.max(1),
			last: None,
			accumulator: 0.0,
		}
	}

	/// Length of one step in seconds.
	pub fn step_seconds(&self) -> f64 {
		self.interval_ms / 1000.0
	}

	/// Records a callback at `now_ms` and returns how many steps are due.
	///
	/// Zero means not enough time has passed: skip the update and render but
	/// keep requesting frames. After a long stall (hidden tab, debugger) at
	/// most `max_catch_up` steps run and the backlog is dropped.
	pub fn tick(&mut self, now_ms: f64) -> u32 {
		let Some(last) = self.last.replace(now_ms) else {
			return 0;
		};
		self.accumulator += (now_ms - last).max(0.0);

		let due = (self.accumulator / self.interval_ms).floor();
		if due > self.max_catch_up as f64 {
			self.accumulator = 0.0;
			return self.max_catch_up;
		}
		let steps = due as u32;
		self.accumulator -= steps as f64 * self.interval_ms;
		steps
	}

	/// Forgets the previous timestamp, e.g. after the loop was paused.
	pub fn reset(&mut self) {
		self.last = None;
		self.accumulator = 0.0;
	}
}
