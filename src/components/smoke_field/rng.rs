//! Random draws behind spawning.

use rand::{Rng, RngCore};

/// Source of uniform draws used for every randomized spawn parameter.
///
/// Any `rand` generator works; tests can implement this directly to script
/// exact trajectories.
pub trait RandomSource {
	/// Uniform draw in `[0, 1)`.
	fn next_unit(&mut self) -> f64;

	/// Uniform draw in `[lo, hi)`.
	fn between(&mut self, lo: f64, hi: f64) -> f64 {
		lo + self.next_unit() * (hi - lo)
	}
}

impl<R: RngCore> RandomSource for R {
	fn next_unit(&mut self) -> f64 {
		self.r#gen::<f64>()
	}
}
