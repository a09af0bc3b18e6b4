//! Global intensity easing.
//!
//! The effect fades in after start and can be faded towards any level later.
//! Uses exponential smoothing, value += (target - value) * (1 - e^(-speed * dt)),
//! so transitions ease out as they approach the target.

/// Smoothed global alpha multiplier applied to every particle.
#[derive(Clone, Debug)]
pub struct IntensityRamp {
	current: f64,
	target: f64,
	speed: f64,
}

impl IntensityRamp {
	/// Starts fully transparent and eases towards `target`.
	pub fn fade_in(target: f64, speed: f64) -> Self {
		Self {
			current: if speed > 0.0 { 0.0 } else { target },
			target,
			speed,
		}
	}

	/// Retargets the ramp, clamped to [0, 1].
	pub fn set_target(&mut self, target: f64) {
		self.target = target.clamp(0.0, 1.0);
		if self.speed <= 0.0 {
			self.current = self.target;
		}
	}

	/// Eases towards the target over `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		if self.speed <= 0.0 {
			return;
		}
		let factor = 1.0 - (-self.speed * dt).exp();
		self.current += (self.target - self.current) * factor;
		// Snap once visually indistinguishable.
		if (self.target - self.current).abs() < 0.001 {
			self.current = self.target;
		}
	}

	/// Current intensity.
	pub fn value(&self) -> f64 {
		self.current
	}

	/// Level being eased towards.
	pub fn target(&self) -> f64 {
		self.target
	}
}
