//! A single decaying smoke particle.

/// Edge a particle entered from. Determines its drift direction and which way
/// counts as overshooting the convergence target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
	/// Left edge, drifting right.
	Left,
	/// Right edge, drifting left.
	Right,
}

impl Side {
	/// +1.0 for particles moving right (from the left edge), -1.0 otherwise.
	pub fn sign(self) -> f64 {
		match self {
			Side::Left => 1.0,
			Side::Right => -1.0,
		}
	}
}

/// One live particle. Plain data, mutated only by the owning field.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Spawn order; lower is older.
	pub serial: u64,
	/// Edge the particle came from.
	pub side: Side,
	/// Position in CSS pixels.
	pub x: f64,
	/// Vertical position, growing downwards.
	pub y: f64,
	/// Velocity in pixels per reference tick.
	pub vx: f64,
	/// Vertical velocity, negative when rising.
	pub vy: f64,
	/// Radius in pixels.
	pub size: f64,
	/// Radius gained per reference tick.
	pub size_growth: f64,
	/// Current opacity, never increasing.
	pub opacity: f64,
	/// Opacity at full life, used by life-linked fading.
	pub peak_opacity: f64,
	/// Remaining life fraction, 1.0 → 0.0.
	pub life: f64,
	/// Total lifetime in ticks.
	pub max_life: f64,
	/// Rotation in radians.
	pub angle: f64,
	/// Radians per reference tick.
	pub rotation_speed: f64,
	/// Sway phase offset, radians.
	pub phase: f64,
	/// Sway amplitude.
	pub sway: f64,
}

impl Particle {
	/// Out of life or fully transparent.
	pub fn is_spent(&self) -> bool {
		self.life <= 0.0 || self.opacity <= 0.0
	}

	/// Whether the particle has passed `target_x` by more than `margin`,
	/// travelling away from its spawn side.
	pub fn has_overshot(&self, target_x: f64, margin: f64) -> bool {
		match self.side {
			Side::Left => self.x > target_x + margin,
			Side::Right => self.x < target_x - margin,
		}
	}
}
