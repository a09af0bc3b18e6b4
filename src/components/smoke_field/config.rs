//! Field configuration: population, spawning, kinematics and fading.
//!
//! Every kinematic constant is expressed per reference tick (1/60 s), which is
//! how the values read when tuning by eye. [`ParticleField`] rescales them by
//! the actual step length.
//!
//! [`ParticleField`]: super::field::ParticleField

use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::rng::RandomSource;
use super::theme::SmokeStyle;

/// Inclusive-exclusive numeric range sampled uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span {
	/// Inclusive lower bound.
	pub min: f64,
	/// Exclusive upper bound.
	pub max: f64,
}

impl Span {
	/// A span from `min` to `max`.
	pub const fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// A span that always yields `v`.
	pub const fn fixed(v: f64) -> Self {
		Self { min: v, max: v }
	}

	/// Draws a uniform value from the span.
	pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> f64 {
		rng.between(self.min, self.max)
	}

	fn check(&self, field: &'static str) -> Result<(), ConfigError> {
		if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max {
			return Err(ConfigError::InvertedRange {
				field,
				min: self.min,
				max: self.max,
			});
		}
		Ok(())
	}
}

/// How new particles enter the field each tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpawnPolicy {
	/// A fixed number of particles every tick, each on a randomly drawn side.
	#[serde(rename_all = "camelCase")]
	Steady {
		/// Particles per tick, at most the population cap.
		per_tick: u32,
	},
	/// Every tick, each side independently spawns one particle.
	#[serde(rename_all = "camelCase")]
	Chance {
		/// Probability per side, in (0, 1].
		per_side: f64,
	},
}

/// Where along the horizontal axis particles appear.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SpawnRegion {
	/// Near the particle's own edge.
	Edges {
		/// Distance in from the edge; negative values start it off the surface.
		inset: Span,
	},
	/// Uniformly anywhere across the surface width. The side is whichever half
	/// the particle lands in.
	Anywhere,
}

/// How opacity decays over a particle's life.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FadeCurve {
	/// Constant opacity loss, independent of remaining life.
	#[serde(rename_all = "camelCase")]
	Linear {
		/// Opacity lost per reference tick.
		per_tick: f64,
	},
	/// Opacity tracks remaining life: `peak * life`.
	WithLife,
}

/// Screen-size bucket used to thin the effect on small viewports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
	/// Up to 768 px wide.
	Mobile,
	/// Up to 1024 px wide.
	Tablet,
	/// Anything wider.
	Desktop,
}

impl DeviceClass {
	/// Buckets a viewport width in CSS pixels.
	pub fn from_width(width: f64) -> Self {
		if width <= 768.0 {
			DeviceClass::Mobile
		} else if width < 1024.0 {
			DeviceClass::Tablet
		} else {
			DeviceClass::Desktop
		}
	}

	/// Fraction of the desktop population to keep.
	pub fn density(self) -> f64 {
		match self {
			DeviceClass::Mobile => 0.4,
			DeviceClass::Tablet => 0.7,
			DeviceClass::Desktop => 1.0,
		}
	}
}

/// Complete configuration of a particle field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldConfig {
	/// Population cap; the oldest particles are evicted beyond it.
	pub max_particles: usize,
	/// How new particles appear each tick.
	pub spawn: SpawnPolicy,
	/// Particles placed at construction, split evenly between both sides.
	pub initial_fill_count: usize,
	/// Where new particles appear.
	pub spawn_region: SpawnRegion,

	/// Base horizontal speed towards the center.
	pub drift_speed: f64,
	/// Random extra horizontal speed added on top of `drift_speed`.
	pub drift_jitter: f64,
	/// Base upward speed.
	pub rise_speed: f64,
	/// Random extra rise speed.
	pub rise_jitter: f64,
	/// Added to vertical velocity each tick (negative rises).
	pub buoyancy: f64,
	/// Spring-like pull towards the convergence target, per pixel of distance.
	pub attraction: f64,
	/// Velocity multiplier per tick (1.0 = no drag).
	pub drag: f64,

	/// Per-particle sway amplitude.
	pub sway_amplitude: Span,
	/// Angular frequency of sway, radians per second of elapsed time.
	pub sway_frequency: f64,
	/// Vertical sway frequency as a fraction of the horizontal one.
	pub vertical_sway_ratio: f64,

	/// Distance to the target inside which fading accelerates.
	pub convergence_radius: f64,
	/// Extra life lost per tick inside the convergence radius.
	pub convergence_fade: f64,
	/// Accelerated fading only applies above this remaining life.
	pub convergence_fade_min_life: f64,
	/// Remove particles that pass the target by more than this. `None`
	/// disables the check.
	pub overshoot_margin: Option<f64>,
	/// Pixels above the top edge before a rising particle is removed.
	pub top_removal_margin: f64,

	/// Radius in pixels.
	pub size: Span,
	/// Radius growth per tick.
	pub size_growth: Span,
	/// Peak opacity at full life.
	pub opacity: Span,
	/// How opacity decays.
	pub fade: FadeCurve,
	/// Lifetime in ticks.
	pub life: Span,
	/// Maximum absolute spin, radians per tick.
	pub rotation_speed: f64,

	/// Update frequency the frame clock throttles to.
	pub target_fps: f64,
	/// Most fixed steps run for a single frame callback after a stall.
	pub max_catch_up: u32,

	/// Drawing style.
	pub style: SmokeStyle,
}

impl Default for FieldConfig {
	fn default() -> Self {
		super::profiles::converging_streams()
	}
}

impl FieldConfig {
	/// Checks every field, failing on the first invalid one.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_particles == 0 {
			return Err(ConfigError::ZeroCapacity);
		}
		if self.initial_fill_count > self.max_particles {
			return Err(ConfigError::FillExceedsCapacity {
				fill: self.initial_fill_count,
				max: self.max_particles,
			});
		}
		match self.spawn {
			SpawnPolicy::Steady { per_tick } if per_tick as usize > self.max_particles => {
				return Err(ConfigError::SpawnExceedsCapacity {
					per_tick,
					max: self.max_particles,
				});
			}
			SpawnPolicy::Chance { per_side } if !(per_side > 0.0 && per_side <= 1.0) => {
				return Err(ConfigError::SpawnChance(per_side));
			}
			_ => {}
		}
		if let SpawnRegion::Edges { inset } = self.spawn_region {
			inset.check("spawnRegion.inset")?;
		}

		for (field, value) in [
			("driftSpeed", self.drift_speed),
			("driftJitter", self.drift_jitter),
			("riseJitter", self.rise_jitter),
			("attraction", self.attraction),
			("drag", self.drag),
			("swayFrequency", self.sway_frequency),
			("verticalSwayRatio", self.vertical_sway_ratio),
			("convergenceRadius", self.convergence_radius),
			("convergenceFade", self.convergence_fade),
			("convergenceFadeMinLife", self.convergence_fade_min_life),
			("topRemovalMargin", self.top_removal_margin),
			("rotationSpeed", self.rotation_speed),
		] {
			non_negative(field, value)?;
		}
		for (field, value) in [("riseSpeed", self.rise_speed), ("buoyancy", self.buoyancy)] {
			if !value.is_finite() {
				return Err(ConfigError::NotFinite { field });
			}
		}
		if let Some(margin) = self.overshoot_margin {
			non_negative("overshootMargin", margin)?;
		}
		if let FadeCurve::Linear { per_tick } = self.fade {
			non_negative("fade.perTick", per_tick)?;
		}
		if self.drag > 1.0 {
			return Err(ConfigError::OutOfUnitRange {
				field: "drag",
				value: self.drag,
			});
		}

		for (field, span) in [
			("swayAmplitude", self.sway_amplitude),
			("size", self.size),
			("sizeGrowth", self.size_growth),
			("opacity", self.opacity),
			("life", self.life),
		] {
			span.check(field)?;
		}
		if self.size.min < 0.0 {
			return Err(ConfigError::Negative {
				field: "size",
				value: self.size.min,
			});
		}
		if self.opacity.min <= 0.0 || self.opacity.max > 1.0 {
			return Err(ConfigError::OutOfUnitRange {
				field: "opacity",
				value: if self.opacity.min <= 0.0 {
					self.opacity.min
				} else {
					self.opacity.max
				},
			});
		}
		positive("life", self.life.min)?;
		positive("targetFps", self.target_fps)?;
		positive("maxCatchUp", self.max_catch_up as f64)?;

		let style = &self.style;
		unit("backgroundTrailAlpha", style.trail_alpha)?;
		unit("style.intensity", style.intensity)?;
		non_negative("style.fadeInSpeed", style.fade_in_speed)?;
		if style.stops.is_empty() {
			return Err(ConfigError::NoGradientStops);
		}
		let mut last = 0.0;
		for stop in &style.stops {
			if !(last..=1.0).contains(&stop.offset) {
				return Err(ConfigError::UnorderedGradientStops);
			}
			non_negative("style.stops.alpha", stop.alpha)?;
			last = stop.offset;
		}
		// Puffs need a soft edge.
		if let Some(edge) = style.stops.last().filter(|stop| stop.alpha != 0.0) {
			return Err(ConfigError::OpaqueGradientEdge(edge.alpha));
		}
		Ok(())
	}

	/// Scales population, spawning and prefill for the given screen class.
	pub fn for_device(mut self, device: DeviceClass) -> Self {
		let density = device.density();
		let scale = |n: usize| ((n as f64 * density).round() as usize).max(1);
		self.max_particles = scale(self.max_particles);
		self.initial_fill_count = if self.initial_fill_count == 0 {
			0
		} else {
			scale(self.initial_fill_count).min(self.max_particles)
		};
		self.spawn = match self.spawn {
			SpawnPolicy::Steady { per_tick } if per_tick > 0 => SpawnPolicy::Steady {
				per_tick: ((per_tick as f64 * density).round() as u32).max(1),
			},
			SpawnPolicy::Chance { per_side } => SpawnPolicy::Chance {
				per_side: per_side * density,
			},
			steady => steady,
		};
		self
	}
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() && value >= 0.0 {
		Ok(())
	} else {
		Err(ConfigError::Negative { field, value })
	}
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(ConfigError::NotPositive { field, value })
	}
}

fn unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
	if (0.0..=1.0).contains(&value) {
		Ok(())
	} else {
		Err(ConfigError::OutOfUnitRange { field, value })
	}
}
