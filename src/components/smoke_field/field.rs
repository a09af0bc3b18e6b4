//! The particle field: spawning, capping, per-tick kinematics and culling.
//!
//! The field owns every live particle in spawn order. Each [`advance`] call is
//! one tick: spawn, evict the oldest surplus, then update all particles and
//! keep only the survivors. Survivors are collected into a fresh sequence, so
//! no particle is skipped or visited twice when others are removed.
//!
//! [`advance`]: ParticleField::advance

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::SmallRng;

use super::config::{FadeCurve, FieldConfig, SpawnPolicy, SpawnRegion};
use super::error::ConfigError;
use super::particle::{Particle, Side};
use super::rng::RandomSource;

/// Tick rate the per-tick constants in [`FieldConfig`] are tuned for.
pub const REFERENCE_FPS: f64 = 60.0;

/// Bounded set of live particles plus the shared parameters they move under.
pub struct ParticleField<R = SmallRng> {
	config: FieldConfig,
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	target_x: f64,
	elapsed: f64,
	next_serial: u64,
	rng: R,
}

impl<R: RandomSource> ParticleField<R> {
	/// Validates `config` and pre-fills the field so the first frame is not
	/// sparse.
	pub fn new(config: FieldConfig, width: f64, height: f64, rng: R) -> Result<Self, ConfigError> {
		config.validate()?;
		let mut field = Self {
			particles: Vec::with_capacity(config.max_particles),
			config,
			width,
			height,
			target_x: width / 2.0,
			elapsed: 0.0,
			next_serial: 0,
			rng,
		};
		field.prefill();
		Ok(field)
	}

	/// Evenly spaced particles down both sides, with staggered life so they
	/// don't all expire together.
	fn prefill(&mut self) {
		let fill = self.config.initial_fill_count;
		let right = fill / 2;
		let left = fill - right;

		for i in 0..left {
			let y = (i as f64 / left as f64) * self.height;
			let life = self.rng.between(0.5, 1.0);
			self.spawn(Side::Left, y, life);
			if i < right {
				self.spawn(Side::Right, y, life);
			}
		}
	}

	fn spawn(&mut self, side: Side, y: f64, life: f64) {
		let config = &self.config;
		let rng = &mut self.rng;

		let (side, x) = match config.spawn_region {
			SpawnRegion::Edges { inset } => {
				let offset = inset.sample(rng);
				match side {
					Side::Left => (side, offset),
					Side::Right => (side, self.width - offset),
				}
			}
			// The side follows the position so no particle starts past the target.
			SpawnRegion::Anywhere => {
				let x = rng.next_unit() * self.width;
				let side = if x < self.target_x { Side::Left } else { Side::Right };
				(side, x)
			}
		};
		let vx = side.sign() * (config.drift_speed + rng.next_unit() * config.drift_jitter);
		let vy = -(config.rise_speed + rng.next_unit() * config.rise_jitter);
		let peak_opacity = config.opacity.sample(rng);
		let opacity = match config.fade {
			FadeCurve::WithLife => peak_opacity * life,
			FadeCurve::Linear { .. } => peak_opacity,
		};

		self.particles.push(Particle {
			serial: self.next_serial,
			side,
			x,
			y,
			vx,
			vy,
			size: config.size.sample(rng),
			size_growth: config.size_growth.sample(rng),
			opacity,
			peak_opacity,
			life,
			max_life: config.life.sample(rng),
			angle: rng.next_unit() * TAU,
			rotation_speed: (rng.next_unit() - 0.5) * 2.0 * config.rotation_speed,
			phase: rng.next_unit() * TAU,
			sway: config.sway_amplitude.sample(rng),
		});
		self.next_serial += 1;
	}

	/// Advances the field by one tick of `dt` seconds.
	pub fn advance(&mut self, dt: f64) {
		self.elapsed += dt;
		self.spawn_tick();
		self.enforce_cap();

		let scale = dt * REFERENCE_FPS;
		let before = self.particles.len();
		let survivors: Vec<Particle> = self
			.particles
			.drain(..)
			.filter_map(|mut p| {
				step(&mut p, &self.config, self.target_x, self.elapsed, scale);
				(!is_expired(&p, &self.config, self.target_x)).then_some(p)
			})
			.collect();
		self.particles = survivors;

		let culled = before - self.particles.len();
		if culled > 0 {
			debug!("smoke-field: culled {culled}, {} live", self.particles.len());
		}
	}

	fn spawn_tick(&mut self) {
		match self.config.spawn {
			SpawnPolicy::Steady { per_tick } => {
				for _ in 0..per_tick {
					let side = if self.rng.next_unit() < 0.5 {
						Side::Left
					} else {
						Side::Right
					};
					let y = self.rng.next_unit() * self.height;
					self.spawn(side, y, 1.0);
				}
			}
			SpawnPolicy::Chance { per_side } => {
				for side in [Side::Left, Side::Right] {
					if self.rng.next_unit() < per_side {
						let y = self.rng.next_unit() * self.height;
						self.spawn(side, y, 1.0);
					}
				}
			}
		}
	}

	/// Drops the oldest particles beyond the population cap.
	fn enforce_cap(&mut self) {
		let max = self.config.max_particles;
		if self.particles.len() > max {
			let surplus = self.particles.len() - max;
			self.particles.drain(..surplus);
		}
	}

	/// Swaps in a new configuration. Live particles are kept; a lower cap takes
	/// effect on the next tick, oldest first.
	pub fn reconfigure(&mut self, config: FieldConfig) -> Result<(), ConfigError> {
		config.validate()?;
		self.config = config;
		Ok(())
	}

	/// Updates the stored surface size and convergence target. Live particles
	/// are left untouched.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.target_x = width / 2.0;
	}
}

impl<R> ParticleField<R> {
	/// Live particles, oldest first.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Number of live particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether no particle is alive.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Configuration in effect.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Seconds of simulated time since construction.
	pub fn elapsed(&self) -> f64 {
		self.elapsed
	}

	/// X coordinate particles converge on.
	pub fn target_x(&self) -> f64 {
		self.target_x
	}

	/// Field size in CSS pixels.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}
}

/// One tick of kinematics for a single particle. `scale` is the step length
/// in reference ticks.
fn step(p: &mut Particle, config: &FieldConfig, target_x: f64, elapsed: f64, scale: f64) {
	// Attraction towards the target, proportional to distance.
	p.vx += (target_x - p.x) * config.attraction * scale;

	p.x += p.vx * scale;
	p.y += p.vy * scale;
	p.vy += config.buoyancy * scale;

	p.life -= scale / p.max_life;
	fade(p, config.fade, scale, 0.0);

	let phase = elapsed * config.sway_frequency + p.phase;
	p.vx += phase.sin() * p.sway * scale;
	p.vy += (elapsed * config.sway_frequency * config.vertical_sway_ratio + p.phase).sin()
		* p.sway * 0.5
		* scale;

	// Dissolve faster at the meeting point instead of piling up there.
	if (p.x - target_x).abs() < config.convergence_radius && p.life > config.convergence_fade_min_life {
		let extra = config.convergence_fade * scale;
		p.life -= extra;
		fade(p, config.fade, 0.0, extra);
	}

	let drag = config.drag.powf(scale);
	p.vx *= drag;
	p.vy *= drag;
	p.size += p.size_growth * scale;
	p.angle += p.rotation_speed * scale;
}

/// Applies the fade curve. Linear fading loses `per_tick * scale + extra`;
/// life-linked fading follows the already reduced life. Opacity never rises.
fn fade(p: &mut Particle, curve: FadeCurve, scale: f64, extra: f64) {
	match curve {
		FadeCurve::WithLife => p.opacity = p.opacity.min(p.peak_opacity * p.life),
		FadeCurve::Linear { per_tick } => p.opacity -= per_tick * scale + extra,
	}
}

fn is_expired(p: &Particle, config: &FieldConfig, target_x: f64) -> bool {
	p.is_spent()
		|| p.y < -config.top_removal_margin
		|| config
			.overshoot_margin
			.is_some_and(|margin| p.has_overshot(target_x, margin))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::smoke_field::config::Span;
	use rand::SeedableRng;

	const TICK: f64 = 1.0 / REFERENCE_FPS;

	/// Always returns the same draw.
	struct Constant(f64);

	impl RandomSource for Constant {
		fn next_unit(&mut self) -> f64 {
			self.0
		}
	}

	fn quiet_config() -> FieldConfig {
		FieldConfig {
			max_particles: 4,
			initial_fill_count: 4,
			spawn: SpawnPolicy::Steady { per_tick: 0 },
			..FieldConfig::default()
		}
	}

	#[test]
	fn prefill_splits_evenly_between_sides() {
		let field = ParticleField::new(quiet_config(), 800.0, 600.0, SmallRng::seed_from_u64(1)).unwrap();
		let left = field.particles().iter().filter(|p| p.side == Side::Left).count();
		assert_eq!(field.len(), 4);
		assert_eq!(left, 2);
	}

	#[test]
	fn one_tick_moves_fresh_particles_inwards_and_fades_them() {
		let mut field =
			ParticleField::new(quiet_config(), 800.0, 600.0, SmallRng::seed_from_u64(9)).unwrap();
		let before = field.particles().to_vec();

		field.advance(0.016);

		assert_eq!(field.len(), 4);
		for (old, new) in before.iter().zip(field.particles()) {
			assert_eq!(old.serial, new.serial);
			let dx = new.x - old.x;
			assert_eq!(dx.signum(), old.side.sign(), "particle {} moved the wrong way", old.serial);
			assert!(new.opacity < old.opacity);
		}
	}

	#[test]
	fn constant_draws_give_exact_trajectory() {
		let config = FieldConfig {
			max_particles: 1,
			initial_fill_count: 1,
			spawn: SpawnPolicy::Steady { per_tick: 0 },
			spawn_region: SpawnRegion::Edges {
				inset: Span::new(0.0, 10.0),
			},
			drift_speed: 1.0,
			drift_jitter: 0.0,
			rise_speed: 0.5,
			rise_jitter: 0.0,
			buoyancy: 0.0,
			attraction: 0.0,
			sway_amplitude: Span::fixed(0.0),
			..FieldConfig::default()
		};
		let mut field = ParticleField::new(config, 100.0, 100.0, Constant(0.5)).unwrap();
		let p = &field.particles()[0];
		assert_eq!((p.x, p.y), (5.0, 0.0));

		field.advance(TICK);
		let p = &field.particles()[0];
		assert!((p.x - 6.0).abs() < 1e-9);
		assert!((p.y + 0.5).abs() < 1e-9);
	}

	#[test]
	fn cap_evicts_oldest_first() {
		let config = FieldConfig {
			max_particles: 5,
			initial_fill_count: 0,
			spawn: SpawnPolicy::Steady { per_tick: 3 },
			overshoot_margin: None,
			life: Span::fixed(10_000.0),
			top_removal_margin: 1e9,
			..FieldConfig::default()
		};
		let mut field = ParticleField::new(config, 800.0, 600.0, SmallRng::seed_from_u64(3)).unwrap();

		field.advance(TICK);
		let serials: Vec<u64> = field.particles().iter().map(|p| p.serial).collect();
		assert_eq!(serials, vec![0, 1, 2]);

		field.advance(TICK);
		let serials: Vec<u64> = field.particles().iter().map(|p| p.serial).collect();
		assert_eq!(serials, vec![1, 2, 3, 4, 5]);
	}

	#[test]
	fn fully_faded_particles_are_gone_after_the_tick() {
		let config = FieldConfig {
			max_particles: 2,
			initial_fill_count: 2,
			spawn: SpawnPolicy::Steady { per_tick: 0 },
			opacity: Span::fixed(0.01),
			fade: FadeCurve::Linear { per_tick: 0.006 },
			..FieldConfig::default()
		};
		let mut field = ParticleField::new(config, 800.0, 600.0, SmallRng::seed_from_u64(5)).unwrap();
		field.advance(TICK);
		assert_eq!(field.len(), 2);
		field.advance(TICK);
		assert!(field.is_empty());
	}

	#[test]
	fn rising_past_top_margin_removes() {
		let config = FieldConfig {
			max_particles: 1,
			initial_fill_count: 1,
			spawn: SpawnPolicy::Steady { per_tick: 0 },
			rise_speed: 150.0,
			rise_jitter: 0.0,
			top_removal_margin: 100.0,
			..FieldConfig::default()
		};
		let mut field = ParticleField::new(config, 800.0, 600.0, SmallRng::seed_from_u64(2)).unwrap();
		assert_eq!(field.particles()[0].y, 0.0);
		field.advance(TICK);
		assert!(field.is_empty());
	}

	#[test]
	fn convergence_zone_accelerates_fading() {
		let config = FieldConfig {
			max_particles: 1,
			initial_fill_count: 1,
			spawn: SpawnPolicy::Steady { per_tick: 0 },
			spawn_region: SpawnRegion::Anywhere,
			drift_speed: 0.0,
			drift_jitter: 0.0,
			rise_jitter: 0.0,
			sway_amplitude: Span::fixed(0.0),
			..FieldConfig::default()
		};
		// Constant(0.5) places the particle exactly on the target.
		let mut near = ParticleField::new(config.clone(), 800.0, 600.0, Constant(0.5)).unwrap();
		let mut far = ParticleField::new(
			FieldConfig {
				convergence_radius: 0.0,
				..config
			},
			800.0,
			600.0,
			Constant(0.5),
		)
		.unwrap();

		near.advance(TICK);
		far.advance(TICK);
		assert!(near.particles()[0].opacity < far.particles()[0].opacity);
	}

	#[test]
	fn resize_moves_target_but_keeps_particles() {
		let mut field =
			ParticleField::new(quiet_config(), 800.0, 600.0, SmallRng::seed_from_u64(4)).unwrap();
		let before = field.particles().to_vec();
		field.resize(1200.0, 700.0);
		assert_eq!(field.target_x(), 600.0);
		assert_eq!(field.size(), (1200.0, 700.0));
		assert_eq!(field.particles(), before.as_slice());
	}

	#[test]
	fn chance_policy_spawns_per_side() {
		let config = FieldConfig {
			max_particles: 10,
			initial_fill_count: 0,
			spawn: SpawnPolicy::Chance { per_side: 0.4 },
			..FieldConfig::default()
		};
		let mut spawns = ParticleField::new(config.clone(), 800.0, 600.0, Constant(0.3)).unwrap();
		spawns.advance(TICK);
		assert_eq!(spawns.len(), 2);

		let mut idle = ParticleField::new(config, 800.0, 600.0, Constant(0.7)).unwrap();
		idle.advance(TICK);
		assert!(idle.is_empty());
	}

	#[test]
	fn invalid_config_is_rejected_at_construction() {
		let config = FieldConfig {
			max_particles: 0,
			..FieldConfig::default()
		};
		assert!(ParticleField::new(config, 800.0, 600.0, Constant(0.5)).is_err());
	}

	#[test]
	fn anywhere_spawns_take_the_side_they_land_on() {
		let config = FieldConfig {
			spawn_region: SpawnRegion::Anywhere,
			..FieldConfig::default()
		};
		let field = ParticleField::new(config, 800.0, 600.0, SmallRng::seed_from_u64(21)).unwrap();
		let target = field.target_x();
		assert!(field.particles().iter().all(|p| !p.has_overshot(target, 0.0)));
		assert!(field.particles().iter().any(|p| p.side == Side::Left));
		assert!(field.particles().iter().any(|p| p.side == Side::Right));
	}

	#[test]
	fn reconfigure_keeps_particles_until_the_next_tick() {
		let mut field =
			ParticleField::new(quiet_config(), 800.0, 600.0, SmallRng::seed_from_u64(6)).unwrap();
		field
			.reconfigure(FieldConfig {
				max_particles: 2,
				initial_fill_count: 0,
				..quiet_config()
			})
			.unwrap();
		assert_eq!(field.len(), 4);

		field.advance(TICK);
		let serials: Vec<u64> = field.particles().iter().map(|p| p.serial).collect();
		assert_eq!(serials, vec![2, 3]);

		let invalid = FieldConfig {
			max_particles: 0,
			..quiet_config()
		};
		assert!(field.reconfigure(invalid).is_err());
		assert_eq!(field.config().max_particles, 2);
	}
}
