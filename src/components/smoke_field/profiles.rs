//! Named configuration profiles and JSON config documents.
//!
//! Each profile reproduces one look with the same engine:
//! - [`converging_streams`]: two wide streams flowing in from off-screen and
//!   dissolving where they meet in the middle.
//! - [`drifting_puffs`]: sparse grey puffs that swell as they drift inwards,
//!   multiplied over a white motion trail.
//! - [`ambient_swirl`]: a dense, slowly spinning cloud layer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::{FadeCurve, FieldConfig, Span, SpawnPolicy, SpawnRegion};
use super::error::ConfigError;
use super::theme::SmokeStyle;

/// Built-in looks selectable by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profile {
	/// Two streams rising from the side edges and meeting in the middle.
	#[default]
	ConvergingStreams,
	/// Slow, growing ink puffs over a white trail.
	DriftingPuffs,
	/// A dense, slowly rotating cloud with no drift.
	AmbientSwirl,
}

impl Profile {
	/// Every profile, in menu order.
	pub const ALL: [Profile; 3] = [
		Profile::ConvergingStreams,
		Profile::DriftingPuffs,
		Profile::AmbientSwirl,
	];

	/// Name accepted by `FromStr` and config documents.
	pub fn name(self) -> &'static str {
		match self {
			Profile::ConvergingStreams => "convergingStreams",
			Profile::DriftingPuffs => "driftingPuffs",
			Profile::AmbientSwirl => "ambientSwirl",
		}
	}

	/// Full configuration for this profile.
	pub fn config(self) -> FieldConfig {
		match self {
			Profile::ConvergingStreams => converging_streams(),
			Profile::DriftingPuffs => drifting_puffs(),
			Profile::AmbientSwirl => ambient_swirl(),
		}
	}
}

impl fmt::Display for Profile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Profile {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Profile::ALL
			.into_iter()
			.find(|p| p.name().eq_ignore_ascii_case(s))
			.ok_or_else(|| ConfigError::UnknownProfile(s.to_string()))
	}
}

/// Two converging streams entering from beyond both edges.
pub fn converging_streams() -> FieldConfig {
	FieldConfig {
		max_particles: 200,
		spawn: SpawnPolicy::Steady { per_tick: 2 },
		initial_fill_count: 200,
		spawn_region: SpawnRegion::Edges {
			inset: Span::new(-30.0, 0.0),
		},
		drift_speed: 0.2,
		drift_jitter: 0.1,
		rise_speed: 0.0,
		rise_jitter: 0.15,
		buoyancy: -0.005,
		attraction: 0.00001,
		drag: 1.0,
		sway_amplitude: Span::fixed(0.03),
		sway_frequency: 1.5,
		vertical_sway_ratio: 2.0 / 3.0,
		convergence_radius: 20.0,
		convergence_fade: 0.005,
		convergence_fade_min_life: 0.3,
		overshoot_margin: Some(50.0),
		top_removal_margin: 100.0,
		size: Span::new(30.0, 126.0),
		size_growth: Span::fixed(0.0),
		opacity: Span::fixed(0.3),
		fade: FadeCurve::WithLife,
		life: Span::new(300.0, 800.0),
		rotation_speed: 0.002,
		target_fps: 60.0,
		max_catch_up: 4,
		style: SmokeStyle::soft_grey(),
	}
}

/// Sparse puffs that swell and slow as they drift in from just inside the edges.
pub fn drifting_puffs() -> FieldConfig {
	FieldConfig {
		max_particles: 400,
		spawn: SpawnPolicy::Chance { per_side: 0.4 },
		initial_fill_count: 0,
		spawn_region: SpawnRegion::Edges {
			inset: Span::new(20.0, 100.0),
		},
		drift_speed: 0.3,
		drift_jitter: 0.8,
		rise_speed: 0.1,
		rise_jitter: 0.3,
		buoyancy: 0.0,
		attraction: 0.0,
		drag: 0.995,
		sway_amplitude: Span::new(0.003, 0.012),
		sway_frequency: 0.36,
		vertical_sway_ratio: 0.5,
		convergence_radius: 0.0,
		convergence_fade: 0.0,
		convergence_fade_min_life: 0.0,
		overshoot_margin: None,
		top_removal_margin: 100.0,
		size: Span::new(25.0, 65.0),
		size_growth: Span::new(0.15, 0.45),
		opacity: Span::new(0.1, 0.25),
		fade: FadeCurve::Linear { per_tick: 0.0003 },
		life: Span::new(300.0, 700.0),
		rotation_speed: 0.0025,
		target_fps: 60.0,
		max_catch_up: 4,
		style: SmokeStyle::ink(),
	}
}

/// Dense cloud layer that mostly spins in place.
pub fn ambient_swirl() -> FieldConfig {
	FieldConfig {
		max_particles: 160,
		spawn: SpawnPolicy::Chance { per_side: 0.02 },
		initial_fill_count: 160,
		spawn_region: SpawnRegion::Anywhere,
		drift_speed: 0.0,
		drift_jitter: 0.05,
		rise_speed: 0.0,
		rise_jitter: 0.02,
		buoyancy: 0.0,
		attraction: 0.0,
		drag: 1.0,
		sway_amplitude: Span::new(0.0005, 0.0015),
		sway_frequency: 0.4,
		vertical_sway_ratio: 0.7,
		convergence_radius: 0.0,
		convergence_fade: 0.0,
		convergence_fade_min_life: 0.0,
		overshoot_margin: None,
		top_removal_margin: 400.0,
		size: Span::new(120.0, 200.0),
		size_growth: Span::fixed(0.0),
		opacity: Span::new(0.2, 0.3),
		fade: FadeCurve::WithLife,
		life: Span::new(2400.0, 3600.0),
		rotation_speed: 0.015,
		target_fps: 60.0,
		max_catch_up: 4,
		style: SmokeStyle::cloud(),
	}
}

/// Parses a config document: an optional `profile` name plus any
/// [`FieldConfig`] keys overriding that profile.
///
/// ```json
/// { "profile": "driftingPuffs", "maxParticles": 120 }
/// ```
pub fn parse_config_document(json: &str) -> Result<FieldConfig, ConfigError> {
	let mut doc: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
	let profile = match doc.remove("profile") {
		Some(serde_json::Value::String(name)) => name.parse()?,
		Some(other) => return Err(ConfigError::UnknownProfile(other.to_string())),
		None => Profile::default(),
	};

	let mut merged = serde_json::to_value(profile.config())?;
	if let Some(base) = merged.as_object_mut() {
		for (key, value) in doc {
			match (base.get_mut(&key), value) {
				// One level of merging so `"style": {"intensity": 0.5}` keeps the rest.
				(Some(serde_json::Value::Object(existing)), serde_json::Value::Object(patch)) => {
					existing.extend(patch);
				}
				(_, value) => {
					base.insert(key, value);
				}
			}
		}
	}

	let config: FieldConfig = serde_json::from_value(merged)?;
	config.validate()?;
	Ok(config)
}
