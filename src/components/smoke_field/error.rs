//! Error types for configuring and starting the smoke field.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Invalid field configuration. These are programmer errors and are reported
/// when the field is built, never mid-animation.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// `maxParticles` is zero.
	#[error("maxParticles must be at least 1")]
	ZeroCapacity,
	/// Prefill larger than the population cap.
	#[error("initialFillCount ({fill}) exceeds maxParticles ({max})")]
	FillExceedsCapacity {
		/// Requested prefill.
		fill: usize,
		/// Population cap.
		max: usize,
	},
	/// Steady spawning outpaces the population cap.
	#[error("spawn.perTick ({per_tick}) exceeds maxParticles ({max})")]
	SpawnExceedsCapacity {
		/// Requested spawns per tick.
		per_tick: u32,
		/// Population cap.
		max: usize,
	},
	/// Spawn chance outside (0, 1].
	#[error("spawn chance must be in (0, 1], got {0}")]
	SpawnChance(f64),
	/// A field that must be finite and non-negative is not.
	#[error("{field} must be finite and non-negative, got {value}")]
	Negative {
		/// Config key.
		field: &'static str,
		/// Offending value.
		value: f64,
	},
	/// A field is NaN or infinite.
	#[error("{field} must be finite")]
	NotFinite {
		/// Config key.
		field: &'static str,
	},
	/// A span with `min > max`.
	#[error("{field} range is inverted: min {min} > max {max}")]
	InvertedRange {
		/// Config key.
		field: &'static str,
		/// Lower bound given.
		min: f64,
		/// Upper bound given.
		max: f64,
	},
	/// A field that must be positive is not.
	#[error("{field} must be greater than zero, got {value}")]
	NotPositive {
		/// Config key.
		field: &'static str,
		/// Offending value.
		value: f64,
	},
	/// A fraction outside [0, 1].
	#[error("{field} must be within [0, 1], got {value}")]
	OutOfUnitRange {
		/// Config key.
		field: &'static str,
		/// Offending value.
		value: f64,
	},
	/// The style has no gradient stops.
	#[error("gradient needs at least one stop")]
	NoGradientStops,
	/// Gradient offsets are not ascending within [0, 1].
	#[error("gradient stop offsets must ascend within [0, 1]")]
	UnorderedGradientStops,
	/// The outermost gradient stop is not transparent.
	#[error("last gradient stop must be fully transparent, got alpha {0}")]
	OpaqueGradientEdge(f64),
	/// No profile with this name.
	#[error("unknown profile `{0}`")]
	UnknownProfile(String),
	/// The document is not valid JSON for a config.
	#[error("failed to parse smoke config: {0}")]
	Parse(#[from] serde_json::Error),
}

/// The canvas could not provide a usable 2D context.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// `getContext("2d")` returned null.
	#[error("canvas has no 2d context")]
	NoContext,
	/// The context is some other kind.
	#[error("canvas context is not a CanvasRenderingContext2d")]
	WrongContextType,
	/// `getContext` threw.
	#[error("canvas rejected getContext: {0}")]
	Js(String),
}

/// A frame or resize registration was refused by the host.
#[derive(Debug, Error)]
#[error("host refused to {action}: {message}")]
pub struct HostError {
	/// What was being attempted.
	pub action: &'static str,
	/// The JS error text.
	pub message: String,
}

impl HostError {
	/// Wraps a thrown JS value.
	pub fn from_js(action: &'static str, value: &JsValue) -> Self {
		Self {
			action,
			message: js_message(value),
		}
	}
}

/// Failure to bring the animator up. Surfaced to the caller so it can decide
/// to run without the effect.
#[derive(Debug, Error)]
pub enum StartError {
	/// Not running in a browser window.
	#[error("no browser window available")]
	NoWindow,
	/// Invalid configuration.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The canvas is unusable.
	#[error(transparent)]
	Surface(#[from] SurfaceError),
	/// A frame or resize registration failed.
	#[error(transparent)]
	Host(#[from] HostError),
}

pub(crate) fn js_message(value: &JsValue) -> String {
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
