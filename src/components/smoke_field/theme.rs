//! Visual styling for smoke puffs.
//!
//! Provides the colour type, blend modes, and the radial falloff used to draw
//! each particle.

use serde::{Deserialize, Serialize};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in [0, 1].
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	/// Opaque colour.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Colour with alpha `a`.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Neutral grey with the given channel value.
	pub const fn grey(v: u8) -> Self {
		Self::rgb(v, v, v)
	}

	/// Same colour at alpha `a`.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS colour string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Canvas compositing mode used while drawing particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlendMode {
	/// Normal painting.
	#[default]
	SourceOver,
	/// Darkens, for light backgrounds.
	Multiply,
	/// Lightens, for dark backgrounds.
	Screen,
	/// Additive.
	Lighter,
}

impl BlendMode {
	/// Value for `globalCompositeOperation`.
	pub fn as_css(self) -> &'static str {
		match self {
			BlendMode::SourceOver => "source-over",
			BlendMode::Multiply => "multiply",
			BlendMode::Screen => "screen",
			BlendMode::Lighter => "lighter",
		}
	}
}

/// One stop of a particle's radial gradient.
///
/// The drawn alpha at this stop is `particle opacity * alpha`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
	/// Position along the radius, 0.0 = center, 1.0 = edge.
	pub offset: f64,
	/// Colour at this stop; its own alpha is ignored.
	pub color: Color,
	/// Multiplier applied to the particle opacity.
	pub alpha: f64,
}

impl GradientStop {
	/// A stop at `offset` with an opacity multiplier `alpha`.
	pub const fn new(offset: f64, color: Color, alpha: f64) -> Self {
		Self {
			offset,
			color,
			alpha,
		}
	}
}

/// Complete drawing style for a smoke field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeStyle {
	/// Colour used for the motion-trail fill.
	pub background: Color,
	/// Alpha of the full-surface fill drawn before particles (0 = clear instead).
	#[serde(rename = "backgroundTrailAlpha")]
	pub trail_alpha: f64,
	/// Composite operation for the puffs.
	pub blend: BlendMode,
	/// Global intensity the effect eases towards after start (0.0..=1.0).
	pub intensity: f64,
	/// Exponential easing speed of the intensity ramp, per second.
	pub fade_in_speed: f64,
	/// Radial falloff from center to edge; the last stop should carry alpha 0.
	pub stops: Vec<GradientStop>,
}

impl SmokeStyle {
	/// Soft grey puffs over a barely visible white trail.
	pub fn soft_grey() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			trail_alpha: 0.004,
			blend: BlendMode::SourceOver,
			intensity: 0.9,
			fade_in_speed: 1.5,
			stops: vec![
				GradientStop::new(0.0, Color::grey(235), 1.0),
				GradientStop::new(0.45, Color::grey(225), 0.55),
				GradientStop::new(1.0, Color::grey(215), 0.0),
			],
		}
	}

	/// Darker multiplied puffs over a white trail, for light backgrounds.
	pub fn ink() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			trail_alpha: 0.08,
			blend: BlendMode::Multiply,
			intensity: 1.0,
			fade_in_speed: 2.0,
			stops: vec![
				GradientStop::new(0.0, Color::grey(100), 1.2),
				GradientStop::new(0.3, Color::grey(120), 0.8),
				GradientStop::new(0.6, Color::grey(140), 0.4),
				GradientStop::new(1.0, Color::grey(160), 0.0),
			],
		}
	}

	/// Pale cloud layer for dense ambient swirls.
	pub fn cloud() -> Self {
		Self {
			background: Color::rgb(255, 255, 255),
			trail_alpha: 0.0,
			blend: BlendMode::SourceOver,
			intensity: 0.8,
			fade_in_speed: 0.8,
			stops: vec![
				GradientStop::new(0.0, Color::grey(250), 0.9),
				GradientStop::new(0.5, Color::grey(245), 0.5),
				GradientStop::new(1.0, Color::grey(240), 0.0),
			],
		}
	}
}

impl Default for SmokeStyle {
	fn default() -> Self {
		Self::soft_grey()
	}
}
