//! Draws a particle field onto a [`Surface`].
//!
//! Two passes:
//! 1. Trail fade (low-alpha background fill) or a full clear
//! 2. One soft radial puff per visible particle, oldest first so newer
//!    particles sit on top

use super::field::ParticleField;
use super::surface::Surface;
use super::theme::{BlendMode, Color, SmokeStyle};

/// Renders every live particle with positive opacity. Returns how many
/// puffs were drawn; nothing is drawn on an unavailable surface.
pub fn render<R, S: Surface + ?Sized>(
	field: &ParticleField<R>,
	surface: &mut S,
	style: &SmokeStyle,
	intensity: f64,
) -> usize {
	if !surface.is_available() {
		return 0;
	}

	draw_background(surface, style);

	surface.set_global_alpha(intensity.clamp(0.0, 1.0));
	surface.set_blend_mode(style.blend);

	let mut drawn = 0;
	let mut stops = Vec::with_capacity(style.stops.len());
	for p in field.particles() {
		if p.opacity <= 0.0 || p.size <= 0.0 {
			continue;
		}
		stops.clear();
		stops.extend(puff_stops(style, p.opacity));
		surface.fill_radial(p.x, p.y, p.angle, p.size, &stops);
		drawn += 1;
	}

	surface.set_blend_mode(BlendMode::SourceOver);
	surface.set_global_alpha(1.0);
	drawn
}

fn draw_background<S: Surface + ?Sized>(surface: &mut S, style: &SmokeStyle) {
	if style.trail_alpha > 0.0 {
		surface.set_blend_mode(BlendMode::SourceOver);
		surface.set_global_alpha(1.0);
		surface.fill_rect(style.background.with_alpha(style.trail_alpha));
	} else {
		surface.clear();
	}
}

/// Gradient stops for a particle at `opacity`: each stop's colour carries
/// `opacity * stop.alpha`, capped at fully opaque.
fn puff_stops(style: &SmokeStyle, opacity: f64) -> impl Iterator<Item = (f64, Color)> + '_ {
	style.stops.iter().map(move |stop| {
		let alpha = (opacity * stop.alpha).clamp(0.0, 1.0);
		(stop.offset, stop.color.with_alpha(alpha))
	})
}
