//! Drawing surface abstraction.
//!
//! The renderer only needs a handful of 2D raster operations. Keeping them
//! behind a trait lets the canvas backend live in [`super::canvas`] while the
//! rendering logic is exercised against an in-memory recorder.

use super::theme::{BlendMode, Color};

/// Minimal 2D raster context the smoke renderer draws onto.
pub trait Surface {
	/// Drawable size in CSS pixels.
	fn size(&self) -> (f64, f64);

	/// A zero-sized (or detached) surface cannot be drawn on this frame.
	fn is_available(&self) -> bool {
		let (w, h) = self.size();
		w > 0.0 && h > 0.0
	}

	/// Resizes the backing store to the given CSS pixel size.
	fn set_size(&mut self, width: f64, height: f64);

	/// Clears the whole surface to transparent.
	fn clear(&mut self);

	/// Fills the whole surface with `color`, alpha included.
	fn fill_rect(&mut self, color: Color);

	fn set_global_alpha(&mut self, alpha: f64);

	fn set_blend_mode(&mut self, mode: BlendMode);

	/// Fills a circle of `radius` centred at (`x`, `y`) and rotated by
	/// `angle`, with a radial gradient through `stops` (offset, colour).
	fn fill_radial(&mut self, x: f64, y: f64, angle: f64, radius: f64, stops: &[(f64, Color)]);
}
