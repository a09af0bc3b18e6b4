//! HTML canvas backend for [`Surface`].

use std::f64::consts::TAU;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::{SurfaceError, js_message};
use super::surface::Surface;
use super::theme::{BlendMode, Color};

/// A canvas 2D context drawn in CSS pixels, with the backing store scaled by
/// the device pixel ratio.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	width: f64,
	height: f64,
	pixel_ratio: f64,
}

impl CanvasSurface {
	/// Wraps `canvas`, taking its current size. A non-positive `pixel_ratio` counts as 1.
	pub fn new(canvas: HtmlCanvasElement, pixel_ratio: f64) -> Result<Self, SurfaceError> {
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.map_err(|e| SurfaceError::Js(js_message(&e)))?
			.ok_or(SurfaceError::NoContext)?
			.dyn_into()
			.map_err(|_| SurfaceError::WrongContextType)?;

		let pixel_ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
		Ok(Self {
			width: canvas.width() as f64 / pixel_ratio,
			height: canvas.height() as f64 / pixel_ratio,
			canvas,
			ctx,
			pixel_ratio,
		})
	}
}

impl Surface for CanvasSurface {
	fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	fn set_size(&mut self, width: f64, height: f64) {
		self.width = width.max(0.0);
		self.height = height.max(0.0);
		self.canvas.set_width((self.width * self.pixel_ratio) as u32);
		self.canvas.set_height((self.height * self.pixel_ratio) as u32);

		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{}px", self.width));
		let _ = style.set_property("height", &format!("{}px", self.height));

		// Resizing resets the context state, so the scale is reapplied.
		let _ = self
			.ctx
			.set_transform(self.pixel_ratio, 0.0, 0.0, self.pixel_ratio, 0.0, 0.0);
	}

	fn clear(&mut self) {
		self.ctx.clear_rect(0.0, 0.0, self.width, self.height);
	}

	fn fill_rect(&mut self, color: Color) {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(0.0, 0.0, self.width, self.height);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn set_blend_mode(&mut self, mode: BlendMode) {
		let _ = self.ctx.set_global_composite_operation(mode.as_css());
	}

	fn fill_radial(&mut self, x: f64, y: f64, angle: f64, radius: f64, stops: &[(f64, Color)]) {
		let gradient = match self
			.ctx
			.create_radial_gradient(0.0, 0.0, 0.0, 0.0, 0.0, radius)
		{
			Ok(gradient) => gradient,
			Err(e) => {
				debug!("smoke-field: skipped puff: {}", js_message(&e));
				return;
			}
		};
		for (offset, color) in stops {
			let _ = gradient.add_color_stop(*offset as f32, &color.to_css());
		}

		self.ctx.save();
		let _ = self.ctx.translate(x, y);
		let _ = self.ctx.rotate(angle);
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.begin_path();
		let _ = self.ctx.arc(0.0, 0.0, radius, 0.0, TAU);
		self.ctx.fill();
		self.ctx.restore();
	}
}
