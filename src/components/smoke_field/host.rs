//! Frame scheduling and viewport notifications.
//!
//! [`FrameHost`] is what the animator needs from its environment: one-shot
//! "call me before the next repaint" requests and a resize subscription.
//! [`BrowserHost`] provides them with `requestAnimationFrame` and a window
//! `resize` listener.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

use super::error::HostError;

/// A pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// An active resize subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResizeHandle(pub u32);

/// Scheduler and viewport capabilities of the hosting environment.
pub trait FrameHost {
	/// Requests a single frame callback.
	fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

	/// Cancels a frame request that has not fired yet.
	fn cancel_frame(&mut self, handle: FrameHandle);

	/// Starts delivering viewport resize notifications.
	fn subscribe_resize(&mut self) -> Result<ResizeHandle, HostError>;

	/// Ends a resize subscription.
	fn unsubscribe_resize(&mut self, handle: ResizeHandle);

	/// Current viewport size in CSS pixels.
	fn viewport_size(&self) -> (f64, f64);
}

/// Browser window host. The callbacks are created by the caller and routed
/// back into the animator that owns this host.
pub struct BrowserHost {
	window: Window,
	on_frame: Closure<dyn FnMut(f64)>,
	on_resize: Closure<dyn FnMut()>,
	resize_listeners: u32,
}

impl BrowserHost {
	/// Host over `window`, invoking `on_frame` and `on_resize` from the browser.
	pub fn new(
		window: Window,
		on_frame: Closure<dyn FnMut(f64)>,
		on_resize: Closure<dyn FnMut()>,
	) -> Self {
		Self {
			window,
			on_frame,
			on_resize,
			resize_listeners: 0,
		}
	}

	/// Physical pixels per CSS pixel.
	pub fn device_pixel_ratio(&self) -> f64 {
		self.window.device_pixel_ratio()
	}
}

impl FrameHost for BrowserHost {
	fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
		self.window
			.request_animation_frame(self.on_frame.as_ref().unchecked_ref())
			.map(FrameHandle)
			.map_err(|e| HostError::from_js("request an animation frame", &e))
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}

	fn subscribe_resize(&mut self) -> Result<ResizeHandle, HostError> {
		self.window
			.add_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref())
			.map_err(|e| HostError::from_js("add a resize listener", &e))?;
		self.resize_listeners += 1;
		Ok(ResizeHandle(self.resize_listeners))
	}

	fn unsubscribe_resize(&mut self, _handle: ResizeHandle) {
		let _ = self
			.window
			.remove_event_listener_with_callback("resize", self.on_resize.as_ref().unchecked_ref());
	}

	fn viewport_size(&self) -> (f64, f64) {
		let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
		(read(self.window.inner_width()), read(self.window.inner_height()))
	}
}
