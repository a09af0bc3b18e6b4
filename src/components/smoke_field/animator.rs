//! The self-rescheduling animation loop.
//!
//! [`SmokeAnimator`] ties a [`ParticleField`] to a drawing surface and a frame
//! host. Every frame callback throttles through the [`FrameClock`], advances
//! the field by the due number of fixed steps, renders once, and requests the
//! next frame. Everything registered in [`start`] is released in [`stop`],
//! which also runs on drop.
//!
//! The field runs the base configuration thinned for the current
//! [`DeviceClass`], re-derived whenever a resize crosses a breakpoint.
//!
//! [`start`]: SmokeAnimator::start
//! [`stop`]: SmokeAnimator::stop

use log::{debug, info, warn};

use super::clock::FrameClock;
use super::config::{DeviceClass, FieldConfig};
use super::error::{ConfigError, StartError};
use super::field::ParticleField;
use super::host::{FrameHandle, FrameHost, ResizeHandle};
use super::intensity::IntensityRamp;
use super::render;
use super::rng::RandomSource;
use super::surface::Surface;

/// What a single frame callback did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	/// Advanced the field and drew it.
	Rendered {
		/// Fixed steps run this frame.
		steps: u32,
		/// Particles drawn.
		drawn: usize,
	},
	/// Too soon since the last step; nothing updated.
	Throttled,
	/// Surface is zero-sized or detached; retried next frame.
	SurfaceUnavailable,
	/// The loop is stopped and did not reschedule.
	Stopped,
}

/// Particle field animator bound to a surface and a frame host.
pub struct SmokeAnimator<H: FrameHost, S: Surface, R: RandomSource> {
	field: ParticleField<R>,
	base: FieldConfig,
	device: DeviceClass,
	surface: S,
	host: H,
	clock: FrameClock,
	intensity: IntensityRamp,
	pending_frame: Option<FrameHandle>,
	resize_subscription: Option<ResizeHandle>,
	running: bool,
}

impl<H: FrameHost, S: Surface, R: RandomSource> SmokeAnimator<H, S, R> {
	/// Builds the field at the host's current viewport size, scaled for its
	/// device class. Nothing is registered until [`start`](Self::start).
	pub fn new(config: FieldConfig, surface: S, host: H, rng: R) -> Result<Self, ConfigError> {
		let (width, height) = host.viewport_size();
		let device = DeviceClass::from_width(width);
		let clock = FrameClock::new(config.target_fps, config.max_catch_up);
		let intensity = IntensityRamp::fade_in(config.style.intensity, config.style.fade_in_speed);
		let field = ParticleField::new(config.clone().for_device(device), width, height, rng)?;

		Ok(Self {
			field,
			base: config,
			device,
			surface,
			host,
			clock,
			intensity,
			pending_frame: None,
			resize_subscription: None,
			running: false,
		})
	}

	/// Subscribes to viewport changes, sizes the surface and schedules the
	/// first frame. Any registration made here is undone if a later one fails.
	pub fn start(&mut self) -> Result<(), StartError> {
		if self.running {
			return Ok(());
		}

		self.resize_subscription = Some(self.host.subscribe_resize()?);
		self.sync_viewport();

		match self.host.request_frame() {
			Ok(handle) => self.pending_frame = Some(handle),
			Err(e) => {
				self.release();
				return Err(e.into());
			}
		}

		self.clock.reset();
		self.running = true;
		info!(
			"smoke-field: started with {} particles at {:?}",
			self.field.len(),
			self.field.size()
		);
		Ok(())
	}

	/// Frame callback. `now_ms` is the host's frame timestamp.
	pub fn on_frame(&mut self, now_ms: f64) -> FrameOutcome {
		// This request has fired, there is nothing left to cancel.
		self.pending_frame = None;
		if !self.running {
			return FrameOutcome::Stopped;
		}

		let outcome = self.run_frame(now_ms);

		match self.host.request_frame() {
			Ok(handle) => self.pending_frame = Some(handle),
			Err(e) => {
				warn!("smoke-field: stopping, {e}");
				self.stop();
			}
		}
		outcome
	}

	fn run_frame(&mut self, now_ms: f64) -> FrameOutcome {
		let steps = self.clock.tick(now_ms);
		if steps == 0 {
			return FrameOutcome::Throttled;
		}
		if !self.surface.is_available() {
			debug!("smoke-field: surface unavailable, skipping frame");
			return FrameOutcome::SurfaceUnavailable;
		}

		let dt = self.clock.step_seconds();
		for _ in 0..steps {
			self.field.advance(dt);
		}
		self.intensity.tick(dt * steps as f64);

		let drawn = render::render(
			&self.field,
			&mut self.surface,
			&self.field.config().style,
			self.intensity.value(),
		);
		FrameOutcome::Rendered { steps, drawn }
	}

	/// Applies a new viewport size. Live particles are kept; crossing a device
	/// breakpoint rescales the population, trimmed on the next tick.
	pub fn on_resize(&mut self, width: f64, height: f64) {
		self.surface.set_size(width, height);
		self.field.resize(width, height);

		// A collapsed surface says nothing about the screen.
		if width <= 0.0 {
			return;
		}
		let device = DeviceClass::from_width(width);
		if device == self.device {
			return;
		}
		match self.field.reconfigure(self.base.clone().for_device(device)) {
			Ok(()) => {
				debug!("smoke-field: {:?} -> {device:?}", self.device);
				self.device = device;
			}
			Err(e) => warn!("smoke-field: keeping {:?} settings, {e}", self.device),
		}
	}

	/// Re-reads the viewport from the host and resizes to it.
	pub fn sync_viewport(&mut self) {
		let (width, height) = self.host.viewport_size();
		self.on_resize(width, height);
	}

	/// Eases global intensity towards `level` (0.0..=1.0) of the style's
	/// configured intensity.
	pub fn set_intensity(&mut self, level: f64) {
		let full = self.field.config().style.intensity;
		self.intensity.set_target(full * level.clamp(0.0, 1.0));
	}

	/// Stops scheduling frames and drops every host registration. Safe to
	/// call repeatedly.
	pub fn stop(&mut self) {
		let was_running = self.running;
		self.running = false;
		self.release();
		if was_running {
			info!("smoke-field: stopped");
		}
	}

	fn release(&mut self) {
		if let Some(handle) = self.pending_frame.take() {
			self.host.cancel_frame(handle);
		}
		if let Some(handle) = self.resize_subscription.take() {
			self.host.unsubscribe_resize(handle);
		}
	}

	/// Whether frames are being scheduled.
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// The simulated field.
	pub fn field(&self) -> &ParticleField<R> {
		&self.field
	}

	/// Device class the field is currently scaled for.
	pub fn device(&self) -> DeviceClass {
		self.device
	}

	/// The surface drawn on.
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// The frame host.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Current global intensity, after easing.
	pub fn intensity(&self) -> f64 {
		self.intensity.value()
	}
}

impl<H: FrameHost, S: Surface, R: RandomSource> Drop for SmokeAnimator<H, S, R> {
	fn drop(&mut self) {
		self.stop();
	}
}
