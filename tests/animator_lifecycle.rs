//! Animator lifecycle against an in-memory host and surface.
//!
//! The host double counts outstanding frame requests and resize subscriptions
//! through shared cells, so teardown can be checked after the animator (and
//! the host it owns) has been dropped.

use std::cell::Cell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use smoke_field::components::smoke_field::{
	BlendMode, Color, DeviceClass, FieldConfig, FrameHandle, FrameHost, FrameOutcome, HostError, Profile,
	ResizeHandle, SmokeAnimator, SpawnPolicy, StartError, Surface,
};

// A little slower than the 60 Hz target so every frame owes exactly one step.
const FRAME_MS: f64 = 17.0;

#[derive(Default)]
struct Registrations {
	frames: Cell<i32>,
	resize: Cell<i32>,
	requests: Cell<i32>,
}

struct TestHost {
	regs: Rc<Registrations>,
	viewport: (f64, f64),
	refuse_frames: bool,
	refuse_resize: bool,
}

impl TestHost {
	fn new(regs: &Rc<Registrations>) -> Self {
		Self {
			regs: regs.clone(),
			viewport: (1280.0, 720.0),
			refuse_frames: false,
			refuse_resize: false,
		}
	}
}

impl FrameHost for TestHost {
	fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
		if self.refuse_frames {
			return Err(HostError {
				action: "request an animation frame",
				message: "refused".into(),
			});
		}
		self.regs.frames.set(self.regs.frames.get() + 1);
		self.regs.requests.set(self.regs.requests.get() + 1);
		Ok(FrameHandle(self.regs.requests.get()))
	}

	fn cancel_frame(&mut self, _handle: FrameHandle) {
		self.regs.frames.set(self.regs.frames.get() - 1);
	}

	fn subscribe_resize(&mut self) -> Result<ResizeHandle, HostError> {
		if self.refuse_resize {
			return Err(HostError {
				action: "add a resize listener",
				message: "refused".into(),
			});
		}
		self.regs.resize.set(self.regs.resize.get() + 1);
		Ok(ResizeHandle(1))
	}

	fn unsubscribe_resize(&mut self, _handle: ResizeHandle) {
		self.regs.resize.set(self.regs.resize.get() - 1);
	}

	fn viewport_size(&self) -> (f64, f64) {
		self.viewport
	}
}

#[derive(Default)]
struct CountingSurface {
	size: (f64, f64),
	puffs: usize,
	backgrounds: usize,
}

impl Surface for CountingSurface {
	fn size(&self) -> (f64, f64) {
		self.size
	}
	fn set_size(&mut self, width: f64, height: f64) {
		self.size = (width, height);
	}
	fn clear(&mut self) {
		self.backgrounds += 1;
	}
	fn fill_rect(&mut self, _color: Color) {
		self.backgrounds += 1;
	}
	fn set_global_alpha(&mut self, _alpha: f64) {}
	fn set_blend_mode(&mut self, _mode: BlendMode) {}
	fn fill_radial(&mut self, _x: f64, _y: f64, _angle: f64, _radius: f64, _stops: &[(f64, Color)]) {
		self.puffs += 1;
	}
}

type TestAnimator = SmokeAnimator<TestHost, CountingSurface, SmallRng>;

fn config() -> FieldConfig {
	FieldConfig {
		max_particles: 20,
		initial_fill_count: 20,
		spawn: SpawnPolicy::Steady { per_tick: 0 },
		..Profile::ConvergingStreams.config()
	}
}

fn animator(host: TestHost) -> TestAnimator {
	SmokeAnimator::new(config(), CountingSurface::default(), host, SmallRng::seed_from_u64(5))
		.expect("valid config")
}

/// Delivers the outstanding frame request. Like `requestAnimationFrame`, a
/// request is consumed once its callback runs.
fn fire(animator: &mut TestAnimator, now_ms: f64) -> FrameOutcome {
	let regs = animator.host().regs.clone();
	assert!(regs.frames.get() > 0, "callback without a pending request");
	regs.frames.set(regs.frames.get() - 1);
	animator.on_frame(now_ms)
}

fn run_frames(animator: &mut TestAnimator, from_ms: f64, count: usize) -> Vec<FrameOutcome> {
	(0..count)
		.map(|i| fire(animator, from_ms + i as f64 * FRAME_MS))
		.collect()
}

#[test]
fn start_registers_once_and_sizes_surface() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));

	animator.start().unwrap();
	animator.start().unwrap();

	assert!(animator.is_running());
	assert_eq!(regs.frames.get(), 1);
	assert_eq!(regs.resize.get(), 1);
	assert_eq!(animator.surface().size(), (1280.0, 720.0));
}

#[test]
fn frames_advance_render_and_reschedule() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();

	let outcomes = run_frames(&mut animator, 0.0, 5);

	assert_eq!(outcomes[0], FrameOutcome::Throttled);
	assert!(
		outcomes[1..]
			.iter()
			.all(|o| matches!(o, FrameOutcome::Rendered { steps: 1, .. }))
	);
	assert!(animator.surface().puffs > 0);
	assert_eq!(animator.surface().backgrounds, 4);
	assert_eq!(regs.frames.get(), 1, "exactly one request outstanding");
	assert!(animator.field().elapsed() > 0.0);
}

#[test]
fn fast_display_is_throttled_to_target_rate() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();

	// 240 Hz callbacks for half a second.
	let steps: u32 = (0..=120)
		.map(|k| match fire(&mut animator, k as f64 * 1000.0 / 240.0) {
			FrameOutcome::Rendered { steps, .. } => steps,
			_ => 0,
		})
		.sum();

	assert!(steps.abs_diff(30) <= 1, "{steps} steps");
	assert_eq!(regs.frames.get(), 1);
}

#[test]
fn stop_releases_everything_and_is_idempotent() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	run_frames(&mut animator, 0.0, 3);

	animator.stop();
	animator.stop();

	assert!(!animator.is_running());
	assert_eq!(regs.frames.get(), 0);
	assert_eq!(regs.resize.get(), 0);

	// A callback already queued by the browser may still arrive.
	let requests = regs.requests.get();
	assert_eq!(animator.on_frame(1000.0), FrameOutcome::Stopped);
	assert_eq!(regs.requests.get(), requests, "a stopped loop does not reschedule");
	assert_eq!(regs.frames.get(), 0);
}

#[test]
fn dropping_a_running_animator_tears_down() {
	let regs = Rc::new(Registrations::default());
	{
		let mut animator = animator(TestHost::new(&regs));
		animator.start().unwrap();
		run_frames(&mut animator, 0.0, 2);
		assert_eq!(regs.frames.get(), 1);
	}
	assert_eq!(regs.frames.get(), 0);
	assert_eq!(regs.resize.get(), 0);
}

#[test]
fn resize_keeps_live_particles() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	run_frames(&mut animator, 0.0, 3);
	let live = animator.field().len();

	animator.on_resize(640.0, 480.0);

	assert_eq!(animator.field().len(), live);
	assert_eq!(animator.field().target_x(), 320.0);
	assert_eq!(animator.surface().size(), (640.0, 480.0));
}

#[test]
fn zero_sized_surface_skips_frames_until_resized() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	animator.on_resize(0.0, 0.0);

	let outcomes = run_frames(&mut animator, 0.0, 3);
	assert!(outcomes[1..].iter().all(|o| *o == FrameOutcome::SurfaceUnavailable));
	assert_eq!(animator.surface().puffs, 0);
	assert_eq!(regs.frames.get(), 1, "loop keeps going while unavailable");

	animator.on_resize(800.0, 600.0);
	let outcome = fire(&mut animator, 3.0 * FRAME_MS);
	assert!(matches!(outcome, FrameOutcome::Rendered { .. }));
}

#[test]
fn refused_frame_request_undoes_resize_subscription() {
	let regs = Rc::new(Registrations::default());
	let mut host = TestHost::new(&regs);
	host.refuse_frames = true;
	let mut animator = animator(host);

	let err = animator.start().unwrap_err();

	assert!(matches!(err, StartError::Host(_)));
	assert!(!animator.is_running());
	assert_eq!(regs.resize.get(), 0);
}

#[test]
fn refused_resize_subscription_is_reported() {
	let regs = Rc::new(Registrations::default());
	let mut host = TestHost::new(&regs);
	host.refuse_resize = true;
	let mut animator = animator(host);

	assert!(matches!(animator.start(), Err(StartError::Host(_))));
	assert_eq!(regs.frames.get(), 0);
}

#[test]
fn intensity_eases_towards_requested_level() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	run_frames(&mut animator, 0.0, 120);
	let full = animator.intensity();
	assert!(full > 0.0);

	animator.set_intensity(0.0);
	run_frames(&mut animator, 120.0 * FRAME_MS, 120);
	assert!(animator.intensity() < full);
}

#[test]
fn intensity_set_before_the_first_frame_is_kept() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	animator.set_intensity(0.0);

	for outcome in run_frames(&mut animator, 0.0, 60) {
		assert_ne!(outcome, FrameOutcome::Stopped);
		assert_eq!(animator.intensity(), 0.0);
	}
}

#[test]
fn crossing_a_breakpoint_rescales_the_population() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.start().unwrap();
	assert_eq!(animator.device(), DeviceClass::Desktop);
	assert_eq!(animator.field().config().max_particles, 20);

	animator.on_resize(600.0, 900.0);
	assert_eq!(animator.device(), DeviceClass::Mobile);
	assert_eq!(animator.field().config().max_particles, 8);
	assert_eq!(animator.field().len(), 20, "trimmed on the next tick, not on resize");

	run_frames(&mut animator, 0.0, 2);
	assert!(animator.field().len() <= 8);

	animator.on_resize(1280.0, 720.0);
	assert_eq!(animator.device(), DeviceClass::Desktop);
	assert_eq!(animator.field().config().max_particles, 20);
}

#[test]
fn collapsed_surface_keeps_the_device_class() {
	let regs = Rc::new(Registrations::default());
	let mut animator = animator(TestHost::new(&regs));
	animator.on_resize(0.0, 0.0);
	assert_eq!(animator.device(), DeviceClass::Desktop);
	assert_eq!(animator.field().config().max_particles, 20);
}

#[test]
fn invalid_config_is_rejected() {
	let regs = Rc::new(Registrations::default());
	let config = FieldConfig {
		max_particles: 0,
		..FieldConfig::default()
	};
	let result = SmokeAnimator::new(
		config,
		CountingSurface::default(),
		TestHost::new(&regs),
		SmallRng::seed_from_u64(1),
	);
	assert!(result.is_err());
}
