//! Leptos component wrapping the smoke field canvas.
//!
//! The component creates a full-viewport canvas behind the page content and
//! mounts a [`SmokeAnimator`] on it once the element exists. The animator owns
//! the `requestAnimationFrame` and `resize` callbacks; both reach back into it
//! through a weak reference so that dropping the animator is the only thing
//! needed to tear the loop down.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use leptos::prelude::*;
use log::warn;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::animator::SmokeAnimator;
use super::canvas::CanvasSurface;
use super::config::FieldConfig;
use super::error::StartError;
use super::host::BrowserHost;

type BrowserAnimator = SmokeAnimator<BrowserHost, CanvasSurface, SmallRng>;
type AnimatorSlot = Rc<RefCell<Option<BrowserAnimator>>>;

/// Renders an animated smoke field behind the page.
///
/// `config` is reactive: a new value replaces the running animator. The
/// optional `intensity` signal (0.0..=1.0) eases the field in and out without
/// restarting it.
#[component]
pub fn SmokeFieldCanvas(
	#[prop(into)] config: Signal<FieldConfig>,
	#[prop(optional, into)] intensity: Option<Signal<f64>>,
	#[prop(default = 0)] z_index: i32,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let slot: AnimatorSlot = Rc::new(RefCell::new(None));
	let slot_mount = slot.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let config = config.get();

		// Stop the previous loop before its replacement registers callbacks.
		slot_mount.borrow_mut().take();

		match mount(canvas.into(), config, Rc::downgrade(&slot_mount)) {
			Ok(mut animator) => {
				// The replacement fades in to the level the old one was at.
				if let Some(intensity) = intensity {
					animator.set_intensity(intensity.get_untracked());
				}
				*slot_mount.borrow_mut() = Some(animator);
			}
			Err(e) => warn!("smoke-field: not started: {e}"),
		}
	});

	if let Some(intensity) = intensity {
		let slot_intensity = slot.clone();
		Effect::new(move |_| {
			let level = intensity.get();
			if let Some(animator) = slot_intensity.borrow_mut().as_mut() {
				animator.set_intensity(level);
			}
		});
	}

	let slot_cleanup = SendWrapper::new(slot);
	on_cleanup(move || {
		let slot = slot_cleanup.take();
		slot.borrow_mut().take();
	});

	let style = format!(
		"position: fixed; inset: 0; display: block; pointer-events: none; z-index: {z_index};"
	);

	view! {
		<canvas node_ref=canvas_ref class="smoke-field-canvas" aria-hidden="true" style=style />
	}
}

fn mount(
	canvas: HtmlCanvasElement,
	config: FieldConfig,
	slot: Weak<RefCell<Option<BrowserAnimator>>>,
) -> Result<BrowserAnimator, StartError> {
	let window = web_sys::window().ok_or(StartError::NoWindow)?;
	let surface = CanvasSurface::new(canvas, window.device_pixel_ratio())?;

	let slot_frame = slot.clone();
	let on_frame = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
		with_animator(&slot_frame, |animator| {
			animator.on_frame(now);
		});
	});
	let on_resize = Closure::<dyn FnMut()>::new(move || {
		with_animator(&slot, |animator| animator.sync_viewport());
	});
	let host = BrowserHost::new(window, on_frame, on_resize);

	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;

	let mut animator = SmokeAnimator::new(config, surface, host, SmallRng::seed_from_u64(seed))?;
	animator.start()?;
	Ok(animator)
}

fn with_animator(slot: &Weak<RefCell<Option<BrowserAnimator>>>, f: impl FnOnce(&mut BrowserAnimator)) {
	let Some(slot) = slot.upgrade() else {
		return;
	};
	// A callback already running on this animator holds the borrow.
	let Ok(mut guard) = slot.try_borrow_mut() else {
		return;
	};
	if let Some(animator) = guard.as_mut() {
		f(animator);
	}
}
