//! smoke-field: animated background smoke for web pages.
//!
//! This crate provides a WASM canvas component that renders a drifting
//! particle smoke effect behind page content, plus the browser-free particle
//! simulation it is built on.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::smoke_field::{
	ConfigError, FieldConfig, ParticleField, Profile, SmokeAnimator, SmokeFieldCanvas,
	parse_config_document,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("smoke-field: logging initialized");
}

/// Load field configuration from a script element with id="smoke-config".
/// Expected format: JSON with { profile: "...", ...overrides }
fn load_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("smoke-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match parse_config_document(&json_text) {
		Ok(config) => {
			info!(
				"smoke-field: loaded config, {} particles max",
				config.max_particles
			);
			Some(config)
		}
		Err(e) => {
			warn!("smoke-field: invalid config, using defaults: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads the field configuration from the DOM and renders the smoke behind a
/// content overlay.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_config().unwrap_or_default();
	let config_signal = Signal::derive(move || config.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Smoke Field" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="smoke-page">
			<SmokeFieldCanvas config=config_signal />
			<div class="smoke-overlay">
				<h1>"Smoke Field"</h1>
			</div>
		</div>
	}
}
