//! Animated smoke field rendered on a full-viewport canvas.
//!
//! Two streams of soft translucent puffs rise from the left and right edges,
//! drift towards the vertical centre line, and fade out as they converge.
//! Other looks (slow ink puffs, an ambient swirl) come from [`Profile`].
//!
//! The pieces are layered so the simulation runs without a browser:
//! - [`ParticleField`] owns the particles and advances them in fixed steps
//! - [`render`] draws a field onto any [`Surface`]
//! - [`SmokeAnimator`] drives both from a [`FrameHost`] and owns teardown
//! - [`SmokeFieldCanvas`] mounts it all on a `<canvas>` in a Leptos view
//!
//! # Example
//!
//! ```ignore
//! use smoke_field::{FieldConfig, Profile, SmokeFieldCanvas};
//!
//! let config = Profile::DriftingPuffs.config();
//! view! { <SmokeFieldCanvas config=config /> }
//! ```

pub mod animator;
pub mod canvas;
pub mod clock;
mod component;
pub mod config;
pub mod error;
pub mod field;
pub mod host;
pub mod intensity;
pub mod particle;
pub mod profiles;
pub mod render;
pub mod rng;
pub mod surface;
pub mod theme;

pub use animator::{FrameOutcome, SmokeAnimator};
pub use canvas::CanvasSurface;
pub use clock::FrameClock;
pub use component::SmokeFieldCanvas;
pub use config::{DeviceClass, FadeCurve, FieldConfig, Span, SpawnPolicy, SpawnRegion};
pub use error::{ConfigError, HostError, StartError, SurfaceError};
pub use field::{ParticleField, REFERENCE_FPS};
pub use host::{BrowserHost, FrameHandle, FrameHost, ResizeHandle};
pub use intensity::IntensityRamp;
pub use particle::{Particle, Side};
pub use profiles::{Profile, parse_config_document};
pub use rng::RandomSource;
pub use surface::Surface;
pub use theme::{BlendMode, Color, GradientStop, SmokeStyle};
