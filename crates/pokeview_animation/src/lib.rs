//! Pokeview Motion Layer
//!
//! Animation scheduling and state for the viewer's decorative layer.
//!
//! # Features
//!
//! - **Frame Loop**: [`FrameScheduler`] turns a host "next repaint" primitive
//!   into a start/stop loop owned by an [`AnimationHandle`]
//! - **Orb Field**: [`OrbFieldModel`] maps elapsed time to drifting orb positions
//! - **Particle Bursts**: [`ParticleBurstGenerator`] produces randomized bursts
//!   with injectable ids and RNG
//! - **Flip Cards**: [`FlipAnimationController`] tracks a card's side and
//!   transition, honouring the reduced-motion preference
//! - **Background**: [`AnimatedBackground`] ties the loop, orbs and bursts together
//! - **Settings**: [`MotionSettings`] loads all tuning from `pokeview.toml`
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pokeview_animation::{AnimatedBackground, FrameScheduler};
//! use pokeview_platform::ManualFrameHost;
//!
//! let host = Arc::new(ManualFrameHost::new());
//! let scheduler = FrameScheduler::new(host.clone());
//!
//! let mut background = AnimatedBackground::default();
//! background.start(&scheduler);
//! host.advance(0.0);
//! host.advance(16.0);
//!
//! assert_eq!(background.latest().elapsed_ms, 16.0);
//! ```

pub mod background;
pub mod easing;
pub mod flip;
pub mod orbs;
pub mod particles;
pub mod scheduler;
pub mod settings;

pub use background::{AnimatedBackground, BackgroundConfig, BackgroundFrame};
pub use easing::Easing;
pub use flip::{
    resolve_flip_config, resolve_flip_config_with, side_visibility, transform_for,
    FlipAnimationConfig, FlipAnimationController, FlipConfigOverrides, FlipRequest, FlipState,
    FlipTransform, TogglePolicy, Visibility,
};
pub use orbs::{OrbConstants, OrbFieldModel, OrbFieldState, OrbPosition, OrbPreset, Oscillator, Wave};
pub use particles::{
    DelayPolicy, IdSource, Particle, ParticleBurstGenerator, ParticleConfig, SequentialIds,
    TimestampIds, MAX_PARTICLE_COUNT,
};
pub use scheduler::{AnimationHandle, FrameCallback, FrameScheduler};
pub use settings::{MotionSettings, ParticleSettings, SettingsError, SETTINGS_FILE};
