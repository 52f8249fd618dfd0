//! Motion settings file
//!
//! Settings live in `pokeview.toml`. Every section and key is optional:
//!
//! ```toml
//! [background]
//! animation_speed = 1.5
//! enable_particles = true
//! particle_count = 12
//! orb_preset = "classic"
//!
//! [particles]
//! y_band = [20.0, 80.0]
//! random_max_ms = 400.0     # or: stagger_ms = 80.0
//!
//! [flip]
//! duration_ms = 650
//! easing = "ease-out"       # or: easing = { cubic-bezier = [0.4, 0.0, 0.2, 1.0] }
//! respect_reduced_motion = true
//! ```

use crate::background::BackgroundConfig;
use crate::flip::FlipConfigOverrides;
use crate::particles::{DelayPolicy, ParticleConfig, MAX_PARTICLE_COUNT};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default settings file name
pub const SETTINGS_FILE: &str = "pokeview.toml";

/// Settings loading errors
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for this schema
    #[error("Invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings parsed but a value is out of range
    #[error("Invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// `[particles]` section
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParticleSettings {
    pub y_band: [f32; 2],
    pub stagger_ms: Option<f32>,
    pub random_max_ms: Option<f32>,
}

impl Default for ParticleSettings {
    fn default() -> Self {
        Self {
            y_band: [0.0, 100.0],
            stagger_ms: None,
            random_max_ms: None,
        }
    }
}

/// Everything configurable about the motion layer
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MotionSettings {
    pub background: BackgroundConfig,
    pub particles: ParticleSettings,
    pub flip: FlipConfigOverrides,
}

impl MotionSettings {
    /// Parse and validate settings from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings: MotionSettings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded motion settings from {}", path.display());
        Ok(settings)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let speed = self.background.animation_speed;
        if !speed.is_finite() || speed < 0.0 {
            return Err(invalid(
                "background.animation_speed",
                format!("expected a non-negative number, got {}", speed),
            ));
        }

        let count = self.background.particle_count;
        if count > MAX_PARTICLE_COUNT {
            return Err(invalid(
                "background.particle_count",
                format!("at most {} particles per burst, got {}", MAX_PARTICLE_COUNT, count),
            ));
        }

        let [lo, hi] = self.particles.y_band;
        let in_range = |v: f32| (0.0..=100.0).contains(&v);
        if !in_range(lo) || !in_range(hi) {
            return Err(invalid(
                "particles.y_band",
                format!("bounds must lie in [0, 100], got [{}, {}]", lo, hi),
            ));
        }

        match (self.particles.stagger_ms, self.particles.random_max_ms) {
            (Some(_), Some(_)) => {
                return Err(invalid(
                    "particles",
                    "set either stagger_ms or random_max_ms, not both".to_string(),
                ));
            }
            (Some(ms), None) | (None, Some(ms)) if !ms.is_finite() || ms < 0.0 => {
                return Err(invalid(
                    "particles",
                    format!("delay must be a non-negative number, got {}", ms),
                ));
            }
            _ => {}
        }

        Ok(())
    }

    /// Particle generator configuration
    pub fn particle_config(&self) -> ParticleConfig {
        let delay = match (self.particles.stagger_ms, self.particles.random_max_ms) {
            (_, Some(max_ms)) => DelayPolicy::Random { max_ms },
            (Some(step_ms), None) => DelayPolicy::Stagger { step_ms },
            (None, None) => DelayPolicy::default(),
        };
        let [lo, hi] = self.particles.y_band;
        ParticleConfig::new(self.background.particle_count)
            .with_y_band(lo, hi)
            .with_delay(delay)
    }
}

fn invalid(key: &'static str, reason: String) -> SettingsError {
    SettingsError::Invalid { key, reason }
}
