//! Reduced-motion accessibility preference
//!
//! The preference is a plain synchronous read. Implementations must not
//! cache: callers query once per animation request so a live change in the
//! host setting is picked up by the next request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Environment variable consulted by [`EnvMotionPreference::new`]
pub const REDUCED_MOTION_ENV: &str = "POKEVIEW_REDUCED_MOTION";

/// Query of the host's "reduce motion" accessibility flag
pub trait MotionPreference: Send + Sync {
    /// True when the user asked for minimal or no animation
    fn prefers_reduced_motion(&self) -> bool;
}

/// A fixed preference
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StaticMotionPreference {
    reduced: bool,
}

impl StaticMotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self { reduced }
    }

    /// Host asks for reduced motion
    pub fn reduced() -> Self {
        Self::new(true)
    }

    /// Host has no motion restriction
    pub fn full() -> Self {
        Self::new(false)
    }
}

impl MotionPreference for StaticMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced
    }
}

/// A preference that can be flipped at runtime, e.g. from a settings toggle
///
/// Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct SharedMotionPreference {
    reduced: Arc<AtomicBool>,
}

impl SharedMotionPreference {
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced: Arc::new(AtomicBool::new(reduced)),
        }
    }

    pub fn set_reduced(&self, reduced: bool) {
        tracing::debug!("SharedMotionPreference: set_reduced({})", reduced);
        self.reduced.store(reduced, Ordering::Release);
    }
}

impl MotionPreference for SharedMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced.load(Ordering::Acquire)
    }
}

/// Reads the preference from an environment variable on every query
///
/// `1`, `true`, `yes` and `on` (any case) mean reduced motion; anything else,
/// including an unset variable, means full motion.
#[derive(Clone, Debug)]
pub struct EnvMotionPreference {
    var: String,
}

impl EnvMotionPreference {
    /// Read [`REDUCED_MOTION_ENV`]
    pub fn new() -> Self {
        Self::with_var(REDUCED_MOTION_ENV)
    }

    /// Read a custom variable
    pub fn with_var(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvMotionPreference {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionPreference for EnvMotionPreference {
    fn prefers_reduced_motion(&self) -> bool {
        std::env::var(&self.var)
            .map(|value| parse_flag(&value))
            .unwrap_or(false)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_preference() {
        assert!(StaticMotionPreference::reduced().prefers_reduced_motion());
        assert!(!StaticMotionPreference::full().prefers_reduced_motion());
        assert!(!StaticMotionPreference::default().prefers_reduced_motion());
    }

    #[test]
    fn test_shared_preference_is_live() {
        let pref = SharedMotionPreference::new(false);
        let view = pref.clone();
        assert!(!view.prefers_reduced_motion());

        pref.set_reduced(true);
        assert!(view.prefers_reduced_motion());
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag(" TRUE "));
        assert!(parse_flag("On"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("reduce"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_env_preference_reads_each_query() {
        let pref = EnvMotionPreference::with_var("POKEVIEW_TEST_REDUCED_MOTION_LIVE");
        assert!(!pref.prefers_reduced_motion());

        std::env::set_var(pref.var(), "yes");
        assert!(pref.prefers_reduced_motion());

        std::env::remove_var(pref.var());
        assert!(!pref.prefers_reduced_motion());
    }
}
