//! Flip-card transition
//!
//! A detail card has a front and a back face. [`FlipAnimationController`]
//! tracks which side is logically showing and whether the flip transition
//! is still in flight:
//!
//! ```text
//!                 toggle()                      complete_animation()
//! {flipped: f, _} ---------> {flipped: !f, animating} -------------> {flipped: !f, settled}
//! ```
//!
//! `toggle()` flips the logical side immediately; the render layer animates
//! towards it and reports back through `complete_animation()` (or lets
//! [`FlipAnimationController::advance`] do it once the resolved duration
//! has passed).
//!
//! Transition timing comes from [`resolve_flip_config`], which zeroes the
//! duration when the host asks for reduced motion.

use crate::easing::Easing;
use pokeview_platform::MotionPreference;
use serde::Deserialize;
use std::sync::Arc;

/// Default flip duration
pub const DEFAULT_FLIP_DURATION_MS: u32 = 500;

// ============================================================================
// State
// ============================================================================

/// Logical side plus in-flight flag
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FlipState {
    is_flipped: bool,
    is_animating: bool,
}

impl FlipState {
    /// Settled state showing the back face when `flipped`
    pub fn new(flipped: bool) -> Self {
        Self {
            is_flipped: flipped,
            is_animating: false,
        }
    }

    pub fn is_flipped(&self) -> bool {
        self.is_flipped
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn transform(&self) -> FlipTransform {
        transform_for(self.is_flipped)
    }

    pub fn front_visibility(&self) -> Visibility {
        side_visibility(self.is_flipped, true)
    }

    pub fn back_visibility(&self) -> Visibility {
        side_visibility(self.is_flipped, false)
    }
}

/// What `toggle()` does while a flip is still animating
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TogglePolicy {
    /// Flip again and restart the transition
    #[default]
    Permissive,
    /// Ignore the toggle until the current flip completes
    IgnoreWhileAnimating,
}

// ============================================================================
// Rendering helpers
// ============================================================================

/// Rotation of the card around its vertical axis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipTransform {
    pub rotate_y_deg: f32,
}

impl FlipTransform {
    pub fn to_css(&self) -> String {
        format!("rotateY({}deg)", self.rotate_y_deg)
    }
}

/// Half-turn when flipped, identity otherwise
pub fn transform_for(is_flipped: bool) -> FlipTransform {
    FlipTransform {
        rotate_y_deg: if is_flipped { 180.0 } else { 0.0 },
    }
}

/// Visibility of one card face
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Visible,
    Hidden,
}

impl Visibility {
    pub fn is_visible(&self) -> bool {
        matches!(self, Visibility::Visible)
    }

    pub fn to_css(&self) -> &'static str {
        match self {
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        }
    }
}

/// The front face shows when not flipped, the back face when flipped
pub fn side_visibility(is_flipped: bool, is_front_face: bool) -> Visibility {
    if is_front_face != is_flipped {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Fully resolved flip timing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipAnimationConfig {
    pub duration_ms: u32,
    pub easing: Easing,
    pub respect_reduced_motion: bool,
}

impl FlipAnimationConfig {
    /// Eased progress `elapsed_ms` into the transition, in `[0, 1]`
    pub fn progress_at(&self, elapsed_ms: f64) -> f32 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        let linear = (elapsed_ms / f64::from(self.duration_ms)).clamp(0.0, 1.0) as f32;
        self.easing.apply(linear)
    }

    /// Card rotation `elapsed_ms` into a transition towards `target`
    pub fn rotation_at(&self, elapsed_ms: f64, target: FlipState) -> FlipTransform {
        let to = transform_for(target.is_flipped()).rotate_y_deg;
        let from = transform_for(!target.is_flipped()).rotate_y_deg;
        FlipTransform {
            rotate_y_deg: from + (to - from) * self.progress_at(elapsed_ms),
        }
    }
}

impl Default for FlipAnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_FLIP_DURATION_MS,
            easing: Easing::EaseInOut,
            respect_reduced_motion: true,
        }
    }
}

/// Caller overrides; `None` keeps the default
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlipConfigOverrides {
    pub duration_ms: Option<u32>,
    pub easing: Option<Easing>,
    pub respect_reduced_motion: Option<bool>,
}

impl FlipConfigOverrides {
    pub fn duration_ms(mut self, duration_ms: u32) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = Some(easing);
        self
    }

    pub fn respect_reduced_motion(mut self, respect: bool) -> Self {
        self.respect_reduced_motion = Some(respect);
        self
    }

    /// Layer `other` on top of `self`; fields set in `other` win
    pub fn merged_with(&self, other: &FlipConfigOverrides) -> FlipConfigOverrides {
        FlipConfigOverrides {
            duration_ms: other.duration_ms.or(self.duration_ms),
            easing: other.easing.or(self.easing),
            respect_reduced_motion: other.respect_reduced_motion.or(self.respect_reduced_motion),
        }
    }
}

/// Resolve `overrides` against the built-in defaults
pub fn resolve_flip_config(
    overrides: &FlipConfigOverrides,
    motion: &dyn MotionPreference,
) -> FlipAnimationConfig {
    resolve_flip_config_with(&FlipAnimationConfig::default(), overrides, motion)
}

/// Resolve `overrides` against custom defaults
///
/// The host preference is read on every call and never cached.
pub fn resolve_flip_config_with(
    defaults: &FlipAnimationConfig,
    overrides: &FlipConfigOverrides,
    motion: &dyn MotionPreference,
) -> FlipAnimationConfig {
    let mut config = FlipAnimationConfig {
        duration_ms: overrides.duration_ms.unwrap_or(defaults.duration_ms),
        easing: overrides.easing.unwrap_or(defaults.easing),
        respect_reduced_motion: overrides
            .respect_reduced_motion
            .unwrap_or(defaults.respect_reduced_motion),
    };

    if config.respect_reduced_motion && motion.prefers_reduced_motion() {
        tracing::debug!("resolve_flip_config: reduced motion requested, duration forced to 0");
        config.duration_ms = 0;
    }
    config
}

// ============================================================================
// Controller
// ============================================================================

/// Result of [`FlipAnimationController::request_flip`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlipRequest {
    pub state: FlipState,
    pub config: FlipAnimationConfig,
}

/// Owns the flip state of one card
pub struct FlipAnimationController {
    state: FlipState,
    policy: TogglePolicy,
    defaults: FlipAnimationConfig,
    motion: Arc<dyn MotionPreference>,
}

impl FlipAnimationController {
    /// Controller showing the front face
    pub fn new(motion: Arc<dyn MotionPreference>) -> Self {
        Self {
            state: FlipState::default(),
            policy: TogglePolicy::default(),
            defaults: FlipAnimationConfig::default(),
            motion,
        }
    }

    /// Start on the back face when `flipped`
    pub fn with_initial(mut self, flipped: bool) -> Self {
        self.state = FlipState::new(flipped);
        self
    }

    pub fn with_policy(mut self, policy: TogglePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the defaults that overrides are resolved against
    pub fn with_defaults(mut self, defaults: FlipAnimationConfig) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn state(&self) -> FlipState {
        self.state
    }

    pub fn policy(&self) -> TogglePolicy {
        self.policy
    }

    /// Flip to the other side and mark the transition in flight
    pub fn toggle(&mut self) -> FlipState {
        if self.state.is_animating && self.policy == TogglePolicy::IgnoreWhileAnimating {
            tracing::trace!("FlipAnimationController: toggle ignored while animating");
            return self.state;
        }
        self.state = FlipState {
            is_flipped: !self.state.is_flipped,
            is_animating: true,
        };
        self.state
    }

    /// Mark the transition finished; no-op when already settled
    pub fn complete_animation(&mut self) -> FlipState {
        self.state.is_animating = false;
        self.state
    }

    /// Timing for the next transition
    pub fn resolve_config(&self, overrides: &FlipConfigOverrides) -> FlipAnimationConfig {
        resolve_flip_config_with(&self.defaults, overrides, self.motion.as_ref())
    }

    /// Toggle and resolve the timing for the transition it starts
    ///
    /// A zero duration (reduced motion) settles the card immediately.
    pub fn request_flip(&mut self, overrides: &FlipConfigOverrides) -> FlipRequest {
        let config = self.resolve_config(overrides);
        let mut state = self.toggle();
        if config.duration_ms == 0 {
            state = self.complete_animation();
        }
        FlipRequest { state, config }
    }

    /// Complete the transition once `elapsed_ms` covers its duration
    pub fn advance(&mut self, elapsed_ms: f64, config: &FlipAnimationConfig) -> FlipState {
        if self.state.is_animating && elapsed_ms >= f64::from(config.duration_ms) {
            self.complete_animation()
        } else {
            self.state
        }
    }
}

impl std::fmt::Debug for FlipAnimationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlipAnimationController")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokeview_platform::{SharedMotionPreference, StaticMotionPreference};

    fn controller(reduced: bool) -> FlipAnimationController {
        FlipAnimationController::new(Arc::new(StaticMotionPreference::new(reduced)))
    }

    fn pair(state: FlipState) -> (bool, bool) {
        (state.is_flipped(), state.is_animating())
    }

    #[test]
    fn test_state_machine_sequence() {
        let mut flip = controller(false);
        assert_eq!(pair(flip.state()), (false, false));

        assert_eq!(pair(flip.toggle()), (true, true));
        assert_eq!(pair(flip.complete_animation()), (true, false));
        assert_eq!(pair(flip.toggle()), (false, true));
    }

    #[test]
    fn test_complete_when_settled_is_noop() {
        let mut flip = controller(false);
        let before = flip.state();
        assert_eq!(flip.complete_animation(), before);
        assert_eq!(flip.complete_animation(), before);
    }

    #[test]
    fn test_initial_flipped() {
        let flip = controller(false).with_initial(true);
        assert_eq!(pair(flip.state()), (true, false));
    }

    #[test]
    fn test_permissive_retoggle_mid_animation() {
        let mut flip = controller(false);
        flip.toggle();
        assert_eq!(pair(flip.toggle()), (false, true));
    }

    #[test]
    fn test_ignore_while_animating() {
        let mut flip = controller(false).with_policy(TogglePolicy::IgnoreWhileAnimating);
        assert_eq!(pair(flip.toggle()), (true, true));
        assert_eq!(pair(flip.toggle()), (true, true));

        flip.complete_animation();
        assert_eq!(pair(flip.toggle()), (false, true));
    }

    #[test]
    fn test_transform_and_visibility() {
        assert_eq!(transform_for(true).rotate_y_deg, 180.0);
        assert_eq!(transform_for(false).rotate_y_deg, 0.0);
        assert_eq!(transform_for(true).to_css(), "rotateY(180deg)");
        assert_eq!(transform_for(false).to_css(), "rotateY(0deg)");

        assert_eq!(side_visibility(false, true), Visibility::Visible);
        assert_eq!(side_visibility(false, false), Visibility::Hidden);
        assert_eq!(side_visibility(true, true), Visibility::Hidden);
        assert_eq!(side_visibility(true, false), Visibility::Visible);
        assert_eq!(Visibility::Hidden.to_css(), "hidden");

        let state = FlipState::new(true);
        assert!(state.back_visibility().is_visible());
        assert!(!state.front_visibility().is_visible());
    }

    #[test]
    fn test_default_config() {
        let config = resolve_flip_config(
            &FlipConfigOverrides::default(),
            &StaticMotionPreference::full(),
        );
        assert_eq!(config, FlipAnimationConfig::default());
        assert_eq!(config.duration_ms, 500);
        assert_eq!(config.easing, Easing::EaseInOut);
        assert!(config.respect_reduced_motion);
    }

    #[test]
    fn test_reduced_motion_zeroes_duration() {
        let config = resolve_flip_config(
            &FlipConfigOverrides::default(),
            &StaticMotionPreference::reduced(),
        );
        assert_eq!(config.duration_ms, 0);

        let custom = resolve_flip_config(
            &FlipConfigOverrides::default().duration_ms(900),
            &StaticMotionPreference::reduced(),
        );
        assert_eq!(custom.duration_ms, 0);
    }

    #[test]
    fn test_opt_out_of_reduced_motion() {
        let config = resolve_flip_config(
            &FlipConfigOverrides::default().respect_reduced_motion(false),
            &StaticMotionPreference::reduced(),
        );
        assert_eq!(config.duration_ms, 500);
        assert!(!config.respect_reduced_motion);
    }

    #[test]
    fn test_overrides_apply_field_by_field() {
        let config = resolve_flip_config(
            &FlipConfigOverrides::default().easing(Easing::Linear),
            &StaticMotionPreference::full(),
        );
        assert_eq!(config.duration_ms, 500);
        assert_eq!(config.easing, Easing::Linear);
        assert_eq!(FlipAnimationConfig::default().easing, Easing::EaseInOut);
    }

    #[test]
    fn test_merged_overrides() {
        let base = FlipConfigOverrides::default().duration_ms(300).easing(Easing::Ease);
        let call = FlipConfigOverrides::default().duration_ms(700);
        let merged = base.merged_with(&call);

        assert_eq!(merged.duration_ms, Some(700));
        assert_eq!(merged.easing, Some(Easing::Ease));
        assert_eq!(merged.respect_reduced_motion, None);
    }

    #[test]
    fn test_preference_read_per_request() {
        let pref = SharedMotionPreference::new(false);
        let mut flip = FlipAnimationController::new(Arc::new(pref.clone()));

        let first = flip.request_flip(&FlipConfigOverrides::default());
        assert_eq!(first.config.duration_ms, 500);
        assert!(first.state.is_animating());

        pref.set_reduced(true);
        let second = flip.request_flip(&FlipConfigOverrides::default());
        assert_eq!(second.config.duration_ms, 0);
        assert_eq!(pair(second.state), (false, false));
    }

    #[test]
    fn test_advance_completes_after_duration() {
        let mut flip = controller(false);
        let request = flip.request_flip(&FlipConfigOverrides::default());

        assert!(flip.advance(250.0, &request.config).is_animating());
        assert_eq!(pair(flip.advance(500.0, &request.config)), (true, false));
    }

    #[test]
    fn test_progress_and_rotation() {
        let config = FlipAnimationConfig {
            easing: Easing::Linear,
            ..FlipAnimationConfig::default()
        };
        assert_eq!(config.progress_at(0.0), 0.0);
        assert_eq!(config.progress_at(250.0), 0.5);
        assert_eq!(config.progress_at(9000.0), 1.0);

        let target = FlipState::new(true);
        assert_eq!(config.rotation_at(250.0, target).rotate_y_deg, 90.0);
        assert_eq!(config.rotation_at(500.0, FlipState::new(false)).rotate_y_deg, 0.0);

        let instant = FlipAnimationConfig {
            duration_ms: 0,
            ..config
        };
        assert_eq!(instant.progress_at(0.0), 1.0);
    }
}
