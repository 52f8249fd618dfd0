//! Animated background
//!
//! Glue between a [`FrameScheduler`], an [`OrbFieldModel`] and a
//! [`ParticleBurstGenerator`]: the orb field is recomputed on every tick
//! and published as a [`BackgroundFrame`]; particle bursts are spawned on
//! demand and replace the previous burst wholesale.

use crate::orbs::{OrbFieldModel, OrbFieldState, OrbPreset};
use crate::particles::{Particle, ParticleBurstGenerator, ParticleConfig, DEFAULT_PARTICLE_COUNT};
use crate::scheduler::{AnimationHandle, FrameScheduler};
use serde::Deserialize;
use std::sync::{Arc, Mutex, PoisonError};

/// Background behaviour
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackgroundConfig {
    /// Multiplier applied to elapsed time before sampling the orb field
    pub animation_speed: f32,
    pub enable_particles: bool,
    pub particle_count: usize,
    pub orb_preset: OrbPreset,
}

impl Default for BackgroundConfig {
    fn default() -> Self {
        Self {
            animation_speed: 1.0,
            enable_particles: true,
            particle_count: DEFAULT_PARTICLE_COUNT,
            orb_preset: OrbPreset::default(),
        }
    }
}

/// Snapshot published on every tick
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BackgroundFrame {
    /// Loop time in milliseconds, before the speed multiplier
    pub elapsed_ms: f64,
    pub orbs: OrbFieldState,
    /// Ticks since the loop started, starting at 1
    pub frame: u64,
}

/// Drifting orbs plus on-demand particle bursts
pub struct AnimatedBackground {
    config: BackgroundConfig,
    model: OrbFieldModel,
    latest: Arc<Mutex<BackgroundFrame>>,
    generator: ParticleBurstGenerator,
    particles: Vec<Particle>,
    handle: Option<AnimationHandle>,
}

impl AnimatedBackground {
    /// Background with an entropy-seeded particle generator
    pub fn new(config: BackgroundConfig) -> Self {
        let generator = ParticleBurstGenerator::new(ParticleConfig::new(config.particle_count));
        Self::with_generator(config, generator)
    }

    /// Background using `generator` for bursts
    ///
    /// The generator's count is replaced by `config.particle_count`.
    pub fn with_generator(config: BackgroundConfig, mut generator: ParticleBurstGenerator) -> Self {
        generator.set_count(config.particle_count);
        let model = OrbFieldModel::from_preset(config.orb_preset);
        Self {
            config,
            latest: Arc::new(Mutex::new(BackgroundFrame {
                orbs: model.compute_positions(0.0),
                ..BackgroundFrame::default()
            })),
            model,
            generator,
            particles: Vec::new(),
            handle: None,
        }
    }

    /// Use a custom orb tuning instead of the configured preset
    pub fn with_model(mut self, model: OrbFieldModel) -> Self {
        self.model = model;
        self.publish(BackgroundFrame {
            orbs: model.compute_positions(0.0),
            ..BackgroundFrame::default()
        });
        self
    }

    pub fn config(&self) -> &BackgroundConfig {
        &self.config
    }

    /// Start animating; restarts from zero if already running
    pub fn start(&mut self, scheduler: &FrameScheduler) {
        self.start_with(scheduler, |_| {});
    }

    /// Start animating and hand every frame to `on_frame`
    pub fn start_with<F>(&mut self, scheduler: &FrameScheduler, mut on_frame: F)
    where
        F: FnMut(&BackgroundFrame) + Send + 'static,
    {
        self.stop();

        let model = self.model;
        let speed = f64::from(self.config.animation_speed);
        let latest = Arc::clone(&self.latest);
        let mut frame = 0u64;

        self.handle = Some(scheduler.start(move |elapsed_ms| {
            frame += 1;
            let snapshot = BackgroundFrame {
                elapsed_ms,
                orbs: model.compute_positions(elapsed_ms * speed),
                frame,
            };
            *latest.lock().unwrap_or_else(PoisonError::into_inner) = snapshot;
            on_frame(&snapshot);
        }));
    }

    /// Stop animating; the last frame stays available
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.stop();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(AnimationHandle::is_running)
    }

    /// Most recent frame
    pub fn latest(&self) -> BackgroundFrame {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, frame: BackgroundFrame) {
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = frame;
    }

    /// Replace the current burst with a fresh one
    ///
    /// With particles disabled the burst is always empty.
    pub fn spawn_burst(&mut self) -> &[Particle] {
        self.particles = if self.config.enable_particles {
            self.generator.burst()
        } else {
            Vec::new()
        };
        &self.particles
    }

    /// The current burst
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn clear_particles(&mut self) {
        self.particles.clear();
    }

    /// Size of future bursts; the current burst is untouched
    pub fn set_particle_count(&mut self, count: usize) {
        self.config.particle_count = count;
        self.generator.set_count(count);
    }

    pub fn set_particles_enabled(&mut self, enabled: bool) {
        self.config.enable_particles = enabled;
        if !enabled {
            self.particles.clear();
        }
    }
}

impl Default for AnimatedBackground {
    fn default() -> Self {
        Self::new(BackgroundConfig::default())
    }
}

impl std::fmt::Debug for AnimatedBackground {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedBackground")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .field("particles", &self.particles.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::SequentialIds;
    use pokeview_platform::ManualFrameHost;

    fn setup(config: BackgroundConfig) -> (Arc<ManualFrameHost>, FrameScheduler, AnimatedBackground) {
        let host = Arc::new(ManualFrameHost::new());
        let scheduler = FrameScheduler::new(host.clone());
        let generator = ParticleBurstGenerator::default()
            .with_seed(42)
            .with_id_source(SequentialIds::default());
        let background = AnimatedBackground::with_generator(config, generator);
        (host, scheduler, background)
    }

    #[test]
    fn test_frames_follow_orb_model() {
        let (host, scheduler, mut background) = setup(BackgroundConfig::default());
        background.start(&scheduler);
        assert!(background.is_running());

        host.advance(5000.0);
        host.advance(6000.0);

        let frame = background.latest();
        assert_eq!(frame.frame, 2);
        assert_eq!(frame.elapsed_ms, 1000.0);
        assert_eq!(frame.orbs, OrbFieldModel::drift().compute_positions(1000.0));
    }

    #[test]
    fn test_animation_speed_scales_time() {
        let config = BackgroundConfig {
            animation_speed: 2.0,
            ..BackgroundConfig::default()
        };
        let (host, scheduler, mut background) = setup(config);
        background.start(&scheduler);

        host.advance(0.0);
        host.advance(750.0);

        assert_eq!(
            background.latest().orbs,
            OrbFieldModel::drift().compute_positions(1500.0)
        );
    }

    #[test]
    fn test_on_frame_observer() {
        let (host, scheduler, mut background) = setup(BackgroundConfig::default());
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&frames);
        background.start_with(&scheduler, move |frame| sink.lock().unwrap().push(frame.frame));

        host.advance(0.0);
        host.advance(16.0);
        host.advance(32.0);

        assert_eq!(*frames.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_stop_keeps_last_frame() {
        let (host, scheduler, mut background) = setup(BackgroundConfig::default());
        background.start(&scheduler);
        host.advance(0.0);
        host.advance(100.0);

        background.stop();
        background.stop();
        host.advance(200.0);

        assert!(!background.is_running());
        assert_eq!(background.latest().elapsed_ms, 100.0);
        assert_eq!(host.pending_count(), 0);
    }

    #[test]
    fn test_restart_resets_elapsed() {
        let (host, scheduler, mut background) = setup(BackgroundConfig::default());
        background.start(&scheduler);
        host.advance(0.0);
        host.advance(400.0);

        background.start(&scheduler);
        assert_eq!(host.pending_count(), 1);
        host.advance(900.0);

        let frame = background.latest();
        assert_eq!(frame.elapsed_ms, 0.0);
        assert_eq!(frame.frame, 1);
    }

    #[test]
    fn test_bursts_replace_wholesale() {
        let (_host, _scheduler, mut background) = setup(BackgroundConfig::default());

        let first: Vec<Particle> = background.spawn_burst().to_vec();
        assert_eq!(first.len(), 8);

        let second = background.spawn_burst().to_vec();
        assert_eq!(second.len(), 8);
        assert_ne!(first[0].id, second[0].id);
        assert_eq!(background.particles(), second.as_slice());

        background.clear_particles();
        assert!(background.particles().is_empty());
    }

    #[test]
    fn test_particle_count_and_toggle() {
        let (_host, _scheduler, mut background) = setup(BackgroundConfig::default());

        background.spawn_burst();
        background.set_particle_count(3);
        assert_eq!(background.particles().len(), 8);
        assert_eq!(background.spawn_burst().len(), 3);

        background.set_particles_enabled(false);
        assert!(background.particles().is_empty());
        assert!(background.spawn_burst().is_empty());
    }

    #[test]
    fn test_classic_preset_initial_frame() {
        let config = BackgroundConfig {
            orb_preset: OrbPreset::Classic,
            ..BackgroundConfig::default()
        };
        let (_host, _scheduler, background) = setup(config);
        assert_eq!(
            background.latest().orbs,
            OrbFieldModel::classic().compute_positions(0.0)
        );
    }
}
