//! Particle bursts
//!
//! A burst is a one-shot batch of particle descriptors: random placement on
//! a 0-100 percentage grid plus a start delay. Particles are plain values;
//! a render layer replaces the whole batch on every burst rather than
//! patching particles in place.
//!
//! Ids come from an injected [`IdSource`] so tests can assert exact ids.
//! Randomness comes from a `fastrand::Rng` that can be seeded for the same
//! reason.

use std::time::{SystemTime, UNIX_EPOCH};

/// Default number of particles per burst
pub const DEFAULT_PARTICLE_COUNT: usize = 8;

/// Largest burst accepted from settings or the command line
pub const MAX_PARTICLE_COUNT: usize = 10_000;

/// Default stagger between consecutive particles
pub const DEFAULT_STAGGER_MS: f32 = 80.0;

/// Horizontal placement range, in percent of the container
pub const X_RANGE: (f32, f32) = (0.0, 100.0);

/// One particle in a burst
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Unique within its batch
    pub id: u64,
    /// Horizontal position in percent
    pub x: f32,
    /// Vertical position in percent
    pub y: f32,
    /// Milliseconds before the particle starts animating
    pub delay_ms: f32,
}

/// How start delays are assigned within a burst
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DelayPolicy {
    /// `index * step_ms`
    Stagger { step_ms: f32 },
    /// Uniform in `[0, max_ms)`
    Random { max_ms: f32 },
}

impl Default for DelayPolicy {
    fn default() -> Self {
        DelayPolicy::Stagger {
            step_ms: DEFAULT_STAGGER_MS,
        }
    }
}

/// Allocates particle ids
///
/// A source hands out contiguous ranges: the ids of a batch of `count`
/// particles are `base, base + 1, .., base + count - 1` (wrapping), so
/// they are always distinct within the batch. Collisions across batches
/// are allowed.
pub trait IdSource: Send {
    /// Reserve `count` ids and return the first one
    fn reserve(&mut self, count: usize) -> u64;
}

/// Monotonic counter; ids never repeat across batches
#[derive(Clone, Debug, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl IdSource for SequentialIds {
    fn reserve(&mut self, count: usize) -> u64 {
        let base = self.next;
        self.next = self.next.wrapping_add(count as u64);
        base
    }
}

/// Wall-clock milliseconds as the batch base
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampIds;

impl IdSource for TimestampIds {
    fn reserve(&mut self, _count: usize) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Burst configuration
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleConfig {
    /// Particles produced by [`ParticleBurstGenerator::burst`]
    pub count: usize,
    /// Vertical placement band in percent, `(min, max)`
    pub y_band: (f32, f32),
    pub delay: DelayPolicy,
}

impl ParticleConfig {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            ..Self::default()
        }
    }

    /// Restrict vertical placement; bounds may be given in either order
    pub fn with_y_band(mut self, a: f32, b: f32) -> Self {
        self.y_band = (a.min(b), a.max(b));
        self
    }

    pub fn with_delay(mut self, delay: DelayPolicy) -> Self {
        self.delay = delay;
        self
    }

    /// Linear stagger of `step_ms` per particle
    pub fn staggered(self, step_ms: f32) -> Self {
        self.with_delay(DelayPolicy::Stagger { step_ms })
    }

    /// Random delay up to `max_ms`
    pub fn random_delay(self, max_ms: f32) -> Self {
        self.with_delay(DelayPolicy::Random { max_ms })
    }
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_PARTICLE_COUNT,
            y_band: (0.0, 100.0),
            delay: DelayPolicy::default(),
        }
    }
}

/// Produces independent particle bursts
pub struct ParticleBurstGenerator {
    config: ParticleConfig,
    rng: fastrand::Rng,
    ids: Box<dyn IdSource>,
}

impl ParticleBurstGenerator {
    /// Generator with an entropy-seeded RNG and timestamp ids
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
            ids: Box::new(TimestampIds),
        }
    }

    /// Use a deterministic RNG
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }

    pub fn with_id_source(mut self, ids: impl IdSource + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// The active delay policy
    pub fn delay_policy(&self) -> DelayPolicy {
        self.config.delay
    }

    /// Change the size of future bursts
    pub fn set_count(&mut self, count: usize) {
        self.config.count = count;
    }

    /// A burst of the configured size
    pub fn burst(&mut self) -> Vec<Particle> {
        self.generate(self.config.count)
    }

    /// A burst of exactly `count` particles
    pub fn generate(&mut self, count: usize) -> Vec<Particle> {
        if count == 0 {
            return Vec::new();
        }

        let base = self.ids.reserve(count);
        let (y_min, y_max) = self.config.y_band;

        let particles: Vec<Particle> = (0..count)
            .map(|index| Particle {
                id: base.wrapping_add(index as u64),
                x: X_RANGE.0 + self.rng.f32() * (X_RANGE.1 - X_RANGE.0),
                y: y_min + self.rng.f32() * (y_max - y_min),
                delay_ms: match self.config.delay {
                    DelayPolicy::Stagger { step_ms } => index as f32 * step_ms,
                    DelayPolicy::Random { max_ms } => self.rng.f32() * max_ms,
                },
            })
            .collect();

        tracing::trace!("ParticleBurstGenerator: generated {} particles", count);
        particles
    }
}

impl Default for ParticleBurstGenerator {
    fn default() -> Self {
        Self::new(ParticleConfig::default())
    }
}

impl std::fmt::Debug for ParticleBurstGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleBurstGenerator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seeded(config: ParticleConfig) -> ParticleBurstGenerator {
        ParticleBurstGenerator::new(config)
            .with_seed(7)
            .with_id_source(SequentialIds::starting_at(100))
    }

    #[test]
    fn test_generate_zero_is_empty() {
        let mut generator = seeded(ParticleConfig::default());
        assert!(generator.generate(0).is_empty());
    }

    #[test]
    fn test_batch_shape() {
        let mut generator = ParticleBurstGenerator::default();
        for count in [1, 2, 8, 50, 500] {
            let batch = generator.generate(count);
            assert_eq!(batch.len(), count);

            let ids: HashSet<u64> = batch.iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), count);

            for p in &batch {
                assert!((0.0..=100.0).contains(&p.x), "x = {}", p.x);
                assert!((0.0..=100.0).contains(&p.y), "y = {}", p.y);
            }
        }
    }

    #[test]
    fn test_exact_sequential_ids() {
        let mut generator = seeded(ParticleConfig::default());

        let first: Vec<u64> = generator.generate(3).iter().map(|p| p.id).collect();
        let second: Vec<u64> = generator.generate(2).iter().map(|p| p.id).collect();

        assert_eq!(first, vec![100, 101, 102]);
        assert_eq!(second, vec![103, 104]);
    }

    #[test]
    fn test_ids_wrap_without_collision() {
        let mut generator = seeded(ParticleConfig::default())
            .with_id_source(SequentialIds::starting_at(u64::MAX - 1));
        let ids: Vec<u64> = generator.generate(4).iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![u64::MAX - 1, u64::MAX, 0, 1]);
    }

    #[test]
    fn test_stagger_delay() {
        let mut generator = seeded(ParticleConfig::default());
        let delays: Vec<f32> = generator.burst().iter().map(|p| p.delay_ms).collect();

        assert_eq!(delays, vec![0.0, 80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0]);
        assert_eq!(
            generator.delay_policy(),
            DelayPolicy::Stagger { step_ms: 80.0 }
        );
    }

    #[test]
    fn test_random_delay_bounded() {
        let mut generator = seeded(ParticleConfig::new(64).random_delay(300.0));
        assert_eq!(generator.delay_policy(), DelayPolicy::Random { max_ms: 300.0 });

        for p in generator.burst() {
            assert!((0.0..300.0).contains(&p.delay_ms), "delay = {}", p.delay_ms);
        }
    }

    #[test]
    fn test_y_band() {
        let mut generator = seeded(ParticleConfig::new(100).with_y_band(80.0, 20.0));
        assert_eq!(generator.config().y_band, (20.0, 80.0));

        for p in generator.burst() {
            assert!((20.0..=80.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let a = seeded(ParticleConfig::default()).burst();
        let b = seeded(ParticleConfig::default()).burst();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bursts_are_independent() {
        let mut generator = seeded(ParticleConfig::default());
        let first = generator.burst();
        let second = generator.burst();

        assert_ne!(first, second);
        assert_eq!(first.len(), second.len());
    }

    #[test]
    fn test_set_count() {
        let mut generator = seeded(ParticleConfig::default());
        generator.set_count(3);
        assert_eq!(generator.burst().len(), 3);
        generator.set_count(0);
        assert!(generator.burst().is_empty());
    }
}
