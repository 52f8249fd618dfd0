//! Ambient orb field
//!
//! Maps elapsed time to the position and scale of the three background
//! orbs. Every axis of every orb is an independent oscillator
//! `base + amplitude * wave(frequency * t)` with `t` in seconds, so the
//! mapping is pure, deterministic and self-bounded.

use serde::Deserialize;

/// Periodic function driving an oscillator
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    Sin,
    Cos,
}

impl Wave {
    fn eval(self, x: f64) -> f64 {
        match self {
            Wave::Sin => x.sin(),
            Wave::Cos => x.cos(),
        }
    }
}

/// `base + amplitude * wave(frequency * t)`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Oscillator {
    pub base: f32,
    pub amplitude: f32,
    /// Angular frequency in radians per second
    pub frequency: f32,
    pub wave: Wave,
}

impl Oscillator {
    pub const fn new(base: f32, amplitude: f32, frequency: f32, wave: Wave) -> Self {
        Self {
            base,
            amplitude,
            frequency,
            wave,
        }
    }

    /// Zero-centred sine oscillator
    pub const fn sin(amplitude: f32, frequency: f32) -> Self {
        Self::new(0.0, amplitude, frequency, Wave::Sin)
    }

    /// Zero-centred cosine oscillator
    pub const fn cos(amplitude: f32, frequency: f32) -> Self {
        Self::new(0.0, amplitude, frequency, Wave::Cos)
    }

    /// Shift the centre of oscillation
    pub const fn around(mut self, base: f32) -> Self {
        self.base = base;
        self
    }

    /// Sample at `t` seconds
    pub fn sample(&self, t: f64) -> f32 {
        let value = f64::from(self.base)
            + f64::from(self.amplitude) * self.wave.eval(f64::from(self.frequency) * t);
        value as f32
    }

    /// Inclusive `(min, max)` the oscillator can reach
    pub fn range(&self) -> (f32, f32) {
        let amplitude = self.amplitude.abs();
        (self.base - amplitude, self.base + amplitude)
    }
}

/// Position and scale of one orb at an instant
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbPosition {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Oscillators for the three properties of one orb
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbConstants {
    pub x: Oscillator,
    pub y: Oscillator,
    pub scale: Oscillator,
}

impl OrbConstants {
    pub const fn new(x: Oscillator, y: Oscillator, scale: Oscillator) -> Self {
        Self { x, y, scale }
    }

    /// Position at `t` seconds
    pub fn position_at(&self, t: f64) -> OrbPosition {
        OrbPosition {
            x: self.x.sample(t),
            y: self.y.sample(t),
            scale: self.scale.sample(t),
        }
    }
}

/// Positions of all orbs at an instant
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbFieldState {
    pub orb1: OrbPosition,
    pub orb2: OrbPosition,
    pub orb3: OrbPosition,
}

impl OrbFieldState {
    /// Orbs in render order
    pub fn to_array(&self) -> [OrbPosition; 3] {
        [self.orb1, self.orb2, self.orb3]
    }
}

/// Named orb tunings
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrbPreset {
    /// Wide, slow drift centred on the origin
    #[default]
    Drift,
    /// Tighter motion offset to the upper-left, the viewer's first tuning
    Classic,
}

/// Pure time-to-position mapping for the orb field
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbFieldModel {
    orbs: [OrbConstants; 3],
}

impl OrbFieldModel {
    pub const fn new(orbs: [OrbConstants; 3]) -> Self {
        Self { orbs }
    }

    /// Wide drift around the origin
    pub const fn drift() -> Self {
        Self::new([
            OrbConstants::new(
                Oscillator::sin(100.0, 0.5),
                Oscillator::cos(80.0, 0.3),
                Oscillator::sin(0.2, 0.7).around(0.8),
            ),
            OrbConstants::new(
                Oscillator::cos(120.0, 0.4),
                Oscillator::sin(90.0, 0.6),
                Oscillator::cos(0.1, 0.5).around(0.9),
            ),
            OrbConstants::new(
                Oscillator::sin(60.0, 0.3),
                Oscillator::cos(70.0, 0.8),
                Oscillator::sin(0.3, 0.9).around(0.7),
            ),
        ])
    }

    /// Tighter motion offset towards the upper-left corner
    pub const fn classic() -> Self {
        Self::new([
            OrbConstants::new(
                Oscillator::sin(50.0, 1.0).around(-160.0),
                Oscillator::cos(30.0, 1.0).around(-160.0),
                Oscillator::sin(0.2, 2.0).around(1.0),
            ),
            OrbConstants::new(
                Oscillator::sin(40.0, 0.8).around(-160.0),
                Oscillator::sin(25.0, 1.6).around(-160.0),
                Oscillator::cos(0.15, 1.5).around(1.0),
            ),
            OrbConstants::new(
                Oscillator::sin(20.0, 0.6),
                Oscillator::cos(15.0, 1.2),
                Oscillator::sin(0.1, 1.0).around(1.0),
            ),
        ])
    }

    pub fn from_preset(preset: OrbPreset) -> Self {
        match preset {
            OrbPreset::Drift => Self::drift(),
            OrbPreset::Classic => Self::classic(),
        }
    }

    pub fn orbs(&self) -> &[OrbConstants; 3] {
        &self.orbs
    }

    /// Orb positions `elapsed_ms` after the field started moving
    pub fn compute_positions(&self, elapsed_ms: f64) -> OrbFieldState {
        let t = elapsed_ms / 1000.0;
        let [orb1, orb2, orb3] = &self.orbs;
        OrbFieldState {
            orb1: orb1.position_at(t),
            orb2: orb2.position_at(t),
            orb3: orb3.position_at(t),
        }
    }
}

impl Default for OrbFieldModel {
    fn default() -> Self {
        Self::drift()
    }
}
