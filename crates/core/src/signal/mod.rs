use std::ops::Index;
use std::sync::Arc;

/// Default number of samples held by an [`AmplitudeBuffer`].
pub const DEFAULT_BUFFER_LEN: usize = 128;

/// Harmonic partials summed by the generator as `(amplitude, spatial
/// frequency, temporal frequency)`.
const PARTIALS: [(f64, f64, f64); 3] = [(0.4, 20.0, 3.0), (0.3, 45.0, 2.0), (0.2, 80.0, 4.0)];
const NOISE_GAIN: f64 = 0.1;

/// Immutable block of amplitude samples handed to a render strategy.
///
/// Values sit nominally in `[-1, 1]` but are not clamped. Cloning is cheap and
/// never aliases a buffer that a later tick could mutate.
#[derive(Debug, Clone, PartialEq)]
pub struct AmplitudeBuffer {
    samples: Arc<[f32]>,
}

impl AmplitudeBuffer {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self {
            samples: samples.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.samples
    }

    /// Absolute sample value at `index` wrapped around the buffer length.
    ///
    /// Callers must check [`AmplitudeBuffer::is_empty`] first.
    pub fn magnitude_at(&self, index: usize) -> f64 {
        f64::from(self.samples[index % self.samples.len()].abs())
    }
}

impl Index<usize> for AmplitudeBuffer {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.samples[index]
    }
}

/// Synthetic stand-in for an analysed audio signal.
///
/// Each call to [`SignalGenerator::next`] evaluates a closed-form sum of three
/// travelling sine waves plus a small uniform noise term. No decoded audio is
/// involved, so the visualisation keeps moving with or without a track.
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    len: usize,
    rng: fastrand::Rng,
}

impl SignalGenerator {
    pub fn new(len: usize) -> Self {
        Self {
            len,
            rng: fastrand::Rng::new(),
        }
    }

    /// Generator with a fixed noise seed, for reproducible snapshots.
    pub fn with_seed(len: usize, seed: u64) -> Self {
        Self {
            len,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Buffer length, fixed for the lifetime of the generator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a fresh buffer for `tick_seconds` scaled by `speed`.
    pub fn next(&mut self, tick_seconds: f64, speed: f64) -> AmplitudeBuffer {
        let t = tick_seconds * speed;
        let n = self.len as f64;
        let samples = (0..self.len)
            .map(|i| {
                let x = i as f64 / n;
                let tone: f64 = PARTIALS
                    .iter()
                    .map(|(gain, space, time)| gain * (space * x + time * t).sin())
                    .sum();
                let noise = NOISE_GAIN * (self.rng.f64() - 0.5);
                (tone + noise) as f32
            })
            .collect();

        AmplitudeBuffer::from_samples(samples)
    }
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(i: usize, len: usize, t: f64) -> f64 {
        let x = i as f64 / len as f64;
        0.4 * (20.0 * x + 3.0 * t).sin()
            + 0.3 * (45.0 * x + 2.0 * t).sin()
            + 0.2 * (80.0 * x + 4.0 * t).sin()
    }

    #[test]
    fn produces_buffers_of_configured_length() {
        let mut generator = SignalGenerator::new(64);
        for tick in 0..10 {
            assert_eq!(generator.next(tick as f64 * 0.05, 1.0).len(), 64);
        }
        assert_eq!(SignalGenerator::default().len(), DEFAULT_BUFFER_LEN);
    }

    #[test]
    fn samples_follow_the_closed_form_within_noise() {
        let mut generator = SignalGenerator::new(128);
        let buffer = generator.next(2.5, 1.5);

        for (i, sample) in buffer.as_slice().iter().enumerate() {
            let expected = tone(i, 128, 2.5 * 1.5);
            assert!(
                (f64::from(*sample) - expected).abs() <= 0.05 + 1e-5,
                "sample {i} drifted: {sample} vs {expected}"
            );
        }
    }

    #[test]
    fn returns_a_new_buffer_each_call() {
        let mut generator = SignalGenerator::with_seed(128, 7);
        let first = generator.next(1.0, 1.0);
        let retained = first.clone();
        let second = generator.next(1.0, 1.0);

        assert_eq!(first, retained);
        // Same time term, different noise draws.
        assert_ne!(first, second);
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let a = SignalGenerator::with_seed(32, 42).next(0.75, 1.0);
        let b = SignalGenerator::with_seed(32, 42).next(0.75, 1.0);
        assert_eq!(a, b);
    }

    #[test]
    fn magnitude_wraps_indices() {
        let buffer = AmplitudeBuffer::from_samples(vec![-0.5, 0.25]);
        assert_eq!(buffer.magnitude_at(0), 0.5);
        assert_eq!(buffer.magnitude_at(3), 0.25);
    }
}
