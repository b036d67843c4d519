use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::LoadError;

#[cfg(test)]
pub(crate) mod scripted;

/// Extensions accepted by the track picker.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["mp3", "wav", "aac", "wma", "m4a"];

/// Playback state as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Handle to a loaded track on an output device.
///
/// Every query must be a non-blocking read of state the device has already
/// buffered; the poller calls them from its tick.
pub trait AudioPlaybackDevice {
    fn play(&mut self);

    fn pause(&mut self);

    fn stop(&mut self);

    fn seek(&mut self, position: Duration);

    fn current_time(&self) -> Duration;

    fn total_time(&self) -> Duration;

    fn state(&self) -> PlaybackState;

    /// Volume within `0.0..=1.0`.
    fn set_volume(&mut self, volume: f32);
}

/// Opens tracks into fresh devices.
pub trait AudioBackend {
    type Device: AudioPlaybackDevice;

    fn load(&mut self, path: &Path) -> Result<Self::Device, LoadError>;
}

fn check_extension(path: &Path) -> Result<String, LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(LoadError::Unsupported { extension })
    }
}

/// Backend that reads WAV headers and plays silence against the wall clock.
///
/// Decoding and device output live outside the core; this backend only
/// tracks position so the visualiser can run end to end.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedBackend;

impl SimulatedBackend {
    pub fn new() -> Self {
        Self
    }
}

impl AudioBackend for SimulatedBackend {
    type Device = SimulatedDevice;

    fn load(&mut self, path: &Path) -> Result<SimulatedDevice, LoadError> {
        let extension = check_extension(path)?;
        if !path.exists() {
            return Err(LoadError::Missing {
                path: path.to_path_buf(),
            });
        }
        if extension != "wav" {
            // Accepted by the picker but there is no decoder for it here.
            return Err(LoadError::Unsupported { extension });
        }

        let reader = hound::WavReader::open(path).map_err(|err| match err {
            hound::Error::IoError(source) => LoadError::Io {
                path: path.to_path_buf(),
                source,
            },
            other => LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(LoadError::Corrupt {
                path: path.to_path_buf(),
                reason: "sample rate is zero".to_string(),
            });
        }
        let seconds = f64::from(reader.duration()) / f64::from(spec.sample_rate);
        let total = Duration::from_secs_f64(seconds);

        tracing::debug!(
            path = %path.display(),
            sample_rate = spec.sample_rate,
            channels = spec.channels,
            seconds = total.as_secs_f64(),
            "opened wav track"
        );

        Ok(SimulatedDevice::new(path, total))
    }
}

/// Position tracker that advances with the wall clock while playing.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    path: PathBuf,
    total: Duration,
    state: PlaybackState,
    offset: Duration,
    resumed_at: Option<Instant>,
    volume: f32,
}

impl SimulatedDevice {
    pub fn new(path: impl Into<PathBuf>, total: Duration) -> Self {
        Self {
            path: path.into(),
            total,
            state: PlaybackState::Stopped,
            offset: Duration::ZERO,
            resumed_at: None,
            volume: 1.0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn freeze(&mut self) {
        self.offset = self.current_time();
        self.resumed_at = None;
    }

    /// Latches completion: a track that ran to its end is stopped there
    /// before any later command applies.
    fn settle(&mut self) {
        if self.state == PlaybackState::Playing && self.current_time() >= self.total {
            self.freeze();
            self.state = PlaybackState::Stopped;
        }
    }
}

impl AudioPlaybackDevice for SimulatedDevice {
    fn play(&mut self) {
        self.settle();
        if self.state == PlaybackState::Playing {
            return;
        }
        if self.current_time() >= self.total {
            self.offset = Duration::ZERO;
        }
        self.state = PlaybackState::Playing;
        self.resumed_at = Some(Instant::now());
    }

    fn pause(&mut self) {
        self.settle();
        if self.state == PlaybackState::Playing {
            self.freeze();
            self.state = PlaybackState::Paused;
        }
    }

    fn stop(&mut self) {
        self.freeze();
        self.state = PlaybackState::Stopped;
    }

    fn seek(&mut self, position: Duration) {
        self.settle();
        self.offset = position.min(self.total);
        if self.resumed_at.is_some() {
            self.resumed_at = Some(Instant::now());
        }
    }

    fn current_time(&self) -> Duration {
        let elapsed = self
            .resumed_at
            .map(|at| at.elapsed())
            .unwrap_or_default();
        (self.offset + elapsed).min(self.total)
    }

    fn total_time(&self) -> Duration {
        self.total
    }

    fn state(&self) -> PlaybackState {
        match self.state {
            PlaybackState::Playing if self.current_time() >= self.total => PlaybackState::Stopped,
            state => state,
        }
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}
