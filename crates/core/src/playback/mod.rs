use std::path::Path;
use std::time::Duration;

use crate::audio::{AudioBackend, AudioPlaybackDevice, PlaybackState};
use crate::timeline::PeriodicTimer;
use crate::LoadError;

/// Formats a position as `m:ss`, truncating to whole seconds.
pub fn format_time(position: Duration) -> String {
    let secs = position.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Values shown by the time labels and the position slider.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionDisplay {
    pub current_text: String,
    pub total_text: String,
    pub slider_max: f64,
    pub slider_value: f64,
}

impl Default for PositionDisplay {
    fn default() -> Self {
        Self {
            current_text: format_time(Duration::ZERO),
            total_text: format_time(Duration::ZERO),
            slider_max: 0.0,
            slider_value: 0.0,
        }
    }
}

/// What a single poll tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Display refreshed from the device.
    Updated,
    /// The user is dragging the slider; nothing was written.
    Suppressed,
    /// The track played to its end; polling has been halted.
    Finished,
    /// No track loaded or the device is not playing.
    Idle,
}

/// Keeps the position display in step with the playback device.
///
/// The device is the source of truth for playback state. The only state held
/// here is the seek flag, the last commanded state (to recognise a track
/// running out) and the poller's schedule.
#[derive(Debug)]
pub struct PlaybackSync<D> {
    device: Option<D>,
    seeking: bool,
    commanded: PlaybackState,
    poller: PeriodicTimer,
    display: PositionDisplay,
    volume: f32,
}

impl<D: AudioPlaybackDevice> PlaybackSync<D> {
    pub fn new(poll_period: Duration, volume: f32) -> Self {
        Self {
            device: None,
            seeking: false,
            commanded: PlaybackState::Stopped,
            poller: PeriodicTimer::new(poll_period),
            display: PositionDisplay::default(),
            volume: volume.clamp(0.0, 1.0),
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.device
            .as_ref()
            .map(AudioPlaybackDevice::state)
            .unwrap_or_default()
    }

    pub fn is_loaded(&self) -> bool {
        self.device.is_some()
    }

    pub fn is_seeking(&self) -> bool {
        self.seeking
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_running()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.poller.next_due()
    }

    pub fn display(&self) -> &PositionDisplay {
        &self.display
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    /// Opens `path` through `backend` and swaps it in.
    ///
    /// The new device is fully constructed before the current one is
    /// released, so a failed load leaves the current track playing.
    pub fn load<B>(
        &mut self,
        backend: &mut B,
        path: &Path,
        now: Duration,
    ) -> Result<(), LoadError>
    where
        B: AudioBackend<Device = D>,
    {
        let mut device = backend.load(path).inspect_err(|err| {
            tracing::error!(path = %path.display(), error = %err, "failed to load track");
        })?;
        device.set_volume(self.volume);

        let total = device.total_time();
        if let Some(mut previous) = self.device.replace(device) {
            previous.stop();
        }

        self.seeking = false;
        self.commanded = PlaybackState::Stopped;
        self.display = PositionDisplay {
            total_text: format_time(total),
            slider_max: total.as_secs_f64(),
            ..PositionDisplay::default()
        };
        self.poller.start(now);

        tracing::info!(
            path = %path.display(),
            total = %self.display.total_text,
            "track loaded"
        );
        Ok(())
    }

    /// Starts or resumes playback. Returns `false` when no track is loaded.
    pub fn play(&mut self, now: Duration) -> bool {
        let Some(device) = self.device.as_mut() else {
            tracing::debug!("play ignored, no track loaded");
            return false;
        };
        device.play();
        self.commanded = PlaybackState::Playing;
        self.poller.start(now);
        tracing::info!("playback started");
        true
    }

    /// Pauses playback and freezes the position display.
    pub fn pause(&mut self) {
        if let Some(device) = self.device.as_mut() {
            device.pause();
            self.commanded = PlaybackState::Paused;
            tracing::info!(position = %self.display.current_text, "playback paused");
        }
        self.poller.stop();
    }

    /// Stops playback and rewinds both the device and the display to zero.
    pub fn stop(&mut self) {
        if let Some(device) = self.device.as_mut() {
            device.stop();
            device.seek(Duration::ZERO);
            tracing::info!("playback stopped");
        }
        self.commanded = PlaybackState::Stopped;
        self.poller.stop();
        self.display.current_text = format_time(Duration::ZERO);
        self.display.slider_value = 0.0;
    }

    /// Pointer pressed on the position slider.
    pub fn begin_seek(&mut self) {
        self.seeking = true;
        tracing::debug!("seek started");
    }

    /// Slider dragged to `seconds` while seeking.
    pub fn seek_moved(&mut self, seconds: f64) {
        if self.seeking && seconds.is_finite() {
            self.display.slider_value = seconds.clamp(0.0, self.display.slider_max.max(0.0));
        }
    }

    /// Pointer released: commits the slider value to the device.
    ///
    /// Returns the committed position, or `None` when no seek was in progress
    /// or no track is loaded.
    pub fn end_seek(&mut self) -> Option<Duration> {
        if !std::mem::replace(&mut self.seeking, false) {
            return None;
        }
        let device = self.device.as_mut()?;
        let total = device.total_time().as_secs_f64();
        let target = Duration::from_secs_f64(self.display.slider_value.clamp(0.0, total));
        device.seek(target);
        tracing::debug!(target = %format_time(target), "seek committed");
        Some(target)
    }

    /// Halts polling and releases the device. Idempotent.
    pub fn shutdown(&mut self) {
        self.poller.stop();
        self.seeking = false;
        self.commanded = PlaybackState::Stopped;
        if let Some(mut device) = self.device.take() {
            device.stop();
            tracing::info!("playback device released");
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(device) = self.device.as_mut() {
            device.set_volume(self.volume);
        }
    }

    /// Drops poll ticks that fell more than one period behind `now`.
    pub fn skip_missed(&mut self, now: Duration) {
        if self.poller.skip_missed(now) {
            tracing::debug!(now_ms = now.as_millis() as u64, "position poller fell behind");
        }
    }

    /// Runs the poll callback if its tick is due at `now`.
    pub fn fire(&mut self, now: Duration) -> Option<PollOutcome> {
        self.poller.fire(now).then(|| self.poll())
    }

    /// One position-poll tick.
    pub fn poll(&mut self) -> PollOutcome {
        let Some(device) = self.device.as_ref() else {
            return PollOutcome::Idle;
        };

        match device.state() {
            PlaybackState::Playing if self.seeking => PollOutcome::Suppressed,
            PlaybackState::Playing => {
                let (current, total) = (device.current_time(), device.total_time());
                self.refresh(current, total);
                PollOutcome::Updated
            }
            PlaybackState::Stopped if self.commanded == PlaybackState::Playing => {
                if !self.seeking {
                    let (current, total) = (device.current_time(), device.total_time());
                    self.refresh(current, total);
                }
                self.commanded = PlaybackState::Stopped;
                self.poller.stop();
                tracing::debug!("track finished");
                PollOutcome::Finished
            }
            PlaybackState::Stopped | PlaybackState::Paused => PollOutcome::Idle,
        }
    }

    fn refresh(&mut self, current: Duration, total: Duration) {
        self.display.current_text = format_time(current);
        self.display.total_text = format_time(total);
        self.display.slider_max = total.as_secs_f64();
        self.display.slider_value = current.as_secs_f64();
    }
}
