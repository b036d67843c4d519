//! Deterministic playback device for tests. Time only moves when a test says so.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use super::{AudioBackend, AudioPlaybackDevice, PlaybackState};
use crate::LoadError;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(f32),
}

/// What one loaded device reports and what it was told.
#[derive(Debug, Default)]
pub struct Track {
    pub path: PathBuf,
    pub current: Duration,
    pub total: Duration,
    pub state: PlaybackState,
    pub commands: Vec<Command>,
}

/// Every track opened through a [`ScriptedBackend`], in load order.
#[derive(Debug, Default)]
pub struct Script {
    pub tracks: Vec<Track>,
}

/// Backend that hands each loaded device its own [`Track`] record.
///
/// The helpers act on the most recently loaded track.
#[derive(Debug, Clone)]
pub struct ScriptedBackend {
    pub script: Rc<RefCell<Script>>,
    pub track_length: Duration,
}

impl ScriptedBackend {
    pub fn new(track_length: Duration) -> Self {
        Self {
            script: Rc::default(),
            track_length,
        }
    }

    pub fn loads(&self) -> usize {
        self.script.borrow().tracks.len()
    }

    fn with_latest<T>(&self, f: impl FnOnce(&mut Track) -> T) -> T {
        let mut script = self.script.borrow_mut();
        let track = script
            .tracks
            .last_mut()
            .expect("no track has been loaded");
        f(track)
    }

    pub fn set_current(&self, current: Duration) {
        self.with_latest(|track| track.current = current);
    }

    pub fn set_state(&self, state: PlaybackState) {
        self.with_latest(|track| track.state = state);
    }

    pub fn current(&self) -> Duration {
        self.with_latest(|track| track.current)
    }

    pub fn commands(&self) -> Vec<Command> {
        self.with_latest(|track| track.commands.clone())
    }

    /// Commands received by the `index`-th loaded track.
    pub fn track_commands(&self, index: usize) -> Vec<Command> {
        self.script.borrow().tracks[index].commands.clone()
    }
}

impl AudioBackend for ScriptedBackend {
    type Device = ScriptedDevice;

    fn load(&mut self, path: &Path) -> Result<ScriptedDevice, LoadError> {
        if path.to_string_lossy().contains("missing") {
            return Err(LoadError::Missing {
                path: path.to_path_buf(),
            });
        }
        let mut script = self.script.borrow_mut();
        script.tracks.push(Track {
            path: path.to_path_buf(),
            total: self.track_length,
            ..Track::default()
        });
        Ok(ScriptedDevice {
            script: Rc::clone(&self.script),
            track: script.tracks.len() - 1,
        })
    }
}

#[derive(Debug)]
pub struct ScriptedDevice {
    script: Rc<RefCell<Script>>,
    track: usize,
}

impl ScriptedDevice {
    fn with_track<T>(&self, f: impl FnOnce(&mut Track) -> T) -> T {
        f(&mut self.script.borrow_mut().tracks[self.track])
    }

    fn record(&self, command: Command) {
        self.with_track(|track| track.commands.push(command));
    }
}

impl AudioPlaybackDevice for ScriptedDevice {
    fn play(&mut self) {
        self.record(Command::Play);
        self.with_track(|track| track.state = PlaybackState::Playing);
    }

    fn pause(&mut self) {
        self.record(Command::Pause);
        self.with_track(|track| track.state = PlaybackState::Paused);
    }

    fn stop(&mut self) {
        self.record(Command::Stop);
        self.with_track(|track| track.state = PlaybackState::Stopped);
    }

    fn seek(&mut self, position: Duration) {
        self.record(Command::Seek(position));
        self.with_track(|track| track.current = position);
    }

    fn current_time(&self) -> Duration {
        self.with_track(|track| track.current)
    }

    fn total_time(&self) -> Duration {
        self.with_track(|track| track.total)
    }

    fn state(&self) -> PlaybackState {
        self.with_track(|track| track.state)
    }

    fn set_volume(&mut self, volume: f32) {
        self.record(Command::Volume(volume));
    }
}
