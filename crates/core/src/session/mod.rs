use std::path::PathBuf;
use std::time::Duration;

use crate::audio::{AudioBackend, PlaybackState};
use crate::playback::{PlaybackSync, PositionDisplay};
use crate::render::DrawingSurface;
use crate::render_loop::{RenderLoop, RenderSettings, RenderStats};
use crate::timeline::{earliest, Clock};
use crate::{AppConfig, ColorTheme, Result, VisualStyle};

/// Signals emitted by the user interface.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    StyleSelected(VisualStyle),
    ThemeChanged(ColorTheme),
    VolumeChanged(f32),
    SeekPressed,
    SeekMoved(f64),
    SeekReleased,
    Load(PathBuf),
    Play,
    Pause,
    Stop,
}

/// A running visualiser: render loop, position poller and the surface they
/// feed, all driven from one serialized queue.
///
/// Time only moves through [`Visualiser::advance_to`], which fires due ticks
/// one at a time in deadline order (render first on ties). UI events are
/// applied between ticks at the current instant, so a style change always
/// lands on the next render tick and never on one in progress.
pub struct Visualiser<B: AudioBackend, S> {
    clock: Clock,
    backend: B,
    surface: S,
    settings: RenderSettings,
    render: RenderLoop,
    playback: PlaybackSync<B::Device>,
}

impl<B, S> Visualiser<B, S>
where
    B: AudioBackend,
    S: DrawingSurface,
{
    pub fn new(config: &AppConfig, backend: B, surface: S) -> Self {
        Self::with_render_loop(config, RenderLoop::new(&config.render), backend, surface)
    }

    pub fn with_render_loop(
        config: &AppConfig,
        render: RenderLoop,
        backend: B,
        surface: S,
    ) -> Self {
        Self {
            clock: Clock::new(),
            backend,
            surface,
            settings: RenderSettings {
                style: config.style,
                theme: config.theme,
                speed: config.render.speed,
            },
            render,
            playback: PlaybackSync::new(config.playback.poll_period(), config.playback.volume),
        }
    }

    /// Activates the render loop at the current instant.
    pub fn start(&mut self) {
        self.render.activate(self.clock.now());
    }

    /// Stops both loops and releases the playback device. Idempotent.
    pub fn shutdown(&mut self) {
        self.render.shutdown();
        self.playback.shutdown();
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    pub fn settings(&self) -> RenderSettings {
        self.settings
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    pub fn position(&self) -> &PositionDisplay {
        self.playback.display()
    }

    pub fn is_seeking(&self) -> bool {
        self.playback.is_seeking()
    }

    pub fn render_stats(&self) -> RenderStats {
        self.render.stats()
    }

    pub fn is_rendering(&self) -> bool {
        self.render.is_running()
    }

    pub fn is_polling(&self) -> bool {
        self.playback.is_polling()
    }

    /// Earliest instant at which a tick is due, if any loop is running.
    pub fn next_deadline(&self) -> Option<Duration> {
        earliest(self.render.next_due(), self.playback.next_due())
    }

    /// Applies one UI event at the current instant.
    ///
    /// Only loading can fail; the error is returned for the caller to show
    /// and leaves both loops untouched.
    pub fn handle(&mut self, event: UiEvent) -> Result<()> {
        let now = self.clock.now();
        match event {
            UiEvent::StyleSelected(style) => {
                if style != self.settings.style {
                    tracing::debug!(from = %self.settings.style, to = %style, "style changed");
                }
                self.settings.style = style;
            }
            UiEvent::ThemeChanged(theme) => {
                tracing::debug!(?theme, "theme changed");
                self.settings.theme = theme;
            }
            UiEvent::VolumeChanged(volume) => self.playback.set_volume(volume),
            UiEvent::SeekPressed => self.playback.begin_seek(),
            UiEvent::SeekMoved(seconds) => self.playback.seek_moved(seconds),
            UiEvent::SeekReleased => {
                self.playback.end_seek();
            }
            UiEvent::Load(path) => self.playback.load(&mut self.backend, &path, now)?,
            UiEvent::Play => {
                self.playback.play(now);
            }
            UiEvent::Pause => self.playback.pause(),
            UiEvent::Stop => self.playback.stop(),
        }
        Ok(())
    }

    /// Advances time to `target`, firing every tick due on the way.
    pub fn advance_to(&mut self, target: Duration) {
        while let Some(due) = self.next_deadline() {
            if due > target {
                break;
            }
            self.clock.advance_to(due);
            let now = self.clock.now();

            if self.render.next_due() == Some(due) {
                // Failures are logged and counted by the loop itself.
                let _ = self.render.fire(now, self.settings, &mut self.surface);
            }
            if self.playback.next_due() == Some(due) {
                self.playback.fire(now);
            }
        }
        self.clock.advance_to(target);
    }

    /// Real-time variant of [`Visualiser::advance_to`] for hosts driven by a
    /// wall clock: ticks that fell more than one period behind are dropped
    /// instead of replayed back to back.
    pub fn catch_up_to(&mut self, target: Duration) {
        self.render.skip_missed(target);
        self.playback.skip_missed(target);
        self.advance_to(target);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        self.advance_to(self.clock.now() + delta);
    }
}

impl<B, S> std::fmt::Debug for Visualiser<B, S>
where
    B: AudioBackend,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualiser")
            .field("now", &self.clock.now())
            .field("settings", &self.settings)
            .field("render", &self.render)
            .field("seeking", &self.playback.is_seeking())
            .finish()
    }
}
