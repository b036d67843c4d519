//! Core library for the Music Visualiser application.
//!
//! Two periodic loops share one serialized queue: a render loop that turns a
//! synthetic amplitude signal into drawable primitives, and a position poller
//! that mirrors the playback device into the time labels and seek slider.
//! Each module owns one piece (signal generation, render strategies,
//! scheduling, the audio collaborator, playback sync) and [`Visualiser`]
//! drives them together.

pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod render;
pub mod render_loop;
pub mod session;
pub mod signal;
pub mod timeline;

pub use audio::{
    AudioBackend, AudioPlaybackDevice, PlaybackState, SimulatedBackend, SimulatedDevice,
};
pub use config::{AppConfig, PlaybackConfig, RenderConfig};
pub use error::{LoadError, Result, TickError, VisualiserError};
pub use playback::{format_time, PlaybackSync, PollOutcome, PositionDisplay};
pub use render::{
    Bars, Canvas, ColorTheme, Dots, DrawingSurface, FrameContext, Grid, ParseStyleError, Primitive,
    RenderStrategy, Rgba, Shape, VisualStyle,
};
pub use render_loop::{RenderLoop, RenderSettings, RenderStats, TickOutcome};
pub use session::{UiEvent, Visualiser};
pub use signal::{AmplitudeBuffer, SignalGenerator};
pub use timeline::{Clock, PeriodicTimer};
