use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ColorTheme, Result, VisualStyle, VisualiserError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub playback: PlaybackConfig,
    pub theme: ColorTheme,
    pub style: VisualStyle,
}

impl AppConfig {
    pub fn live_defaults() -> Self {
        Self::default()
    }

    /// Reads a JSON configuration file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.render.period_ms == 0 {
            return Err(invalid("render.period_ms must be greater than zero"));
        }
        if self.playback.poll_period_ms == 0 {
            return Err(invalid("playback.poll_period_ms must be greater than zero"));
        }
        if self.render.buffer_len == 0 {
            return Err(invalid("render.buffer_len must be greater than zero"));
        }
        if !(self.render.speed.is_finite() && self.render.speed > 0.0) {
            return Err(invalid("render.speed must be a positive number"));
        }
        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(invalid("playback.volume must lie within 0.0..=1.0"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> VisualiserError {
    VisualiserError::InvalidConfig(reason.to_string())
}

/// Configuration of the render loop and its strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub period_ms: u64,
    pub buffer_len: usize,
    pub bar_count: usize,
    pub dot_count: usize,
    pub grid_size: usize,
    /// Multiplier applied to the signal's time term.
    pub speed: f64,
}

impl RenderConfig {
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            period_ms: 50,
            buffer_len: crate::signal::DEFAULT_BUFFER_LEN,
            bar_count: 32,
            dot_count: 80,
            grid_size: 12,
            speed: 1.0,
        }
    }
}

/// Configuration specific to playback position tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub poll_period_ms: u64,
    pub volume: f32,
}

impl PlaybackConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_period_ms: 100,
            volume: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_the_reference_cadence() {
        let config = AppConfig::live_defaults();
        assert_eq!(config.render.period(), Duration::from_millis(50));
        assert_eq!(config.playback.poll_period(), Duration::from_millis(100));
        assert_eq!(config.render.buffer_len, 128);
        assert_eq!(config.style, VisualStyle::Bars);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "style": "grid", "theme": {{ "r": 255, "g": 0, "b": 128 }}, "render": {{ "speed": 2.0 }} }}"#
        )
        .unwrap();

        let config = AppConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.style, VisualStyle::Grid);
        assert_eq!(config.theme, ColorTheme::new(255, 0, 128));
        assert_eq!(config.render.speed, 2.0);
        assert_eq!(config.render.bar_count, 32);
        assert_eq!(config.playback, PlaybackConfig::default());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut config = AppConfig::default();
        config.playback.volume = 1.5;
        assert!(matches!(
            config.validate(),
            Err(VisualiserError::InvalidConfig(_))
        ));

        let mut config = AppConfig::default();
        config.render.period_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.render.speed = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            AppConfig::from_json_file(file.path()),
            Err(VisualiserError::Json(_))
        ));
    }
}
