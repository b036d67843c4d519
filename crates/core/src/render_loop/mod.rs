use std::time::Duration;

use crate::config::RenderConfig;
use crate::render::{Bars, Dots, DrawingSurface, FrameContext, Grid, RenderStrategy};
use crate::timeline::PeriodicTimer;
use crate::{ColorTheme, SignalGenerator, TickError, VisualStyle};

/// Snapshot of the UI-owned settings, copied once at the start of each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub style: VisualStyle,
    pub theme: ColorTheme,
    pub speed: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            style: VisualStyle::default(),
            theme: ColorTheme::default(),
            speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered { style: VisualStyle, primitives: usize },
    /// The surface has no area yet; nothing was replaced.
    SkippedZeroExtent,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub rendered: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Fixed-cadence driver that regenerates the signal and repaints the surface.
///
/// Runs regardless of playback: without a track the synthetic signal keeps
/// the picture moving. A failing tick is logged and counted, and the loop
/// carries on at its next interval.
#[derive(Debug)]
pub struct RenderLoop {
    timer: PeriodicTimer,
    generator: SignalGenerator,
    bars: Bars,
    dots: Dots,
    grid: Grid,
    stats: RenderStats,
}

impl RenderLoop {
    pub fn new(config: &RenderConfig) -> Self {
        Self::with_generator(config, SignalGenerator::new(config.buffer_len))
    }

    pub fn with_generator(config: &RenderConfig, generator: SignalGenerator) -> Self {
        Self {
            timer: PeriodicTimer::new(config.period()),
            generator,
            bars: Bars {
                count: config.bar_count,
            },
            dots: Dots {
                count: config.dot_count,
            },
            grid: Grid {
                size: config.grid_size,
            },
            stats: RenderStats::default(),
        }
    }

    pub fn activate(&mut self, now: Duration) {
        if !self.timer.is_running() {
            let period_ms = self.timer.period().as_millis() as u64;
            tracing::info!(period_ms, "render loop started");
        }
        self.timer.start(now);
    }

    /// Stops the loop. Idempotent.
    pub fn shutdown(&mut self) {
        if self.timer.is_running() {
            tracing::info!(stats = ?self.stats, "render loop stopped");
        }
        self.timer.stop();
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.timer.next_due()
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn strategy(&self, style: VisualStyle) -> &dyn RenderStrategy {
        match style {
            VisualStyle::Bars => &self.bars,
            VisualStyle::Dots => &self.dots,
            VisualStyle::Grid => &self.grid,
        }
    }

    /// Drops render ticks that fell more than one period behind `now`.
    pub fn skip_missed(&mut self, now: Duration) {
        if self.timer.skip_missed(now) {
            tracing::debug!(
                now_ms = now.as_millis() as u64,
                "render loop fell behind, dropping missed frames"
            );
        }
    }

    /// Runs the render callback if its tick is due at `now`.
    pub fn fire<S>(
        &mut self,
        now: Duration,
        settings: RenderSettings,
        surface: &mut S,
    ) -> Option<Result<TickOutcome, TickError>>
    where
        S: DrawingSurface + ?Sized,
    {
        self.timer
            .fire(now)
            .then(|| self.tick(now, settings, surface))
    }

    /// One render tick at wall-clock offset `now`.
    ///
    /// Errors are logged and counted here; callers may inspect them but need
    /// not handle them.
    pub fn tick<S>(
        &mut self,
        now: Duration,
        settings: RenderSettings,
        surface: &mut S,
    ) -> Result<TickOutcome, TickError>
    where
        S: DrawingSurface + ?Sized,
    {
        let result = self.render_frame(now.as_secs_f64(), settings, surface);
        match &result {
            Ok(TickOutcome::Rendered { .. }) => self.stats.rendered += 1,
            Ok(TickOutcome::SkippedZeroExtent) => self.stats.skipped += 1,
            Err(err) => {
                self.stats.failed += 1;
                tracing::warn!(error = %err, style = %settings.style, "render tick skipped");
            }
        }
        result
    }

    fn render_frame<S>(
        &mut self,
        time: f64,
        settings: RenderSettings,
        surface: &mut S,
    ) -> Result<TickOutcome, TickError>
    where
        S: DrawingSurface + ?Sized,
    {
        let (width, height) = (surface.width(), surface.height());
        if width == 0.0 || height == 0.0 {
            return Ok(TickOutcome::SkippedZeroExtent);
        }
        if !(width.is_finite() && height.is_finite()) || width < 0.0 || height < 0.0 {
            return Err(TickError::InvalidExtent { width, height });
        }

        let buffer = self.generator.next(time, settings.speed);
        let frame = FrameContext {
            width,
            height,
            time,
            theme: settings.theme,
        };
        let primitives = self.strategy(settings.style).render(&buffer, &frame)?;
        let count = primitives.len();
        surface.replace_primitives(primitives);

        Ok(TickOutcome::Rendered {
            style: settings.style,
            primitives: count,
        })
    }
}
