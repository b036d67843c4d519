use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AmplitudeBuffer, TickError};

mod bars;
mod dots;
mod grid;
mod surface;

pub use bars::Bars;
pub use dots::Dots;
pub use grid::Grid;
pub use surface::{Canvas, DrawingSurface};

/// Straight (non-premultiplied) 8-bit colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Base colour shared by every strategy; each strategy applies its own alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorTheme {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorTheme {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self::new(100, 200, 255)
    }
}

/// Selects which strategy renders the next tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualStyle {
    #[default]
    Bars,
    Dots,
    Grid,
}

impl VisualStyle {
    pub const fn all() -> [Self; 3] {
        [Self::Bars, Self::Dots, Self::Grid]
    }

    pub fn next(self) -> Self {
        match self {
            Self::Bars => Self::Dots,
            Self::Dots => Self::Grid,
            Self::Grid => Self::Bars,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Bars => "Bars",
            Self::Dots => "Dots",
            Self::Grid => "Grid",
        }
    }
}

impl fmt::Display for VisualStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visual style `{0}`")]
pub struct ParseStyleError(pub String);

impl FromStr for VisualStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|style| style.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseStyleError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Rectangle,
    Ellipse,
}

/// Drawable shape emitted by a strategy.
///
/// Coordinates use a top-left origin with `y` growing downwards; `(x, y)` is
/// the top-left corner of the shape's bounding box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub shape: Shape,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: Rgba,
    pub corner_radius: f64,
}

/// Everything a strategy may read for one frame besides the samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    pub width: f64,
    pub height: f64,
    /// Monotonic wall-clock seconds, used for secondary pulsation only.
    pub time: f64,
    pub theme: ColorTheme,
}

/// Pure mapping from an amplitude buffer to a full primitive set.
pub trait RenderStrategy {
    fn style(&self) -> VisualStyle;

    fn render(
        &self,
        buffer: &AmplitudeBuffer,
        frame: &FrameContext,
    ) -> Result<Vec<Primitive>, TickError>;
}

/// Sample index for slot `slot` of `count` spread evenly across `len` samples.
fn spread_index(slot: usize, count: usize, len: usize) -> usize {
    (slot * len / count) % len
}

fn ensure_renderable(
    buffer: &AmplitudeBuffer,
    count: usize,
    style: VisualStyle,
) -> Result<(), TickError> {
    if buffer.is_empty() {
        return Err(TickError::EmptyBuffer);
    }
    if count == 0 {
        return Err(TickError::EmptyLayout { style });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_style_names_case_insensitively() {
        assert_eq!("Bars".parse(), Ok(VisualStyle::Bars));
        assert_eq!(" dots ".parse(), Ok(VisualStyle::Dots));
        assert_eq!("GRID".parse(), Ok(VisualStyle::Grid));
        assert!("Spiral".parse::<VisualStyle>().is_err());
    }

    #[test]
    fn style_cycle_visits_every_style() {
        let mut style = VisualStyle::Bars;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(style);
            style = style.next();
        }
        assert_eq!(seen, VisualStyle::all());
        assert_eq!(style, VisualStyle::Bars);
    }

    #[test]
    fn spreads_indices_across_the_buffer() {
        assert_eq!(spread_index(0, 32, 128), 0);
        assert_eq!(spread_index(31, 32, 128), 124);
        assert_eq!(spread_index(79, 80, 128), 126);
        assert_eq!(spread_index(3, 4, 3), 2);
        assert_eq!(spread_index(7, 4, 3), 2);
    }
}
