use super::{ensure_renderable, FrameContext, Primitive, RenderStrategy, Shape};
use crate::{AmplitudeBuffer, TickError, VisualStyle};

const ALPHA: u8 = 150;
const MIN_SIZE: f64 = 2.0;
const BASE_SCALE: f64 = 0.4;
const INFLUENCE_SCALE: f64 = 0.3;
const WAVE_AMPLITUDE: f64 = 1.5;
const WAVE_RATE: f64 = 3.0;
const WAVE_PHASE_STEP: f64 = 0.4;
const CORNER_RADIUS: f64 = 1.0;

/// Square lattice of cells whose size follows the signal and a diagonal wave.
///
/// Cells are square with side `width / size`, laid out from the top-left
/// corner. Each cell averages two cross-indexed samples so rows and columns
/// do not move in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub size: usize,
}

impl Default for Grid {
    fn default() -> Self {
        Self { size: 12 }
    }
}

impl RenderStrategy for Grid {
    fn style(&self) -> VisualStyle {
        VisualStyle::Grid
    }

    fn render(
        &self,
        buffer: &AmplitudeBuffer,
        frame: &FrameContext,
    ) -> Result<Vec<Primitive>, TickError> {
        ensure_renderable(buffer, self.size, self.style())?;

        let n = self.size;
        let cell = frame.width / n as f64;
        let fill = frame.theme.with_alpha(ALPHA);
        let mut cells = Vec::with_capacity(n * n);

        for col in 0..n {
            for row in 0..n {
                let influence =
                    0.5 * (buffer.magnitude_at(col * n + row) + buffer.magnitude_at(row * n + col));
                let wave = (WAVE_RATE * frame.time
                    + WAVE_PHASE_STEP * col as f64
                    + WAVE_PHASE_STEP * row as f64)
                    .sin();
                let size = (BASE_SCALE * cell + INFLUENCE_SCALE * influence * cell
                    + WAVE_AMPLITUDE * wave)
                    .max(MIN_SIZE);
                let inset = (cell - size) / 2.0;

                cells.push(Primitive {
                    shape: Shape::Rectangle,
                    x: col as f64 * cell + inset,
                    y: row as f64 * cell + inset,
                    width: size,
                    height: size,
                    fill,
                    corner_radius: CORNER_RADIUS,
                });
            }
        }

        Ok(cells)
    }
}
