use super::{ensure_renderable, spread_index, FrameContext, Primitive, RenderStrategy, Shape};
use crate::{AmplitudeBuffer, TickError, VisualStyle};

const ALPHA: u8 = 200;
const BASELINE: f64 = 20.0;
const RISE_SCALE: f64 = 0.6;
const BASE_SIZE: f64 = 3.0;
const AMPLITUDE_SIZE: f64 = 10.0;
const PULSE_SIZE: f64 = 4.0;
const PULSE_RATE: f64 = 2.0;
const PULSE_PHASE_STEP: f64 = 0.2;

/// A row of pulsing dots lifted by the signal.
///
/// The pulse depends on frame time only, so dots keep breathing even when the
/// signal is flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dots {
    pub count: usize,
}

impl Default for Dots {
    fn default() -> Self {
        Self { count: 80 }
    }
}

impl RenderStrategy for Dots {
    fn style(&self) -> VisualStyle {
        VisualStyle::Dots
    }

    fn render(
        &self,
        buffer: &AmplitudeBuffer,
        frame: &FrameContext,
    ) -> Result<Vec<Primitive>, TickError> {
        ensure_renderable(buffer, self.count, self.style())?;

        let fill = frame.theme.with_alpha(ALPHA);

        Ok((0..self.count)
            .map(|k| {
                let x = k as f64 / self.count as f64 * frame.width;
                let amplitude = buffer.magnitude_at(spread_index(k, self.count, buffer.len()));
                let lift = BASELINE + amplitude * frame.height * RISE_SCALE;
                let pulse =
                    0.5 * (1.0 + (PULSE_RATE * frame.time + PULSE_PHASE_STEP * k as f64).sin());
                let size = BASE_SIZE + AMPLITUDE_SIZE * amplitude + PULSE_SIZE * pulse;
                Primitive {
                    shape: Shape::Ellipse,
                    x: x - size / 2.0,
                    y: frame.height - lift - size,
                    width: size,
                    height: size,
                    fill,
                    corner_radius: 0.0,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorTheme, SignalGenerator};

    fn frame(time: f64) -> FrameContext {
        FrameContext {
            width: 800.0,
            height: 600.0,
            time,
            theme: ColorTheme::new(10, 20, 30),
        }
    }

    #[test]
    fn dot_sizes_stay_within_pulse_bounds() {
        let mut generator = SignalGenerator::new(128);
        for step in 0..50 {
            let time = step as f64 * 0.137;
            let buffer = generator.next(time, 1.0);
            let dots = Dots::default().render(&buffer, &frame(time)).unwrap();

            assert_eq!(dots.len(), 80);
            for dot in &dots {
                assert!(dot.width >= 3.0 && dot.width <= 17.0, "size {}", dot.width);
                assert_eq!(dot.width, dot.height);
                assert_eq!(dot.shape, Shape::Ellipse);
            }
        }
    }

    #[test]
    fn centres_dots_horizontally_and_lifts_from_the_bottom() {
        let buffer = AmplitudeBuffer::from_samples(vec![0.5; 128]);
        // sin(0) = 0 so the first dot has a half pulse.
        let dots = Dots::default().render(&buffer, &frame(0.0)).unwrap();

        let first = &dots[0];
        let size = 3.0 + 5.0 + 2.0;
        assert!((first.width - size).abs() < 1e-9);
        assert!((first.x + size / 2.0).abs() < 1e-9);
        let bottom_offset = 600.0 - (first.y + first.height);
        assert!((bottom_offset - (20.0 + 0.5 * 600.0 * 0.6)).abs() < 1e-9);
        assert_eq!(first.fill, ColorTheme::new(10, 20, 30).with_alpha(200));
    }

    #[test]
    fn pulse_moves_with_time_only() {
        let buffer = AmplitudeBuffer::from_samples(vec![0.0; 16]);
        let a = Dots::default().render(&buffer, &frame(0.0)).unwrap();
        let b = Dots::default().render(&buffer, &frame(0.7)).unwrap();
        let c = Dots::default().render(&buffer, &frame(0.0)).unwrap();

        assert_ne!(a, b);
        assert_eq!(a, c);
    }
}
