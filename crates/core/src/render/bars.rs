use super::{ensure_renderable, spread_index, FrameContext, Primitive, RenderStrategy, Shape};
use crate::{AmplitudeBuffer, TickError, VisualStyle};

const ALPHA: u8 = 180;
const HEIGHT_SCALE: f64 = 0.7;
const MIN_HEIGHT: f64 = 3.0;
const FILL_RATIO: f64 = 0.7;
const BOTTOM_MARGIN: f64 = 10.0;
const CORNER_RADIUS: f64 = 2.0;

/// Vertical bars rising from the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bars {
    pub count: usize,
}

impl Default for Bars {
    fn default() -> Self {
        Self { count: 32 }
    }
}

impl RenderStrategy for Bars {
    fn style(&self) -> VisualStyle {
        VisualStyle::Bars
    }

    fn render(
        &self,
        buffer: &AmplitudeBuffer,
        frame: &FrameContext,
    ) -> Result<Vec<Primitive>, TickError> {
        ensure_renderable(buffer, self.count, self.style())?;

        let slot = frame.width / self.count as f64;
        let max_height = frame.height * HEIGHT_SCALE;
        let fill = frame.theme.with_alpha(ALPHA);

        Ok((0..self.count)
            .map(|j| {
                let amplitude = buffer.magnitude_at(spread_index(j, self.count, buffer.len()));
                let height = (amplitude * max_height).max(MIN_HEIGHT);
                Primitive {
                    shape: Shape::Rectangle,
                    x: j as f64 * slot + slot * (1.0 - FILL_RATIO) / 2.0,
                    y: frame.height - BOTTOM_MARGIN - height,
                    width: slot * FILL_RATIO,
                    height,
                    fill,
                    corner_radius: CORNER_RADIUS,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ColorTheme, SignalGenerator};

    fn frame(width: f64, height: f64) -> FrameContext {
        FrameContext {
            width,
            height,
            time: 0.0,
            theme: ColorTheme::default(),
        }
    }

    #[test]
    fn emits_one_bar_per_slot_within_height_bounds() {
        let frame = frame(640.0, 480.0);
        for len in [1, 7, 31, 128, 1000] {
            let buffer = SignalGenerator::new(len).next(1.3, 1.0);
            let bars = Bars::default().render(&buffer, &frame).unwrap();

            assert_eq!(bars.len(), 32, "buffer length {len}");
            for bar in &bars {
                assert!(bar.height >= 3.0);
                assert!(bar.height <= 0.7 * frame.height);
                assert_eq!(bar.shape, Shape::Rectangle);
            }
        }
    }

    #[test]
    fn anchors_bars_to_the_bottom_margin() {
        let buffer = AmplitudeBuffer::from_samples(vec![0.5; 32]);
        let bars = Bars::default().render(&buffer, &frame(320.0, 200.0)).unwrap();

        let first = &bars[0];
        assert!((first.height - 70.0).abs() < 1e-9);
        assert!((first.y + first.height - 190.0).abs() < 1e-9);
        assert!((first.x - 1.5).abs() < 1e-9);
        assert!((first.width - 7.0).abs() < 1e-9);
        assert!((bars[1].x - 11.5).abs() < 1e-9);
        assert_eq!(first.fill.a, 180);
        assert_eq!(first.corner_radius, 2.0);
    }

    #[test]
    fn silent_samples_keep_the_minimum_height() {
        let buffer = AmplitudeBuffer::from_samples(vec![0.0; 128]);
        let bars = Bars::default().render(&buffer, &frame(320.0, 200.0)).unwrap();
        assert!(bars.iter().all(|bar| bar.height == 3.0));
    }

    #[test]
    fn rejects_empty_layouts() {
        let buffer = AmplitudeBuffer::from_samples(vec![0.1; 8]);
        let err = Bars { count: 0 }.render(&buffer, &frame(100.0, 100.0)).unwrap_err();
        assert_eq!(
            err,
            TickError::EmptyLayout {
                style: VisualStyle::Bars
            }
        );
    }
}
