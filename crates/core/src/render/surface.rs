use super::Primitive;

/// External sink that paints primitive sets.
pub trait DrawingSurface {
    fn width(&self) -> f64;

    fn height(&self) -> f64;

    /// Swaps the whole primitive set in one step. Implementations must never
    /// expose a mix of the old and new sets.
    fn replace_primitives(&mut self, primitives: Vec<Primitive>);
}

/// In-memory surface that keeps the last installed primitive set.
#[derive(Debug, Clone, Default)]
pub struct Canvas {
    width: f64,
    height: f64,
    primitives: Vec<Primitive>,
    generation: u64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Number of replacements performed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl DrawingSurface for Canvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn replace_primitives(&mut self, primitives: Vec<Primitive>) {
        self.primitives = primitives;
        self.generation += 1;
    }
}
