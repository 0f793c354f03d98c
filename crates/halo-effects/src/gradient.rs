use halo_core::{GradientConfig, Point, Rgba};

/// Positions of the first grid row. They never move.
pub const PINNED_ROW: [Point; 3] = [Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 0.0)];

/// One node of the mesh gradient, in normalized `[0, 1]` surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint {
    pub position: Point,
    pub color: Rgba,
}

/// A 3×3 row-major grid of control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshGrid {
    pub points: [ControlPoint; 9],
}

impl MeshGrid {
    pub const WIDTH: usize = 3;
    pub const HEIGHT: usize = 3;

    pub fn get(&self, row: usize, col: usize) -> &ControlPoint {
        &self.points[row * Self::WIDTH + col]
    }

    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.position.is_finite() && p.color.is_finite())
    }
}

/// Produces the gradient control grid for a given clock value.
///
/// Pure: the same `t` always yields the same grid.
#[derive(Debug, Clone)]
pub struct GradientField {
    config: GradientConfig,
}

impl GradientField {
    pub fn new(config: GradientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GradientConfig {
        &self.config
    }

    pub fn generate(&self, t: f32) -> MeshGrid {
        let palette = self.config.palette.0;
        let points = std::array::from_fn(|i| {
            let position = match i {
                0..=2 => PINNED_ROW[i],
                _ => self.config.interior[i - 3].value_at(t),
            };
            ControlPoint { position, color: palette[i] }
        });
        MeshGrid { points }
    }
}

impl Default for GradientField {
    fn default() -> Self {
        Self::new(GradientConfig::default())
    }
}
