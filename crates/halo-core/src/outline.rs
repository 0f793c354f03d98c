use crate::point::Point;
use crate::shape::{total_length, Shape};

/// Maximum gap between consecutive pieces still treated as connected.
pub const JOIN_TOLERANCE: f32 = 1e-3;

/// An ordered chain of shapes forming one boundary.
///
/// Rebuilt every frame; never cached across frames.
pub struct Outline {
    pub shapes: Vec<Box<dyn Shape>>,
    pub total_length: f32,
}

impl Outline {
    pub fn new(shapes: Vec<Box<dyn Shape>>) -> Self {
        let total_length = total_length(&shapes);
        Self { shapes, total_length }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.shapes.first().map(|s| s.start())
    }

    pub fn end(&self) -> Option<Point> {
        self.shapes.last().map(|s| s.end())
    }

    /// Every piece starts where the previous one ended.
    pub fn is_continuous(&self) -> bool {
        self.shapes
            .windows(2)
            .all(|pair| pair[0].end().distance(pair[1].start()) <= JOIN_TOLERANCE)
    }

    /// Continuous and ending where it started.
    pub fn is_closed(&self) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => self.is_continuous() && start.distance(end) <= JOIN_TOLERANCE,
            _ => false,
        }
    }

    /// Polyline through the whole chain. For a closed outline the first and
    /// last points coincide.
    pub fn flatten(&self, max_segment: f32) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.shapes.len() * 4 + 1);
        points.extend(self.start());
        for shape in &self.shapes {
            shape.flatten_into(max_segment, &mut points);
        }
        points
    }

    /// `(min, max)` corners of the flattened outline.
    pub fn bounds(&self, max_segment: f32) -> Option<(Point, Point)> {
        let points = self.flatten(max_segment);
        let first = points.first()?.vec();
        let (lo, hi) = points
            .iter()
            .fold((first, first), |(lo, hi), p| (lo.min(p.vec()), hi.max(p.vec())));
        Some((lo.into(), hi.into()))
    }
}

impl Clone for Outline {
    fn clone(&self) -> Self {
        Self {
            shapes: self.shapes.iter().map(|s| s.boxed_clone()).collect(),
            total_length: self.total_length,
        }
    }
}

impl std::fmt::Debug for Outline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Outline")
            .field("shapes", &self.shapes.iter().map(|s| s.kind()).collect::<Vec<_>>())
            .field("total_length", &self.total_length)
            .finish()
    }
}
