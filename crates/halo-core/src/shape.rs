use crate::point::Point;

/// Upper bound on pieces a single shape flattens into.
const MAX_FLATTEN_STEPS: usize = 4096;

/// A piece of an outline, parameterized over `u` in `[0, 1]`.
///
/// Outlines are chains of these; the rasterizer only ever sees the
/// polyline they flatten into.
pub trait Shape: Send + Sync {
    fn point_at(&self, u: f32) -> Point;

    /// Path length, exact or estimated.
    fn length(&self) -> f32;

    fn boxed_clone(&self) -> Box<dyn Shape>;

    /// Short name for debug output.
    fn kind(&self) -> &'static str;

    fn start(&self) -> Point {
        self.point_at(0.0)
    }

    fn end(&self) -> Point {
        self.point_at(1.0)
    }

    /// Push the points after `start()` so that no emitted segment is longer
    /// than `max_segment`.
    fn flatten_into(&self, max_segment: f32, out: &mut Vec<Point>) {
        let steps = segment_count(self.length(), max_segment);
        out.extend((1..=steps).map(|i| self.point_at(i as f32 / steps as f32)));
    }
}

/// Pieces needed to keep each one under `max_segment`.
pub fn segment_count(length: f32, max_segment: f32) -> usize {
    if !(length.is_finite() && max_segment > 0.0) {
        return 1;
    }
    ((length / max_segment).ceil() as usize).clamp(1, MAX_FLATTEN_STEPS)
}

pub fn total_length(shapes: &[Box<dyn Shape>]) -> f32 {
    shapes.iter().map(|s| s.length()).sum()
}

/// Straight segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

impl Line {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }
}

impl Shape for Line {
    fn point_at(&self, u: f32) -> Point {
        self.from.lerp(self.to, u)
    }

    fn length(&self) -> f32 {
        self.from.distance(self.to)
    }

    fn boxed_clone(&self) -> Box<dyn Shape> {
        Box::new(*self)
    }

    fn kind(&self) -> &'static str {
        "line"
    }

    fn flatten_into(&self, _max_segment: f32, out: &mut Vec<Point>) {
        out.push(self.to);
    }
}

/// Circular arc. Angles are radians in y-down space, so a positive sweep
/// turns clockwise on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleArc {
    pub center: Point,
    pub radius: f32,
    pub start_angle: f32,
    pub sweep: f32,
}

impl CircleArc {
    pub fn new(center: Point, radius: f32, start_angle: f32, sweep: f32) -> Self {
        Self { center, radius, start_angle, sweep }
    }
}

impl Shape for CircleArc {
    fn point_at(&self, u: f32) -> Point {
        let (sin, cos) = (self.start_angle + self.sweep * u).sin_cos();
        Point::new(self.center.x + self.radius * cos, self.center.y + self.radius * sin)
    }

    fn length(&self) -> f32 {
        (self.radius * self.sweep).abs()
    }

    fn boxed_clone(&self) -> Box<dyn Shape> {
        Box::new(*self)
    }

    fn kind(&self) -> &'static str {
        "arc"
    }
}
