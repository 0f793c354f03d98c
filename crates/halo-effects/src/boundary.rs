use halo_core::outline::JOIN_TOLERANCE;
use halo_core::shape::Line;
use halo_core::{BoundaryConfig, CircleArc, CornerStyle, GeometryError, Outline, Point, Shape};
use std::f32::consts::{FRAC_PI_2, PI};

/// Number of base vertices, four per side.
pub const VERTEX_COUNT: usize = 16;

/// Samples used to estimate the length of a deformed arc.
const ARC_LENGTH_SAMPLES: usize = 32;

/// Smooth wobble applied to every outline point.
///
/// `x' = x + A sin(t + y k)`, `y' = y + A sin(t + x k)`. While `A * k`
/// stays under [`halo_core::MAX_FOLD`] the map is injective, so a simple
/// input path stays simple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplacementField {
    pub amplitude: f32,
    pub coupling: f32,
    pub t: f32,
}

impl DisplacementField {
    pub fn new(amplitude: f32, coupling: f32, t: f32) -> Self {
        Self { amplitude, coupling, t }
    }

    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            p.x + self.amplitude * (self.t + p.y * self.coupling).sin(),
            p.y + self.amplitude * (self.t + p.x * self.coupling).sin(),
        )
    }
}

/// A quarter circle whose samples are pushed through a [`DisplacementField`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpedArc {
    pub arc: CircleArc,
    pub field: DisplacementField,
}

impl WarpedArc {
    pub fn new(arc: CircleArc, field: DisplacementField) -> Self {
        Self { arc, field }
    }
}

impl Shape for WarpedArc {
    fn point_at(&self, u: f32) -> Point {
        self.field.apply(self.arc.point_at(u))
    }

    fn length(&self) -> f32 {
        sampled_length(self)
    }

    fn boxed_clone(&self) -> Box<dyn Shape> {
        Box::new(*self)
    }

    fn kind(&self) -> &'static str {
        "warped-arc"
    }
}

/// A quarter circle whose ends are pulled onto the neighbouring vertices.
///
/// The offset from each arc end to its vertex is interpolated along the
/// sweep, so the center keeps its own motion while the endpoints follow the
/// wobble of the sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendedArc {
    pub arc: CircleArc,
    pub start_offset: Point,
    pub end_offset: Point,
}

impl BlendedArc {
    /// Arc running from `from` to `to` with the curvature of `arc`.
    pub fn between(arc: CircleArc, from: Point, to: Point) -> Self {
        Self { arc, start_offset: from - arc.start(), end_offset: to - arc.end() }
    }
}

impl Shape for BlendedArc {
    fn point_at(&self, u: f32) -> Point {
        self.arc.point_at(u) + self.start_offset.lerp(self.end_offset, u)
    }

    fn length(&self) -> f32 {
        sampled_length(self)
    }

    fn boxed_clone(&self) -> Box<dyn Shape> {
        Box::new(*self)
    }

    fn kind(&self) -> &'static str {
        "blended-arc"
    }
}

fn sampled_length(shape: &dyn Shape) -> f32 {
    let points: Vec<Point> = (0..=ARC_LENGTH_SAMPLES)
        .map(|i| shape.point_at(i as f32 / ARC_LENGTH_SAMPLES as f32))
        .collect();
    points.windows(2).map(|pair| pair[0].distance(pair[1])).sum()
}

/// Surface geometry for one boundary frame, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryParams {
    pub width: f32,
    pub height: f32,
    /// Inset of the outline from the surface edge.
    pub padding: f32,
    pub corner_radius: f32,
    /// Scale about the surface center, applied before the wobble.
    pub scale: f32,
}

impl BoundaryParams {
    pub fn new(width: f32, height: f32, padding: f32, corner_radius: f32) -> Self {
        Self { width, height, padding, corner_radius, scale: 1.0 }
    }

    pub fn with_scale(self, scale: f32) -> Self {
        Self { scale, ..self }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    fn validate(&self) -> Result<(), GeometryError> {
        let checks = [
            ("width", self.width, self.width > 0.0),
            ("height", self.height, self.height > 0.0),
            ("padding", self.padding, self.padding >= 0.0),
            ("corner_radius", self.corner_radius, self.corner_radius >= 0.0),
            ("scale", self.scale, self.scale > 0.0),
        ];
        for (name, value, ok) in checks {
            if !value.is_finite() || !ok {
                return Err(GeometryError::InvalidParameter { name, value });
            }
        }
        let min = 2.0 * (self.padding + self.corner_radius);
        if self.width <= min || self.height <= min {
            return Err(GeometryError::SurfaceTooSmall { width: self.width, height: self.height, min });
        }
        Ok(())
    }
}

/// How one corner connects the last vertex of a side to the first of the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerJoin {
    Chord,
    /// Undeformed quarter arc, blended at its ends onto the vertices.
    Arc { center: Point, radius: f32, start_angle: f32 },
    /// Quarter arc deformed by the same field as the vertices.
    Warped { center: Point, radius: f32, start_angle: f32, field: DisplacementField },
}

/// One frame of the wobbling outline.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPath {
    /// Perturbed vertices: top, right, bottom, left; four per side, clockwise.
    pub vertices: [Point; VERTEX_COUNT],
    /// Joins in drawing order: top-left, top-right, bottom-right, bottom-left.
    pub corners: [CornerJoin; 4],
    /// Corner radius after clamping and scaling.
    pub radius: f32,
}

impl BoundaryPath {
    /// The closed chain of shapes, starting at the top-left corner.
    pub fn outline(&self) -> Outline {
        let mut shapes: Vec<Box<dyn Shape>> = Vec::with_capacity(VERTEX_COUNT + 12);
        let mut cursor = self.vertices[VERTEX_COUNT - 1];

        for (side, corner) in self.corners.iter().enumerate() {
            let first = self.vertices[side * 4];
            match *corner {
                CornerJoin::Chord => push_line(&mut shapes, cursor, first),
                CornerJoin::Arc { center, radius, start_angle } => {
                    let arc = CircleArc::new(center, radius, start_angle, FRAC_PI_2);
                    shapes.push(Box::new(BlendedArc::between(arc, cursor, first)));
                }
                CornerJoin::Warped { center, radius, start_angle, field } => {
                    let arc = WarpedArc::new(CircleArc::new(center, radius, start_angle, FRAC_PI_2), field);
                    push_line(&mut shapes, cursor, arc.start());
                    let arc_end = arc.end();
                    shapes.push(Box::new(arc));
                    push_line(&mut shapes, arc_end, first);
                }
            }
            for i in side * 4..side * 4 + 3 {
                push_line(&mut shapes, self.vertices[i], self.vertices[i + 1]);
            }
            cursor = self.vertices[side * 4 + 3];
        }
        Outline::new(shapes)
    }

    /// Closed polyline with segments no longer than `max_segment`.
    pub fn flatten(&self, max_segment: f32) -> Vec<Point> {
        self.outline().flatten(max_segment)
    }
}

/// Connectors shorter than the join tolerance are dropped so the chain never
/// contains degenerate pieces.
fn push_line(shapes: &mut Vec<Box<dyn Shape>>, from: Point, to: Point) {
    if from.distance(to) > JOIN_TOLERANCE {
        shapes.push(Box::new(Line::new(from, to)));
    }
}

/// Builds the wobbling rounded rectangle for a clock value.
#[derive(Debug, Clone)]
pub struct BoundaryGenerator {
    config: BoundaryConfig,
}

impl BoundaryGenerator {
    pub fn new(config: BoundaryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BoundaryConfig {
        &self.config
    }

    /// Vertex wobble at `t`. The amplitude is held under the fold limit even
    /// when the config was built without validation.
    pub fn field(&self, t: f32) -> DisplacementField {
        DisplacementField::new(self.config.effective_amplitude(), self.config.coupling, t)
    }

    pub fn generate(&self, params: &BoundaryParams, t: f32) -> Result<BoundaryPath, GeometryError> {
        params.validate()?;
        for (name, value) in [
            ("t", t),
            ("amplitude", self.config.amplitude),
            ("coupling", self.config.coupling),
        ] {
            if !value.is_finite() {
                return Err(GeometryError::InvalidParameter { name, value });
            }
        }

        let p = params.padding;
        let (x0, y0) = (p, p);
        let (x1, y1) = (params.width - p, params.height - p);
        let (iw, ih) = (x1 - x0, y1 - y0);
        let r = params.corner_radius.min(iw / 4.0).min(ih / 4.0);

        let base: [Point; VERTEX_COUNT] = [
            // top, left to right
            Point::new(x0 + r, y0),
            Point::new(x0 + 0.25 * iw, y0),
            Point::new(x0 + 0.75 * iw, y0),
            Point::new(x1 - r, y0),
            // right, top to bottom
            Point::new(x1, y0 + r),
            Point::new(x1, y0 + 0.25 * ih),
            Point::new(x1, y0 + 0.75 * ih),
            Point::new(x1, y1 - r),
            // bottom, right to left
            Point::new(x1 - r, y1),
            Point::new(x0 + 0.75 * iw, y1),
            Point::new(x0 + 0.25 * iw, y1),
            Point::new(x0 + r, y1),
            // left, bottom to top
            Point::new(x0, y1 - r),
            Point::new(x0, y0 + 0.75 * ih),
            Point::new(x0, y0 + 0.25 * ih),
            Point::new(x0, y0 + r),
        ];
        let centers = [
            (Point::new(x0 + r, y0 + r), PI),
            (Point::new(x1 - r, y0 + r), 3.0 * FRAC_PI_2),
            (Point::new(x1 - r, y1 - r), 0.0),
            (Point::new(x0 + r, y1 - r), FRAC_PI_2),
        ];

        let origin = params.center();
        let s = params.scale;
        let field = self.field(t);
        let vertices = base.map(|v| field.apply(v.scaled_about(origin, s)));
        let radius = r * s;

        let corners = centers.map(|(c, start_angle)| {
            let center = c.scaled_about(origin, s);
            match self.config.corner_style {
                CornerStyle::Chord => CornerJoin::Chord,
                CornerStyle::StaticArc => CornerJoin::Arc { center, radius, start_angle },
                CornerStyle::DriftingArc => {
                    let drift = DisplacementField::new(self.config.drift_amplitude, self.config.drift_coupling, t);
                    CornerJoin::Arc { center: drift.apply(center), radius, start_angle }
                }
                CornerStyle::WarpedArc => CornerJoin::Warped { center, radius, start_angle, field },
            }
        });

        if vertices.iter().any(|v| !v.is_finite()) {
            log::warn!("boundary produced non-finite vertices at t={t}");
            return Err(GeometryError::InvalidParameter { name: "t", value: t });
        }

        Ok(BoundaryPath { vertices, corners, radius })
    }
}

impl Default for BoundaryGenerator {
    fn default() -> Self {
        Self::new(BoundaryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still() -> BoundaryGenerator {
        BoundaryGenerator::new(BoundaryConfig { amplitude: 0.0, ..BoundaryConfig::default() })
    }

    #[test]
    fn test_unperturbed_vertices_on_inner_rect() {
        let path = still().generate(&BoundaryParams::new(300.0, 300.0, 16.0, 48.0), 0.0).unwrap();
        assert!((path.radius - 48.0).abs() < 1e-5);
        assert!(path.vertices[0].approx_eq(&Point::new(64.0, 16.0)));
        assert!(path.vertices[4].approx_eq(&Point::new(284.0, 64.0)));
        assert!(path.vertices[9].approx_eq(&Point::new(16.0 + 0.75 * 268.0, 284.0)));
        assert!(path.vertices[15].approx_eq(&Point::new(16.0, 64.0)));
    }

    #[test]
    fn test_short_side_clamps_radius() {
        // inner 268x168: r = 168 / 4
        let path = still().generate(&BoundaryParams::new(300.0, 200.0, 16.0, 48.0), 0.0).unwrap();
        assert!((path.radius - 42.0).abs() < 1e-5);
        assert!(path.vertices[0].approx_eq(&Point::new(58.0, 16.0)));
        assert!(path.vertices[4].approx_eq(&Point::new(284.0, 58.0)));
        assert!(path.vertices[9].approx_eq(&Point::new(16.0 + 0.75 * 268.0, 184.0)));
        assert!(path.vertices[15].approx_eq(&Point::new(16.0, 58.0)));
    }

    #[test]
    fn test_warped_arc_meets_vertices() {
        let generator = BoundaryGenerator::default();
        let path = generator.generate(&BoundaryParams::new(300.0, 300.0, 16.0, 48.0), 4.2).unwrap();
        let outline = path.outline();
        assert!(outline.is_closed());
        // Warped arcs join the vertices directly.
        assert_eq!(outline.shapes.len(), 16);
    }

    #[test]
    fn test_blended_arcs_meet_vertices() {
        let params = BoundaryParams::new(300.0, 300.0, 16.0, 48.0);
        for corner_style in [CornerStyle::StaticArc, CornerStyle::DriftingArc] {
            let generator = BoundaryGenerator::new(BoundaryConfig { corner_style, ..BoundaryConfig::default() });
            let path = generator.generate(&params, 2.7).unwrap();
            let outline = path.outline();
            assert!(outline.is_closed(), "{corner_style:?}");
            // one arc per corner, three lines per side, no connectors
            assert_eq!(outline.shapes.len(), 16, "{corner_style:?}");
            for side in 0..4 {
                let arc = &outline.shapes[side * 4];
                assert_eq!(arc.kind(), "blended-arc");
                assert!(arc.start().distance(path.vertices[(side * 4 + 15) % 16]) < 1e-3);
                assert!(arc.end().distance(path.vertices[side * 4]) < 1e-3);
            }
        }
    }

    #[test]
    fn test_blended_arc_keeps_curvature_without_offsets() {
        let arc = CircleArc::new(Point::new(64.0, 64.0), 48.0, PI, FRAC_PI_2);
        let blended = BlendedArc::between(arc, arc.start(), arc.end());
        assert!(blended.point_at(0.5).approx_eq(&arc.point_at(0.5)));
        assert!((blended.length() - arc.length()).abs() < 0.1);
    }

    #[test]
    fn test_field_amplitude_held_under_fold_limit() {
        let generator = BoundaryGenerator::new(BoundaryConfig { coupling: 0.2, ..BoundaryConfig::default() });
        let field = generator.field(0.0);
        assert!((field.amplitude * field.coupling - halo_core::MAX_FOLD).abs() < 1e-5);
        assert_eq!(BoundaryGenerator::default().field(0.0).amplitude, 10.0);
    }

    #[test]
    fn test_chord_corners() {
        let generator = BoundaryGenerator::new(BoundaryConfig {
            corner_style: CornerStyle::Chord,
            ..BoundaryConfig::default()
        });
        let path = generator.generate(&BoundaryParams::new(300.0, 300.0, 16.0, 48.0), 1.0).unwrap();
        let outline = path.outline();
        assert!(outline.is_closed());
        assert!(outline.shapes.iter().all(|s| s.kind() == "line"));
    }

    #[test]
    fn test_radius_clamped_to_quarter_side() {
        let path = still().generate(&BoundaryParams::new(120.0, 300.0, 0.0, 50.0), 0.0).unwrap();
        assert!((path.radius - 30.0).abs() < 1e-5);
    }

    #[test]
    fn test_scale_about_center() {
        let params = BoundaryParams::new(200.0, 200.0, 0.0, 20.0).with_scale(2.0);
        let path = still().generate(&params, 0.0).unwrap();
        // (20, 0) scaled by 2 about (100, 100)
        assert!(path.vertices[0].approx_eq(&Point::new(-60.0, -100.0)));
        assert!((path.radius - 40.0).abs() < 1e-5);
    }

    #[test]
    fn test_too_small_surface() {
        let err = still().generate(&BoundaryParams::new(100.0, 300.0, 16.0, 34.0), 0.0).unwrap_err();
        assert_eq!(err, GeometryError::SurfaceTooSmall { width: 100.0, height: 300.0, min: 100.0 });
    }

    #[test]
    fn test_rejects_nan() {
        let err = still().generate(&BoundaryParams::new(f32::NAN, 300.0, 16.0, 48.0), 0.0).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidParameter { name: "width", .. }));
        let err = still().generate(&BoundaryParams::new(300.0, 300.0, 16.0, 48.0), f32::INFINITY).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidParameter { name: "t", .. }));
    }

    #[test]
    fn test_field_bounded_by_amplitude() {
        let field = DisplacementField::new(10.0, 0.05, 3.0);
        let p = Point::new(123.0, 45.0);
        let q = field.apply(p);
        assert!((q.x - p.x).abs() <= 10.0 && (q.y - p.y).abs() <= 10.0);
    }
}
