use crate::blur::blur;
use crate::error::RenderError;
use crate::raster::fill_triangle;
use halo_core::Point;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers};

/// Single-channel coverage in `[0, 1]`, same layout as a [`crate::Surface`].
#[derive(Debug, Clone)]
pub struct Mask {
    width: u32,
    height: u32,
    coverage: Vec<f32>,
    scratch: Vec<f32>,
}

impl Mask {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            coverage: vec![0.0; width as usize * height as usize],
            scratch: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn coverage(&self) -> &[f32] {
        &self.coverage
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.coverage[y as usize * self.width as usize + x as usize]
    }

    pub fn clear(&mut self) {
        self.coverage.fill(0.0);
    }

    /// Fill the closed polygon `points` (non-zero rule) on top of the current
    /// coverage. Fewer than three points draw nothing.
    pub fn fill_polygon(&mut self, points: &[Point]) -> Result<(), RenderError> {
        if points.len() < 3 {
            return Ok(());
        }

        let mut builder = Path::builder();
        builder.begin(point(points[0].x, points[0].y));
        for p in &points[1..] {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(true);
        let path = builder.build();

        let mut buffers: VertexBuffers<Point, u32> = VertexBuffers::new();
        let options = FillOptions::tolerance(0.25).with_fill_rule(FillRule::NonZero);
        FillTessellator::new()
            .tessellate_path(
                &path,
                &options,
                &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                    let p = vertex.position();
                    Point::new(p.x, p.y)
                }),
            )
            .map_err(RenderError::Tessellation)?;

        let (w, h) = (self.width, self.height);
        let coverage = &mut self.coverage;
        for tri in buffers.indices.chunks_exact(3) {
            let corners = [
                buffers.vertices[tri[0] as usize],
                buffers.vertices[tri[1] as usize],
                buffers.vertices[tri[2] as usize],
            ];
            fill_triangle(w, h, corners, |x, y, _| {
                coverage[y as usize * w as usize + x as usize] = 1.0;
            });
        }
        Ok(())
    }

    pub fn blur(&mut self, radius: f32) {
        blur(&mut self.coverage, self.width as usize, self.height as usize, radius, &mut self.scratch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(lo: f32, hi: f32) -> Vec<Point> {
        vec![
            Point::new(lo, lo),
            Point::new(hi, lo),
            Point::new(hi, hi),
            Point::new(lo, hi),
            Point::new(lo, lo),
        ]
    }

    #[test]
    fn test_fill_square() {
        let mut mask = Mask::new(20, 20);
        mask.fill_polygon(&square(5.0, 15.0)).unwrap();
        assert_eq!(mask.get(10, 10), 1.0);
        assert_eq!(mask.get(2, 2), 0.0);
        let covered = mask.coverage().iter().filter(|c| **c > 0.0).count();
        assert_eq!(covered, 100);
    }

    #[test]
    fn test_degenerate_draws_nothing() {
        let mut mask = Mask::new(8, 8);
        mask.fill_polygon(&[Point::new(1.0, 1.0), Point::new(5.0, 5.0)]).unwrap();
        assert!(mask.coverage().iter().all(|c| *c == 0.0));
    }

    #[test]
    fn test_blur_softens_edge() {
        let mut mask = Mask::new(40, 40);
        mask.fill_polygon(&square(10.0, 30.0)).unwrap();
        mask.blur(6.0);
        let edge = mask.get(10, 20);
        assert!(edge > 0.2 && edge < 0.8, "edge coverage {edge}");
        assert!(mask.get(20, 20) > 0.95);
    }
}
