use crate::raster::fill_triangle;
use crate::surface::Surface;
use halo_core::{Point, Rgba};
use halo_effects::MeshGrid;

/// Position and color of one interpolated mesh sample, packed for blending.
type Sample = [f32; 6];

fn pack(position: Point, color: Rgba) -> Sample {
    [position.x, position.y, color.r, color.g, color.b, color.a]
}

fn combine(terms: [(f32, &Sample); 4]) -> Sample {
    let mut out = [0.0; 6];
    for (weight, sample) in terms {
        for (o, v) in out.iter_mut().zip(sample.iter()) {
            *o += weight * v;
        }
    }
    out
}

fn sub(a: &Sample, b: &Sample, scale: f32) -> Sample {
    std::array::from_fn(|i| (a[i] - b[i]) * scale)
}

/// Cubic Hermite through three samples with Catmull-Rom tangents, one-sided
/// at the ends. `s` runs over `[0, 2]`.
fn hermite3(nodes: &[Sample; 3], s: f32) -> Sample {
    let tangents = [
        sub(&nodes[1], &nodes[0], 1.0),
        sub(&nodes[2], &nodes[0], 0.5),
        sub(&nodes[2], &nodes[1], 1.0),
    ];
    let seg = (s.floor() as usize).min(1);
    let u = (s - seg as f32).clamp(0.0, 1.0);
    let (u2, u3) = (u * u, u * u * u);
    let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
    let h10 = u3 - 2.0 * u2 + u;
    let h01 = -2.0 * u3 + 3.0 * u2;
    let h11 = u3 - u2;
    combine([
        (h00, &nodes[seg]),
        (h10, &tangents[seg]),
        (h01, &nodes[seg + 1]),
        (h11, &tangents[seg + 1]),
    ])
}

/// Evaluate the smooth mesh surface at grid coordinates `(s, r)` in `[0, 2]²`:
/// first along each row, then down the resulting column.
fn evaluate(rows: &[[Sample; 3]; 3], s: f32, r: f32) -> Sample {
    let column = [hermite3(&rows[0], s), hermite3(&rows[1], s), hermite3(&rows[2], s)];
    hermite3(&column, r)
}

/// Draw the mesh gradient over `target`.
///
/// Each of the four patches is split into `subdivisions²` quads of two
/// Gouraud-shaded triangles. Later triangles overwrite earlier ones where the
/// mesh folds; pixels the mesh does not reach keep their color.
pub fn rasterize_mesh(grid: &MeshGrid, subdivisions: u32, target: &mut Surface) {
    let (width, height) = target.size();
    let rows: [[Sample; 3]; 3] = std::array::from_fn(|r| {
        std::array::from_fn(|c| {
            let cp = grid.get(r, c);
            pack(cp.position, cp.color)
        })
    });

    let n = (2 * subdivisions.max(1)) as usize;
    let step = 2.0 / n as f32;
    let mut lattice = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            let mut v = evaluate(&rows, i as f32 * step, j as f32 * step);
            v[0] *= width as f32;
            v[1] *= height as f32;
            lattice.push(v);
        }
    }

    let at = |i: usize, j: usize| &lattice[j * (n + 1) + i];
    for j in 0..n {
        for i in 0..n {
            let quad = [at(i, j), at(i + 1, j), at(i + 1, j + 1), at(i, j + 1)];
            for tri in [[quad[0], quad[1], quad[2]], [quad[0], quad[2], quad[3]]] {
                let corners = tri.map(|v| Point::new(v[0], v[1]));
                let pixels = target.pixels_mut();
                fill_triangle(width, height, corners, |x, y, w| {
                    let channel = |k: usize| w[0] * tri[0][k] + w[1] * tri[1][k] + w[2] * tri[2][k];
                    let color = Rgba::new(channel(2), channel(3), channel(4), channel(5)).clamped();
                    pixels[y as usize * width as usize + x as usize] = color;
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use halo_effects::{ControlPoint, GradientField};

    fn flat_grid(color: Rgba) -> MeshGrid {
        MeshGrid {
            points: std::array::from_fn(|i| ControlPoint {
                position: Point::new((i % 3) as f32 * 0.5, (i / 3) as f32 * 0.5),
                color,
            }),
        }
    }

    #[test]
    fn test_hermite_passes_through_nodes() {
        let nodes = [[0.0; 6], [1.0, 2.0, 0.0, 0.0, 0.0, 0.0], [4.0; 6]];
        for (s, node) in [(0.0, &nodes[0]), (1.0, &nodes[1]), (2.0, &nodes[2])] {
            let v = hermite3(&nodes, s);
            assert!((v[0] - node[0]).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uniform_grid_covers_surface() {
        let mut surface = Surface::new(32, 32).unwrap();
        rasterize_mesh(&flat_grid(Rgba::BLUE), 4, &mut surface);
        for p in surface.pixels() {
            assert!((p.b - 1.0).abs() < 1e-4 && (p.a - 1.0).abs() < 1e-4, "uncovered pixel {p:?}");
        }
    }

    #[test]
    fn test_default_gradient_is_finite() {
        let grid = GradientField::default().generate(7.0);
        let mut surface = Surface::filled(64, 96, Rgba::BLACK).unwrap();
        rasterize_mesh(&grid, 6, &mut surface);
        assert!(surface.is_finite());
        assert!(surface.pixels().iter().any(|p| *p != Rgba::BLACK));
    }
}
