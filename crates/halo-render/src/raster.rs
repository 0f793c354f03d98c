use halo_core::Point;

/// Signed doubled area of `(a, b, p)`.
fn edge(a: Point, b: Point, p: Point) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Visit every pixel whose center lies inside `tri`, with its barycentric
/// weights. Winding does not matter; degenerate triangles are skipped.
pub fn fill_triangle<F>(width: u32, height: u32, tri: [Point; 3], mut shade: F)
where
    F: FnMut(u32, u32, [f32; 3]),
{
    let [a, b, c] = tri;
    let area = edge(a, b, c);
    if !area.is_finite() || area.abs() < 1e-8 {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0);
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0);
    let max_x = a.x.max(b.x).max(c.x).ceil().min(width as f32);
    let max_y = a.y.max(b.y).max(c.y).ceil().min(height as f32);
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    for y in min_y as u32..max_y as u32 {
        for x in min_x as u32..max_x as u32 {
            let p = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, p) / area;
            let w1 = edge(c, a, p) / area;
            let w2 = edge(a, b, p) / area;
            if w0 >= -1e-6 && w1 >= -1e-6 && w2 >= -1e-6 {
                shade(x, y, [w0, w1, w2]);
            }
        }
    }
}
