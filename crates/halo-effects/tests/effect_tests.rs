use halo_core::{BoundaryConfig, CornerStyle, GeometryError, Point, RippleConfig, RippleTrigger};
use halo_effects::{BoundaryGenerator, BoundaryParams, GradientField, RipplePlayer};

// ── Helpers ──────────────────────────────────────────────────────

fn random_times(seed: u64, n: usize) -> Vec<f32> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..n).map(|_| rng.f32() * 1000.0).collect()
}

fn orient(a: Point, b: Point, c: Point) -> f32 {
    (b - a).cross(&(c - a))
}

/// Proper crossing of two segments; touching and collinear overlap do not count.
fn segments_cross(a: Point, b: Point, c: Point, d: Point) -> bool {
    let d1 = orient(c, d, a);
    let d2 = orient(c, d, b);
    let d3 = orient(a, b, c);
    let d4 = orient(a, b, d);
    ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
}

/// Index pair of the first two non-adjacent crossing segments of a closed polyline.
fn first_crossing(points: &[Point]) -> Option<(usize, usize)> {
    let n = points.len() - 1;
    for i in 0..n {
        for j in i + 2..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            if segments_cross(points[i], points[i + 1], points[j], points[j + 1]) {
                return Some((i, j));
            }
        }
    }
    None
}

fn phone_params() -> BoundaryParams {
    BoundaryParams::new(300.0, 300.0, 16.0, 48.0)
}

// ── 1. Gradient grid ─────────────────────────────────────────────

#[test]
fn gradient_has_nine_points() {
    let grid = GradientField::default().generate(0.0);
    assert_eq!(grid.points.len(), 9);
}

#[test]
fn gradient_first_row_is_time_invariant() {
    let field = GradientField::default();
    let reference = field.generate(0.0);
    for t in random_times(11, 200) {
        let grid = field.generate(t);
        assert!(grid.is_finite());
        for i in 0..3 {
            assert_eq!(grid.points[i], reference.points[i], "index {i} moved at t={t}");
        }
    }
}

#[test]
fn gradient_interior_stays_in_range() {
    let field = GradientField::default();
    for t in random_times(12, 500) {
        let grid = field.generate(t);
        for (i, osc) in field.config().interior.iter().enumerate() {
            let p = grid.points[i + 3].position;
            assert!(p.x >= osc.x.lo && p.x <= osc.x.hi, "x of {} = {} at t={t}", i + 3, p.x);
            assert!(p.y >= osc.y.lo && p.y <= osc.y.hi, "y of {} = {} at t={t}", i + 3, p.y);
        }
    }
}

// ── 2. Boundary shape ────────────────────────────────────────────

const CORNER_STYLES: [CornerStyle; 4] =
    [CornerStyle::Chord, CornerStyle::StaticArc, CornerStyle::DriftingArc, CornerStyle::WarpedArc];

fn styled(corner_style: CornerStyle, coupling: f32) -> BoundaryGenerator {
    BoundaryGenerator::new(BoundaryConfig { corner_style, coupling, ..BoundaryConfig::default() })
}

#[test]
fn boundary_closed_for_every_style() {
    for style in CORNER_STYLES {
        let generator = styled(style, 0.05);
        for t in random_times(21, 100) {
            let path = generator.generate(&phone_params(), t).unwrap();
            let outline = path.outline();
            assert!(outline.is_closed(), "{style:?} open at t={t}");
            let points = outline.flatten(2.0);
            assert!(points.iter().all(|p| p.is_finite()));
            assert!(points[0].distance(points[points.len() - 1]) < 1e-3);
        }
    }
}

#[test]
fn boundary_is_simple_at_random_times() {
    for style in CORNER_STYLES {
        let generator = styled(style, 0.05);
        for t in random_times(42, 60) {
            let points = generator.generate(&phone_params(), t).unwrap().flatten(2.0);
            assert_eq!(first_crossing(&points), None, "{style:?} self-intersection at t={t}");
        }
    }
}

#[test]
fn boundary_is_simple_on_tall_surface() {
    let params = BoundaryParams::new(390.0, 844.0, 24.0, 48.0);
    for style in CORNER_STYLES {
        let generator = styled(style, 0.05);
        for t in random_times(43, 20) {
            let points = generator.generate(&params, t).unwrap().flatten(4.0);
            assert_eq!(first_crossing(&points), None, "{style:?} self-intersection at t={t}");
        }
    }
}

#[test]
fn strong_coupling_is_held_under_fold_limit() {
    // amplitude 10 * coupling 0.2 would fold; the generator scales it back.
    for style in CORNER_STYLES {
        let generator = styled(style, 0.2);
        for t in random_times(45, 40) {
            let points = generator.generate(&phone_params(), t).unwrap().flatten(2.0);
            assert_eq!(first_crossing(&points), None, "{style:?} self-intersection at t={t}");
        }
    }
}

#[test]
fn boundary_stays_near_inner_rect() {
    let generator = BoundaryGenerator::default();
    for t in random_times(44, 100) {
        let outline = generator.generate(&phone_params(), t).unwrap().outline();
        let (lo, hi) = outline.bounds(2.0).unwrap();
        assert!(lo.x >= 16.0 - 10.0 - 1e-3 && lo.y >= 16.0 - 10.0 - 1e-3);
        assert!(hi.x <= 284.0 + 10.0 + 1e-3 && hi.y <= 284.0 + 10.0 + 1e-3);
    }
}

#[test]
fn boundary_scale_grows_outline() {
    let generator = BoundaryGenerator::default();
    let normal = generator.generate(&phone_params(), 1.0).unwrap().outline();
    let grown = generator.generate(&phone_params().with_scale(1.15), 1.0).unwrap().outline();
    assert!(grown.total_length > normal.total_length);
}

#[test]
fn boundary_rejects_degenerate_surfaces() {
    let generator = BoundaryGenerator::default();
    let cases = [
        BoundaryParams::new(128.0, 300.0, 16.0, 48.0),
        BoundaryParams::new(300.0, 100.0, 16.0, 48.0),
        BoundaryParams::new(0.0, 0.0, 0.0, 0.0),
    ];
    for params in cases {
        assert!(generator.generate(&params, 0.0).is_err(), "{params:?} accepted");
    }
    let err = generator.generate(&BoundaryParams::new(300.0, 300.0, -1.0, 48.0), 0.0).unwrap_err();
    assert!(matches!(err, GeometryError::InvalidParameter { name: "padding", .. }));
}

// ── 3. Ripple ────────────────────────────────────────────────────

#[test]
fn ripple_counter_consumed_once() {
    let mut player = RipplePlayer::new(RippleConfig::default());
    let mut trigger = RippleTrigger::default();
    trigger.fire(Point::new(120.0, 300.0));

    let mut starts = Vec::new();
    for frame in 0..30 {
        if let Some(r) = player.update(&trigger, frame as f32 * 0.016) {
            starts.push(r.start_time);
        }
    }
    starts.dedup();
    assert_eq!(starts, vec![0.0]);
}
