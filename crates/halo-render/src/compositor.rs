use crate::blur::blur;
use crate::error::RenderError;
use crate::mask::Mask;
use crate::mesh::rasterize_mesh;
use crate::surface::Surface;
use halo_core::{CompositeConfig, EffectConfig, FrameInputs, GeometryError, Point, Rgba, RippleTrigger};
use halo_effects::{BoundaryGenerator, BoundaryParams, GradientField, Ripple, RipplePlayer};

/// Draws frames from controller snapshots.
///
/// Layers, bottom to top: background, blurred mesh gradient scaled by the
/// container opacity, foreground color revealed through the blurred outline
/// mask. An active ripple then resamples the whole frame.
pub struct Compositor {
    composite: CompositeConfig,
    gradient_blur: f32,
    corner_radius: f32,
    gradient: GradientField,
    boundary: BoundaryGenerator,
    ripple: RipplePlayer,
    gradient_layer: Option<Surface>,
    mask: Mask,
    blur_scratch: Vec<Rgba>,
    last_geometry_error: Option<GeometryError>,
    frame_count: u64,
}

impl Compositor {
    /// A fresh compositor has played no taps, so a trigger counter that is
    /// already non-zero ripples on the first frame. Call
    /// [`Compositor::sync_ripple`] when attaching to a running controller.
    pub fn new(config: &EffectConfig) -> Self {
        Self {
            composite: config.composite,
            gradient_blur: config.gradient.blur_radius,
            corner_radius: config.boundary.corner_radius,
            gradient: GradientField::new(config.gradient),
            boundary: BoundaryGenerator::new(config.boundary),
            ripple: RipplePlayer::new(config.ripple),
            gradient_layer: None,
            mask: Mask::new(0, 0),
            blur_scratch: Vec::new(),
            last_geometry_error: None,
            frame_count: 0,
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Ripple counter the compositor has already played.
    pub fn ripple_consumed(&self) -> u64 {
        self.ripple.consumed()
    }

    /// Treat every tap up to `trigger` as already played.
    pub fn sync_ripple(&mut self, trigger: &RippleTrigger) {
        self.ripple.sync(trigger);
    }

    /// The last frame's outline mask, before the foreground was applied.
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Render one frame into `target`, overwriting it.
    pub fn render(&mut self, inputs: &FrameInputs, target: &mut Surface) -> Result<(), RenderError> {
        let (width, height) = target.size();
        self.frame_count = self.frame_count.wrapping_add(1);

        self.draw_gradient(inputs, target)?;
        self.draw_mask(inputs, width, height)?;

        let foreground = self.composite.foreground;
        for (i, px) in target.pixels_mut().iter_mut().enumerate() {
            let alpha = self.mask.coverage()[i].clamp(0.0, 1.0) * foreground.a;
            *px = foreground.with_alpha(alpha).over(*px);
        }

        if let Some(ripple) = self.ripple.update(&inputs.ripple, inputs.elapsed) {
            apply_ripple(&ripple, inputs.elapsed, target);
        }
        Ok(())
    }

    fn draw_gradient(&mut self, inputs: &FrameInputs, target: &mut Surface) -> Result<(), RenderError> {
        let (width, height) = target.size();
        let background = self.composite.background;
        let mut layer = match self.gradient_layer.take() {
            Some(layer) if layer.size() == (width, height) => layer,
            _ => Surface::new(width, height)?,
        };

        layer.fill(background);
        let grid = self.gradient.generate(inputs.gradient_t);
        rasterize_mesh(&grid, self.composite.mesh_subdivisions, &mut layer);
        blur(layer.pixels_mut(), width as usize, height as usize, self.gradient_blur, &mut self.blur_scratch);

        let opacity = inputs.params.container_opacity.clamp(0.0, 1.0);
        for (dst, src) in target.pixels_mut().iter_mut().zip(layer.pixels()) {
            *dst = src.with_alpha(src.a * opacity).over(background);
        }
        self.gradient_layer = Some(layer);
        Ok(())
    }

    fn draw_mask(&mut self, inputs: &FrameInputs, width: u32, height: u32) -> Result<(), RenderError> {
        if self.mask.width() != width || self.mask.height() != height {
            self.mask = Mask::new(width, height);
        } else {
            self.mask.clear();
        }

        let params = BoundaryParams {
            width: width as f32,
            height: height as f32,
            padding: inputs.params.corner_padding,
            corner_radius: self.corner_radius,
            scale: inputs.params.rectangle_scale,
        };
        match self.boundary.generate(&params, inputs.boundary_t) {
            Ok(path) => {
                self.last_geometry_error = None;
                let points = path.flatten(self.composite.flatten_tolerance);
                self.mask.fill_polygon(&points)?;
                self.mask.blur(inputs.params.mask_blur_radius);
            }
            Err(err) => {
                // Log once per distinct failure, not every frame.
                if self.last_geometry_error.as_ref() != Some(&err) {
                    log::warn!("skipping outline mask: {err}");
                    self.last_geometry_error = Some(err);
                }
            }
        }
        Ok(())
    }
}

/// Resample `target` through the ripple's displacement field.
fn apply_ripple(ripple: &Ripple, now: f32, target: &mut Surface) {
    let source = target.clone();
    let width = target.width();
    for (i, px) in target.pixels_mut().iter_mut().enumerate() {
        let x = (i as u32 % width) as f32 + 0.5;
        let y = (i as u32 / width) as f32 + 0.5;
        let offset = ripple.displacement(Point::new(x, y), now);
        if offset.x != 0.0 || offset.y != 0.0 {
            *px = source.sample(x + offset.x, y + offset.y);
        }
    }
}
