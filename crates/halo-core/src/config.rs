use crate::color::Rgba;
use crate::error::ConfigError;
use crate::oscillator::{AxisOscillator, Oscillator};
use crate::state::{StateParams, StateTable, TransitionConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Nine colors, one per gradient control point, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette(pub [Rgba; 9]);

impl Palette {
    pub fn classic() -> Self {
        Self([
            Rgba::RED, Rgba::PURPLE, Rgba::INDIGO,
            Rgba::ORANGE, Rgba::WHITE, Rgba::BLUE,
            Rgba::YELLOW, Rgba::GREEN, Rgba::MINT,
        ])
    }

    pub fn vivid() -> Self {
        Self([
            Rgba::YELLOW, Rgba::PURPLE, Rgba::INDIGO,
            Rgba::ORANGE, Rgba::RED, Rgba::BLUE,
            Rgba::INDIGO, Rgba::GREEN, Rgba::MINT,
        ])
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "vivid" => Some(Self::vivid()),
            _ => None,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::classic()
    }
}

/// Hand-tuned motion of the six interior gradient control points.
pub const DEFAULT_INTERIOR: [AxisOscillator; 6] = [
    AxisOscillator::new(Oscillator::new(-0.8, -0.2, 0.439, 0.342), Oscillator::new(0.3, 0.7, 3.42, 0.984)),
    AxisOscillator::new(Oscillator::new(0.1, 0.8, 0.239, 0.084), Oscillator::new(0.2, 0.8, 5.21, 0.242)),
    AxisOscillator::new(Oscillator::new(1.0, 1.5, 0.939, 0.084), Oscillator::new(0.4, 0.8, 0.25, 0.642)),
    AxisOscillator::new(Oscillator::new(-0.8, 0.0, 1.439, 0.442), Oscillator::new(1.4, 1.9, 3.42, 0.984)),
    AxisOscillator::new(Oscillator::new(0.3, 0.6, 0.339, 0.784), Oscillator::new(1.0, 1.2, 1.22, 0.772)),
    AxisOscillator::new(Oscillator::new(1.0, 1.5, 0.939, 0.056), Oscillator::new(1.3, 1.7, 0.47, 0.342)),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradientConfig {
    pub interior: [AxisOscillator; 6],
    pub palette: Palette,
    /// Blur applied to the rendered color field, in pixels.
    pub blur_radius: f32,
}

impl Default for GradientConfig {
    fn default() -> Self {
        Self { interior: DEFAULT_INTERIOR, palette: Palette::classic(), blur_radius: 8.0 }
    }
}

/// How the outline joins two edges at a corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CornerStyle {
    /// Straight chord between the corner-adjacent vertices.
    Chord,
    /// Circular arc around the unperturbed corner center.
    StaticArc,
    /// Circular arc whose center follows its own, smaller oscillation.
    DriftingArc,
    /// Arc samples pass through the same displacement field as the vertices.
    #[default]
    WarpedArc,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Peak vertex displacement in pixels.
    pub amplitude: f32,
    /// Cross-axis coupling `k` in `sin(t + y * k)`.
    pub coupling: f32,
    pub corner_radius: f32,
    pub corner_style: CornerStyle,
    /// Center displacement for [`CornerStyle::DriftingArc`].
    pub drift_amplitude: f32,
    pub drift_coupling: f32,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            amplitude: 10.0,
            coupling: 0.05,
            corner_radius: 48.0,
            corner_style: CornerStyle::WarpedArc,
            drift_amplitude: 4.0,
            drift_coupling: 0.01,
        }
    }
}

/// Largest `amplitude * coupling` the boundary accepts. At 1 the
/// displacement field stops being injective and the outline can fold.
pub const MAX_FOLD: f32 = 0.9;

impl BoundaryConfig {
    pub fn fold_factor(&self) -> f32 {
        (self.amplitude * self.coupling).abs()
    }

    /// Amplitude actually applied: the configured one, reduced so that the
    /// fold factor stays within [`MAX_FOLD`].
    pub fn effective_amplitude(&self) -> f32 {
        let coupling = self.coupling.abs();
        if coupling > 0.0 {
            self.amplitude.min(MAX_FOLD / coupling)
        } else {
            self.amplitude
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleConfig {
    /// Peak radial displacement in pixels.
    pub amplitude: f32,
    pub wavelength: f32,
    /// Front speed in pixels per second.
    pub speed: f32,
    /// Exponential decay per second.
    pub decay: f32,
    /// Seconds until the ripple is dropped.
    pub duration: f32,
}

impl Default for RippleConfig {
    fn default() -> Self {
        Self { amplitude: 12.0, wavelength: 60.0, speed: 600.0, decay: 3.0, duration: 1.2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeConfig {
    pub background: Rgba,
    /// Layer revealed through the animated mask.
    pub foreground: Rgba,
    /// Longest flattened outline segment in pixels.
    pub flatten_tolerance: f32,
    /// Triangle grid resolution per gradient patch side.
    pub mesh_subdivisions: u32,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            background: Rgba::BLACK,
            foreground: Rgba::WHITE,
            flatten_tolerance: 2.0,
            mesh_subdivisions: 12,
        }
    }
}

/// Every tunable of the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub tick_period_ms: u64,
    /// Reset both clocks to zero when the effect is re-activated.
    pub reset_clock_on_activate: bool,
    pub states: StateTable,
    pub transition: TransitionConfig,
    pub gradient: GradientConfig,
    pub boundary: BoundaryConfig,
    pub ripple: RippleConfig,
    pub composite: CompositeConfig,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            reset_clock_on_activate: false,
            states: StateTable::default(),
            transition: TransitionConfig::default(),
            gradient: GradientConfig::default(),
            boundary: BoundaryConfig::default(),
            ripple: RippleConfig::default(),
            composite: CompositeConfig::default(),
        }
    }
}

impl EffectConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }

    /// Tick period in seconds of active time.
    pub fn tick_seconds(&self) -> f32 {
        self.tick_period_ms as f32 / 1000.0
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Save a config file as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::invalid("tick_period_ms", "must be positive"));
        }
        validate_state("states.idle", &self.states.idle)?;
        validate_state("states.thinking", &self.states.thinking)?;
        validate_state("states.answered", &self.states.answered)?;
        non_negative("transition.duration", self.transition.duration)?;
        non_negative("gradient.blur_radius", self.gradient.blur_radius)?;

        let b = &self.boundary;
        non_negative("boundary.amplitude", b.amplitude)?;
        non_negative("boundary.corner_radius", b.corner_radius)?;
        non_negative("boundary.drift_amplitude", b.drift_amplitude)?;
        finite("boundary.coupling", b.coupling)?;
        finite("boundary.drift_coupling", b.drift_coupling)?;
        if b.fold_factor() > MAX_FOLD {
            return Err(ConfigError::invalid(
                "boundary.coupling",
                format!(
                    "amplitude {} * coupling {} = {:.2} exceeds {MAX_FOLD}; lower one of them",
                    b.amplitude,
                    b.coupling,
                    b.fold_factor()
                ),
            ));
        }

        let r = &self.ripple;
        non_negative("ripple.amplitude", r.amplitude)?;
        non_negative("ripple.decay", r.decay)?;
        non_negative("ripple.duration", r.duration)?;
        positive("ripple.wavelength", r.wavelength)?;
        positive("ripple.speed", r.speed)?;

        positive("composite.flatten_tolerance", self.composite.flatten_tolerance)?;
        if !(1..=64).contains(&self.composite.mesh_subdivisions) {
            return Err(ConfigError::invalid("composite.mesh_subdivisions", "must be within 1..=64"));
        }
        for (name, c) in [("composite.background", self.composite.background), ("composite.foreground", self.composite.foreground)] {
            if !c.is_finite() {
                return Err(ConfigError::invalid(name, "channels must be finite"));
            }
        }
        Ok(())
    }
}

fn validate_state(prefix: &str, p: &StateParams) -> Result<(), ConfigError> {
    non_negative(&format!("{prefix}.rectangle_speed"), p.rectangle_speed)?;
    non_negative(&format!("{prefix}.gradient_speed"), p.gradient_speed)?;
    non_negative(&format!("{prefix}.mask_blur_radius"), p.mask_blur_radius)?;
    non_negative(&format!("{prefix}.corner_padding"), p.corner_padding)?;
    positive(&format!("{prefix}.rectangle_scale"), p.rectangle_scale)?;
    if !(0.0..=1.0).contains(&p.container_opacity) {
        return Err(ConfigError::invalid(format!("{prefix}.container_opacity"), "must be within 0..=1"));
    }
    Ok(())
}

fn finite(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} is not finite")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(ConfigError::invalid(field, format!("{value} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        EffectConfig::default().validate().unwrap();
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = EffectConfig::default();
        config.boundary.coupling = 0.08;
        config.gradient.palette = Palette::vivid();
        let json = config.to_json().unwrap();
        let back = EffectConfig::from_json(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EffectConfig::from_json(r#"{ "tick_period_ms": 16 }"#).unwrap();
        assert_eq!(config.tick_period_ms, 16);
        assert_eq!(config.boundary, BoundaryConfig::default());
    }

    #[test]
    fn test_rejects_zero_period() {
        let err = EffectConfig::from_json(r#"{ "tick_period_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_rejects_opacity_out_of_range() {
        let mut config = EffectConfig::default();
        config.states.thinking.container_opacity = 1.5;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("states.thinking.container_opacity"));
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(EffectConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_default_interior_matches_reference_triple() {
        let first = DEFAULT_INTERIOR[0].x;
        assert_eq!((first.lo, first.hi, first.offset, first.time_scale), (-0.8, -0.2, 0.439, 0.342));
    }

    #[test]
    fn test_rejects_folding_coupling() {
        let mut config = EffectConfig::default();
        config.boundary.coupling = 0.2;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("boundary.coupling"), "{err}");

        config.boundary.amplitude = 4.0;
        config.validate().unwrap();
    }

    #[test]
    fn test_effective_amplitude_limits_fold() {
        let boundary = BoundaryConfig { coupling: 0.2, ..BoundaryConfig::default() };
        assert!((boundary.effective_amplitude() - 4.5).abs() < 1e-5);
        assert_eq!(BoundaryConfig::default().effective_amplitude(), 10.0);
        let flat = BoundaryConfig { coupling: 0.0, ..BoundaryConfig::default() };
        assert_eq!(flat.effective_amplitude(), 10.0);
    }

    #[test]
    fn test_palette_by_name() {
        assert_eq!(Palette::by_name("vivid"), Some(Palette::vivid()));
        assert!(Palette::by_name("sepia").is_none());
    }
}
