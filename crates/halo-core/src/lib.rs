pub mod point;
pub mod color;
pub mod oscillator;
pub mod easing;
pub mod shape;
pub mod outline;
pub mod clock;
pub mod state;
pub mod frame;
pub mod config;
pub mod error;

pub use point::Point;
pub use color::Rgba;
pub use oscillator::{sin_in_range, AxisOscillator, Oscillator};
pub use easing::{Easing, Tween};
pub use shape::{Shape, Line, CircleArc};
pub use outline::Outline;
pub use clock::AnimationClock;
pub use state::{StateMachine, StateParams, StateTable, TransitionConfig, UiState};
pub use frame::{FrameInputs, RippleTrigger};
pub use config::{
    BoundaryConfig, CompositeConfig, CornerStyle, EffectConfig, GradientConfig, Palette,
    RippleConfig, MAX_FOLD,
};
pub use error::{ConfigError, GeometryError};
