pub mod gradient;
pub mod boundary;
pub mod ripple;

pub use gradient::{ControlPoint, GradientField, MeshGrid};
pub use boundary::{
    BlendedArc, BoundaryGenerator, BoundaryParams, BoundaryPath, CornerJoin, DisplacementField, WarpedArc,
};
pub use ripple::{Ripple, RipplePlayer};
