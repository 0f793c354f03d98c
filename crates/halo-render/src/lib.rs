pub mod error;
pub mod surface;
pub mod raster;
pub mod blur;
pub mod mask;
pub mod mesh;
pub mod compositor;

pub use error::RenderError;
pub use surface::Surface;
pub use mask::Mask;
pub use compositor::Compositor;
