use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface size {width}x{height} is empty")]
    EmptySurface { width: u32, height: u32 },
    #[error("mask tessellation failed: {0:?}")]
    Tessellation(lyon::tessellation::TessellationError),
    #[error("image export failed: {0}")]
    Image(#[from] image::ImageError),
}
