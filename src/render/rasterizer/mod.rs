//! Triangle rasterization.
//!
//! Rasterizers turn a [`ScreenTriangle`] into depth-tested samples in a
//! [`FrameBuffer`]. The trait keeps the pipeline independent of the
//! scan-conversion strategy; [`EdgeFunctionRasterizer`] is the integer
//! half-space implementation used by the renderer.

mod edgefunction;

pub use edgefunction::{EdgeFunctionRasterizer, SUBPIXEL_BITS};

use super::framebuffer::FrameBuffer;
use crate::clipper::ScreenTriangle;

/// What happened to one submitted triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterResult {
    /// Rejected by back-face culling before the sample loop.
    Culled,
    /// Zero area after snapping.
    Degenerate,
    Drawn {
        /// Samples inside the triangle.
        covered: u32,
        /// Samples that passed the depth test.
        written: u32,
    },
}

/// Trait for triangle rasterization algorithms.
pub trait Rasterizer {
    /// Fill a triangle into the frame buffer with a flat color.
    ///
    /// # Arguments
    /// * `triangle` - Screen-space vertices in submission order
    /// * `buffer` - The frame buffer to draw into
    /// * `color` - Packed ARGB color written for every visible sample
    fn fill_triangle(
        &self,
        triangle: &ScreenTriangle,
        buffer: &mut FrameBuffer,
        color: u32,
    ) -> RasterResult;
}
