//! Scan conversion and render-target storage.

pub mod framebuffer;
pub mod rasterizer;

pub use framebuffer::{FrameBuffer, PackError, PixelFormat, SampleCount};
pub use rasterizer::{EdgeFunctionRasterizer, RasterResult, Rasterizer};
