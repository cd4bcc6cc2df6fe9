//! Color and depth storage for one render target.
//!
//! Samples are stored interleaved per pixel (`(y * width + x) * samples + s`)
//! as packed ARGB8888 colors and fixed-point depths. Smaller depth is nearer;
//! a cleared depth plane holds [`Fixed::MAX`].
//!
//! After rasterization, [`FrameBuffer::resolve`] folds the samples of every
//! pixel into the displayable plane and [`FrameBuffer::pack`] converts a
//! rectangle of it into an external byte layout.

use std::fmt;

use crate::colors;
use crate::math::fixed::Fixed;

/// Samples stored per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleCount {
    #[default]
    One,
    /// Rotated-grid 4x multisampling, averaged on resolve.
    Four,
}

impl SampleCount {
    pub const fn count(self) -> usize {
        match self {
            SampleCount::One => 1,
            SampleCount::Four => 4,
        }
    }

    /// Accepts 1 or 4.
    pub fn from_count(count: u32) -> Option<Self> {
        match count {
            1 => Some(SampleCount::One),
            4 => Some(SampleCount::Four),
            _ => None,
        }
    }
}

/// Byte layouts accepted by [`FrameBuffer::pack`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Bytes R, G, B, A.
    Rgba8Unorm,
    /// Bytes B, G, R, A (ARGB8888 on little-endian hosts).
    Bgra8Unorm,
    /// Bytes R, G, B.
    Rgb8Unorm,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8Unorm | PixelFormat::Bgra8Unorm => 4,
            PixelFormat::Rgb8Unorm => 3,
        }
    }

    #[inline]
    fn write(self, color: u32, out: &mut [u8]) {
        let [a, r, g, b] = colors::channels(color);
        match self {
            PixelFormat::Rgba8Unorm => out.copy_from_slice(&[r, g, b, a]),
            PixelFormat::Bgra8Unorm => out.copy_from_slice(&[b, g, r, a]),
            PixelFormat::Rgb8Unorm => out.copy_from_slice(&[r, g, b]),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    /// The rectangle does not lie inside the framebuffer.
    InvalidRegion {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// The output buffer length is not `width * height * bytes_per_pixel`.
    BufferSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::InvalidRegion {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "region {}x{} at ({}, {}) exceeds the framebuffer",
                width, height, x, y
            ),
            PackError::BufferSizeMismatch { expected, actual } => write!(
                f,
                "output buffer holds {} bytes, expected {}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for PackError {}

pub struct FrameBuffer {
    width: u32,
    height: u32,
    samples: SampleCount,
    color: Vec<u32>,
    depth: Vec<Fixed>,
    /// One color per pixel; only used when multisampled.
    resolved: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32, samples: SampleCount) -> Self {
        let pixels = width as usize * height as usize;
        let stored = pixels * samples.count();
        let resolved = match samples {
            SampleCount::One => Vec::new(),
            SampleCount::Four => vec![colors::BLACK; pixels],
        };
        Self {
            width,
            height,
            samples,
            color: vec![colors::BLACK; stored],
            depth: vec![Fixed::MAX; stored],
            resolved,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples(&self) -> SampleCount {
        self.samples
    }

    /// Resets every sample to `color` and the farthest depth.
    pub fn clear(&mut self, color: u32) {
        self.color.fill(color);
        self.depth.fill(Fixed::MAX);
        self.resolved.fill(color);
    }

    #[inline]
    fn sample_index(&self, x: u32, y: u32, sample: usize) -> usize {
        (y as usize * self.width as usize + x as usize) * self.samples.count() + sample
    }

    /// Depth-tested write of one sample. The fragment is stored only when
    /// `depth` is strictly nearer than the stored value; returns whether it
    /// was. The caller guarantees the coordinates are in range.
    #[inline]
    pub fn test_and_set(&mut self, x: u32, y: u32, sample: usize, depth: Fixed, color: u32) -> bool {
        let idx = self.sample_index(x, y, sample);
        if depth < self.depth[idx] {
            self.depth[idx] = depth;
            self.color[idx] = color;
            true
        } else {
            false
        }
    }

    /// Folds the samples into the displayable plane.
    ///
    /// A no-op for single-sampled buffers. With four samples, each channel is
    /// averaged and rounded to nearest.
    pub fn resolve(&mut self) {
        if self.samples == SampleCount::One {
            return;
        }
        let n = self.samples.count();
        for (out, samples) in self.resolved.iter_mut().zip(self.color.chunks_exact(n)) {
            *out = colors::average(samples);
        }
    }

    /// The displayable plane, one color per pixel, row-major, top row first.
    pub fn resolved_colors(&self) -> &[u32] {
        match self.samples {
            SampleCount::One => &self.color,
            SampleCount::Four => &self.resolved,
        }
    }

    /// Resolved color of a pixel; meaningful after [`FrameBuffer::resolve`].
    pub fn color_at(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.resolved_colors()[y as usize * self.width as usize + x as usize])
    }

    pub fn depth_at(&self, x: u32, y: u32, sample: usize) -> Option<Fixed> {
        if x >= self.width || y >= self.height || sample >= self.samples.count() {
            return None;
        }
        Some(self.depth[self.sample_index(x, y, sample)])
    }

    /// Number of resolved pixels whose color differs from `background`.
    pub fn covered_pixels(&self, background: u32) -> usize {
        self.resolved_colors()
            .iter()
            .filter(|&&c| c != background)
            .count()
    }

    /// Converts a rectangle of the resolved plane into `out`, row-major with
    /// the top row first.
    pub fn pack(
        &self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: PixelFormat,
        out: &mut [u8],
    ) -> Result<(), PackError> {
        let fits = |start: u32, len: u32, limit: u32| {
            start.checked_add(len).is_some_and(|end| end <= limit)
        };
        if !fits(x, width, self.width) || !fits(y, height, self.height) {
            return Err(PackError::InvalidRegion {
                x,
                y,
                width,
                height,
            });
        }

        let bpp = format.bytes_per_pixel();
        let expected = width as usize * height as usize * bpp;
        if out.len() != expected {
            return Err(PackError::BufferSizeMismatch {
                expected,
                actual: out.len(),
            });
        }
        if expected == 0 {
            return Ok(());
        }

        let plane = self.resolved_colors();
        let stride = self.width as usize;
        for (row, dst_row) in out.chunks_exact_mut(width as usize * bpp).enumerate() {
            let start = (y as usize + row) * stride + x as usize;
            let src_row = &plane[start..start + width as usize];
            for (&color, dst) in src_row.iter().zip(dst_row.chunks_exact_mut(bpp)) {
                format.write(color, dst);
            }
        }
        Ok(())
    }

    /// The whole resolved frame as an RGBA image.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let plane = self.resolved_colors();
        let width = self.width;
        image::RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [a, r, g, b] = colors::channels(plane[(y * width + x) as usize]);
            image::Rgba([r, g, b, a])
        })
    }
}
