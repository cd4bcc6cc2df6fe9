//! Perspective divide and viewport mapping.
//!
//! ```text
//! sx    = (x / w + 1) * width  / 2
//! sy    = (1 - y / w) * height / 2     top-left origin, y down
//! depth = (z / w + 1) / 2              near -> 0, far -> 1
//! ```
//!
//! Each coordinate is evaluated as one exact quotient of raw integers, so the
//! divide and the viewport scale round only once (floor).

use super::{ClipTriangle, ClipVertex};
use crate::math::fixed::{Fixed, FRAC_BITS};

/// A vertex after the perspective divide, in pixel units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScreenVertex {
    pub x: Fixed,
    pub y: Fixed,
    /// Window depth in `[0, 1]` for visible geometry.
    pub depth: Fixed,
}

impl ScreenVertex {
    pub const fn new(x: Fixed, y: Fixed, depth: Fixed) -> Self {
        Self { x, y, depth }
    }
}

pub type ScreenTriangle = [ScreenVertex; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Maps a clip-space vertex to the screen; `None` when `w <= 0`.
    pub fn to_screen(&self, v: &ClipVertex) -> Option<ScreenVertex> {
        let p = v.position;
        let w = p.w.raw() as i128;
        if w <= 0 {
            return None;
        }
        let (x, y, z) = (p.x.raw() as i128, p.y.raw() as i128, p.z.raw() as i128);
        let one = 1i128 << FRAC_BITS;
        let two_w = 2 * w;

        let quotient = |num: i128| {
            let q = num.div_euclid(two_w);
            Fixed::from_raw(q.clamp(i32::MIN as i128, i32::MAX as i128) as i32)
        };

        Some(ScreenVertex {
            x: quotient((x + w) * self.width as i128 * one),
            y: quotient((w - y) * self.height as i128 * one),
            depth: quotient((z + w) * one),
        })
    }

    /// Maps all three vertices, or `None` if any has `w <= 0`.
    pub fn project(&self, triangle: &ClipTriangle) -> Option<ScreenTriangle> {
        Some([
            self.to_screen(&triangle[0])?,
            self.to_screen(&triangle[1])?,
            self.to_screen(&triangle[2])?,
        ])
    }
}
