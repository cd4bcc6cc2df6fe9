//! Triangle clipping in homogeneous clip space.
//!
//! Clipping happens after projection, before the perspective divide:
//!
//! - [`near_plane`]: the `z >= -w` plane, so every surviving vertex has a
//!   positive `w` (OpenGL-style `[-1, 1]` depth range).
//! - [`guard_band`]: the widened side planes `|x|, |y| <= GUARD_BAND * w`,
//!   which keep screen coordinates inside the fixed-point range. Geometry
//!   between the viewport edge and the guard band is left to the
//!   rasterizer's bounding-box clamp.
//! - [`viewport`]: perspective divide and viewport mapping.
//!
//! Plane distances and intersections are evaluated on raw integers with
//! widened intermediates, so the computed intersection of a shared edge does
//! not depend on which triangle (or which direction) it is clipped from.

pub mod guard_band;
pub mod near_plane;
pub mod viewport;

pub use guard_band::{clip_guard_band, within_guard_band, ClipPolygon, GUARD_BAND};
pub use near_plane::{clip_near, ClippedTriangles};
pub use viewport::{ScreenTriangle, ScreenVertex, Viewport};

use crate::math::{fixed::Fixed, vec4::Vec4};

/// A vertex in homogeneous clip space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipVertex {
    /// Position in clip space (x, y, z, w), before the perspective divide.
    pub position: Vec4,
}

impl ClipVertex {
    pub const fn new(position: Vec4) -> Self {
        Self { position }
    }

    /// Point where the edge `self -> other` crosses `plane`.
    ///
    /// Each component is `(a * -d_b + b * d_a) / (d_a - d_b)`, computed
    /// exactly in 128 bits and truncated once. The expression is symmetric
    /// in `a` and `b`.
    pub fn intersect(&self, other: &Self, plane: ClipPlane) -> Self {
        let da = plane.signed_distance(self) as i128;
        let db = plane.signed_distance(other) as i128;
        let denom = da - db;
        if denom == 0 {
            return *self;
        }
        let lerp = |a: Fixed, b: Fixed| {
            let num = a.raw() as i128 * -db + b.raw() as i128 * da;
            Fixed::from_raw((num / denom) as i32)
        };
        let (a, b) = (self.position, other.position);
        Self::new(Vec4::new(
            lerp(a.x, b.x),
            lerp(a.y, b.y),
            lerp(a.z, b.z),
            lerp(a.w, b.w),
        ))
    }
}

/// Three clip-space vertices in submission order.
pub type ClipTriangle = [ClipVertex; 3];

/// Planes the clipper tests against.
///
/// The signed distance is positive (or zero) when inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipPlane {
    /// `z >= -w`
    Near,
    /// `x >= -GUARD_BAND * w`
    Left,
    /// `x <= GUARD_BAND * w`
    Right,
    /// `y >= -GUARD_BAND * w`
    Bottom,
    /// `y <= GUARD_BAND * w`
    Top,
}

impl ClipPlane {
    /// Signed distance in raw Q16.16 units, widened so it cannot overflow.
    pub fn signed_distance(&self, v: &ClipVertex) -> i64 {
        let p = v.position;
        let (x, y, z, w) = (
            p.x.raw() as i64,
            p.y.raw() as i64,
            p.z.raw() as i64,
            p.w.raw() as i64,
        );
        let gw = GUARD_BAND * w;
        match self {
            Self::Near => w + z,
            Self::Left => gw + x,
            Self::Right => gw - x,
            Self::Bottom => gw + y,
            Self::Top => gw - y,
        }
    }

    pub fn is_inside(&self, v: &ClipVertex) -> bool {
        self.signed_distance(v) >= 0
    }
}
