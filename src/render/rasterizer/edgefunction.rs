//! Edge function-based triangle rasterization on integers.
//!
//! # Algorithm Overview
//!
//! 1. Snap the vertices to a sub-pixel grid (`SUBPIXEL_BITS` fractional bits)
//! 2. Compute the signed area; cull or normalise the winding
//! 3. For each sample in the bounding box, evaluate three edge functions
//! 4. A sample is inside when all three pass the fill-rule test
//!
//! # Edge Function
//!
//! For an edge from point A to point B, the edge function at point P is:
//!
//! ```text
//! E(P) = (B.x - A.x) * (P.y - A.y) - (B.y - A.y) * (P.x - A.x)
//! ```
//!
//! All quantities are `i64` on the snapped grid, so the inside test is exact.
//!
//! # Winding Order
//!
//! Front faces are counter-clockwise in NDC. The viewport flips y, so a front
//! face has a negative area on screen. Front faces get two vertices swapped
//! so that interior samples see three non-negative edge functions.
//!
//! # Fill Rule
//!
//! Top-left convention: a sample exactly on an edge is inside only if that
//! edge is a top edge or a left edge. Two triangles sharing an edge therefore
//! never both cover, nor both miss, a sample on it.
//!
//! # References
//!
//! - Juan Pineda, "A Parallel Algorithm for Polygon Rasterization" (1988)

use super::{RasterResult, Rasterizer};
use crate::clipper::{ScreenTriangle, ScreenVertex};
use crate::math::fixed::{Fixed, FRAC_BITS};
use crate::render::framebuffer::{FrameBuffer, SampleCount};

/// Fractional bits of the snapped vertex grid.
pub const SUBPIXEL_BITS: u32 = 8;

const SUBPIXEL_ONE: i64 = 1 << SUBPIXEL_BITS;
const PIXEL_CENTER: i64 = SUBPIXEL_ONE / 2;

/// Sample offsets from the pixel center, in sub-pixel units.
const SINGLE_SAMPLE: [(i64, i64); 1] = [(0, 0)];
const ROTATED_GRID_4X: [(i64, i64); 4] = [(-32, -96), (96, -32), (-96, 32), (32, 96)];

fn sample_offsets(samples: SampleCount) -> &'static [(i64, i64)] {
    match samples {
        SampleCount::One => &SINGLE_SAMPLE,
        SampleCount::Four => &ROTATED_GRID_4X,
    }
}

#[derive(Clone, Copy, Debug)]
struct SnappedVertex {
    x: i64,
    y: i64,
    depth: i64,
}

impl SnappedVertex {
    fn snap(v: &ScreenVertex) -> Self {
        let shift = FRAC_BITS - SUBPIXEL_BITS;
        let round = 1i64 << (shift - 1);
        Self {
            x: (v.x.raw() as i64 + round) >> shift,
            y: (v.y.raw() as i64 + round) >> shift,
            depth: v.depth.raw() as i64,
        }
    }
}

/// `E(P)` for the edge `a -> b`, as `dx * P.y - dy * P.x + c`.
#[derive(Clone, Copy, Debug)]
struct Edge {
    step_x: i64,
    step_y: i64,
    offset: i64,
    /// `0` on top and left edges, `-1` elsewhere.
    bias: i64,
}

impl Edge {
    fn new(a: SnappedVertex, b: SnappedVertex) -> Self {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        // With the positive winding, top edges run in +x and left edges in -y.
        let top_left = dy < 0 || (dy == 0 && dx > 0);
        Self {
            step_x: -dy,
            step_y: dx,
            offset: dy * a.x - dx * a.y,
            bias: if top_left { 0 } else { -1 },
        }
    }

    #[inline]
    fn eval(&self, x: i64, y: i64) -> i64 {
        self.step_x * x + self.step_y * y + self.offset
    }

    #[inline]
    fn covers(&self, value: i64) -> bool {
        value + self.bias >= 0
    }
}

/// Signed doubled area on the snapped grid.
#[inline]
fn orient2d(a: SnappedVertex, b: SnappedVertex, p: SnappedVertex) -> i64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Triangle rasterizer using the integer edge function algorithm.
///
/// Iterates over every sample in the triangle's bounding box (clamped to the
/// framebuffer) and writes a flat color with a depth test. Depth is
/// interpolated linearly in screen space from the barycentric weights.
#[derive(Debug, Clone, Copy)]
pub struct EdgeFunctionRasterizer {
    cull_back_faces: bool,
}

impl EdgeFunctionRasterizer {
    /// Creates a rasterizer with back-face culling enabled.
    pub fn new() -> Self {
        Self {
            cull_back_faces: true,
        }
    }

    pub fn with_backface_culling(cull_back_faces: bool) -> Self {
        Self { cull_back_faces }
    }

    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.cull_back_faces = enabled;
    }

    pub fn backface_culling(&self) -> bool {
        self.cull_back_faces
    }
}

impl Default for EdgeFunctionRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for EdgeFunctionRasterizer {
    fn fill_triangle(
        &self,
        triangle: &ScreenTriangle,
        buffer: &mut FrameBuffer,
        color: u32,
    ) -> RasterResult {
        let v0 = SnappedVertex::snap(&triangle[0]);
        let mut v1 = SnappedVertex::snap(&triangle[1]);
        let mut v2 = SnappedVertex::snap(&triangle[2]);

        let mut area = orient2d(v0, v1, v2);
        if area == 0 {
            return RasterResult::Degenerate;
        }
        if area > 0 && self.cull_back_faces {
            return RasterResult::Culled;
        }
        if area < 0 {
            std::mem::swap(&mut v1, &mut v2);
            area = -area;
        }

        let mut covered = 0u32;
        let mut written = 0u32;

        // Bounding box in pixels, clamped to the framebuffer.
        let (width, height) = (buffer.width() as i64, buffer.height() as i64);
        let min_x = (v0.x.min(v1.x).min(v2.x) >> SUBPIXEL_BITS).max(0);
        let min_y = (v0.y.min(v1.y).min(v2.y) >> SUBPIXEL_BITS).max(0);
        let max_x = (v0.x.max(v1.x).max(v2.x) >> SUBPIXEL_BITS).min(width - 1);
        let max_y = (v0.y.max(v1.y).max(v2.y) >> SUBPIXEL_BITS).min(height - 1);
        if min_x > max_x || min_y > max_y {
            return RasterResult::Drawn { covered, written };
        }

        // Edge i is opposite vertex i, so its value weights vertex i.
        let edges = [Edge::new(v1, v2), Edge::new(v2, v0), Edge::new(v0, v1)];
        let depths = [v0.depth as i128, v1.depth as i128, v2.depth as i128];
        let offsets = sample_offsets(buffer.samples());

        for py in min_y..=max_y {
            let center_y = (py << SUBPIXEL_BITS) + PIXEL_CENTER;
            for px in min_x..=max_x {
                let center_x = (px << SUBPIXEL_BITS) + PIXEL_CENTER;
                for (sample, &(ox, oy)) in offsets.iter().enumerate() {
                    let (sx, sy) = (center_x + ox, center_y + oy);
                    let w = edges.map(|e| e.eval(sx, sy));
                    if !(edges[0].covers(w[0]) && edges[1].covers(w[1]) && edges[2].covers(w[2]))
                    {
                        continue;
                    }
                    covered += 1;

                    let depth = (w[0] as i128 * depths[0]
                        + w[1] as i128 * depths[1]
                        + w[2] as i128 * depths[2])
                        / area as i128;
                    if depth > Fixed::ONE.raw() as i128 {
                        // Beyond the far plane.
                        continue;
                    }
                    let depth = Fixed::from_raw(depth as i32);
                    if buffer.test_and_set(px as u32, py as u32, sample, depth, color) {
                        written += 1;
                    }
                }
            }
        }

        RasterResult::Drawn { covered, written }
    }
}
