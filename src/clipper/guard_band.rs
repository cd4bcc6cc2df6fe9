//! Guard-band clipping.
//!
//! After the near plane, the only remaining hazard is range: a vertex far
//! outside the view can map to screen coordinates that do not fit in Q16.16.
//! Triangles are therefore clipped against the planes `|x|, |y| <= G * w`
//! with `G = GUARD_BAND`, which bounds screen coordinates to
//! `(1 ± G) / 2` times the viewport size. Almost every triangle is already
//! inside and takes the fast path.

use super::{ClipPlane, ClipTriangle, ClipVertex};

/// Guard band size as a multiple of the viewport half-extent.
pub const GUARD_BAND: i64 = 4;

const SIDE_PLANES: [ClipPlane; 4] = [
    ClipPlane::Left,
    ClipPlane::Right,
    ClipPlane::Bottom,
    ClipPlane::Top,
];

/// True when every vertex lies inside all four guard planes.
pub fn within_guard_band(triangle: &ClipTriangle) -> bool {
    triangle
        .iter()
        .all(|v| SIDE_PLANES.iter().all(|plane| plane.is_inside(v)))
}

/// A convex polygon in clip space, used as the intermediate representation
/// while clipping against several planes.
#[derive(Debug, Clone, Default)]
pub struct ClipPolygon {
    pub vertices: Vec<ClipVertex>,
}

impl ClipPolygon {
    pub fn from_triangle(triangle: &ClipTriangle) -> Self {
        Self {
            vertices: triangle.to_vec(),
        }
    }

    /// Returns true if the polygon has been completely clipped away.
    pub fn is_empty(&self) -> bool {
        self.vertices.len() < 3
    }

    /// Sutherland-Hodgman against one plane.
    pub fn clip_against_plane(&self, plane: ClipPlane) -> Self {
        if self.is_empty() {
            return Self::default();
        }

        let mut output = Vec::with_capacity(self.vertices.len() + 1);
        for (i, current) in self.vertices.iter().enumerate() {
            let next = &self.vertices[(i + 1) % self.vertices.len()];
            let current_inside = plane.is_inside(current);
            let next_inside = plane.is_inside(next);

            if current_inside {
                output.push(*current);
            }
            if current_inside != next_inside {
                output.push(current.intersect(next, plane));
            }
        }

        Self { vertices: output }
    }

    /// Fan triangulation of the convex polygon, preserving winding.
    pub fn triangulate(&self) -> impl Iterator<Item = ClipTriangle> + '_ {
        (1..self.vertices.len().saturating_sub(1))
            .map(move |i| [self.vertices[0], self.vertices[i], self.vertices[i + 1]])
    }
}

/// Clips a triangle to the guard band, appending the result to `out`.
///
/// Returns the number of triangles appended.
pub fn clip_guard_band(triangle: &ClipTriangle, out: &mut Vec<ClipTriangle>) -> usize {
    if within_guard_band(triangle) {
        out.push(*triangle);
        return 1;
    }

    let mut polygon = ClipPolygon::from_triangle(triangle);
    for plane in SIDE_PLANES {
        if polygon.is_empty() {
            break;
        }
        polygon = polygon.clip_against_plane(plane);
    }

    let before = out.len();
    out.extend(polygon.triangulate());
    out.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{fixed::Fixed, vec4::Vec4};

    fn vertex(x: i32, y: i32, w: i32) -> ClipVertex {
        ClipVertex::new(Vec4::new(
            Fixed::from_int(x),
            Fixed::from_int(y),
            Fixed::ZERO,
            Fixed::from_int(w),
        ))
    }

    #[test]
    fn small_triangle_takes_fast_path() {
        let t = [vertex(-1, -1, 1), vertex(1, -1, 1), vertex(0, 1, 1)];
        assert!(within_guard_band(&t));
        let mut out = Vec::new();
        assert_eq!(clip_guard_band(&t, &mut out), 1);
        assert_eq!(out, vec![t]);
    }

    #[test]
    fn huge_triangle_is_bounded() {
        let t = [vertex(-100, -100, 1), vertex(100, -100, 1), vertex(0, 100, 1)];
        assert!(!within_guard_band(&t));
        let mut out = Vec::new();
        let n = clip_guard_band(&t, &mut out);
        assert!(n >= 1);
        assert_eq!(out.len(), n);
        for tri in &out {
            for v in tri {
                let (x, w) = (v.position.x.raw() as i64, v.position.w.raw() as i64);
                let y = v.position.y.raw() as i64;
                // Intersections are truncated per component.
                assert!(x.abs() <= GUARD_BAND * w + 4);
                assert!(y.abs() <= GUARD_BAND * w + 4);
            }
        }
    }

    #[test]
    fn triangle_outside_one_plane_is_discarded() {
        let t = [vertex(10, 0, 1), vertex(12, 0, 1), vertex(11, 1, 1)];
        let mut out = Vec::new();
        assert_eq!(clip_guard_band(&t, &mut out), 0);
        assert!(out.is_empty());
    }
}
