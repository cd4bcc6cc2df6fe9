//! Near-plane clipping of single triangles.
//!
//! A triangle crossing `z = -w` becomes a quad (one vertex behind) or a
//! smaller triangle (two vertices behind). The result is produced without
//! allocation and keeps the winding of the input.

use super::{ClipPlane, ClipTriangle, ClipVertex};

/// Up to two triangles produced by [`clip_near`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClippedTriangles {
    triangles: [ClipTriangle; 2],
    len: usize,
}

impl ClippedTriangles {
    const EMPTY_TRIANGLE: ClipTriangle = [ClipVertex::new(crate::math::vec4::Vec4::ZERO); 3];

    fn empty() -> Self {
        Self {
            triangles: [Self::EMPTY_TRIANGLE; 2],
            len: 0,
        }
    }

    fn push(&mut self, triangle: ClipTriangle) {
        self.triangles[self.len] = triangle;
        self.len += 1;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[ClipTriangle] {
        &self.triangles[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipTriangle> {
        self.as_slice().iter()
    }
}

impl<'a> IntoIterator for &'a ClippedTriangles {
    type Item = &'a ClipTriangle;
    type IntoIter = std::slice::Iter<'a, ClipTriangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Clips a triangle against the near plane.
///
/// | vertices behind | output |
/// |-----------------|--------|
/// | 0 | the input, unchanged |
/// | 1 | two triangles (fan of the clipped quad) |
/// | 2 | one triangle |
/// | 3 | nothing |
pub fn clip_near(triangle: &ClipTriangle) -> ClippedTriangles {
    let plane = ClipPlane::Near;
    let mut out = ClippedTriangles::empty();

    let inside = triangle.map(|v| plane.is_inside(&v));
    match inside.iter().filter(|&&i| i).count() {
        3 => {
            out.push(*triangle);
            return out;
        }
        0 => return out,
        _ => {}
    }

    // Sutherland-Hodgman against the single plane: at most 4 vertices.
    let mut polygon = [triangle[0]; 4];
    let mut n = 0;
    for i in 0..3 {
        let j = (i + 1) % 3;
        let (current, next) = (&triangle[i], &triangle[j]);
        if inside[i] {
            polygon[n] = *current;
            n += 1;
        }
        if inside[i] != inside[j] {
            polygon[n] = current.intersect(next, plane);
            n += 1;
        }
    }

    for k in 1..n - 1 {
        out.push([polygon[0], polygon[k], polygon[k + 1]]);
    }
    out
}
