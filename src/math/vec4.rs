//! 4D vector for homogeneous coordinates.

use super::fixed::Fixed;
use super::vec3::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vec4 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
    pub w: Fixed,
}

impl Vec4 {
    pub const ZERO: Self = Self::new(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO, Fixed::ZERO);

    pub const fn new(x: Fixed, y: Fixed, z: Fixed, w: Fixed) -> Self {
        Self { x, y, z, w }
    }

    /// Create a point (w=1) from a position.
    pub const fn point(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z, Fixed::ONE)
    }
}
