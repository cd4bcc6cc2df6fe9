use std::ops::{Add, Mul, Neg, Sub};

use super::fixed::{isqrt_u128, isqrt_u64, Fixed};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Vec3 {
    pub x: Fixed,
    pub y: Fixed,
    pub z: Fixed,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO);
    pub const ONE: Self = Self::new(Fixed::ONE, Fixed::ONE, Fixed::ONE);
    pub const UNIT_X: Self = Self::new(Fixed::ONE, Fixed::ZERO, Fixed::ZERO);
    pub const UNIT_Y: Self = Self::new(Fixed::ZERO, Fixed::ONE, Fixed::ZERO);
    pub const UNIT_Z: Self = Self::new(Fixed::ZERO, Fixed::ZERO, Fixed::ONE);

    pub const fn new(x: Fixed, y: Fixed, z: Fixed) -> Self {
        Self { x, y, z }
    }

    pub const fn from_ints(x: i32, y: i32, z: i32) -> Self {
        Self::new(Fixed::from_int(x), Fixed::from_int(y), Fixed::from_int(z))
    }

    /// Converts float components, truncating toward zero.
    pub fn from_f32(x: f32, y: f32, z: f32) -> Self {
        Self::new(Fixed::from_f32(x), Fixed::from_f32(y), Fixed::from_f32(z))
    }

    /// Dot product, accumulated exactly and rounded once.
    pub fn dot(&self, other: Self) -> Fixed {
        Fixed::from_wide(
            self.x.mul_wide(other.x) + self.y.mul_wide(other.y) + self.z.mul_wide(other.z),
        )
    }

    /// Returns the cross product of two vectors.
    /// Each component is one exact difference of products, rounded once.
    pub fn cross(&self, other: Self) -> Self {
        Self {
            x: Fixed::from_wide(self.y.mul_wide(other.z) - self.z.mul_wide(other.y)),
            y: Fixed::from_wide(self.z.mul_wide(other.x) - self.x.mul_wide(other.z)),
            z: Fixed::from_wide(self.x.mul_wide(other.y) - self.y.mul_wide(other.x)),
        }
    }

    /// Squared length with 32 fractional bits, without rounding.
    pub fn length_squared_wide(&self) -> u64 {
        let sq = |c: Fixed| {
            let a = c.raw().unsigned_abs() as u64;
            a * a
        };
        sq(self.x) + sq(self.y) + sq(self.z)
    }

    /// Floor of the exact Euclidean length.
    pub fn length(&self) -> Fixed {
        Fixed::from_raw(isqrt_u64(self.length_squared_wide()) as i32)
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    ///
    /// The length is taken with 47 fractional bits, so vectors only a few
    /// raw units long still come out within one unit of length one.
    pub fn normalize(&self) -> Option<Self> {
        let length = isqrt_u128((self.length_squared_wide() as u128) << 62) as i128;
        if length == 0 {
            return None;
        }
        let unit = |c: Fixed| Fixed::from_raw((((c.raw() as i128) << 47) / length) as i32);
        Some(Self::new(unit(self.x), unit(self.y), unit(self.z)))
    }

    pub fn scale(&self, s: Fixed) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<Fixed> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: Fixed) -> Self::Output {
        self.scale(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cross_of_axes() {
        assert_eq!(Vec3::UNIT_X.cross(Vec3::UNIT_Y), Vec3::UNIT_Z);
        assert_eq!(Vec3::UNIT_Y.cross(Vec3::UNIT_Z), Vec3::UNIT_X);
        assert_eq!(Vec3::UNIT_Y.cross(Vec3::UNIT_X), -Vec3::UNIT_Z);
    }

    #[test]
    fn dot_and_length() {
        let v = Vec3::from_ints(3, 4, 12);
        assert_eq!(v.dot(v), Fixed::from_int(169));
        assert_eq!(v.length(), Fixed::from_int(13));
    }

    #[test]
    fn normalize_produces_unit_length() {
        let n = Vec3::from_ints(-5, -5, -5).normalize().unwrap();
        let expected = -1.0 / 3.0f64.sqrt();
        assert_relative_eq!(n.x.to_f64(), expected, epsilon = 1e-4);
        assert_relative_eq!(n.length().to_f64(), 1.0, epsilon = 1e-4);
    }

    #[test]
    fn normalize_is_exact_for_tiny_vectors() {
        let tiny = Vec3::new(Fixed::from_raw(1), Fixed::from_raw(1), Fixed::ZERO);
        let n = tiny.normalize().unwrap();
        assert_relative_eq!(n.x.to_f64(), 0.5f64.sqrt(), epsilon = 2e-5);
        assert_eq!(n.x, n.y);
        assert_relative_eq!(n.length().to_f64(), 1.0, epsilon = 1e-4);

        let short = Vec3::new(Fixed::ZERO, Fixed::from_raw(65), Fixed::ZERO);
        assert_eq!(short.normalize(), Some(Vec3::UNIT_Y));
    }

    #[test]
    fn normalize_zero_is_none() {
        assert_eq!(Vec3::ZERO.normalize(), None);
    }
}
