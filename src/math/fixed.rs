//! Q16.16 signed fixed-point scalar.
//!
//! Every value in the transform, clip and raster path is a [`Fixed`]: a
//! 32-bit two's complement integer with 16 integer bits and 16 fractional
//! bits (`65536 = 1.0`). All operations are plain integer arithmetic, so
//! results are bit-identical on every platform.
//!
//! # Rounding
//!
//! | Operation | Policy |
//! |-----------|--------|
//! | [`Fixed::from_f32`] | truncation toward zero, saturating at the `i32` range |
//! | [`Fixed::to_int`] | truncation toward zero |
//! | `a * b` | exact 64-bit product, round half up on the shift back |
//! | `a / b` | truncation toward zero; division by zero saturates |
//! | [`Fixed::sqrt`] | floor of the exact square root |
//!
//! # Overflow
//!
//! Overflow is not checked. Addition and subtraction wrap; products and
//! quotients are truncated to 32 bits after the 64-bit step. Callers keep
//! coordinates inside the scene's bounded range so intermediate products fit
//! in 64 bits before shifting back.

use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// Number of fractional bits.
pub const FRAC_BITS: u32 = 16;

const ONE_RAW: i32 = 1 << FRAC_BITS;
const HALF_RAW: i64 = 1 << (FRAC_BITS - 1);

/// Signed Q16.16 fixed-point number.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Fixed(i32);

impl Fixed {
    pub const ZERO: Fixed = Fixed(0);
    pub const ONE: Fixed = Fixed(ONE_RAW);
    pub const HALF: Fixed = Fixed(ONE_RAW / 2);
    /// Smallest positive value (one raw unit, 2^-16).
    pub const EPSILON: Fixed = Fixed(1);
    pub const MAX: Fixed = Fixed(i32::MAX);
    pub const MIN: Fixed = Fixed(i32::MIN);
    pub const PI: Fixed = Fixed(205_887);
    pub const FRAC_PI_2: Fixed = Fixed(102_944);
    pub const TAU: Fixed = Fixed(411_775);

    /// Wraps a raw Q16.16 bit pattern.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// The raw Q16.16 bit pattern.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Converts an integer. Values outside `-32768..=32767` wrap.
    #[inline]
    pub const fn from_int(i: i32) -> Self {
        Fixed(i << FRAC_BITS)
    }

    /// Converts a float, truncating toward zero.
    ///
    /// Out-of-range values saturate to [`Fixed::MAX`]/[`Fixed::MIN`] and NaN
    /// becomes zero.
    #[inline]
    pub fn from_f32(f: f32) -> Self {
        Fixed((f * ONE_RAW as f32) as i32)
    }

    /// Integer part, truncated toward zero.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 / ONE_RAW
    }

    /// Largest integer not greater than `self`.
    #[inline]
    pub const fn floor(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Smallest integer not less than `self`.
    #[inline]
    pub const fn ceil(self) -> i32 {
        ((self.0 as i64 + (ONE_RAW as i64 - 1)) >> FRAC_BITS) as i32
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / ONE_RAW as f32
    }

    /// Exact conversion to `f64` (every Q16.16 value is representable).
    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / ONE_RAW as f64
    }

    /// Exact product with 32 fractional bits, for accumulating sums of
    /// products before a single rounding with [`Fixed::from_wide`].
    #[inline]
    pub const fn mul_wide(self, rhs: Fixed) -> i64 {
        self.0 as i64 * rhs.0 as i64
    }

    /// Rounds a value with 32 fractional bits back to Q16.16 (round half up).
    #[inline]
    pub const fn from_wide(wide: i64) -> Self {
        Fixed(((wide + HALF_RAW) >> FRAC_BITS) as i32)
    }

    /// Division returning `None` when `rhs` is zero.
    #[inline]
    pub fn checked_div(self, rhs: Fixed) -> Option<Fixed> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Fixed((((self.0 as i64) << FRAC_BITS) / rhs.0 as i64) as i32))
    }

    /// `1 / self`, with the same policy as `/`.
    #[inline]
    pub fn recip(self) -> Fixed {
        Fixed::ONE / self
    }

    /// Floor of the square root. Negative input yields zero.
    pub fn sqrt(self) -> Fixed {
        if self.0 <= 0 {
            return Fixed::ZERO;
        }
        Fixed(isqrt_u64((self.0 as u64) << FRAC_BITS) as i32)
    }

    #[inline]
    pub const fn abs(self) -> Fixed {
        Fixed(self.0.wrapping_abs())
    }

    #[inline]
    pub fn min(self, other: Fixed) -> Fixed {
        Fixed(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Fixed) -> Fixed {
        Fixed(self.0.max(other.0))
    }

    #[inline]
    pub fn clamp(self, lo: Fixed, hi: Fixed) -> Fixed {
        Fixed(self.0.clamp(lo.0, hi.0))
    }

    /// `-ONE`, `ZERO` or `ONE`.
    #[inline]
    pub const fn signum(self) -> Fixed {
        Fixed(self.0.signum() << FRAC_BITS)
    }

    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Sine and cosine of an angle in radians (CORDIC, see [`super::trig`]).
    #[inline]
    pub fn sin_cos(self) -> (Fixed, Fixed) {
        super::trig::sin_cos(self)
    }

    /// Tangent of an angle in radians. Saturates where the cosine vanishes.
    #[inline]
    pub fn tan(self) -> Fixed {
        super::trig::tan(self)
    }
}

/// Floor of the square root of a 64-bit integer (digit-by-digit method).
pub(crate) fn isqrt_u64(n: u64) -> u64 {
    let mut rem = n;
    let mut root = 0u64;
    let mut bit = 1u64 << 62;

    while bit > rem {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

/// Floor of the square root of a 128-bit integer.
pub(crate) fn isqrt_u128(n: u128) -> u128 {
    let mut rem = n;
    let mut root = 0u128;
    let mut bit = 1u128 << 126;

    while bit > rem {
        bit >>= 2;
    }
    while bit != 0 {
        if rem >= root + bit {
            rem -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }
    root
}

impl From<i32> for Fixed {
    fn from(i: i32) -> Self {
        Fixed::from_int(i)
    }
}

impl Add for Fixed {
    type Output = Fixed;
    #[inline]
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    #[inline]
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0.wrapping_sub(rhs.0))
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    #[inline]
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::from_wide(self.mul_wide(rhs))
    }
}

/// Truncating division; `x / 0` saturates to `MAX` or `MIN` by the sign of
/// `x`, and `0 / 0` is zero.
impl Div for Fixed {
    type Output = Fixed;
    #[inline]
    fn div(self, rhs: Fixed) -> Fixed {
        match self.checked_div(rhs) {
            Some(q) => q,
            None if self.0 > 0 => Fixed::MAX,
            None if self.0 < 0 => Fixed::MIN,
            None => Fixed::ZERO,
        }
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    #[inline]
    fn neg(self) -> Fixed {
        Fixed(self.0.wrapping_neg())
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Fixed) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Fixed) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, rhs: Fixed) {
        *self = *self * rhs;
    }
}

impl DivAssign for Fixed {
    #[inline]
    fn div_assign(&mut self, rhs: Fixed) {
        *self = *self / rhs;
    }
}

impl fmt::Debug for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fixed({})", self.to_f64())
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn int_round_trip() {
        for i in [-32768, -1000, -1, 0, 1, 7, 255, 1000, 32767] {
            assert_eq!(Fixed::from_int(i).to_int(), i);
        }
    }

    #[test]
    fn float_round_trip_within_one_unit() {
        let unit = 1.0 / 65536.0;
        let mut f = -1000.0f32;
        while f < 1000.0 {
            let back = Fixed::from_f32(f).to_f64();
            assert!((back - f as f64).abs() <= unit, "{} -> {}", f, back);
            f += 0.371;
        }
    }

    #[test]
    fn from_f32_truncates_toward_zero() {
        // 1.5 raw units each way
        let step = 1.5 / 65536.0;
        assert_eq!(Fixed::from_f32(step).raw(), 1);
        assert_eq!(Fixed::from_f32(-step).raw(), -1);
        assert_eq!(Fixed::from_f32(f32::NAN), Fixed::ZERO);
        assert_eq!(Fixed::from_f32(1.0e12), Fixed::MAX);
    }

    #[test]
    fn to_int_truncates_and_floor_rounds_down() {
        let v = Fixed::from_f32(-2.5);
        assert_eq!(v.to_int(), -2);
        assert_eq!(v.floor(), -3);
        assert_eq!(v.ceil(), -2);
        assert_eq!(Fixed::from_f32(2.25).ceil(), 3);
        assert_eq!(Fixed::from_int(4).ceil(), 4);
    }

    #[test]
    fn multiply_rounds_half_up() {
        let a = Fixed::from_f32(1.5);
        assert_eq!(a * a, Fixed::from_f32(2.25));
        assert_eq!(Fixed::EPSILON * Fixed::HALF, Fixed::EPSILON);
        assert_eq!(-Fixed::EPSILON * Fixed::HALF, Fixed::ZERO);
        assert_eq!(Fixed::from_int(-3) * Fixed::from_int(4), Fixed::from_int(-12));
    }

    #[test]
    fn divide_truncates_toward_zero() {
        let third = Fixed::ONE / Fixed::from_int(3);
        assert_eq!(third.raw(), 21845);
        assert_eq!((-Fixed::ONE / Fixed::from_int(3)).raw(), -21845);
        assert_eq!(Fixed::from_int(7) / Fixed::from_int(2), Fixed::from_f32(3.5));
    }

    #[test]
    fn divide_by_zero_saturates() {
        assert_eq!(Fixed::ONE / Fixed::ZERO, Fixed::MAX);
        assert_eq!(-Fixed::ONE / Fixed::ZERO, Fixed::MIN);
        assert_eq!(Fixed::ZERO / Fixed::ZERO, Fixed::ZERO);
        assert_eq!(Fixed::ONE.checked_div(Fixed::ZERO), None);
    }

    #[test]
    fn recip_of_power_of_two_is_exact() {
        assert_eq!(Fixed::from_int(4).recip(), Fixed::from_f32(0.25));
    }

    #[test]
    fn sqrt_is_floor_of_exact_root() {
        assert_eq!(Fixed::from_int(4).sqrt(), Fixed::from_int(2));
        assert_eq!(Fixed::from_int(2).sqrt().raw(), 92681);
        assert_eq!(Fixed::from_int(-4).sqrt(), Fixed::ZERO);
        assert_relative_eq!(Fixed::from_f32(0.25).sqrt().to_f32(), 0.5);
    }

    #[test]
    fn isqrt_matches_small_squares() {
        for n in 0u64..2000 {
            let r = isqrt_u64(n);
            assert!(r * r <= n && (r + 1) * (r + 1) > n);
        }
        assert_eq!(isqrt_u64(u64::MAX), u32::MAX as u64);
    }

    #[test]
    fn isqrt_u128_handles_wide_inputs() {
        assert_eq!(isqrt_u128(1 << 94), 1 << 47);
        assert_eq!(isqrt_u128((1 << 94) - 1), (1 << 47) - 1);
        assert_eq!(isqrt_u128(u128::MAX), u64::MAX as u128);
    }

    #[test]
    fn wide_accumulation_rounds_once() {
        let a = Fixed::from_raw(3);
        let b = Fixed::HALF;
        // Each product is 1.5 raw units; rounding separately would give 4.
        let wide = a.mul_wide(b) + a.mul_wide(b);
        assert_eq!(Fixed::from_wide(wide).raw(), 3);
        assert_eq!((a * b + a * b).raw(), 4);
    }

    #[test]
    fn signum_and_abs() {
        assert_eq!(Fixed::from_f32(-0.25).signum(), -Fixed::ONE);
        assert_eq!(Fixed::ZERO.signum(), Fixed::ZERO);
        assert_eq!(Fixed::from_f32(-0.25).abs(), Fixed::from_f32(0.25));
    }
}
