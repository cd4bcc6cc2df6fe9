//! Deterministic sine/cosine/tangent via CORDIC.
//!
//! The rotation runs in Q2.30 on 64-bit integers and is rounded to Q16.16
//! once at the end, so results are accurate to about one raw unit.

use super::fixed::Fixed;

const Q30_SHIFT: u32 = 30 - super::fixed::FRAC_BITS;

const PI_Q30: i64 = 3_373_259_426;
const FRAC_PI_2_Q30: i64 = 1_686_629_713;
const TAU_Q30: i64 = 2 * PI_Q30;

/// Product of `1 / sqrt(1 + 2^-2i)` over all iterations, in Q2.30.
const CORDIC_GAIN_Q30: i64 = 652_032_874;

/// `atan(2^-i)` in Q2.30.
const ATAN_TABLE_Q30: [i64; 30] = [
    843_314_857, 497_837_829, 263_043_837, 133_525_159, 67_021_687, 33_543_516, 16_775_851,
    8_388_437, 4_194_283, 2_097_149, 1_048_576, 524_288, 262_144, 131_072, 65_536, 32_768,
    16_384, 8_192, 4_096, 2_048, 1_024, 512, 256, 128, 64, 32, 16, 8, 4, 2,
];

/// Returns `(sin, cos)` in Q2.30.
fn sin_cos_q30(angle: Fixed) -> (i64, i64) {
    let mut z = ((angle.raw() as i64) << Q30_SHIFT).rem_euclid(TAU_Q30);
    if z > PI_Q30 {
        z -= TAU_Q30;
    }

    // CORDIC converges on [-pi/2, pi/2]; fold the rest with sin(a - pi) = -sin(a).
    let mut flip = false;
    if z > FRAC_PI_2_Q30 {
        z -= PI_Q30;
        flip = true;
    } else if z < -FRAC_PI_2_Q30 {
        z += PI_Q30;
        flip = true;
    }

    let mut x = CORDIC_GAIN_Q30;
    let mut y = 0i64;
    for (i, &step) in ATAN_TABLE_Q30.iter().enumerate() {
        let (dx, dy) = (y >> i, x >> i);
        if z >= 0 {
            x -= dx;
            y += dy;
            z -= step;
        } else {
            x += dx;
            y -= dy;
            z += step;
        }
    }

    if flip {
        (-y, -x)
    } else {
        (y, x)
    }
}

fn q30_to_fixed(v: i64) -> Fixed {
    Fixed::from_raw(((v + (1 << (Q30_SHIFT - 1))) >> Q30_SHIFT) as i32)
}

pub fn sin_cos(angle: Fixed) -> (Fixed, Fixed) {
    let (s, c) = sin_cos_q30(angle);
    (q30_to_fixed(s), q30_to_fixed(c))
}

pub fn tan(angle: Fixed) -> Fixed {
    let (s, c) = sin_cos_q30(angle);
    if c == 0 {
        return if s >= 0 { Fixed::MAX } else { Fixed::MIN };
    }
    let q = (s << super::fixed::FRAC_BITS) / c;
    Fixed::from_raw(q.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
}
