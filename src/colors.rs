//! Packed ARGB8888 colors used by the framebuffer.

pub const BACKGROUND: u32 = 0xFF1E1E1E;
pub const FILL: u32 = 0xFFD8D8D8;
pub const BLACK: u32 = 0xFF000000;
pub const WHITE: u32 = 0xFFFFFFFF;

/// Packs 8-bit channels into `0xAARRGGBB`.
#[inline]
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Unpacks `0xAARRGGBB` into `[a, r, g, b]`.
#[inline]
pub const fn channels(color: u32) -> [u8; 4] {
    [
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    ]
}

/// Per-channel average, rounded to nearest (used by the multisample resolve).
pub fn average(colors: &[u32]) -> u32 {
    if colors.is_empty() {
        return 0;
    }
    let mut sums = [0u32; 4];
    for &c in colors {
        for (sum, ch) in sums.iter_mut().zip(channels(c)) {
            *sum += ch as u32;
        }
    }
    let n = colors.len() as u32;
    let avg = sums.map(|s| ((s + n / 2) / n) as u8);
    argb(avg[0], avg[1], avg[2], avg[3])
}
