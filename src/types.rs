/// 16-bit signed machine word carried by every pin.
pub type Word = i16;

/// Widest pin a part may declare.
pub const MAX_WIDTH: u8 = 16;

pub fn is_valid_width(width: u8) -> bool {
    (1..=MAX_WIDTH).contains(&width)
}

fn width_mask(width: u8) -> u32 {
    (1u32 << width) - 1
}

/// Wraps `value` into `width` bits.
///
/// This is the only write policy pins apply: out-of-range values are
/// truncated to their low `width` bits, never rejected and never widened.
/// Narrow pins hold the unsigned residue; a 16-bit pin reinterprets the low
/// half-word as two's complement.
pub fn fit_to_width(value: i32, width: u8) -> Word {
    let low = (value as u32) & width_mask(width.min(MAX_WIDTH));
    low as u16 as Word
}

/// Whether `value` can be stored in `width` bits without wrapping.
///
/// A 16-bit pin accepts both signed and unsigned half-word notation.
pub fn fits_width(value: i32, width: u8) -> bool {
    if width >= MAX_WIDTH {
        (i16::MIN as i32..=u16::MAX as i32).contains(&value)
    } else {
        (0..=width_mask(width) as i32).contains(&value)
    }
}
