//! Lossy R8G8B8 -> R3G3B2 color compression and 4-way packing into signed 32-bit words.
//!
//! The combinator arithmetic in the target engine works on wrapping `i32`, so a packed word
//! whose top bit is set is carried as its two's-complement negative value.

use crate::source::frame::PixelGrid;

/// Compressed pixels carried per packed word.
pub const CODES_PER_WORD: u32 = 4;

/// Mask keeping the 3 most significant bits of a channel.
pub const MASK_3BIT: u8 = 0b1110_0000;
/// Mask keeping the 2 most significant bits of a channel.
pub const MASK_2BIT: u8 = 0b1100_0000;

/// Compress one pixel to `RRRGGGBB`.
pub fn compress(r: u8, g: u8, b: u8) -> u8 {
    (r & MASK_3BIT) | ((g & MASK_3BIT) >> 3) | ((b & MASK_2BIT) >> 6)
}

/// Approximate inverse of [`compress`]: each channel keeps its top bits, low bits are zero.
pub fn decompress(code: u8) -> (u8, u8, u8) {
    (
        code & 0b1110_0000,
        (code & 0b0001_1100) << 3,
        (code & 0b0000_0011) << 6,
    )
}

/// Concatenate four codes big-endian and reinterpret as two's complement.
pub fn pack4(codes: [u8; 4]) -> i32 {
    i32::from_be_bytes(codes)
}

/// Split a packed word back into its four codes.
pub fn unpack4(word: i32) -> [u8; 4] {
    word.to_be_bytes()
}

/// Pack one grid column, top to bottom, four rows per word.
///
/// Rows past the bottom of the grid pad with code 0.
pub fn pack_column(grid: &PixelGrid, col: u32) -> Vec<i32> {
    let words = grid.height.div_ceil(CODES_PER_WORD);
    (0..words)
        .map(|w| {
            let mut codes = [0u8; 4];
            for (i, code) in codes.iter_mut().enumerate() {
                let row = w * CODES_PER_WORD + i as u32;
                if row < grid.height {
                    let [r, g, b] = grid.pixel(col, row);
                    *code = compress(r, g, b);
                }
            }
            pack4(codes)
        })
        .collect()
}

/// Pack every column of the grid, left to right.
pub fn pack_frame(grid: &PixelGrid) -> Vec<Vec<i32>> {
    (0..grid.width).map(|c| pack_column(grid, c)).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/color/codec.rs"]
mod tests;
