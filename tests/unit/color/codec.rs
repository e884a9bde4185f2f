use super::*;

#[test]
fn compress_keeps_top_bits_per_channel() {
    assert_eq!(compress(0xFF, 0xFF, 0xFF), 0xFF);
    assert_eq!(compress(0, 0, 0), 0);
    assert_eq!(compress(0xFF, 0, 0), 0b1110_0000);
    assert_eq!(compress(0, 0xFF, 0), 0b0001_1100);
    assert_eq!(compress(0, 0, 0xFF), 0b0000_0011);
    // Low bits are discarded.
    assert_eq!(compress(0x1F, 0x1F, 0x3F), 0);
}

#[test]
fn compress_decompress_compress_is_idempotent() {
    // Every channel value is exercised in each slot; full 24-bit sweep is covered by
    // channel independence of the mask/shift layout.
    for v in 0..=255u8 {
        for (r, g, b) in [(v, 0, 0), (0, v, 0), (0, 0, v), (v, v, v), (v, 255 - v, v / 3)] {
            let c = compress(r, g, b);
            let (dr, dg, db) = decompress(c);
            assert_eq!(compress(dr, dg, db), c);
        }
    }
}

#[test]
fn decompress_is_approximate() {
    let (r, g, b) = decompress(compress(200, 100, 50));
    assert!(r <= 200 && 200 - r < 32);
    assert!(g <= 100 && 100 - g < 32);
    assert!(b <= 50 && 50 - b < 64);
}

#[test]
fn pack4_all_ones_is_minus_one() {
    assert_eq!(pack4([0xFF, 0xFF, 0xFF, 0xFF]), -1);
    assert_eq!(pack4([0x7F, 0xFF, 0xFF, 0xFF]), i32::MAX);
    assert_eq!(pack4([0x80, 0, 0, 0]), i32::MIN);
    assert_eq!(pack4([0, 0, 0, 1]), 1);
    assert_eq!(pack4([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
}

#[test]
fn pack4_is_injective() {
    let samples = [
        [0u8, 0, 0, 0],
        [0, 0, 0, 1],
        [1, 0, 0, 0],
        [0xFF, 0, 0, 0],
        [0, 0xFF, 0, 0],
        [0xE0, 0x1C, 0x03, 0xFF],
        [0xFF, 0xFF, 0xFF, 0xFE],
        [0xFF, 0xFF, 0xFF, 0xFF],
    ];
    let mut seen = std::collections::BTreeSet::new();
    for codes in samples {
        let w = pack4(codes);
        assert_eq!(unpack4(w), codes);
        assert!(seen.insert(w));
    }
}

#[test]
fn pack_column_is_top_to_bottom() {
    // 1 column, 8 rows: white, black, red, green, blue, white, white, white.
    let px: [[u8; 3]; 8] = [
        [255, 255, 255],
        [0, 0, 0],
        [255, 0, 0],
        [0, 255, 0],
        [0, 0, 255],
        [255, 255, 255],
        [255, 255, 255],
        [255, 255, 255],
    ];
    let grid = PixelGrid::new(1, 8, px.concat()).unwrap();
    let col = pack_column(&grid, 0);
    assert_eq!(col, vec![pack4([0xFF, 0, 0xE0, 0x1C]), pack4([0x03, 0xFF, 0xFF, 0xFF])]);
}

#[test]
fn pack_column_pads_partial_words() {
    let grid = PixelGrid::filled(2, 5, [255, 255, 255]);
    let frame = pack_frame(&grid);
    assert_eq!(frame.len(), 2);
    assert_eq!(frame[1], vec![-1, pack4([0xFF, 0, 0, 0])]);
}
