use super::*;

fn pool(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("signal-{}", (b'A' + i as u8) as char)).collect()
}

fn layout(w: u32, h: u32) -> NetworkLayout {
    NetworkLayout::new(
        GridSize::new(w, h).unwrap(),
        10,
        500,
        5,
        &pool(25),
        "signal-heart".to_string(),
    )
    .unwrap()
}

#[test]
fn lamp_ids_are_column_major() {
    let l = layout(4, 8);
    assert_eq!(l.lamp_id(0, 0), EntityId(1));
    assert_eq!(l.lamp_id(0, 7), EntityId(8));
    assert_eq!(l.lamp_id(1, 0), EntityId(9));
    assert_eq!(l.lamp_id(3, 7), EntityId(32));
    assert_eq!(l.lamp_position(2, 5), Position::new(2.0, 5.0));
}

#[test]
fn decoder_ids_follow_the_chain_formula() {
    let l = layout(4, 8);
    assert_eq!(l.decoder_base(), EntityId(33));
    assert_eq!(l.decoder_id(0, 0, 0, ChainPart::ScaleDown), EntityId(33));
    assert_eq!(l.decoder_id(0, 0, 0, ChainPart::RedShift), EntityId(36));
    assert_eq!(l.decoder_id(0, 0, 1, ChainPart::ScaleDown), EntityId(41));
    assert_eq!(l.decoder_id(0, 1, 0, ChainPart::ScaleDown), EntityId(33 + 32));
    // Column stride is H·8.
    assert_eq!(
        l.decoder_id(1, 0, 0, ChainPart::RedShift).0 - l.decoder_id(0, 0, 0, ChainPart::RedShift).0,
        64
    );
    assert_eq!(l.decoder_id(3, 1, 3, ChainPart::BlueShift), EntityId(32 + 256));
}

#[test]
fn decoder_for_lamp_matches_decoder_id() {
    let l = layout(4, 8);
    for col in 0..4 {
        for row in 0..8 {
            assert_eq!(
                l.decoder_for_lamp(l.lamp_id(col, row)),
                l.decoder_id(col, row / 4, row % 4, ChainPart::ScaleDown)
            );
        }
    }
}

#[test]
fn storage_and_clock_blocks_follow_the_decoder() {
    let l = layout(4, 8);
    assert_eq!(l.storage_base(), EntityId(9 * 32 + 1));
    assert_eq!(l.storage_gate_id(0, 0), l.storage_base());
    assert_eq!(l.storage_constant_id(0, 0), l.storage_base().offset(1));
    assert_eq!(l.storage_gate_id(0, 1), l.storage_base().offset(2));
    assert_eq!(l.storage_gate_id(1, 0), l.storage_base().offset(8));
    assert_eq!(l.clock_base(5), l.storage_base().offset(2 * 4 * 5));
    assert_eq!(l.clock_id(5, ClockPart::Buffer), l.clock_base(5).offset(2));
    assert_eq!(l.entity_count(5), 32 * 9 + 40 + 3);
}

#[test]
fn storage_positions_wrap_into_layers() {
    let mut l = layout(4, 8);
    l.layer_size = 2;
    assert_eq!(l.storage_layer(3), (1, 1));
    assert_eq!(l.storage_gate_position(0, 0), Position::new(14.0, 25.0));
    assert_eq!(l.storage_constant_position(0, 0), Position::new(14.0, 26.5));
    assert_eq!(l.storage_gate_position(1, 2), Position::new(16.0, 28.0));
    // Second layer starts W + layer_distance further right, back at the top.
    assert_eq!(l.storage_gate_position(2, 0), Position::new(23.0, 25.0));
}

#[test]
fn clock_sits_above_the_storage() {
    let l = layout(4, 8);
    assert_eq!(l.clock_position(ClockPart::Seed), Position::new(14.0, 8.0));
    assert_eq!(l.clock_position(ClockPart::Counter), Position::new(14.0, 9.5));
    assert_eq!(l.clock_position(ClockPart::Buffer), Position::new(14.0, 11.5));
}

#[test]
fn layout_validation() {
    let grid = GridSize::new(4, 6).unwrap();
    assert!(NetworkLayout::new(grid, 10, 500, 5, &pool(25), "signal-heart".into()).is_err());

    let grid = GridSize::new(4, 16).unwrap();
    assert!(NetworkLayout::new(grid, 10, 500, 5, &pool(3), "signal-heart".into()).is_err());
    assert!(NetworkLayout::new(grid, 10, 0, 5, &pool(4), "signal-heart".into()).is_err());
    assert!(NetworkLayout::new(grid, 10, 500, 5, &pool(4), "signal-B".into()).is_err());
    // Pool entries past the needed words may overlap the clock.
    let l = NetworkLayout::new(grid, 10, 500, 5, &pool(5), "signal-E".into()).unwrap();
    assert_eq!(l.channels.len(), 4);
}

#[test]
fn cursor_checks_block_start() {
    let c = Cursor::start();
    c.expect(EntityId(1), "lamp").unwrap();
    assert!(c.expect(EntityId(2), "lamp").is_err());
}
