use super::*;
use crate::blueprint::model::EntityKind;
use crate::foundation::error::LampreelError;
use crate::source::frame::{MemoryFrameSource, PixelGrid};

fn small_config() -> GeneratorConfig {
    GeneratorConfig {
        height: 4,
        ..GeneratorConfig::default()
    }
}

fn clip(frames: usize) -> MemoryFrameSource {
    // 2:1 source, so a 4-row player is 8 lamps wide.
    MemoryFrameSource::new(
        (0..frames)
            .map(|i| PixelGrid::filled(32, 16, [(i as u8) * 40, 0, 255]))
            .collect(),
    )
}

#[test]
fn builds_every_block_in_id_order() {
    let g = generate_player(&mut clip(3), &small_config()).unwrap();
    let r = g.report;
    assert_eq!(r.grid, GridSize::new(8, 4).unwrap());
    assert_eq!((r.content_frames, r.slots), (3, 5));
    assert!(r.before_cover && r.after_cover);

    // lamps + decoder chains + storage pairs + clock
    let expected = 32 + 32 * 8 + 5 * 8 * 2 + 3;
    assert_eq!(r.entities, expected);
    assert_eq!(g.blueprint.entities.len(), expected);
    assert!(matches!(g.blueprint.entities[0].kind, EntityKind::Lamp(_)));
    assert!(matches!(
        g.blueprint.entities[expected - 1].kind,
        EntityKind::Arithmetic(_)
    ));
    g.blueprint.validate().unwrap();
}

#[test]
fn empty_source_fails_before_building() {
    let err = generate_player(&mut MemoryFrameSource::new(Vec::new()), &small_config())
        .unwrap_err();
    assert!(matches!(err, LampreelError::Source(_)));
}

#[test]
fn invalid_config_is_rejected() {
    let cfg = GeneratorConfig {
        height: 5,
        ..GeneratorConfig::default()
    };
    let err = generate_player(&mut clip(1), &cfg).unwrap_err();
    assert!(matches!(err, LampreelError::Validation(_)));
}

#[test]
fn string_output_decodes_back() {
    let (text, report) = generate_blueprint_string(&mut clip(2), &small_config()).unwrap();
    assert!(text.starts_with('0'));
    let doc = codec::decode(&text).unwrap();
    assert_eq!(doc.blueprint.entities.len(), report.entities);
    assert_eq!(doc.blueprint.wires.len(), report.wires);
}
