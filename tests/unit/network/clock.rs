use super::*;
use crate::blueprint::model::{EntityKind, Wire};
use crate::foundation::core::{EntityId, GridSize, Position};
use crate::network::decoder::DecoderNetworkBuilder;
use crate::network::lamp::LampMatrixBuilder;
use crate::network::storage::{CoverPlan, StorageNetworkBuilder};
use crate::source::frame::{MemoryFrameSource, PixelGrid};

fn layout() -> NetworkLayout {
    let pool: Vec<String> = ["A", "B"].iter().map(|s| format!("signal-{s}")).collect();
    NetworkLayout::new(
        GridSize::new(2, 4).unwrap(),
        10,
        500,
        5,
        &pool,
        "signal-heart".to_string(),
    )
    .unwrap()
}

fn graph_before_clock(l: &NetworkLayout) -> (BlueprintGraph, Cursor, u32) {
    let mut g = BlueprintGraph::new();
    let c = LampMatrixBuilder::build(l, &mut g, Cursor::start()).unwrap();
    let c = DecoderNetworkBuilder::build(l, &mut g, c).unwrap();
    let mut src = MemoryFrameSource::new(vec![PixelGrid::filled(2, 4, [255, 255, 255]); 2]);
    let summary = StorageNetworkBuilder::new(l, 0, CoverPlan::default())
        .build(&mut g, c, &mut src)
        .unwrap();
    (g, summary.cursor, summary.slots)
}

fn arithmetic(g: &BlueprintGraph, id: EntityId) -> (ArithmeticOp, i32, String) {
    match &g.entity(id).unwrap().kind {
        EntityKind::Arithmetic(a) => {
            let c = &a.control_behavior.arithmetic_conditions;
            assert_eq!(c.first_signal.name, "signal-heart");
            assert_eq!(c.output_signal.name, "signal-heart");
            (c.operation, c.second_constant, c.first_signal.name.clone())
        }
        other => panic!("expected arithmetic, got {}", other.prototype()),
    }
}

#[test]
fn closes_the_graph_with_three_entities() {
    let l = layout();
    let (mut g, cursor, slots) = graph_before_clock(&l);
    assert_eq!(slots, 2);
    let before = g.len();

    let end = ClockBuilder::build(&l, &mut g, cursor, slots).unwrap();
    assert_eq!(g.len(), before + 3);
    assert_eq!(g.len() as u32, l.entity_count(slots));
    assert_eq!(end.next_id.0, l.entity_count(slots) + 1);
}

#[test]
fn seed_starts_switched_off() {
    let l = layout();
    let (mut g, cursor, slots) = graph_before_clock(&l);
    ClockBuilder::build(&l, &mut g, cursor, slots).unwrap();

    let seed = g.entity(l.clock_id(slots, ClockPart::Seed)).unwrap();
    assert_eq!(seed.direction, Some(CLOCK_FACING));
    match &seed.kind {
        EntityKind::Constant(c) => {
            assert_eq!(c.control_behavior.is_on, Some(false));
            let f = c.filters();
            assert_eq!(f.len(), 1);
            assert_eq!(f[0].name, "signal-heart");
            assert_eq!(f[0].count, 1);
        }
        other => panic!("expected constant, got {}", other.prototype()),
    }
}

#[test]
fn counter_and_buffer_are_identity_ops() {
    let l = layout();
    let (mut g, cursor, slots) = graph_before_clock(&l);
    ClockBuilder::build(&l, &mut g, cursor, slots).unwrap();

    let counter = l.clock_id(slots, ClockPart::Counter);
    let buffer = l.clock_id(slots, ClockPart::Buffer);
    assert_eq!(arithmetic(&g, counter).0, ArithmeticOp::Add);
    assert_eq!(arithmetic(&g, counter).1, 0);
    assert_eq!(arithmetic(&g, buffer).0, ArithmeticOp::Divide);
    assert_eq!(arithmetic(&g, buffer).1, 1);
    assert_eq!(g.entity(buffer).unwrap().direction, Some(CLOCK_FACING));
}

#[test]
fn wires_the_feedback_loop() {
    let l = layout();
    let (mut g, cursor, slots) = graph_before_clock(&l);
    let wires_before = g.wires().len();
    ClockBuilder::build(&l, &mut g, cursor, slots).unwrap();

    let seed = l.clock_id(slots, ClockPart::Seed);
    let counter = l.clock_id(slots, ClockPart::Counter);
    let buffer = l.clock_id(slots, ClockPart::Buffer);
    assert_eq!(
        &g.wires()[wires_before..],
        &[
            Wire::from((seed, Pole::GreenIn, counter, Pole::GreenIn)),
            Wire::from((counter, Pole::RedIn, counter, Pole::RedOut)),
            Wire::from((counter, Pole::GreenOut, buffer, Pole::GreenIn)),
        ]
    );
}

#[test]
fn sits_above_the_storage_block() {
    let l = layout();
    let seed = l.clock_position(ClockPart::Seed);
    assert!(seed.x >= 12.0);
    assert_eq!(l.clock_position(ClockPart::Counter), seed.down(1.5));
    assert_eq!(l.clock_position(ClockPart::Buffer), Position::new(seed.x, seed.y + 3.5));
}

#[test]
fn rejects_a_misplaced_cursor() {
    let l = layout();
    let (mut g, cursor, slots) = graph_before_clock(&l);
    assert!(ClockBuilder::build(&l, &mut g, cursor, slots + 1).is_err());
}
