use crate::{
    blueprint::graph::BlueprintGraph,
    blueprint::model::{ArithmeticOp, Entity, SignalId},
    foundation::core::Pole,
    foundation::error::LampreelResult,
    network::layout::{ClockPart, Cursor, NetworkLayout},
};

/// Engine direction the clock combinators face.
pub const CLOCK_FACING: u8 = 8;

/// Free-running playback counter.
///
/// The seed constant starts switched off, so the counter idles at 0 (before-cover address)
/// until the player is turned on. After that it adds 1 every tick and never resets; overflow
/// wraps with the engine's 32-bit arithmetic.
pub struct ClockBuilder;

impl ClockBuilder {
    #[tracing::instrument(skip_all, fields(slots = slots))]
    pub fn build(
        layout: &NetworkLayout,
        graph: &mut BlueprintGraph,
        cursor: Cursor,
        slots: u32,
    ) -> LampreelResult<Cursor> {
        cursor.expect(layout.clock_base(slots), "clock")?;
        let clock = || SignalId::virtual_signal(layout.clock_signal.as_str());
        let id = |part| layout.clock_id(slots, part);

        let seed = graph.push(
            Entity::constant(
                id(ClockPart::Seed),
                layout.clock_position(ClockPart::Seed),
                [(clock(), 1)],
            )
            .switched_off()
            .facing(CLOCK_FACING),
        )?;

        let counter = graph.push(
            Entity::arithmetic(
                id(ClockPart::Counter),
                layout.clock_position(ClockPart::Counter),
                clock(),
                ArithmeticOp::Add,
                0,
                clock(),
            )
            .facing(CLOCK_FACING),
        )?;
        graph.connect(seed, Pole::GreenIn, counter, Pole::GreenIn)?;
        graph.connect(counter, Pole::RedIn, counter, Pole::RedOut)?;

        let buffer = graph.push(
            Entity::arithmetic(
                id(ClockPart::Buffer),
                layout.clock_position(ClockPart::Buffer),
                clock(),
                ArithmeticOp::Divide,
                1,
                clock(),
            )
            .facing(CLOCK_FACING),
        )?;
        graph.connect(counter, Pole::GreenOut, buffer, Pole::GreenIn)?;

        Ok(Cursor {
            next_id: graph.next_id(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/clock.rs"]
mod tests;
