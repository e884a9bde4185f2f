//! Per-column unpacking chains: packed color word in, lamp color components out.
//!
//! Each lamp gets an 8-entity chain. The three shift stages pull the lamp's red, green and blue
//! bits out of the column word into the top of a byte, the masks drop the neighbours' bits, and
//! the final `* 255 / 224` pair rescales the 3-bit levels to the full lamp range.
//!
//! Within a word, bytes 0..=2 are shifted right and byte 3 left. The running shift starts at 24
//! for each word and steps by 3 between red and green and between green and blue (3-bit
//! channels) but by 2 from blue to the next byte's red (2-bit blue).

use crate::{
    blueprint::graph::BlueprintGraph,
    blueprint::model::{ArithmeticOp, Entity, SignalId, signals},
    color::codec::{CODES_PER_WORD, MASK_2BIT, MASK_3BIT},
    foundation::core::Pole,
    foundation::error::LampreelResult,
    network::layout::{ChainPart, Cursor, NetworkLayout},
};

const SCALE_DIVISOR: i32 = MASK_3BIT as i32;
const SCALE_FACTOR: i32 = 0xFF;

/// Shift operator and red/green/blue shift amounts for byte `byte` of a word.
pub fn chain_shifts(byte: u32) -> (ArithmeticOp, [i32; 3]) {
    if byte + 1 < CODES_PER_WORD {
        let red = 24 - 8 * byte as i32;
        (ArithmeticOp::ShiftRight, [red, red - 3, red - 6])
    } else {
        (ArithmeticOp::ShiftLeft, [0, 3, 6])
    }
}

pub struct DecoderNetworkBuilder;

impl DecoderNetworkBuilder {
    #[tracing::instrument(skip_all, fields(columns = layout.grid.width, words = layout.words_per_column()))]
    pub fn build(
        layout: &NetworkLayout,
        graph: &mut BlueprintGraph,
        cursor: Cursor,
    ) -> LampreelResult<Cursor> {
        cursor.expect(layout.decoder_base(), "decoder")?;
        for col in 0..layout.grid.width {
            for (group, channel) in layout.channels.iter().enumerate() {
                let word = SignalId::virtual_signal(channel.as_str());
                for byte in 0..CODES_PER_WORD {
                    build_chain(layout, graph, col, group as u32, byte, &word)?;
                }
            }
        }
        tracing::debug!(entities = graph.len(), "decoder placed");
        Ok(Cursor {
            next_id: graph.next_id(),
        })
    }
}

fn build_chain(
    layout: &NetworkLayout,
    graph: &mut BlueprintGraph,
    col: u32,
    group: u32,
    byte: u32,
    word: &SignalId,
) -> LampreelResult<()> {
    use ChainPart::*;

    let id = |part| layout.decoder_id(col, group, byte, part);
    let pos = |part| layout.decoder_position(col, group, byte, part);
    let each = || SignalId::virtual_signal(signals::EACH);
    let red = || SignalId::virtual_signal(signals::RED);
    let green = || SignalId::virtual_signal(signals::GREEN);
    let blue = || SignalId::virtual_signal(signals::BLUE);
    let (shift_op, [red_shift, green_shift, blue_shift]) = chain_shifts(byte);

    graph.push(Entity::arithmetic(
        id(ScaleDown),
        pos(ScaleDown),
        each(),
        ArithmeticOp::Divide,
        SCALE_DIVISOR,
        each(),
    ))?;

    graph.push(Entity::arithmetic(
        id(ScaleUp),
        pos(ScaleUp),
        each(),
        ArithmeticOp::Multiply,
        SCALE_FACTOR,
        each(),
    ))?;
    graph.connect(id(ScaleDown), Pole::GreenIn, id(ScaleUp), Pole::GreenOut)?;

    graph.push(Entity::arithmetic(
        id(RedMask),
        pos(RedMask),
        red(),
        ArithmeticOp::And,
        i32::from(MASK_3BIT),
        red(),
    ))?;
    graph.connect(id(ScaleUp), Pole::GreenIn, id(RedMask), Pole::GreenOut)?;

    graph.push(Entity::arithmetic(
        id(RedShift),
        pos(RedShift),
        word.clone(),
        shift_op,
        red_shift,
        red(),
    ))?;
    if let Some((prev_group, prev_byte)) = previous_chain(group, byte) {
        // Column bus: the packed words ride the red input network down the whole column.
        graph.connect(
            layout.decoder_id(col, prev_group, prev_byte, BlueShift),
            Pole::RedIn,
            id(RedShift),
            Pole::RedIn,
        )?;
    }
    graph.connect(id(RedMask), Pole::RedIn, id(RedShift), Pole::RedOut)?;

    graph.push(Entity::arithmetic(
        id(GreenMask),
        pos(GreenMask),
        green(),
        ArithmeticOp::And,
        i32::from(MASK_3BIT),
        green(),
    ))?;
    graph.connect(id(RedMask), Pole::GreenOut, id(GreenMask), Pole::GreenOut)?;

    graph.push(Entity::arithmetic(
        id(GreenShift),
        pos(GreenShift),
        word.clone(),
        shift_op,
        green_shift,
        green(),
    ))?;
    graph.connect(id(RedShift), Pole::RedIn, id(GreenShift), Pole::RedIn)?;
    graph.connect(id(GreenMask), Pole::RedIn, id(GreenShift), Pole::RedOut)?;

    graph.push(Entity::arithmetic(
        id(BlueMask),
        pos(BlueMask),
        blue(),
        ArithmeticOp::And,
        i32::from(MASK_2BIT),
        blue(),
    ))?;
    graph.connect(id(GreenMask), Pole::GreenOut, id(BlueMask), Pole::GreenOut)?;

    graph.push(Entity::arithmetic(
        id(BlueShift),
        pos(BlueShift),
        word.clone(),
        shift_op,
        blue_shift,
        blue(),
    ))?;
    graph.connect(id(GreenShift), Pole::RedIn, id(BlueShift), Pole::RedIn)?;
    graph.connect(id(BlueMask), Pole::RedIn, id(BlueShift), Pole::RedOut)?;

    Ok(())
}

/// Chain feeding the column bus into (`group`, `byte`). The first chain of a column has none.
pub fn previous_chain(group: u32, byte: u32) -> Option<(u32, u32)> {
    match (group, byte) {
        (0, 0) => None,
        (g, 0) => Some((g - 1, CODES_PER_WORD - 1)),
        (g, b) => Some((g, b - 1)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/decoder.rs"]
mod tests;
