//! Cross-module wiring, computed from the layout formulas alone.

use crate::{
    blueprint::graph::BlueprintGraph,
    foundation::core::{EntityId, Pole},
    foundation::error::{LampreelError, LampreelResult},
    network::layout::{ChainPart, ClockPart, NetworkLayout},
};

pub struct WireLinker;

impl WireLinker {
    /// Lamps to decoders, decoders to the storage buses, storage to the clock.
    #[tracing::instrument(skip_all, fields(slots = slots))]
    pub fn link(layout: &NetworkLayout, graph: &mut BlueprintGraph, slots: u32) -> LampreelResult<()> {
        if slots == 0 {
            return Err(LampreelError::generation("cannot link a player with no storage"));
        }
        let expected = layout.entity_count(slots) as usize;
        if graph.len() != expected {
            return Err(LampreelError::generation(format!(
                "linker expects {expected} entities, graph has {}",
                graph.len()
            )));
        }

        for (lamp, decoder) in Self::lamp_links(layout) {
            graph.connect(lamp, Pole::GreenIn, decoder, Pole::GreenOut)?;
        }
        for (decoder, storage) in Self::bus_links(layout) {
            graph.connect(decoder, Pole::RedIn, storage, Pole::RedOut)?;
        }
        let (storage, clock) = Self::clock_link(layout, slots);
        graph.connect(storage, Pole::GreenIn, clock, Pole::GreenOut)?;
        Ok(())
    }

    /// Every lamp and the head of its decoder chain (stride 8).
    pub fn lamp_links(layout: &NetworkLayout) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        (1..=layout.grid.cells()).map(move |n| {
            let lamp = EntityId(n);
            (lamp, layout.decoder_for_lamp(lamp))
        })
    }

    /// Per column: the decoder bus entry and the first storage gate of that column.
    pub fn bus_links(layout: &NetworkLayout) -> impl Iterator<Item = (EntityId, EntityId)> + '_ {
        (0..layout.grid.width).map(move |col| {
            (
                layout.decoder_id(col, 0, 0, ChainPart::RedShift),
                layout.storage_gate_id(0, col),
            )
        })
    }

    /// The first storage gate and the clock output.
    pub fn clock_link(layout: &NetworkLayout, slots: u32) -> (EntityId, EntityId) {
        (
            layout.storage_gate_id(0, 0),
            layout.clock_id(slots, ClockPart::Buffer),
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/linker.rs"]
mod tests;
