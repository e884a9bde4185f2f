use crate::{
    blueprint::graph::BlueprintGraph,
    blueprint::model::Entity,
    foundation::error::LampreelResult,
    network::layout::{Cursor, NetworkLayout},
};

/// W×H color lamps at unit spacing, numbered column-major from 1.
pub struct LampMatrixBuilder;

impl LampMatrixBuilder {
    #[tracing::instrument(skip_all, fields(width = layout.grid.width, height = layout.grid.height))]
    pub fn build(
        layout: &NetworkLayout,
        graph: &mut BlueprintGraph,
        cursor: Cursor,
    ) -> LampreelResult<Cursor> {
        cursor.expect(layout.lamp_id(0, 0), "lamp")?;
        for col in 0..layout.grid.width {
            for row in 0..layout.grid.height {
                graph.push(Entity::lamp(
                    layout.lamp_id(col, row),
                    layout.lamp_position(col, row),
                ))?;
            }
        }
        tracing::debug!(lamps = graph.len(), "lamp matrix placed");
        Ok(Cursor {
            next_id: graph.next_id(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/lamp.rs"]
mod tests;
