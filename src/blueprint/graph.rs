use crate::{
    blueprint::model::{Blueprint, Entity, Wire},
    foundation::core::{EntityId, Pole},
    foundation::error::{LampreelError, LampreelResult},
};

/// Append-only entity/wire collection shared by the network builders.
///
/// Every entity must arrive with the next dense id, and every wire must join entities that
/// already exist; either violation is a generation error since the builders compute partner ids
/// blind.
#[derive(Debug)]
pub struct BlueprintGraph {
    blueprint: Blueprint,
}

impl Default for BlueprintGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl BlueprintGraph {
    pub fn new() -> Self {
        Self {
            blueprint: Blueprint::empty(),
        }
    }

    /// Id the next pushed entity must carry.
    pub fn next_id(&self) -> EntityId {
        EntityId(self.blueprint.entities.len() as u32 + 1)
    }

    pub fn len(&self) -> usize {
        self.blueprint.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blueprint.entities.is_empty()
    }

    pub fn push(&mut self, entity: Entity) -> LampreelResult<EntityId> {
        let expected = self.next_id();
        if entity.entity_number != expected {
            return Err(LampreelError::generation(format!(
                "{} allocated as {}, next free id is {expected}",
                entity.kind.prototype(),
                entity.entity_number
            )));
        }
        self.blueprint.entities.push(entity);
        Ok(expected)
    }

    pub fn connect(
        &mut self,
        a: EntityId,
        pole_a: Pole,
        b: EntityId,
        pole_b: Pole,
    ) -> LampreelResult<()> {
        for id in [a, b] {
            if id.0 == 0 || id.0 as usize > self.blueprint.entities.len() {
                return Err(LampreelError::generation(format!(
                    "wire {a}:{} -> {b}:{} references missing entity {id}",
                    u8::from(pole_a),
                    u8::from(pole_b)
                )));
            }
        }
        self.blueprint.wires.push(Wire {
            a,
            pole_a,
            b,
            pole_b,
        });
        Ok(())
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.blueprint.entity(id)
    }

    pub fn wires(&self) -> &[Wire] {
        &self.blueprint.wires
    }

    /// Stop appending and hand the artifact over.
    pub fn freeze(self) -> LampreelResult<Blueprint> {
        self.blueprint.validate()?;
        Ok(self.blueprint)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/blueprint/graph.rs"]
mod tests;
