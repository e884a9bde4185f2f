//! Closed-form id allocation and placement shared by the network builders and the linker.
//!
//! Entity ids are laid out in four contiguous blocks:
//!
//! 1. lamps: `W·H`, column-major
//! 2. decoder: `8·W·H`, one 8-entity chain per lamp, same order as the lamps
//! 3. storage: `2·W·slots`, one gate/constant pair per (slot, column)
//! 4. clock: 3 entities
//!
//! Every function here is pure. The builders push entities in exactly this order and the
//! graph rejects anything else, so the linker can compute partner ids without lookups.

use crate::{
    color::codec::CODES_PER_WORD,
    foundation::core::{EntityId, GridSize, Position},
    foundation::error::{LampreelError, LampreelResult},
};

/// Decoder entities per lamp.
pub const DECODER_CHAIN_LEN: u32 = 8;
/// Entities per storage cell (gate + constant).
pub const STORAGE_PAIR_LEN: u32 = 2;
/// Entities in the clock.
pub const CLOCK_LEN: u32 = 3;

/// Vertical gap between the top of the storage block and its first row.
const STORAGE_TOP_MARGIN: u32 = 7;
/// Rows taken by one storage cell (gate plus constant below it).
const STORAGE_ROW_HEIGHT: f64 = 3.0;
/// Rows taken by one arithmetic combinator.
const DECODER_ROW_HEIGHT: f64 = 2.0;
/// Clock sits this far above the decoder block.
const CLOCK_RAISE: f64 = 10.0;

/// Position of one entity inside a decoder chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ChainPart {
    /// `each / 224`, drives the lamp.
    ScaleDown = 0,
    /// `each * 255`.
    ScaleUp = 1,
    RedMask = 2,
    /// Reads the packed word; carries the column bus to the previous chain.
    RedShift = 3,
    GreenMask = 4,
    GreenShift = 5,
    BlueMask = 6,
    BlueShift = 7,
}

/// Clock entity roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ClockPart {
    /// Switched-off constant `clock = 1`.
    Seed = 0,
    /// `clock + 0` with its output fed back to its input.
    Counter = 1,
    /// `clock / 1`, a one-tick buffer in front of the storage bus.
    Buffer = 2,
}

/// Geometry and channel assignment of one generated player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkLayout {
    pub grid: GridSize,
    /// Gap between the lamp matrix and the modules around it.
    pub module_distance: u32,
    /// Storage slots per layer.
    pub layer_size: u32,
    /// Horizontal gap between storage layers.
    pub layer_distance: u32,
    /// Full signal names, one per packed word of a column.
    pub channels: Vec<String>,
    /// Full name of the playback clock signal.
    pub clock_signal: String,
}

impl NetworkLayout {
    pub fn new(
        grid: GridSize,
        module_distance: u32,
        layer_size: u32,
        layer_distance: u32,
        channel_pool: &[String],
        clock_signal: String,
    ) -> LampreelResult<Self> {
        if !grid.height.is_multiple_of(CODES_PER_WORD) {
            return Err(LampreelError::validation(format!(
                "grid height {} must be a multiple of {CODES_PER_WORD}",
                grid.height
            )));
        }
        if layer_size == 0 {
            return Err(LampreelError::validation("storage layer size must be > 0"));
        }
        let words = (grid.height / CODES_PER_WORD) as usize;
        if channel_pool.len() < words {
            return Err(LampreelError::validation(format!(
                "grid height {} needs {words} data signals, pool has {}",
                grid.height,
                channel_pool.len()
            )));
        }
        if channel_pool[..words].contains(&clock_signal) {
            return Err(LampreelError::validation(format!(
                "clock signal '{clock_signal}' collides with a data signal"
            )));
        }
        Ok(Self {
            grid,
            module_distance,
            layer_size,
            layer_distance,
            channels: channel_pool[..words].to_vec(),
            clock_signal,
        })
    }

    /// Packed words (and data signals) per column.
    pub fn words_per_column(&self) -> u32 {
        self.grid.height / CODES_PER_WORD
    }

    pub fn lamp_id(&self, col: u32, row: u32) -> EntityId {
        EntityId(col * self.grid.height + row + 1)
    }

    pub fn lamp_position(&self, col: u32, row: u32) -> Position {
        Position::new(f64::from(col), f64::from(row))
    }

    pub fn decoder_base(&self) -> EntityId {
        EntityId(self.grid.cells() + 1)
    }

    /// `base + col·H·8 + 8·(group·4 + byte) + part`.
    pub fn decoder_id(&self, col: u32, group: u32, byte: u32, part: ChainPart) -> EntityId {
        let chain = col * self.grid.height + group * CODES_PER_WORD + byte;
        self.decoder_base()
            .offset(DECODER_CHAIN_LEN * chain + part as u32)
    }

    /// First entity of the chain that drives `lamp`.
    pub fn decoder_for_lamp(&self, lamp: EntityId) -> EntityId {
        self.decoder_base().offset(DECODER_CHAIN_LEN * (lamp.0 - 1))
    }

    pub fn decoder_position(&self, col: u32, group: u32, byte: u32, part: ChainPart) -> Position {
        let in_column = DECODER_CHAIN_LEN * (group * CODES_PER_WORD + byte) + part as u32;
        Position::new(
            f64::from(col),
            f64::from(self.grid.height + self.module_distance)
                + DECODER_ROW_HEIGHT * f64::from(in_column),
        )
    }

    pub fn storage_base(&self) -> EntityId {
        self.decoder_base()
            .offset(DECODER_CHAIN_LEN * self.grid.cells())
    }

    /// Decider gate of the cell at (`slot`, `col`). Its constant is the next id.
    pub fn storage_gate_id(&self, slot: u32, col: u32) -> EntityId {
        self.storage_base()
            .offset(STORAGE_PAIR_LEN * (slot * self.grid.width + col))
    }

    pub fn storage_constant_id(&self, slot: u32, col: u32) -> EntityId {
        self.storage_gate_id(slot, col).offset(1)
    }

    /// Layer index and row within the layer of a storage slot.
    pub fn storage_layer(&self, slot: u32) -> (u32, u32) {
        (slot / self.layer_size, slot % self.layer_size)
    }

    pub fn storage_gate_position(&self, slot: u32, col: u32) -> Position {
        let (layer, row) = self.storage_layer(slot);
        let w = self.grid.width;
        let x = w + self.module_distance + (w + self.layer_distance) * layer + col;
        let y = self.grid.height + self.module_distance + STORAGE_TOP_MARGIN;
        Position::new(
            f64::from(x),
            f64::from(y) + STORAGE_ROW_HEIGHT * f64::from(row),
        )
    }

    pub fn storage_constant_position(&self, slot: u32, col: u32) -> Position {
        self.storage_gate_position(slot, col).down(1.5)
    }

    /// First clock id once `slots` storage rows have been emitted.
    pub fn clock_base(&self, slots: u32) -> EntityId {
        self.storage_base()
            .offset(STORAGE_PAIR_LEN * self.grid.width * slots)
    }

    pub fn clock_id(&self, slots: u32, part: ClockPart) -> EntityId {
        self.clock_base(slots).offset(part as u32)
    }

    pub fn clock_position(&self, part: ClockPart) -> Position {
        let top = Position::new(
            f64::from(self.grid.width + self.module_distance),
            f64::from(self.grid.height + self.module_distance) - CLOCK_RAISE,
        );
        match part {
            ClockPart::Seed => top,
            ClockPart::Counter => top.down(1.5),
            ClockPart::Buffer => top.down(3.5),
        }
    }

    /// Total entity count for a player with `slots` storage rows.
    pub fn entity_count(&self, slots: u32) -> u32 {
        self.clock_base(slots).0 - 1 + CLOCK_LEN
    }
}

/// Where the previous build step stopped.
///
/// Each builder takes the cursor left by the one before it, checks that it starts at the id
/// its formula expects, and hands back a cursor past its own last entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub next_id: EntityId,
}

impl Cursor {
    pub fn start() -> Self {
        Self {
            next_id: EntityId(1),
        }
    }

    pub fn expect(self, block_start: EntityId, block: &str) -> LampreelResult<()> {
        if self.next_id != block_start {
            return Err(LampreelError::generation(format!(
                "{block} block must start at {block_start}, previous step stopped at {}",
                self.next_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/network/layout.rs"]
mod tests;
