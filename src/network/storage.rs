//! The video as addressable memory: one gate/constant cell per (frame slot, column).
//!
//! Each constant holds a column's packed color words for one frame; its gate forwards them onto
//! the column's output bus while the clock matches the frame's address. Content frames match
//! exactly, the before-cover shows while the clock is below the first address and the
//! after-cover once it passes the last one.
//!
//! Bus topology: slots are grouped into layers. Inside a layer every cell links to the cell
//! above it (clock and output); a layer's head row links only to the previous layer's head
//! row, and the clock fans out across a head row column by column. Long-range wiring therefore
//! grows with the layer count, not the frame count, at the cost of a longer ripple.

use crate::{
    blueprint::graph::BlueprintGraph,
    blueprint::model::{Comparator, Entity, SignalId},
    color::codec,
    foundation::core::{EntityId, Pole},
    foundation::error::{LampreelError, LampreelResult},
    network::layout::{Cursor, NetworkLayout},
    source::frame::{FrameSource, PixelGrid},
};

/// Emission order of the storage rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageStage {
    Content,
    BeforeCover,
    AfterCover,
    Done,
}

impl StorageStage {
    pub fn next(self) -> Self {
        match self {
            Self::Content => Self::BeforeCover,
            Self::BeforeCover => Self::AfterCover,
            Self::AfterCover | Self::Done => Self::Done,
        }
    }
}

/// One cover stage as the storage scan sees it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverSlot {
    pub enabled: bool,
    /// 1-based content frame to capture when no picture was supplied.
    pub frame_index: u32,
    /// Explicit picture at native size.
    pub picture: Option<PixelGrid>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CoverPlan {
    pub before: CoverSlot,
    pub after: CoverSlot,
}

/// Scan position threaded through the row emitters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StorageCursor {
    /// Next slot to fill.
    pub slot: u32,
    /// Content frames consumed so far.
    pub content_frames: u32,
}

/// What the storage scan produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageSummary {
    pub cursor: Cursor,
    pub slots: u32,
    pub content_frames: u32,
    pub before_cover: bool,
    pub after_cover: bool,
}

pub struct StorageNetworkBuilder<'a> {
    layout: &'a NetworkLayout,
    frame_delay: u32,
    covers: CoverPlan,
    last_frame: Option<PixelGrid>,
}

impl<'a> StorageNetworkBuilder<'a> {
    pub fn new(layout: &'a NetworkLayout, frame_delay: u32, covers: CoverPlan) -> Self {
        Self {
            layout,
            frame_delay,
            covers,
            last_frame: None,
        }
    }

    /// Scan `source` once, front to back, emitting one storage row per frame and then the
    /// enabled covers.
    #[tracing::instrument(skip_all, fields(layer_size = self.layout.layer_size))]
    pub fn build(
        mut self,
        graph: &mut BlueprintGraph,
        cursor: Cursor,
        source: &mut dyn FrameSource,
    ) -> LampreelResult<StorageSummary> {
        cursor.expect(self.layout.storage_base(), "storage")?;
        let expected = source.info().frame_count;
        let mut sc = StorageCursor::default();
        let mut stage = StorageStage::Content;
        let mut emitted_before = false;
        let mut emitted_after = false;

        loop {
            match stage {
                StorageStage::Content => {
                    let Some(raw) = source.next_frame()? else {
                        if sc.content_frames == 0 {
                            return Err(LampreelError::source_unavailable(
                                "source produced no frames",
                            ));
                        }
                        tracing::info!(frames = sc.content_frames, "content scan finished");
                        stage = stage.next();
                        continue;
                    };
                    let frame = raw.resized(self.layout.grid)?;
                    sc.content_frames += 1;
                    let n = sc.content_frames;
                    self.capture_covers(n, &frame);
                    let address = self.address(n)?;
                    self.emit_row(graph, &mut sc, Comparator::Equal, address, &frame)?;
                    self.last_frame = Some(frame);

                    tracing::debug!(frame = n, of = expected, "frame stored");
                    if n % 100 == 0 {
                        tracing::info!(frame = n, of = expected, "loading frames");
                    }
                }
                StorageStage::BeforeCover => {
                    if self.covers.before.enabled {
                        let frame = self.cover_frame(StorageStage::BeforeCover)?;
                        let address = self.address(1)?;
                        self.emit_row(graph, &mut sc, Comparator::Less, address, &frame)?;
                        emitted_before = true;
                    }
                    stage = stage.next();
                }
                StorageStage::AfterCover => {
                    if self.covers.after.enabled {
                        let frame = self.cover_frame(StorageStage::AfterCover)?;
                        let address = self.address(sc.content_frames)?;
                        self.emit_row(graph, &mut sc, Comparator::Greater, address, &frame)?;
                        emitted_after = true;
                    }
                    stage = stage.next();
                }
                StorageStage::Done => break,
            }
        }

        Ok(StorageSummary {
            cursor: Cursor {
                next_id: graph.next_id(),
            },
            slots: sc.slot,
            content_frames: sc.content_frames,
            before_cover: emitted_before,
            after_cover: emitted_after,
        })
    }

    /// Keep the requested content frame as a cover unless a picture was supplied.
    fn capture_covers(&mut self, n: u32, frame: &PixelGrid) {
        for slot in [&mut self.covers.before, &mut self.covers.after] {
            if slot.enabled && slot.picture.is_none() && slot.frame_index == n {
                slot.picture = Some(frame.clone());
            }
        }
    }

    fn cover_frame(&mut self, stage: StorageStage) -> LampreelResult<PixelGrid> {
        let slot = match stage {
            StorageStage::BeforeCover => &mut self.covers.before,
            _ => &mut self.covers.after,
        };
        if let Some(picture) = slot.picture.take() {
            return picture.resized(self.layout.grid);
        }
        tracing::warn!(
            requested = slot.frame_index,
            ?stage,
            "cover frame was never reached by the scan, using the last frame"
        );
        self.last_frame
            .clone()
            .ok_or_else(|| LampreelError::generation("no frame available for cover"))
    }

    fn address(&self, frame: u32) -> LampreelResult<i32> {
        i32::try_from(u64::from(frame) + u64::from(self.frame_delay)).map_err(|_| {
            LampreelError::generation(format!(
                "frame address {frame} + delay {} overflows the signal range",
                self.frame_delay
            ))
        })
    }

    fn emit_row(
        &self,
        graph: &mut BlueprintGraph,
        sc: &mut StorageCursor,
        comparator: Comparator,
        address: i32,
        frame: &PixelGrid,
    ) -> LampreelResult<()> {
        let layout = self.layout;
        let slot = sc.slot;
        let clock = SignalId::virtual_signal(layout.clock_signal.as_str());
        let words = codec::pack_frame(frame);

        for (col, column_words) in (0..layout.grid.width).zip(words) {
            let gate = graph.push(Entity::gate(
                layout.storage_gate_id(slot, col),
                layout.storage_gate_position(slot, col),
                clock.clone(),
                comparator,
                address,
            ))?;
            for (from, pole) in bus_links(layout, slot, col) {
                graph.connect(from, pole, gate, pole)?;
            }

            let values = layout
                .channels
                .iter()
                .map(|name| SignalId::virtual_signal(name.as_str()))
                .zip(column_words);
            let constant = graph.push(Entity::constant(
                layout.storage_constant_id(slot, col),
                layout.storage_constant_position(slot, col),
                values,
            ))?;
            graph.connect(gate, Pole::RedIn, constant, Pole::RedIn)?;
        }

        sc.slot += 1;
        Ok(())
    }
}

/// Backward links of the gate at (`slot`, `col`): the cells it joins on the clock network
/// (green input) and on the column output bus (red output). At most two per gate.
pub fn bus_links(
    layout: &NetworkLayout,
    slot: u32,
    col: u32,
) -> impl Iterator<Item = (EntityId, Pole)> {
    let (layer, row) = layout.storage_layer(slot);
    let links = if row == 0 {
        let bus = (layer > 0).then(|| {
            (
                layout.storage_gate_id(slot - layout.layer_size, col),
                Pole::RedOut,
            )
        });
        let clock = if col > 0 {
            Some((layout.storage_gate_id(slot, col - 1), Pole::GreenIn))
        } else if slot > 0 {
            Some((
                layout.storage_gate_id(slot - layout.layer_size, 0),
                Pole::GreenIn,
            ))
        } else {
            None
        };
        [bus, clock]
    } else {
        let above = layout.storage_gate_id(slot - 1, col);
        [Some((above, Pole::GreenIn)), Some((above, Pole::RedOut))]
    };
    links.into_iter().flatten()
}

#[cfg(test)]
#[path = "../../tests/unit/network/storage.rs"]
mod tests;
