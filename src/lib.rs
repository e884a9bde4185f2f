//! lampreel turns a video into a lamp-matrix player blueprint.
//!
//! The output is a circuit network for an external simulation engine: a W×H grid of color
//! lamps, a decoder that unpacks color bytes from 32-bit signals, one addressable storage
//! cell per (frame, column), and a free-running clock that walks the storage addresses.
//! Everything is numbered and wired by closed-form index arithmetic, so the same input always
//! produces the same blueprint string.
//!
//! # Pipeline overview
//!
//! 1. **Source**: a [`FrameSource`] yields frames in presentation order (`ffmpeg` pipe, image
//!    directory or memory)
//! 2. **Build**: lamps, decoder, storage and clock are appended to a [`BlueprintGraph`] in id
//!    order, then [`WireLinker`] connects the blocks
//! 3. **Encode**: the frozen [`Blueprint`] is serialized as `'0' + base64(zlib(json))`
//!
//! [`generate_player`] runs steps 1 and 2; [`generate_blueprint_string`] adds step 3.
#![forbid(unsafe_code)]

mod blueprint;
mod color;
mod foundation;
mod generate;
mod network;
mod source;

pub use blueprint::codec::{
    VERSION_MARKER, decode as decode_blueprint, decode_bytes, decode_value as decode_blueprint_value,
    encode as encode_blueprint, encode_bytes,
};
pub use blueprint::graph::BlueprintGraph;
pub use blueprint::model::{
    ArithmeticConditions, ArithmeticConfig, ArithmeticControl, ArithmeticOp, BLUEPRINT_ITEM,
    BLUEPRINT_VERSION, Blueprint, BlueprintDocument, Color, Comparator, ConstantConfig,
    ConstantControl, DeciderCondition, DeciderConditions, DeciderConfig, DeciderControl,
    DeciderOutput, Entity, EntityKind, Filter, Icon, IconSignal, LampConfig, LampControl,
    Networks, Section, SectionList, SignalId, SignalType, Wire, signals,
};
pub use color::codec::{
    CODES_PER_WORD, MASK_2BIT, MASK_3BIT, compress, decompress, pack_column, pack_frame, pack4,
    unpack4,
};
pub use foundation::core::{EntityId, GridSize, Pole, Position};
pub use foundation::error::{LampreelError, LampreelResult};
pub use generate::config::{
    CoverConfig, DEFAULT_SIGNAL_LETTERS, GeneratorConfig, load_cover_image,
};
pub use generate::pipeline::{
    Generation, GenerationReport, generate_blueprint_string, generate_player,
};
pub use generate::sink::{BlueprintSink, FileSink, InMemorySink, StdoutSink, ensure_parent_dir};
pub use network::clock::{CLOCK_FACING, ClockBuilder};
pub use network::decoder::{DecoderNetworkBuilder, chain_shifts, previous_chain};
pub use network::lamp::LampMatrixBuilder;
pub use network::layout::{
    CLOCK_LEN, ChainPart, ClockPart, Cursor, DECODER_CHAIN_LEN, NetworkLayout, STORAGE_PAIR_LEN,
};
pub use network::linker::WireLinker;
pub use network::storage::{
    CoverPlan, CoverSlot, StorageCursor, StorageNetworkBuilder, StorageStage, StorageSummary,
    bus_links,
};
pub use source::frame::{FrameSource, MemoryFrameSource, PixelGrid, SourceInfo};
pub use source::images::{ImageSequenceSource, decode_image, load_image};
pub use source::media::{FfmpegFrameSource, VideoSourceInfo, probe_video};
