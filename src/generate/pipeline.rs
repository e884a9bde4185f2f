use crate::{
    blueprint::codec,
    blueprint::graph::BlueprintGraph,
    blueprint::model::{Blueprint, BlueprintDocument},
    foundation::core::GridSize,
    foundation::error::LampreelResult,
    generate::config::GeneratorConfig,
    network::clock::ClockBuilder,
    network::decoder::DecoderNetworkBuilder,
    network::lamp::LampMatrixBuilder,
    network::layout::Cursor,
    network::linker::WireLinker,
    network::storage::StorageNetworkBuilder,
    source::frame::FrameSource,
};

/// Summary of one generator run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationReport {
    pub grid: GridSize,
    /// Frame count the source reported up front.
    pub reported_frames: u32,
    /// Frames actually read by the scan.
    pub content_frames: u32,
    /// Storage rows, content plus covers.
    pub slots: u32,
    pub before_cover: bool,
    pub after_cover: bool,
    pub entities: usize,
    pub wires: usize,
}

#[derive(Clone, Debug)]
pub struct Generation {
    pub blueprint: Blueprint,
    pub report: GenerationReport,
}

/// Build the complete player for `source`.
///
/// Steps run in id order (lamps, decoder, storage, clock) and the linker closes the graph.
/// Any error aborts the run; no partial blueprint is returned.
#[tracing::instrument(skip_all, fields(height = config.height))]
pub fn generate_player(
    source: &mut dyn FrameSource,
    config: &GeneratorConfig,
) -> LampreelResult<Generation> {
    config.validate()?;
    let info = source.info();
    info.validate()?;

    let grid = GridSize::fit_height(config.height, info.width, info.height)?;
    let layout = config.layout(grid)?;
    let covers = config.covers.plan(info.frame_count);
    tracing::info!(
        width = grid.width,
        height = grid.height,
        frames = info.frame_count,
        "generating player"
    );

    let mut graph = BlueprintGraph::new();
    let cursor = LampMatrixBuilder::build(&layout, &mut graph, Cursor::start())?;
    let cursor = DecoderNetworkBuilder::build(&layout, &mut graph, cursor)?;
    let storage = StorageNetworkBuilder::new(&layout, config.frame_delay, covers)
        .build(&mut graph, cursor, source)?;
    ClockBuilder::build(&layout, &mut graph, storage.cursor, storage.slots)?;
    WireLinker::link(&layout, &mut graph, storage.slots)?;

    if storage.content_frames != info.frame_count {
        tracing::warn!(
            reported = info.frame_count,
            read = storage.content_frames,
            "source frame count differs from its metadata"
        );
    }

    let wires = graph.wires().len();
    let blueprint = graph.freeze()?;
    let report = GenerationReport {
        grid,
        reported_frames: info.frame_count,
        content_frames: storage.content_frames,
        slots: storage.slots,
        before_cover: storage.before_cover,
        after_cover: storage.after_cover,
        entities: blueprint.entities.len(),
        wires,
    };
    tracing::info!(
        entities = report.entities,
        wires = report.wires,
        slots = report.slots,
        "player generated"
    );
    Ok(Generation { blueprint, report })
}

/// [`generate_player`] followed by the interchange encoding.
pub fn generate_blueprint_string(
    source: &mut dyn FrameSource,
    config: &GeneratorConfig,
) -> LampreelResult<(String, GenerationReport)> {
    let Generation { blueprint, report } = generate_player(source, config)?;
    let text = codec::encode(&BlueprintDocument { blueprint })?;
    Ok((text, report))
}

#[cfg(test)]
#[path = "../../tests/unit/generate/pipeline.rs"]
mod tests;
