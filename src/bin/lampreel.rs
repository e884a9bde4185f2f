use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lampreel", version, about = "Turn a video into a lamp-matrix player blueprint")]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). Logs go to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a player blueprint from a video file or a directory of stills.
    Generate(GenerateArgs),
    /// Decode a blueprint string into pretty-printed JSON.
    Decode(CodecArgs),
    /// Encode a blueprint JSON document into a blueprint string.
    Encode(CodecArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Input video (requires `ffmpeg`/`ffprobe` on PATH) or directory of images.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file for the blueprint string. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Generator config JSON. Flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lamp rows (multiple of 4).
    #[arg(long)]
    height: Option<u32>,

    /// Ticks added to every storage address.
    #[arg(long)]
    frame_delay: Option<u32>,

    /// 1-based frame shown before playback.
    #[arg(long)]
    cover_before_frame: Option<u32>,

    /// 1-based frame shown after playback.
    #[arg(long)]
    cover_after_frame: Option<u32>,

    /// Picture shown before playback.
    #[arg(long)]
    cover_before_image: Option<PathBuf>,

    /// Picture shown after playback.
    #[arg(long)]
    cover_after_image: Option<PathBuf>,

    #[arg(long)]
    no_cover_before: bool,

    #[arg(long)]
    no_cover_after: bool,
}

#[derive(Args, Debug)]
struct CodecArgs {
    /// Input file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file. Printed to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Generate(args) => cmd_generate(args),
        Command::Decode(args) => cmd_decode(args),
        Command::Encode(args) => cmd_encode(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn build_config(args: &GenerateArgs) -> anyhow::Result<lampreel::GeneratorConfig> {
    let mut cfg = match &args.config {
        Some(path) => lampreel::GeneratorConfig::from_path(path)?,
        None => lampreel::GeneratorConfig::default(),
    };
    if let Some(h) = args.height {
        cfg.height = h;
    }
    if let Some(d) = args.frame_delay {
        cfg.frame_delay = d;
    }
    let covers = &mut cfg.covers;
    if args.cover_before_frame.is_some() {
        covers.before_frame = args.cover_before_frame;
    }
    if args.cover_after_frame.is_some() {
        covers.after_frame = args.cover_after_frame;
    }
    if args.cover_before_image.is_some() {
        covers.before_picture = args.cover_before_image.clone();
    }
    if args.cover_after_image.is_some() {
        covers.after_picture = args.cover_after_image.clone();
    }
    if args.no_cover_before {
        covers.show_before = false;
    }
    if args.no_cover_after {
        covers.show_after = false;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn open_source(path: &Path) -> anyhow::Result<Box<dyn lampreel::FrameSource>> {
    if path.is_dir() {
        Ok(Box::new(lampreel::ImageSequenceSource::open(path)?))
    } else {
        Ok(Box::new(lampreel::FfmpegFrameSource::open(path)?))
    }
}

fn sink_for(out: Option<&Path>) -> Box<dyn lampreel::BlueprintSink> {
    match out {
        Some(path) => Box::new(lampreel::FileSink::new(path)),
        None => Box::new(lampreel::StdoutSink),
    }
}

fn cmd_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let cfg = build_config(&args)?;
    let mut source = open_source(&args.in_path)?;
    let (text, report) = lampreel::generate_blueprint_string(source.as_mut(), &cfg)?;
    sink_for(args.out.as_deref()).deliver(&text)?;

    eprintln!(
        "player {}x{}: {} frames, {} storage rows, {} entities, {} wires",
        report.grid.width,
        report.grid.height,
        report.content_frames,
        report.slots,
        report.entities,
        report.wires
    );
    Ok(())
}

fn cmd_decode(args: CodecArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.in_path)
        .with_context(|| format!("read blueprint '{}'", args.in_path.display()))?;
    let value = lampreel::decode_blueprint_value(&text)?;
    let pretty = serde_json::to_string_pretty(&value).context("format blueprint JSON")?;
    sink_for(args.out.as_deref()).deliver(&pretty)?;
    Ok(())
}

fn cmd_encode(args: CodecArgs) -> anyhow::Result<()> {
    let json = std::fs::read(&args.in_path)
        .with_context(|| format!("read JSON '{}'", args.in_path.display()))?;
    // Re-serialized compactly; pretty-printed input would otherwise bloat the string.
    let value: serde_json::Value =
        serde_json::from_slice(&json).with_context(|| "parse blueprint JSON")?;
    let compact = serde_json::to_vec(&value).context("serialize blueprint JSON")?;
    let text = lampreel::encode_bytes(&compact)?;
    sink_for(args.out.as_deref()).deliver(&text)?;
    Ok(())
}
