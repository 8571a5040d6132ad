use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "phylofolio", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Write a single frame as SVG markup.
    Svg(SvgArgs),
    /// Render consecutive frames as numbered PNGs.
    Sequence(SequenceArgs),
    /// List publications from a JSON file.
    Publications(PublicationsArgs),
}

#[derive(Parser, Debug)]
struct StageArgs {
    /// Scene config JSON (defaults apply for anything missing).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the config seed (PHYLOFOLIO_SEED is applied first).
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Open the menu at time zero.
    #[arg(long)]
    expanded: bool,

    /// Hover the pointer over this label index.
    #[arg(long)]
    hover: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    stage: StageArgs,

    /// Clock time of the captured frame, in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Backend to use.
    #[arg(long, value_enum, default_value_t = BackendChoice::SvgRaster)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct SvgArgs {
    #[command(flatten)]
    stage: StageArgs,

    #[arg(long, default_value_t = 0.0)]
    at_ms: f64,

    /// Output SVG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    #[command(flatten)]
    stage: StageArgs,

    #[arg(long, default_value_t = 30)]
    frames: u32,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Directory receiving `frame_00000.png`, `frame_00001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = BackendChoice::Cpu)]
    backend: BackendChoice,
}

#[derive(Parser, Debug)]
struct PublicationsArgs {
    /// Publications JSON array.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long, value_enum)]
    category: Option<CategoryChoice>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendChoice {
    /// Fast raster; labels without text.
    Cpu,
    /// SVG rasterized with resvg; labels with text.
    SvgRaster,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CategoryChoice {
    Academic,
    NonAcademic,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Publications(args) => cmd_publications(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn make_backend(choice: BackendChoice) -> anyhow::Result<Box<dyn phylofolio::SceneBackend>> {
    let kind = match choice {
        BackendChoice::Cpu => phylofolio::BackendKind::Cpu,
        BackendChoice::SvgRaster => phylofolio::BackendKind::SvgRaster,
    };
    Ok(phylofolio::create_backend(
        kind,
        &phylofolio::RenderSettings::default(),
    )?)
}

fn mount_stage(args: &StageArgs) -> anyhow::Result<phylofolio::Stage> {
    let mut config = match &args.config {
        Some(path) => phylofolio::SceneConfig::load(path)?,
        None => phylofolio::SceneConfig::default(),
    };
    config.apply_env_overrides()?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let canvas = phylofolio::Canvas::new(args.width, args.height)?;
    let mut stage = phylofolio::Stage::mount(config, canvas)?;
    if args.expanded {
        stage.set_expanded(true);
    }
    if let Some(index) = args.hover {
        let state = stage
            .menu()
            .label_state(index, stage.now_ms())
            .with_context(|| format!("no menu label with index {index}"))?;
        stage.pointer_move(state.center);
    }
    Ok(stage)
}

/// Advance to `at_ms` and hand back what the surface drew last.
fn capture(
    stage: &mut phylofolio::Stage,
    backend: Box<dyn phylofolio::SceneBackend>,
    at_ms: f64,
) -> anyhow::Result<phylofolio::FrameOutput> {
    if !at_ms.is_finite() || at_ms < 0.0 {
        anyhow::bail!("--at-ms must be finite and >= 0 (got {at_ms})");
    }
    // Run the clock without a surface, then draw exactly one frame.
    stage.advance(at_ms)?;
    stage.attach_surface(backend);
    stage.advance(0.0)?;
    stage
        .take_last_frame()
        .context("stage did not produce a frame")
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_png(path: &Path, frame: &phylofolio::FrameRGBA) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut stage = mount_stage(&args.stage)?;
    let frame = capture(&mut stage, make_backend(args.backend)?, args.at_ms)?.into_rgba()?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let mut stage = mount_stage(&args.stage)?;
    let backend = phylofolio::create_backend(
        phylofolio::BackendKind::Svg,
        &phylofolio::RenderSettings::default(),
    )?;
    let out = capture(&mut stage, backend, args.at_ms)?;
    let markup = out
        .as_svg()
        .context("svg backend did not produce markup")?;

    ensure_parent_dir(&args.out)?;
    std::fs::write(&args.out, markup)
        .with_context(|| format!("write svg '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let fps = phylofolio::Fps::new(args.fps, 1)?;
    let mut stage = mount_stage(&args.stage)?;
    stage.attach_surface(make_backend(args.backend)?);
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let dt = fps.frame_duration_ms();
    for i in 0..args.frames {
        stage.advance(if i == 0 { 0.0 } else { dt })?;
        let frame = stage
            .take_last_frame()
            .with_context(|| format!("stage did not produce frame {i}"))?
            .into_rgba()?;
        write_png(&args.out_dir.join(format!("frame_{i:05}.png")), &frame)?;
    }

    let stats = stage.stats();
    stage.unmount();
    eprintln!(
        "wrote {} frames to {} ({} rotation ticks)",
        stats.frames_rendered,
        args.out_dir.display(),
        stats.rotation_ticks
    );
    Ok(())
}

fn cmd_publications(args: PublicationsArgs) -> anyhow::Result<()> {
    let list = phylofolio::Publications::load(&args.in_path)?;
    let selected: Vec<&phylofolio::Publication> = match args.category {
        Some(CategoryChoice::Academic) => list
            .filter(phylofolio::PublicationCategory::Academic)
            .collect(),
        Some(CategoryChoice::NonAcademic) => list
            .filter(phylofolio::PublicationCategory::NonAcademic)
            .collect(),
        None => list.iter().collect(),
    };
    for p in selected {
        match p.href() {
            Some(href) => println!("{}\t{}\t{}\t{}", p.year, p.title, p.journal, href),
            None => println!("{}\t{}\t{}", p.year, p.title, p.journal),
        }
    }
    Ok(())
}
