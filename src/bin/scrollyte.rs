use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollyte::{
    AssetLoader, CpuSurface, FsLoader, Page, PlaceholderLoader, ScrollInput,
    render::recording::RecordingSurface, scene::BuiltPage,
};

#[derive(Parser, Debug)]
#[command(name = "scrollyte", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a linear scroll and print one JSON line per tick.
    Trace(TraceArgs),
    /// Render every consumer at a scroll offset as PNG.
    Frame(FrameArgs),
    /// Print the resolved region table.
    Regions(RegionsArgs),
}

#[derive(Parser, Debug)]
struct PageArgs {
    /// Input page JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory frame paths are resolved against; placeholder frames are used when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll target in pixels.
    #[arg(long)]
    to: f64,

    /// Number of input steps.
    #[arg(long, default_value_t = 60)]
    steps: u32,

    /// Extra ticks after the last input, to let smoothing and scrub settle.
    #[arg(long, default_value_t = 0)]
    tail: u32,

    /// Seconds per tick.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    page: PageArgs,

    /// Scroll offset in pixels.
    #[arg(long)]
    scroll: f64,

    /// Output PNG path; with several consumers the consumer name is appended to the stem.
    #[arg(long)]
    out: PathBuf,

    /// Only render this consumer.
    #[arg(long)]
    consumer: Option<String>,

    /// Ticks to run after jumping.
    #[arg(long, default_value_t = 0)]
    settle_ticks: u32,
}

#[derive(Parser, Debug)]
struct RegionsArgs {
    #[command(flatten)]
    page: PageArgs,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Trace(args) => cmd_trace(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Regions(args) => cmd_regions(args),
    }
}

fn read_page(path: &Path) -> anyhow::Result<Page> {
    let page =
        Page::from_path(path).with_context(|| format!("load page '{}'", path.display()))?;
    page.validate()
        .with_context(|| format!("validate page '{}'", path.display()))?;
    Ok(page)
}

fn make_loader(assets: Option<&Path>) -> Box<dyn AssetLoader> {
    match assets {
        Some(root) => Box::new(FsLoader::new(root)),
        None => Box::new(PlaceholderLoader::new(192, 108)),
    }
}

fn build_recording(args: &PageArgs) -> anyhow::Result<BuiltPage> {
    let page = read_page(&args.in_path)?;
    let loader = make_loader(args.assets.as_deref());
    let built = page.build(loader.as_ref(), |_, vp| {
        Ok(RecordingSurface::new(
            vp.width.round() as u32,
            vp.height.round() as u32,
        ))
    })?;
    Ok(built)
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.steps > 0, "--steps must be > 0");
    anyhow::ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be finite and > 0"
    );

    let BuiltPage {
        mut stage, layout, ..
    } = build_recording(&args.page)?;
    let step = args.to / f64::from(args.steps);

    let out = std::io::stdout();
    let mut out = out.lock();
    for i in 0..args.steps + args.tail {
        if i < args.steps {
            stage.input(&ScrollInput::wheel(step), &layout);
        }
        let report = stage.tick(args.dt, &layout)?;
        serde_json::to_writer(&mut out, &report).context("write tick report")?;
        std::io::Write::write_all(&mut out, b"\n").context("write tick report")?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let page = read_page(&args.page.in_path)?;
    let loader = make_loader(args.page.assets.as_deref());
    let BuiltPage {
        mut stage, layout, ..
    } = page.build(loader.as_ref(), |_, vp| {
        CpuSurface::new(vp.width.round() as u32, vp.height.round() as u32)
    })?;

    stage.settle_at(args.scroll, &layout)?;
    for _ in 0..args.settle_ticks {
        stage.tick(1.0 / 60.0, &layout)?;
    }

    let mut shots = stage.snapshots();
    if let Some(name) = &args.consumer {
        shots.retain(|(n, _)| n == name);
        anyhow::ensure!(!shots.is_empty(), "no consumer named '{name}'");
    }
    anyhow::ensure!(!shots.is_empty(), "page has no drawing consumers");

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let single = shots.len() == 1;
    for (name, frame) in shots {
        let path = if single {
            args.out.clone()
        } else {
            suffixed(&args.out, &name)
        };
        let (w, h) = (frame.width, frame.height);
        let data = frame.into_straight();
        image::save_buffer_with_format(
            &path,
            &data,
            w,
            h,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn suffixed(out: &Path, name: &str) -> PathBuf {
    let stem = out
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_owned());
    let safe: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    out.with_file_name(format!("{stem}-{safe}.png"))
}

fn cmd_regions(args: RegionsArgs) -> anyhow::Result<()> {
    let BuiltPage {
        mut stage, layout, ..
    } = build_recording(&args.page)?;
    stage.tick(0.0, &layout)?;

    let table = serde_json::json!({
        "viewport": stage.viewport(),
        "document_height": stage.scheduler().document_height(),
        "max_scroll": stage.smoothing().max_scroll(),
        "regions": stage.scheduler().statuses(),
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&table).context("serialize region table")?
    );
    Ok(())
}

