use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "framereel", version)]
struct Cli {
    /// Log at debug level unless `RUST_LOG` is set.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render every frame of a scene, as numbered bitmaps or a video.
    Render(RenderArgs),
    /// Render a single frame as a bitmap (and optionally a PNG preview).
    Frame(FrameArgs),
    /// Print the header of a bitmap file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct OverrideArgs {
    /// Render config JSON; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long)]
    fps: Option<u32>,

    /// Render at most this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Output directory for numbered bitmaps.
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    overrides: OverrideArgs,

    /// Encode a video with `ffmpeg` instead of writing numbered bitmaps (`.avi` is uncompressed).
    #[arg(long)]
    video: Option<PathBuf>,

    /// File name prefix for numbered bitmaps.
    #[arg(long, default_value = "frame")]
    prefix: String,

    /// Composite and encode frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for `--parallel`.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    overrides: OverrideArgs,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output bitmap path.
    #[arg(long)]
    out: PathBuf,

    /// Also write a PNG preview.
    #[arg(long)]
    png: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Bitmap file to read.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<framereel::Scene> {
    let scene = framereel::SceneDef::from_json_path(path)?.into_scene()?;
    scene.validate_references()?;
    tracing::debug!(
        assets = scene.assets().len(),
        frames = scene.frames().len(),
        "scene loaded"
    );
    Ok(scene)
}

fn resolve_config(o: &OverrideArgs) -> anyhow::Result<framereel::RenderConfig> {
    let mut cfg = match &o.config {
        Some(path) => framereel::RenderConfig::from_json_path(path)?,
        None => framereel::RenderConfig::default(),
    };
    if let Some(w) = o.width {
        cfg.width = w;
    }
    if let Some(h) = o.height {
        cfg.height = h;
    }
    if let Some(fps) = o.fps {
        cfg.fps = fps;
    }
    if o.max_frames.is_some() {
        cfg.max_frames = o.max_frames;
    }
    if let Some(dir) = &o.out_dir {
        cfg.output_dir = dir.clone();
    }
    cfg.validate()?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let cfg = resolve_config(&args.overrides)?;

    let mut sink: Box<dyn framereel::ContainerSink> = match &args.video {
        Some(out) => Box::new(framereel::FfmpegSink::new(framereel::FfmpegSinkOpts::new(
            out,
        ))),
        None => Box::new(framereel::BmpSequenceSink::new(
            &cfg.output_dir,
            args.prefix.clone(),
        )),
    };

    let stats = if args.parallel {
        let threading = framereel::RenderThreading {
            threads: args.threads,
            ..framereel::RenderThreading::default()
        };
        framereel::render_scene_parallel(
            &scene,
            &cfg,
            &threading,
            framereel::CpuRasterizer::new,
            sink.as_mut(),
        )?
    } else {
        let mut rasterizer = framereel::CpuRasterizer::new();
        framereel::render_scene(&scene, &cfg, &mut rasterizer, sink.as_mut())?
    };

    let dest = args.video.as_deref().unwrap_or(&cfg.output_dir);
    eprintln!(
        "wrote {} frame(s), {} bytes -> {}",
        stats.frames_written,
        stats.bytes_written,
        dest.display()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.in_path)?;
    let cfg = resolve_config(&args.overrides)?;

    let index = usize::try_from(args.frame).context("frame index out of range")?;
    let frame = scene.frames().get(index).with_context(|| {
        format!(
            "scene has {} frame(s), no frame {}",
            scene.frames().len(),
            args.frame
        )
    })?;

    let mut rasterizer = framereel::CpuRasterizer::new();
    let pixels = framereel::compose_frame(
        &scene,
        frame,
        framereel::FrameIndex(args.frame),
        cfg.canvas()?,
        &mut rasterizer,
    )?;

    framereel::encode::ffmpeg::ensure_parent_dir(&args.out)?;
    let bytes = framereel::BitmapEncoder::new().encode(&pixels)?;
    std::fs::write(&args.out, bytes)
        .with_context(|| format!("write bitmap '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(png) = &args.png {
        framereel::encode::ffmpeg::ensure_parent_dir(png)?;
        let (width, height) = (pixels.width(), pixels.height());
        image::save_buffer_with_format(
            png,
            &pixels.into_data(),
            width,
            height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", png.display()))?;
        eprintln!("wrote {}", png.display());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("read bitmap '{}'", args.path.display()))?;
    let (h, _) = framereel::decode_bitmap(&bytes)?;

    println!("file_size        {}", h.file_size);
    println!("pixel_offset     {}", h.pixel_data_offset);
    println!("info_size        {}", h.info_header_size);
    println!("width            {}", h.width);
    println!("height           {}", h.height);
    println!("planes           {}", h.planes);
    println!("bits_per_pixel   {}", h.bits_per_pixel);
    println!("compression      {}", h.compression);
    println!("image_size       {}", h.image_size);
    println!("x_ppm            {}", h.x_pixels_per_meter);
    println!("y_ppm            {}", h.y_pixels_per_meter);
    println!("colors_used      {}", h.colors_used);
    println!("colors_important {}", h.important_colors);
    Ok(())
}
