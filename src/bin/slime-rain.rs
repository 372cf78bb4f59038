use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "slime-rain", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rain droplets onto an image and write the result.
    Composite(CompositeArgs),
    /// Print the default configuration as JSON.
    Defaults,
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Input image (PNG or JPEG).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Directory of droplet sprites.
    #[arg(long)]
    assets: PathBuf,

    /// Output image path; a `.jpg`/`.jpeg` extension selects JPEG output.
    #[arg(long)]
    out: PathBuf,

    /// Configuration JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible output. Omit for a fresh field every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the droplet count.
    #[arg(long)]
    count: Option<u32>,

    /// Override the wetting intensity (0..=1).
    #[arg(long)]
    intensity: Option<f32>,

    /// Enable sticky droplets with this blur radius.
    #[arg(long)]
    blur: Option<u32>,

    /// Override the processing timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Accepted sprite extensions (repeatable).
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Also write the overlay field as PNG.
    #[arg(long)]
    field_out: Option<PathBuf>,

    /// Also write the contact mask as PNG.
    #[arg(long)]
    mask_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Composite(args) => cmd_composite(args),
        Command::Defaults => cmd_defaults(),
    }
}

fn cmd_defaults() -> anyhow::Result<()> {
    println!("{}", slime_rain::RainConfig::default().to_json_pretty()?);
    Ok(())
}

fn load_config(args: &CompositeArgs) -> anyhow::Result<slime_rain::RainConfig> {
    let mut cfg = match &args.config {
        Some(path) => slime_rain::RainConfig::from_path(path)?,
        None => slime_rain::RainConfig::default(),
    };
    if let Some(n) = args.count {
        cfg.droplet_count = n;
    }
    if let Some(v) = args.intensity {
        cfg.wet_intensity = v;
    }
    if let Some(r) = args.blur {
        cfg.blur_radius = Some(r);
    }
    if let Some(ms) = args.timeout_ms {
        cfg.timeout_ms = Some(ms);
    }
    if is_jpeg_path(&args.out) && cfg.output_format == slime_rain::OutputFormat::Png {
        cfg.output_format = slime_rain::OutputFormat::Jpeg { quality: 90 };
    }
    cfg.validate()?;
    Ok(cfg)
}

fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"))
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;

    let source = if args.extensions.is_empty() {
        slime_rain::DirSpriteSource::new(&args.assets)
    } else {
        slime_rain::DirSpriteSource::with_extensions(&args.assets, &args.extensions)
    };
    let pipeline = slime_rain::RainPipeline::new(cfg, source)?;

    let mut rng = match args.seed {
        Some(seed) => slime_rain::seeded_rng(seed),
        None => slime_rain::entropy_rng(),
    };

    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read input image '{}'", args.in_path.display()))?;

    let pool = build_thread_pool(args.threads)?;
    let (encoded, out) = pool.install(|| pipeline.composite_with_output(&bytes, &mut rng))?;

    write_file(&args.out, &encoded)?;
    if let Some(path) = &args.field_out {
        let png = slime_rain::encode_image(&out.field, slime_rain::OutputFormat::Png)?;
        write_file(path, &png)?;
    }
    if let Some(path) = &args.mask_out {
        ensure_parent_dir(path)?;
        out.mask
            .save_with_format(path, image::ImageFormat::Png)
            .with_context(|| format!("write mask png '{}'", path.display()))?;
    }

    eprintln!(
        "wrote {} ({} droplets placed, {} skipped, {} px wetted)",
        args.out.display(),
        out.stats.droplets_placed,
        out.stats.droplets_skipped,
        out.stats.covered_pixels
    );
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn build_thread_pool(threads: Option<usize>) -> anyhow::Result<rayon::ThreadPool> {
    if threads == Some(0) {
        anyhow::bail!("'--threads' must be >= 1 when set");
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .context("failed to build rayon thread pool")
}
