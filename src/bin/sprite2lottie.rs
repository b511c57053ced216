use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use sprite2lottie::logging::{LoggingConfig, init_logging};

#[derive(Parser, Debug)]
#[command(name = "sprite2lottie", version)]
struct Cli {
    /// Log filter directive (overridden by RUST_LOG).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a sprite sheet into frame files and a Lottie JSON document.
    Convert(ConvertArgs),
    /// Print sheet dimensions and the frame rects a grid would produce.
    Inspect(InspectArgs),
    /// Write a default config file.
    Init(InitArgs),
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Config JSON. Relative paths inside it resolve against its directory.
    #[arg(long)]
    config: PathBuf,

    /// Override the output Lottie JSON path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Override the frames working directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// Override extraction worker threads.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Sprite sheet image.
    #[arg(long)]
    sprite: PathBuf,

    #[arg(long, default_value_t = 1)]
    rows: u32,

    #[arg(long, default_value_t = 1)]
    cols: u32,

    /// Frame count (defaults to rows * cols).
    #[arg(long)]
    frames: Option<u32>,

    #[arg(long, value_enum, default_value_t = OrderChoice::RowMajor)]
    order: OrderChoice,

    /// Gutter between cells in pixels.
    #[arg(long, default_value_t = 0)]
    padding: u32,
}

#[derive(Parser, Debug)]
struct InitArgs {
    /// Where to write the config.
    #[arg(long, default_value = "sprite2lottie.json")]
    out: PathBuf,

    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderChoice {
    RowMajor,
    ColumnMajor,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&LoggingConfig {
        level: cli.log_level.clone(),
        json: cli.log_json,
    });

    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Init(args) => cmd_init(args),
    }
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut cfg = sprite2lottie::ConvertConfig::from_path(&args.config)
        .with_context(|| format!("load config '{}'", args.config.display()))?;

    if let Some(out) = args.out {
        cfg.output.json_path = out;
    }
    if let Some(dir) = args.frames_dir {
        cfg.output.frames_dir = dir;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }

    let report = sprite2lottie::convert(&cfg, &sprite2lottie::TracingObserver)
        .context("sprite to lottie conversion failed")?;

    eprintln!(
        "wrote {} frames ({}x{}) to {}",
        report.frames,
        report.frame_width,
        report.frame_height,
        report.frames_dir.display()
    );
    eprintln!(
        "wrote {} ({:.2}s)",
        report.json_path.display(),
        report.duration_secs
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (width, height) = sprite2lottie::probe_dimensions(&args.sprite)?;

    let layout = sprite2lottie::LayoutConfig {
        grid: sprite2lottie::Grid {
            rows: args.rows,
            cols: args.cols,
        },
        order: match args.order {
            OrderChoice::RowMajor => sprite2lottie::FrameOrder::RowMajor,
            OrderChoice::ColumnMajor => sprite2lottie::FrameOrder::ColumnMajor,
        },
        padding: args.padding,
        ..sprite2lottie::LayoutConfig::default()
    };
    let frames = args
        .frames
        .unwrap_or_else(|| args.rows.saturating_mul(args.cols));
    let set = sprite2lottie::resolve_frames(width, height, frames, &layout)?;

    let out = serde_json::json!({
        "sheet": { "width": width, "height": height },
        "layout": set,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&out).context("serialize inspect output")?
    );
    Ok(())
}

fn cmd_init(args: InitArgs) -> anyhow::Result<()> {
    if args.out.exists() && !args.force {
        anyhow::bail!(
            "'{}' already exists (pass --force to overwrite)",
            args.out.display()
        );
    }
    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let json = sprite2lottie::ConvertConfig::default().to_json_pretty()?;
    std::fs::write(&args.out, json)
        .with_context(|| format!("write config '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
