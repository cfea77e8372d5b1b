use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "iconstack", version)]
struct Cli {
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cover-fit source images into every icon, top shelf and launch slot.
    Sources(RunArgs),
    /// Render the procedural layers into every slot.
    Procedural(ProceduralArgs),
    /// Cover-fit one image to one size.
    Fit(FitArgs),
    /// List the output slots.
    Slots,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Pipeline config JSON. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the source directory.
    #[arg(long)]
    source_dir: Option<PathBuf>,

    /// Override the output directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Install into this asset catalog as well.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Only run these family ids (repeatable).
    #[arg(long)]
    only: Vec<String>,

    /// Process families in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Args, Debug)]
struct ProceduralArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Override the super-sampling factor.
    #[arg(long)]
    super_sample: Option<u32>,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Sources(args) => cmd_sources(args),
        Command::Procedural(args) => cmd_procedural(args),
        Command::Fit(args) => cmd_fit(args),
        Command::Slots => cmd_slots(),
    }
}

fn load_config(args: &RunArgs) -> anyhow::Result<iconstack::PipelineConfig> {
    let mut cfg = match &args.config {
        Some(path) => iconstack::PipelineConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => iconstack::PipelineConfig::default(),
    };
    if let Some(dir) = &args.source_dir {
        cfg.source_dir = dir.clone();
    }
    if let Some(dir) = &args.out {
        cfg.output_dir = dir.clone();
    }
    if let Some(dir) = &args.catalog {
        cfg.catalog_dir = Some(dir.clone());
    }
    if !args.only.is_empty() {
        cfg.only = args.only.clone();
    }
    cfg.parallel |= args.parallel;
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }
    Ok(cfg)
}

fn cmd_sources(args: RunArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args)?;
    let driver = iconstack::Driver::new(cfg, None)?;
    let report = driver.run_sources()?;
    print_report(&report);
    Ok(())
}

fn cmd_procedural(args: ProceduralArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(&args.run)?;
    if let Some(ss) = args.super_sample {
        cfg.super_sample = ss;
    }
    let driver = iconstack::Driver::new(cfg, None)?;
    let report = driver.run_procedural()?;
    print_report(&report);
    Ok(())
}

fn cmd_fit(args: FitArgs) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(&args.in_path).with_context(|| format!("read '{}'", args.in_path.display()))?;
    let source = iconstack::decode_image(&bytes)?;
    let target = iconstack::Size::new(args.width, args.height)?;
    let fitted = iconstack::fit_cover(&source, target)?;
    let png = iconstack::encode_png(&fitted, iconstack::AlphaMode::Keep)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, png).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_slots() -> anyhow::Result<()> {
    println!("# sources");
    for family in &iconstack::SOURCE_FAMILIES {
        for slot in family.slots()? {
            println!("{:<18} {:<11} {}", family.id, slot.size.to_string(), slot.file_name);
        }
    }
    println!("# procedural");
    for target in &iconstack::PROCEDURAL_TARGETS {
        for &scale in target.scales {
            for slot in target.slots_at(scale)? {
                println!("{:<18} {:<11} {}", target.id, slot.size.to_string(), slot.file_name);
            }
        }
    }
    Ok(())
}

fn print_report(report: &iconstack::RunReport) {
    for f in &report.written {
        println!("wrote {}", f.path.display());
    }
    for s in &report.skipped {
        println!("skipped {}: {}", s.family, s.error);
    }
    for w in &report.warnings {
        println!("warning {w}");
    }
}
