use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "kinema", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a script on a fixed tick and print one JSON record per tick.
    Simulate(SimulateArgs),
    /// Play a script up to a point in time and write the canvas as a PNG.
    Frame(FrameArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Override the script's tick length in milliseconds.
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Override the script's tick limit.
    #[arg(long)]
    max_ticks: Option<u64>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Playback time to render, in milliseconds.
    #[arg(long)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::Frame(args) => cmd_frame(args),
    }
}

fn read_script(path: &Path) -> anyhow::Result<kinema::Script> {
    let script = kinema::Script::from_path(path)
        .with_context(|| format!("load script '{}'", path.display()))?;
    Ok(script)
}

/// Scripts run from the command line only get logging hooks.
fn cli_hooks() -> kinema::Hooks {
    kinema::Hooks::new()
        .with_call("log", |_| {
            tracing::info!("call hook fired");
            Ok(())
        })
        .with_act("log", |progress, visual| {
            tracing::info!(progress, x = visual.rect.x0, y = visual.rect.y0, "act hook");
            Ok(())
        })
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let mut script = read_script(&args.in_path)?;
    if let Some(tick_ms) = args.tick_ms {
        script.tick_ms = tick_ms;
    }
    if let Some(max_ticks) = args.max_ticks {
        script.max_ticks = max_ticks;
    }

    let mut sim = kinema::Simulation::new(&script, &cli_hooks())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut write_err = None;
    let ticks = sim.run(|record| {
        if write_err.is_some() {
            return;
        }
        let line = serde_json::to_string(record).map_err(anyhow::Error::from);
        if let Err(e) = line.and_then(|line| writeln!(out, "{line}").map_err(anyhow::Error::from)) {
            write_err = Some(e);
        }
    })?;
    if let Some(e) = write_err {
        return Err(e.context("write tick record"));
    }

    eprintln!("simulated {ticks} ticks");
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;
    let mut sim = kinema::Simulation::new(&script, &cli_hooks())?;
    sim.advance_to(args.at_ms)?;
    let frame = sim.render();

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
