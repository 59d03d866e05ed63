use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scrollmotion", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and validate a scene file.
    Validate(ValidateArgs),
    /// Replay an event trace against a scene and emit per-frame reports as JSON.
    Replay(ReplayArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,
}

#[derive(Parser, Debug)]
struct ReplayArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Input event trace JSON.
    #[arg(long)]
    trace: PathBuf,

    /// Output reports JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Print only the final frame report.
    #[arg(long)]
    last: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Replay(args) => cmd_replay(args),
    }
}

fn read_scene(path: &Path) -> anyhow::Result<scrollmotion::Scene> {
    let scene = scrollmotion::Scene::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    scene
        .validate()
        .with_context(|| format!("validate scene '{}'", path.display()))?;
    Ok(scene)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;
    println!(
        "ok: {} bindings at {} fps",
        scene.def().bindings.len(),
        scene.def().cadence.as_f64()
    );
    Ok(())
}

fn cmd_replay(args: ReplayArgs) -> anyhow::Result<()> {
    let scene = read_scene(&args.scene)?;
    let trace = scrollmotion::EventTrace::from_path(&args.trace)
        .with_context(|| format!("load trace '{}'", args.trace.display()))?;

    let mut reports = scrollmotion::replay(&scene, &trace).context("replay trace")?;
    if args.last {
        reports = reports.pop().into_iter().collect();
    }

    match &args.out {
        Some(path) => {
            let f = File::create(path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            let mut w = BufWriter::new(f);
            serde_json::to_writer_pretty(&mut w, &reports).context("write reports JSON")?;
            w.flush().context("flush reports JSON")?;
            eprintln!("wrote {} frame reports to {}", reports.len(), path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, &reports).context("write reports JSON")?;
            writeln!(lock).context("write reports JSON")?;
        }
    }
    Ok(())
}
