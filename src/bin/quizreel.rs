use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quizreel", version, about = "Render word-by-word quiz videos")]
struct Cli {
    /// Log debug events (per timeline entry, ffmpeg invocation).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the full MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render one timeline entry as a PNG.
    Frame(FrameArgs),
    /// Print the timeline as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Output MP4 path (defaults to the job's `out`).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,

    /// Timeline entry index (0-based).
    #[arg(long)]
    entry: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Job JSON.
    #[arg(long)]
    job: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(path: &std::path::Path) -> anyhow::Result<quizreel::LoadedJob> {
    quizreel::LoadedJob::from_path(path).with_context(|| format!("load job '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let job = load(&args.job)?;
    let report = quizreel::render_quiz(&job, args.out.as_deref())?;
    eprintln!(
        "wrote {} ({} frames, {:.3}s)",
        report.out.display(),
        report.assemble.frames,
        report.assemble.duration.as_secs_f64()
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = load(&args.job)?;
    quizreel::render_entry_png(&job, args.entry, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let job = load(&args.job)?;
    let plan = quizreel::plan_quiz(&job)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("serialize plan")?
    );
    Ok(())
}
