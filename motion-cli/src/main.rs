use std::fs::File;
use std::io::{BufReader, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use motion_core::playback::{PlaybackScheduler, RobotDriver, RobotError};
use motion_core::{Config, Core, Pose};

#[derive(Parser, Debug)]
#[command(name = "motion-core", version)]
struct Cli {
    /// Path to a JSON config file (per-joint limits, scheduler periods).
    /// Falls back to `Config::default()` when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a project JSON file against the crate's invariants.
    Validate(ValidateArgs),
    /// Evaluate the trajectory at a single millisecond timestamp.
    Eval(EvalArgs),
    /// Export a CSV of sampled poses over a time range.
    Range(RangeArgs),
    /// Drive the playback loop against a logging stub robot driver.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct EvalArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Query time, milliseconds.
    #[arg(long)]
    t_ms: i64,
}

#[derive(Parser, Debug)]
struct RangeArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Range start, milliseconds.
    #[arg(long)]
    t0_ms: i64,
    /// Range end, milliseconds (inclusive).
    #[arg(long)]
    t1_ms: i64,
    /// Sample step, milliseconds.
    #[arg(long, default_value_t = 10.0)]
    step_ms: f64,
    /// Output CSV path; prints to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
    /// Playback start marker, milliseconds.
    #[arg(long, default_value_t = 0)]
    t0_ms: i64,
    /// How long to let the loop run before stopping it, milliseconds.
    #[arg(long, default_value_t = 1000)]
    duration_ms: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Eval(args) => cmd_eval(args, config),
        Command::Range(args) => cmd_range(args, config),
        Command::Play(args) => cmd_play(args, config),
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
    let config: Config =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse config JSON")?;
    config.validate()?;
    Ok(config)
}

fn read_project(path: &std::path::Path) -> anyhow::Result<motion_core::Project> {
    let f = File::open(path).with_context(|| format!("open project '{}'", path.display()))?;
    let project: motion_core::Project =
        serde_json::from_reader(BufReader::new(f)).with_context(|| "parse project JSON")?;
    Ok(project)
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let core = Core::new(Config::default());
    core.set_project(project)?;
    eprintln!("project is valid");
    Ok(())
}

fn cmd_eval(args: EvalArgs, config: Config) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let core = Core::new(config);
    core.set_project(project)?;
    let pose = core.eval_at(args.t_ms);
    println!("{}", format_pose_json(&pose));
    Ok(())
}

fn cmd_range(args: RangeArgs, config: Config) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let core = Core::new(config);
    core.set_project(project)?;
    let csv = motion_core::export_csv(&core, args.t0_ms, args.t1_ms, args.step_ms, true);
    match args.out {
        Some(path) => {
            let mut f = File::create(&path)
                .with_context(|| format!("create output '{}'", path.display()))?;
            f.write_all(csv.as_bytes())?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{csv}"),
    }
    Ok(())
}

fn cmd_play(args: PlayArgs, config: Config) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let period_s = config.period;
    let core = Arc::new(Core::new(config));
    core.set_project(project)?;

    let driver: Arc<dyn RobotDriver> = Arc::new(LoggingRobotDriver::default());
    let scheduler = PlaybackScheduler::new(core, driver, period_s);

    scheduler.start_play(args.t0_ms)?;
    std::thread::sleep(std::time::Duration::from_millis(args.duration_ms));
    scheduler.stop_play();

    let state = scheduler.state();
    eprintln!(
        "stopped at marker_ms={} (playing={})",
        state.marker_ms, state.playing
    );
    Ok(())
}

fn format_pose_json(pose: &Pose) -> String {
    let joints: Vec<String> = pose.iter().map(|v| format!("{v:.9}")).collect();
    format!("[{}]", joints.join(","))
}

/// A robot driver stub that only logs commands, for local smoke-testing the
/// `play` subcommand without hardware.
#[derive(Default)]
struct LoggingRobotDriver;

impl RobotDriver for LoggingRobotDriver {
    fn connected(&self) -> bool {
        true
    }

    fn ready(&self) -> bool {
        true
    }

    fn teleop_active(&self) -> bool {
        false
    }

    fn send_command(&self, pose: Pose, min_time_s: f64) -> Result<(), RobotError> {
        tracing::debug!(min_time_s, pose = ?pose, "sending joint command");
        Ok(())
    }
}
