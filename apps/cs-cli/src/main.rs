use clap::{Parser, Subcommand, ValueEnum};
use cs_core::angle::FrameInput;
use cs_session::{SessionError, build_run_options, build_simulator};
use cs_sim::{
    EngineConfig, EngineKind, FIRING_ORDER, RunRecord, SimError, Simulator, Snapshot,
    firing_cylinder, run_frames,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "cs-cli")]
#[command(about = "cyclesim CLI - frame-driven engine and motor simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a session file
    Validate {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
    },
    /// Run a session headless and export the recorded frames
    Run {
        /// Path to the session YAML or JSON file
        session_path: PathBuf,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
        /// Output file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Advance a default engine a fixed number of frames
    Step {
        /// piston, rotary, electric or v8
        #[arg(value_parser = parse_kind)]
        engine: EngineKind,
        /// Shaft speed, held to [0, 10000]
        #[arg(long, default_value_t = 3000.0)]
        rpm: f64,
        /// Frame time step in seconds
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f64,
        #[arg(long, default_value_t = 10)]
        frames: usize,
        #[arg(long)]
        paused: bool,
        /// Manual angle in radians, applied while paused
        #[arg(long)]
        angle: Option<f64>,
    },
    /// Show which V8 cylinder fires at a master crank angle
    Firing {
        /// Master crank angle in degrees
        angle_deg: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

fn parse_kind(s: &str) -> Result<EngineKind, String> {
    s.parse()
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { session_path } => cmd_validate(&session_path),
        Commands::Run {
            session_path,
            format,
            output,
        } => cmd_run(&session_path, format, output.as_deref()),
        Commands::Step {
            engine,
            rpm,
            dt,
            frames,
            paused,
            angle,
        } => cmd_step(engine, rpm, dt, frames, paused, angle),
        Commands::Firing { angle_deg } => cmd_firing(angle_deg),
    }
}

fn cmd_validate(session_path: &Path) -> CliResult<()> {
    println!("Validating session: {}", session_path.display());
    let session = cs_session::load(session_path)?;
    // Model constructors also reject combinations, e.g. back-EMF above the bus
    build_simulator(&session)?;
    build_run_options(&session.run)?;
    println!("✓ Session '{}' is valid ({:?})", session.name, session.engine);
    Ok(())
}

#[derive(Serialize)]
struct FrameRow<'a> {
    t: f64,
    frame: &'a Snapshot,
}

fn cmd_run(session_path: &Path, format: Format, output: Option<&Path>) -> CliResult<()> {
    let session = cs_session::load(session_path)?;
    let mut sim = build_simulator(&session)?;
    let opts = build_run_options(&session.run)?;
    let record = run_frames(&mut sim, &opts)?;
    info!(session = %session.name, frames = record.len(), "run complete");

    let content = match format {
        Format::Csv => to_csv(&record),
        Format::Json => {
            let rows: Vec<FrameRow<'_>> = record
                .t
                .iter()
                .zip(&record.frames)
                .map(|(&t, frame)| FrameRow { t, frame })
                .collect();
            serde_json::to_string_pretty(&rows)?
        }
    };

    if let Some(path) = output {
        std::fs::write(path, content)?;
        println!("✓ Exported {} frames to {}", record.len(), path.display());
    } else {
        print!("{}", content);
    }
    Ok(())
}

fn to_csv(record: &RunRecord) -> String {
    let mut csv = String::from("t_s,engine,angle_rad,phase,temperature_k,torque_nm\n");
    for (t, frame) in record.t.iter().zip(&record.frames) {
        let phase = frame.phase().map(|p| p.to_string()).unwrap_or_default();
        csv.push_str(&format!(
            "{},{},{},{},{},{}\n",
            t,
            frame.kind(),
            frame.angle(),
            phase,
            frame.temperature_k(),
            frame.torque()
        ));
    }
    csv
}

fn cmd_step(
    engine: EngineKind,
    rpm: f64,
    dt: f64,
    frames: usize,
    paused: bool,
    angle: Option<f64>,
) -> CliResult<()> {
    let mut sim = Simulator::new(engine, EngineConfig::default());
    let input = if paused {
        FrameInput::paused(rpm, angle, dt)
    } else {
        FrameInput::running(rpm, dt)
    }
    .clamped();

    println!("Stepping {} engine: rpm = {}, dt = {:.4} s", engine, input.rpm, dt);
    for i in 1..=frames {
        let snap = sim.advance(&input);
        let phase = snap
            .phase()
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        let mut line = format!(
            "  {:>4}  angle={:.4} rad  phase={:<11} T={:.1} K  torque={:.2} N·m",
            i,
            snap.angle(),
            phase,
            snap.temperature_k(),
            snap.torque()
        );
        if let Snapshot::V8(v8) = &snap {
            if let Some(id) = v8.firing {
                line.push_str(&format!("  firing={}", id));
            }
        }
        println!("{}", line);
    }
    Ok(())
}

fn cmd_firing(angle_deg: f64) -> CliResult<()> {
    let master = angle_deg.rem_euclid(720.0);
    match firing_cylinder(master) {
        Some(id) => {
            let bank = FIRING_ORDER
                .iter()
                .find(|slot| slot.id == id)
                .map(|slot| slot.bank.to_string())
                .unwrap_or_default();
            println!("Master {:.1}°: cylinder {}{} firing", master, id, bank);
        }
        None => println!("Master {:.1}°: no cylinder firing", master),
    }
    Ok(())
}
