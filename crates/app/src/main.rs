use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use workout_coach_core::{
    Catalogue, CoachEvent, EngineConfig, SessionSnapshot, TickInput, TickLoop, TickObserver,
    WorkoutController,
};

fn main() -> workout_coach_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Catalogue { file } => run_catalogue(file.as_deref()),
        Commands::Config => run_config(),
        Commands::Replay {
            frames,
            plan,
            config,
            catalogue,
        } => run_replay(&frames, &plan, config.as_deref(), catalogue.as_deref()),
    }
}

fn run_catalogue(file: Option<&Path>) -> workout_coach_core::Result<()> {
    let catalogue = load_catalogue(file)?;
    println!("{}", serde_json::to_string_pretty(catalogue.exercises())?);
    Ok(())
}

fn run_config() -> workout_coach_core::Result<()> {
    println!("{}", EngineConfig::default().to_json_pretty()?);
    Ok(())
}

fn run_replay(
    frames: &Path,
    plan: &[String],
    config: Option<&Path>,
    catalogue: Option<&Path>,
) -> workout_coach_core::Result<()> {
    tracing::info!(?frames, ?plan, "replaying recorded session");

    let config = match config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let plan = load_catalogue(catalogue)?.plan(plan)?;

    let mut controller = WorkoutController::new(config)?;
    let report = controller.start(plan)?;
    for event in &report.events {
        tracing::info!(event = %event.message(), "coach");
    }

    let reader = BufReader::new(File::open(frames)?);
    let mut ticks = reader
        .lines()
        .enumerate()
        .map_while(|(index, line)| match line {
            Ok(line) => Some((index, line)),
            Err(err) => {
                tracing::error!(line = index + 1, %err, "failed to read frame, stopping");
                None
            }
        })
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str::<TickInput>(&line) {
            Ok(input) => Some(input),
            Err(err) => {
                tracing::warn!(line = index + 1, %err, "skipping malformed frame");
                None
            }
        });

    let mut narrator = Narrator::default();
    let stats = TickLoop::new().run(&mut controller, &mut ticks, &mut narrator);
    tracing::info!(
        ticks = stats.ticks,
        processed = stats.processed,
        skipped = stats.skipped,
        phase = ?controller.phase(),
        "replay finished"
    );

    if let Some(last) = narrator.last {
        tracing::info!(
            elapsed_ms = last.elapsed_ms,
            form = last.form_score_pct,
            "final state"
        );
    }

    println!("{}", serde_json::to_string_pretty(&controller.summary())?);
    Ok(())
}

fn load_catalogue(file: Option<&Path>) -> workout_coach_core::Result<Catalogue> {
    match file {
        Some(path) => Catalogue::load(path),
        None => Ok(Catalogue::standard()),
    }
}

/// Logs narration events and keeps the latest snapshot.
#[derive(Default)]
struct Narrator {
    last: Option<SessionSnapshot>,
}

impl TickObserver for Narrator {
    fn on_tick(&mut self, snapshot: &SessionSnapshot, events: &[CoachEvent]) {
        for event in events {
            tracing::info!(event = %event.message(), "coach");
        }
        if snapshot.low_confidence_notice {
            tracing::debug!("waiting for the person to return");
        }
        self.last = Some(snapshot.clone());
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Camera-driven workout coach engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the exercise catalogue as JSON.
    Catalogue {
        /// Optional JSON catalogue to print instead of the built-in one.
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Print the default engine configuration as JSON.
    Config,
    /// Run a workout plan against recorded pose ticks (one JSON object per line).
    Replay {
        /// Path to the recorded ticks.
        frames: PathBuf,
        /// Comma separated exercise names, in order.
        #[arg(short, long, value_delimiter = ',', required = true)]
        plan: Vec<String>,
        /// Optional engine configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Optional JSON catalogue to resolve the plan against.
        #[arg(long)]
        catalogue: Option<PathBuf>,
    },
}
