//! Oversleep headless driver
//!
//! Plays rounds of the phase state machine without an engine, and dumps or
//! checks config files.

mod autopilot;
mod logging;
mod sinks;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use oversleep_core::{GameConfig, Phase, VERSION};

use autopilot::{run_session, PlanOptions, SessionReport};
use logging::{init_logging, LogFormat};

#[derive(Parser)]
#[command(name = "oversleep")]
#[command(about = "Play and inspect Oversleep rounds headlessly", long_about = None)]
#[command(version = VERSION)]
struct Cli {
    /// Debug-level logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log as newline-delimited JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Quick,
    DreamClock,
}

impl Preset {
    fn config(self) -> GameConfig {
        match self {
            Preset::Quick => GameConfig::quick(),
            Preset::DreamClock => GameConfig::dream_clock(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round with a scripted player
    Play {
        /// Config file (.json, .yaml or .yml); overrides --preset
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "quick")]
        preset: Preset,

        /// RNG seed for the round
        #[arg(long)]
        seed: Option<u64>,

        /// Phase to start in (e.g. Title, Sleep)
        #[arg(long, default_value = "Title")]
        start: String,

        /// Seconds to sleep before waking up (random when omitted)
        #[arg(long)]
        sleep: Option<f32>,

        /// Extra watch checks before waking up
        #[arg(long, default_value = "0")]
        checks: u32,

        /// Taps per second during the run
        #[arg(long, default_value = "8.0")]
        taps: f32,

        /// Never swipe away from obstacles
        #[arg(long)]
        no_dodge: bool,

        /// Frame step, seconds
        #[arg(long, default_value = "0.05")]
        step: f32,

        /// Give up after this much simulated time
        #[arg(long, default_value = "3600")]
        max_seconds: f32,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Print a preset config
    DumpConfig {
        #[arg(long, value_enum, default_value = "quick")]
        preset: Preset,

        /// YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },

    /// Load and validate a config file
    Validate {
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let format = if cli.json { LogFormat::Json } else { LogFormat::Human };
    init_logging(format, cli.verbose);

    match cli.command {
        Commands::Play {
            config,
            preset,
            seed,
            start,
            sleep,
            checks,
            taps,
            no_dodge,
            step,
            max_seconds,
            format,
        } => {
            let mut game_config = match config {
                Some(path) => GameConfig::load(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => preset.config(),
            };
            if let Some(seed) = seed {
                game_config = game_config.with_seed(seed);
            }
            let Some(start) = Phase::from_name(&start) else {
                bail!("Unknown phase '{}'", start);
            };
            if !(step > 0.0 && step.is_finite()) {
                bail!("--step must be a positive number of seconds");
            }

            let opts = PlanOptions {
                sleep_seconds: sleep,
                extra_checks: checks,
                taps_per_second: taps,
                dodge: !no_dodge,
            };
            let report = run_session(game_config, opts, start, step, max_seconds)?;
            match format {
                OutputFormat::Text => print_report(&report),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::DumpConfig { preset, yaml } => {
            let config = preset.config();
            let text = if yaml { config.to_yaml()? } else { config.to_json_pretty()? };
            println!("{}", text);
        }

        Commands::Validate { path } => {
            GameConfig::load(&path)
                .with_context(|| format!("Invalid config {}", path.display()))?;
            println!("{}: OK", path.display());
        }
    }

    Ok(())
}

fn print_report(report: &SessionReport) {
    let summary = &report.summary;
    let outcome = summary.outcome.map(|o| format!("{:?}", o)).unwrap_or_else(|| "-".into());

    println!("Seed:      {}", report.seed);
    println!("Path:      {}", report.path.join(" -> "));
    println!("Ended in:  {} after {:.2}s", report.final_phase, report.elapsed);
    println!("Outcome:   {}", outcome);
    println!("Score:     {} (rank {})", summary.score, summary.rank);
    println!(
        "Slept:     {:02}:{:02}",
        summary.sleep_time.minutes, summary.sleep_time.seconds
    );
    println!(
        "Time left: {:02}:{:02}",
        summary.time_left.minutes, summary.time_left.seconds
    );
    println!("Checks:    {}", summary.check_count);
    if !report.submitted_scores.is_empty() {
        println!("Submitted: {:?}", report.submitted_scores);
    }
}
