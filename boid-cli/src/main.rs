use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_cli::{load_settings, write_template, RunOptions, Runner};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless 3D flocking simulation", long_about = None)]
struct Args {
    /// Settings file (JSON). Every field is required; see --write-template
    #[arg(short, long, required_unless_present = "write_template")]
    config: Option<PathBuf>,

    /// Write a settings template to this path and exit
    #[arg(long)]
    write_template: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Override the population from the settings file
    #[arg(short, long)]
    population: Option<usize>,

    /// Override the RNG seed from the settings file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write JSON-line tick reports to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a report every N ticks (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Include per-agent snapshots every N ticks (0 disables)
    #[arg(long, default_value_t = 0)]
    snapshot_every: u64,

    /// Run the kernels on a single thread
    #[arg(long)]
    sequential: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    if let Some(path) = &args.write_template {
        return write_template(path);
    }

    let config_path = args
        .config
        .as_deref()
        .context("A settings file is required")?;
    log::info!("Loading settings from {}", config_path.display());
    let mut settings = load_settings(config_path)?;
    if let Some(population) = args.population {
        settings.population = population;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }
    log::debug!("Settings: {:?}", settings);

    let options = RunOptions {
        ticks: args.ticks,
        dt: args.dt,
        report_every: args.report_every,
        snapshot_every: args.snapshot_every,
        sequential: args.sequential,
    };
    let mut runner = Runner::new(&settings, options).context("Failed to initialize runner")?;

    let summary = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            let summary = runner.run(Some(&mut writer as &mut dyn Write))?;
            log::info!("Wrote {} reports to {}", summary.reports_written, path.display());
            summary
        }
        None => runner.run(None)?,
    };

    log::info!(
        "Simulated {:.2}s; final mean speed {:.2}, {} agents outside bounds",
        summary.elapsed,
        summary.mean_speed,
        summary.outside_bounds
    );
    runner.shutdown();

    Ok(())
}
