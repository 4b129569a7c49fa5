use std::io::Write;
use std::time::Instant;

use anyhow::{Context, Result};
use boid_core::{ExecutionMode, Simulation};
use boid_shared::{AgentSnapshot, SimulationSettings, TickReport};

use crate::settings::{to_config, to_point};

/// How long and how finely to run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub ticks: u64,
    pub dt: f32,
    /// Emit a report every N ticks; 0 disables reports.
    pub report_every: u64,
    /// Attach per-agent snapshots every N ticks; 0 disables snapshots.
    pub snapshot_every: u64,
    pub sequential: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub elapsed: f64,
    pub reports_written: usize,
    pub mean_speed: f32,
    pub outside_bounds: usize,
}

/// Headless host loop driving a fixed-step simulation.
pub struct Runner {
    simulation: Simulation,
    options: RunOptions,
}

impl Runner {
    pub fn new(settings: &SimulationSettings, options: RunOptions) -> Result<Self> {
        if !(options.dt.is_finite() && options.dt > 0.0) {
            anyhow::bail!("Time step must be positive, got {}", options.dt);
        }

        let mode = if options.sequential {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel
        };
        let simulation = Simulation::initialize(settings.population, to_config(settings))
            .context("Failed to initialize simulation")?
            .with_execution_mode(mode);

        log::info!(
            "Initialized {} agents ({:?} execution)",
            simulation.len(),
            simulation.execution_mode()
        );

        Ok(Self {
            simulation,
            options,
        })
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Step through every tick, writing JSON-line reports to `out` if given.
    pub fn run(&mut self, mut out: Option<&mut dyn Write>) -> Result<RunSummary> {
        log::info!(
            "Running {} ticks at dt={:.4}s",
            self.options.ticks,
            self.options.dt
        );

        let started = Instant::now();
        let mut last_log = Instant::now();
        let mut reports_written = 0;

        for _ in 0..self.options.ticks {
            self.simulation
                .step(self.options.dt)
                .context("Simulation step failed")?;
            let tick = self.simulation.tick();

            if let Some(writer) = out.as_deref_mut() {
                if is_multiple(tick, self.options.report_every) {
                    let report = self.report(is_multiple(tick, self.options.snapshot_every));
                    serde_json::to_writer(&mut *writer, &report)?;
                    writer.write_all(b"\n")?;
                    reports_written += 1;
                }
            }

            if last_log.elapsed().as_secs() >= 1 {
                let stats = self.simulation.stats();
                log::info!(
                    "tick {} | mean speed {:.2} | outside bounds {}",
                    tick,
                    stats.mean_speed,
                    stats.outside_bounds
                );
                last_log = Instant::now();
            }
        }

        if let Some(writer) = out {
            writer.flush()?;
        }

        let stats = self.simulation.stats();
        let wall = started.elapsed().as_secs_f64();
        log::info!(
            "Finished {} ticks in {:.2}s ({:.1} ticks/s)",
            self.simulation.tick(),
            wall,
            self.simulation.tick() as f64 / wall.max(f64::EPSILON)
        );

        Ok(RunSummary {
            ticks: self.simulation.tick(),
            elapsed: self.simulation.elapsed(),
            reports_written,
            mean_speed: stats.mean_speed,
            outside_bounds: stats.outside_bounds,
        })
    }

    pub fn report(&self, with_agents: bool) -> TickReport {
        let stats = self.simulation.stats();
        let agents = with_agents.then(|| {
            self.simulation
                .agents()
                .map(|agent| AgentSnapshot {
                    id: agent.id,
                    position: to_point(agent.position),
                    velocity: to_point(agent.velocity),
                    heading: to_point(agent.heading),
                })
                .collect()
        });

        TickReport {
            tick: self.simulation.tick(),
            elapsed: self.simulation.elapsed(),
            mean_speed: stats.mean_speed,
            max_speed: stats.max_speed,
            centroid: to_point(stats.centroid),
            outside_bounds: stats.outside_bounds,
            agents,
        }
    }

    pub fn shutdown(self) {
        self.simulation.shutdown();
    }
}

fn is_multiple(tick: u64, every: u64) -> bool {
    every > 0 && tick % every == 0
}
