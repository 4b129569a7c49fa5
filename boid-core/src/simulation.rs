//! One tick of the flock: sense every agent, then integrate every agent.

use rand::{rngs::SmallRng, SeedableRng};
use rayon::prelude::*;

use crate::boundary::BoxBoundary;
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::force;
use crate::neighbor::{ExhaustiveScan, NeighborScan};
use crate::store::{AgentId, AgentStore, ReadView, SeekState};
use crate::vector::Vector3D;

/// How the per-agent kernels are scheduled. Both produce identical results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Sequential,
}

/// Read-only copy of one agent, for renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub heading: Vector3D,
}

/// Aggregate numbers over the whole flock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FlockStats {
    pub mean_speed: f32,
    pub max_speed: f32,
    pub centroid: Vector3D,
    pub outside_bounds: usize,
}

/// A running flock and everything needed to advance it.
#[derive(Debug)]
pub struct Simulation<S = ExhaustiveScan> {
    config: SimulationConfig,
    boundary: BoxBoundary,
    store: AgentStore,
    scanner: S,
    mode: ExecutionMode,
    tick: u64,
    elapsed: f64,
}

impl Simulation<ExhaustiveScan> {
    pub fn initialize(
        population: usize,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError> {
        Self::with_scanner(population, config, ExhaustiveScan)
    }
}

impl<S: NeighborScan> Simulation<S> {
    pub fn with_scanner(
        population: usize,
        config: SimulationConfig,
        scanner: S,
    ) -> Result<Self, SimulationError> {
        if population == 0 {
            return Err(SimulationError::InvalidConfig("population must be positive"));
        }
        config.validate()?;

        let mut rng = SmallRng::seed_from_u64(config.seed);
        let store = AgentStore::create(population, &config, &mut rng);
        log::debug!(
            "initialized {} agents in bounds {:?} (seed {})",
            population,
            config.bounds,
            config.seed
        );

        Ok(Self::from_parts(store, config, scanner))
    }

    /// Run a store built by hand instead of sampled from the config.
    pub fn from_store(
        store: AgentStore,
        config: SimulationConfig,
        scanner: S,
    ) -> Result<Self, SimulationError> {
        if store.is_empty() {
            return Err(SimulationError::InvalidConfig("population must be positive"));
        }
        config.validate()?;
        Ok(Self::from_parts(store, config, scanner))
    }

    fn from_parts(store: AgentStore, config: SimulationConfig, scanner: S) -> Self {
        Self {
            boundary: BoxBoundary::new(config.bounds),
            config,
            store,
            scanner,
            mode: ExecutionMode::default(),
            tick: 0,
            elapsed: 0.0,
        }
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn execution_mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Advance exactly one tick of `dt` seconds.
    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(SimulationError::InvalidTimeStep(dt));
        }

        self.sense(dt);
        // rayon joins before returning, so every force is visible here.
        self.integrate(dt);

        self.tick += 1;
        self.elapsed += f64::from(dt);
        Ok(())
    }

    fn sense(&mut self, dt: f32) {
        let (read, write) = self.store.split();
        let kernel = SenseKernel {
            scanner: &self.scanner,
            view: read,
            config: &self.config,
            boundary: &self.boundary,
            tick: self.tick,
            dt,
        };

        match self.mode {
            ExecutionMode::Parallel => write
                .forces
                .par_iter_mut()
                .zip(write.seeks.par_iter_mut())
                .enumerate()
                .for_each(|(index, (force, seek))| *force = kernel.run(index, seek)),
            ExecutionMode::Sequential => write
                .forces
                .iter_mut()
                .zip(write.seeks.iter_mut())
                .enumerate()
                .for_each(|(index, (force, seek))| *force = kernel.run(index, seek)),
        }
    }

    fn integrate(&mut self, dt: f32) {
        let view = self.store.integration_view();
        let config = &self.config;
        let boundary = &self.boundary;

        match self.mode {
            ExecutionMode::Parallel => view
                .positions
                .par_iter_mut()
                .zip(view.velocities.par_iter_mut())
                .zip(view.headings.par_iter_mut())
                .zip(view.forces.par_iter())
                .for_each(|(((position, velocity), heading), force)| {
                    integrate_agent(position, velocity, heading, *force, config, boundary, dt)
                }),
            ExecutionMode::Sequential => view
                .positions
                .iter_mut()
                .zip(view.velocities.iter_mut())
                .zip(view.headings.iter_mut())
                .zip(view.forces.iter())
                .for_each(|(((position, velocity), heading), force)| {
                    integrate_agent(position, velocity, heading, *force, config, boundary, dt)
                }),
        }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn boundary(&self) -> &BoxBoundary {
        &self.boundary
    }

    /// Ticks completed so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulated seconds completed so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    /// Mutable access between ticks, for placing agents in scripted scenarios.
    pub fn store_mut(&mut self) -> &mut AgentStore {
        &mut self.store
    }

    fn checked(&self, id: AgentId) -> Result<AgentId, SimulationError> {
        if self.store.contains(id) {
            Ok(id)
        } else {
            Err(SimulationError::AgentOutOfRange {
                id,
                len: self.store.len(),
            })
        }
    }

    pub fn position(&self, id: AgentId) -> Result<Vector3D, SimulationError> {
        self.checked(id).map(|id| self.store.position(id))
    }

    pub fn velocity(&self, id: AgentId) -> Result<Vector3D, SimulationError> {
        self.checked(id).map(|id| self.store.velocity(id))
    }

    pub fn heading(&self, id: AgentId) -> Result<Vector3D, SimulationError> {
        self.checked(id).map(|id| self.store.heading(id))
    }

    /// Net steering force applied in the last tick.
    pub fn force(&self, id: AgentId) -> Result<Vector3D, SimulationError> {
        self.checked(id).map(|id| self.store.force(id))
    }

    pub fn seek_target(&self, id: AgentId) -> Result<Vector3D, SimulationError> {
        self.checked(id).map(|id| self.store.seek(id).target)
    }

    pub fn snapshot(&self, id: AgentId) -> Result<AgentView, SimulationError> {
        self.checked(id).map(|id| self.view_of(id))
    }

    pub fn agents(&self) -> impl Iterator<Item = AgentView> + '_ {
        (0..self.store.len()).map(move |id| self.view_of(id))
    }

    fn view_of(&self, id: AgentId) -> AgentView {
        AgentView {
            id,
            position: self.store.position(id),
            velocity: self.store.velocity(id),
            heading: self.store.heading(id),
        }
    }

    pub fn stats(&self) -> FlockStats {
        let n = self.store.len();
        if n == 0 {
            return FlockStats::default();
        }

        let mut stats = FlockStats::default();
        let mut speed_sum = 0.0;
        for velocity in self.store.velocities() {
            let speed = velocity.magnitude();
            speed_sum += speed;
            stats.max_speed = stats.max_speed.max(speed);
        }
        let positions = self.store.positions();
        stats.outside_bounds = positions
            .iter()
            .filter(|p| !self.boundary.contains(**p))
            .count();
        stats.mean_speed = speed_sum / n as f32;
        stats.centroid = positions.iter().copied().sum::<Vector3D>() / n as f32;
        stats
    }

    /// Tear down the simulation, releasing all agent storage.
    pub fn shutdown(self) {
        log::debug!(
            "shutting down {} agents after {} ticks",
            self.store.len(),
            self.tick
        );
    }
}

/// Everything the sensing phase reads, shared by every worker.
struct SenseKernel<'a, S> {
    scanner: &'a S,
    view: ReadView<'a>,
    config: &'a SimulationConfig,
    boundary: &'a BoxBoundary,
    tick: u64,
    dt: f32,
}

impl<S: NeighborScan> SenseKernel<'_, S> {
    fn run(&self, index: AgentId, seek: &mut SeekState) -> Vector3D {
        let position = self.view.positions[index];
        let velocity = self.view.velocities[index];
        let neighbors = self.scanner.scan(
            &self.view,
            index,
            self.config.detection_radius,
            self.config.separation_range,
        );

        let seek_steer = force::update_seek(seek, position, velocity, self.config, self.dt, || {
            let seed = retarget_seed(self.config.seed, index, self.tick);
            self.boundary.sample(&mut SmallRng::seed_from_u64(seed))
        });

        force::steering_forces(&neighbors, seek_steer, position, velocity, self.config)
            .net(self.config.max_force)
    }
}

/// Seed for an agent's re-target draw, independent of scheduling order.
fn retarget_seed(seed: u64, index: AgentId, tick: u64) -> u64 {
    seed.wrapping_add((index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(tick.wrapping_mul(0xD1B5_4A32_D192_ED03))
}

/// Apply one tick of force and boundary repulsion to a single agent.
pub fn integrate_agent(
    position: &mut Vector3D,
    velocity: &mut Vector3D,
    heading: &mut Vector3D,
    force: Vector3D,
    config: &SimulationConfig,
    boundary: &BoxBoundary,
    dt: f32,
) {
    let mut vel = (*velocity + force * dt).limit(config.max_speed);

    let repulsion = boundary.repulsion(*position, config.max_force);
    vel += repulsion * (dt * config.boundary_multiplier);
    vel = vel.limit(config.max_speed);

    *position += vel * dt;
    *velocity = vel;
    if let Some(dir) = vel.try_normalize() {
        *heading = dir;
    }
}
