//! Structure-of-arrays agent state.
//!
//! Each agent owns one slot in every column, addressed by its [`AgentId`].
//! Columns are split into a read half (positions, velocities) and a write
//! half (forces, seek state) so the sensing phase can share the former across
//! threads while each worker writes only its own slots of the latter.

use rand::Rng;

use crate::boundary::BoxBoundary;
use crate::config::SimulationConfig;
use crate::vector::Vector3D;

/// Stable index of an agent's slot, `0..len`.
pub type AgentId = usize;

/// Per-agent seek bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekState {
    /// Point the agent is steering toward.
    pub target: Vector3D,
    /// Steering held between re-targets.
    pub steer: Vector3D,
    /// Seconds left until the next forced re-target.
    pub timer: f32,
}

impl SeekState {
    pub fn new(target: Vector3D, interval: f32) -> Self {
        Self {
            target,
            steer: Vector3D::zero(),
            timer: interval,
        }
    }
}

/// Shared, read-only columns for the sensing phase.
#[derive(Debug, Clone, Copy)]
pub struct ReadView<'a> {
    pub positions: &'a [Vector3D],
    pub velocities: &'a [Vector3D],
}

impl ReadView<'_> {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Columns written by the sensing phase, one slot per agent.
#[derive(Debug)]
pub struct WriteView<'a> {
    pub forces: &'a mut [Vector3D],
    pub seeks: &'a mut [SeekState],
}

/// Columns touched by the integration phase.
#[derive(Debug)]
pub struct IntegrationView<'a> {
    pub positions: &'a mut [Vector3D],
    pub velocities: &'a mut [Vector3D],
    pub headings: &'a mut [Vector3D],
    pub forces: &'a [Vector3D],
}

#[derive(Debug, Clone)]
pub struct AgentStore {
    positions: Vec<Vector3D>,
    velocities: Vec<Vector3D>,
    headings: Vec<Vector3D>,
    forces: Vec<Vector3D>,
    seeks: Vec<SeekState>,
}

impl AgentStore {
    /// Allocate `n` agents, each placed uniformly inside the region with a
    /// random heading and a freshly sampled seek target.
    pub fn create<R: Rng + ?Sized>(n: usize, config: &SimulationConfig, rng: &mut R) -> Self {
        let boundary = BoxBoundary::new(config.bounds);
        let mut store = Self::with_len(n);

        for i in 0..n {
            let heading = random_unit_vector(rng);
            store.positions[i] = boundary.sample(rng);
            store.headings[i] = heading;
            store.velocities[i] = heading * config.initial_speed;
            store.seeks[i] = SeekState::new(boundary.sample(rng), config.seek_interval);
        }

        store
    }

    /// `n` agents at the origin, at rest, facing +z. Useful for hand-built scenarios.
    pub fn with_len(n: usize) -> Self {
        Self {
            positions: vec![Vector3D::zero(); n],
            velocities: vec![Vector3D::zero(); n],
            headings: vec![Vector3D::new(0.0, 0.0, 1.0); n],
            forces: vec![Vector3D::zero(); n],
            seeks: vec![SeekState::new(Vector3D::zero(), 0.0); n],
        }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        id < self.len()
    }

    #[track_caller]
    fn check(&self, id: AgentId) {
        assert!(
            self.contains(id),
            "agent index {} out of range for {} agents",
            id,
            self.len()
        );
    }

    // Accessors below panic on an out-of-range id.

    #[track_caller]
    pub fn position(&self, id: AgentId) -> Vector3D {
        self.check(id);
        self.positions[id]
    }

    #[track_caller]
    pub fn set_position(&mut self, id: AgentId, position: Vector3D) {
        self.check(id);
        self.positions[id] = position;
    }

    #[track_caller]
    pub fn velocity(&self, id: AgentId) -> Vector3D {
        self.check(id);
        self.velocities[id]
    }

    #[track_caller]
    pub fn set_velocity(&mut self, id: AgentId, velocity: Vector3D) {
        self.check(id);
        self.velocities[id] = velocity;
    }

    #[track_caller]
    pub fn heading(&self, id: AgentId) -> Vector3D {
        self.check(id);
        self.headings[id]
    }

    #[track_caller]
    pub fn force(&self, id: AgentId) -> Vector3D {
        self.check(id);
        self.forces[id]
    }

    #[track_caller]
    pub fn seek(&self, id: AgentId) -> SeekState {
        self.check(id);
        self.seeks[id]
    }

    #[track_caller]
    pub fn set_seek(&mut self, id: AgentId, seek: SeekState) {
        self.check(id);
        self.seeks[id] = seek;
    }

    pub fn positions(&self) -> &[Vector3D] {
        &self.positions
    }

    pub fn velocities(&self) -> &[Vector3D] {
        &self.velocities
    }

    pub fn read_view(&self) -> ReadView<'_> {
        ReadView {
            positions: &self.positions,
            velocities: &self.velocities,
        }
    }

    /// Borrow the sensing inputs and outputs at once.
    pub fn split(&mut self) -> (ReadView<'_>, WriteView<'_>) {
        (
            ReadView {
                positions: &self.positions,
                velocities: &self.velocities,
            },
            WriteView {
                forces: &mut self.forces,
                seeks: &mut self.seeks,
            },
        )
    }

    pub fn integration_view(&mut self) -> IntegrationView<'_> {
        IntegrationView {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            headings: &mut self.headings,
            forces: &self.forces,
        }
    }
}

/// Uniform direction via rejection sampling inside the unit ball.
pub fn random_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> Vector3D {
    loop {
        let candidate = Vector3D::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        let mag_sq = candidate.magnitude_squared();
        if mag_sq > 1e-6 && mag_sq <= 1.0 {
            return candidate.normalize();
        }
    }
}
