//! Flocking simulation over structure-of-arrays agent state.
//!
//! Each tick runs in two phases. Sensing computes one clamped steering force
//! per agent from a read-only snapshot of every agent, in parallel. Integrating
//! then applies forces and boundary repulsion to velocities and positions.
//!
//! ```
//! use boid_core::{SeparationRange, Simulation, SimulationConfig, Vector3D};
//!
//! let config = SimulationConfig {
//!     detection_radius: 5.0,
//!     max_speed: 4.0,
//!     max_force: 2.0,
//!     bounds: Vector3D::splat(20.0),
//!     boundary_multiplier: 3.0,
//!     seek_interval: 2.0,
//!     seek_epsilon: 0.1,
//!     initial_speed: 1.0,
//!     separation_range: SeparationRange::All,
//!     seed: 42,
//! };
//! let mut sim = Simulation::initialize(32, config).unwrap();
//! sim.step(1.0 / 60.0).unwrap();
//! assert!(sim.velocity(0).unwrap().magnitude() <= 4.0 + 1e-4);
//! sim.shutdown();
//! ```

pub mod boundary;
pub mod config;
pub mod error;
pub mod force;
pub mod neighbor;
pub mod simulation;
pub mod store;
pub mod vector;

pub use boundary::BoxBoundary;
pub use config::{SeparationRange, SimulationConfig};
pub use error::SimulationError;
pub use force::SteeringForces;
pub use neighbor::{ExhaustiveScan, NeighborAggregate, NeighborScan};
pub use simulation::{AgentView, ExecutionMode, FlockStats, Simulation};
pub use store::{AgentId, AgentStore, SeekState};
pub use vector::Vector3D;
