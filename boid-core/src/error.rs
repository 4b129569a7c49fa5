use thiserror::Error;

use crate::store::AgentId;

/// Errors surfaced at the simulation's API boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// A host asked for an agent that does not exist.
    #[error("agent {id} out of range for population of {len}")]
    AgentOutOfRange { id: AgentId, len: usize },
    /// The elapsed time passed to `step` was negative or not finite.
    #[error("invalid time step {0}")]
    InvalidTimeStep(f32),
}
