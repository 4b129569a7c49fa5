use crate::error::SimulationError;
use crate::vector::Vector3D;

/// Which agents contribute inverse-square separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationRange {
    /// Every other agent repels, regardless of distance.
    All,
    /// Only agents inside the detection radius repel.
    WithinRadius,
}

/// Immutable per-run configuration for the flock.
///
/// Every field is required; there is no `Default`. Call [`validate`](Self::validate)
/// or let [`Simulation::initialize`](crate::Simulation::initialize) do it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    /// Neighborhood sensing distance.
    pub detection_radius: f32,
    pub max_speed: f32,
    /// Cap on the combined steering force.
    pub max_force: f32,
    /// Per-axis half-extents of the region centered on the origin.
    pub bounds: Vector3D,
    /// Extra scale applied to boundary repulsion during integration.
    pub boundary_multiplier: f32,
    /// Seconds between seek re-targets.
    pub seek_interval: f32,
    /// Distance at which a seek target counts as reached.
    pub seek_epsilon: f32,
    /// Speed of each agent at spawn, along its random heading.
    pub initial_speed: f32,
    pub separation_range: SeparationRange,
    pub seed: u64,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if !(self.detection_radius.is_finite() && self.detection_radius > 0.0) {
            return Err(SimulationError::InvalidConfig(
                "detection_radius must be positive",
            ));
        }
        if !(self.max_speed.is_finite() && self.max_speed > 0.0) {
            return Err(SimulationError::InvalidConfig("max_speed must be positive"));
        }
        if !(self.max_force.is_finite() && self.max_force > 0.0) {
            return Err(SimulationError::InvalidConfig("max_force must be positive"));
        }
        let bounds = self.bounds.to_array();
        if bounds.iter().any(|b| !(b.is_finite() && *b > 0.0)) {
            return Err(SimulationError::InvalidConfig(
                "bounds must be positive on every axis",
            ));
        }
        if !(self.boundary_multiplier.is_finite() && self.boundary_multiplier >= 0.0) {
            return Err(SimulationError::InvalidConfig(
                "boundary_multiplier must be non-negative",
            ));
        }
        if !(self.seek_interval.is_finite() && self.seek_interval > 0.0) {
            return Err(SimulationError::InvalidConfig(
                "seek_interval must be positive",
            ));
        }
        if !(self.seek_epsilon.is_finite() && self.seek_epsilon >= 0.0) {
            return Err(SimulationError::InvalidConfig(
                "seek_epsilon must be non-negative",
            ));
        }
        if !(self.initial_speed.is_finite()
            && self.initial_speed >= 0.0
            && self.initial_speed <= self.max_speed)
        {
            return Err(SimulationError::InvalidConfig(
                "initial_speed must be within 0..=max_speed",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> SimulationConfig {
    SimulationConfig {
        detection_radius: 10.0,
        max_speed: 5.0,
        max_force: 5.0,
        bounds: Vector3D::splat(50.0),
        boundary_multiplier: 2.0,
        seek_interval: 1.0,
        seek_epsilon: 0.1,
        initial_speed: 1.0,
        separation_range: SeparationRange::All,
        seed: 123,
    }
}
