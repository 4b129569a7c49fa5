//! Steering behaviors and how they combine.

use crate::config::SimulationConfig;
use crate::neighbor::NeighborAggregate;
use crate::store::SeekState;
use crate::vector::Vector3D;

/// The four flocking contributions for one agent and tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SteeringForces {
    pub seek: Vector3D,
    pub separation: Vector3D,
    pub alignment: Vector3D,
    pub cohesion: Vector3D,
}

impl SteeringForces {
    /// Sum of all four, clamped to `max_force`.
    pub fn net(&self, max_force: f32) -> Vector3D {
        (self.seek + self.separation + self.alignment + self.cohesion).limit(max_force)
    }
}

/// Reynolds steering: desired velocity at full speed minus current velocity.
pub fn steer_towards(
    direction: Vector3D,
    velocity: Vector3D,
    config: &SimulationConfig,
) -> Vector3D {
    let desired = direction.normalize() * config.max_speed;
    (desired - velocity).limit(config.max_force)
}

pub fn seek(
    target: Vector3D,
    position: Vector3D,
    velocity: Vector3D,
    config: &SimulationConfig,
) -> Vector3D {
    steer_towards(target - position, velocity, config)
}

pub fn alignment(
    neighbors: &NeighborAggregate,
    velocity: Vector3D,
    config: &SimulationConfig,
) -> Vector3D {
    match neighbors.average_velocity() {
        Some(avg_velocity) => steer_towards(avg_velocity, velocity, config),
        None => Vector3D::zero(),
    }
}

pub fn cohesion(
    neighbors: &NeighborAggregate,
    position: Vector3D,
    velocity: Vector3D,
    config: &SimulationConfig,
) -> Vector3D {
    match neighbors.average_position() {
        Some(avg_position) => steer_towards(avg_position - position, velocity, config),
        None => Vector3D::zero(),
    }
}

/// Inverse-square repulsion, used as scanned.
pub fn separation(neighbors: &NeighborAggregate) -> Vector3D {
    neighbors.separation
}

/// Advance the agent's seek state by `dt` and return the seek steering.
///
/// A new target is drawn from `sample_target` when the timer has run out or
/// the agent is within `seek_epsilon` of its target; steering is recomputed
/// only then and held constant in between.
pub fn update_seek<F>(
    state: &mut SeekState,
    position: Vector3D,
    velocity: Vector3D,
    config: &SimulationConfig,
    dt: f32,
    sample_target: F,
) -> Vector3D
where
    F: FnOnce() -> Vector3D,
{
    let reached = position.distance(&state.target) < config.seek_epsilon;

    if state.timer <= 0.0 || reached {
        state.target = sample_target();
        state.steer = seek(state.target, position, velocity, config);
        state.timer = config.seek_interval;
        log::trace!("seek re-target to {:?}", state.target);
    } else {
        state.timer -= dt;
    }

    state.steer
}

/// Evaluate all behaviors from the scanned neighborhood and current seek steer.
pub fn steering_forces(
    neighbors: &NeighborAggregate,
    seek_steer: Vector3D,
    position: Vector3D,
    velocity: Vector3D,
    config: &SimulationConfig,
) -> SteeringForces {
    SteeringForces {
        seek: seek_steer,
        separation: separation(neighbors),
        alignment: alignment(neighbors, velocity, config),
        cohesion: cohesion(neighbors, position, velocity, config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    fn one_neighbor(position: Vector3D, velocity: Vector3D) -> NeighborAggregate {
        NeighborAggregate {
            count: 1,
            sum_position: position,
            sum_velocity: velocity,
            separation: Vector3D::zero(),
        }
    }

    #[test]
    fn test_empty_neighborhood_gives_zero() {
        let config = test_config();
        let empty = NeighborAggregate::default();
        let velocity = Vector3D::new(1.0, 2.0, 3.0);

        assert_eq!(alignment(&empty, velocity, &config), Vector3D::zero());
        assert_eq!(
            cohesion(&empty, Vector3D::zero(), velocity, &config),
            Vector3D::zero()
        );
        assert_eq!(separation(&empty), Vector3D::zero());
    }

    #[test]
    fn test_alignment_matches_neighbor_heading() {
        let config = test_config();
        let agg = one_neighbor(Vector3D::zero(), Vector3D::new(0.0, 0.0, 3.0));
        let steer = alignment(&agg, Vector3D::zero(), &config);

        // desired = (0, 0, max_speed), clamped to max_force
        assert!((steer.z - config.max_speed.min(config.max_force)).abs() < 1e-5);
        assert!(steer.magnitude() <= config.max_force + 1e-5);
    }

    #[test]
    fn test_cohesion_points_at_center() {
        let mut config = test_config();
        config.max_force = 1.0;
        let agg = one_neighbor(Vector3D::new(4.0, 0.0, 0.0), Vector3D::zero());
        let steer = cohesion(&agg, Vector3D::zero(), Vector3D::zero(), &config);

        assert!((steer - Vector3D::new(1.0, 0.0, 0.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_net_is_clamped() {
        let forces = SteeringForces {
            seek: Vector3D::new(10.0, 0.0, 0.0),
            separation: Vector3D::new(0.0, 10.0, 0.0),
            alignment: Vector3D::zero(),
            cohesion: Vector3D::zero(),
        };
        let net = forces.net(2.0);
        assert!((net.magnitude() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_seek_holds_between_retargets() {
        let config = test_config();
        let mut state = SeekState::new(Vector3D::new(30.0, 0.0, 0.0), 0.0);
        let new_target = Vector3D::new(0.0, 30.0, 0.0);

        // Timer starts expired: re-target immediately.
        let first = update_seek(
            &mut state,
            Vector3D::zero(),
            Vector3D::zero(),
            &config,
            0.1,
            || new_target,
        );
        assert_eq!(state.target, new_target);
        assert_eq!(state.timer, config.seek_interval);
        assert!(first.y > 0.0);

        // Held while the timer runs, even though velocity changed.
        let held = update_seek(
            &mut state,
            Vector3D::zero(),
            Vector3D::new(4.0, 0.0, 0.0),
            &config,
            0.1,
            || panic!("should not re-target"),
        );
        assert_eq!(held, first);
        assert!((state.timer - (config.seek_interval - 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_seek_retargets_when_reached() {
        let config = test_config();
        let mut state = SeekState::new(Vector3D::new(1.0, 1.0, 1.0), 100.0);
        let next = Vector3D::new(-5.0, 0.0, 0.0);

        update_seek(
            &mut state,
            Vector3D::new(1.0, 1.0, 1.0),
            Vector3D::zero(),
            &config,
            0.1,
            || next,
        );
        assert_eq!(state.target, next);
    }
}
