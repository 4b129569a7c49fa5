use crate::config::SeparationRange;
use crate::store::{AgentId, ReadView};
use crate::vector::Vector3D;

/// Ceiling on one pair's inverse-square repulsion, so that agents a hair apart
/// still push with a finite force.
pub const MAX_PAIR_REPULSION: f32 = 1e30;

/// What one agent senses of the others in a single pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NeighborAggregate {
    /// Agents inside the detection radius, excluding the agent itself.
    pub count: usize,
    pub sum_position: Vector3D,
    pub sum_velocity: Vector3D,
    /// Accumulated inverse-square repulsion, pointing away from neighbors.
    pub separation: Vector3D,
}

impl NeighborAggregate {
    pub fn average_position(&self) -> Option<Vector3D> {
        (self.count > 0).then(|| self.sum_position / self.count as f32)
    }

    pub fn average_velocity(&self) -> Option<Vector3D> {
        (self.count > 0).then(|| self.sum_velocity / self.count as f32)
    }
}

/// Neighbor detection strategy.
///
/// Implementations must be pure with respect to the view so they can run on
/// many agents at once.
pub trait NeighborScan: Sync {
    fn scan(
        &self,
        view: &ReadView<'_>,
        index: AgentId,
        radius: f32,
        range: SeparationRange,
    ) -> NeighborAggregate;
}

/// Compares the agent against every other agent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExhaustiveScan;

impl NeighborScan for ExhaustiveScan {
    fn scan(
        &self,
        view: &ReadView<'_>,
        index: AgentId,
        radius: f32,
        range: SeparationRange,
    ) -> NeighborAggregate {
        let current = view.positions[index];
        let mut aggregate = NeighborAggregate::default();

        for (j, (&other, &velocity)) in view.positions.iter().zip(view.velocities).enumerate() {
            if j == index {
                continue;
            }

            let offset = current - other;
            let dist = offset.magnitude();
            let in_radius = dist <= radius;

            if in_radius {
                aggregate.sum_position += other;
                aggregate.sum_velocity += velocity;
                aggregate.count += 1;
            }

            let repels = match range {
                SeparationRange::All => true,
                SeparationRange::WithinRadius => in_radius,
            };
            // Coincident agents have no direction to push along.
            if repels && dist > 0.0 {
                let repulsion = (1.0 / (dist * dist)).min(MAX_PAIR_REPULSION);
                let term = offset.normalize() * repulsion;
                if term.is_finite() {
                    aggregate.separation += term;
                }
            }
        }

        aggregate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_of<'a>(positions: &'a [Vector3D], velocities: &'a [Vector3D]) -> ReadView<'a> {
        ReadView {
            positions,
            velocities,
        }
    }

    #[test]
    fn test_excludes_self() {
        let positions = [Vector3D::zero()];
        let velocities = [Vector3D::new(1.0, 0.0, 0.0)];
        let agg = ExhaustiveScan.scan(
            &view_of(&positions, &velocities),
            0,
            100.0,
            SeparationRange::All,
        );

        assert_eq!(agg, NeighborAggregate::default());
    }

    #[test]
    fn test_separation_is_inverse_square() {
        let positions = [Vector3D::zero(), Vector3D::new(2.0, 0.0, 0.0)];
        let velocities = [Vector3D::zero(); 2];
        let agg = ExhaustiveScan.scan(
            &view_of(&positions, &velocities),
            0,
            10.0,
            SeparationRange::All,
        );

        assert_eq!(agg.count, 1);
        assert!((agg.separation.x + 0.25).abs() < 1e-6);
        assert_eq!(agg.separation.y, 0.0);
    }

    #[test]
    fn test_separation_range() {
        let positions = [Vector3D::zero(), Vector3D::new(20.0, 0.0, 0.0)];
        let velocities = [Vector3D::zero(); 2];
        let view = view_of(&positions, &velocities);

        let all = ExhaustiveScan.scan(&view, 0, 10.0, SeparationRange::All);
        assert_eq!(all.count, 0);
        assert!(all.separation.x < 0.0);

        let near = ExhaustiveScan.scan(&view, 0, 10.0, SeparationRange::WithinRadius);
        assert_eq!(near.separation, Vector3D::zero());
    }

    #[test]
    fn test_coincident_agents_do_not_fault() {
        let positions = [Vector3D::splat(1.0); 3];
        let velocities = [Vector3D::new(0.0, 1.0, 0.0); 3];
        let agg = ExhaustiveScan.scan(
            &view_of(&positions, &velocities),
            1,
            5.0,
            SeparationRange::All,
        );

        assert_eq!(agg.count, 2);
        assert_eq!(agg.separation, Vector3D::zero());
        assert_eq!(agg.average_position(), Some(Vector3D::splat(1.0)));
        assert!(agg.separation.is_finite());
    }

    #[test]
    fn test_near_coincident_repulsion_is_capped() {
        let positions = [Vector3D::zero(), Vector3D::new(1e-20, 0.0, 0.0)];
        let velocities = [Vector3D::zero(); 2];
        let agg = ExhaustiveScan.scan(
            &view_of(&positions, &velocities),
            0,
            5.0,
            SeparationRange::All,
        );

        assert!(agg.separation.is_finite());
        assert!((agg.separation.x + MAX_PAIR_REPULSION).abs() < MAX_PAIR_REPULSION * 1e-3);
        assert_eq!(agg.separation.y, 0.0);
        assert_eq!(agg.separation.z, 0.0);
    }

    #[test]
    fn test_averages() {
        let positions = [
            Vector3D::zero(),
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(0.0, 3.0, 0.0),
        ];
        let velocities = [
            Vector3D::zero(),
            Vector3D::new(2.0, 0.0, 0.0),
            Vector3D::new(0.0, 4.0, 0.0),
        ];
        let agg = ExhaustiveScan.scan(
            &view_of(&positions, &velocities),
            0,
            5.0,
            SeparationRange::All,
        );

        assert_eq!(agg.average_position(), Some(Vector3D::new(0.5, 1.5, 0.0)));
        assert_eq!(agg.average_velocity(), Some(Vector3D::new(1.0, 2.0, 0.0)));
    }
}
