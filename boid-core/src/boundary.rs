use rand::Rng;

use crate::vector::Vector3D;

/// Axis-aligned box centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBoundary {
    pub half_extents: Vector3D,
}

impl BoxBoundary {
    pub fn new(half_extents: Vector3D) -> Self {
        Self { half_extents }
    }

    /// True when the point lies strictly inside the box on every axis.
    pub fn contains(&self, point: Vector3D) -> bool {
        point.x.abs() < self.half_extents.x
            && point.y.abs() < self.half_extents.y
            && point.z.abs() < self.half_extents.z
    }

    /// Uniform point in the box.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vector3D {
        let b = self.half_extents;
        Vector3D::new(
            rng.gen_range(-b.x..b.x),
            rng.gen_range(-b.y..b.y),
            rng.gen_range(-b.z..b.z),
        )
    }

    /// Unit push back toward the interior, or zero while inside.
    ///
    /// Each axis contributes +1 below `-bound` and -1 at or beyond `+bound`;
    /// the combined vector is then normalized, so a corner pushes diagonally.
    pub fn repulsion_direction(&self, position: Vector3D) -> Vector3D {
        let push = Vector3D::new(
            axis_push(position.x, self.half_extents.x),
            axis_push(position.y, self.half_extents.y),
            axis_push(position.z, self.half_extents.z),
        );
        push.normalize()
    }

    /// Repulsion scaled by the steering cap. Not subject to that cap itself.
    pub fn repulsion(&self, position: Vector3D, max_force: f32) -> Vector3D {
        self.repulsion_direction(position) * max_force
    }
}

fn axis_push(value: f32, bound: f32) -> f32 {
    if value <= -bound {
        1.0
    } else if value >= bound {
        -1.0
    } else {
        0.0
    }
}
