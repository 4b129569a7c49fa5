/// A 3D vector used for positions, velocities and steering forces
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3D {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3D {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::ZERO
    }

    pub fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero-length or
    /// non-finite vector.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag.is_infinite() && self.is_finite() {
            // Squaring overflowed; shrink first so the direction survives.
            let largest = self.x.abs().max(self.y.abs()).max(self.z.abs());
            return (*self / largest).normalize();
        }
        if mag > 0.0 && mag.is_finite() {
            Self {
                x: self.x / mag,
                y: self.y / mag,
                z: self.z / mag,
            }
        } else {
            Self::zero()
        }
    }

    /// Like `normalize`, but returns `None` instead of a zero vector.
    pub fn try_normalize(&self) -> Option<Self> {
        let unit = self.normalize();
        (unit != Self::zero()).then_some(unit)
    }

    /// Clamp the magnitude to `max`, keeping the direction. Non-finite input
    /// clamps to zero.
    pub fn limit(&self, max: f32) -> Self {
        if !self.is_finite() {
            return Self::zero();
        }
        if self.magnitude_squared() > max * max {
            self.normalize() * max
        } else {
            *self
        }
    }

    pub fn distance(&self, other: &Vector3D) -> f32 {
        (*self - *other).magnitude()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vector3D {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl core::ops::Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl core::ops::Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl core::ops::Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl core::ops::Mul<f32> for Vector3D {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self {
            x: self.x * scalar,
            y: self.y * scalar,
            z: self.z * scalar,
        }
    }
}

impl core::ops::Div<f32> for Vector3D {
    type Output = Self;

    fn div(self, scalar: f32) -> Self {
        Self {
            x: self.x / scalar,
            y: self.y / scalar,
            z: self.z / scalar,
        }
    }
}

impl core::ops::AddAssign for Vector3D {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
    }
}

impl core::iter::Sum for Vector3D {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, v| acc + v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector3d_magnitude() {
        let v = Vector3D::new(2.0, 3.0, 6.0);
        assert_eq!(v.magnitude(), 7.0);
    }

    #[test]
    fn test_vector3d_normalize() {
        let v = Vector3D::new(3.0, 4.0, 12.0);
        let normalized = v.normalize();
        assert!((normalized.magnitude() - 1.0).abs() < 0.0001);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3D::zero().normalize(), Vector3D::zero());
        assert!(Vector3D::zero().try_normalize().is_none());
    }

    #[test]
    fn test_limit() {
        let v = Vector3D::new(10.0, 0.0, 0.0);
        assert_eq!(v.limit(2.0), Vector3D::new(2.0, 0.0, 0.0));

        let short = Vector3D::new(0.5, 0.5, 0.0);
        assert_eq!(short.limit(2.0), short);
    }

    #[test]
    fn test_limit_keeps_direction_when_squares_overflow() {
        let v = Vector3D::new(-1e20, 1e19, 0.0);
        let limited = v.limit(5.0);

        assert!((limited.magnitude() - 5.0).abs() < 1e-4);
        assert!(limited.x < 0.0 && limited.y > 0.0);
        assert_eq!(v.try_normalize().map(|u| u.x < 0.0), Some(true));
    }

    #[test]
    fn test_limit_rejects_non_finite() {
        let v = Vector3D::new(f32::NEG_INFINITY, f32::NAN, 0.0);
        assert_eq!(v.limit(5.0), Vector3D::zero());
        assert_eq!(v.normalize(), Vector3D::zero());
        assert!(v.try_normalize().is_none());
    }

    #[test]
    fn test_sum() {
        let total: Vector3D = [Vector3D::splat(1.0), Vector3D::new(1.0, 2.0, 3.0)]
            .into_iter()
            .sum();
        assert_eq!(total, Vector3D::new(2.0, 3.0, 4.0));
    }

    #[test]
    fn test_vector3d_operations() {
        let v1 = Vector3D::new(1.0, 2.0, 3.0);
        let v2 = Vector3D::new(4.0, 6.0, 8.0);

        assert_eq!(v1 + v2, Vector3D::new(5.0, 8.0, 11.0));
        assert_eq!(v2 - v1, Vector3D::new(3.0, 4.0, 5.0));
        assert_eq!(v1 * 2.0, Vector3D::new(2.0, 4.0, 6.0));
        assert_eq!(v2 / 2.0, Vector3D::new(2.0, 3.0, 4.0));
        assert_eq!(-v1, Vector3D::new(-1.0, -2.0, -3.0));
        assert_eq!(v1.distance(&Vector3D::new(1.0, 2.0, 3.0)), 0.0);
    }
}
