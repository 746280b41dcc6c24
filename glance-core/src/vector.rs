/// Three-component vector algebra used by the camera and rotation code
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use nalgebra::{Point3, Vector3 as NaVector3};

/// A 3D float vector. Used both for directions and for points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, rhs: &Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Right-handed cross product `self × rhs`.
    pub fn cross(&self, rhs: &Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Euclidean length.
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length in place and hand back the same vector.
    ///
    /// The zero vector stays zero; callers are expected never to pass one.
    pub fn normalize(&mut self) -> &mut Self {
        let norm = self.norm();
        if norm > 0.0 {
            self.x /= norm;
            self.y /= norm;
            self.z /= norm;
        }
        self
    }

    /// Unit-length copy of this vector.
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    /// Componentwise product, e.g. a light's intensity scaled by a reflectance.
    pub fn intensify(&self, intensity: &Self) -> Self {
        Self {
            x: self.x * intensity.x,
            y: self.y * intensity.y,
            z: self.z * intensity.z,
        }
    }

    /// A vector that is never parallel to `self`.
    ///
    /// The component with the smallest magnitude (first one wins on ties) is
    /// replaced by `1 + max(|x|, |y|, |z|)`. The remaining two components are
    /// untouched and at least one of them is non-zero, so the result could
    /// only be parallel if it were equal to `self`, which the replaced
    /// component rules out.
    pub fn generate_differently_directed_vector(&self) -> Self {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        let replacement = 1.0 + ax.max(ay).max(az);
        let mut result = *self;

        if ax <= ay && ax <= az {
            result.x = replacement;
        } else if ay <= az {
            result.y = replacement;
        } else {
            result.z = replacement;
        }

        result
    }

    pub fn to_point(self) -> Point3<f32> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector3> for NaVector3<f32> {
    fn from(v: Vector3) -> Self {
        NaVector3::new(v.x, v.y, v.z)
    }
}

impl From<NaVector3<f32>> for Vector3 {
    fn from(v: NaVector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Point3<f32>> for Vector3 {
    fn from(p: Point3<f32>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
