//! Quaternions and rotation of vectors

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use super::vector::Vector3;

/// A quaternion with scalar part `w` and vector part `(x, y, z)`
///
/// Rotations use the unit quaternion convention: normalize before using a
/// quaternion to rotate anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub w: f32,
    pub vector: Vector3,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(1.0, 0.0, 0.0, 0.0);
    pub const ZERO: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self {
            w,
            vector: Vector3::new(x, y, z),
        }
    }

    pub const fn from_parts(w: f32, vector: Vector3) -> Self {
        Self { w, vector }
    }

    /// Pure quaternion `(0, v)`
    pub const fn pure(v: Vector3) -> Self {
        Self::from_parts(0.0, v)
    }

    /// Rotation of `degrees` around `axis`.
    ///
    /// The axis must be non-zero; it does not need to be unit length.
    pub fn from_axis_angle(axis: Vector3, degrees: f32) -> Self {
        let half = degrees.to_radians() / 2.0;
        Self::from_parts(half.cos(), axis.unit() * half.sin()).normalize()
    }

    pub fn x(&self) -> f32 {
        self.vector.x
    }

    pub fn y(&self) -> f32 {
        self.vector.y
    }

    pub fn z(&self) -> f32 {
        self.vector.z
    }

    pub fn conjugate(self) -> Self {
        Self::from_parts(self.w, -self.vector)
    }

    pub fn dot(self, other: Quaternion) -> f32 {
        self.w * other.w + self.vector.dot(other.vector)
    }

    pub fn magnitude(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit quaternion in the same direction; the zero quaternion is returned unchanged.
    pub fn normalize(self) -> Self {
        let m = self.magnitude();
        if m == 0.0 {
            return self;
        }
        self * (1.0 / m)
    }

    /// Multiplicative inverse, `conjugate / |q|²`
    pub fn inverse(self) -> Self {
        self.conjugate() * (1.0 / self.dot(self))
    }

    /// Rotate `v` by this quaternion as `q · (0, v) · q*`
    pub fn rotate(self, v: Vector3) -> Vector3 {
        (self * Quaternion::pure(v) * self.conjugate()).vector
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotate `v` by `degrees` around `axis`
pub fn rotate_axis_angle(v: Vector3, axis: Vector3, degrees: f32) -> Vector3 {
    Quaternion::from_axis_angle(axis, degrees).rotate(v)
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion::from_parts(-self.w, -self.vector)
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, other: Quaternion) -> Quaternion {
        Quaternion::from_parts(self.w + other.w, self.vector + other.vector)
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, other: Quaternion) -> Quaternion {
        self + (-other)
    }
}

impl Mul<f32> for Quaternion {
    type Output = Quaternion;

    fn mul(self, t: f32) -> Quaternion {
        Quaternion::from_parts(self.w * t, self.vector * t)
    }
}

impl Mul<Quaternion> for f32 {
    type Output = Quaternion;

    fn mul(self, q: Quaternion) -> Quaternion {
        q * self
    }
}

/// Hamilton product
impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, other: Quaternion) -> Quaternion {
        Quaternion::from_parts(
            self.w * other.w - self.vector.dot(other.vector),
            other.vector * self.w + self.vector * other.w + self.vector.cross(other.vector),
        )
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ {}, {}i, {}j, {}k ]",
            self.w,
            self.x(),
            self.y(),
            self.z()
        )
    }
}
