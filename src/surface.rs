//! The narrow geometric contract the rule tree consumes.
//!
//! The algebra core never constructs surfaces; it only asks an attached
//! surface which side of it a point lies on. [`Plane`] is the reference
//! implementation used by tests and demos.

use std::fmt;

/// A point in model space.
pub type Point = [f64; 3];

/// Anything that can report which side of itself a point lies on.
///
/// The contract matches the signed-literal convention: a positive literal
/// selects the `+1` side, a negative literal the `-1` side, and `0` means
/// the point sits on the surface itself (within the implementation's own
/// tolerance).
pub trait Surface: fmt::Debug {
    /// Returns `+1`, `0`, or `-1` for the side of the surface `pt` is on.
    fn side(&self, pt: &Point) -> i32;
}

/// An infinite plane `normal . x = offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: [f64; 3],
    pub offset: f64,
}

impl Plane {
    /// Absolute tolerance for on-surface classification.
    const TOL: f64 = 1e-8;

    pub fn new(normal: [f64; 3], offset: f64) -> Self {
        Self { normal, offset }
    }

    /// Plane perpendicular to the x-axis at `x = offset`.
    pub fn x(offset: f64) -> Self {
        Self::new([1.0, 0.0, 0.0], offset)
    }

    /// Plane perpendicular to the y-axis at `y = offset`.
    pub fn y(offset: f64) -> Self {
        Self::new([0.0, 1.0, 0.0], offset)
    }

    /// Plane perpendicular to the z-axis at `z = offset`.
    pub fn z(offset: f64) -> Self {
        Self::new([0.0, 0.0, 1.0], offset)
    }
}

impl Surface for Plane {
    fn side(&self, pt: &Point) -> i32 {
        let d = self.normal[0] * pt[0] + self.normal[1] * pt[1] + self.normal[2] * pt[2]
            - self.offset;
        if d > Self::TOL {
            1
        } else if d < -Self::TOL {
            -1
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_side() {
        let p = Plane::x(1.0);
        assert_eq!(p.side(&[2.0, 0.0, 0.0]), 1);
        assert_eq!(p.side(&[0.0, 0.0, 0.0]), -1);
        assert_eq!(p.side(&[1.0, 5.0, -3.0]), 0);
    }

    #[test]
    fn test_axis_planes() {
        let pt = [0.5, -0.5, 2.0];
        assert_eq!(Plane::x(0.0).side(&pt), 1);
        assert_eq!(Plane::y(0.0).side(&pt), -1);
        assert_eq!(Plane::z(2.0).side(&pt), 0);
    }
}
