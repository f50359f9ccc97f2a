//! Fundamental planar value types for truss modelling.

use nalgebra::Vector2;
use serde::Serialize;

/// Position in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    /// Coordinate along the global X axis.
    pub x: f64,
    /// Coordinate along the global Y axis.
    pub y: f64,
}

impl Point {
    /// Create a [`Point`] with explicit coordinates.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the point into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }

    /// Shift the point by `displacement` scaled by `magnification`.
    #[must_use]
    pub fn displaced(self, displacement: Displacement, magnification: f64) -> Self {
        Self::new(
            self.x + displacement.x * magnification,
            self.y + displacement.y * magnification,
        )
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        value.to_vector()
    }
}

/// External load applied at a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Force {
    /// Force component along the global X axis.
    pub fx: f64,
    /// Force component along the global Y axis.
    pub fy: f64,
}

impl Force {
    /// Create a [`Force`] with explicit components.
    #[must_use]
    pub const fn new(fx: f64, fy: f64) -> Self {
        Self { fx, fy }
    }

    /// Convert the force into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.fx, self.fy)
    }
}

impl From<Vector2<f64>> for Force {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Translation of a node produced by the solver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Displacement {
    /// Displacement component along the global X axis.
    pub x: f64,
    /// Displacement component along the global Y axis.
    pub y: f64,
}

impl Displacement {
    /// Create a [`Displacement`] with explicit components.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert the displacement into an algebraic vector.
    #[must_use]
    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f64>> for Displacement {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

/// Support reaction recovered at a restrained node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Reaction {
    /// Reaction component along the global X axis.
    pub fx: f64,
    /// Reaction component along the global Y axis.
    pub fy: f64,
}

impl Reaction {
    /// Create a [`Reaction`] with explicit components.
    #[must_use]
    pub const fn new(fx: f64, fy: f64) -> Self {
        Self { fx, fy }
    }
}

/// Convenience helper for creating [`Point`] instances.
///
/// # Examples
/// ```
/// use truss2d::point;
///
/// let origin = point(0.0, 0.0);
/// assert_eq!(origin.x, 0.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Convenience helper for creating [`Force`] instances.
///
/// # Examples
/// ```
/// use truss2d::force;
///
/// let load = force(100.0e3, 0.0);
/// assert_eq!(load.fx, 100.0e3);
/// ```
#[must_use]
pub const fn force(fx: f64, fy: f64) -> Force {
    Force::new(fx, fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_to_vector_roundtrip() {
        let origin = Point::new(1.0, 2.0);
        let vector: Vector2<f64> = origin.into();
        assert_eq!(vector, Vector2::new(1.0, 2.0));
        assert_eq!(Point::from(vector), origin);
    }

    #[test]
    fn distance_uses_euclidean_norm() {
        assert_eq!(point(0.0, 0.0).distance_to(point(3.0, 4.0)), 5.0);
    }

    #[test]
    fn displaced_point_scales_displacement() {
        let shifted = point(1.0, 1.0).displaced(Displacement::new(0.5, -0.25), 2.0);
        assert_eq!(shifted, point(2.0, 0.5));
    }

    #[test]
    fn force_defaults_to_zero() {
        assert_eq!(Force::default(), Force::new(0.0, 0.0));
    }
}
