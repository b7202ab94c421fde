use ndarray::*;
use serde::{Deserialize, Serialize};

/// Point represents a position in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal image coordinate
    x: f64,
    /// Vertical image coordinate
    y: f64,
}

impl Point {
    /// Returns a new Point
    ///
    /// # Parameters
    ///
    /// * `x`: Horizontal image coordinate.
    /// * `y`: Vertical image coordinate.
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    /// Returns the x of the point
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Returns the y of the point
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Returns true if both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns the euclidean distance to `other`
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Returns the angle in radians of the direction from this point towards `other`.
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Returns the point `radius` away from this one in the direction `angle` (radians).
    pub fn offset(&self, radius: f64, angle: f64) -> Point {
        Point {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }

    /// Returns the point in `(x, y)` format.
    pub fn to_xy(&self) -> Array1<f64> {
        arr1::<f64>(&[self.x, self.y])
    }
}
