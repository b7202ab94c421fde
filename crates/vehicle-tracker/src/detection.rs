use crate::Point;
use uuid::Uuid;

/// Detection represents the centroid of a candidate object in a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Unique detection identifier
    id: Uuid,
    /// Centroid in image coordinates.
    position: Point,
}

impl Detection {
    /// Returns a new Detection
    ///
    /// # Parameters
    ///
    /// * `id`: An optional identifier. A random one is generated when `None`.
    /// * `position`: The detected centroid.
    pub fn new(id: Option<Uuid>, position: Point) -> Detection {
        Detection {
            id: id.unwrap_or_else(Uuid::new_v4),
            position,
        }
    }

    /// Returns a new Detection at `(x, y)` with a generated identifier
    pub fn from_xy(x: f64, y: f64) -> Detection {
        Detection::new(None, Point::new(x, y))
    }

    /// Returns the unique id of the detection
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Returns the centroid of the detection
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Returns true if the detection can be associated, i.e. its coordinates are finite.
    pub fn is_valid(&self) -> bool {
        self.position.is_finite()
    }
}
