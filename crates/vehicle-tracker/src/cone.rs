use std::f64::consts::{PI, TAU};

use crate::*;
use ndarray::*;

/// Projects the region a track can plausibly reach, for display only.
///
/// The boundary is teardrop shaped: `base_distance + speed` ahead of the track along its
/// heading, shrinking linearly with the angle away from the heading down to
/// `base_distance` directly behind it.
#[derive(Debug, Clone)]
pub struct MotionCone {
    /// Radius of the cone directly behind the track.
    base_distance: f64,
    /// Sample angles relative to the heading, spanning `[-π, π)`.
    angles: Array1<f64>,
}

impl MotionCone {
    /// Returns a new MotionCone
    ///
    /// # Parameters
    ///
    /// * `base_distance`: Radius of the cone opposite the heading.
    /// * `sample_count`: Number of boundary points produced per projection.
    pub fn new(base_distance: f64, sample_count: usize) -> MotionCone {
        let angles =
            Array1::from_shape_fn(sample_count, |i| -PI + TAU * i as f64 / sample_count as f64);
        MotionCone {
            base_distance,
            angles,
        }
    }

    pub fn from_config(config: &TrackerConfig) -> MotionCone {
        MotionCone::new(config.base_distance(), config.cone_sample_count())
    }

    /// Returns the sample angles relative to the heading
    pub fn angles(&self) -> &Array1<f64> {
        &self.angles
    }

    /// Radius of the cone at `theta` radians away from the heading.
    pub fn radius(&self, theta: f64, speed: f64) -> f64 {
        self.base_distance + (PI - theta.abs()) / PI * speed
    }

    /// Returns the ordered boundary points of the cone around `track`.
    pub fn project(&self, track: &Track) -> Vec<Point> {
        let position = track.position();
        let speed = track.speed();
        let heading = track.heading();

        self.angles
            .iter()
            .map(|&theta| position.offset(self.radius(theta, speed), theta + heading))
            .collect()
    }

    /// Returns the boundary points as an `(n, 2)` matrix of `(x, y)` rows.
    pub fn project_array(&self, track: &Track) -> Array2<f64> {
        let points = self.project(track);
        Array2::from_shape_fn((points.len(), 2), |(row, column)| match column {
            0 => points[row].x(),
            _ => points[row].y(),
        })
    }
}
