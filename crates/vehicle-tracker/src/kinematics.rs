use crate::Point;

/// Instantaneous motion of a track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    /// Distance per unit of scaled time, never negative.
    speed: f64,
    /// Direction of the most recent motion in radians.
    heading: f64,
}

impl Kinematics {
    /// Returns the speed
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the heading in radians
    pub fn heading(&self) -> f64 {
        self.heading
    }
}

/// Estimate speed and heading from two consecutive observations.
///
/// # Parameters
///
/// * `old_position`: The previous position of the track.
/// * `old_timestamp`: The time the previous position was observed.
/// * `new_position`: The matched detection.
/// * `now`: The time of the current frame.
/// * `time_scale`: Divisor applied to the elapsed time.
///
/// # Returns
///
/// `None` when no time has elapsed (or the clock went backwards); the caller keeps its prior estimate.
/// No smoothing is applied, the result replaces any previous estimate.
pub fn estimate(
    old_position: &Point,
    old_timestamp: f64,
    new_position: &Point,
    now: f64,
    time_scale: f64,
) -> Option<Kinematics> {
    let dt = now - old_timestamp;
    if dt <= 0.0 || dt.is_nan() {
        return None;
    }

    let speed = old_position.distance(new_position) / (dt * time_scale);
    if !speed.is_finite() {
        return None;
    }

    Some(Kinematics {
        speed,
        heading: old_position.angle_to(new_position),
    })
}
