use std::fmt;

use crate::*;
use serde::{Deserialize, Serialize};

/// Identifier of a track, unique for the lifetime of a `Tracker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackId(u64);

impl TrackId {
    pub fn new(id: u64) -> TrackId {
        TrackId(id)
    }

    /// Returns the raw identifier
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single target track: the last known position of an object and its most recent motion.
#[derive(Debug, Clone)]
pub struct Track {
    /// A unique track identifier.
    track_id: TrackId,
    /// The last detection matched to this track.
    detection: Detection,
    /// Last known position.
    position: Point,
    /// Speed and heading from the most recent non-degenerate update.
    kinematics: Kinematics,
    /// Time the track was created.
    first_seen: f64,
    /// Time of the last matched detection.
    last_seen: f64,
    /// Total number of detections absorbed, including the one that created the track.
    hits: usize,
    /// Sum of the speed samples in the current averaging window.
    speed_sum: f64,
    /// Number of speed samples in the current averaging window.
    speed_samples: usize,
}

impl Track {
    /// Returns a new stationary Track
    ///
    /// # Parameters
    ///
    /// * `track_id`: A unique track identifier.
    /// * `detection`: The detection this track originates from.
    /// * `now`: Time of the frame containing `detection`.
    pub fn new(track_id: TrackId, detection: Detection, now: f64) -> Track {
        Track {
            track_id,
            position: *detection.position(),
            detection,
            kinematics: Kinematics::default(),
            first_seen: now,
            last_seen: now,
            hits: 1,
            speed_sum: 0.0,
            speed_samples: 1,
        }
    }

    /// Return the identifier of the track
    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    /// Return the detection associated with the latest update
    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    /// Return the last known position
    pub fn position(&self) -> &Point {
        &self.position
    }

    /// Return the speed and heading
    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    pub fn speed(&self) -> f64 {
        self.kinematics.speed()
    }

    pub fn heading(&self) -> f64 {
        self.kinematics.heading()
    }

    /// Return the mean speed over the current averaging window
    pub fn average_speed(&self) -> f64 {
        self.speed_sum / self.speed_samples as f64
    }

    pub fn first_seen(&self) -> f64 {
        self.first_seen
    }

    pub fn last_seen(&self) -> f64 {
        self.last_seen
    }

    /// Return the number of detections absorbed by the track
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Time elapsed since the last matched detection.
    pub fn age(&self, now: f64) -> f64 {
        now - self.last_seen
    }

    /// Time elapsed since the track was created.
    pub fn lifetime(&self, now: f64) -> f64 {
        now - self.first_seen
    }

    /// Returns true once the track has gone `expiry_threshold` without a match.
    pub fn is_expired(&self, now: f64, expiry_threshold: f64) -> bool {
        self.age(now) >= expiry_threshold
    }

    /// Move the track onto a matched detection and re-estimate its motion.
    ///
    /// When no time has elapsed since the last match the position is refreshed but the
    /// previous speed and heading are kept.
    ///
    /// # Parameters
    ///
    /// * `detection`: The associated detection.
    /// * `now`: Time of the current frame.
    /// * `config`: Supplies the time scale and the averaging window.
    pub fn update(&mut self, detection: Detection, now: f64, config: &TrackerConfig) -> &Self {
        if let Some(kinematics) = estimate(
            &self.position,
            self.last_seen,
            detection.position(),
            now,
            config.time_scale(),
        ) {
            self.kinematics = kinematics;
        }

        if self.speed_samples >= config.speed_window() {
            self.speed_sum = 0.0;
            self.speed_samples = 0;
        }
        self.speed_sum += self.kinematics.speed();
        self.speed_samples += 1;

        self.position = *detection.position();
        self.detection = detection;
        self.last_seen = self.last_seen.max(now);
        self.hits += 1;

        self
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use assert_approx_eq::assert_approx_eq;

    fn track_at(x: f64, y: f64, now: f64) -> Track {
        Track::new(TrackId::new(1), Detection::from_xy(x, y), now)
    }

    #[test]
    fn new_track_is_stationary() {
        let track = track_at(50.0, 50.0, 0.0);
        assert_eq!(track.position(), &Point::new(50.0, 50.0));
        assert_eq!(track.speed(), 0.0);
        assert_eq!(track.heading(), 0.0);
        assert_eq!(track.hits(), 1);
        assert_eq!(track.average_speed(), 0.0);
    }

    #[test]
    fn update() {
        let config = TrackerConfig::default();
        let mut track = track_at(50.0, 50.0, 0.0);
        let detection = Detection::from_xy(55.0, 50.0);
        let detection_id = *detection.id();

        track.update(detection, 1.0, &config);

        assert_eq!(track.position(), &Point::new(55.0, 50.0));
        assert_eq!(track.detection().id(), &detection_id);
        assert_approx_eq!(track.speed(), 5.0 / config.time_scale());
        assert_eq!(track.heading(), 0.0);
        assert_eq!(track.last_seen(), 1.0);
        assert_eq!(track.first_seen(), 0.0);
        assert_eq!(track.hits(), 2);
        assert_eq!(track.lifetime(1.5), 1.5);
    }

    #[test]
    fn degenerate_update_keeps_motion() {
        let config = TrackerConfig::default();
        let mut track = track_at(0.0, 0.0, 0.0);
        track.update(Detection::from_xy(10.0, 0.0), 1.0, &config);
        let kinematics = *track.kinematics();

        // same timestamp
        track.update(Detection::from_xy(10.0, 5.0), 1.0, &config);
        assert_eq!(track.kinematics(), &kinematics);
        assert_eq!(track.position(), &Point::new(10.0, 5.0));

        // clock regression never rewinds last_seen
        track.update(Detection::from_xy(10.0, 6.0), 0.5, &config);
        assert_eq!(track.kinematics(), &kinematics);
        assert_eq!(track.last_seen(), 1.0);
        assert!(track.speed().is_finite());
    }

    #[test]
    fn average_speed_window_restarts() {
        let config = TrackerConfig::default().with_speed_window(2).to_owned();
        let mut track = track_at(0.0, 0.0, 0.0);

        // window: [0.0, 2.0]
        track.update(Detection::from_xy(10.0, 0.0), 1.0, &config);
        assert_approx_eq!(track.average_speed(), 1.0);

        // window restarts: [4.0]
        track.update(Detection::from_xy(30.0, 0.0), 2.0, &config);
        assert_approx_eq!(track.average_speed(), 4.0);

        // window: [4.0, 0.0]
        track.update(Detection::from_xy(30.0, 0.0), 3.0, &config);
        assert_approx_eq!(track.average_speed(), 2.0);
    }

    #[test]
    fn expiry_boundary() {
        let track = track_at(0.0, 0.0, 2.0);
        assert!(!track.is_expired(2.999, 1.0));
        assert!(track.is_expired(3.0, 1.0));
        assert!(track.is_expired(10.0, 1.0));
    }
}
