use std::collections::{BTreeMap, HashSet};

use crate::*;
use tracing::{debug, trace, warn};

/// This is the multi-target point tracker.
///
/// Each frame, every detection is associated with the nearest track whose gate contains it,
/// or starts a new track. Tracks that go unmatched for `expiry_threshold` are dropped.
///
/// # Examples
///
/// ```
/// use vehicle_tracker::{Detection, Tracker};
///
/// // instantiate tracker with default parameters
/// let mut tracker = Tracker::default();
/// let cone = tracker.motion_cone();
///
/// // feed two frames of detections
/// tracker.match_and_update(vec![Detection::from_xy(50.0, 50.0)], 0.0);
/// let tracks = tracker.match_and_update(vec![Detection::from_xy(55.0, 50.0)], 0.1);
///
/// // print tracks and their predicted reachable region
/// for track in tracks {
///     println!(
///         "{} {:?} {} {}",
///         track.track_id(),
///         track.position(),
///         track.speed(),
///         cone.project(track).len(),
///     );
/// }
/// ```
#[derive(Debug)]
pub struct Tracker {
    /// Gating, kinematics and expiry parameters.
    config: TrackerConfig,
    /// Active tracks, iterated in ascending id order.
    tracks: BTreeMap<TrackId, Track>,
    /// Used to allocate identifiers to new tracks.
    next_id: u64,
}

impl Default for Tracker {
    fn default() -> Self {
        Tracker {
            config: TrackerConfig::default(),
            tracks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl Tracker {
    /// Returns a new, empty Tracker
    ///
    /// # Parameters
    ///
    /// * `config`: Tracker parameters, rejected if they fail `TrackerConfig::validate`.
    pub fn new(config: TrackerConfig) -> Result<Tracker, ConfigError> {
        config.validate()?;
        Ok(Tracker {
            config,
            ..Tracker::default()
        })
    }

    /// Return the configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Return the active tracks in ascending id order
    pub fn tracks(&self) -> Vec<&Track> {
        self.tracks.values().collect()
    }

    /// Return the track with `track_id` if it is active
    pub fn get(&self, track_id: TrackId) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Returns a motion cone projector matching this tracker's configuration.
    pub fn motion_cone(&self) -> MotionCone {
        MotionCone::from_config(&self.config)
    }

    /// Associate a frame of detections with the active tracks and expire stale tracks.
    ///
    /// Detections are processed in the order supplied. Each one updates the nearest track
    /// whose gate contains it (the lowest id wins a tie) or starts a new track. Unless
    /// `exclusive_matching` is set, a track matched earlier in the frame can be matched
    /// again, in which case the later detection wins. Detections with non-finite
    /// coordinates are skipped.
    ///
    /// # Parameters
    ///
    /// * `detections`: The detections of the current frame.
    /// * `now`: Monotonic time of the current frame.
    ///
    /// # Returns
    ///
    /// The tracks still active after the frame, in ascending id order.
    pub fn match_and_update(&mut self, detections: Vec<Detection>, now: f64) -> Vec<&Track> {
        if !now.is_finite() {
            warn!(now, "ignoring frame with non-finite timestamp");
            return self.tracks();
        }

        let mut reserved = HashSet::new();

        for detection in detections {
            if !detection.is_valid() {
                debug!(
                    detection_id = %detection.id(),
                    x = detection.position().x(),
                    y = detection.position().y(),
                    "skipping detection with non-finite coordinates"
                );
                continue;
            }

            match self.nearest_candidate(detection.position(), &reserved) {
                Some((track_id, distance)) => {
                    if let Some(track) = self.tracks.get_mut(&track_id) {
                        track.update(detection, now, &self.config);
                        trace!(
                            %track_id,
                            distance,
                            speed = track.speed(),
                            heading = track.heading(),
                            "matched detection"
                        );
                    }
                    if self.config.exclusive_matching() {
                        reserved.insert(track_id);
                    }
                }
                None => {
                    let track_id = self.activate(detection, now);
                    if self.config.exclusive_matching() {
                        reserved.insert(track_id);
                    }
                }
            }
        }

        self.expire(now);

        self.tracks()
    }

    /// Returns the nearest track whose gate contains `position`, and its distance.
    fn nearest_candidate(
        &self,
        position: &Point,
        reserved: &HashSet<TrackId>,
    ) -> Option<(TrackId, f64)> {
        self.tracks
            .values()
            .filter(|track| !reserved.contains(&track.track_id()))
            .filter_map(|track| {
                let distance = track.position().distance(position);
                (distance <= gate_radius(&self.config, track.speed()))
                    .then_some((track.track_id(), distance))
            })
            // min_by keeps the first of equal elements, i.e. the lowest id
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    fn activate(&mut self, detection: Detection, now: f64) -> TrackId {
        let track_id = TrackId::new(self.next_id);
        self.next_id += 1;

        debug!(
            %track_id,
            x = detection.position().x(),
            y = detection.position().y(),
            "created track"
        );
        self.tracks.insert(track_id, Track::new(track_id, detection, now));
        track_id
    }

    /// Remove every track that has gone `expiry_threshold` without a match.
    fn expire(&mut self, now: f64) {
        let expiry_threshold = self.config.expiry_threshold();
        self.tracks.retain(|track_id, track| {
            let expired = track.is_expired(now, expiry_threshold);
            if expired {
                debug!(%track_id, age = track.age(now), hits = track.hits(), "expired track");
            }
            !expired
        });
    }
}

#[cfg(test)]
mod tests {
    use crate::*;
    use anyhow::Result;
    use assert_approx_eq::assert_approx_eq;

    fn ids(tracks: &[&Track]) -> Vec<u64> {
        tracks.iter().map(|track| track.track_id().get()).collect()
    }

    #[test]
    fn creates_track() {
        let mut tracker = Tracker::default();
        let tracks = tracker.match_and_update(vec![Detection::from_xy(50.0, 50.0)], 0.0);

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].position(), &Point::new(50.0, 50.0));
        assert_eq!(tracks[0].speed(), 0.0);
        assert_eq!(tracks[0].heading(), 0.0);
        assert_eq!(tracks[0].last_seen(), 0.0);
    }

    #[test]
    fn re_associates_within_gate() -> Result<()> {
        let mut tracker =
            Tracker::new(TrackerConfig::default().with_expiry_threshold(2.0).to_owned())?;
        let time_scale = tracker.config().time_scale();
        let tracks = tracker.match_and_update(vec![Detection::from_xy(50.0, 50.0)], 0.0);
        let track_id = tracks[0].track_id();

        let tracks = tracker.match_and_update(vec![Detection::from_xy(55.0, 50.0)], 1.0);

        assert_eq!(tracks.len(), 1);
        let track = tracks[0];
        assert_eq!(track.track_id(), track_id);
        assert_eq!(track.position(), &Point::new(55.0, 50.0));
        assert_approx_eq!(track.speed(), 5.0 / time_scale);
        assert_eq!(track.heading(), 0.0);
        assert_eq!(track.last_seen(), 1.0);

        Ok(())
    }

    #[test]
    fn out_of_gate_detection_creates_track() -> Result<()> {
        let mut tracker =
            Tracker::new(TrackerConfig::default().with_base_distance(15.0).to_owned())?;
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        let tracks = tracker.match_and_update(vec![Detection::from_xy(1000.0, 1000.0)], 0.5);

        assert_eq!(ids(&tracks), vec![1, 2]);
        assert_eq!(tracks[0].position(), &Point::new(0.0, 0.0));
        assert_eq!(tracks[1].position(), &Point::new(1000.0, 1000.0));

        Ok(())
    }

    #[test]
    fn gate_boundary_is_inclusive() {
        let mut tracker = Tracker::default();
        let base_distance = tracker.config().base_distance();
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        let tracks =
            tracker.match_and_update(vec![Detection::from_xy(base_distance, 0.0)], 0.1);

        assert_eq!(ids(&tracks), vec![1]);
    }

    #[test]
    fn gate_widens_with_speed() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        // speed = 20 / (0.5 * 5) = 8, gate = 20 + 8 * 2 = 36
        tracker.match_and_update(vec![Detection::from_xy(20.0, 0.0)], 0.5);
        let tracks = tracker.match_and_update(vec![Detection::from_xy(55.0, 0.0)], 0.75);

        assert_eq!(ids(&tracks), vec![1]);
        assert_eq!(tracks[0].position(), &Point::new(55.0, 0.0));
    }

    #[test]
    fn expiry() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(10.0, 10.0)], 5.0);

        assert_eq!(tracker.match_and_update(vec![], 5.5).len(), 1);
        assert_eq!(tracker.match_and_update(vec![], 5.999).len(), 1);
        assert!(tracker.match_and_update(vec![], 6.0).is_empty());
        assert!(tracker.is_empty());
    }

    #[test]
    fn matched_track_is_not_expired() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(10.0, 10.0)], 0.0);
        tracker.match_and_update(vec![Detection::from_xy(12.0, 10.0)], 0.9);
        let tracks = tracker.match_and_update(vec![Detection::from_xy(14.0, 10.0)], 1.8);

        assert_eq!(ids(&tracks), vec![1]);
        assert_eq!(tracks[0].hits(), 3);
    }

    #[test]
    fn nearest_track_wins() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(
            vec![Detection::from_xy(0.0, 0.0), Detection::from_xy(30.0, 0.0)],
            0.0,
        );
        let tracks = tracker.match_and_update(vec![Detection::from_xy(18.0, 0.0)], 0.1);

        assert_eq!(ids(&tracks), vec![1, 2]);
        assert_eq!(tracks[0].position(), &Point::new(0.0, 0.0));
        assert_eq!(tracks[1].position(), &Point::new(18.0, 0.0));
    }

    #[test]
    fn tie_goes_to_lowest_id() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(
            vec![Detection::from_xy(0.0, 0.0), Detection::from_xy(30.0, 0.0)],
            0.0,
        );
        let tracks = tracker.match_and_update(vec![Detection::from_xy(15.0, 0.0)], 0.1);

        assert_eq!(tracks[0].position(), &Point::new(15.0, 0.0));
        assert_eq!(tracks[1].position(), &Point::new(30.0, 0.0));
    }

    #[test]
    fn matching_is_non_exclusive_by_default() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        let tracks = tracker.match_and_update(
            vec![Detection::from_xy(5.0, 0.0), Detection::from_xy(0.0, 5.0)],
            0.1,
        );

        // both detections gate onto track 1, the later one wins
        assert_eq!(ids(&tracks), vec![1]);
        assert_eq!(tracks[0].position(), &Point::new(0.0, 5.0));
        assert_eq!(tracks[0].hits(), 3);
    }

    #[test]
    fn exclusive_matching_reserves_tracks() -> Result<()> {
        let mut tracker =
            Tracker::new(TrackerConfig::default().with_exclusive_matching(true).to_owned())?;
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        let tracks = tracker.match_and_update(
            vec![Detection::from_xy(5.0, 0.0), Detection::from_xy(0.0, 5.0)],
            0.1,
        );

        assert_eq!(ids(&tracks), vec![1, 2]);
        assert_eq!(tracks[0].position(), &Point::new(5.0, 0.0));
        assert_eq!(tracks[1].position(), &Point::new(0.0, 5.0));

        Ok(())
    }

    #[test]
    fn track_created_this_frame_is_a_candidate() {
        let mut tracker = Tracker::default();
        let tracks = tracker.match_and_update(
            vec![Detection::from_xy(0.0, 0.0), Detection::from_xy(3.0, 4.0)],
            0.0,
        );

        // second detection lands on the new track with no elapsed time
        assert_eq!(ids(&tracks), vec![1]);
        assert_eq!(tracks[0].position(), &Point::new(3.0, 4.0));
        assert_eq!(tracks[0].speed(), 0.0);
    }

    #[test]
    fn skips_non_finite_detections() {
        let mut tracker = Tracker::default();
        let tracks = tracker.match_and_update(
            vec![
                Detection::from_xy(f64::NAN, 0.0),
                Detection::from_xy(1.0, f64::INFINITY),
                Detection::from_xy(100.0, 100.0),
            ],
            0.0,
        );

        assert_eq!(ids(&tracks), vec![1]);
        assert_eq!(tracks[0].position(), &Point::new(100.0, 100.0));
    }

    #[test]
    fn non_finite_timestamp_leaves_tracks_unchanged() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(10.0, 10.0)], 0.0);

        for now in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let tracks =
                tracker.match_and_update(vec![Detection::from_xy(500.0, 500.0)], now);
            assert_eq!(ids(&tracks), vec![1]);
            assert_eq!(tracks[0].position(), &Point::new(10.0, 10.0));
            assert_eq!(tracks[0].last_seen(), 0.0);
            assert_eq!(tracks[0].hits(), 1);
        }

        // infinity would otherwise have expired the track
        assert_eq!(tracker.match_and_update(vec![], 0.5).len(), 1);
    }

    #[test]
    fn ids_are_never_reused() {
        let mut tracker = Tracker::default();
        tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 0.0);
        tracker.match_and_update(vec![], 2.0);
        let tracks = tracker.match_and_update(vec![Detection::from_xy(0.0, 0.0)], 2.1);

        assert_eq!(ids(&tracks), vec![2]);
        assert!(tracker.get(TrackId::new(1)).is_none());
        assert!(tracker.get(TrackId::new(2)).is_some());
    }

    #[test]
    fn rejects_invalid_config() {
        let config = TrackerConfig::default()
            .with_base_distance(120.0)
            .with_max_distance(100.0)
            .to_owned();
        assert!(matches!(
            Tracker::new(config),
            Err(ConfigError::MaxBelowBase { .. })
        ));
    }
}
