//! Assigns persistent identities to point detections across video frames, estimates the
//! speed and heading of each track and projects the region it can reach next.

mod clock;
mod cone;
mod config;
mod detection;
mod gating;
mod kinematics;
mod point;
mod report;
mod track;
mod tracker;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use cone::MotionCone;
pub use config::*;
pub use detection::Detection;
pub use gating::gate_radius;
pub use kinematics::{estimate, Kinematics};
pub use point::Point;
pub use report::{format_frame_line, parse_frame_line, ReportError, TrackReport};
pub use track::{Track, TrackId};
pub use tracker::Tracker;
