mod utils;
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::PathBuf,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use utils::frame_reader::FrameReader;
use vehicle_tracker::*;

/// Replays recorded point detections through the vehicle tracker.
///
/// Prints one `<id>,<x>,<y>,<speed> ` line per frame to stdout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with a `time,x,y` header, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    input: String,

    /// Gate radius of a stationary track, also the motion cone base radius
    #[arg(long, default_value_t = DEFAULT_BASE_DISTANCE)]
    base_distance: f64,

    /// Upper bound of the gate radius
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
    max_distance: f64,

    /// Gate radius growth per unit of speed
    #[arg(long, default_value_t = DEFAULT_VELOCITY_SCALE)]
    velocity_scale: f64,

    /// Divisor applied to elapsed time when estimating speed
    #[arg(long, default_value_t = DEFAULT_TIME_SCALE)]
    time_scale: f64,

    /// Seconds without a match before a track is dropped
    #[arg(long, default_value_t = DEFAULT_EXPIRY_THRESHOLD)]
    expiry_threshold: f64,

    /// Number of boundary points per motion cone
    #[arg(long, default_value_t = DEFAULT_CONE_SAMPLE_COUNT)]
    cone_sample_count: usize,

    /// Number of speed samples in the average speed window
    #[arg(long, default_value_t = DEFAULT_SPEED_WINDOW)]
    speed_window: usize,

    /// Let each track absorb at most one detection per frame
    #[arg(long, default_value_t = false)]
    exclusive: bool,

    /// Stamp frames with the wall clock instead of the recorded time
    #[arg(long, default_value_t = false)]
    live: bool,

    /// Write motion cone boundary points to this CSV file
    #[arg(short, long)]
    cones: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_base_distance(self.base_distance)
            .with_max_distance(self.max_distance)
            .with_velocity_scale(self.velocity_scale)
            .with_time_scale(self.time_scale)
            .with_expiry_threshold(self.expiry_threshold)
            .with_cone_sample_count(self.cone_sample_count)
            .with_speed_window(self.speed_window)
            .with_exclusive_matching(self.exclusive)
            .to_owned()
    }
}

/// One motion cone boundary point in the cone output file.
#[derive(Debug, Serialize)]
struct ConeRow {
    frame: usize,
    track_id: u64,
    x: f64,
    y: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut tracker =
        Tracker::new(args.tracker_config()).context("invalid tracker configuration")?;
    let cone = tracker.motion_cone();

    let input: Box<dyn Read> = if args.input == "-" {
        Box::new(io::stdin().lock())
    } else {
        Box::new(
            File::open(&args.input).with_context(|| format!("cannot open {}", args.input))?,
        )
    };

    let mut cone_writer = args
        .cones
        .as_ref()
        .map(|path| {
            csv::Writer::from_path(path)
                .with_context(|| format!("cannot create {}", path.display()))
        })
        .transpose()?;

    let live_clock = MonotonicClock::default();
    let mut replay_clock = None;
    let mut out = BufWriter::new(io::stdout().lock());
    let mut frame_count = 0;

    for (frame_index, frame) in FrameReader::new(input).enumerate() {
        let frame = frame.with_context(|| format!("cannot read frame {frame_index}"))?;
        let now = if args.live {
            live_clock.now()
        } else {
            recorded_now(&mut replay_clock, frame.time)
        };
        debug!(
            frame = frame_index,
            now,
            detections = frame.detections.len(),
            "processing frame"
        );

        let tracks = tracker.match_and_update(frame.detections, now);
        out.write_all(format_frame_line(tracks.iter().copied()).as_bytes())?;
        // keep downstream consumers in step with the frames
        out.flush()?;

        if let Some(writer) = cone_writer.as_mut() {
            tracks.iter().try_for_each(|track| {
                cone.project(track).into_iter().try_for_each(|point| {
                    writer.serialize(ConeRow {
                        frame: frame_index,
                        track_id: track.track_id().get(),
                        x: point.x(),
                        y: point.y(),
                    })
                })
            })?;
        }

        frame_count += 1;
    }

    if let Some(mut writer) = cone_writer {
        writer.flush()?;
    }

    info!(
        frames = frame_count,
        active_tracks = tracker.len(),
        "replay finished"
    );

    Ok(())
}

/// Advances the replay clock to a recorded frame time.
///
/// Recorded times have an arbitrary epoch, so the clock starts at the first frame's time.
fn recorded_now(clock: &mut Option<ManualClock>, time: f64) -> f64 {
    let clock = clock.get_or_insert_with(|| ManualClock::new(time));
    if !clock.set(time) {
        debug!(time, now = clock.now(), "recorded time is behind the replay clock");
    }
    clock.now()
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
