use thiserror::Error;

/// Default gate and motion cone base radius.
pub const DEFAULT_BASE_DISTANCE: f64 = 20.0;
/// Default ceiling of the gate radius.
pub const DEFAULT_MAX_DISTANCE: f64 = 100.0;
/// Default growth of the gate radius per unit of speed.
pub const DEFAULT_VELOCITY_SCALE: f64 = 2.0;
/// Default divisor applied to elapsed time when estimating speed.
pub const DEFAULT_TIME_SCALE: f64 = 5.0;
/// Default time since the last match after which a track is dropped.
pub const DEFAULT_EXPIRY_THRESHOLD: f64 = 1.0;
/// Default angular resolution of the motion cone.
pub const DEFAULT_CONE_SAMPLE_COUNT: usize = 200;
/// Default number of speed samples in the averaging window.
pub const DEFAULT_SPEED_WINDOW: usize = 15;

/// Errors raised when a tracker configuration cannot be used.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max_distance ({max_distance}) is smaller than base_distance ({base_distance})")]
    MaxBelowBase {
        base_distance: f64,
        max_distance: f64,
    },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} must be at least 1")]
    ZeroCount { name: &'static str },
}

/// Parameters of the association engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Gate radius of a stationary track, also the motion cone base radius.
    base_distance: f64,
    /// Upper bound of the gate radius.
    max_distance: f64,
    /// Gate radius growth per unit of speed.
    velocity_scale: f64,
    /// Divisor applied to elapsed time in the speed estimate.
    time_scale: f64,
    /// Age at which a track is removed.
    expiry_threshold: f64,
    /// Number of boundary points in a motion cone.
    cone_sample_count: usize,
    /// Reserve a matched track for the rest of the frame.
    exclusive_matching: bool,
    /// Number of speed samples averaged before the window restarts.
    speed_window: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig {
            base_distance: DEFAULT_BASE_DISTANCE,
            max_distance: DEFAULT_MAX_DISTANCE,
            velocity_scale: DEFAULT_VELOCITY_SCALE,
            time_scale: DEFAULT_TIME_SCALE,
            expiry_threshold: DEFAULT_EXPIRY_THRESHOLD,
            cone_sample_count: DEFAULT_CONE_SAMPLE_COUNT,
            exclusive_matching: false,
            speed_window: DEFAULT_SPEED_WINDOW,
        }
    }
}

impl TrackerConfig {
    /// Set base_distance
    pub fn with_base_distance(&mut self, base_distance: f64) -> &mut Self {
        self.base_distance = base_distance;
        self
    }

    /// Set max_distance
    pub fn with_max_distance(&mut self, max_distance: f64) -> &mut Self {
        self.max_distance = max_distance;
        self
    }

    /// Set velocity_scale
    pub fn with_velocity_scale(&mut self, velocity_scale: f64) -> &mut Self {
        self.velocity_scale = velocity_scale;
        self
    }

    /// Set time_scale
    pub fn with_time_scale(&mut self, time_scale: f64) -> &mut Self {
        self.time_scale = time_scale;
        self
    }

    /// Set expiry_threshold
    pub fn with_expiry_threshold(&mut self, expiry_threshold: f64) -> &mut Self {
        self.expiry_threshold = expiry_threshold;
        self
    }

    /// Set cone_sample_count
    pub fn with_cone_sample_count(&mut self, cone_sample_count: usize) -> &mut Self {
        self.cone_sample_count = cone_sample_count;
        self
    }

    /// Set exclusive_matching
    pub fn with_exclusive_matching(&mut self, exclusive_matching: bool) -> &mut Self {
        self.exclusive_matching = exclusive_matching;
        self
    }

    /// Set speed_window
    pub fn with_speed_window(&mut self, speed_window: usize) -> &mut Self {
        self.speed_window = speed_window;
        self
    }

    pub fn base_distance(&self) -> f64 {
        self.base_distance
    }

    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn velocity_scale(&self) -> f64 {
        self.velocity_scale
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn expiry_threshold(&self) -> f64 {
        self.expiry_threshold
    }

    pub fn cone_sample_count(&self) -> usize {
        self.cone_sample_count
    }

    pub fn exclusive_matching(&self) -> bool {
        self.exclusive_matching
    }

    pub fn speed_window(&self) -> usize {
        self.speed_window
    }

    /// Checks that the configuration describes a usable tracker.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("base_distance", self.base_distance)?;
        non_negative("max_distance", self.max_distance)?;
        non_negative("velocity_scale", self.velocity_scale)?;
        positive("time_scale", self.time_scale)?;
        positive("expiry_threshold", self.expiry_threshold)?;

        if self.max_distance < self.base_distance {
            return Err(ConfigError::MaxBelowBase {
                base_distance: self.base_distance,
                max_distance: self.max_distance,
            });
        }
        if self.cone_sample_count == 0 {
            return Err(ConfigError::ZeroCount {
                name: "cone_sample_count",
            });
        }
        if self.speed_window == 0 {
            return Err(ConfigError::ZeroCount {
                name: "speed_window",
            });
        }

        Ok(())
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}
