use crate::TrackerConfig;

/// Returns the gate radius of a track moving at `speed`.
///
/// The radius grows linearly with speed from `base_distance` and is clamped to
/// `[base_distance, max_distance]`. It does not depend on heading.
///
/// `config` is expected to pass `TrackerConfig::validate`. For an unvalidated config with
/// `max_distance < base_distance` the result is `max_distance`; it never panics.
pub fn gate_radius(config: &TrackerConfig, speed: f64) -> f64 {
    (config.base_distance() + speed * config.velocity_scale())
        .max(config.base_distance())
        .min(config.max_distance())
}
