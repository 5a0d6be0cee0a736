use crate::assets::AssetPaths;
use crate::logging::{LogConfig, LogLevel, DEFAULT_LOG_LEVEL};

pub const PARTICLE_BODY_COUNT: usize = 60;
pub const LAYOUT_SEED: u32 = 123_456;
pub const SEED_POINT_COUNT: usize = 14;
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;
pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
pub const CONTACT_SUBMIT_DELAY_MS: u32 = 600;

const MAX_FRAME_DELTA_MS_BOUNDS: (f64, f64) = (16.0, 1_000.0);

#[derive(Clone, Debug, PartialEq)]
pub struct MotionConfig {
    pub particle_body_count: usize,
    pub layout_seed: u32,
    pub seed_point_count: usize,
    pub max_device_pixel_ratio: f64,
    pub max_frame_delta_ms: f64,
    pub assets: AssetPaths,
    pub log: LogConfig,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            particle_body_count: PARTICLE_BODY_COUNT,
            layout_seed: LAYOUT_SEED,
            seed_point_count: SEED_POINT_COUNT,
            max_device_pixel_ratio: MAX_DEVICE_PIXEL_RATIO,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
            assets: AssetPaths::default(),
            log: LogConfig::default(),
        }
    }
}

impl MotionConfig {
    /// Reads the values baked in by the bundler at compile time.
    pub fn from_build_env() -> Self {
        Self::from_values(
            option_env!("PORTFOLIO_BASE_PATH"),
            option_env!("PORTFOLIO_LOG_LEVEL"),
            option_env!("PORTFOLIO_MAX_FRAME_DELTA_MS"),
        )
    }

    fn from_values(base_path: Option<&str>, log_level: Option<&str>, max_frame_delta_ms: Option<&str>) -> Self {
        let level = log_level.and_then(LogLevel::parse).unwrap_or(DEFAULT_LOG_LEVEL);
        let max_frame_delta_ms = max_frame_delta_ms
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| (MAX_FRAME_DELTA_MS_BOUNDS.0..=MAX_FRAME_DELTA_MS_BOUNDS.1).contains(value))
            .unwrap_or(MAX_FRAME_DELTA_MS);

        Self {
            max_frame_delta_ms,
            assets: AssetPaths::new(base_path.unwrap_or("")),
            log: LogConfig::new(level),
            ..Self::default()
        }
    }
}
