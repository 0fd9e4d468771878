#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

/// Year window covered by the explorer's slider.
pub const MIN_YEAR: i32 = 1950;
pub const MAX_YEAR: i32 = 2100;
