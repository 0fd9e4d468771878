pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::adapters::insight::{
    FallbackInsightProvider, GeminiInsightClient, StaticInsightProvider,
};
pub use crate::adapters::storage::LocalStorage;
pub use crate::core::explorer::{Explorer, ExplorerSettings};
pub use crate::core::geometry::{layout, ChartDimensions, PyramidLayout, ScaleCeiling};
pub use crate::core::population::generate;
pub use crate::domain::model::{AgeBin, CountryArchetype, Insight, InsightOutcome, Snapshot};
pub use crate::utils::error::{PopuvizError, Result};
