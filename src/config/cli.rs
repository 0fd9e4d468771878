use super::toml_config::TomlConfig;
use super::{MAX_YEAR, MIN_YEAR};
use crate::domain::model::CountryArchetype;
use crate::utils::error::Result;
use crate::utils::validation::{validate_range, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "popuviz")]
#[command(about = "Population pyramid explorer for two demographic archetypes")]
pub struct CliConfig {
    /// Calendar year to render
    #[arg(long)]
    pub year: Option<i32>,

    #[arg(long, value_enum)]
    pub archetype: Option<CountryArchetype>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, value_delimiter = ',')]
    pub formats: Vec<String>,

    #[arg(long, help = "Bundle all outputs into one ZIP archive")]
    pub zip: bool,

    #[arg(long, help = "Skip the remote insight service and use the static insight")]
    pub offline: bool,

    #[arg(long, help = "Print the resolved configuration without generating output")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// Loads the TOML file (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(year) = self.year {
            config.explorer.year = year;
        }
        if let Some(archetype) = self.archetype {
            config.explorer.archetype = archetype;
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if !self.formats.is_empty() {
            config.output.formats = self.formats.clone();
        }
        if self.zip {
            config.output.compression.enabled = true;
        }
        if self.offline {
            config.insight.enabled = false;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        // The model extrapolates outside this window; the boundaries keep to it.
        if let Some(year) = self.year {
            validate_range("year", year, MIN_YEAR, MAX_YEAR)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_toml_values() {
        let cli = CliConfig::parse_from([
            "popuviz",
            "--year",
            "2060",
            "--archetype",
            "developing",
            "--formats",
            "csv,json",
            "--zip",
            "--offline",
        ]);
        let mut config = TomlConfig::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.explorer.year, 2060);
        assert_eq!(config.explorer.archetype, CountryArchetype::Developing);
        assert_eq!(config.output.formats, vec!["csv", "json"]);
        assert!(config.output.compression.enabled);
        assert!(!config.insight.enabled);
    }

    #[test]
    fn test_year_outside_slider_range_is_rejected() {
        let cli = CliConfig::parse_from(["popuviz", "--year", "2101"]);
        assert!(cli.validate().is_err());

        let cli = CliConfig::parse_from(["popuviz", "--year", "1950"]);
        assert!(cli.validate().is_ok());
    }
}
