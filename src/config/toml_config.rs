use crate::adapters::export::{CompressionConfig, ExportFormat, SUPPORTED_FORMATS};
use crate::adapters::insight::GeminiSettings;
use crate::config::{MAX_YEAR, MIN_YEAR};
use crate::core::explorer::ExplorerSettings;
use crate::core::geometry::{ChartDimensions, ScaleCeiling};
use crate::domain::model::CountryArchetype;
use crate::utils::error::{PopuvizError, Result};
use crate::utils::validation::{
    validate_allowed_values, validate_non_empty_string, validate_path, validate_positive_finite,
    validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub explorer: ExplorerConfig,
    pub chart: ChartDimensions,
    pub scale: ScaleConfig,
    pub insight: InsightConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub year: i32,
    pub archetype: CountryArchetype,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            archetype: CountryArchetype::Developed,
        }
    }
}

/// Fixed axis ceilings (millions) per archetype.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub developed: f64,
    pub developing: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            developed: CountryArchetype::Developed.default_scale_ceiling(),
            developing: CountryArchetype::Developing.default_scale_ceiling(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
            timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
    pub compression: CompressionConfig,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "./output".to_string(),
            formats: SUPPORTED_FORMATS.iter().map(|f| f.to_string()).collect(),
            compression: CompressionConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Loads and parses a TOML file, substituting `${VAR}` references first.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PopuvizError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PopuvizError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PopuvizError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_range("explorer.year", self.explorer.year, MIN_YEAR, MAX_YEAR)?;
        self.chart.validate()?;
        validate_positive_finite("scale.developed", self.scale.developed)?;
        validate_positive_finite("scale.developing", self.scale.developing)?;

        if self.insight.enabled {
            validate_url("insight.endpoint", &self.insight.endpoint)?;
            validate_non_empty_string("insight.model", &self.insight.model)?;
        }

        validate_path("output.path", &self.output.path)?;
        validate_allowed_values("output.formats", &self.output.formats, &SUPPORTED_FORMATS)?;
        if self.output.formats.is_empty() {
            return Err(PopuvizError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        if self.output.compression.enabled {
            validate_path("output.compression.filename", &self.output.compression.filename)?;
        }

        Ok(())
    }

    pub fn scale_ceiling(&self, archetype: CountryArchetype) -> Result<ScaleCeiling> {
        match archetype {
            CountryArchetype::Developed => ScaleCeiling::new(self.scale.developed),
            CountryArchetype::Developing => ScaleCeiling::new(self.scale.developing),
        }
    }

    pub fn export_formats(&self) -> Result<Vec<ExportFormat>> {
        let mut formats = Vec::with_capacity(self.output.formats.len());
        for raw in &self.output.formats {
            let format: ExportFormat = raw.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }

    /// API key with unresolved `${VAR}` placeholders treated as absent.
    pub fn api_key(&self) -> Option<String> {
        self.insight
            .api_key
            .as_ref()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
    }

    pub fn explorer_settings(&self) -> Result<ExplorerSettings> {
        Ok(ExplorerSettings {
            chart: self.chart,
            developed_scale: self.scale_ceiling(CountryArchetype::Developed)?,
            developing_scale: self.scale_ceiling(CountryArchetype::Developing)?,
            formats: self.export_formats()?,
            compression: self.output.compression.clone(),
        })
    }

    pub fn gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            endpoint: self.insight.endpoint.clone(),
            model: self.insight.model.clone(),
            api_key: self.api_key(),
            timeout_seconds: self.insight.timeout_seconds,
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[explorer]
year = 1980
archetype = "developing"

[chart]
width = 1000.0
height = 600.0
label_gutter = 80.0

[chart.margin]
top = 10.0

[scale]
developed = 70.0
developing = 140.0

[insight]
enabled = true
endpoint = "https://api.example.com"
model = "test-model"
api_key = "secret"
timeout_seconds = 5

[output]
path = "./pyramids"
formats = ["csv", "svg"]

[output.compression]
enabled = true
filename = "bundle.zip"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.explorer.year, 1980);
        assert_eq!(config.explorer.archetype, CountryArchetype::Developing);
        assert_eq!(config.chart.width, 1000.0);
        assert_eq!(config.chart.margin.top, 10.0);
        assert_eq!(config.chart.margin.left, 40.0);
        assert_eq!(config.scale_ceiling(CountryArchetype::Developing).unwrap().value(), 140.0);
        assert_eq!(config.api_key().as_deref(), Some("secret"));
        assert_eq!(
            config.export_formats().unwrap(),
            vec![ExportFormat::Csv, ExportFormat::Svg]
        );
        assert!(config.output.compression.enabled);
        assert!(config.validate().is_ok());

        let settings = config.explorer_settings().unwrap();
        assert_eq!(settings.scale_for(CountryArchetype::Developed).value(), 70.0);
        assert_eq!(settings.formats.len(), 2);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.explorer.year, 2024);
        assert_eq!(config.scale_ceiling(CountryArchetype::Developed).unwrap().value(), 60.0);
        assert_eq!(config.scale_ceiling(CountryArchetype::Developing).unwrap().value(), 120.0);
        assert_eq!(config.chart, ChartDimensions::default());
        assert_eq!(config.export_formats().unwrap().len(), 3);
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("POPUVIZ_TEST_API_KEY", "from-env");

        let toml_content = r#"
[insight]
api_key = "${POPUVIZ_TEST_API_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key().as_deref(), Some("from-env"));
    }

    #[test]
    fn test_unresolved_placeholder_counts_as_missing_key() {
        let toml_content = r#"
[insight]
api_key = "${POPUVIZ_DEFINITELY_UNSET_VARIABLE}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(
            config.insight.api_key.as_deref(),
            Some("${POPUVIZ_DEFINITELY_UNSET_VARIABLE}")
        );
        assert!(config.gemini_settings().api_key.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let future_year = TomlConfig::from_toml_str("[explorer]\nyear = 3000\n").unwrap();
        assert!(matches!(
            future_year.validate(),
            Err(PopuvizError::InvalidConfigValueError { ref field, .. }) if field == "explorer.year"
        ));

        let early_year = TomlConfig::from_toml_str("[explorer]\nyear = 1949\n").unwrap();
        assert!(early_year.validate().is_err());

        for year in [MIN_YEAR, MAX_YEAR] {
            let content = format!("[explorer]\nyear = {}\n", year);
            let edge = TomlConfig::from_toml_str(&content).unwrap();
            assert!(edge.validate().is_ok());
        }

        let bad_scale = TomlConfig::from_toml_str("[scale]\ndeveloped = 0.0\n").unwrap();
        assert!(bad_scale.validate().is_err());

        let bad_format = TomlConfig::from_toml_str("[output]\nformats = [\"png\"]\n").unwrap();
        assert!(bad_format.validate().is_err());

        let bad_endpoint =
            TomlConfig::from_toml_str("[insight]\nendpoint = \"ftp://example.com\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let disabled = TomlConfig::from_toml_str(
            "[insight]\nenabled = false\nendpoint = \"ftp://example.com\"\n",
        )
        .unwrap();
        assert!(disabled.validate().is_ok());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[chart\nwidth = ").unwrap_err();
        assert!(matches!(err, PopuvizError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[explorer]\nyear = 2100").unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.explorer.year, 2100);
    }

    #[test]
    fn test_bundled_sample_config_matches_defaults() {
        let config = TomlConfig::from_toml_str(include_str!("../../popuviz.toml")).unwrap();
        assert!(config.validate().is_ok());

        let defaults = TomlConfig::default();
        assert_eq!(config.explorer.year, defaults.explorer.year);
        assert_eq!(config.chart, defaults.chart);
        assert_eq!(config.output.formats, defaults.output.formats);
    }
}
