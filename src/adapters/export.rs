//! Output artifacts for a single snapshot: CSV table, JSON report, SVG chart,
//! optionally bundled into one ZIP archive.

use crate::core::geometry::{ChartDimensions, PyramidLayout, ScaleCeiling};
use crate::domain::model::{
    AgeBin, CountryArchetype, InsightOutcome, PopulationSummary, Snapshot, TransitionFactors,
};
use crate::domain::ports::Storage;
use crate::utils::error::{PopuvizError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::io::Write;
use std::str::FromStr;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const SUPPORTED_FORMATS: [&str; 3] = ["csv", "json", "svg"];

const MALE_FILL: &str = "#3b82f6";
const FEMALE_FILL: &str = "#f43f5e";
const LABEL_FILL: &str = "#94a3b8";
const TICK_FILL: &str = "#cbd5e1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
    Svg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Svg => "svg",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PopuvizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "svg" => Ok(ExportFormat::Svg),
            other => Err(PopuvizError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    SUPPORTED_FORMATS.join(", ")
                ),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub enabled: bool,
    pub filename: String,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            filename: "pyramid.zip".to_string(),
        }
    }
}

/// Everything known about one run, serialized as the JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct PyramidReport {
    pub year: i32,
    pub archetype: CountryArchetype,
    pub archetype_label: &'static str,
    pub factors: TransitionFactors,
    pub scale_ceiling: ScaleCeiling,
    pub bins: Vec<AgeBin>,
    pub summary: PopulationSummary,
    pub insight: InsightOutcome,
    pub generated_at: DateTime<Utc>,
}

impl PyramidReport {
    pub fn new(
        snapshot: Snapshot,
        scale_ceiling: ScaleCeiling,
        summary: PopulationSummary,
        insight: InsightOutcome,
    ) -> Self {
        Self {
            year: snapshot.year,
            archetype: snapshot.archetype,
            archetype_label: snapshot.archetype.label(),
            factors: snapshot.factors,
            scale_ceiling,
            bins: snapshot.bins,
            summary,
            insight,
            generated_at: Utc::now(),
        }
    }

    /// File stem shared by every artifact of this report.
    pub fn file_stem(&self) -> String {
        let kind = match self.archetype {
            CountryArchetype::Developed => "developed",
            CountryArchetype::Developing => "developing",
        };
        format!("pyramid_{}_{}", kind, self.year)
    }
}

pub fn to_csv(bins: &[AgeBin]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["age_range", "male", "female"])?;
    for bin in bins {
        writer.write_record([
            bin.age_range.to_string(),
            format!("{:.2}", bin.male),
            format!("{:.2}", bin.female),
        ])?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| PopuvizError::IoError(e.into_error()))?;
    String::from_utf8(data).map_err(|e| PopuvizError::ExportError {
        message: format!("CSV output was not UTF-8: {}", e),
    })
}

pub fn to_json(report: &PyramidReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Draws the pyramid described by `layout` as a standalone SVG document.
pub fn render_svg(
    report: &PyramidReport,
    layout: &PyramidLayout,
    chart: &ChartDimensions,
) -> std::result::Result<String, fmt::Error> {
    let mut svg = String::new();
    let (width, height) = (chart.width, chart.height);

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    )?;
    writeln!(
        svg,
        r#"  <title>{} - {}</title>"#,
        escape_xml(report.archetype_label),
        report.year
    )?;

    for bar in &layout.bars {
        writeln!(
            svg,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="{MALE_FILL}"/>"#,
            layout.male_axis_x - bar.male_bar_length,
            bar.y_top,
            bar.male_bar_length,
            bar.y_height
        )?;
        writeln!(
            svg,
            r#"  <rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" rx="2" fill="{FEMALE_FILL}"/>"#,
            layout.female_axis_x,
            bar.y_top,
            bar.female_bar_length,
            bar.y_height
        )?;
        writeln!(
            svg,
            r#"  <text x="{:.2}" y="{:.2}" dy=".35em" text-anchor="middle" font-size="10" fill="{LABEL_FILL}">{}</text>"#,
            layout.label_x,
            bar.label_y,
            escape_xml(bar.age_range)
        )?;
    }

    let tick_y = height - 25.0;
    for tick in &layout.ticks {
        for x in [tick.male_x, tick.female_x] {
            writeln!(
                svg,
                r#"  <text x="{:.2}" y="{tick_y:.2}" text-anchor="middle" font-size="9" fill="{TICK_FILL}">{}</text>"#,
                x, tick.label
            )?;
        }
    }

    let caption_y = height - 10.0;
    writeln!(
        svg,
        r#"  <text x="{:.2}" y="{caption_y:.2}" text-anchor="middle" font-size="12" font-weight="bold" fill="{MALE_FILL}">Male</text>"#,
        layout.male_axis_x - layout.half_width / 2.0
    )?;
    writeln!(
        svg,
        r#"  <text x="{:.2}" y="{caption_y:.2}" text-anchor="middle" font-size="12" font-weight="bold" fill="{FEMALE_FILL}">Female</text>"#,
        layout.female_axis_x + layout.half_width / 2.0
    )?;
    svg.push_str("</svg>\n");
    Ok(svg)
}

pub fn bundle_zip(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

pub struct Exporter<S: Storage> {
    storage: S,
}

impl<S: Storage> Exporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Writes one artifact per format, or a single archive when compression is on.
    /// Returns the written paths.
    pub async fn export(
        &self,
        report: &PyramidReport,
        layout: &PyramidLayout,
        chart: &ChartDimensions,
        formats: &[ExportFormat],
        compression: &CompressionConfig,
    ) -> Result<Vec<String>> {
        let stem = report.file_stem();
        let mut files = Vec::with_capacity(formats.len());
        for format in formats {
            let content = match format {
                ExportFormat::Csv => to_csv(&report.bins)?,
                ExportFormat::Json => to_json(report)?,
                ExportFormat::Svg => {
                    render_svg(report, layout, chart).map_err(|e| PopuvizError::ExportError {
                        message: format!("SVG rendering failed: {}", e),
                    })?
                }
            };
            files.push((format!("{}.{}", stem, format.extension()), content.into_bytes()));
        }

        if compression.enabled {
            tracing::debug!("Creating ZIP file with {} files", files.len());
            let archive = bundle_zip(&files)?;
            let path = self.storage.write_file(&compression.filename, &archive).await?;
            return Ok(vec![path]);
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in &files {
            written.push(self.storage.write_file(name, data).await?);
        }
        Ok(written)
    }
}
