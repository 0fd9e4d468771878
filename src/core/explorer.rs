use crate::adapters::export::{CompressionConfig, ExportFormat, Exporter, PyramidReport};
use crate::core::geometry::{layout, ChartDimensions, PyramidLayout, ScaleCeiling};
use crate::core::population::generate;
use crate::core::summary::summarize;
use crate::domain::model::CountryArchetype;
use crate::domain::ports::{InsightProvider, Storage};
use crate::utils::error::Result;

/// Resolved, validated inputs for an [`Explorer`].
#[derive(Debug, Clone)]
pub struct ExplorerSettings {
    pub chart: ChartDimensions,
    pub developed_scale: ScaleCeiling,
    pub developing_scale: ScaleCeiling,
    pub formats: Vec<ExportFormat>,
    pub compression: CompressionConfig,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            chart: ChartDimensions::default(),
            developed_scale: ScaleCeiling::for_archetype(CountryArchetype::Developed),
            developing_scale: ScaleCeiling::for_archetype(CountryArchetype::Developing),
            formats: vec![ExportFormat::Csv, ExportFormat::Json, ExportFormat::Svg],
            compression: CompressionConfig::default(),
        }
    }
}

impl ExplorerSettings {
    pub fn scale_for(&self, archetype: CountryArchetype) -> ScaleCeiling {
        match archetype {
            CountryArchetype::Developed => self.developed_scale,
            CountryArchetype::Developing => self.developing_scale,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExplorerRun {
    pub report: PyramidReport,
    pub layout: PyramidLayout,
    pub written: Vec<String>,
}

pub struct Explorer<S: Storage, P: InsightProvider> {
    exporter: Exporter<S>,
    insight: P,
    settings: ExplorerSettings,
}

impl<S: Storage, P: InsightProvider> Explorer<S, P> {
    pub fn new(storage: S, insight: P, settings: ExplorerSettings) -> Self {
        Self {
            exporter: Exporter::new(storage),
            insight,
            settings,
        }
    }

    pub async fn run(&self, year: i32, archetype: CountryArchetype) -> Result<ExplorerRun> {
        tracing::info!("Generating {} pyramid for {}", archetype, year);
        let snapshot = generate(year, archetype);
        let summary = summarize(&snapshot.bins);
        tracing::debug!(
            "Youth {:.1}M, working age {:.1}M, elderly {:.1}M",
            summary.youth,
            summary.working_age,
            summary.elderly
        );

        let scale = self.settings.scale_for(archetype);
        let layout = layout(&snapshot.bins, scale, &self.settings.chart);

        let insight = self.insight.fetch_insight(year, archetype).await;
        if insight.is_fallback() {
            tracing::info!("Using static insight");
        } else {
            tracing::info!("Insight: {}", insight.insight().title);
        }

        let report = PyramidReport::new(snapshot, scale, summary, insight);
        let written = self
            .exporter
            .export(
                &report,
                &layout,
                &self.settings.chart,
                &self.settings.formats,
                &self.settings.compression,
            )
            .await?;
        tracing::info!("Wrote {} file(s)", written.len());

        Ok(ExplorerRun {
            report,
            layout,
            written,
        })
    }
}
