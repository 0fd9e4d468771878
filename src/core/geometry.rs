//! Back-to-back bar layout for a population pyramid.
//!
//! Bars are scaled against a caller-chosen [`ScaleCeiling`] rather than the
//! snapshot maximum, so the same value maps to the same length in every year.

use crate::domain::model::{AgeBin, CountryArchetype};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_negative_finite, validate_positive_finite};
use serde::{Deserialize, Serialize};

/// Tick positions as fractions of the ceiling.
pub const AXIS_TICK_FRACTIONS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

/// Shared axis maximum (millions) for both sexes and all bins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ScaleCeiling(f64);

impl ScaleCeiling {
    pub fn new(max_val: f64) -> Result<Self> {
        validate_positive_finite("scale.max_val", max_val)?;
        Ok(Self(max_val))
    }

    pub fn for_archetype(archetype: CountryArchetype) -> Self {
        Self(archetype.default_scale_ceiling())
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 20.0,
            right: 40.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
    /// Central column reserved for the age labels.
    pub label_gutter: f64,
    /// Gap left above and below every bar.
    pub bar_inset: f64,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin: Margin::default(),
            label_gutter: 60.0,
            bar_inset: 1.0,
        }
    }
}

impl ChartDimensions {
    pub fn half_width(&self) -> f64 {
        ((self.width - self.margin.left - self.margin.right - self.label_gutter) / 2.0).max(0.0)
    }

    pub fn plot_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(0.0)
    }

    pub fn validate(&self) -> Result<()> {
        validate_positive_finite("chart.width", self.width)?;
        validate_positive_finite("chart.height", self.height)?;
        validate_non_negative_finite("chart.margin.top", self.margin.top)?;
        validate_non_negative_finite("chart.margin.right", self.margin.right)?;
        validate_non_negative_finite("chart.margin.bottom", self.margin.bottom)?;
        validate_non_negative_finite("chart.margin.left", self.margin.left)?;
        validate_non_negative_finite("chart.label_gutter", self.label_gutter)?;
        validate_non_negative_finite("chart.bar_inset", self.bar_inset)?;
        validate_positive_finite("chart.half_width", self.half_width())?;
        validate_positive_finite("chart.plot_height", self.plot_height())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarGeometry {
    pub age_range: &'static str,
    pub male_bar_length: f64,
    pub female_bar_length: f64,
    pub y_top: f64,
    pub y_height: f64,
    /// Vertical center, where the age label sits.
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTick {
    pub fraction: f64,
    pub value: f64,
    pub male_x: f64,
    pub female_x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PyramidLayout {
    pub half_width: f64,
    pub bar_height: f64,
    /// Male bars grow leftward from here.
    pub male_axis_x: f64,
    /// Female bars grow rightward from here.
    pub female_axis_x: f64,
    pub label_x: f64,
    pub bars: Vec<BarGeometry>,
    pub ticks: Vec<AxisTick>,
}

impl PyramidLayout {
    /// Left edge of the male bar at `index`.
    pub fn male_bar_x(&self, index: usize) -> Option<f64> {
        self.bars
            .get(index)
            .map(|bar| self.male_axis_x - bar.male_bar_length)
    }
}

/// Maps bins onto pixel space. Bin 0 is placed at the top.
pub fn layout(bins: &[AgeBin], scale: ScaleCeiling, chart: &ChartDimensions) -> PyramidLayout {
    let half_width = chart.half_width();
    let bar_height = if bins.is_empty() {
        0.0
    } else {
        chart.plot_height() / bins.len() as f64
    };
    let inset = chart.bar_inset.min(bar_height / 2.0);
    let male_axis_x = chart.margin.left + half_width;
    let female_axis_x = chart.width - chart.margin.right - half_width;
    let to_length = |value: f64| value / scale.value() * half_width;

    let bars = bins
        .iter()
        .enumerate()
        .map(|(index, bin)| {
            let slot_top = chart.margin.top + index as f64 * bar_height;
            BarGeometry {
                age_range: bin.age_range,
                male_bar_length: to_length(bin.male),
                female_bar_length: to_length(bin.female),
                y_top: slot_top + inset,
                y_height: bar_height - 2.0 * inset,
                label_y: slot_top + bar_height / 2.0,
            }
        })
        .collect();

    let ticks = AXIS_TICK_FRACTIONS
        .iter()
        .map(|&fraction| {
            let value = fraction * scale.value();
            let offset = to_length(value);
            AxisTick {
                fraction,
                value,
                male_x: male_axis_x - offset,
                female_x: female_axis_x + offset,
                label: format!("{:.0}M", value),
            }
        })
        .collect();

    PyramidLayout {
        half_width,
        bar_height,
        male_axis_x,
        female_axis_x,
        label_x: chart.width / 2.0,
        bars,
        ticks,
    }
}
