//! Year-by-year summary rows for one archetype, as written by the `timeline` binary.

use crate::config::{MAX_YEAR, MIN_YEAR};
use crate::core::population::generate;
use crate::core::summary::summarize;
use crate::domain::model::CountryArchetype;
use crate::utils::error::{PopuvizError, Result};
use crate::utils::validation::validate_range;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub year: i32,
    pub archetype: CountryArchetype,
    pub youth: f64,
    pub working_age: f64,
    pub elderly: f64,
    pub total: f64,
    pub dependency_ratio: f64,
    pub birth_rate_factor: f64,
    pub survival_growth: f64,
    /// Label of the bin with the most people, both sexes combined.
    pub largest_cohort: &'static str,
}

pub fn row_for(year: i32, archetype: CountryArchetype) -> TimelineRow {
    let snapshot = generate(year, archetype);
    let summary = summarize(&snapshot.bins);
    let largest_cohort = snapshot
        .bins
        .iter()
        .max_by(|a, b| a.total().total_cmp(&b.total()))
        .map(|bin| bin.age_range)
        .unwrap_or("-");

    TimelineRow {
        year,
        archetype,
        youth: round_to(summary.youth, 1),
        working_age: round_to(summary.working_age, 1),
        elderly: round_to(summary.elderly, 1),
        total: round_to(summary.total(), 1),
        dependency_ratio: round_to(summary.dependency_ratio(), 3),
        birth_rate_factor: snapshot.factors.birth_rate_factor,
        survival_growth: snapshot.factors.survival_growth,
        largest_cohort,
    }
}

/// One row per year in `start..=end`, stepping by `step`. The end year is
/// only included when the step lands on it.
pub fn sweep(
    archetype: CountryArchetype,
    start: i32,
    end: i32,
    step: usize,
) -> Result<Vec<TimelineRow>> {
    validate_range("start", start, MIN_YEAR, MAX_YEAR)?;
    validate_range("end", end, MIN_YEAR, MAX_YEAR)?;
    if start > end {
        return Err(PopuvizError::InvalidConfigValueError {
            field: "start".to_string(),
            value: start.to_string(),
            reason: format!("start year is after end year {}", end),
        });
    }
    if step == 0 {
        return Err(PopuvizError::InvalidConfigValueError {
            field: "step".to_string(),
            value: step.to_string(),
            reason: "step must be at least 1".to_string(),
        });
    }

    let rows: Vec<TimelineRow> = (start..=end)
        .step_by(step)
        .map(|year| row_for(year, archetype))
        .collect();
    tracing::debug!("Swept {} years for {}", rows.len(), archetype);
    Ok(rows)
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
