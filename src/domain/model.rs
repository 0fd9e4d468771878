use serde::{Deserialize, Serialize};
use std::fmt;

/// Labels for the 21 five-year cohorts, youngest first.
pub const AGE_RANGES: [&str; 21] = [
    "0-4", "5-9", "10-14", "15-19", "20-24", "25-29", "30-34", "35-39", "40-44", "45-49", "50-54",
    "55-59", "60-64", "65-69", "70-74", "75-79", "80-84", "85-89", "90-94", "95-99", "100+",
];

pub const BIN_COUNT: usize = AGE_RANGES.len();

/// Width of one cohort in years.
pub const BIN_WIDTH_YEARS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum CountryArchetype {
    Developed,
    Developing,
}

impl CountryArchetype {
    pub const ALL: [CountryArchetype; 2] =
        [CountryArchetype::Developed, CountryArchetype::Developing];

    pub fn label(&self) -> &'static str {
        match self {
            CountryArchetype::Developed => "Developed (Land A)",
            CountryArchetype::Developing => "Developing (Land B)",
        }
    }

    /// Axis ceiling (millions) that keeps the pyramid scale fixed while the year moves.
    pub fn default_scale_ceiling(&self) -> f64 {
        match self {
            CountryArchetype::Developed => 60.0,
            CountryArchetype::Developing => 120.0,
        }
    }
}

impl fmt::Display for CountryArchetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One five-year cohort; magnitudes are in millions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBin {
    pub age_range: &'static str,
    pub male: f64,
    pub female: f64,
}

impl AgeBin {
    pub fn total(&self) -> f64 {
        self.male + self.female
    }

    /// Lower age bound parsed from the label, e.g. `"15-19"` -> 15, `"100+"` -> 100.
    pub fn lower_age(&self) -> Option<u32> {
        self.age_range
            .split(|c| c == '-' || c == '+')
            .next()
            .and_then(|s| s.trim().parse().ok())
    }
}

/// Year-dependent quantities shared by every bin of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransitionFactors {
    pub birth_rate_factor: f64,
    pub survival_growth: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub year: i32,
    pub archetype: CountryArchetype,
    pub factors: TransitionFactors,
    pub bins: Vec<AgeBin>,
}

/// Aggregates in millions, both sexes combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PopulationSummary {
    pub youth: f64,
    pub working_age: f64,
    pub elderly: f64,
}

impl PopulationSummary {
    pub fn total(&self) -> f64 {
        self.youth + self.working_age + self.elderly
    }

    /// Dependents (youth + elderly) per working-age person.
    pub fn dependency_ratio(&self) -> f64 {
        if self.working_age > 0.0 {
            (self.youth + self.elderly) / self.working_age
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub title: String,
    pub content: String,
    #[serde(rename = "keyStats")]
    pub key_stats: Vec<String>,
}

/// Result of an insight fetch. Always carries something displayable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "insight", rename_all = "lowercase")]
pub enum InsightOutcome {
    Generated(Insight),
    Fallback(Insight),
}

impl InsightOutcome {
    pub fn insight(&self) -> &Insight {
        match self {
            InsightOutcome::Generated(insight) | InsightOutcome::Fallback(insight) => insight,
        }
    }

    pub fn into_insight(self) -> Insight {
        match self {
            InsightOutcome::Generated(insight) | InsightOutcome::Fallback(insight) => insight,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, InsightOutcome::Fallback(_))
    }
}
