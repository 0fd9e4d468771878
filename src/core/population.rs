//! Parametric demographic-transition model.
//!
//! Every snapshot is synthesized from smooth closed-form curves so that
//! moving the year produces continuous changes in every bin.

use crate::domain::model::{
    AgeBin, CountryArchetype, Snapshot, TransitionFactors, AGE_RANGES, BIN_WIDTH_YEARS,
};

const BASE_YEAR: f64 = 1950.0;

// Developed: a Gaussian bulge that ages upward and widens.
const DEVELOPED_AMPLITUDE: f64 = 100.0;
const DEVELOPED_PEAK_START: f64 = 20.0;
const DEVELOPED_PEAK_MAX: f64 = 60.0;
const DEVELOPED_SPREAD_START: f64 = 25.0;
const OLD_AGE_THRESHOLD: f64 = 80.0;
const OLD_AGE_TAPER_FLOOR: f64 = 0.1;
const YOUTH_SHRINK_FLOOR: f64 = 0.4;

// Developing: exponential decay with a drifting youth bump.
const DEVELOPING_AMPLITUDE: f64 = 150.0;
const DEVELOPING_SLOPE_START: f64 = 0.05;
const DEVELOPING_SLOPE_FLOOR: f64 = 0.015;
const YOUTH_BULGE_START_YEAR: f64 = 1970.0;
const YOUTH_BULGE_REACH: f64 = 20.0;
const YOUTH_BULGE_HEIGHT: f64 = 0.2;

const VARIANCE_AMPLITUDE: f64 = 0.02;
const MALE_SHARE: f64 = 0.5;
const FEMALE_SHARE: f64 = 0.51;
const FEMALE_LONGEVITY_AGE_SCALE: f64 = 500.0;
const MIN_COHORT_MILLIONS: f64 = 1.0;

/// Synthesizes the 21-bin age/sex distribution for `year`.
///
/// Total for every integer year; outside 1950..=2100 the curves extrapolate
/// without any realism guarantee. Identical inputs give bit-identical output.
pub fn generate(year: i32, archetype: CountryArchetype) -> Snapshot {
    let factors = transition_factors(year, archetype);

    let bins = AGE_RANGES
        .iter()
        .enumerate()
        .map(|(index, &age_range)| {
            let age = age_value(index);
            let base_pop = match archetype {
                CountryArchetype::Developed => developed_base(year, age, &factors),
                CountryArchetype::Developing => developing_base(year, age),
            };
            let (male, female) = split_by_sex(base_pop, variance(year, index), age);

            AgeBin {
                age_range,
                male: round2(male.max(MIN_COHORT_MILLIONS)),
                female: round2(female.max(MIN_COHORT_MILLIONS)),
            }
        })
        .collect();

    Snapshot {
        year,
        archetype,
        factors,
        bins,
    }
}

pub fn transition_factors(year: i32, archetype: CountryArchetype) -> TransitionFactors {
    let elapsed = elapsed_years(year);
    let birth_rate_factor = match archetype {
        CountryArchetype::Developed => (1.0 - elapsed / 120.0).max(0.3),
        CountryArchetype::Developing => (1.5 - elapsed / 150.0).max(0.4),
    };

    TransitionFactors {
        birth_rate_factor,
        // unbounded above; only feeds the old-age taper
        survival_growth: elapsed / 150.0,
    }
}

fn developed_base(year: i32, age: f64, factors: &TransitionFactors) -> f64 {
    let elapsed = elapsed_years(year);
    let peak_age = (DEVELOPED_PEAK_START + elapsed / 2.0).min(DEVELOPED_PEAK_MAX);
    let spread = DEVELOPED_SPREAD_START + elapsed / 10.0;

    let mut base = DEVELOPED_AMPLITUDE * gaussian(age, peak_age, spread);

    if age > OLD_AGE_THRESHOLD {
        let horizon = 40.0 + factors.survival_growth * 20.0;
        base *= (1.0 - (age - OLD_AGE_THRESHOLD) / horizon).max(OLD_AGE_TAPER_FLOOR);
    }

    if age < peak_age {
        let shrink = (1.0 - elapsed / 200.0).max(YOUTH_SHRINK_FLOOR);
        base *= (0.7 + 0.3 * (age / peak_age)) * shrink;
    }

    base
}

fn developing_base(year: i32, age: f64) -> f64 {
    let elapsed = elapsed_years(year);
    let slope = (DEVELOPING_SLOPE_START - elapsed / 4000.0).max(DEVELOPING_SLOPE_FLOOR);
    let mut base = DEVELOPING_AMPLITUDE * (-slope * age).exp();

    let bulge_pos = ((f64::from(year) - YOUTH_BULGE_START_YEAR) / 3.0).max(0.0);
    if age < bulge_pos + YOUTH_BULGE_REACH {
        base *= 1.0 + YOUTH_BULGE_HEIGHT * (-(age - bulge_pos).powi(2) / 100.0).exp();
    }

    base
}

/// Deterministic jitter in `[0.98, 1.02]`.
fn variance(year: i32, index: usize) -> f64 {
    1.0 + VARIANCE_AMPLITUDE * (f64::from(year) + index as f64).sin()
}

/// Unrounded, unfloored (male, female) magnitudes for one bin.
pub(crate) fn split_by_sex(base_pop: f64, variance: f64, age: f64) -> (f64, f64) {
    let male = base_pop * variance * MALE_SHARE;
    let female = base_pop * variance * FEMALE_SHARE * (1.0 + age / FEMALE_LONGEVITY_AGE_SCALE);
    (male, female)
}

fn gaussian(x: f64, center: f64, spread: f64) -> f64 {
    (-(x - center).powi(2) / (2.0 * spread.powi(2))).exp()
}

fn age_value(index: usize) -> f64 {
    f64::from(BIN_WIDTH_YEARS) * index as f64
}

fn elapsed_years(year: i32) -> f64 {
    f64::from(year) - BASE_YEAR
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
