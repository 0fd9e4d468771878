use crate::domain::model::{AgeBin, PopulationSummary};

pub const WORKING_AGE_START: u32 = 15;
pub const ELDERLY_START: u32 = 65;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeBand {
    Youth,
    WorkingAge,
    Elderly,
}

impl AgeBand {
    /// Classifies a bin from its label rather than its position, so the
    /// buckets survive a change in bin count.
    pub fn classify(bin: &AgeBin) -> Option<Self> {
        let lower = bin.lower_age()?;
        Some(if lower < WORKING_AGE_START {
            AgeBand::Youth
        } else if lower < ELDERLY_START {
            AgeBand::WorkingAge
        } else {
            AgeBand::Elderly
        })
    }
}

pub fn summarize(bins: &[AgeBin]) -> PopulationSummary {
    bins.iter().fold(PopulationSummary::default(), |mut acc, bin| {
        match AgeBand::classify(bin) {
            Some(AgeBand::Youth) => acc.youth += bin.total(),
            Some(AgeBand::WorkingAge) => acc.working_age += bin.total(),
            Some(AgeBand::Elderly) => acc.elderly += bin.total(),
            None => tracing::warn!("Skipping bin with unparseable label '{}'", bin.age_range),
        }
        acc
    })
}
