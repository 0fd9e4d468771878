pub mod explorer;
pub mod geometry;
pub mod population;
pub mod summary;
pub mod timeline;

pub use crate::domain::model::{AgeBin, CountryArchetype, Snapshot};
pub use crate::domain::ports::{InsightProvider, Storage};
pub use crate::utils::error::Result;
