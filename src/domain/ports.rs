use crate::domain::model::{CountryArchetype, Insight, InsightOutcome};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Fallible access to a narrative text generator.
#[async_trait]
pub trait InsightClient: Send + Sync {
    async fn request_insight(&self, year: i32, archetype: CountryArchetype) -> Result<Insight>;
}

/// Narrative capability consumed by the explorer. Never fails: adapters
/// degrade to a static insight instead.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    async fn fetch_insight(&self, year: i32, archetype: CountryArchetype) -> InsightOutcome;
}

#[async_trait]
impl<T: InsightProvider + ?Sized> InsightProvider for Box<T> {
    async fn fetch_insight(&self, year: i32, archetype: CountryArchetype) -> InsightOutcome {
        (**self).fetch_insight(year, archetype).await
    }
}
