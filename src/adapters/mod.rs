// Adapters layer: concrete implementations for external systems (insight http, storage, export).

pub mod export;
pub mod insight;
pub mod storage;
