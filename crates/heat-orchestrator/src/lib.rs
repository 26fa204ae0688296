pub mod market;
pub mod orchestrator;
pub mod pipeline;
pub mod summary;

pub use market::{MarketMovers, MarketSummary, MarketTrend, MoverEntry};
pub use orchestrator::{HeatOrchestrator, RefreshReport};
pub use pipeline::StockPipeline;
pub use summary::HeatSummary;
