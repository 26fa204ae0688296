pub mod db;
pub mod holders;
pub mod metrics;
pub mod models;
pub mod seed;
pub mod stocks;

pub use db::HeatDb;
pub use holders::HolderStore;
pub use metrics::MetricStore;
pub use models::*;
pub use seed::seed;
pub use stocks::StockStore;
