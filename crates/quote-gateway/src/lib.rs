pub mod alpha_vantage;
pub mod demo;
pub mod gateway;
pub mod yahoo;

pub use alpha_vantage::*;
pub use demo::*;
pub use gateway::*;
pub use yahoo::*;
