pub mod scoring;

#[cfg(test)]
mod scoring_tests;

pub use scoring::*;
