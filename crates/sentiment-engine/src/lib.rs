pub mod analyzer;
pub mod model;

pub use analyzer::SentimentAnalyzer;
pub use model::OpenAiModel;
