use crate::{HeatError, NewsHeadline, Quote};
use async_trait::async_trait;

/// Trait for quote providers in the gateway's fallback chain
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    async fn fetch_quote(&self, symbol: &str, exchange: &str) -> Result<Quote, HeatError>;
}

/// Trait for headline providers
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_headlines(
        &self,
        symbol: &str,
        limit: usize,
    ) -> Result<Vec<NewsHeadline>, HeatError>;
}

/// Trait for the optional text-completion model behind the sentiment analyzer
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, HeatError>;
}
