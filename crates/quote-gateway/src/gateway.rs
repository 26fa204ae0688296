use heat_core::{GatewayQuote, Quote, QuoteSource, QuoteTier};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use crate::demo::DemoQuotes;

/// Quote resolver that walks the configured live sources in priority order
/// and then degrades through demo, stored and synthetic rungs. Resolution
/// never fails; the tier on the result records which rung answered.
pub struct QuoteGateway {
    sources: Vec<Arc<dyn QuoteSource>>,
    demo: DemoQuotes,
}

impl QuoteGateway {
    pub fn new(sources: Vec<Arc<dyn QuoteSource>>) -> Self {
        Self {
            sources,
            demo: DemoQuotes::new(),
        }
    }

    pub async fn get_quote(
        &self,
        symbol: &str,
        exchange: &str,
        stored: Option<&Quote>,
    ) -> GatewayQuote {
        for source in &self.sources {
            match source.fetch_quote(symbol, exchange).await {
                Ok(quote) if quote.price > Decimal::ZERO => {
                    tracing::debug!(symbol, source = source.name(), "live quote");
                    return graded(quote, QuoteTier::Live);
                }
                Ok(_) => {
                    tracing::debug!(symbol, source = source.name(), "discarding non-positive quote");
                }
                Err(err) => {
                    tracing::debug!(symbol, source = source.name(), error = %err, "quote source failed");
                }
            }
        }

        if let Some(quote) = self.demo.get(symbol) {
            tracing::debug!(symbol, "serving demo quote");
            return graded(quote, QuoteTier::Demo);
        }

        if let Some(stored) = stored {
            if stored.price > Decimal::ZERO {
                tracing::debug!(symbol, "serving last stored quote");
                return graded(stored.clone(), QuoteTier::Stored);
            }
        }

        tracing::warn!(symbol, "no quote available from any source, synthesizing");
        GatewayQuote {
            symbol: symbol.to_uppercase(),
            price: dec!(1000),
            previous_close: None,
            change_percent: Some(0.0),
            volume: Some(5_000_000),
            tier: QuoteTier::Synthetic,
        }
    }
}

fn graded(quote: Quote, tier: QuoteTier) -> GatewayQuote {
    GatewayQuote {
        symbol: quote.symbol,
        price: quote.price,
        previous_close: quote.previous_close,
        change_percent: quote.change_percent,
        volume: quote.volume,
        tier,
    }
}
