use heat_core::{CompletionModel, NewsHeadline, SentimentClassification, SentimentResult};
use serde::Deserialize;
use std::sync::Arc;

use crate::model::OpenAiModel;

/// Headline count cap for a single prompt
const MAX_PROMPT_HEADLINES: usize = 10;

#[derive(Debug, Deserialize)]
struct RawSentiment {
    score: Option<f64>,
    classification: Option<String>,
    reasoning: Option<String>,
}

/// Scores retail hype in news headlines through an optional completion
/// model. Every failure path degrades to the neutral default instead of
/// surfacing an error.
pub struct SentimentAnalyzer {
    model: Option<Arc<dyn CompletionModel>>,
}

impl SentimentAnalyzer {
    pub fn new(model: Option<Arc<dyn CompletionModel>>) -> Self {
        Self { model }
    }

    pub fn from_env() -> Self {
        let model =
            OpenAiModel::from_env().map(|model| Arc::new(model) as Arc<dyn CompletionModel>);
        if model.is_none() {
            tracing::debug!("no completion model configured, sentiment defaults to neutral");
        }
        Self::new(model)
    }

    pub async fn analyze(&self, symbol: &str, headlines: &[NewsHeadline]) -> SentimentResult {
        if headlines.is_empty() {
            return SentimentResult::neutral("No news available - using default neutral sentiment");
        }

        let Some(model) = &self.model else {
            return SentimentResult::neutral("AI not configured - using default neutral sentiment");
        };

        let prompt = build_prompt(symbol, headlines);
        match model.complete(&prompt).await {
            Ok(raw) => {
                tracing::debug!(symbol, response = %raw, "sentiment model response");
                parse_response(&raw).unwrap_or_else(|| {
                    tracing::warn!(symbol, response = %raw, "unparseable sentiment response");
                    SentimentResult::neutral("Parse failed, using default")
                })
            }
            Err(err) => {
                tracing::warn!(symbol, error = %err, "sentiment analysis failed");
                SentimentResult::neutral("AI analysis failed, using default")
            }
        }
    }
}

fn build_prompt(symbol: &str, headlines: &[NewsHeadline]) -> String {
    let joined = headlines
        .iter()
        .take(MAX_PROMPT_HEADLINES)
        .map(|headline| headline.title.as_str())
        .collect::<Vec<_>>()
        .join("\n- ");

    format!(
        "Analyze these headlines for {symbol}. On a scale of 0-100, how much retail 'FOMO' or emotional hype is present?\n\
         \n\
         Headlines:\n\
         - {joined}\n\
         \n\
         Consider:\n\
         - Words like \"soar\", \"surge\", \"explode\", \"must buy\", \"don't miss out\" indicate HIGH hype\n\
         - Words like \"cautious\", \"declines\", \"uncertain\", \"caution\" indicate LOW hype\n\
         - Viral/social media style language indicates retail FOMO\n\
         \n\
         Respond ONLY with a JSON object in this format:\n\
         {{\"score\": <number>, \"classification\": \"<HYPER|WARM|NEUTRAL|COOL>\", \"reasoning\": \"<brief explanation>\"}}\n\
         \n\
         Rules:\n\
         - score >= 70: HYPER (extreme retail FOMO, bubble territory)\n\
         - score >= 50: WARM (elevated hype)\n\
         - score >= 30: NEUTRAL (balanced coverage)\n\
         - score < 30: COOL (low interest, possibly negative sentiment)"
    )
}

/// Extracts the JSON object from a model reply that may wrap it in prose.
/// Returns None when no parseable object is present.
fn parse_response(raw: &str) -> Option<SentimentResult> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    let body: RawSentiment = serde_json::from_str(raw.get(start..=end)?).ok()?;

    let score = body.score.unwrap_or(50.0).clamp(0.0, 100.0);
    let classification = body
        .classification
        .as_deref()
        .and_then(SentimentClassification::from_str)
        .unwrap_or_else(|| SentimentClassification::from_score(score));

    Some(SentimentResult {
        score,
        classification,
        reasoning: body
            .reasoning
            .unwrap_or_else(|| "AI analyzed headlines".to_string()),
    })
}
