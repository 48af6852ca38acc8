use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::error::AppResult;

pub mod gemini;

pub use gemini::GeminiClient;

/// Substituted whenever no generated explanation is available for an item
pub const FALLBACK_EXPLANATION: &str = "This would be a great addition to your collection!";

/// Boundary to the external text-generation service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GenerativeClient: Send + Sync {
    /// Produces free-form text for a prompt
    async fn complete(&self, prompt: &str) -> AppResult<String>;
}

/// How explanations are requested from the generation service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationMode {
    /// One call covering the whole recommendation batch
    #[default]
    Batch,
    /// One call per recommended item
    PerItem,
}

/// Attaches explanation text to already-chosen recommendations
///
/// Recommendations are computed and ordered before this runs; a failing,
/// slow, or malformed generation response degrades the affected items to
/// [`FALLBACK_EXPLANATION`] and never drops them.
pub struct Augmenter {
    client: Arc<dyn GenerativeClient>,
    mode: ExplanationMode,
}

impl Augmenter {
    pub fn new(client: Arc<dyn GenerativeClient>, mode: ExplanationMode) -> Self {
        Self { client, mode }
    }

    /// Returns one explanation per pick, aligned by index
    pub async fn augment(&self, history: &[String], picks: &[String]) -> Vec<String> {
        if picks.is_empty() {
            return Vec::new();
        }

        match self.mode {
            ExplanationMode::Batch => self.augment_batch(history, picks).await,
            ExplanationMode::PerItem => self.augment_per_item(history, picks).await,
        }
    }

    async fn augment_batch(&self, history: &[String], picks: &[String]) -> Vec<String> {
        let prompt = batch_prompt(history, picks);

        let explanations = match self.client.complete(&prompt).await {
            Ok(text) => parse_explanation_lines(&text),
            Err(e) => {
                tracing::warn!(error = %e, "Explanation call failed, using fallback text");
                HashMap::new()
            }
        };

        picks
            .iter()
            .map(|name| {
                explanations
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK_EXPLANATION.to_string())
            })
            .collect()
    }

    async fn augment_per_item(&self, history: &[String], picks: &[String]) -> Vec<String> {
        let mut explanations = Vec::with_capacity(picks.len());

        for name in picks {
            let explanation = match self.client.complete(&item_prompt(history, name)).await {
                Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
                Ok(_) => FALLBACK_EXPLANATION.to_string(),
                Err(e) => {
                    tracing::warn!(
                        product_name = %name,
                        error = %e,
                        "Explanation call failed, using fallback text"
                    );
                    FALLBACK_EXPLANATION.to_string()
                }
            };
            explanations.push(explanation);
        }

        explanations
    }
}

fn history_text(history: &[String]) -> String {
    if history.is_empty() {
        "nothing yet".to_string()
    } else {
        history.join(", ")
    }
}

fn batch_prompt(history: &[String], picks: &[String]) -> String {
    format!(
        "A user has previously viewed: {}. We are recommending these products: {}. \
         For each product, in one short, exciting sentence, explain why, starting with \
         'Because you liked...'. Answer with one line per product, formatted as \
         'Product Name: explanation'.",
        history_text(history),
        picks.join(", ")
    )
}

fn item_prompt(history: &[String], pick: &str) -> String {
    format!(
        "A user has previously viewed: {}. We are recommending '{}'. In one short, \
         exciting sentence, explain why, starting with 'Because you liked...'",
        history_text(history),
        pick
    )
}

/// Parses `Name: explanation` lines, splitting on the first colon
///
/// Lines without a colon, or with an empty name or explanation, are ignored.
fn parse_explanation_lines(text: &str) -> HashMap<String, String> {
    let mut explanations = HashMap::new();

    for line in text.lines() {
        if let Some((name, explanation)) = line.split_once(':') {
            let name = name.trim();
            let explanation = explanation.trim();
            if !name.is_empty() && !explanation.is_empty() {
                explanations.insert(name.to_string(), explanation.to_string());
            }
        }
    }

    explanations
}
