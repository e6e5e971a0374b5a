use crate::core::prompt::build_prompt;
use crate::core::{Birthdate, Category, PredictionResult, TextProvider};
use std::time::Instant;

pub struct CategoryPredictor<P: TextProvider> {
    provider: P,
}

impl<P: TextProvider> CategoryPredictor<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Runs one provider round trip for `category`. Provider errors are
    /// captured in the returned result and never propagate.
    pub async fn predict(&self, birthdate: &Birthdate, category: Category) -> PredictionResult {
        let prompt = build_prompt(birthdate, category);
        tracing::debug!(
            category = %category,
            prompt_chars = prompt.text.chars().count(),
            "Built prompt"
        );

        let start = Instant::now();
        match self.provider.generate(&prompt).await {
            Ok(text) => {
                tracing::info!(
                    "✅ {} prediction generated in {:.1}s ({} chars)",
                    category,
                    start.elapsed().as_secs_f64(),
                    text.chars().count()
                );
                PredictionResult::generated(category, text)
            }
            Err(e) => {
                tracing::warn!(
                    "⚠️ {} prediction failed after {:.1}s: {} (Category: {:?})",
                    category,
                    start.elapsed().as_secs_f64(),
                    e,
                    e.category()
                );
                PredictionResult::failed(category, e.to_string())
            }
        }
    }
}
