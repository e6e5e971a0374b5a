use crate::core::predictor::CategoryPredictor;
use crate::core::{AggregateDocument, Birthdate, Category, CategorySelector, TextProvider};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How the five provider calls of an "all" request are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Concurrent,
    Sequential,
}

pub struct Orchestrator<P: TextProvider> {
    predictor: CategoryPredictor<P>,
    mode: ExecutionMode,
}

impl<P: TextProvider> Orchestrator<P> {
    pub fn new(provider: P) -> Self {
        Self::with_mode(provider, ExecutionMode::default())
    }

    pub fn with_mode(provider: P, mode: ExecutionMode) -> Self {
        Self {
            predictor: CategoryPredictor::new(provider),
            mode,
        }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn predictor(&self) -> &CategoryPredictor<P> {
        &self.predictor
    }

    pub async fn run(&self, birthdate: &Birthdate, selector: CategorySelector) -> AggregateDocument {
        match selector {
            CategorySelector::One(category) => {
                let result = self.predictor.predict(birthdate, category).await;
                AggregateDocument::new(*birthdate, selector, vec![result])
            }
            CategorySelector::All => self.predict_all(birthdate).await,
        }
    }

    /// Predicts every category and assembles them in canonical order.
    /// All five slots are always populated, failed or not.
    pub async fn predict_all(&self, birthdate: &Birthdate) -> AggregateDocument {
        tracing::info!(
            "🚀 Starting all predictions for {} ({:?} mode)",
            birthdate,
            self.mode
        );
        let start = Instant::now();

        let results = match self.mode {
            // join_all 依輸入順序回傳，與完成先後無關
            ExecutionMode::Concurrent => {
                join_all(
                    Category::ALL
                        .iter()
                        .map(|category| self.predictor.predict(birthdate, *category)),
                )
                .await
            }
            ExecutionMode::Sequential => {
                let mut results = Vec::with_capacity(Category::ALL.len());
                for category in Category::ALL {
                    results.push(self.predictor.predict(birthdate, category).await);
                }
                results
            }
        };

        let document = AggregateDocument::new(*birthdate, CategorySelector::All, results);
        let failures = document.failure_count();
        if failures > 0 {
            tracing::warn!(
                "⚠️ {} of {} predictions failed",
                failures,
                document.len()
            );
        }
        tracing::info!(
            "📊 All predictions assembled in {:.1}s",
            start.elapsed().as_secs_f64()
        );

        document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Prompt;
    use crate::utils::error::{ForecastError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replies with the category name; weekly is the slowest to answer.
    struct SlowWeeklyProvider {
        completed: Mutex<Vec<Category>>,
    }

    #[async_trait]
    impl TextProvider for SlowWeeklyProvider {
        async fn generate(&self, prompt: &Prompt) -> Result<String> {
            let delay = match prompt.category {
                Category::Weekly => 150,
                Category::Monthly => 60,
                Category::Yearly => 30,
                Category::Personality => 10,
                Category::Recommendations => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            self.completed.lock().unwrap().push(prompt.category);
            Ok(format!("reply for {}", prompt.category))
        }
    }

    struct DownProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextProvider for DownProvider {
        async fn generate(&self, _prompt: &Prompt) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ForecastError::TimeoutError { seconds: 1 })
        }
    }

    fn birthdate() -> Birthdate {
        Birthdate::parse("15-08-1995").unwrap()
    }

    #[tokio::test]
    async fn test_concurrent_results_keep_canonical_order() {
        let provider = Arc::new(SlowWeeklyProvider {
            completed: Mutex::new(Vec::new()),
        });
        let orchestrator = Orchestrator::with_mode(provider.clone(), ExecutionMode::Concurrent);

        let document = orchestrator.predict_all(&birthdate()).await;

        assert_eq!(document.categories(), Category::ALL.to_vec());
        for (result, category) in document.results.iter().zip(Category::ALL) {
            assert_eq!(result.display_text(), format!("reply for {}", category));
        }

        // 完成順序與文件順序不同
        let completed = provider.completed.lock().unwrap();
        assert_eq!(completed.len(), 5);
        assert_eq!(completed.last(), Some(&Category::Weekly));
    }

    #[tokio::test]
    async fn test_sequential_mode_same_order() {
        let provider = SlowWeeklyProvider {
            completed: Mutex::new(Vec::new()),
        };
        let orchestrator = Orchestrator::with_mode(provider, ExecutionMode::Sequential);

        let document = orchestrator.predict_all(&birthdate()).await;

        assert_eq!(document.categories(), Category::ALL.to_vec());
        let completed = orchestrator.predictor().provider().completed.lock().unwrap();
        assert_eq!(*completed, Category::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_all_failing_still_fills_every_slot() {
        let provider = Arc::new(DownProvider {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(provider.clone());

        let document = orchestrator.run(&birthdate(), CategorySelector::All).await;

        assert_eq!(document.len(), 5);
        assert_eq!(document.failure_count(), 5);
        assert_eq!(document.categories(), Category::ALL.to_vec());
        for result in &document.results {
            assert!(result.display_text().contains("Error"));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_single_selector_makes_one_call() {
        let provider = Arc::new(DownProvider {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = Orchestrator::new(provider.clone());

        let document = orchestrator
            .run(&birthdate(), CategorySelector::One(Category::Recommendations))
            .await;

        assert_eq!(document.len(), 1);
        assert_eq!(document.categories(), vec![Category::Recommendations]);
        assert_eq!(document.title, Category::Recommendations.title());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}
