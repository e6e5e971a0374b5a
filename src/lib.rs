pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, OutputFormat};

pub use adapters::ChatCompletionsClient;
pub use config::{ProviderConfig, TomlConfig};
pub use crate::core::orchestrator::{ExecutionMode, Orchestrator};
pub use crate::core::predictor::CategoryPredictor;
pub use crate::core::prompt::build_prompt;
pub use domain::model::{
    AggregateDocument, Birthdate, Category, CategorySelector, PredictionOutcome, PredictionResult,
    Prompt,
};
pub use domain::ports::TextProvider;
pub use utils::error::{ForecastError, Result};
