pub mod orchestrator;
pub mod predictor;
pub mod prompt;

pub use crate::domain::model::{
    AggregateDocument, Birthdate, Category, CategorySelector, PredictionOutcome, PredictionResult,
    Prompt,
};
pub use crate::domain::ports::TextProvider;
pub use crate::utils::error::Result;
