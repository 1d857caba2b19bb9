use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Ingredient not found: {0}")]
    IngredientNotFound(String),

    #[error("Ration not found: {0}")]
    RationNotFound(String),

    #[error("Ingredient {0} is not owned by the caller")]
    NotOwned(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, FeedError>;
