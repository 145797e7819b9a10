use std::fmt;

/// Step-level error. Every variant carries a human-readable message that ends
/// up in the run report next to the step's label.
#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    DecodeError(String),
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::DecodeError(msg) => write!(f, "Decode error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<mongodb::bson::error::Error> for AppError {
    fn from(err: mongodb::bson::error::Error) -> Self {
        AppError::DecodeError(err.to_string())
    }
}
