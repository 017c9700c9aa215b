use thiserror::Error;

use crate::intake::schema::SchemaValidationError;

/// Application-level error type. Validation errors are rendered by the form
/// driver and never escape it; everything else bubbles up to `main`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Input validation failed: {0}")]
    Validation(#[from] SchemaValidationError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
