pub mod health;
pub mod me;

use crate::error::AppError;

pub async fn fallback() -> AppError {
    AppError::not_found("Route not found")
}
