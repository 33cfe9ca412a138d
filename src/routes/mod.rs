pub(crate) mod health;
pub(crate) mod portfolios;
pub(crate) mod scores;

use crate::errors::AppError;

pub(crate) fn validate_ticker_count(count: usize, max: usize) -> Result<(), AppError> {
    if count == 0 {
        return Err(AppError::Validation("At least one ticker is required".into()));
    }
    if count > max {
        return Err(AppError::Validation(format!(
            "Too many tickers: {} (maximum {})",
            count, max
        )));
    }
    Ok(())
}
