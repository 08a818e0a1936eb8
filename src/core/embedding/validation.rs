//! Input validation for embedding requests

use crate::utils::error::{OrchestratorError, Result};

/// Reject an empty batch, blank texts and texts over `max_length` characters
///
/// Errors name the first offending index.
pub fn validate_texts(texts: &[String], max_length: usize) -> Result<()> {
    if texts.is_empty() {
        return Err(OrchestratorError::validation("No texts provided for embedding"));
    }

    for (index, text) in texts.iter().enumerate() {
        if text.trim().is_empty() {
            return Err(OrchestratorError::validation(format!(
                "Text at index {} is empty",
                index
            )));
        }

        let length = text.chars().count();
        if length > max_length {
            return Err(OrchestratorError::validation(format!(
                "Text at index {} exceeds maximum length of {} characters ({})",
                index, max_length, length
            )));
        }
    }

    Ok(())
}

pub fn validate_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(OrchestratorError::validation(
            "Batch size must be greater than 0",
        ));
    }
    Ok(())
}
