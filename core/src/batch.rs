//! Item-level error extraction for batch import responses.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{BatchError, BatchItemResult};

/// Collect the rejected items of a batch response.
///
/// `response` is the decoded provider body; its `result` must be an array of
/// per-item records. For each item with at least one error, yields its
/// 1-based position, offer id, and the code and message of its *first*
/// error. Items without errors are skipped; input order is preserved.
pub fn extract_batch_errors(response: &Value) -> Result<Vec<BatchError>, ApiError> {
    let result = response.get("result").ok_or_else(|| {
        ApiError::UnexpectedResponseShape("batch response has no `result` field".to_string())
    })?;
    errors_in_result(result)
}

pub(crate) fn errors_in_result(result: &Value) -> Result<Vec<BatchError>, ApiError> {
    if !result.is_array() {
        return Err(ApiError::UnexpectedResponseShape(
            "batch `result` is not an array".to_string(),
        ));
    }
    let items = Vec::<BatchItemResult>::deserialize(result).map_err(|e| {
        ApiError::UnexpectedResponseShape(format!("malformed batch item: {e}"))
    })?;

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let first = item.errors.into_iter().next()?;
            Some(BatchError {
                position: i + 1,
                offer_id: item.offer_id,
                code: first.code,
                message: first.message,
            })
        })
        .collect())
}
