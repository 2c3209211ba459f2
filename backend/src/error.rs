// =============================================================================
// Error types — analysis failures and their HTTP mapping
// =============================================================================
//
// Two caller-visible failure kinds:
//   - InvalidInput:   the payload is malformed or empty (client problem).
//   - AnalysisFailed: anything else that went wrong while computing
//                     (server problem).
//
// Insufficient history is NOT an error; indicators degrade to a fallback
// value instead (mean-of-available or NaN).
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failure of a single `analyze` request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),
}

impl AnalysisError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::AnalysisFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<IndicatorError> for AnalysisError {
    fn from(err: IndicatorError) -> Self {
        Self::AnalysisFailed(err.to_string())
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

/// Numeric failure inside an indicator computation.
///
/// These never describe "not enough data"; that case yields NaN.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndicatorError {
    #[error("{indicator} produced a non-finite value")]
    NonFinite { indicator: &'static str },

    #[error("close at index {index} is zero, return is undefined")]
    ZeroPrice { index: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let err = AnalysisError::invalid("empty series");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid input: empty series");
    }

    #[test]
    fn indicator_error_becomes_analysis_failed() {
        let err: AnalysisError = IndicatorError::ZeroPrice { index: 3 }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Analysis failed: close at index 3 is zero, return is undefined"
        );
    }
}
