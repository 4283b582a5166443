//! Error taxonomy for the generation → grading → progress pipeline.
//!
//! Errors split along the trust boundaries:
//!   - `Gateway`    : the inference transport failed (HTTP error / non-2xx)
//!   - `Parse`      : the model replied, but the payload is not the contract
//!   - `Validation` : the caller supplied incomplete input
//!   - `NotFound` / `DuplicateEntry` : store-level outcomes
//!   - `Generation` / `Grading` : call-site wrappers carrying the cause
//!
//! Nothing here is retried; every failure aborts the enclosing operation and
//! is surfaced to the client as a JSON body with a matching status code.

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;
use tracing::{error, warn};

use crate::protocol::ErrorOut;

/// Malformed or incomplete model output.
#[derive(Debug, Error)]
pub enum ParseError {
  #[error("model reply is not valid JSON: {0}")]
  MalformedJson(#[from] serde_json::Error),
  #[error("missing or empty field `{0}` in model reply")]
  MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum AppError {
  #[error("inference service unavailable: {0}")]
  Gateway(String),
  #[error(transparent)]
  Parse(#[from] ParseError),
  #[error("invalid request: {0}")]
  Validation(String),
  #[error("{0} not found")]
  NotFound(&'static str),
  #[error("this problem was already recorded for the user")]
  DuplicateEntry,
  #[error("missing or invalid user identity")]
  Unauthorized,
  #[error("could not generate the exercise: {0}")]
  Generation(#[source] Box<AppError>),
  #[error("could not validate the answer: {0}")]
  Grading(#[source] Box<AppError>),
}

impl AppError {
  /// Wrap a gateway/parse failure as a generation failure.
  pub fn generation(cause: AppError) -> Self { AppError::Generation(Box::new(cause)) }

  /// Wrap a gateway/parse failure as a grading failure.
  pub fn grading(cause: AppError) -> Self { AppError::Grading(Box::new(cause)) }

  fn status(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Unauthorized => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::DuplicateEntry => StatusCode::CONFLICT,
      AppError::Gateway(_)
      | AppError::Parse(_)
      | AppError::Generation(_)
      | AppError::Grading(_) => StatusCode::BAD_GATEWAY,
    }
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let status = self.status();
    // Upstream failures carry their cause in the Display chain; client input
    // problems only warrant a warning.
    if status.is_server_error() {
      error!(target: "codedrill_backend", %status, error = %self, "request failed");
    } else {
      warn!(target: "codedrill_backend", %status, error = %self, "request rejected");
    }
    (status, Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn statuses_match_the_taxonomy() {
    assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
    assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::NotFound("exercise").status(), StatusCode::NOT_FOUND);
    assert_eq!(AppError::DuplicateEntry.status(), StatusCode::CONFLICT);
    assert_eq!(AppError::Gateway("down".into()).status(), StatusCode::BAD_GATEWAY);
  }

  #[test]
  fn wrappers_keep_the_cause_visible() {
    let e = AppError::generation(AppError::Gateway("connection refused".into()));
    let msg = e.to_string();
    assert!(msg.contains("could not generate"));
    assert!(msg.contains("connection refused"));
  }

  #[test]
  fn missing_field_names_the_field() {
    let e = ParseError::MissingField("description");
    assert!(e.to_string().contains("`description`"));
  }
}
