//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error is rendered as the same JSON envelope:
//! `{"status": 404, "error": "Not Found", "message": "..."}`.

use std::any::Any;

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  UnsupportedMediaType(String),

  #[error("{0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a store failure.
  pub fn internal(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Internal(Box::new(e))
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
      ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<promotions_core::Error> for ApiError {
  fn from(e: promotions_core::Error) -> Self {
    match e {
      promotions_core::Error::Validation(msg) => ApiError::Validation(msg),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if let ApiError::Internal(e) = &self {
      tracing::error!(error = %e, "internal server error");
    }
    envelope(status, self.to_string())
  }
}

/// Render the JSON error envelope for `status`.
pub fn envelope(status: StatusCode, message: String) -> Response {
  let body = json!({
    "status":  status.as_u16(),
    "error":   status.canonical_reason().unwrap_or("Unknown Error"),
    "message": message,
  });
  (status, Json(body)).into_response()
}

/// Panic handler for [`tower_http::catch_panic::CatchPanicLayer`].
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  let message = if let Some(s) = err.downcast_ref::<String>() {
    s.clone()
  } else if let Some(s) = err.downcast_ref::<&str>() {
    (*s).to_owned()
  } else {
    "handler panicked".to_owned()
  };
  tracing::error!(%message, "handler panicked");
  envelope(StatusCode::INTERNAL_SERVER_ERROR, message)
}
