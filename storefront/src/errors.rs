// storefront/src/errors.rs

use crate::db::StoreError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use storefront_flow::FlowError;
use thiserror::Error;

/// One rejected field of a request payload, e.g. `products[0].quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: String,
  pub message: String,
}

/// Every field error found in a payload, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
    self.0.push(FieldError {
      field: field.into(),
      message: message.into(),
    });
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn errors(&self) -> &[FieldError] {
    &self.0
  }

  /// `Ok(value)` when nothing was recorded.
  pub fn into_result<T>(self, value: T) -> std::result::Result<T, Self> {
    if self.is_empty() {
      Ok(value)
    } else {
      Err(self)
    }
  }
}

impl fmt::Display for ValidationErrors {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let joined = self
      .0
      .iter()
      .map(|e| format!("{}: {}", e.field, e.message))
      .collect::<Vec<_>>()
      .join("; ");
    f.write_str(&joined)
  }
}

#[derive(Debug, Error)]
pub enum AppError {
  /// A business rule rejected the request before anything was written.
  #[error("{0}")]
  Validation(String),

  #[error("{0}")]
  InvalidPayload(ValidationErrors),

  #[error("{0}")]
  NotFound(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Storage Error: {0}")]
  Store(#[from] StoreError),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<ValidationErrors> for AppError {
  fn from(errors: ValidationErrors) -> Self {
    AppError::InvalidPayload(errors)
  }
}

impl From<sqlx::Error> for AppError {
  fn from(err: sqlx::Error) -> Self {
    AppError::Store(StoreError::Sqlx(err))
  }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
  status_code: u16,
  error: &'a str,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<&'a [FieldError]>,
}

impl AppError {
  /// Text safe to show to API clients. Internal failures are not described.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) => m.clone(),
      AppError::InvalidPayload(errors) => format!("Validation failed: {}", errors),
      AppError::Store(StoreError::StockDepleted { .. }) | AppError::Store(StoreError::UnknownProduct { .. }) => {
        "The order could not be placed. No changes were made.".to_string()
      }
      AppError::Store(_) => "Database operation failed.".to_string(),
      AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => "Internal server error".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) | AppError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Store(StoreError::StockDepleted { .. }) | AppError::Store(StoreError::UnknownProduct { .. }) => {
        StatusCode::SERVICE_UNAVAILABLE
      }
      AppError::Store(_) | AppError::Config(_) | AppError::Workflow { .. } | AppError::Internal(_) => {
        StatusCode::INTERNAL_SERVER_ERROR
      }
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Request rejected");
    }

    let details = match self {
      AppError::InvalidPayload(errors) => Some(errors.errors()),
      _ => None,
    };
    HttpResponse::build(status).json(ErrorBody {
      status_code: status.as_u16(),
      error: status.canonical_reason().unwrap_or("Error"),
      message: self.public_message(),
      details,
    })
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
