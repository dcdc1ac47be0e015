//! Error types for `folketing-core`.

use serde::Serialize;
use thiserror::Error;

use crate::person::Position;

/// A single violated field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  /// The JSON field name, e.g. `"startDate"`.
  pub field:   &'static str,
  pub message: String,
}

impl FieldError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self { field, message: message.into() }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// One or more fields failed validation. Never empty.
  #[error("validation failed: {}", join_messages(.0))]
  Validation(Vec<FieldError>),

  #[error("{0}")]
  InvalidIdentifier(String),

  #[error("{0}")]
  NotFound(String),

  /// Another record already holds this name for the same position.
  #[error("A {} with that name already exists", .position.as_str().to_lowercase())]
  Conflict { position: Position },

  #[error("{0}")]
  InvalidArgument(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn person_not_found() -> Self {
    Self::NotFound("No person found with that ID".to_owned())
  }

  pub fn invalid_id() -> Self {
    Self::InvalidIdentifier("Invalid ID format".to_owned())
  }

  /// Wrap any backend error that has no more specific meaning.
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

fn join_messages(errors: &[FieldError]) -> String {
  errors
    .iter()
    .map(|e| e.message.as_str())
    .collect::<Vec<_>>()
    .join(", ")
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
