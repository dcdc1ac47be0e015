//! Error type for `folketing-store-sqlite`.

use folketing_core::Position;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown position in row: {0:?}")]
  UnknownPosition(String),

  /// The unique (name, position) index rejected a write.
  #[error("duplicate name for position {0}")]
  Duplicate(Position),
}

impl From<Error> for folketing_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Duplicate(position) => folketing_core::Error::Conflict { position },
      other => folketing_core::Error::store(other),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
