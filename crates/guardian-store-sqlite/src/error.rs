//! Error type for `guardian-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A `UNIQUE` constraint on the named column was violated.
  #[error("duplicate value for unique column {0}")]
  DuplicateKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for guardian_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::DuplicateKey(field) => guardian_core::Error::DuplicateKey { field },
      other => guardian_core::Error::Store(Box::new(other)),
    }
  }
}
