//! Error types for `guardian-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("missing required field: {0}")]
  MissingRequiredField(&'static str),

  /// The raw input could not be parsed, or parsed to an undialable number.
  #[error("{0}")]
  InvalidPhoneNumber(String),

  #[error("unknown region code: {0:?}")]
  UnknownRegion(String),

  /// A uniqueness constraint was violated by the store.
  #[error("a parent with this {field} already exists")]
  DuplicateKey { field: String },

  #[error("credential error: {0}")]
  Credential(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
