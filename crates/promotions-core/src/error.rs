//! Error types for `promotions-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Client input was malformed or incomplete.
  #[error("{0}")]
  Validation(String),
}

impl Error {
  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
