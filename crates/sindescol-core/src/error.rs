//! Error types for `sindescol-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("campo requerido: {0}")]
  MissingField(&'static str),

  #[error("{0}")]
  Validation(String),

  #[error("el campo {field} no contiene base64 válido")]
  InvalidBase64 {
    field:  &'static str,
    #[source]
    source: base64::DecodeError,
  },

  #[error("{0}")]
  Forbidden(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Coarse classification of a failure, shared by every backend so the HTTP
/// layer can pick a status code without knowing the concrete error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Validation,
  Forbidden,
  Conflict,
  Timeout,
  Internal,
}

/// Implemented by store error types.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> ErrorKind;
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::MissingField(_)
      | Error::Validation(_)
      | Error::InvalidBase64 { .. } => ErrorKind::Validation,
      Error::Forbidden(_) => ErrorKind::Forbidden,
    }
  }
}
