//! Error type for `sindescol-store-sqlite`.

use std::time::Duration;

use sindescol_core::{ErrorKind, StoreError, cuota::Mes};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Core(#[from] sindescol_core::Error),

  #[error("database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("database connection error: {0}")]
  Connection(tokio_rusqlite::Error),

  #[error("database call exceeded {0:?}")]
  Timeout(Duration),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unexpected stored value: {0}")]
  Decode(String),

  #[error("Afiliado no encontrado: {0}")]
  AfiliadoNotFound(String),

  #[error("{0} no encontrado")]
  NotFound(String),

  #[error("ya existe una cuota de {mes} {anio} para el afiliado {cedula}")]
  CuotaDuplicada {
    cedula: String,
    mes:    Mes,
    anio:   i32,
  },

  #[error("{0}")]
  Forbidden(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether `e` is SQLite refusing a write because of a UNIQUE, FOREIGN KEY,
/// NOT NULL or CHECK constraint.
pub fn is_constraint(e: &rusqlite::Error) -> bool {
  matches!(
    e,
    rusqlite::Error::SqliteFailure(f, _) if f.code == rusqlite::ErrorCode::ConstraintViolation
  )
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    match e {
      tokio_rusqlite::Error::Rusqlite(e) => Error::Sqlite(e),
      // Errors raised inside a `call` closure travel boxed; unwrap them so
      // callers can still match on the variant.
      tokio_rusqlite::Error::Other(inner) => match inner.downcast::<Error>() {
        Ok(e) => *e,
        Err(other) => Error::Connection(tokio_rusqlite::Error::Other(other)),
      },
      other => Error::Connection(other),
    }
  }
}

impl StoreError for Error {
  fn kind(&self) -> ErrorKind {
    match self {
      Error::Core(e) => e.kind(),
      Error::Sqlite(e) if is_constraint(e) => ErrorKind::Conflict,
      Error::CuotaDuplicada { .. } => ErrorKind::Conflict,
      Error::AfiliadoNotFound(_) | Error::NotFound(_) => ErrorKind::NotFound,
      Error::Forbidden(_) => ErrorKind::Forbidden,
      Error::Timeout(_) => ErrorKind::Timeout,
      Error::Sqlite(_)
      | Error::Connection(_)
      | Error::DateParse(_)
      | Error::Decode(_) => ErrorKind::Internal,
    }
  }
}
