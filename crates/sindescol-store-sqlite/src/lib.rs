//! SQLite backend for the SINDESCOL union registry.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Multi-statement writes run inside a
//! single closure on that thread, within one [`rusqlite::Transaction`].

mod afiliados;
mod catalogo;
mod cuotas;
mod encode;
mod schema;
mod store;
mod usuarios;

pub mod error;

pub use error::{Error, Result};
pub use store::{DEFAULT_TIMEOUT, SqliteStore};

#[cfg(test)]
mod tests;
