//! Core types and trait definitions for the SINDESCOL union registry.
//!
//! No HTTP or database dependencies live here; every other crate depends on
//! this one.

pub mod afiliado;
pub mod blob;
pub mod catalogo;
pub mod cuota;
pub mod error;
pub mod store;
pub mod usuario;

pub use error::{Error, ErrorKind, Result, StoreError};
