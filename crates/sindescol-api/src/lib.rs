//! JSON REST API for the SINDESCOL union registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`sindescol_core::store::MembershipStore`]. Every route requires HTTP
//! Basic credentials of a registered user; TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", sindescol_api::api_router(store.clone()))
//! ```

pub mod afiliados;
pub mod auth;
pub mod cargos;
pub mod catalogo;
pub mod cuotas;
pub mod envelope;
pub mod error;
pub mod salarios;
pub mod usuarios;

use std::sync::Arc;

use axum::{Router, routing::get};
use sindescol_core::{catalogo::Catalogo, store::MembershipStore};
use strum::IntoEnumIterator as _;

pub use auth::hash_password;
pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: MembershipStore + 'static,
{
  let router = Router::new()
    // Affiliates
    .route("/afiliados", get(afiliados::list::<S>).post(afiliados::create::<S>))
    .route(
      "/afiliados/{id}",
      get(afiliados::get_one::<S>)
        .put(afiliados::update::<S>)
        .delete(afiliados::delete::<S>),
    )
    .route("/afiliados/cedula/{cedula}", get(afiliados::by_cedula::<S>))
    // Dues
    .route("/cuotas", get(cuotas::list::<S>).post(cuotas::create::<S>))
    .route(
      "/cuotas/{id}",
      get(cuotas::get_one::<S>).put(cuotas::update::<S>).delete(cuotas::delete::<S>),
    )
    // Positions
    .route("/cargos", get(cargos::list::<S>).post(cargos::create::<S>))
    .route(
      "/cargos/{id}",
      get(cargos::get_one::<S>).put(cargos::rename::<S>).delete(cargos::delete::<S>),
    )
    // Salary scale
    .route("/salarios", get(salarios::list::<S>).post(salarios::create::<S>))
    .route(
      "/salarios/{id}",
      get(salarios::get_one::<S>)
        .put(salarios::update::<S>)
        .delete(salarios::delete::<S>),
    )
    // Users
    .route("/usuarios", get(usuarios::list::<S>).post(usuarios::create::<S>))
    .route("/usuarios/{id}", get(usuarios::get_one::<S>).delete(usuarios::delete::<S>))
    // Reference data
    .route("/departamentos", get(catalogo::departamentos::<S>))
    .route("/municipios", get(catalogo::municipios::<S>))
    .route("/instituciones", get(catalogo::instituciones::<S>))
    .route("/instituciones/{id}", get(catalogo::institucion::<S>));

  Catalogo::iter()
    .fold(router, |router, cat| router.route(&format!("/{cat}"), get(catalogo::lista::<S>)))
    .with_state(store)
}
