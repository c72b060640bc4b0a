//! Handlers for `/cargos`. Anyone may read; only administrators write.

use std::sync::Arc;

use axum::extract::State;
use sindescol_core::{
  catalogo::{Cargo, NewCargo},
  store::MembershipStore,
};

use crate::{
  auth::Auth,
  envelope::{Created, Id, Payload, Reply, created, done, ok},
  error::ApiError,
};

fn not_found() -> ApiError { ApiError::NotFound("Cargo no encontrado".into()) }

pub async fn list<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
) -> Reply<Vec<Cargo>> {
  ok(store.list_cargos().await.map_err(ApiError::store)?)
}

pub async fn get_one<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Id(id): Id<i64>,
) -> Reply<Cargo> {
  ok(store.get_cargo(id).await.map_err(ApiError::store)?.ok_or_else(not_found)?)
}

pub async fn create<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Payload(body): Payload<NewCargo>,
) -> Created<Cargo> {
  created(store.create_cargo(body, &caller).await.map_err(ApiError::store)?)
}

pub async fn rename<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
  Payload(body): Payload<NewCargo>,
) -> Reply<Cargo> {
  let cargo = store
    .rename_cargo(id, body, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(cargo)
}

pub async fn delete<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<()> {
  if !store.delete_cargo(id, &caller).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  done("Cargo eliminado correctamente")
}
