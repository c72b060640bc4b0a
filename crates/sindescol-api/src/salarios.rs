//! Handlers for `/salarios`, the salary scale per position, department and
//! year. Scoped like dues.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use sindescol_core::{
  catalogo::{NewSalario, Salario, SalarioUpdate},
  store::MembershipStore,
};

use crate::{
  auth::Auth,
  envelope::{Created, Id, Params, Payload, Reply, created, done, ok},
  error::ApiError,
};

fn not_found() -> ApiError { ApiError::NotFound("Salario no encontrado".into()) }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub anio: Option<i32>,
}

/// `GET /salarios[?anio=<year>]`
pub async fn list<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Params(params): Params<ListParams>,
) -> Reply<Vec<Salario>> {
  ok(store.list_salarios(&caller, params.anio).await.map_err(ApiError::store)?)
}

pub async fn get_one<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<Salario> {
  let salario = store
    .get_salario(id, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(salario)
}

pub async fn create<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Payload(body): Payload<NewSalario>,
) -> Created<Salario> {
  created(store.create_salario(body, &caller).await.map_err(ApiError::store)?)
}

pub async fn update<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
  Payload(body): Payload<SalarioUpdate>,
) -> Reply<Salario> {
  let salario = store
    .update_salario(id, body, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(salario)
}

pub async fn delete<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<()> {
  if !store.delete_salario(id, &caller).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  done("Salario eliminado correctamente")
}
