//! Handlers for `/cuotas` endpoints. Every operation is scoped to the
//! caller's department unless the caller is an administrator.

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use sindescol_core::{
  cuota::{Cuota, CuotaUpdate, NewCuota},
  store::MembershipStore,
};

use crate::{
  auth::Auth,
  envelope::{Created, Id, Params, Payload, Reply, created, done, ok},
  error::ApiError,
};

fn not_found() -> ApiError { ApiError::NotFound("Cuota no encontrada".into()) }

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub cedula: Option<String>,
}

/// `GET /cuotas[?cedula=<cedula>]`
pub async fn list<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Params(params): Params<ListParams>,
) -> Reply<Vec<Cuota>> {
  let cedula = params.cedula.as_deref().filter(|c| !c.trim().is_empty());
  ok(store.list_cuotas(&caller, cedula).await.map_err(ApiError::store)?)
}

/// `GET /cuotas/{id}`
pub async fn get_one<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<Cuota> {
  let cuota = store
    .get_cuota(id, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(cuota)
}

/// `POST /cuotas`, body: `{"cedula", "mes", "anio", "monto"}`
pub async fn create<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Payload(body): Payload<NewCuota>,
) -> Created<Cuota> {
  let cuota = store.create_cuota(body, &caller).await.map_err(ApiError::store)?;
  tracing::info!(
    usuario = %caller.username,
    cedula = %cuota.cedula,
    periodo = %format_args!("{} {}", cuota.mes, cuota.anio),
    "due recorded"
  );
  created(cuota)
}

/// `PUT /cuotas/{id}`
pub async fn update<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
  Payload(body): Payload<CuotaUpdate>,
) -> Reply<Cuota> {
  let cuota = store
    .update_cuota(id, body, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(cuota)
}

/// `DELETE /cuotas/{id}`
pub async fn delete<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<()> {
  if !store.delete_cuota(id, &caller).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  done("Cuota eliminada correctamente")
}
