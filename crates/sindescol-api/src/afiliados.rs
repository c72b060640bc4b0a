//! Handlers for `/afiliados` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/afiliados` | All affiliates, composed |
//! | `GET`    | `/afiliados/{id}` | 404 if not found |
//! | `GET`    | `/afiliados/cedula/{cedula}` | 404 if not found |
//! | `POST`   | `/afiliados` | Body: [`NewAfiliado`]; returns 201 + composed record |
//! | `PUT`    | `/afiliados/{id}` | Body: [`AfiliadoUpdate`]; unknown keys ignored |
//! | `DELETE` | `/afiliados/{id}` | Removes acts, secondary positions and dues too |

use std::sync::Arc;

use axum::extract::State;
use sindescol_core::{
  afiliado::{Afiliado, AfiliadoUpdate, NewAfiliado},
  store::MembershipStore,
};

use crate::{
  auth::Auth,
  envelope::{Created, Id, Payload, Reply, created, done, ok},
  error::ApiError,
};

const NO_ENCONTRADO: &str = "Afiliado no encontrado";

fn not_found() -> ApiError { ApiError::NotFound(NO_ENCONTRADO.into()) }

/// `GET /afiliados`
pub async fn list<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
) -> Reply<Vec<Afiliado>> {
  ok(store.list_afiliados().await.map_err(ApiError::store)?)
}

/// `GET /afiliados/{id}`
pub async fn get_one<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Id(id): Id<i64>,
) -> Reply<Afiliado> {
  let afiliado = store
    .get_afiliado(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(afiliado)
}

/// `GET /afiliados/cedula/{cedula}`
pub async fn by_cedula<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Id(cedula): Id<String>,
) -> Reply<Afiliado> {
  let afiliado = store
    .get_afiliado_by_cedula(&cedula)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(afiliado)
}

/// `POST /afiliados`
pub async fn create<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Payload(body): Payload<NewAfiliado>,
) -> Created<Afiliado> {
  let afiliado = store.create_afiliado(body).await.map_err(ApiError::store)?;
  tracing::info!(
    usuario = %caller.username,
    id_afiliado = afiliado.id_afiliado,
    nombre = %afiliado.nombre_completo(),
    "affiliate registered"
  );
  created(afiliado)
}

/// `PUT /afiliados/{id}`
pub async fn update<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Id(id): Id<i64>,
  Payload(body): Payload<AfiliadoUpdate>,
) -> Reply<Afiliado> {
  let afiliado = store
    .update_afiliado(id, body)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(afiliado)
}

/// `DELETE /afiliados/{id}`
pub async fn delete<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<()> {
  if !store.delete_afiliado(id).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  tracing::info!(usuario = %caller.username, id_afiliado = id, "affiliate removed");
  done("Afiliado eliminado correctamente")
}
