//! Read-only reference data: departments, municipalities, the provider
//! catalogs and institutions.

use std::{str::FromStr as _, sync::Arc};

use axum::extract::{MatchedPath, State};
use serde::Deserialize;
use sindescol_core::{
  catalogo::{Catalogo, Departamento, Institucion, ItemCatalogo, Municipio},
  store::MembershipStore,
};

use crate::{
  auth::Auth,
  envelope::{Id, Params, Reply, ok},
  error::ApiError,
};

pub async fn departamentos<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
) -> Reply<Vec<Departamento>> {
  ok(store.list_departamentos().await.map_err(ApiError::store)?)
}

#[derive(Debug, Deserialize)]
pub struct MunicipiosParams {
  pub id_departamento: Option<i64>,
}

/// `GET /municipios[?id_departamento=<id>]`
pub async fn municipios<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Params(params): Params<MunicipiosParams>,
) -> Reply<Vec<Municipio>> {
  ok(store.list_municipios(params.id_departamento).await.map_err(ApiError::store)?)
}

/// `GET /religiones`, `/eps`, `/afp`, `/arl`, `/cesantias`. The catalog is
/// the last segment of the matched route.
pub async fn lista<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  path: MatchedPath,
) -> Reply<Vec<ItemCatalogo>> {
  let nombre = path.as_str().rsplit('/').next().unwrap_or_default();
  let catalogo = Catalogo::from_str(nombre)
    .map_err(|_| ApiError::NotFound(format!("catálogo desconocido: {nombre}")))?;
  ok(store.list_catalogo(catalogo).await.map_err(ApiError::store)?)
}

pub async fn instituciones<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
) -> Reply<Vec<Institucion>> {
  ok(store.list_instituciones().await.map_err(ApiError::store)?)
}

pub async fn institucion<S: MembershipStore>(
  State(store): State<Arc<S>>,
  _auth: Auth,
  Id(id): Id<i64>,
) -> Reply<Institucion> {
  let institucion = store
    .get_institucion(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Institución no encontrada".into()))?;
  ok(institucion)
}
