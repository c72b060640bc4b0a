//! Handlers for `/usuarios`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/usuarios` | Departmental callers see their department only |
//! | `POST`   | `/usuarios` | Body: [`NewUsuarioBody`]; the password is hashed here |
//! | `GET`    | `/usuarios/{id}` | 404 if not visible |
//! | `DELETE` | `/usuarios/{id}` | Nobody may delete themselves |

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;
use sindescol_core::{
  store::MembershipStore,
  usuario::{NewUsuario, Rol, Usuario},
};

use crate::{
  auth::{Auth, hash_password},
  envelope::{Created, Id, Payload, Reply, created, done, ok},
  error::ApiError,
};

fn not_found() -> ApiError { ApiError::NotFound("Usuario no encontrado".into()) }

#[derive(Debug, Deserialize)]
pub struct NewUsuarioBody {
  pub username:        String,
  pub nombre:          String,
  pub password:        String,
  pub rol:             Rol,
  #[serde(default)]
  pub id_departamento: Option<i64>,
}

pub async fn list<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
) -> Reply<Vec<Usuario>> {
  ok(store.list_usuarios(&caller).await.map_err(ApiError::store)?)
}

pub async fn get_one<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<Usuario> {
  let usuario = store
    .get_usuario(id, &caller)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(not_found)?;
  ok(usuario)
}

pub async fn create<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Payload(body): Payload<NewUsuarioBody>,
) -> Created<Usuario> {
  if body.password.is_empty() {
    return Err(ApiError::BadRequest("campo requerido: password".into()));
  }
  let password_hash =
    hash_password(&body.password).map_err(|e| ApiError::Store(e.to_string().into()))?;

  let nuevo = NewUsuario {
    username: body.username,
    nombre: body.nombre,
    rol: body.rol,
    id_departamento: body.id_departamento,
    password_hash,
  };
  let usuario = store
    .create_usuario(nuevo, Some(&caller))
    .await
    .map_err(ApiError::store)?;
  tracing::info!(creador = %caller.username, username = %usuario.username, rol = %usuario.rol, "user created");
  created(usuario)
}

pub async fn delete<S: MembershipStore>(
  State(store): State<Arc<S>>,
  Auth(caller): Auth,
  Id(id): Id<i64>,
) -> Reply<()> {
  if !store.delete_usuario(id, &caller).await.map_err(ApiError::store)? {
    return Err(not_found());
  }
  done("Usuario eliminado correctamente")
}
