//! API users.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, params};
use sindescol_core::usuario::{Caller, NewUsuario, Rol, Usuario};

use crate::{
  Error, Result,
  encode::{RawUsuario, SELECT_USUARIO, encode_dt},
};

pub fn by_username(conn: &Connection, username: &str) -> Result<Option<Usuario>> {
  let sql = format!("{SELECT_USUARIO} WHERE username = ?1");
  conn
    .query_row(&sql, [username], RawUsuario::from_row)
    .optional()?
    .map(RawUsuario::into_usuario)
    .transpose()
}

pub fn count(conn: &Connection) -> Result<u64> {
  Ok(conn.query_row("SELECT COUNT(*) FROM usuarios", [], |r| r.get(0))?)
}

pub fn select(conn: &Connection, scope: Option<i64>, id: Option<i64>) -> Result<Vec<Usuario>> {
  let sql = format!(
    "{SELECT_USUARIO}
     WHERE (?1 IS NULL OR id_departamento = ?1)
       AND (?2 IS NULL OR id_usuario = ?2)
     ORDER BY username"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![scope, id], RawUsuario::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawUsuario::into_usuario).collect()
}

/// Insert a user. `caller` is `None` only for the bootstrap administrator.
pub fn insert(
  conn: &Connection,
  input: &NewUsuario,
  caller: Option<&Caller>,
  now: DateTime<Utc>,
) -> Result<i64> {
  if let Some(caller) = caller
    && !caller.is_admin()
    && (input.rol != Rol::Departamental || !caller.can_access(input.id_departamento))
  {
    return Err(Error::Forbidden(
      "solo puede crear usuarios departamentales de su departamento".into(),
    ));
  }

  // Administrators are never bound to a department.
  let id_departamento = match input.rol {
    Rol::Admin => None,
    Rol::Departamental => input.id_departamento,
  };

  conn.execute(
    "INSERT INTO usuarios (username, nombre, rol, id_departamento, password_hash, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      input.username.trim(),
      input.nombre.trim(),
      input.rol.as_ref(),
      id_departamento,
      input.password_hash,
      encode_dt(now),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn delete(conn: &Connection, id: i64, caller: &Caller) -> Result<bool> {
  if id == caller.id_usuario {
    return Err(Error::Forbidden("no puede eliminar su propio usuario".into()));
  }
  let deleted = conn.execute(
    "DELETE FROM usuarios
     WHERE id_usuario = ?1
       AND (?2 IS NULL OR (rol = 'departamental' AND id_departamento = ?2))",
    params![id, caller.scope()],
  )?;
  Ok(deleted > 0)
}
