//! Dues statements. `scope` is the caller's department filter as returned
//! by [`sindescol_core::usuario::Caller::scope`]; `None` means unrestricted.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, params};
use sindescol_core::cuota::{Cuota, CuotaUpdate, Mes, NewCuota};

use crate::{
  Error, Result,
  encode::{RawCuota, SELECT_CUOTA, decode_mes, encode_dt},
  error::is_constraint,
};

pub fn select(conn: &Connection, scope: Option<i64>, cedula: Option<&str>) -> Result<Vec<Cuota>> {
  let sql = format!(
    "{SELECT_CUOTA}
     WHERE (?1 IS NULL OR d.id_departamento = ?1)
       AND (?2 IS NULL OR c.cedula = ?2)
     ORDER BY c.anio DESC, c.id_cuota DESC"
  );
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params![scope, cedula], RawCuota::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawCuota::into_cuota).collect()
}

pub fn select_one(conn: &Connection, id: i64, scope: Option<i64>) -> Result<Option<Cuota>> {
  let sql = format!(
    "{SELECT_CUOTA}
     WHERE c.id_cuota = ?1 AND (?2 IS NULL OR d.id_departamento = ?2)"
  );
  conn
    .query_row(&sql, params![id, scope], RawCuota::from_row)
    .optional()?
    .map(RawCuota::into_cuota)
    .transpose()
}

fn existe_periodo(
  conn: &Connection,
  cedula: &str,
  mes: Mes,
  anio: i32,
  excepto: Option<i64>,
) -> Result<bool> {
  Ok(
    conn
      .query_row(
        "SELECT 1 FROM cuotas
         WHERE cedula = ?1 AND mes = ?2 AND anio = ?3
           AND (?4 IS NULL OR id_cuota != ?4)",
        params![cedula, mes.as_ref(), anio, excepto],
        |_| Ok(()),
      )
      .optional()?
      .is_some(),
  )
}

/// Record a due. Returns the new `id_cuota`.
///
/// The affiliate lookup and the duplicate check are early validation only;
/// the `UNIQUE (cedula, mes, anio)` constraint has the final word.
pub fn insert(
  conn: &mut Connection,
  input: &NewCuota,
  scope: Option<i64>,
  now: DateTime<Utc>,
) -> Result<i64> {
  let cedula = input.cedula.trim();
  let tx = conn.transaction()?;

  // Outer Option: does the affiliate exist; inner: its department, if its
  // work municipality is known.
  let departamento: Option<Option<i64>> = tx
    .query_row(
      "SELECT m.id_departamento
       FROM afiliados a
       LEFT JOIN municipios m ON m.id_municipio = a.municipio_trabajo
       WHERE a.cedula = ?1",
      [cedula],
      |r| r.get(0),
    )
    .optional()?;

  match (departamento, scope) {
    (None, None) => return Err(Error::AfiliadoNotFound(cedula.to_owned())),
    (Some(_), None) => {}
    (Some(dep), Some(own)) if dep == Some(own) => {}
    (_, Some(_)) => {
      return Err(Error::Forbidden(
        "no tiene permisos para registrar cuotas de este afiliado".into(),
      ));
    }
  }

  let duplicada = || Error::CuotaDuplicada {
    cedula: cedula.to_owned(),
    mes:    input.mes,
    anio:   input.anio,
  };

  if existe_periodo(&tx, cedula, input.mes, input.anio, None)? {
    return Err(duplicada());
  }

  match tx.execute(
    "INSERT INTO cuotas (cedula, mes, anio, monto, fecha_registro)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    params![cedula, input.mes.as_ref(), input.anio, input.monto, encode_dt(now)],
  ) {
    Ok(_) => {}
    Err(e) if is_constraint(&e) => return Err(duplicada()),
    Err(e) => return Err(e.into()),
  }
  let id = tx.last_insert_rowid();

  tx.commit()?;
  Ok(id)
}

/// Apply a partial update to a visible due. Returns `false` if the due does
/// not exist or lies outside `scope`.
pub fn update(
  conn: &mut Connection,
  id: i64,
  input: &CuotaUpdate,
  scope: Option<i64>,
) -> Result<bool> {
  let tx = conn.transaction()?;

  let actual = tx
    .query_row(
      "SELECT c.cedula, c.mes, c.anio
       FROM cuotas c
       LEFT JOIN afiliados  a ON a.cedula = c.cedula
       LEFT JOIN municipios m ON m.id_municipio = a.municipio_trabajo
       WHERE c.id_cuota = ?1 AND (?2 IS NULL OR m.id_departamento = ?2)",
      params![id, scope],
      |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?, r.get::<_, i32>(2)?)),
    )
    .optional()?;
  let Some((cedula, mes, anio)) = actual else {
    return Ok(false);
  };

  if input.is_empty() {
    return Ok(true);
  }

  let mes = input.mes.unwrap_or(decode_mes(&mes)?);
  let anio = input.anio.unwrap_or(anio);
  let duplicada = || Error::CuotaDuplicada { cedula: cedula.clone(), mes, anio };

  if existe_periodo(&tx, &cedula, mes, anio, Some(id))? {
    return Err(duplicada());
  }

  match tx.execute(
    "UPDATE cuotas SET mes = ?1, anio = ?2, monto = COALESCE(?3, monto)
     WHERE id_cuota = ?4",
    params![mes.as_ref(), anio, input.monto, id],
  ) {
    Ok(_) => {}
    Err(e) if is_constraint(&e) => return Err(duplicada()),
    Err(e) => return Err(e.into()),
  }

  tx.commit()?;
  Ok(true)
}

pub fn delete(conn: &Connection, id: i64, scope: Option<i64>) -> Result<bool> {
  let deleted = conn.execute(
    "DELETE FROM cuotas
     WHERE id_cuota = ?1
       AND (?2 IS NULL OR id_cuota IN (
         SELECT c.id_cuota
         FROM cuotas c
         JOIN afiliados  a ON a.cedula = c.cedula
         JOIN municipios m ON m.id_municipio = a.municipio_trabajo
         WHERE m.id_departamento = ?2
       ))",
    params![id, scope],
  )?;
  Ok(deleted > 0)
}
