//! Affiliate lifecycle statements.
//!
//! Every function here runs on the store's connection thread. The writers
//! open a [`rusqlite::Transaction`] and only commit at the very end; any
//! early return drops the transaction, which rolls it back.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter, types::Value};
use sindescol_core::afiliado::{
  ActaNombramiento, ActaPosesion, Afiliado, AfiliadoUpdate, DecodedFiles, NewAfiliado, OtroCargo,
};

use crate::{
  Result,
  encode::{
    RawAfiliado, SELECT_AFILIADO, acta_nombramiento, acta_posesion, encode_date, encode_dt,
    otro_cargo,
  },
};

// ─── Reads ───────────────────────────────────────────────────────────────────

pub enum Filtro<'a> {
  Todos,
  Id(i64),
  Cedula(&'a str),
}

/// Composed affiliates matching `filtro`, with their sub-records attached.
pub fn select(conn: &Connection, filtro: Filtro<'_>) -> Result<Vec<Afiliado>> {
  let (where_clause, param) = match filtro {
    Filtro::Todos => ("", None),
    Filtro::Id(id) => ("WHERE a.id_afiliado = ?1", Some(Value::Integer(id))),
    Filtro::Cedula(c) => ("WHERE a.cedula = ?1", Some(Value::Text(c.to_owned()))),
  };
  let single = param.is_some();

  let sql = format!("{SELECT_AFILIADO} {where_clause} ORDER BY a.apellidos, a.nombres");
  let mut stmt = conn.prepare(&sql)?;
  let raws = stmt
    .query_map(params_from_iter(param), RawAfiliado::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  if raws.is_empty() {
    return Ok(Vec::new());
  }

  // A single-row read only needs that affiliate's children.
  let scope = if single { Some(raws[0].id_afiliado) } else { None };
  let mut hijos = Hijos::load(conn, scope)?;

  raws
    .into_iter()
    .map(|raw| {
      let mut afiliado = raw.into_afiliado()?;
      hijos.attach(&mut afiliado);
      Ok(afiliado)
    })
    .collect()
}

/// Sub-records grouped by affiliate id.
#[derive(Default)]
struct Hijos {
  nombramientos: HashMap<i64, Vec<ActaNombramiento>>,
  posesiones:    HashMap<i64, Vec<ActaPosesion>>,
  otros_cargos:  HashMap<i64, Vec<OtroCargo>>,
}

impl Hijos {
  fn load(conn: &Connection, id_afiliado: Option<i64>) -> Result<Self> {
    let mut hijos = Hijos::default();

    let mut stmt = conn.prepare(
      "SELECT id_acta_nombramiento, id_afiliado, tipo_documento, numero_resolucion,
              fecha_resolucion, archivo
       FROM actas_nombramiento
       WHERE ?1 IS NULL OR id_afiliado = ?1
       ORDER BY id_acta_nombramiento",
    )?;
    for acta in stmt.query_map(params![id_afiliado], acta_nombramiento)? {
      let acta = acta?;
      hijos.nombramientos.entry(acta.id_afiliado).or_default().push(acta);
    }

    let mut stmt = conn.prepare(
      "SELECT id_acta_posesion, id_afiliado, numero_acta, fecha_acta, archivo
       FROM actas_posesion
       WHERE ?1 IS NULL OR id_afiliado = ?1
       ORDER BY id_acta_posesion",
    )?;
    for acta in stmt.query_map(params![id_afiliado], acta_posesion)? {
      let acta = acta?;
      hijos.posesiones.entry(acta.id_afiliado).or_default().push(acta);
    }

    let mut stmt = conn.prepare(
      "SELECT id_otro_cargo, id_afiliado, nombre_cargo, fecha_inicio, fecha_fin
       FROM otros_cargos
       WHERE ?1 IS NULL OR id_afiliado = ?1
       ORDER BY id_otro_cargo",
    )?;
    for cargo in stmt.query_map(params![id_afiliado], otro_cargo)? {
      let cargo = cargo?;
      hijos.otros_cargos.entry(cargo.id_afiliado).or_default().push(cargo);
    }

    Ok(hijos)
  }

  fn attach(&mut self, a: &mut Afiliado) {
    a.actas_nombramiento = self.nombramientos.remove(&a.id_afiliado).unwrap_or_default();
    a.actas_posesion = self.posesiones.remove(&a.id_afiliado).unwrap_or_default();
    a.otros_cargos = self.otros_cargos.remove(&a.id_afiliado).unwrap_or_default();
  }
}

// ─── Create ──────────────────────────────────────────────────────────────────

fn trimmed(s: &Option<String>) -> Option<String> {
  s.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Insert an affiliate and everything that travels with it. Returns the new
/// `id_afiliado`.
pub fn insert(
  conn: &mut Connection,
  input: &NewAfiliado,
  files: DecodedFiles,
  now: DateTime<Utc>,
) -> Result<i64> {
  let tx = conn.transaction()?;

  tx.execute(
    "INSERT INTO afiliados (
       cedula, nombres, apellidos, fecha_nacimiento, id_religion,
       direccion_domicilio, municipio_domicilio,
       direccion_residencia, municipio_residencia, municipio_trabajo,
       id_cargo, id_eps, id_afp, id_arl, id_cesantias, id_institucion,
       fecha_afiliacion, telefono, correo, foto_afiliado, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11,
               ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
    params![
      input.cedula.trim(),
      input.nombres.trim(),
      input.apellidos.trim(),
      input.fecha_nacimiento.map(encode_date),
      input.id_religion,
      trimmed(&input.direccion_domicilio),
      input.municipio_domicilio,
      trimmed(&input.direccion_residencia),
      input.municipio_residencia,
      input.municipio_trabajo,
      input.id_cargo,
      input.id_eps,
      input.id_afp,
      input.id_arl,
      input.id_cesantias,
      input.id_institucion,
      input.fecha_afiliacion.map(encode_date),
      trimmed(&input.telefono),
      trimmed(&input.correo),
      files.foto_afiliado,
      encode_dt(now),
    ],
  )?;
  let id_afiliado = tx.last_insert_rowid();

  // Shared reference data: only fill in what the form supplied.
  if let Some(id_institucion) = input.id_institucion
    && input.has_institution_contact()
  {
    tx.execute(
      "UPDATE instituciones SET
         correo_institucional    = COALESCE(?1, correo_institucional),
         telefono_institucional  = COALESCE(?2, telefono_institucional),
         direccion_institucional = COALESCE(?3, direccion_institucional)
       WHERE id_institucion = ?4",
      params![
        trimmed(&input.correo_institucional),
        trimmed(&input.telefono_institucional),
        trimmed(&input.direccion_institucional),
        id_institucion,
      ],
    )?;
  }

  if input.has_acta_nombramiento() {
    tx.execute(
      "INSERT INTO actas_nombramiento (
         id_afiliado, tipo_documento, numero_resolucion, fecha_resolucion, archivo
       ) VALUES (?1, ?2, ?3, ?4, ?5)",
      params![
        id_afiliado,
        trimmed(&input.tipo_documento),
        trimmed(&input.numero_resolucion),
        input.fecha_resolucion.map(encode_date),
        files.archivo_nombramiento,
      ],
    )?;
  }

  if input.has_acta_posesion() {
    tx.execute(
      "INSERT INTO actas_posesion (id_afiliado, numero_acta, fecha_acta, archivo)
       VALUES (?1, ?2, ?3, ?4)",
      params![
        id_afiliado,
        trimmed(&input.numero_acta),
        input.fecha_acta.map(encode_date),
        files.archivo_posesion,
      ],
    )?;
  }

  if let Some((nombre, id_institucion)) = input.rector() {
    let inserted = tx.execute(
      "INSERT INTO rectores (nombre, id_institucion)
       SELECT ?1, ?2
       WHERE NOT EXISTS (SELECT 1 FROM rectores WHERE id_institucion = ?2)",
      params![nombre, id_institucion],
    )?;
    if inserted == 0 {
      tracing::debug!(id_institucion, "institution already has a principal; skipped");
    }
  }

  {
    let mut stmt = tx.prepare(
      "INSERT INTO otros_cargos (id_afiliado, nombre_cargo, fecha_inicio, fecha_fin)
       VALUES (?1, ?2, ?3, ?4)",
    )?;
    for cargo in input.otros_cargos_validos() {
      stmt.execute(params![
        id_afiliado,
        trimmed(&cargo.nombre_cargo),
        cargo.fecha_inicio.map(encode_date),
        cargo.fecha_fin.map(encode_date),
      ])?;
    }
  }

  tx.commit()?;
  Ok(id_afiliado)
}

// ─── Update ──────────────────────────────────────────────────────────────────

/// The `(column, value)` pairs an update touches. Column names come only
/// from this function, never from client input.
pub fn columnas(u: &AfiliadoUpdate, foto: Option<Vec<u8>>) -> Vec<(&'static str, Value)> {
  let text = |s: &Option<String>| s.as_deref().map(|v| Value::Text(v.trim().to_owned()));
  let int = |n: Option<i64>| n.map(Value::Integer);
  let date = |d: Option<chrono::NaiveDate>| d.map(|d| Value::Text(encode_date(d)));

  [
    ("nombres", text(&u.nombres)),
    ("apellidos", text(&u.apellidos)),
    ("fecha_nacimiento", date(u.fecha_nacimiento)),
    ("id_religion", int(u.id_religion)),
    ("direccion_domicilio", text(&u.direccion_domicilio)),
    ("municipio_domicilio", int(u.municipio_domicilio)),
    ("direccion_residencia", text(&u.direccion_residencia)),
    ("municipio_residencia", int(u.municipio_residencia)),
    ("municipio_trabajo", int(u.municipio_trabajo)),
    ("id_cargo", int(u.id_cargo)),
    ("id_eps", int(u.id_eps)),
    ("id_afp", int(u.id_afp)),
    ("id_arl", int(u.id_arl)),
    ("id_cesantias", int(u.id_cesantias)),
    ("id_institucion", int(u.id_institucion)),
    ("fecha_afiliacion", date(u.fecha_afiliacion)),
    ("telefono", text(&u.telefono)),
    ("correo", text(&u.correo)),
    ("foto_afiliado", foto.map(Value::Blob)),
  ]
  .into_iter()
  .filter_map(|(col, v)| v.map(|v| (col, v)))
  .collect()
}

/// Apply `cambios` to one affiliate. Returns `false` if it does not exist; an
/// empty set issues no write.
pub fn update(conn: &mut Connection, id: i64, cambios: Vec<(&'static str, Value)>) -> Result<bool> {
  let tx = conn.transaction()?;

  let existe = tx
    .query_row("SELECT 1 FROM afiliados WHERE id_afiliado = ?1", [id], |_| Ok(()))
    .optional()?
    .is_some();
  if !existe {
    return Ok(false);
  }
  if cambios.is_empty() {
    return Ok(true);
  }

  let set = cambios
    .iter()
    .enumerate()
    .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  let sql = format!("UPDATE afiliados SET {set} WHERE id_afiliado = ?{}", cambios.len() + 1);

  let mut values: Vec<Value> = cambios.into_iter().map(|(_, v)| v).collect();
  values.push(Value::Integer(id));

  tx.execute(&sql, params_from_iter(values))?;
  tx.commit()?;
  Ok(true)
}

// ─── Delete ──────────────────────────────────────────────────────────────────

/// Delete an affiliate, its acts, secondary positions and dues. Returns
/// whether the affiliate row existed.
pub fn delete(conn: &mut Connection, id: i64) -> Result<bool> {
  let tx = conn.transaction()?;

  tx.execute("DELETE FROM actas_nombramiento WHERE id_afiliado = ?1", [id])?;
  tx.execute("DELETE FROM actas_posesion WHERE id_afiliado = ?1", [id])?;
  tx.execute("DELETE FROM otros_cargos WHERE id_afiliado = ?1", [id])?;
  tx.execute(
    "DELETE FROM cuotas
     WHERE cedula = (SELECT cedula FROM afiliados WHERE id_afiliado = ?1)",
    [id],
  )?;
  let deleted = tx.execute("DELETE FROM afiliados WHERE id_afiliado = ?1", [id])?;

  tx.commit()?;
  Ok(deleted > 0)
}

