//! Reference data, positions and the salary scale.

use rusqlite::{Connection, OptionalExtension as _, Row, params};
use sindescol_core::catalogo::{
  Cargo, Catalogo, Departamento, Institucion, ItemCatalogo, Municipio, NewCargo, NewSalario,
  Salario, SalarioUpdate,
};

use crate::{Error, Result};

// ─── Reference data ──────────────────────────────────────────────────────────

pub fn departamentos(conn: &Connection) -> Result<Vec<Departamento>> {
  let mut stmt =
    conn.prepare("SELECT id_departamento, nombre FROM departamentos ORDER BY nombre")?;
  let rows = stmt
    .query_map([], |r| Ok(Departamento { id_departamento: r.get(0)?, nombre: r.get(1)? }))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn municipios(conn: &Connection, id_departamento: Option<i64>) -> Result<Vec<Municipio>> {
  let mut stmt = conn.prepare(
    "SELECT m.id_municipio, m.nombre, m.id_departamento, d.nombre
     FROM municipios m
     JOIN departamentos d ON d.id_departamento = m.id_departamento
     WHERE ?1 IS NULL OR m.id_departamento = ?1
     ORDER BY d.nombre, m.nombre",
  )?;
  let rows = stmt
    .query_map(params![id_departamento], |r| {
      Ok(Municipio {
        id_municipio:    r.get(0)?,
        nombre:          r.get(1)?,
        id_departamento: r.get(2)?,
        departamento:    r.get(3)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn catalogo(conn: &Connection, catalogo: Catalogo) -> Result<Vec<ItemCatalogo>> {
  // The table name comes from the enum, never from the request.
  let sql = format!("SELECT id, nombre FROM {catalogo} ORDER BY nombre");
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map([], |r| Ok(ItemCatalogo { id: r.get(0)?, nombre: r.get(1)? }))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn institucion(r: &Row<'_>) -> rusqlite::Result<Institucion> {
  Ok(Institucion {
    id_institucion:          r.get(0)?,
    nombre:                  r.get(1)?,
    id_municipio:            r.get(2)?,
    municipio:               r.get(3)?,
    correo_institucional:    r.get(4)?,
    telefono_institucional:  r.get(5)?,
    direccion_institucional: r.get(6)?,
    rector:                  r.get(7)?,
  })
}

pub fn instituciones(conn: &Connection, id: Option<i64>) -> Result<Vec<Institucion>> {
  let mut stmt = conn.prepare(
    "SELECT i.id_institucion, i.nombre, i.id_municipio, m.nombre,
            i.correo_institucional, i.telefono_institucional, i.direccion_institucional,
            r.nombre
     FROM instituciones i
     LEFT JOIN municipios m ON m.id_municipio = i.id_municipio
     LEFT JOIN rectores   r ON r.id_institucion = i.id_institucion
     WHERE ?1 IS NULL OR i.id_institucion = ?1
     ORDER BY i.nombre",
  )?;
  let rows = stmt
    .query_map(params![id], institucion)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

// ─── Positions ───────────────────────────────────────────────────────────────

pub fn cargos(conn: &Connection, id: Option<i64>) -> Result<Vec<Cargo>> {
  let mut stmt = conn.prepare(
    "SELECT id_cargo, nombre FROM cargos
     WHERE ?1 IS NULL OR id_cargo = ?1
     ORDER BY nombre",
  )?;
  let rows = stmt
    .query_map(params![id], |r| Ok(Cargo { id_cargo: r.get(0)?, nombre: r.get(1)? }))?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn insert_cargo(conn: &Connection, input: &NewCargo) -> Result<i64> {
  conn.execute("INSERT INTO cargos (nombre) VALUES (?1)", [input.nombre.trim()])?;
  Ok(conn.last_insert_rowid())
}

pub fn rename_cargo(conn: &Connection, id: i64, input: &NewCargo) -> Result<bool> {
  let updated = conn.execute(
    "UPDATE cargos SET nombre = ?1 WHERE id_cargo = ?2",
    params![input.nombre.trim(), id],
  )?;
  Ok(updated > 0)
}

/// Fails with a constraint violation while affiliates or salaries still
/// reference the position.
pub fn delete_cargo(conn: &Connection, id: i64) -> Result<bool> {
  Ok(conn.execute("DELETE FROM cargos WHERE id_cargo = ?1", [id])? > 0)
}

// ─── Salary scale ────────────────────────────────────────────────────────────

const SELECT_SALARIO: &str = "
  SELECT s.id_salario, s.id_cargo, c.nombre, s.id_departamento, d.nombre, s.anio, s.monto
  FROM salarios s
  LEFT JOIN cargos        c ON c.id_cargo = s.id_cargo
  LEFT JOIN departamentos d ON d.id_departamento = s.id_departamento
";

fn salario(r: &Row<'_>) -> rusqlite::Result<Salario> {
  Ok(Salario {
    id_salario:      r.get(0)?,
    id_cargo:        r.get(1)?,
    cargo:           r.get(2)?,
    id_departamento: r.get(3)?,
    departamento:    r.get(4)?,
    anio:            r.get(5)?,
    monto:           r.get(6)?,
  })
}

pub fn salarios(conn: &Connection, scope: Option<i64>, anio: Option<i32>) -> Result<Vec<Salario>> {
  let sql = format!(
    "{SELECT_SALARIO}
     WHERE (?1 IS NULL OR s.id_departamento = ?1)
       AND (?2 IS NULL OR s.anio = ?2)
     ORDER BY s.anio DESC, d.nombre, c.nombre"
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map(params![scope, anio], salario)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn salario_by_id(conn: &Connection, id: i64, scope: Option<i64>) -> Result<Option<Salario>> {
  let sql = format!(
    "{SELECT_SALARIO}
     WHERE s.id_salario = ?1 AND (?2 IS NULL OR s.id_departamento = ?2)"
  );
  Ok(conn.query_row(&sql, params![id, scope], salario).optional()?)
}

pub fn insert_salario(conn: &Connection, input: &NewSalario, scope: Option<i64>) -> Result<i64> {
  if scope.is_some_and(|own| own != input.id_departamento) {
    return Err(Error::Forbidden(
      "solo puede registrar salarios de su departamento".into(),
    ));
  }
  conn.execute(
    "INSERT INTO salarios (id_cargo, id_departamento, anio, monto) VALUES (?1, ?2, ?3, ?4)",
    params![input.id_cargo, input.id_departamento, input.anio, input.monto],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn update_salario(
  conn: &Connection,
  id: i64,
  input: &SalarioUpdate,
  scope: Option<i64>,
) -> Result<bool> {
  let updated = conn.execute(
    "UPDATE salarios SET anio = COALESCE(?1, anio), monto = COALESCE(?2, monto)
     WHERE id_salario = ?3 AND (?4 IS NULL OR id_departamento = ?4)",
    params![input.anio, input.monto, id, scope],
  )?;
  Ok(updated > 0)
}

pub fn delete_salario(conn: &Connection, id: i64, scope: Option<i64>) -> Result<bool> {
  let deleted = conn.execute(
    "DELETE FROM salarios
     WHERE id_salario = ?1 AND (?2 IS NULL OR id_departamento = ?2)",
    params![id, scope],
  )?;
  Ok(deleted > 0)
}
