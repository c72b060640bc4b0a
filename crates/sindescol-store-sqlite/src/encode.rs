//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`,
//! enums by their lowercase name. Binary fields are stored as BLOBs and stay
//! bytes until the HTTP layer encodes them.

use std::str::FromStr as _;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use sindescol_core::{
  afiliado::{ActaNombramiento, ActaPosesion, Afiliado, OtroCargo},
  cuota::{Cuota, Mes},
  usuario::{Rol, Usuario},
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

pub fn decode_mes(s: &str) -> Result<Mes> {
  Mes::from_str(s).map_err(|_| Error::Decode(format!("unknown month: {s:?}")))
}

pub fn decode_rol(s: &str) -> Result<Rol> {
  Rol::from_str(s).map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

// ─── Affiliate rows ──────────────────────────────────────────────────────────

/// Columns selected for a composed affiliate, in [`RawAfiliado`] order.
pub const SELECT_AFILIADO: &str = "
  SELECT
    a.id_afiliado, a.cedula, a.nombres, a.apellidos, a.fecha_nacimiento,
    a.id_religion, rel.nombre,
    a.direccion_domicilio, a.municipio_domicilio, md.nombre,
    a.direccion_residencia, a.municipio_residencia, mr.nombre,
    a.municipio_trabajo, mt.nombre, d.id_departamento, d.nombre,
    a.id_cargo, c.nombre,
    a.id_eps, eps.nombre, a.id_afp, afp.nombre, a.id_arl, arl.nombre,
    a.id_cesantias, ces.nombre,
    a.id_institucion, i.nombre,
    a.fecha_afiliacion, a.telefono, a.correo, a.foto_afiliado, a.created_at
  FROM afiliados a
  LEFT JOIN religiones    rel ON rel.id = a.id_religion
  LEFT JOIN municipios    md  ON md.id_municipio = a.municipio_domicilio
  LEFT JOIN municipios    mr  ON mr.id_municipio = a.municipio_residencia
  LEFT JOIN municipios    mt  ON mt.id_municipio = a.municipio_trabajo
  LEFT JOIN departamentos d   ON d.id_departamento = mt.id_departamento
  LEFT JOIN cargos        c   ON c.id_cargo = a.id_cargo
  LEFT JOIN eps               ON eps.id = a.id_eps
  LEFT JOIN afp               ON afp.id = a.id_afp
  LEFT JOIN arl               ON arl.id = a.id_arl
  LEFT JOIN cesantias     ces ON ces.id = a.id_cesantias
  LEFT JOIN instituciones i   ON i.id_institucion = a.id_institucion
";

/// Raw values read directly from [`SELECT_AFILIADO`].
pub struct RawAfiliado {
  pub id_afiliado:                 i64,
  pub cedula:                      String,
  pub nombres:                     String,
  pub apellidos:                   String,
  pub fecha_nacimiento:            Option<String>,
  pub id_religion:                 Option<i64>,
  pub religion:                    Option<String>,
  pub direccion_domicilio:         Option<String>,
  pub municipio_domicilio:         Option<i64>,
  pub nombre_municipio_domicilio:  Option<String>,
  pub direccion_residencia:        Option<String>,
  pub municipio_residencia:        Option<i64>,
  pub nombre_municipio_residencia: Option<String>,
  pub municipio_trabajo:           Option<i64>,
  pub nombre_municipio_trabajo:    Option<String>,
  pub id_departamento:             Option<i64>,
  pub departamento:                Option<String>,
  pub id_cargo:                    i64,
  pub cargo:                       Option<String>,
  pub id_eps:                      Option<i64>,
  pub eps:                         Option<String>,
  pub id_afp:                      Option<i64>,
  pub afp:                         Option<String>,
  pub id_arl:                      Option<i64>,
  pub arl:                         Option<String>,
  pub id_cesantias:                Option<i64>,
  pub cesantias:                   Option<String>,
  pub id_institucion:              Option<i64>,
  pub institucion:                 Option<String>,
  pub fecha_afiliacion:            Option<String>,
  pub telefono:                    Option<String>,
  pub correo:                      Option<String>,
  pub foto_afiliado:               Option<Vec<u8>>,
  pub created_at:                  String,
}

impl RawAfiliado {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id_afiliado:                 row.get(0)?,
      cedula:                      row.get(1)?,
      nombres:                     row.get(2)?,
      apellidos:                   row.get(3)?,
      fecha_nacimiento:            row.get(4)?,
      id_religion:                 row.get(5)?,
      religion:                    row.get(6)?,
      direccion_domicilio:         row.get(7)?,
      municipio_domicilio:         row.get(8)?,
      nombre_municipio_domicilio:  row.get(9)?,
      direccion_residencia:        row.get(10)?,
      municipio_residencia:        row.get(11)?,
      nombre_municipio_residencia: row.get(12)?,
      municipio_trabajo:           row.get(13)?,
      nombre_municipio_trabajo:    row.get(14)?,
      id_departamento:             row.get(15)?,
      departamento:                row.get(16)?,
      id_cargo:                    row.get(17)?,
      cargo:                       row.get(18)?,
      id_eps:                      row.get(19)?,
      eps:                         row.get(20)?,
      id_afp:                      row.get(21)?,
      afp:                         row.get(22)?,
      id_arl:                      row.get(23)?,
      arl:                         row.get(24)?,
      id_cesantias:                row.get(25)?,
      cesantias:                   row.get(26)?,
      id_institucion:              row.get(27)?,
      institucion:                 row.get(28)?,
      fecha_afiliacion:            row.get(29)?,
      telefono:                    row.get(30)?,
      correo:                      row.get(31)?,
      foto_afiliado:               row.get(32)?,
      created_at:                  row.get(33)?,
    })
  }

  /// Decode into an [`Afiliado`] with empty sub-record lists; the caller
  /// attaches them.
  pub fn into_afiliado(self) -> Result<Afiliado> {
    Ok(Afiliado {
      id_afiliado:                 self.id_afiliado,
      cedula:                      self.cedula,
      nombres:                     self.nombres,
      apellidos:                   self.apellidos,
      fecha_nacimiento:            decode_opt_date(self.fecha_nacimiento)?,
      id_religion:                 self.id_religion,
      religion:                    self.religion,
      direccion_domicilio:         self.direccion_domicilio,
      municipio_domicilio:         self.municipio_domicilio,
      nombre_municipio_domicilio:  self.nombre_municipio_domicilio,
      direccion_residencia:        self.direccion_residencia,
      municipio_residencia:        self.municipio_residencia,
      nombre_municipio_residencia: self.nombre_municipio_residencia,
      municipio_trabajo:           self.municipio_trabajo,
      nombre_municipio_trabajo:    self.nombre_municipio_trabajo,
      id_departamento:             self.id_departamento,
      departamento:                self.departamento,
      id_cargo:                    self.id_cargo,
      cargo:                       self.cargo,
      id_eps:                      self.id_eps,
      eps:                         self.eps,
      id_afp:                      self.id_afp,
      afp:                         self.afp,
      id_arl:                      self.id_arl,
      arl:                         self.arl,
      id_cesantias:                self.id_cesantias,
      cesantias:                   self.cesantias,
      id_institucion:              self.id_institucion,
      institucion:                 self.institucion,
      fecha_afiliacion:            decode_opt_date(self.fecha_afiliacion)?,
      telefono:                    self.telefono,
      correo:                      self.correo,
      foto_afiliado:               self.foto_afiliado,
      created_at:                  decode_dt(&self.created_at)?,
      actas_nombramiento:          Vec::new(),
      actas_posesion:              Vec::new(),
      otros_cargos:                Vec::new(),
    })
  }
}

// ─── Sub-record rows ─────────────────────────────────────────────────────────

/// Read an optional `YYYY-MM-DD` column inside a row-mapping closure.
fn get_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
  let s: Option<String> = row.get(idx)?;
  s.map(|s| {
    NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|e| {
      rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
  })
  .transpose()
}

pub fn acta_nombramiento(row: &Row<'_>) -> rusqlite::Result<ActaNombramiento> {
  Ok(ActaNombramiento {
    id_acta_nombramiento: row.get(0)?,
    id_afiliado:          row.get(1)?,
    tipo_documento:       row.get(2)?,
    numero_resolucion:    row.get(3)?,
    fecha_resolucion:     get_date(row, 4)?,
    archivo:              row.get(5)?,
  })
}

pub fn acta_posesion(row: &Row<'_>) -> rusqlite::Result<ActaPosesion> {
  Ok(ActaPosesion {
    id_acta_posesion: row.get(0)?,
    id_afiliado:      row.get(1)?,
    numero_acta:      row.get(2)?,
    fecha_acta:       get_date(row, 3)?,
    archivo:          row.get(4)?,
  })
}

pub fn otro_cargo(row: &Row<'_>) -> rusqlite::Result<OtroCargo> {
  Ok(OtroCargo {
    id_otro_cargo: row.get(0)?,
    id_afiliado:   row.get(1)?,
    nombre_cargo:  row.get(2)?,
    fecha_inicio:  get_date(row, 3)?,
    fecha_fin:     get_date(row, 4)?,
  })
}

// ─── Dues ────────────────────────────────────────────────────────────────────

/// Dues joined through their affiliate's work municipality to its
/// department.
pub const SELECT_CUOTA: &str = "
  SELECT
    c.id_cuota, c.cedula, a.nombres, a.apellidos, c.mes, c.anio, c.monto,
    d.id_departamento, d.nombre, c.fecha_registro
  FROM cuotas c
  LEFT JOIN afiliados     a ON a.cedula = c.cedula
  LEFT JOIN municipios    m ON m.id_municipio = a.municipio_trabajo
  LEFT JOIN departamentos d ON d.id_departamento = m.id_departamento
";

pub struct RawCuota {
  pub id_cuota:        i64,
  pub cedula:          String,
  pub nombres:         Option<String>,
  pub apellidos:       Option<String>,
  pub mes:             String,
  pub anio:            i32,
  pub monto:           i64,
  pub id_departamento: Option<i64>,
  pub departamento:    Option<String>,
  pub fecha_registro:  String,
}

impl RawCuota {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id_cuota:        row.get(0)?,
      cedula:          row.get(1)?,
      nombres:         row.get(2)?,
      apellidos:       row.get(3)?,
      mes:             row.get(4)?,
      anio:            row.get(5)?,
      monto:           row.get(6)?,
      id_departamento: row.get(7)?,
      departamento:    row.get(8)?,
      fecha_registro:  row.get(9)?,
    })
  }

  pub fn into_cuota(self) -> Result<Cuota> {
    Ok(Cuota {
      id_cuota:        self.id_cuota,
      cedula:          self.cedula,
      nombres:         self.nombres,
      apellidos:       self.apellidos,
      mes:             decode_mes(&self.mes)?,
      anio:            self.anio,
      monto:           self.monto,
      id_departamento: self.id_departamento,
      departamento:    self.departamento,
      fecha_registro:  decode_dt(&self.fecha_registro)?,
    })
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub const SELECT_USUARIO: &str = "
  SELECT id_usuario, username, nombre, rol, id_departamento, password_hash, created_at
  FROM usuarios
";

pub struct RawUsuario {
  pub id_usuario:      i64,
  pub username:        String,
  pub nombre:          String,
  pub rol:             String,
  pub id_departamento: Option<i64>,
  pub password_hash:   String,
  pub created_at:      String,
}

impl RawUsuario {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id_usuario:      row.get(0)?,
      username:        row.get(1)?,
      nombre:          row.get(2)?,
      rol:             row.get(3)?,
      id_departamento: row.get(4)?,
      password_hash:   row.get(5)?,
      created_at:      row.get(6)?,
    })
  }

  pub fn into_usuario(self) -> Result<Usuario> {
    Ok(Usuario {
      id_usuario:      self.id_usuario,
      username:        self.username,
      nombre:          self.nombre,
      rol:             decode_rol(&self.rol)?,
      id_departamento: self.id_departamento,
      password_hash:   self.password_hash,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
