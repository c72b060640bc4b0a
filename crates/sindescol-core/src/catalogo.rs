//! Reference data (departments, municipalities, providers, institutions),
//! positions and the salary scale.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Dimension tables ────────────────────────────────────────────────────────

/// The simple `(id, nombre)` lookup tables.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Catalogo {
  Religiones,
  Eps,
  Afp,
  Arl,
  Cesantias,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCatalogo {
  pub id:     i64,
  pub nombre: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Departamento {
  pub id_departamento: i64,
  pub nombre:          String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Municipio {
  pub id_municipio:    i64,
  pub nombre:          String,
  pub id_departamento: i64,
  pub departamento:    String,
}

/// An educational institution with its contact data and principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Institucion {
  pub id_institucion:          i64,
  pub nombre:                  String,
  pub id_municipio:            Option<i64>,
  pub municipio:               Option<String>,
  pub correo_institucional:    Option<String>,
  pub telefono_institucional:  Option<String>,
  pub direccion_institucional: Option<String>,
  pub rector:                  Option<String>,
}

// ─── Positions ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cargo {
  pub id_cargo: i64,
  pub nombre:   String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCargo {
  pub nombre: String,
}

impl NewCargo {
  pub fn validate(&self) -> Result<()> {
    if self.nombre.trim().is_empty() {
      return Err(Error::MissingField("nombre"));
    }
    Ok(())
  }
}

// ─── Salary scale ────────────────────────────────────────────────────────────

/// Monthly salary of a position in one department for one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Salario {
  pub id_salario:      i64,
  pub id_cargo:        i64,
  pub cargo:           Option<String>,
  pub id_departamento: i64,
  pub departamento:    Option<String>,
  pub anio:            i32,
  pub monto:           i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSalario {
  pub id_cargo:        i64,
  pub id_departamento: i64,
  pub anio:            i32,
  pub monto:           i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SalarioUpdate {
  pub anio:  Option<i32>,
  pub monto: Option<i64>,
}

impl NewSalario {
  pub fn validate(&self) -> Result<()> { crate::cuota::check_periodo(self.anio, self.monto) }
}

impl SalarioUpdate {
  pub fn is_empty(&self) -> bool { self.anio.is_none() && self.monto.is_none() }

  pub fn validate(&self) -> Result<()> {
    crate::cuota::check_periodo(self.anio.unwrap_or(2000), self.monto.unwrap_or(1))
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator as _;

  use super::*;

  #[test]
  fn catalog_names_are_table_names() {
    let names: Vec<String> = Catalogo::iter().map(|c| c.to_string()).collect();
    assert_eq!(names, ["religiones", "eps", "afp", "arl", "cesantias"]);
  }

  #[test]
  fn blank_position_name_is_rejected() {
    assert!(NewCargo { nombre: "  ".into() }.validate().is_err());
    NewCargo { nombre: "Docente de aula".into() }.validate().unwrap();
  }
}
