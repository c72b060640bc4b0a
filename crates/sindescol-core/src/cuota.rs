//! Dues (cuotas). A due points at its affiliate by national ID, not by the
//! affiliate's row id; historical data and imports key off `cedula`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use strum::{AsRefStr, Display, EnumString, VariantNames};

use crate::{Error, Result};

/// Calendar month, stored and transported by its lowercase Spanish name.
/// Input is accepted in any case.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display, EnumString, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mes {
  Enero,
  Febrero,
  Marzo,
  Abril,
  Mayo,
  Junio,
  Julio,
  Agosto,
  Septiembre,
  Octubre,
  Noviembre,
  Diciembre,
}

impl<'de> Deserialize<'de> for Mes {
  fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
    let nombre = String::deserialize(d)?;
    nombre.parse().map_err(|_| de::Error::unknown_variant(&nombre, Self::VARIANTS))
  }
}

/// A due joined with its affiliate and the affiliate's department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cuota {
  pub id_cuota:        i64,
  pub cedula:          String,
  pub nombres:         Option<String>,
  pub apellidos:       Option<String>,
  pub mes:             Mes,
  pub anio:            i32,
  pub monto:           i64,
  pub id_departamento: Option<i64>,
  pub departamento:    Option<String>,
  pub fecha_registro:  DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCuota {
  pub cedula: String,
  pub mes:    Mes,
  pub anio:   i32,
  pub monto:  i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CuotaUpdate {
  pub mes:   Option<Mes>,
  pub anio:  Option<i32>,
  pub monto: Option<i64>,
}

pub(crate) fn check_periodo(anio: i32, monto: i64) -> Result<()> {
  if !(1900..=2100).contains(&anio) {
    return Err(Error::Validation(format!("año fuera de rango: {anio}")));
  }
  if monto <= 0 {
    return Err(Error::Validation("el monto debe ser mayor que cero".into()));
  }
  Ok(())
}

impl NewCuota {
  pub fn validate(&self) -> Result<()> {
    if self.cedula.trim().is_empty() {
      return Err(Error::MissingField("cedula"));
    }
    check_periodo(self.anio, self.monto)
  }
}

impl CuotaUpdate {
  pub fn is_empty(&self) -> bool {
    self.mes.is_none() && self.anio.is_none() && self.monto.is_none()
  }

  pub fn validate(&self) -> Result<()> {
    check_periodo(self.anio.unwrap_or(2000), self.monto.unwrap_or(1))
  }
}

#[cfg(test)]
mod tests {
  use std::str::FromStr as _;

  use super::*;

  #[test]
  fn month_names_roundtrip_through_strum_and_serde() {
    assert_eq!(Mes::Septiembre.as_ref(), "septiembre");
    assert_eq!(Mes::from_str("Marzo").unwrap(), Mes::Marzo);
    assert_eq!(serde_json::to_string(&Mes::Enero).unwrap(), "\"enero\"");
    assert!(Mes::from_str("brumario").is_err());
  }

  #[test]
  fn month_input_is_case_insensitive() {
    assert_eq!(serde_json::from_str::<Mes>("\"Marzo\"").unwrap(), Mes::Marzo);
    assert_eq!(serde_json::from_str::<Mes>("\"DICIEMBRE\"").unwrap(), Mes::Diciembre);
    let c: NewCuota =
      serde_json::from_str(r#"{"cedula":"1","mes":"Abril","anio":2024,"monto":1}"#).unwrap();
    assert_eq!(c.mes, Mes::Abril);
    assert!(serde_json::from_str::<Mes>("\"brumario\"").is_err());
  }

  #[test]
  fn due_amount_and_year_are_checked() {
    let mut c = NewCuota { cedula: "1".into(), mes: Mes::Enero, anio: 2024, monto: 15_000 };
    c.validate().unwrap();

    c.monto = 0;
    assert!(matches!(c.validate(), Err(Error::Validation(_))));

    c.monto = 1;
    c.anio = 1850;
    assert!(matches!(c.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn partial_due_update_checks_only_supplied_fields() {
    assert!(CuotaUpdate::default().is_empty());
    CuotaUpdate { monto: Some(20_000), ..Default::default() }.validate().unwrap();
    assert!(CuotaUpdate { monto: Some(-5), ..Default::default() }.validate().is_err());
  }
}
