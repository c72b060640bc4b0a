//! Affiliates, the central entity of the union registry.
//!
//! An affiliate owns its appointment act, possession act and secondary
//! positions. Those sub-records are written only when the affiliate is
//! created; [`AfiliadoUpdate`] carries none of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, blob};

// ─── Sub-records ─────────────────────────────────────────────────────────────

/// Appointment act (acta de nombramiento).
#[derive(Debug, Clone, Serialize)]
pub struct ActaNombramiento {
  pub id_acta_nombramiento: i64,
  pub id_afiliado:          i64,
  pub tipo_documento:       Option<String>,
  pub numero_resolucion:    Option<String>,
  pub fecha_resolucion:     Option<NaiveDate>,
  #[serde(serialize_with = "blob::serialize_opt")]
  pub archivo:              Option<Vec<u8>>,
}

/// Possession act (acta de posesión).
#[derive(Debug, Clone, Serialize)]
pub struct ActaPosesion {
  pub id_acta_posesion: i64,
  pub id_afiliado:      i64,
  pub numero_acta:      Option<String>,
  pub fecha_acta:       Option<NaiveDate>,
  #[serde(serialize_with = "blob::serialize_opt")]
  pub archivo:          Option<Vec<u8>>,
}

/// A position held besides the principal one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtroCargo {
  pub id_otro_cargo: i64,
  pub id_afiliado:   i64,
  pub nombre_cargo:  String,
  pub fecha_inicio:  Option<NaiveDate>,
  pub fecha_fin:     Option<NaiveDate>,
}

// ─── Composed read model ─────────────────────────────────────────────────────

/// The denormalised affiliate: the row itself joined against every dimension
/// it references, plus its dependent records.
#[derive(Debug, Clone, Serialize)]
pub struct Afiliado {
  pub id_afiliado:                 i64,
  pub cedula:                      String,
  pub nombres:                     String,
  pub apellidos:                   String,
  pub fecha_nacimiento:            Option<NaiveDate>,
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
  pub fecha_afiliacion:            Option<NaiveDate>,
  pub telefono:                    Option<String>,
  pub correo:                      Option<String>,
  #[serde(serialize_with = "blob::serialize_opt")]
  pub foto_afiliado:               Option<Vec<u8>>,
  pub created_at:                  DateTime<Utc>,
  pub actas_nombramiento:          Vec<ActaNombramiento>,
  pub actas_posesion:              Vec<ActaPosesion>,
  pub otros_cargos:                Vec<OtroCargo>,
}

impl Afiliado {
  pub fn nombre_completo(&self) -> String {
    format!("{} {}", self.nombres, self.apellidos)
  }
}

// ─── Create payload ──────────────────────────────────────────────────────────

/// One entry of the `otros_cargos` list in a create payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOtroCargo {
  #[serde(default)]
  pub nombre_cargo: Option<String>,
  #[serde(default, deserialize_with = "blob::lenient_date")]
  pub fecha_inicio: Option<NaiveDate>,
  #[serde(default, deserialize_with = "blob::lenient_date")]
  pub fecha_fin:    Option<NaiveDate>,
}

/// Flat create payload, as sent by the registration form.
///
/// Binary fields hold base64 text; see [`NewAfiliado::decode_files`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewAfiliado {
  // personal
  pub cedula:                  String,
  pub nombres:                 String,
  pub apellidos:               String,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_nacimiento:        Option<NaiveDate>,
  pub id_religion:             Option<i64>,
  pub direccion_domicilio:     Option<String>,
  pub municipio_domicilio:     Option<i64>,
  pub direccion_residencia:    Option<String>,
  pub municipio_residencia:    Option<i64>,
  pub telefono:                Option<String>,
  pub correo:                  Option<String>,
  #[serde(deserialize_with = "blob::lenient_text")]
  pub foto_afiliado:           Option<String>,

  // social security and benefits
  pub id_eps:                  Option<i64>,
  pub id_afp:                  Option<i64>,
  pub id_arl:                  Option<i64>,
  pub id_cesantias:            Option<i64>,

  // employment
  pub id_cargo:                Option<i64>,
  pub municipio_trabajo:       Option<i64>,
  pub id_institucion:          Option<i64>,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_afiliacion:        Option<NaiveDate>,
  pub correo_institucional:    Option<String>,
  pub telefono_institucional:  Option<String>,
  pub direccion_institucional: Option<String>,
  pub nombre_rector:           Option<String>,

  // appointment act
  pub tipo_documento:          Option<String>,
  pub numero_resolucion:       Option<String>,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_resolucion:        Option<NaiveDate>,
  #[serde(deserialize_with = "blob::lenient_text")]
  pub archivo_nombramiento:    Option<String>,

  // possession act
  pub numero_acta:             Option<String>,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_acta:              Option<NaiveDate>,
  #[serde(deserialize_with = "blob::lenient_text")]
  pub archivo_posesion:        Option<String>,

  pub otros_cargos:            Vec<NewOtroCargo>,
}

/// The three binary fields of a create payload, decoded.
#[derive(Debug, Default)]
pub struct DecodedFiles {
  pub foto_afiliado:        Option<Vec<u8>>,
  pub archivo_nombramiento: Option<Vec<u8>>,
  pub archivo_posesion:     Option<Vec<u8>>,
}

fn present(s: &Option<String>) -> bool {
  s.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl NewAfiliado {
  /// Reject payloads missing a required field. Runs before any write.
  pub fn validate(&self) -> Result<()> {
    if self.cedula.trim().is_empty() {
      return Err(Error::MissingField("cedula"));
    }
    if self.nombres.trim().is_empty() {
      return Err(Error::MissingField("nombres"));
    }
    if self.apellidos.trim().is_empty() {
      return Err(Error::MissingField("apellidos"));
    }
    if self.id_cargo.is_none() {
      return Err(Error::MissingField("id_cargo"));
    }
    Ok(())
  }

  pub fn decode_files(&self) -> Result<DecodedFiles> {
    Ok(DecodedFiles {
      foto_afiliado:        blob::decode("foto_afiliado", self.foto_afiliado.as_deref())?,
      archivo_nombramiento: blob::decode(
        "archivo_nombramiento",
        self.archivo_nombramiento.as_deref(),
      )?,
      archivo_posesion:     blob::decode("archivo_posesion", self.archivo_posesion.as_deref())?,
    })
  }

  pub fn has_institution_contact(&self) -> bool {
    present(&self.correo_institucional)
      || present(&self.telefono_institucional)
      || present(&self.direccion_institucional)
  }

  pub fn has_acta_nombramiento(&self) -> bool {
    present(&self.tipo_documento)
      || present(&self.numero_resolucion)
      || self.fecha_resolucion.is_some()
      || present(&self.archivo_nombramiento)
  }

  pub fn has_acta_posesion(&self) -> bool {
    present(&self.numero_acta)
      || self.fecha_acta.is_some()
      || present(&self.archivo_posesion)
  }

  /// The principal to record, if both a name and an institution are given.
  pub fn rector(&self) -> Option<(&str, i64)> {
    let nombre = self.nombre_rector.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
    Some((nombre, self.id_institucion?))
  }

  /// Secondary positions with a non-blank name; the rest are dropped.
  pub fn otros_cargos_validos(&self) -> impl Iterator<Item = &NewOtroCargo> {
    self
      .otros_cargos
      .iter()
      .filter(|c| c.nombre_cargo.as_deref().is_some_and(|n| !n.trim().is_empty()))
  }
}

// ─── Update payload ──────────────────────────────────────────────────────────

/// Partial update. Each field is one mutable column; `None` leaves the column
/// untouched. Keys outside this struct (`cedula`, `created_at`, the
/// sub-records, ...) are ignored on deserialisation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AfiliadoUpdate {
  pub nombres:              Option<String>,
  pub apellidos:            Option<String>,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_nacimiento:     Option<NaiveDate>,
  pub id_religion:          Option<i64>,
  pub direccion_domicilio:  Option<String>,
  pub municipio_domicilio:  Option<i64>,
  pub direccion_residencia: Option<String>,
  pub municipio_residencia: Option<i64>,
  pub municipio_trabajo:    Option<i64>,
  pub id_cargo:             Option<i64>,
  pub id_eps:               Option<i64>,
  pub id_afp:               Option<i64>,
  pub id_arl:               Option<i64>,
  pub id_cesantias:         Option<i64>,
  pub id_institucion:       Option<i64>,
  #[serde(deserialize_with = "blob::lenient_date")]
  pub fecha_afiliacion:     Option<NaiveDate>,
  pub telefono:             Option<String>,
  pub correo:               Option<String>,
  #[serde(deserialize_with = "blob::lenient_text")]
  pub foto_afiliado:        Option<String>,
}

impl AfiliadoUpdate {
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [("nombres", &self.nombres), ("apellidos", &self.apellidos)] {
      if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
        return Err(Error::Validation(format!("{field} no puede quedar vacío")));
      }
    }
    Ok(())
  }

  pub fn decode_foto(&self) -> Result<Option<Vec<u8>>> {
    blob::decode("foto_afiliado", self.foto_afiliado.as_deref())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn minimal() -> NewAfiliado {
    serde_json::from_value(serde_json::json!({
      "cedula": "12345678",
      "nombres": "Juan",
      "apellidos": "Pérez",
      "id_cargo": 1,
      "municipio_trabajo": 5
    }))
    .unwrap()
  }

  #[test]
  fn minimal_payload_is_valid_and_has_no_subrecords() {
    let p = minimal();
    p.validate().unwrap();
    assert!(!p.has_acta_nombramiento());
    assert!(!p.has_acta_posesion());
    assert!(!p.has_institution_contact());
    assert!(p.rector().is_none());
    assert_eq!(p.otros_cargos_validos().count(), 0);
  }

  #[test]
  fn missing_position_is_rejected() {
    let mut p = minimal();
    p.id_cargo = None;
    assert!(matches!(p.validate(), Err(Error::MissingField("id_cargo"))));
  }

  #[test]
  fn blank_secondary_positions_are_dropped() {
    let p: NewAfiliado = serde_json::from_value(serde_json::json!({
      "cedula": "1",
      "nombres": "A",
      "apellidos": "B",
      "id_cargo": 1,
      "otros_cargos": [
        { "nombre_cargo": "Coordinador", "fecha_inicio": "2020-01-01" },
        { "nombre_cargo": "   " },
        { "fecha_inicio": "" }
      ]
    }))
    .unwrap();
    let names: Vec<_> = p
      .otros_cargos_validos()
      .filter_map(|c| c.nombre_cargo.as_deref())
      .collect();
    assert_eq!(names, ["Coordinador"]);
  }

  #[test]
  fn rector_needs_an_institution() {
    let mut p = minimal();
    p.nombre_rector = Some("Ana Gómez".into());
    assert!(p.rector().is_none());
    p.id_institucion = Some(3);
    assert_eq!(p.rector(), Some(("Ana Gómez", 3)));
  }

  #[test]
  fn update_ignores_unknown_keys() {
    let u: AfiliadoUpdate = serde_json::from_value(serde_json::json!({
      "cedula": "99999999",
      "created_at": "2000-01-01T00:00:00Z",
      "nombres": "Pedro"
    }))
    .unwrap();
    assert_eq!(u.nombres.as_deref(), Some("Pedro"));
    assert!(u.apellidos.is_none());
  }
}
