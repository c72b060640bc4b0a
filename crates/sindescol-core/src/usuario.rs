//! API users and the caller identity derived from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::{Error, Result};

/// `Admin` is unrestricted; `Departamental` sees and edits only the rows of
/// one department.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Rol {
  Admin,
  Departamental,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
  pub id_usuario:      i64,
  pub username:        String,
  pub nombre:          String,
  pub rol:             Rol,
  pub id_departamento: Option<i64>,
  /// argon2 PHC string. Never leaves the server.
  #[serde(skip_serializing, default)]
  pub password_hash:   String,
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::MembershipStore::create_usuario`].
/// The password has already been hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUsuario {
  pub username:        String,
  pub nombre:          String,
  pub rol:             Rol,
  pub id_departamento: Option<i64>,
  pub password_hash:   String,
}

impl NewUsuario {
  pub fn validate(&self) -> Result<()> {
    if self.username.trim().is_empty() {
      return Err(Error::MissingField("username"));
    }
    if self.rol == Rol::Departamental && self.id_departamento.is_none() {
      return Err(Error::Validation(
        "un usuario departamental necesita id_departamento".into(),
      ));
    }
    Ok(())
  }
}

/// Who is making a request. Built from an authenticated [`Usuario`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
  pub id_usuario:      i64,
  pub username:        String,
  pub rol:             Rol,
  pub id_departamento: Option<i64>,
}

impl Caller {
  pub fn is_admin(&self) -> bool { self.rol == Rol::Admin }

  /// The department filter to apply to role-scoped reads: `None` means
  /// unrestricted.
  ///
  /// A departmental caller without a department gets a filter that matches
  /// nothing.
  pub fn scope(&self) -> Option<i64> {
    if self.is_admin() {
      None
    } else {
      Some(self.id_departamento.unwrap_or(-1))
    }
  }

  /// Whether a row belonging to `departamento` is visible to this caller.
  pub fn can_access(&self, departamento: Option<i64>) -> bool {
    match self.scope() {
      None => true,
      Some(own) => departamento == Some(own),
    }
  }

  pub fn require_admin(&self) -> Result<()> {
    if self.is_admin() {
      Ok(())
    } else {
      Err(Error::Forbidden("operación reservada a administradores".into()))
    }
  }
}

impl From<&Usuario> for Caller {
  fn from(u: &Usuario) -> Self {
    Self {
      id_usuario:      u.id_usuario,
      username:        u.username.clone(),
      rol:             u.rol,
      id_departamento: u.id_departamento,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn caller(rol: Rol, dep: Option<i64>) -> Caller {
    Caller { id_usuario: 1, username: "u".into(), rol, id_departamento: dep }
  }

  #[test]
  fn admin_is_unscoped() {
    let c = caller(Rol::Admin, None);
    assert_eq!(c.scope(), None);
    assert!(c.can_access(Some(7)));
    assert!(c.can_access(None));
    c.require_admin().unwrap();
  }

  #[test]
  fn departamental_sees_only_its_department() {
    let c = caller(Rol::Departamental, Some(7));
    assert_eq!(c.scope(), Some(7));
    assert!(c.can_access(Some(7)));
    assert!(!c.can_access(Some(8)));
    assert!(!c.can_access(None));
    assert!(matches!(c.require_admin(), Err(Error::Forbidden(_))));
  }

  #[test]
  fn departamental_user_requires_department() {
    let u = NewUsuario {
      username:        "maria".into(),
      nombre:          "María".into(),
      rol:             Rol::Departamental,
      id_departamento: None,
      password_hash:   "x".into(),
    };
    assert!(matches!(u.validate(), Err(Error::Validation(_))));
  }
}
