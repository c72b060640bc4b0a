//! The `MembershipStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `sindescol-store-sqlite`). The HTTP layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  StoreError,
  afiliado::{Afiliado, AfiliadoUpdate, NewAfiliado},
  catalogo::{
    Cargo, Catalogo, Departamento, Institucion, ItemCatalogo, Municipio, NewCargo, NewSalario,
    Salario, SalarioUpdate,
  },
  cuota::{Cuota, CuotaUpdate, NewCuota},
  usuario::{Caller, NewUsuario, Usuario},
};

/// Abstraction over the union registry backend.
///
/// Multi-statement operations (affiliate create/update/delete, due create)
/// are atomic: either every statement commits or none does.
///
/// Role-scoped operations take the [`Caller`]; rows outside the caller's
/// department behave as if they did not exist, except on create, where the
/// attempt is rejected as forbidden.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait MembershipStore: Send + Sync {
  type Error: StoreError;

  // ── Affiliates ────────────────────────────────────────────────────────

  fn list_afiliados(
    &self,
  ) -> impl Future<Output = Result<Vec<Afiliado>, Self::Error>> + Send + '_;

  fn get_afiliado(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Afiliado>, Self::Error>> + Send + '_;

  fn get_afiliado_by_cedula<'a>(
    &'a self,
    cedula: &'a str,
  ) -> impl Future<Output = Result<Option<Afiliado>, Self::Error>> + Send + 'a;

  /// Create an affiliate together with its acts, secondary positions,
  /// institution contact data and principal, in one transaction. Returns
  /// the composed record as re-read after commit.
  fn create_afiliado(
    &self,
    input: NewAfiliado,
  ) -> impl Future<Output = Result<Afiliado, Self::Error>> + Send + '_;

  /// Apply a partial update. An empty update is a no-op. Returns `None` if
  /// the affiliate does not exist.
  fn update_afiliado(
    &self,
    id: i64,
    input: AfiliadoUpdate,
  ) -> impl Future<Output = Result<Option<Afiliado>, Self::Error>> + Send + '_;

  /// Delete an affiliate and everything it owns, including its dues.
  /// Returns `false` if there was no such affiliate.
  fn delete_afiliado(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Dues ──────────────────────────────────────────────────────────────

  fn list_cuotas<'a>(
    &'a self,
    caller: &'a Caller,
    cedula: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Cuota>, Self::Error>> + Send + 'a;

  fn get_cuota<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Cuota>, Self::Error>> + Send + 'a;

  /// Record a due. Fails as forbidden if the affiliate lies outside the
  /// caller's department, and as a conflict if the period is already paid.
  fn create_cuota<'a>(
    &'a self,
    input: NewCuota,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Cuota, Self::Error>> + Send + 'a;

  fn update_cuota<'a>(
    &'a self,
    id: i64,
    input: CuotaUpdate,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Cuota>, Self::Error>> + Send + 'a;

  fn delete_cuota<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Positions ─────────────────────────────────────────────────────────

  fn list_cargos(&self) -> impl Future<Output = Result<Vec<Cargo>, Self::Error>> + Send + '_;

  fn get_cargo(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Cargo>, Self::Error>> + Send + '_;

  fn create_cargo<'a>(
    &'a self,
    input: NewCargo,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Cargo, Self::Error>> + Send + 'a;

  fn rename_cargo<'a>(
    &'a self,
    id: i64,
    input: NewCargo,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Cargo>, Self::Error>> + Send + 'a;

  fn delete_cargo<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Salary scale ──────────────────────────────────────────────────────

  fn list_salarios<'a>(
    &'a self,
    caller: &'a Caller,
    anio: Option<i32>,
  ) -> impl Future<Output = Result<Vec<Salario>, Self::Error>> + Send + 'a;

  fn get_salario<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Salario>, Self::Error>> + Send + 'a;

  fn create_salario<'a>(
    &'a self,
    input: NewSalario,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Salario, Self::Error>> + Send + 'a;

  fn update_salario<'a>(
    &'a self,
    id: i64,
    input: SalarioUpdate,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Salario>, Self::Error>> + Send + 'a;

  fn delete_salario<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Unscoped lookup used to authenticate a request.
  fn find_usuario<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Usuario>, Self::Error>> + Send + 'a;

  fn count_usuarios(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn list_usuarios<'a>(
    &'a self,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Vec<Usuario>, Self::Error>> + Send + 'a;

  fn get_usuario<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<Option<Usuario>, Self::Error>> + Send + 'a;

  /// Create a user. `caller` is `None` only when bootstrapping the first
  /// administrator.
  fn create_usuario<'a>(
    &'a self,
    input: NewUsuario,
    caller: Option<&'a Caller>,
  ) -> impl Future<Output = Result<Usuario, Self::Error>> + Send + 'a;

  fn delete_usuario<'a>(
    &'a self,
    id: i64,
    caller: &'a Caller,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  // ── Reference data ────────────────────────────────────────────────────

  fn list_departamentos(
    &self,
  ) -> impl Future<Output = Result<Vec<Departamento>, Self::Error>> + Send + '_;

  fn list_municipios(
    &self,
    id_departamento: Option<i64>,
  ) -> impl Future<Output = Result<Vec<Municipio>, Self::Error>> + Send + '_;

  fn list_catalogo(
    &self,
    catalogo: Catalogo,
  ) -> impl Future<Output = Result<Vec<ItemCatalogo>, Self::Error>> + Send + '_;

  fn list_instituciones(
    &self,
  ) -> impl Future<Output = Result<Vec<Institucion>, Self::Error>> + Send + '_;

  fn get_institucion(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Institucion>, Self::Error>> + Send + '_;
}
