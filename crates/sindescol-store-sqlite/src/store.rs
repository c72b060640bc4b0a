//! [`SqliteStore`], the SQLite implementation of [`MembershipStore`].

use std::{path::Path, time::Duration};

use chrono::Utc;
use sindescol_core::{
  afiliado::{Afiliado, AfiliadoUpdate, NewAfiliado},
  catalogo::{
    Cargo, Catalogo, Departamento, Institucion, ItemCatalogo, Municipio, NewCargo, NewSalario,
    Salario, SalarioUpdate,
  },
  cuota::{Cuota, CuotaUpdate, NewCuota},
  store::MembershipStore,
  usuario::{Caller, NewUsuario, Usuario},
};

use crate::{
  Error, Result,
  afiliados::{self, Filtro},
  catalogo, cuotas,
  schema::SCHEMA,
  usuarios,
};

/// Bound on a single database call unless overridden with
/// [`SqliteStore::with_timeout`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

// ─── Store ───────────────────────────────────────────────────────────────────

/// The union registry backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:    tokio_rusqlite::Connection,
  timeout: Duration,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, timeout: DEFAULT_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, timeout: DEFAULT_TIMEOUT };
    store.init_schema().await?;
    Ok(store)
  }

  /// Replace the per-call timeout.
  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
  }

  /// Execute a batch of SQL statements, such as a reference-data seed file.
  pub async fn apply_sql(&self, sql: impl Into<String>) -> Result<()> {
    let sql = sql.into();
    self
      .call(move |conn| {
        conn.execute_batch(&sql)?;
        Ok(())
      })
      .await
  }

  /// Run `f` on the connection thread, bounded by the store timeout.
  ///
  /// On timeout the closure is not cancelled: it still runs to completion
  /// (commit or rollback) on the connection thread.
  pub(crate) async fn call<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let call = self
      .conn
      .call(move |conn| f(conn).map_err(|e| tokio_rusqlite::Error::Other(Box::new(e))));

    match tokio::time::timeout(self.timeout, call).await {
      Ok(result) => Ok(result?),
      Err(_) => {
        tracing::warn!(timeout = ?self.timeout, "database call timed out");
        Err(Error::Timeout(self.timeout))
      }
    }
  }
}

// ─── MembershipStore impl ────────────────────────────────────────────────────

impl MembershipStore for SqliteStore {
  type Error = Error;

  // ── Affiliates ────────────────────────────────────────────────────────────

  async fn list_afiliados(&self) -> Result<Vec<Afiliado>> {
    self.call(|conn| afiliados::select(conn, Filtro::Todos)).await
  }

  async fn get_afiliado(&self, id: i64) -> Result<Option<Afiliado>> {
    self
      .call(move |conn| Ok(afiliados::select(conn, Filtro::Id(id))?.pop()))
      .await
  }

  async fn get_afiliado_by_cedula<'a>(&'a self, cedula: &'a str) -> Result<Option<Afiliado>> {
    let cedula = cedula.trim().to_owned();
    self
      .call(move |conn| Ok(afiliados::select(conn, Filtro::Cedula(&cedula))?.pop()))
      .await
  }

  async fn create_afiliado(&self, input: NewAfiliado) -> Result<Afiliado> {
    input.validate()?;
    let files = input.decode_files()?;
    let cedula = input.cedula.trim().to_owned();
    let now = Utc::now();

    let id = self
      .call(move |conn| afiliados::insert(conn, &input, files, now))
      .await
      .inspect_err(|e| tracing::warn!(%cedula, error = %e, "affiliate create rolled back"))?;

    tracing::info!(id_afiliado = id, %cedula, "affiliate created");
    self
      .get_afiliado(id)
      .await?
      .ok_or_else(|| Error::NotFound("Afiliado".into()))
  }

  async fn update_afiliado(&self, id: i64, input: AfiliadoUpdate) -> Result<Option<Afiliado>> {
    input.validate()?;
    let foto = input.decode_foto()?;
    let cambios = afiliados::columnas(&input, foto);
    let campos = cambios.len();

    let existe = self
      .call(move |conn| afiliados::update(conn, id, cambios))
      .await
      .inspect_err(|e| tracing::warn!(id_afiliado = id, error = %e, "affiliate update rolled back"))?;
    if !existe {
      return Ok(None);
    }

    tracing::debug!(id_afiliado = id, campos, "affiliate updated");
    self.get_afiliado(id).await
  }

  async fn delete_afiliado(&self, id: i64) -> Result<bool> {
    let deleted = self
      .call(move |conn| afiliados::delete(conn, id))
      .await
      .inspect_err(|e| tracing::warn!(id_afiliado = id, error = %e, "affiliate delete rolled back"))?;
    if deleted {
      tracing::info!(id_afiliado = id, "affiliate deleted");
    }
    Ok(deleted)
  }

  // ── Dues ──────────────────────────────────────────────────────────────────

  async fn list_cuotas<'a>(
    &'a self,
    caller: &'a Caller,
    cedula: Option<&'a str>,
  ) -> Result<Vec<Cuota>> {
    let scope = caller.scope();
    let cedula = cedula.map(|c| c.trim().to_owned());
    self
      .call(move |conn| cuotas::select(conn, scope, cedula.as_deref()))
      .await
  }

  async fn get_cuota<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<Option<Cuota>> {
    let scope = caller.scope();
    self.call(move |conn| cuotas::select_one(conn, id, scope)).await
  }

  async fn create_cuota<'a>(&'a self, input: NewCuota, caller: &'a Caller) -> Result<Cuota> {
    input.validate()?;
    let scope = caller.scope();
    let now = Utc::now();

    let id = self
      .call(move |conn| cuotas::insert(conn, &input, scope, now))
      .await
      .inspect_err(|e| tracing::warn!(usuario = %caller.username, error = %e, "due create rejected"))?;

    // Re-read unscoped: a departmental caller just proved access above.
    self
      .call(move |conn| cuotas::select_one(conn, id, None))
      .await?
      .ok_or_else(|| Error::NotFound("Cuota".into()))
  }

  async fn update_cuota<'a>(
    &'a self,
    id: i64,
    input: CuotaUpdate,
    caller: &'a Caller,
  ) -> Result<Option<Cuota>> {
    input.validate()?;
    let scope = caller.scope();

    let found = self
      .call(move |conn| cuotas::update(conn, id, &input, scope))
      .await
      .inspect_err(|e| tracing::warn!(id_cuota = id, error = %e, "due update rolled back"))?;
    if !found {
      return Ok(None);
    }
    self.get_cuota(id, caller).await
  }

  async fn delete_cuota<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<bool> {
    let scope = caller.scope();
    self.call(move |conn| cuotas::delete(conn, id, scope)).await
  }

  // ── Positions ─────────────────────────────────────────────────────────────

  async fn list_cargos(&self) -> Result<Vec<Cargo>> {
    self.call(|conn| catalogo::cargos(conn, None)).await
  }

  async fn get_cargo(&self, id: i64) -> Result<Option<Cargo>> {
    self
      .call(move |conn| Ok(catalogo::cargos(conn, Some(id))?.pop()))
      .await
  }

  async fn create_cargo<'a>(&'a self, input: NewCargo, caller: &'a Caller) -> Result<Cargo> {
    caller.require_admin()?;
    input.validate()?;
    let id = self
      .call(move |conn| catalogo::insert_cargo(conn, &input))
      .await?;
    self
      .get_cargo(id)
      .await?
      .ok_or_else(|| Error::NotFound("Cargo".into()))
  }

  async fn rename_cargo<'a>(
    &'a self,
    id: i64,
    input: NewCargo,
    caller: &'a Caller,
  ) -> Result<Option<Cargo>> {
    caller.require_admin()?;
    input.validate()?;
    let found = self
      .call(move |conn| catalogo::rename_cargo(conn, id, &input))
      .await?;
    if !found {
      return Ok(None);
    }
    self.get_cargo(id).await
  }

  async fn delete_cargo<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<bool> {
    caller.require_admin()?;
    self.call(move |conn| catalogo::delete_cargo(conn, id)).await
  }

  // ── Salary scale ──────────────────────────────────────────────────────────

  async fn list_salarios<'a>(
    &'a self,
    caller: &'a Caller,
    anio: Option<i32>,
  ) -> Result<Vec<Salario>> {
    let scope = caller.scope();
    self
      .call(move |conn| catalogo::salarios(conn, scope, anio))
      .await
  }

  async fn get_salario<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<Option<Salario>> {
    let scope = caller.scope();
    self
      .call(move |conn| catalogo::salario_by_id(conn, id, scope))
      .await
  }

  async fn create_salario<'a>(&'a self, input: NewSalario, caller: &'a Caller) -> Result<Salario> {
    input.validate()?;
    let scope = caller.scope();
    let id = self
      .call(move |conn| catalogo::insert_salario(conn, &input, scope))
      .await?;
    self
      .get_salario(id, caller)
      .await?
      .ok_or_else(|| Error::NotFound("Salario".into()))
  }

  async fn update_salario<'a>(
    &'a self,
    id: i64,
    input: SalarioUpdate,
    caller: &'a Caller,
  ) -> Result<Option<Salario>> {
    input.validate()?;
    let scope = caller.scope();
    if !input.is_empty() {
      let found = self
        .call(move |conn| catalogo::update_salario(conn, id, &input, scope))
        .await?;
      if !found {
        return Ok(None);
      }
    }
    self.get_salario(id, caller).await
  }

  async fn delete_salario<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<bool> {
    let scope = caller.scope();
    self
      .call(move |conn| catalogo::delete_salario(conn, id, scope))
      .await
  }

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn find_usuario<'a>(&'a self, username: &'a str) -> Result<Option<Usuario>> {
    let username = username.to_owned();
    self
      .call(move |conn| usuarios::by_username(conn, &username))
      .await
  }

  async fn count_usuarios(&self) -> Result<u64> { self.call(|conn| usuarios::count(conn)).await }

  async fn list_usuarios<'a>(&'a self, caller: &'a Caller) -> Result<Vec<Usuario>> {
    let scope = caller.scope();
    self.call(move |conn| usuarios::select(conn, scope, None)).await
  }

  async fn get_usuario<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<Option<Usuario>> {
    let scope = caller.scope();
    self
      .call(move |conn| Ok(usuarios::select(conn, scope, Some(id))?.pop()))
      .await
  }

  async fn create_usuario<'a>(
    &'a self,
    input: NewUsuario,
    caller: Option<&'a Caller>,
  ) -> Result<Usuario> {
    input.validate()?;
    let creador = caller.cloned();
    let username = input.username.trim().to_owned();
    let now = Utc::now();

    self
      .call(move |conn| usuarios::insert(conn, &input, creador.as_ref(), now))
      .await?;
    tracing::info!(%username, "user created");

    self
      .find_usuario(&username)
      .await?
      .ok_or_else(|| Error::NotFound("Usuario".into()))
  }

  async fn delete_usuario<'a>(&'a self, id: i64, caller: &'a Caller) -> Result<bool> {
    let caller = caller.clone();
    self.call(move |conn| usuarios::delete(conn, id, &caller)).await
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn list_departamentos(&self) -> Result<Vec<Departamento>> {
    self.call(|conn| catalogo::departamentos(conn)).await
  }

  async fn list_municipios(&self, id_departamento: Option<i64>) -> Result<Vec<Municipio>> {
    self
      .call(move |conn| catalogo::municipios(conn, id_departamento))
      .await
  }

  async fn list_catalogo(&self, cat: Catalogo) -> Result<Vec<ItemCatalogo>> {
    self.call(move |conn| catalogo::catalogo(conn, cat)).await
  }

  async fn list_instituciones(&self) -> Result<Vec<Institucion>> {
    self.call(|conn| catalogo::instituciones(conn, None)).await
  }

  async fn get_institucion(&self, id: i64) -> Result<Option<Institucion>> {
    self
      .call(move |conn| Ok(catalogo::instituciones(conn, Some(id))?.pop()))
      .await
  }
}
