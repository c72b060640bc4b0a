//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use sindescol_core::{
  ErrorKind, StoreError as _,
  afiliado::{AfiliadoUpdate, NewAfiliado, NewOtroCargo},
  blob,
  catalogo::{Catalogo, NewCargo, NewSalario, SalarioUpdate},
  cuota::{CuotaUpdate, Mes, NewCuota},
  store::MembershipStore,
  usuario::{Caller, NewUsuario, Rol},
};

use crate::{Error, SqliteStore};

/// Two departments with one municipality each, two positions, one
/// institution in Medellín and a few providers.
const SEED: &str = "
  INSERT INTO departamentos (id_departamento, nombre) VALUES (1, 'Antioquia'), (2, 'Cundinamarca');
  INSERT INTO municipios (id_municipio, nombre, id_departamento) VALUES (5, 'Medellín', 1), (6, 'Bogotá', 2);
  INSERT INTO cargos (id_cargo, nombre) VALUES (1, 'Docente de aula'), (2, 'Coordinador');
  INSERT INTO religiones (id, nombre) VALUES (1, 'Católica'), (2, 'Ninguna');
  INSERT INTO eps (id, nombre) VALUES (1, 'Sura');
  INSERT INTO instituciones (id_institucion, nombre, id_municipio, correo_institucional)
    VALUES (1, 'IE San José', 5, 'sanjose@edu.co');
";

async fn store() -> SqliteStore {
  let s = SqliteStore::open_in_memory()
    .await
    .expect("in-memory store");
  s.apply_sql(SEED).await.expect("seed");
  s
}

async fn count(s: &SqliteStore, table: &'static str) -> i64 {
  s.call(move |conn| {
    Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
  })
  .await
  .unwrap()
}

fn admin() -> Caller {
  Caller {
    id_usuario:      1,
    username:        "admin".into(),
    rol:             Rol::Admin,
    id_departamento: None,
  }
}

fn departamental(id_departamento: i64) -> Caller {
  Caller {
    id_usuario:      100 + id_departamento,
    username:        format!("dep{id_departamento}"),
    rol:             Rol::Departamental,
    id_departamento: Some(id_departamento),
  }
}

fn juan() -> NewAfiliado {
  NewAfiliado {
    cedula: "12345678".into(),
    nombres: "Juan".into(),
    apellidos: "Pérez".into(),
    id_cargo: Some(1),
    municipio_trabajo: Some(5),
    ..Default::default()
  }
}

/// A payload touching every table a create writes to.
fn completo() -> NewAfiliado {
  NewAfiliado {
    id_institucion: Some(1),
    telefono_institucional: Some("6045551234".into()),
    direccion_institucional: Some("Calle 10 # 20-30".into()),
    nombre_rector: Some("Ana Gómez".into()),
    tipo_documento: Some("Decreto".into()),
    numero_resolucion: Some("0456".into()),
    archivo_nombramiento: Some(blob::encode(b"%PDF-1.4")),
    numero_acta: Some("12".into()),
    otros_cargos: vec![
      NewOtroCargo { nombre_cargo: Some("Jefe de área".into()), ..Default::default() },
      NewOtroCargo { nombre_cargo: Some("Coordinador".into()), ..Default::default() },
    ],
    ..juan()
  }
}

fn cuota(cedula: &str, mes: Mes) -> NewCuota {
  NewCuota { cedula: cedula.into(), mes, anio: 2024, monto: 25_000 }
}

// ─── Affiliates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_returns_composed_record() {
  let s = store().await;

  let a = s.create_afiliado(completo()).await.unwrap();
  assert_eq!(a.cedula, "12345678");
  assert_eq!(a.cargo.as_deref(), Some("Docente de aula"));
  assert_eq!(a.nombre_municipio_trabajo.as_deref(), Some("Medellín"));
  assert_eq!(a.id_departamento, Some(1));
  assert_eq!(a.departamento.as_deref(), Some("Antioquia"));
  assert_eq!(a.institucion.as_deref(), Some("IE San José"));
  assert_eq!(a.actas_nombramiento.len(), 1);
  assert_eq!(a.actas_nombramiento[0].archivo.as_deref(), Some(&b"%PDF-1.4"[..]));
  assert_eq!(a.actas_posesion.len(), 1);
  assert_eq!(a.otros_cargos.len(), 2);

  let inst = s.get_institucion(1).await.unwrap().unwrap();
  assert_eq!(inst.correo_institucional.as_deref(), Some("sanjose@edu.co"));
  assert_eq!(inst.telefono_institucional.as_deref(), Some("6045551234"));
  assert_eq!(inst.rector.as_deref(), Some("Ana Gómez"));
}

#[tokio::test]
async fn minimal_create_writes_no_subrecords() {
  let s = store().await;
  let a = s.create_afiliado(juan()).await.unwrap();

  assert!(a.actas_nombramiento.is_empty());
  assert!(a.actas_posesion.is_empty());
  assert!(a.otros_cargos.is_empty());
  assert_eq!(count(&s, "rectores").await, 0);
}

#[tokio::test]
async fn failed_create_leaves_no_trace() {
  let s = store().await;
  s.apply_sql(
    "CREATE TRIGGER otro_cargo_falla BEFORE INSERT ON otros_cargos
     WHEN NEW.nombre_cargo = 'FALLA'
     BEGIN SELECT RAISE(ABORT, 'forzado'); END;",
  )
  .await
  .unwrap();

  let mut input = completo();
  input.otros_cargos.push(NewOtroCargo { nombre_cargo: Some("FALLA".into()), ..Default::default() });

  assert!(s.create_afiliado(input).await.is_err());

  for table in ["afiliados", "actas_nombramiento", "actas_posesion", "otros_cargos", "rectores"] {
    assert_eq!(count(&s, table).await, 0, "{table} should be empty");
  }
  let inst = s.get_institucion(1).await.unwrap().unwrap();
  assert_eq!(inst.telefono_institucional, None);
  assert_eq!(inst.direccion_institucional, None);
}

#[tokio::test]
async fn duplicate_cedula_is_a_conflict() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();

  let mut otro = completo();
  otro.nombres = "Juana".into();
  let err = s.create_afiliado(otro).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  assert_eq!(count(&s, "afiliados").await, 1);
  assert_eq!(count(&s, "otros_cargos").await, 0);
  assert_eq!(count(&s, "rectores").await, 0);
}

#[tokio::test]
async fn missing_required_field_is_rejected_before_writing() {
  let s = store().await;
  let mut input = juan();
  input.id_cargo = None;

  let err = s.create_afiliado(input).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(count(&s, "afiliados").await, 0);
}

#[tokio::test]
async fn malformed_base64_is_rejected_before_writing() {
  let s = store().await;
  let mut input = juan();
  input.foto_afiliado = Some("%%% no es base64 %%%".into());

  let err = s.create_afiliado(input).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
  assert_eq!(count(&s, "afiliados").await, 0);
}

#[tokio::test]
async fn first_principal_wins() {
  let s = store().await;

  let mut primero = juan();
  primero.id_institucion = Some(1);
  primero.nombre_rector = Some("Ana Gómez".into());
  s.create_afiliado(primero).await.unwrap();

  let mut segundo = juan();
  segundo.cedula = "87654321".into();
  segundo.id_institucion = Some(1);
  segundo.nombre_rector = Some("Beatriz Ruiz".into());
  s.create_afiliado(segundo).await.unwrap();

  assert_eq!(count(&s, "rectores").await, 1);
  let inst = s.get_institucion(1).await.unwrap().unwrap();
  assert_eq!(inst.rector.as_deref(), Some("Ana Gómez"));
}

#[tokio::test]
async fn portrait_bytes_survive_a_roundtrip() {
  let s = store().await;
  let bytes: Vec<u8> = (0u8..10).collect();

  let mut input = juan();
  input.foto_afiliado = Some(format!("data:image/png;base64,{}", blob::encode(&bytes)));
  let a = s.create_afiliado(input).await.unwrap();

  let read = s.get_afiliado(a.id_afiliado).await.unwrap().unwrap();
  assert_eq!(read.foto_afiliado.as_deref(), Some(&bytes[..]));
}

#[tokio::test]
async fn lookups_by_id_and_cedula() {
  let s = store().await;
  let a = s.create_afiliado(juan()).await.unwrap();

  let by_cedula = s.get_afiliado_by_cedula(" 12345678 ").await.unwrap().unwrap();
  assert_eq!(by_cedula.id_afiliado, a.id_afiliado);
  assert!(s.get_afiliado(a.id_afiliado + 1).await.unwrap().is_none());
  assert!(s.get_afiliado_by_cedula("000").await.unwrap().is_none());
  assert_eq!(s.list_afiliados().await.unwrap().len(), 1);
}

#[tokio::test]
async fn update_changes_only_the_given_columns() {
  let s = store().await;
  let a = s.create_afiliado(completo()).await.unwrap();

  let cambios = AfiliadoUpdate {
    nombres: Some("Juan Carlos".into()),
    telefono: Some("3001234567".into()),
    municipio_trabajo: Some(6),
    ..Default::default()
  };
  let b = s.update_afiliado(a.id_afiliado, cambios).await.unwrap().unwrap();

  assert_eq!(b.nombres, "Juan Carlos");
  assert_eq!(b.telefono.as_deref(), Some("3001234567"));
  assert_eq!(b.departamento.as_deref(), Some("Cundinamarca"));
  assert_eq!(b.cedula, a.cedula);
  assert_eq!(b.created_at, a.created_at);
  assert_eq!(b.apellidos, a.apellidos);
  // Sub-records are not touched by an update.
  assert_eq!(b.otros_cargos.len(), 2);
}

#[tokio::test]
async fn empty_update_is_a_noop() {
  let s = store().await;
  let a = s.create_afiliado(juan()).await.unwrap();

  let b = s
    .update_afiliado(a.id_afiliado, AfiliadoUpdate::default())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(b.nombres, a.nombres);
  assert_eq!(b.created_at, a.created_at);
}

#[tokio::test]
async fn update_of_missing_affiliate_is_none() {
  let s = store().await;
  let cambios = AfiliadoUpdate { nombres: Some("X".into()), ..Default::default() };
  assert!(s.update_afiliado(42, cambios).await.unwrap().is_none());
  assert!(s.update_afiliado(42, AfiliadoUpdate::default()).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_everything_owned() {
  let s = store().await;
  let a = s.create_afiliado(completo()).await.unwrap();
  s.create_cuota(cuota("12345678", Mes::Enero), &admin()).await.unwrap();

  assert!(s.delete_afiliado(a.id_afiliado).await.unwrap());

  for table in ["afiliados", "actas_nombramiento", "actas_posesion", "otros_cargos", "cuotas"] {
    assert_eq!(count(&s, table).await, 0, "{table} should be empty");
  }
  // The principal belongs to the institution, not the affiliate.
  assert_eq!(count(&s, "rectores").await, 1);

  assert!(!s.delete_afiliado(999_999).await.unwrap());
}

#[tokio::test]
async fn failed_delete_keeps_everything_owned() {
  let s = store().await;
  let a = s.create_afiliado(completo()).await.unwrap();
  s.create_cuota(cuota("12345678", Mes::Enero), &admin()).await.unwrap();
  s.apply_sql(
    "CREATE TRIGGER afiliado_no_se_borra BEFORE DELETE ON afiliados
     BEGIN SELECT RAISE(ABORT, 'forzado'); END;",
  )
  .await
  .unwrap();

  let tables = ["afiliados", "actas_nombramiento", "actas_posesion", "otros_cargos", "cuotas"];
  let mut before = Vec::new();
  for table in tables {
    before.push(count(&s, table).await);
  }

  assert!(s.delete_afiliado(a.id_afiliado).await.is_err());

  for (table, expected) in tables.into_iter().zip(before) {
    assert!(expected > 0, "{table} should have been populated");
    assert_eq!(count(&s, table).await, expected, "{table} should be untouched");
  }
  assert!(s.get_afiliado(a.id_afiliado).await.unwrap().is_some());
}

// ─── Dues ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn departamental_caller_cannot_pay_for_another_department() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap(); // works in Medellín, department 1

  let err = s
    .create_cuota(cuota("12345678", Mes::Marzo), &departamental(2))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
  assert_eq!(count(&s, "cuotas").await, 0);

  // An unknown cedula is not revealed to a departmental caller.
  let err = s
    .create_cuota(cuota("000", Mes::Marzo), &departamental(1))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn admin_gets_not_found_for_unknown_affiliate() {
  let s = store().await;
  let err = s.create_cuota(cuota("000", Mes::Marzo), &admin()).await.unwrap_err();
  assert!(matches!(err, Error::AfiliadoNotFound(ref c) if c == "000"));
  assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn duplicate_period_is_a_conflict() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();

  let c = s
    .create_cuota(cuota("12345678", Mes::Abril), &departamental(1))
    .await
    .unwrap();
  assert_eq!(c.mes, Mes::Abril);
  assert_eq!(c.departamento.as_deref(), Some("Antioquia"));
  assert_eq!(c.nombres.as_deref(), Some("Juan"));

  let err = s.create_cuota(cuota("12345678", Mes::Abril), &admin()).await.unwrap_err();
  assert!(matches!(err, Error::CuotaDuplicada { mes: Mes::Abril, anio: 2024, .. }));
  assert_eq!(err.kind(), ErrorKind::Conflict);
  assert_eq!(count(&s, "cuotas").await, 1);
}

#[tokio::test]
async fn unique_constraint_backs_the_duplicate_check() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();
  s.create_cuota(cuota("12345678", Mes::Mayo), &admin()).await.unwrap();

  let err = s
    .apply_sql(
      "INSERT INTO cuotas (cedula, mes, anio, monto, fecha_registro)
       VALUES ('12345678', 'mayo', 2024, 1, '2024-05-01T00:00:00+00:00')",
    )
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn dues_are_scoped_to_the_callers_department() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();
  let mut bogotano = juan();
  bogotano.cedula = "222".into();
  bogotano.municipio_trabajo = Some(6);
  s.create_afiliado(bogotano).await.unwrap();

  let c1 = s.create_cuota(cuota("12345678", Mes::Enero), &admin()).await.unwrap();
  s.create_cuota(cuota("222", Mes::Enero), &admin()).await.unwrap();

  assert_eq!(s.list_cuotas(&admin(), None).await.unwrap().len(), 2);
  assert_eq!(s.list_cuotas(&admin(), Some("222")).await.unwrap().len(), 1);

  let propias = s.list_cuotas(&departamental(1), None).await.unwrap();
  assert_eq!(propias.len(), 1);
  assert_eq!(propias[0].cedula, "12345678");

  assert!(s.get_cuota(c1.id_cuota, &departamental(2)).await.unwrap().is_none());
  assert!(!s.delete_cuota(c1.id_cuota, &departamental(2)).await.unwrap());
  assert!(s.delete_cuota(c1.id_cuota, &departamental(1)).await.unwrap());
}

#[tokio::test]
async fn due_update_respects_period_uniqueness() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();
  s.create_cuota(cuota("12345678", Mes::Enero), &admin()).await.unwrap();
  let feb = s.create_cuota(cuota("12345678", Mes::Febrero), &admin()).await.unwrap();

  let err = s
    .update_cuota(feb.id_cuota, CuotaUpdate { mes: Some(Mes::Enero), ..Default::default() }, &admin())
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let updated = s
    .update_cuota(feb.id_cuota, CuotaUpdate { monto: Some(30_000), ..Default::default() }, &admin())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(updated.mes, Mes::Febrero);
  assert_eq!(updated.monto, 30_000);

  let same = s
    .update_cuota(feb.id_cuota, CuotaUpdate::default(), &admin())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(same.monto, 30_000);

  assert!(
    s.update_cuota(feb.id_cuota, CuotaUpdate::default(), &departamental(2))
      .await
      .unwrap()
      .is_none()
  );
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();
  let mut c = cuota("12345678", Mes::Junio);
  c.monto = 0;
  let err = s.create_cuota(c, &admin()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);
}

// ─── Positions and salaries ──────────────────────────────────────────────────

#[tokio::test]
async fn positions_are_admin_only_to_write() {
  let s = store().await;
  let nuevo = NewCargo { nombre: "Orientador".into() };

  let err = s.create_cargo(nuevo.clone(), &departamental(1)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  let cargo = s.create_cargo(nuevo.clone(), &admin()).await.unwrap();
  assert_eq!(cargo.nombre, "Orientador");

  let err = s.create_cargo(nuevo, &admin()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  let renamed = s
    .rename_cargo(cargo.id_cargo, NewCargo { nombre: "Docente orientador".into() }, &admin())
    .await
    .unwrap()
    .unwrap();
  assert_eq!(renamed.nombre, "Docente orientador");
  assert!(s.delete_cargo(cargo.id_cargo, &admin()).await.unwrap());
  assert_eq!(s.list_cargos().await.unwrap().len(), 2);
}

#[tokio::test]
async fn referenced_position_cannot_be_deleted() {
  let s = store().await;
  s.create_afiliado(juan()).await.unwrap();

  let err = s.delete_cargo(1, &admin()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);
  assert!(s.get_cargo(1).await.unwrap().is_some());
}

#[tokio::test]
async fn salaries_are_scoped() {
  let s = store().await;
  let nuevo = |id_departamento| NewSalario { id_cargo: 1, id_departamento, anio: 2024, monto: 3_500_000 };

  let err = s.create_salario(nuevo(2), &departamental(1)).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  let propio = s.create_salario(nuevo(1), &departamental(1)).await.unwrap();
  assert_eq!(propio.cargo.as_deref(), Some("Docente de aula"));
  assert_eq!(propio.departamento.as_deref(), Some("Antioquia"));
  s.create_salario(nuevo(2), &admin()).await.unwrap();

  let err = s.create_salario(nuevo(2), &admin()).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  assert_eq!(s.list_salarios(&admin(), Some(2024)).await.unwrap().len(), 2);
  assert_eq!(s.list_salarios(&admin(), Some(2023)).await.unwrap().len(), 0);
  assert_eq!(s.list_salarios(&departamental(1), None).await.unwrap().len(), 1);

  let subido = SalarioUpdate { monto: Some(3_800_000), ..Default::default() };
  assert!(
    s.update_salario(propio.id_salario, subido.clone(), &departamental(2))
      .await
      .unwrap()
      .is_none()
  );
  let actualizado = s
    .update_salario(propio.id_salario, subido, &departamental(1))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(actualizado.monto, 3_800_000);
  assert!(!s.delete_salario(propio.id_salario, &departamental(2)).await.unwrap());
  assert!(s.delete_salario(propio.id_salario, &departamental(1)).await.unwrap());
}

// ─── Users ───────────────────────────────────────────────────────────────────

fn usuario(username: &str, rol: Rol, id_departamento: Option<i64>) -> NewUsuario {
  NewUsuario {
    username: username.into(),
    nombre: username.to_uppercase(),
    rol,
    id_departamento,
    password_hash: "$argon2id$placeholder".into(),
  }
}

#[tokio::test]
async fn bootstrap_and_lookup() {
  let s = store().await;
  assert_eq!(s.count_usuarios().await.unwrap(), 0);

  let u = s.create_usuario(usuario("admin", Rol::Admin, Some(1)), None).await.unwrap();
  assert_eq!(u.rol, Rol::Admin);
  assert_eq!(u.id_departamento, None);
  assert_eq!(s.count_usuarios().await.unwrap(), 1);

  let found = s.find_usuario("admin").await.unwrap().unwrap();
  assert_eq!(found.password_hash, "$argon2id$placeholder");
  assert!(s.find_usuario("nadie").await.unwrap().is_none());
}

#[tokio::test]
async fn departamental_users_manage_only_their_department() {
  let s = store().await;
  let dep1 = departamental(1);

  let err = s
    .create_usuario(usuario("jefe", Rol::Admin, None), Some(&dep1))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  let err = s
    .create_usuario(usuario("vecino", Rol::Departamental, Some(2)), Some(&dep1))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);

  let err = s
    .create_usuario(usuario("sin_dep", Rol::Departamental, None), Some(&admin()))
    .await
    .unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Validation);

  let propio = s
    .create_usuario(usuario("auxiliar", Rol::Departamental, Some(1)), Some(&dep1))
    .await
    .unwrap();
  let ajeno = s
    .create_usuario(usuario("otro", Rol::Departamental, Some(2)), Some(&admin()))
    .await
    .unwrap();

  let err = s.create_usuario(usuario("otro", Rol::Departamental, Some(2)), Some(&admin())).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Conflict);

  assert_eq!(s.list_usuarios(&admin()).await.unwrap().len(), 2);
  let visibles = s.list_usuarios(&dep1).await.unwrap();
  assert_eq!(visibles.len(), 1);
  assert_eq!(visibles[0].username, "auxiliar");
  assert!(s.get_usuario(ajeno.id_usuario, &dep1).await.unwrap().is_none());

  assert!(!s.delete_usuario(ajeno.id_usuario, &dep1).await.unwrap());
  assert!(s.delete_usuario(propio.id_usuario, &dep1).await.unwrap());
}

#[tokio::test]
async fn callers_cannot_delete_themselves() {
  let s = store().await;
  let u = s.create_usuario(usuario("admin", Rol::Admin, None), None).await.unwrap();
  let yo = Caller::from(&u);

  let err = s.delete_usuario(u.id_usuario, &yo).await.unwrap_err();
  assert_eq!(err.kind(), ErrorKind::Forbidden);
}

// ─── Reference data ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reference_lists() {
  let s = store().await;

  let deps = s.list_departamentos().await.unwrap();
  assert_eq!(deps.len(), 2);
  assert_eq!(deps[0].nombre, "Antioquia");

  assert_eq!(s.list_municipios(None).await.unwrap().len(), 2);
  let bogota = s.list_municipios(Some(2)).await.unwrap();
  assert_eq!(bogota.len(), 1);
  assert_eq!(bogota[0].departamento, "Cundinamarca");

  let religiones = s.list_catalogo(Catalogo::Religiones).await.unwrap();
  assert_eq!(religiones.len(), 2);
  assert!(s.list_catalogo(Catalogo::Cesantias).await.unwrap().is_empty());

  assert_eq!(s.list_instituciones().await.unwrap().len(), 1);
  assert!(s.get_institucion(2).await.unwrap().is_none());
}

// ─── Timeouts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn slow_call_times_out() {
  let s = store().await;
  let impaciente = s.clone().with_timeout(Duration::from_millis(10));

  let err = impaciente
    .apply_sql(
      "CREATE TEMP TABLE lento AS
       WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n WHERE x < 5000000)
       SELECT COUNT(*) AS total FROM n;",
    )
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Timeout(_)));
  assert_eq!(err.kind(), ErrorKind::Timeout);

  // The abandoned statement still completes on the connection thread.
  let paciente = s.with_timeout(Duration::from_secs(60));
  assert_eq!(paciente.list_cargos().await.unwrap().len(), 2);
}
