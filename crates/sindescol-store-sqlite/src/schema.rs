//! SQL schema for the SINDESCOL SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departamentos (
    id_departamento INTEGER PRIMARY KEY,
    nombre          TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS municipios (
    id_municipio    INTEGER PRIMARY KEY,
    nombre          TEXT NOT NULL,
    id_departamento INTEGER NOT NULL REFERENCES departamentos(id_departamento)
);

-- Simple lookup tables; all share the (id, nombre) shape.
CREATE TABLE IF NOT EXISTS religiones (id INTEGER PRIMARY KEY, nombre TEXT NOT NULL UNIQUE);
CREATE TABLE IF NOT EXISTS eps        (id INTEGER PRIMARY KEY, nombre TEXT NOT NULL UNIQUE);
CREATE TABLE IF NOT EXISTS afp        (id INTEGER PRIMARY KEY, nombre TEXT NOT NULL UNIQUE);
CREATE TABLE IF NOT EXISTS arl        (id INTEGER PRIMARY KEY, nombre TEXT NOT NULL UNIQUE);
CREATE TABLE IF NOT EXISTS cesantias  (id INTEGER PRIMARY KEY, nombre TEXT NOT NULL UNIQUE);

CREATE TABLE IF NOT EXISTS instituciones (
    id_institucion          INTEGER PRIMARY KEY,
    nombre                  TEXT NOT NULL,
    id_municipio            INTEGER REFERENCES municipios(id_municipio),
    correo_institucional    TEXT,
    telefono_institucional  TEXT,
    direccion_institucional TEXT
);

-- At most one principal per institution; the first one recorded wins.
CREATE TABLE IF NOT EXISTS rectores (
    id_rector      INTEGER PRIMARY KEY,
    nombre         TEXT NOT NULL,
    id_institucion INTEGER NOT NULL UNIQUE REFERENCES instituciones(id_institucion)
);

CREATE TABLE IF NOT EXISTS cargos (
    id_cargo INTEGER PRIMARY KEY,
    nombre   TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS afiliados (
    id_afiliado          INTEGER PRIMARY KEY AUTOINCREMENT,
    cedula               TEXT NOT NULL UNIQUE,
    nombres              TEXT NOT NULL,
    apellidos            TEXT NOT NULL,
    fecha_nacimiento     TEXT,            -- YYYY-MM-DD
    id_religion          INTEGER REFERENCES religiones(id),
    direccion_domicilio  TEXT,
    municipio_domicilio  INTEGER REFERENCES municipios(id_municipio),
    direccion_residencia TEXT,
    municipio_residencia INTEGER REFERENCES municipios(id_municipio),
    municipio_trabajo    INTEGER REFERENCES municipios(id_municipio),
    id_cargo             INTEGER NOT NULL REFERENCES cargos(id_cargo),
    id_eps               INTEGER REFERENCES eps(id),
    id_afp               INTEGER REFERENCES afp(id),
    id_arl               INTEGER REFERENCES arl(id),
    id_cesantias         INTEGER REFERENCES cesantias(id),
    id_institucion       INTEGER REFERENCES instituciones(id_institucion),
    fecha_afiliacion     TEXT,
    telefono             TEXT,
    correo               TEXT,
    foto_afiliado        BLOB,
    created_at           TEXT NOT NULL    -- RFC 3339 UTC; server-assigned
);

-- Dependent records carry no ON DELETE CASCADE: the store deletes them
-- explicitly, inside the same transaction as the affiliate.
CREATE TABLE IF NOT EXISTS actas_nombramiento (
    id_acta_nombramiento INTEGER PRIMARY KEY,
    id_afiliado          INTEGER NOT NULL REFERENCES afiliados(id_afiliado),
    tipo_documento       TEXT,
    numero_resolucion    TEXT,
    fecha_resolucion     TEXT,
    archivo              BLOB
);

CREATE TABLE IF NOT EXISTS actas_posesion (
    id_acta_posesion INTEGER PRIMARY KEY,
    id_afiliado      INTEGER NOT NULL REFERENCES afiliados(id_afiliado),
    numero_acta      TEXT,
    fecha_acta       TEXT,
    archivo          BLOB
);

CREATE TABLE IF NOT EXISTS otros_cargos (
    id_otro_cargo INTEGER PRIMARY KEY,
    id_afiliado   INTEGER NOT NULL REFERENCES afiliados(id_afiliado),
    nombre_cargo  TEXT NOT NULL,
    fecha_inicio  TEXT,
    fecha_fin     TEXT
);

-- Dues reference the affiliate by national ID value, not by row id.
CREATE TABLE IF NOT EXISTS cuotas (
    id_cuota       INTEGER PRIMARY KEY,
    cedula         TEXT NOT NULL,
    mes            TEXT NOT NULL,     -- lowercase Spanish month name
    anio           INTEGER NOT NULL,
    monto          INTEGER NOT NULL,
    fecha_registro TEXT NOT NULL,
    UNIQUE (cedula, mes, anio)
);

CREATE TABLE IF NOT EXISTS salarios (
    id_salario      INTEGER PRIMARY KEY,
    id_cargo        INTEGER NOT NULL REFERENCES cargos(id_cargo),
    id_departamento INTEGER NOT NULL REFERENCES departamentos(id_departamento),
    anio            INTEGER NOT NULL,
    monto           INTEGER NOT NULL,
    UNIQUE (id_cargo, id_departamento, anio)
);

CREATE TABLE IF NOT EXISTS usuarios (
    id_usuario      INTEGER PRIMARY KEY,
    username        TEXT NOT NULL UNIQUE,
    nombre          TEXT NOT NULL,
    rol             TEXT NOT NULL CHECK (rol IN ('admin', 'departamental')),
    id_departamento INTEGER REFERENCES departamentos(id_departamento),
    password_hash   TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS municipios_departamento_idx ON municipios(id_departamento);
CREATE INDEX IF NOT EXISTS afiliados_trabajo_idx       ON afiliados(municipio_trabajo);
CREATE INDEX IF NOT EXISTS actas_nombramiento_af_idx   ON actas_nombramiento(id_afiliado);
CREATE INDEX IF NOT EXISTS actas_posesion_af_idx       ON actas_posesion(id_afiliado);
CREATE INDEX IF NOT EXISTS otros_cargos_af_idx         ON otros_cargos(id_afiliado);
CREATE INDEX IF NOT EXISTS salarios_departamento_idx   ON salarios(id_departamento);

PRAGMA user_version = 1;
";
