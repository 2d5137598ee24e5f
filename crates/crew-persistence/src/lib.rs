//! crew-persistence
//!
//! Implementación Postgres (Diesel + r2d2) del contrato `JobStore` de
//! crew-core, más carga de configuración y migraciones embebidas.
//!
//! Módulos:
//! - `pg`: pool de conexiones y `PgJobStore` sobre la tabla `reports`.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: `DbConfig` desde .env / variables de entorno.
//! - `schema`: tablas Diesel declaradas para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, ConfigError, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_pool_from_config, ConnectionProvider, PgJobStore, PgPool, PoolProvider};
