//! crewflow
//!
//! Crate raíz del workspace: junta el motor (`crew_core`), la persistencia
//! Postgres (`crew_persistence`) y los flujos concretos (`crew_adapters`), y
//! aporta lo que necesita un ejecutable:
//! - `config`: `AppConfig` desde .env / entorno.
//! - `logging`: subscriber de `tracing` que recoge también los registros
//!   del facade `log` que emiten las librerías.
//! - `runner`: cableado store + crew + grafo y ejecución de un job.
//! - `errors`: error agregado de la aplicación.

pub mod config;
pub mod errors;
pub mod logging;
pub mod runner;

pub use config::{AppConfig, ConfigError, CrewConfig, LoggingConfig};
pub use errors::AppError;

pub use crew_adapters;
pub use crew_core;
pub use crew_persistence;
