//! Configuración de la aplicación.
//!
//! Todo sale de variables de entorno (con `.env` cargado una vez vía
//! `crew_persistence::init_dotenv`). Los flags de la CLI sobrescriben los
//! campos después de cargar.

use std::env;
use std::time::Duration;

pub use crew_persistence::{ConfigError, DbConfig};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrewConfig {
    /// Línea de comando del crew (`CREW_COMMAND`), partida por espacios.
    /// Las comillas no se interpretan: un argumento con espacios necesita
    /// un script envoltorio.
    pub command: Option<String>,
    /// `CREW_TIMEOUT_SECS`; 0 o ausente = sin límite.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` si no hay ni `DATABASE_URL` ni `DB_NAME`: comandos como
    /// `graph` no necesitan base de datos.
    pub database: Option<DbConfig>,
    pub crew: CrewConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        crew_persistence::init_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
        where F: Fn(&str) -> Option<String>
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database = if get("DATABASE_URL").is_some() || get("DB_NAME").is_some() {
            Some(DbConfig::from_lookup(&lookup)?)
        } else {
            None
        };

        let timeout = match get("CREW_TIMEOUT_SECS") {
            None => None,
            Some(raw) => {
                let secs: u64 = raw.trim()
                                   .parse()
                                   .map_err(|_| ConfigError::Invalid { key: "CREW_TIMEOUT_SECS",
                                                                       value: raw.clone() })?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
        };

        Ok(Self { database,
                  crew: CrewConfig { command: get("CREW_COMMAND"),
                                     timeout },
                  logging: LoggingConfig { level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()) } })
    }

    pub fn require_database(&self) -> Result<&DbConfig, ConfigError> {
        self.database
            .as_ref()
            .ok_or(ConfigError::Missing("DATABASE_URL or DB_NAME"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key: &str| map.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn empty_environment_gives_defaults_and_no_database() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.database, None);
        assert_eq!(cfg.crew, CrewConfig::default());
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.require_database(), Err(ConfigError::Missing("DATABASE_URL or DB_NAME")));
    }

    #[test]
    fn crew_settings_are_read() {
        let cfg = load(&[("CREW_COMMAND", "python -m crews.overview"),
                         ("CREW_TIMEOUT_SECS", "90"),
                         ("LOG_LEVEL", "debug")]).unwrap();
        assert_eq!(cfg.crew.command.as_deref(), Some("python -m crews.overview"));
        assert_eq!(cfg.crew.timeout, Some(Duration::from_secs(90)));
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn zero_timeout_means_unbounded() {
        assert_eq!(load(&[("CREW_TIMEOUT_SECS", "0")]).unwrap().crew.timeout, None);
        assert!(matches!(load(&[("CREW_TIMEOUT_SECS", "soon")]),
                         Err(ConfigError::Invalid { key: "CREW_TIMEOUT_SECS", .. })));
    }

    #[test]
    fn partial_database_parts_are_an_error() {
        assert_eq!(load(&[("DB_NAME", "agents")]), Err(ConfigError::Missing("DB_USER")));
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/agents")]).unwrap();
        assert_eq!(cfg.require_database().unwrap().url, "postgres://localhost/agents");
    }
}
