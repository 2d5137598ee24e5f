//! Inicialización de logging para el ejecutable.
//!
//! Las librerías del workspace emiten con el facade `log`; el subscriber de
//! `tracing-subscriber` instala el puente `tracing-log` al inicializarse, así
//! que esos registros salen por el mismo formato a stderr.

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Directiva efectiva: `--debug` manda; si no, `RUST_LOG`; si no, el nivel
/// configurado.
pub fn filter_directive(config: &LoggingConfig, debug_override: bool) -> String {
    if debug_override {
        return "debug".to_string();
    }
    std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone())
}

pub fn init_logging(config: &LoggingConfig, debug_override: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::new(filter_directive(config, debug_override));
    tracing_subscriber::registry().with(filter)
                                  .with(tracing_subscriber::fmt::layer().with_target(false)
                                                                        .with_writer(std::io::stderr))
                                  .try_init()
}
