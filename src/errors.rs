//! Error agregado de la aplicación: lo que puede fallar al cablear y correr
//! un job desde el ejecutable.

use thiserror::Error;

use crew_core::{FlowError, GraphConfigError};
use crew_persistence::{ConfigError, PersistenceError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("persistence: {0}")]
    Persistence(#[from] PersistenceError),
    #[error("graph: {0}")]
    Graph(#[from] GraphConfigError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let e: AppError = ConfigError::Missing("CREW_COMMAND").into();
        assert_eq!(e.to_string(), "configuration: missing setting CREW_COMMAND");
        let e: AppError = FlowError::JobNotFound("J9".into()).into();
        assert_eq!(e.to_string(), "job 'J9' not found");
    }
}
