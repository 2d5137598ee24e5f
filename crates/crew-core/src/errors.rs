//! Errores del core.
//!
//! - `GraphConfigError`: construcción del grafo (fatal, nunca se recupera).
//! - `FlowError`: aborta una instancia de flujo.
//! - `StepError`: lo que devuelve el cuerpo síncrono de un step.
//! - `StoreError`: se devuelve (no se propaga con panic) desde el `JobStore`.
//! - `CrewError`: queda contenido en la unidad en segundo plano.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphConfigError {
    #[error("start step already registered as '{existing}', cannot register '{attempted}'")]
    DuplicateStart { existing: String, attempted: String },
    #[error("step '{0}' is registered more than once")]
    DuplicateStep(String),
    #[error("step '{step}' listens on unknown upstream '{upstream}'")]
    UnknownUpstream { step: String, upstream: String },
    #[error("step '{step}' listens on router '{router}', which only emits its route labels")]
    ListensOnRouter { step: String, router: String },
    #[error("step '{0}' has an empty trigger set")]
    EmptyTrigger(String),
    #[error("router '{0}' declares no routes")]
    EmptyRoutes(String),
    #[error("router '{router}' declares route '{label}' which is also a step name")]
    RouteCollision { router: String, label: String },
    #[error("graph has no start step")]
    MissingStart,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("job store unavailable: {0}")]
    Unavailable(String),
    #[error("job '{0}' not found")]
    NotFound(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("invalid job record: {0}")]
    InvalidRecord(String),
}

/// Fallo de una invocación de crew. El `Display` es exactamente el mensaje
/// que termina en `result.error` del job.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CrewError {
    #[error("{0}")]
    Failed(String),
    #[error("timeout")]
    Timeout,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error("job '{0}' has no input payload")]
    MissingInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("job '{0}' not found")]
    JobNotFound(String),
    #[error("could not load job '{job_id}': {source}")]
    Store {
        job_id: String,
        #[source]
        source: StoreError,
    },
    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: StepError,
    },
    #[error("router '{router}' selected undeclared route '{label}'")]
    UnknownRoute { router: String, label: String },
}
