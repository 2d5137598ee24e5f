use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;

use super::crew::Crew;
use crate::constants::DEFAULT_RESULT_KEY;
use crate::errors::StoreError;
use crate::job::{JobResult, JobStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Trabajo a lanzar: qué crew, con qué input, sobre qué job y qué estado
/// escribir si sale bien.
pub struct BackgroundUnit {
    pub(crate) job_id: String,
    pub(crate) input: Option<String>,
    pub(crate) crew: Arc<dyn Crew>,
    pub(crate) success_status: JobStatus,
    pub(crate) fallback_key: String,
}

impl BackgroundUnit {
    /// Escribe `Completed` al terminar bien; la salida cruda se envuelve bajo
    /// `overview`.
    pub fn new(job_id: impl Into<String>, input: Option<String>, crew: Arc<dyn Crew>) -> Self {
        Self { job_id: job_id.into(),
               input,
               crew,
               success_status: JobStatus::Completed,
               fallback_key: DEFAULT_RESULT_KEY.to_string() }
    }

    /// Para pipelines de varias fases (`In Progress` en la fase intermedia).
    pub fn with_success_status(mut self, status: JobStatus) -> Self {
        self.success_status = status;
        self
    }

    pub fn with_fallback_key(mut self, key: impl Into<String>) -> Self {
        self.fallback_key = key.into();
        self
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

/// Lo que una unidad terminada devuelve al flujo por la cola de
/// finalización.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitReport {
    pub unit_id: UnitId,
    pub job_id: String,
    pub crew: String,
    pub status: JobStatus,
    pub result: JobResult,
    /// Resultado de la única escritura `update_status` de la unidad.
    pub persisted: Result<(), StoreError>,
}

impl UnitReport {
    pub fn crew_succeeded(&self) -> bool {
        self.status != JobStatus::Failed
    }
}

/// Handle de una unidad. Soltarlo la deja corriendo (detached).
#[derive(Debug)]
pub struct UnitHandle {
    id: UnitId,
    rx: oneshot::Receiver<UnitReport>,
}

impl UnitHandle {
    pub(crate) fn new(id: UnitId, rx: oneshot::Receiver<UnitReport>) -> Self {
        Self { id, rx }
    }

    pub fn id(&self) -> UnitId {
        self.id
    }

    /// Espera a que la unidad termine. `None` si la tarea murió sin
    /// producir report.
    pub async fn wait(self) -> Option<UnitReport> {
        self.rx.await.ok()
    }
}
