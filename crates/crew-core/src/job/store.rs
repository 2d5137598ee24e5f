use async_trait::async_trait;

use super::record::{JobRecord, JobResult};
use super::status::JobStatus;
use crate::errors::StoreError;

/// Único punto de contacto con la persistencia.
///
/// Los errores se devuelven, nunca se propagan con panic: el motor sólo
/// aborta cuando `fetch` falla al arrancar un flujo; cualquier otro caller
/// (las unidades en segundo plano) registra el error y sigue.
#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// `Ok(None)` si el job no existe.
    async fn fetch(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError>;

    /// Escribe `status` y `result` (un mapa vacío se persiste como NULL) y
    /// refresca `updated_at`. Un id inexistente es `StoreError::NotFound`.
    async fn update_status(&self,
                           job_id: &str,
                           status: JobStatus,
                           result: Option<JobResult>)
                           -> Result<(), StoreError>;
}
