//! Supervisor de unidades en segundo plano.
//!
//! Cada unidad es una tarea tokio independiente: invoca un crew, deriva el
//! resultado y hace exactamente una escritura de estado sobre el job. El
//! step que la lanzó no espera; la propagación del grafo sigue en cuanto
//! el cuerpo del step retorna.

mod crew;
mod unit;

pub use crew::{Crew, CrewOutput};
pub use unit::{BackgroundUnit, UnitHandle, UnitId, UnitReport};

use log::{debug, error, info, warn};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::constants::ERROR_RESULT_KEY;
use crate::errors::CrewError;
use crate::job::{JobResult, JobStatus, JobStore};

pub struct BackgroundSupervisor {
    store: Arc<dyn JobStore>,
    // JoinHandle (no JoinSet): soltar el supervisor no aborta las unidades.
    units: Mutex<Vec<JoinHandle<UnitReport>>>,
}

impl BackgroundSupervisor {
    pub fn new(store: Arc<dyn JobStore>) -> Self {
        Self { store,
               units: Mutex::new(Vec::new()) }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Arranca la unidad en el runtime actual y devuelve su handle.
    ///
    /// Debe llamarse desde dentro de un runtime tokio.
    pub fn spawn(&self, unit: BackgroundUnit) -> UnitHandle {
        let id = UnitId::new();
        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        debug!("unit:spawn unit_id={id} job_id={} crew={}", unit.job_id, unit.crew.name());
        let handle = tokio::spawn(async move {
            let report = execute_unit(id, unit, store).await;
            // Nadie escuchando es válido: el handle se pudo soltar.
            let _ = tx.send(report.clone());
            report
        });
        self.lock_units().push(handle);
        UnitHandle::new(id, rx)
    }

    /// Unidades lanzadas y todavía no recogidas por `drain`.
    pub fn pending(&self) -> usize {
        self.lock_units().len()
    }

    /// Espera a todas las unidades lanzadas hasta ahora y devuelve sus
    /// reports en orden de lanzamiento.
    pub async fn drain(&self) -> Vec<UnitReport> {
        let handles = std::mem::take(&mut *self.lock_units());
        let mut reports = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => error!("unit:join_error err={e}"),
            }
        }
        reports
    }

    fn lock_units(&self) -> MutexGuard<'_, Vec<JoinHandle<UnitReport>>> {
        self.units.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn execute_unit(id: UnitId, unit: BackgroundUnit, store: Arc<dyn JobStore>) -> UnitReport {
    let crew_name = unit.crew.name().to_string();
    let (status, result) = match invoke_crew(&unit).await {
        Ok(output) => (unit.success_status, output.into_result(&unit.fallback_key)),
        Err(e) => {
            warn!("unit:crew_failed unit_id={id} job_id={} crew={crew_name} err={e}", unit.job_id);
            let mut result = JobResult::new();
            result.insert(ERROR_RESULT_KEY.to_string(), Value::String(e.to_string()));
            (JobStatus::Failed, result)
        }
    };

    let persisted = store.update_status(&unit.job_id, status, Some(result.clone()))
                         .await;
    match &persisted {
        Ok(()) => info!("unit:finished unit_id={id} job_id={} status={status}", unit.job_id),
        Err(e) => error!("unit:status_write_failed unit_id={id} job_id={} status={status} err={e}",
                         unit.job_id),
    }

    UnitReport { unit_id: id,
                 job_id: unit.job_id,
                 crew: crew_name,
                 status,
                 result,
                 persisted }
}

/// Corre el crew en su propia tarea para que un panic quede contenido y se
/// convierta en `CrewError`.
async fn invoke_crew(unit: &BackgroundUnit) -> Result<CrewOutput, CrewError> {
    let crew = Arc::clone(&unit.crew);
    let input = unit.input.clone();
    match tokio::spawn(async move { crew.kickoff(input).await }).await {
        Ok(outcome) => outcome,
        Err(join_err) => Err(CrewError::Failed(format!("crew task aborted: {join_err}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::InMemoryJobStore;
    use async_trait::async_trait;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Crew for Echo {
        async fn kickoff(&self, input: Option<String>) -> Result<CrewOutput, CrewError> {
            Ok(CrewOutput::raw(input.unwrap_or_default()))
        }
    }

    struct Panics;

    #[async_trait]
    impl Crew for Panics {
        async fn kickoff(&self, _input: Option<String>) -> Result<CrewOutput, CrewError> {
            panic!("boom")
        }
    }

    #[tokio::test]
    async fn handle_reports_the_single_write() {
        let store = InMemoryJobStore::new().with_job("J1", Some("Acme"));
        let sup = BackgroundSupervisor::new(Arc::new(store.clone()));

        let report = sup.spawn(BackgroundUnit::new("J1", Some("Acme".into()), Arc::new(Echo)))
                        .wait()
                        .await
                        .unwrap();

        assert_eq!(report.status, JobStatus::Completed);
        assert_eq!(report.result.get("overview"), Some(&json!("Acme")));
        assert!(report.persisted.is_ok());
        assert_eq!(store.writes_for("J1").len(), 1);
    }

    #[tokio::test]
    async fn panicking_crew_still_marks_the_job_failed() {
        let store = InMemoryJobStore::new().with_job("J2", None);
        let sup = BackgroundSupervisor::new(Arc::new(store.clone()));
        sup.spawn(BackgroundUnit::new("J2", None, Arc::new(Panics)));

        let reports = sup.drain().await;
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, JobStatus::Failed);
        let err = reports[0].result.get("error").and_then(Value::as_str).unwrap();
        assert!(err.starts_with("crew task aborted"), "{err}");
        assert_eq!(store.get("J2").unwrap().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn store_failure_is_reported_not_raised() {
        let store = InMemoryJobStore::new().with_job("J3", None);
        store.set_unavailable(true);
        let sup = BackgroundSupervisor::new(Arc::new(store.clone()));
        sup.spawn(BackgroundUnit::new("J3", None, Arc::new(Echo)));

        let reports = sup.drain().await;
        assert!(reports[0].persisted.is_err());
        assert_eq!(store.writes().len(), 1);
        assert_eq!(sup.pending(), 0);
    }
}
