//! Job store en memoria (tests y ejecuciones locales).
//!
//! Además de guardar los registros, anota cada llamada a `update_status` en
//! orden, se aplique o no, para poder afirmar "exactamente una escritura".

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::record::{JobRecord, JobResult};
use super::status::JobStatus;
use super::store::JobStore;
use crate::errors::StoreError;

/// Una llamada a `update_status` observada por el store.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusWrite {
    pub job_id: String,
    pub status: JobStatus,
    pub result: Option<JobResult>,
}

#[derive(Default)]
struct Inner {
    jobs: DashMap<String, JobRecord>,
    writes: Mutex<Vec<StatusWrite>>,
    unavailable: AtomicBool,
}

/// Clonable: los clones comparten los mismos registros.
#[derive(Clone, Default)]
pub struct InMemoryJobStore {
    inner: Arc<Inner>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder para tests: añade un job `Pending` con el payload dado.
    pub fn with_job(self, id: &str, input_payload: Option<&str>) -> Self {
        self.insert(JobRecord::new(id, input_payload.map(str::to_string)));
        self
    }

    pub fn insert(&self, record: JobRecord) {
        self.inner.jobs.insert(record.id.clone(), record);
    }

    pub fn get(&self, job_id: &str) -> Option<JobRecord> {
        self.inner.jobs.get(job_id).map(|r| r.value().clone())
    }

    /// Todas las llamadas a `update_status`, en orden de llegada.
    pub fn writes(&self) -> Vec<StatusWrite> {
        self.inner
            .writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn writes_for(&self, job_id: &str) -> Vec<StatusWrite> {
        self.writes().into_iter().filter(|w| w.job_id == job_id).collect()
    }

    /// Simula una caída del store: todas las operaciones devuelven
    /// `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn fetch(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        self.check_available()?;
        Ok(self.get(job_id))
    }

    async fn update_status(&self,
                           job_id: &str,
                           status: JobStatus,
                           result: Option<JobResult>)
                           -> Result<(), StoreError> {
        let result = result.filter(|r| !r.is_empty());
        self.inner
            .writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StatusWrite { job_id: job_id.to_string(),
                                status,
                                result: result.clone() });
        self.check_available()?;
        let mut record = self.inner
                             .jobs
                             .get_mut(job_id)
                             .ok_or_else(|| StoreError::NotFound(job_id.to_string()))?;
        record.status = status;
        record.result = result;
        record.updated_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn update_rewrites_status_and_result() {
        let store = InMemoryJobStore::new().with_job("J1", Some("Acme Corp"));
        let before = store.get("J1").unwrap().updated_at;
        let mut result = JobResult::new();
        result.insert("overview".into(), json!("Acme makes anvils"));

        store.update_status("J1", JobStatus::Completed, Some(result.clone())).await.unwrap();

        let job = store.fetch("J1").await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.result, Some(result));
        assert!(job.updated_at >= before);
        assert_eq!(store.writes().len(), 1);
    }

    #[tokio::test]
    async fn empty_result_is_stored_as_none() {
        let store = InMemoryJobStore::new().with_job("J1", None);
        store.update_status("J1", JobStatus::InProgress, Some(JobResult::new())).await.unwrap();
        assert_eq!(store.get("J1").unwrap().result, None);
    }

    #[tokio::test]
    async fn unknown_job_is_not_found_but_the_attempt_is_recorded() {
        let store = InMemoryJobStore::new();
        let err = store.update_status("nope", JobStatus::Failed, None).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("nope".into()));
        assert_eq!(store.writes_for("nope").len(), 1);
        assert_eq!(store.fetch("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn unavailable_store_returns_errors() {
        let store = InMemoryJobStore::new().with_job("J1", None);
        store.set_unavailable(true);
        assert!(matches!(store.fetch("J1").await, Err(StoreError::Unavailable(_))));
        assert!(store.update_status("J1", JobStatus::Completed, None).await.is_err());
        assert_eq!(store.get("J1").unwrap().status, JobStatus::Pending);
    }
}
