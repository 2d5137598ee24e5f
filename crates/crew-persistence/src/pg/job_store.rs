use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crew_core::{JobRecord, JobResult, JobStatus, JobStore, StoreError};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Jsonb, Nullable, Text};
use log::{debug, error, warn};
use serde_json::Value;
use std::sync::Arc;

use super::ConnectionProvider;
use crate::error::PersistenceError;
use crate::schema::reports;

/// Fila de `reports` tal como la lee el motor (sin `created_at`).
#[derive(Debug, Clone, Queryable)]
pub struct ReportRow {
    pub id: String,
    pub status: String,
    pub result: Option<Value>,
    pub input_payload: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ReportRow {
    /// Parseo estricto: estado desconocido o `result` que no es objeto JSON
    /// son filas inválidas.
    pub fn into_record(self) -> Result<JobRecord, PersistenceError> {
        let status = self.status
                         .parse::<JobStatus>()
                         .map_err(|e| PersistenceError::InvalidRow(format!("report {}: {e}", self.id)))?;
        let result = match self.result {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map),
            Some(other) => {
                return Err(PersistenceError::InvalidRow(format!("report {}: result is not an object: {other}",
                                                                self.id)))
            }
        };
        Ok(JobRecord { id: self.id,
                       status,
                       result,
                       input_payload: self.input_payload,
                       updated_at: self.updated_at })
    }
}

#[derive(Insertable)]
#[diesel(table_name = reports)]
struct NewReportRow {
    id: String,
    status: String,
    result: Option<Value>,
    input_payload: Option<String>,
}

fn result_column(result: Option<&JobResult>) -> Option<Value> {
    result.filter(|r| !r.is_empty()).cloned().map(Value::Object)
}

pub fn fetch_report(conn: &mut PgConnection, job_id: &str) -> Result<Option<JobRecord>, PersistenceError> {
    let row = reports::table.find(job_id)
                            .select((reports::id,
                                     reports::status,
                                     reports::result,
                                     reports::input_payload,
                                     reports::updated_at))
                            .first::<ReportRow>(conn)
                            .optional()?;
    row.map(ReportRow::into_record).transpose()
}

/// `UPDATE ... SET updated_at = now()`; cero filas afectadas es `NotFound`.
pub fn update_report(conn: &mut PgConnection,
                     job_id: &str,
                     status: JobStatus,
                     result: Option<&JobResult>)
                     -> Result<(), PersistenceError> {
    let affected = diesel::sql_query("UPDATE reports SET status = $1, result = $2, updated_at = now() WHERE id = $3")
        .bind::<Text, _>(status.as_str())
        .bind::<Nullable<Jsonb>, _>(result_column(result))
        .bind::<Text, _>(job_id)
        .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::NotFound);
    }
    Ok(())
}

/// Alta de un job (envío). No forma parte del contrato `JobStore`.
pub fn insert_report(conn: &mut PgConnection, record: &JobRecord) -> Result<(), PersistenceError> {
    diesel::insert_into(reports::table).values(NewReportRow { id: record.id.clone(),
                                                              status: record.status.as_str().to_string(),
                                                              result: result_column(record.result.as_ref()),
                                                              input_payload: record.input_payload.clone() })
                                       .execute(conn)?;
    Ok(())
}

/// `JobStore` sobre la tabla `reports`.
pub struct PgJobStore<P: ConnectionProvider> {
    provider: Arc<P>,
}

impl<P: ConnectionProvider> Clone for PgJobStore<P> {
    fn clone(&self) -> Self {
        Self { provider: Arc::clone(&self.provider) }
    }
}

impl<P: ConnectionProvider> PgJobStore<P> {
    pub fn new(provider: P) -> Self {
        Self { provider: Arc::new(provider) }
    }

    pub async fn insert_job(&self, record: JobRecord) -> Result<(), PersistenceError> {
        self.blocking(move |conn| insert_report(conn, &record)).await
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T, PersistenceError>
        where T: Send + 'static,
              F: FnOnce(&mut PgConnection) -> Result<T, PersistenceError> + Send + 'static
    {
        let provider = Arc::clone(&self.provider);
        tokio::task::spawn_blocking(move || {
            let mut conn = provider.connection()?;
            f(&mut conn)
        }).await
          .map_err(|e| PersistenceError::TransientIo(format!("blocking task: {e}")))?
    }
}

#[async_trait]
impl<P: ConnectionProvider> JobStore for PgJobStore<P> {
    async fn fetch(&self, job_id: &str) -> Result<Option<JobRecord>, StoreError> {
        let id = job_id.to_string();
        let fetched = self.blocking(move |conn| fetch_report(conn, &id)).await;
        match fetched {
            Ok(record) => {
                debug!("reports:fetch job_id={job_id} found={}", record.is_some());
                Ok(record)
            }
            Err(e) => {
                error!("reports:fetch_failed job_id={job_id} err={e}");
                Err(e.into_store_error(job_id))
            }
        }
    }

    async fn update_status(&self,
                           job_id: &str,
                           status: JobStatus,
                           result: Option<JobResult>)
                           -> Result<(), StoreError> {
        let id = job_id.to_string();
        let updated = self.blocking(move |conn| update_report(conn, &id, status, result.as_ref()))
                          .await;
        match updated {
            Ok(()) => {
                debug!("reports:update job_id={job_id} status={status}");
                Ok(())
            }
            Err(PersistenceError::NotFound) => {
                warn!("reports:update_missing job_id={job_id} status={status}");
                Err(StoreError::NotFound(job_id.to_string()))
            }
            Err(e) => {
                error!("reports:update_failed job_id={job_id} status={status} err={e}");
                Err(e.into_store_error(job_id))
            }
        }
    }
}
