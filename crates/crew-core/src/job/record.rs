use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::JobStatus;

/// Resultado de un job: mapa de claves string a valores JSON.
pub type JobResult = Map<String, Value>;

/// Registro de job tal como lo ve el motor. El store es el dueño; el motor
/// sólo lo lee al arrancar un flujo y escribe a través de `update_status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: String,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub input_payload: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Job recién enviado: `Pending`, sin resultado.
    pub fn new(id: impl Into<String>, input_payload: Option<String>) -> Self {
        Self { id: id.into(),
               status: JobStatus::Pending,
               result: None,
               input_payload,
               updated_at: Utc::now() }
    }

    /// Payload de entrada si existe y no está vacío (sólo espacios cuenta
    /// como vacío).
    pub fn input(&self) -> Option<&str> {
        self.input_payload
            .as_deref()
            .filter(|payload| !payload.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_payload_is_no_input() {
        assert_eq!(JobRecord::new("J1", None).input(), None);
        assert_eq!(JobRecord::new("J1", Some("   ".into())).input(), None);
        assert_eq!(JobRecord::new("J1", Some("Acme Corp".into())).input(), Some("Acme Corp"));
    }

    #[test]
    fn new_jobs_are_pending() {
        let job = JobRecord::new("J9", None);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result.is_none());
    }
}
