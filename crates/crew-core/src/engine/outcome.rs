use uuid::Uuid;

use crate::event::{FlowEvent, FlowLog};
use crate::job::JobRecord;
use crate::state::WorkflowState;
use crate::supervisor::{BackgroundSupervisor, UnitReport};

/// Resultado de la propagación del grafo. Se entrega antes de que terminen
/// las unidades en segundo plano; soltarlo las deja corriendo.
pub struct FlowOutcome<S> {
    pub(crate) job: JobRecord,
    pub(crate) executed: Vec<String>,
    pub(crate) unreached: Vec<String>,
    pub(crate) state: S,
    pub(crate) log: FlowLog,
    pub(crate) supervisor: BackgroundSupervisor,
}

impl<S: WorkflowState> FlowOutcome<S> {
    pub fn flow_id(&self) -> Uuid {
        self.log.flow_id()
    }

    pub fn job_id(&self) -> &str {
        &self.job.id
    }

    /// Job tal como se leyó al arrancar la instancia.
    pub fn job(&self) -> &JobRecord {
        &self.job
    }

    /// Steps ejecutados, en orden.
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    pub fn unreached(&self) -> &[String] {
        &self.unreached
    }

    pub fn has_run(&self, step: &str) -> bool {
        self.executed.iter().any(|s| s == step)
    }

    /// Estado tal como lo dejaron los cuerpos síncronos.
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn events(&self) -> &[FlowEvent] {
        self.log.events()
    }

    pub fn event_codes(&self) -> String {
        self.log.codes()
    }

    /// Unidades todavía no recogidas.
    pub fn pending_units(&self) -> usize {
        self.supervisor.pending()
    }

    /// Espera a todas las unidades, aplica sus reports al estado y lo
    /// devuelve junto con ellos.
    pub async fn settle(self) -> SettledFlow<S> {
        let FlowOutcome { job,
                          executed,
                          mut state,
                          log,
                          supervisor,
                          .. } = self;
        let reports = supervisor.drain().await;
        for report in &reports {
            state.absorb(report);
        }
        SettledFlow { flow_id: log.flow_id(),
                      job_id: job.id,
                      executed,
                      state,
                      reports }
    }
}

#[derive(Debug)]
pub struct SettledFlow<S> {
    pub flow_id: Uuid,
    pub job_id: String,
    pub executed: Vec<String>,
    pub state: S,
    pub reports: Vec<UnitReport>,
}
